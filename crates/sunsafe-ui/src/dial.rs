//! The 12-segment UV dial: layout, click hit-testing and SVG output.

use std::borrow::Cow;
use std::f64::consts::PI;
use std::fmt::Write as _;

use chrono::{DateTime, TimeZone, Utc};
use sunsafe_uv::exposure::safe_minutes;
use sunsafe_uv::series::clock_hour;
use sunsafe_uv::{find_closest, DisplayWindow, RiskLevel, SkinType, UvSample};

const RADIUS: f64 = 45.0;
const CENTER: f64 = 50.0;
const SELECTED_STROKE: u32 = 12;
const STROKE: u32 = 8;

/// Burn time is only shown above this UV index
pub const BURN_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DialSegment {
    /// Clock position, 1..=12
    pub hour: u32,
    pub sample: Option<UvSample>,
    pub risk: RiskLevel,
    pub selected: bool,
}

/// What the middle of the dial says about the selected sample
#[derive(Debug, Clone, PartialEq)]
pub struct DialCenter {
    pub sample: UvSample,
    pub risk: RiskLevel,
    /// `Some` only when the UV index is above [`BURN_THRESHOLD`]
    pub burn_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dial {
    pub window: DisplayWindow,
    pub segments: Vec<DialSegment>,
    pub center: DialCenter,
}

/// Clock position under a click at (`x`, `y`) on a `width` x `height` dial.
/// Angles run clockwise from 12 o'clock with y growing downwards.
pub fn hour_at(x: f64, y: f64, width: f64, height: f64) -> u32 {
    let dx = x - width / 2.0;
    let up = height / 2.0 - y;

    let mut angle = dx.atan2(up).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }

    match (angle / 30.0).floor() as u32 % 12 {
        0 => 12,
        segment => segment,
    }
}

/// Samples the dial draws: those inside `window`, or everything when the
/// window holds none.
fn visible<'a>(points: &'a [UvSample], window: &DisplayWindow) -> Cow<'a, [UvSample]> {
    let inside = window.filter(points);
    if inside.is_empty() {
        Cow::Borrowed(points)
    } else {
        Cow::Owned(inside)
    }
}

/// Sample picked by a click on clock position `hour`.
///
/// Within the window each position is exactly one absolute hour, so the
/// nearest windowed sample to that hour wins. With an empty window the first
/// sample whose local clock position matches is used.
pub fn select_hour<Tz: TimeZone>(
    points: &[UvSample],
    window: &DisplayWindow,
    hour: u32,
    tz: &Tz,
) -> Option<UvSample> {
    let inside = window.filter(points);
    if inside.is_empty() {
        return points.iter().find(|p| clock_hour(p.time, tz) == hour).copied();
    }
    find_closest(&inside, window.slot_time(hour))
}

/// Lay out the dial for `points`, highlighting the sample closest to
/// `selected` among the visible ones. `None` for an empty series.
pub fn build<Tz: TimeZone>(
    points: &[UvSample],
    window: DisplayWindow,
    selected: DateTime<Utc>,
    skin: Option<SkinType>,
    tz: &Tz,
) -> Option<Dial> {
    let visible = visible(points, &window);
    let chosen = find_closest(&visible, selected)?;
    let selected_hour = clock_hour(chosen.time, tz);

    let segments = (1..=12)
        .map(|hour| {
            let sample = visible
                .iter()
                .find(|p| clock_hour(p.time, tz) == hour)
                .copied();
            DialSegment {
                hour,
                sample,
                risk: RiskLevel::classify(sample.map_or(0.0, |s| s.uvi)),
                selected: hour == selected_hour,
            }
        })
        .collect();

    let burn_minutes = (chosen.uvi > BURN_THRESHOLD).then(|| safe_minutes(chosen.uvi, skin));

    Some(Dial {
        window,
        segments,
        center: DialCenter {
            sample: chosen,
            risk: RiskLevel::classify(chosen.uvi),
            burn_minutes,
        },
    })
}

fn point_on_circle(degrees: f64) -> (f64, f64) {
    let radians = degrees * PI / 180.0;
    (CENTER + radians.cos() * RADIUS, CENTER + radians.sin() * RADIUS)
}

/// Standalone SVG of the dial, 100x100 view box
pub fn to_svg(dial: &Dial, time_label: &str) -> String {
    let mut svg = String::from(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" preserveAspectRatio="xMidYMid meet">"#,
    );

    for segment in &dial.segments {
        // Segment N spans N o'clock to N+1 o'clock
        let start = f64::from(segment.hour * 30) - 90.0;
        let end = f64::from((segment.hour % 12 + 1) * 30) - 90.0;
        let (x1, y1) = point_on_circle(start);
        let (x2, y2) = point_on_circle(end);
        let width = if segment.selected {
            SELECTED_STROKE
        } else {
            STROKE
        };

        let _ = write!(
            svg,
            r#"<path d="M{:.2} {:.2} A45 45 0 0 1 {:.2} {:.2}" stroke="{}" stroke-width="{}" fill="none"/>"#,
            x1,
            y1,
            x2,
            y2,
            segment.risk.color(),
            width
        );
    }

    let center = &dial.center;
    let _ = write!(
        svg,
        r#"<text x="50" y="38" text-anchor="middle" font-size="6">{}</text>"#,
        time_label
    );
    let _ = write!(
        svg,
        r#"<text x="50" y="52" text-anchor="middle" font-size="14" font-weight="bold">{:.1}</text>"#,
        center.sample.uvi
    );
    let _ = write!(
        svg,
        r#"<text x="50" y="61" text-anchor="middle" font-size="6" fill="{}">{}</text>"#,
        center.risk.color(),
        center.risk.label()
    );
    if let Some(minutes) = center.burn_minutes {
        let _ = write!(
            svg,
            r#"<text x="50" y="70" text-anchor="middle" font-size="5">Burn in {}m</text>"#,
            minutes
        );
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
    }

    fn hourly(day: u32, from: u32, to: u32) -> Vec<UvSample> {
        (from..=to)
            .map(|h| UvSample {
                time: at(day, h),
                uvi: f64::from(h) / 2.0,
            })
            .collect()
    }

    #[test]
    fn test_click_positions() {
        // Straight up, right, down, left on a 100x100 dial
        assert_eq!(hour_at(50.0, 0.0, 100.0, 100.0), 12);
        assert_eq!(hour_at(100.0, 50.0, 100.0, 100.0), 3);
        assert_eq!(hour_at(50.0, 100.0, 100.0, 100.0), 6);
        assert_eq!(hour_at(0.0, 50.0, 100.0, 100.0), 9);
        // Just left of the top is the end of the 11 segment
        assert_eq!(hour_at(49.0, 0.0, 100.0, 100.0), 11);
        // Dead centre counts as the top
        assert_eq!(hour_at(50.0, 50.0, 100.0, 100.0), 12);
    }

    #[test]
    fn test_click_scales_with_size() {
        assert_eq!(hour_at(400.0, 100.0, 200.0, 200.0), 3);
        assert_eq!(hour_at(150.0, 20.0, 200.0, 200.0), 1);
    }

    #[test]
    fn test_select_hour_uses_window() {
        // Two days of data; the window is day 1 07:00..19:00
        let mut points = hourly(1, 0, 23);
        points.extend(hourly(2, 0, 23));
        let window = DisplayWindow::for_now(&at(1, 9));

        let seven = select_hour(&points, &window, 7, &Utc).unwrap();
        assert_eq!(seven.time, at(1, 7));
        let three = select_hour(&points, &window, 3, &Utc).unwrap();
        assert_eq!(three.time, at(1, 15));
    }

    #[test]
    fn test_select_hour_after_rollover_is_tomorrow() {
        let mut points = hourly(1, 0, 23);
        points.extend(hourly(2, 0, 23));
        let window = DisplayWindow::for_now(&at(1, 20));

        let noon = select_hour(&points, &window, 12, &Utc).unwrap();
        assert_eq!(noon.time, at(2, 12));
    }

    #[test]
    fn test_select_hour_with_empty_window_falls_back() {
        let points = hourly(1, 0, 5);
        let window = DisplayWindow::for_now(&at(1, 9));
        let two = select_hour(&points, &window, 2, &Utc).unwrap();
        assert_eq!(two.time, at(1, 2));
        assert!(select_hour(&points, &window, 9, &Utc).is_none());
    }

    #[test]
    fn test_build_highlights_selected_hour() {
        let points = hourly(1, 6, 20);
        let window = DisplayWindow::for_now(&at(1, 9));
        let dial = build(&points, window, at(1, 14), Some(SkinType::II), &Utc).unwrap();

        assert_eq!(dial.segments.len(), 12);
        let selected: Vec<u32> = dial
            .segments
            .iter()
            .filter(|s| s.selected)
            .map(|s| s.hour)
            .collect();
        assert_eq!(selected, vec![2]);

        assert_eq!(dial.center.sample.uvi, 7.0);
        assert_eq!(dial.center.risk, RiskLevel::High);
        assert_eq!(dial.center.burn_minutes, Some(23));

        // 6:00 and 20:00 are outside the window, so the 6 segment shows 18:00
        let six = &dial.segments[5];
        assert_eq!(six.sample.unwrap().time, at(1, 18));
    }

    #[test]
    fn test_low_uv_has_no_burn_time() {
        let points = vec![UvSample {
            time: at(1, 8),
            uvi: 2.0,
        }];
        let window = DisplayWindow::for_now(&at(1, 9));
        let dial = build(&points, window, at(1, 8), Some(SkinType::I), &Utc).unwrap();
        assert_eq!(dial.center.burn_minutes, None);
        // Hours without a sample are drawn as no UV
        assert_eq!(dial.segments[0].risk, RiskLevel::NoUv);
    }

    #[test]
    fn test_build_empty_series() {
        let window = DisplayWindow::for_now(&at(1, 9));
        assert!(build(&[], window, at(1, 9), None, &Utc).is_none());
    }

    #[test]
    fn test_svg_output() {
        let points = hourly(1, 7, 18);
        let window = DisplayWindow::for_now(&at(1, 9));
        let dial = build(&points, window, at(1, 12), Some(SkinType::II), &Utc).unwrap();
        let svg = to_svg(&dial, "12:00 PM");

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<path").count(), 12);
        assert_eq!(svg.matches(r#"stroke-width="12""#).count(), 1);
        // 12 o'clock segment starts at the top of the circle
        assert!(svg.contains(r#"d="M50.00 5.00 A45 45 0 0 1"#));
        assert!(svg.contains("12:00 PM"));
        assert!(svg.contains("Burn in"));
    }
}
