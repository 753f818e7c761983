//! Plain-text rendering of the Home and Settings tabs.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Days, TimeZone, Timelike, Utc};
use sunsafe_uv::exposure::safe_minutes;
use sunsafe_uv::series::next_above;
use sunsafe_uv::{DisplayWindow, Settings, SkinType, UvDataset};

use crate::dial::{self, Dial, BURN_THRESHOLD};
use crate::state::{AppState, Tab, ViewState};

const TITLE: &str = "SunSafe: Sun Safety Tracker";

/// Main figure on the Home tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readout {
    pub text: String,
    /// Low UV right now; shown in the info colour
    pub low_uv: bool,
}

/// `2:05 PM`
pub fn format_time<Tz: TimeZone>(time: DateTime<Utc>, tz: &Tz) -> String {
    let local = time.with_timezone(tz);
    let hour = match local.hour() % 12 {
        0 => 12,
        h => h,
    };
    let meridiem = if local.hour() >= 12 { "PM" } else { "AM" };
    format!("{}:{:02} {}", hour, local.minute(), meridiem)
}

/// `Jun 1, 02:05 PM`
pub fn format_timestamp<Tz>(time: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    time.with_timezone(tz).format("%b %-d, %I:%M %p").to_string()
}

/// Safe exposure readout for the current reading.
///
/// While the UV index is low the readout points at the next sample above
/// the burn threshold, labelled relative to the wall clock `now`.
pub fn readout<Tz: TimeZone>(
    data: &UvDataset,
    skin: Option<SkinType>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Readout {
    let uvi = data.now.uvi;
    let minutes = format!("{} min", safe_minutes(uvi, skin));

    if uvi > BURN_THRESHOLD {
        return Readout {
            text: minutes,
            low_uv: false,
        };
    }

    let text = match next_above(&data.points(), data.now.time, BURN_THRESHOLD) {
        Some(next) => {
            let day = next.time.with_timezone(tz).date_naive();
            let today = now.with_timezone(tz).date_naive();
            let label = if day == today {
                " today"
            } else if today.checked_add_days(Days::new(1)) == Some(day) {
                " tomorrow"
            } else {
                ""
            };
            format!("Safe until {}{}", format_time(next.time, tz), label)
        }
        None => minutes,
    };

    Readout { text, low_uv: true }
}

/// Dial for the current state, or `None` without data
pub fn dial_for<Tz: TimeZone>(state: &AppState, now: DateTime<Utc>, tz: &Tz) -> Option<Dial> {
    let data = state.data.as_ref()?;
    let window = DisplayWindow::for_now(&now.with_timezone(tz));
    let selected = state.selected_time.unwrap_or(data.now.time);
    dial::build(&data.points(), window, selected, state.settings.skin(), tz)
}

fn tab_bar(tab: Tab) -> String {
    match tab {
        Tab::Home => "[Home]  Settings".to_string(),
        Tab::Settings => " Home  [Settings]".to_string(),
    }
}

/// Full screen for whichever tab is active
pub fn render<Tz>(state: &AppState, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(out, "{}", tab_bar(state.tab));
    let _ = writeln!(out);

    if let Some(notice) = &state.notice {
        let _ = writeln!(out, "! {}", notice);
        let _ = writeln!(out);
    }

    match state.tab {
        Tab::Home => out.push_str(&render_home(state, now, tz)),
        Tab::Settings => out.push_str(&render_settings(state)),
    }
    out
}

pub fn render_home<Tz>(state: &AppState, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();

    match state.view() {
        ViewState::Loading => {
            let _ = writeln!(out, "Loading UV data...");
        }
        ViewState::NoSettings => {
            let _ = writeln!(out, "Settings Required");
            let _ = writeln!(
                out,
                "Please complete your settings to view sun safety information."
            );
            let _ = writeln!(out, "Open the Settings tab to continue.");
        }
        ViewState::NoData => {
            let _ = writeln!(out, "No UV data available.");
            let _ = writeln!(out, "Fetch UV data with `refresh`.");
        }
        ViewState::Error { message } => {
            let _ = writeln!(out, "{}", message);
            let _ = writeln!(out, "Retry with `refresh`.");
        }
        ViewState::Content => {
            if let Some(data) = &state.data {
                write_content(&mut out, state, data, now, tz);
            }
        }
    }
    out
}

fn write_content<Tz>(
    out: &mut String,
    state: &AppState,
    data: &UvDataset,
    now: DateTime<Utc>,
    tz: &Tz,
) where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let skin = state.settings.skin();
    let readout = readout(data, skin, now, tz);

    let _ = writeln!(out, "Safe Sun Exposure");
    let _ = writeln!(out, "  {}", readout.text);
    let _ = writeln!(out, "  estimated safe time without sunscreen");
    let _ = writeln!(
        out,
        "  Based on skin type: {}",
        skin.map_or("", |s| s.label())
    );
    let _ = writeln!(out);

    if let Some(dial) = dial_for(state, now, tz) {
        let _ = writeln!(
            out,
            "UV by hour ({} - {})",
            format_time(dial.window.start, tz),
            format_time(dial.window.end, tz)
        );
        for segment in &dial.segments {
            let marker = if segment.selected { ">" } else { " " };
            match segment.sample {
                Some(sample) => {
                    let _ = writeln!(
                        out,
                        "{} {:>2}  {:>8}  {:>4.1}  {}",
                        marker,
                        segment.hour,
                        format_time(sample.time, tz),
                        sample.uvi,
                        segment.risk.label()
                    );
                }
                None => {
                    let _ = writeln!(out, "{} {:>2}  {:>8}", marker, segment.hour, "--");
                }
            }
        }

        let center = &dial.center;
        let _ = write!(
            out,
            "\n{}  UVI {:.1}  {}",
            format_time(center.sample.time, tz),
            center.sample.uvi,
            center.risk.label()
        );
        if let Some(minutes) = center.burn_minutes {
            let _ = write!(out, "  Burn in {}m", minutes);
        }
        let _ = writeln!(out);
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Location: {}", state.settings.location_label());
    if let Some(updated) = state.last_updated {
        let _ = writeln!(out, "Last updated: {}", format_timestamp(updated, tz));
    }
}

pub fn render_settings(state: &AppState) -> String {
    let mut out = String::new();
    let settings: &Settings = &state.settings;

    let _ = writeln!(out, "Settings");
    let _ = writeln!(out, "  Latitude:  {}", settings.latitude);
    let _ = writeln!(out, "  Longitude: {}", settings.longitude);
    let _ = writeln!(out, "  Skin type:");
    for skin in SkinType::ALL {
        let marker = if settings.skin() == Some(skin) { "*" } else { " " };
        let _ = writeln!(out, "   {} {} {}", marker, skin.code(), skin.description());
    }

    if !state.form_issues.is_empty() {
        let _ = writeln!(out);
        for issue in &state.form_issues {
            let _ = writeln!(out, "  - {}", issue);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "About the Fitzpatrick Scale");
    let _ = writeln!(
        out,
        "  The Fitzpatrick scale classifies skin by how it reacts to UV light."
    );
    for skin in SkinType::ALL {
        let _ = writeln!(out, "  {}", skin.description());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Event;
    use chrono::FixedOffset;
    use sunsafe_uv::UvSample;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, minute, 0).unwrap()
    }

    fn sample(day: u32, hour: u32, uvi: f64) -> UvSample {
        UvSample {
            time: at(day, hour, 0),
            uvi,
        }
    }

    fn content_state(data: UvDataset) -> AppState {
        let mut state = AppState::new();
        state.update(Event::Started {
            settings: Settings::new("40.0", "-73.0", "2"),
        });
        state.update(Event::CacheLoaded(Some((data, at(1, 12, 5)))));
        state
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(at(1, 0, 5), &Utc), "12:05 AM");
        assert_eq!(format_time(at(1, 12, 0), &Utc), "12:00 PM");
        assert_eq!(format_time(at(1, 14, 30), &Utc), "2:30 PM");

        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(format_time(at(1, 14, 30), &minus_five), "9:30 AM");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(at(1, 14, 5), &Utc), "Jun 1, 02:05 PM");
    }

    #[test]
    fn test_readout_minutes_when_uv_high() {
        let data = UvDataset {
            now: sample(1, 12, 7.0),
            history: vec![],
            forecast: vec![],
        };
        let readout = readout(&data, Some(SkinType::II), at(1, 12, 0), &Utc);
        assert_eq!(readout.text, "23 min");
        assert!(!readout.low_uv);
    }

    #[test]
    fn test_readout_safe_until_today() {
        let data = UvDataset {
            now: sample(1, 8, 1.0),
            history: vec![],
            forecast: vec![sample(1, 9, 2.0), sample(1, 10, 3.5)],
        };
        let readout = readout(&data, Some(SkinType::II), at(1, 8, 0), &Utc);
        assert_eq!(readout.text, "Safe until 10:00 AM today");
        assert!(readout.low_uv);
    }

    #[test]
    fn test_readout_safe_until_tomorrow() {
        let data = UvDataset {
            now: sample(1, 21, 0.0),
            history: vec![],
            forecast: vec![sample(2, 9, 3.0)],
        };
        let readout = readout(&data, Some(SkinType::II), at(1, 21, 0), &Utc);
        assert_eq!(readout.text, "Safe until 9:00 AM tomorrow");
    }

    #[test]
    fn test_readout_low_uv_without_future_peak() {
        let data = UvDataset {
            now: sample(1, 18, 1.0),
            history: vec![],
            forecast: vec![sample(1, 19, 0.5)],
        };
        // 200 / 1.5 = 133.3
        let readout = readout(&data, Some(SkinType::I), at(1, 18, 0), &Utc);
        assert_eq!(readout.text, "133 min");
        assert!(readout.low_uv);
    }

    #[test]
    fn test_home_content() {
        let state = content_state(UvDataset {
            now: sample(1, 12, 7.0),
            history: vec![sample(1, 11, 6.0)],
            forecast: vec![sample(1, 13, 7.5)],
        });
        let text = render(&state, at(1, 12, 10), &Utc);

        assert!(text.contains("[Home]"));
        assert!(text.contains("23 min"));
        assert!(text.contains("Type II (Fair)"));
        assert!(text.contains("12:00 PM  UVI 7.0  High UV  Burn in 23m"));
        assert!(text.contains("Location: 40.0, -73.0"));
        assert!(text.contains("Last updated: Jun 1, 12:05 PM"));
    }

    #[test]
    fn test_home_placeholders() {
        let mut state = AppState::new();
        assert!(render_home(&state, at(1, 12, 0), &Utc).contains("Settings Required"));

        state.settings = Settings::new("1", "2", "3");
        assert!(render_home(&state, at(1, 12, 0), &Utc).contains("No UV data available"));

        state.update(Event::RefreshRequested);
        assert!(render_home(&state, at(1, 12, 0), &Utc).contains("Loading"));
    }

    #[test]
    fn test_settings_tab() {
        let mut state = AppState::new();
        state.settings = Settings::new("47.6", "-122.3", "3");
        state.tab = Tab::Settings;
        let text = render(&state, at(1, 12, 0), &Utc);

        assert!(text.contains("[Settings]"));
        assert!(text.contains("Latitude:  47.6"));
        assert!(text.contains("* 3 Type III - Medium, burns moderately"));
        assert!(text.contains("About the Fitzpatrick Scale"));
    }
}
