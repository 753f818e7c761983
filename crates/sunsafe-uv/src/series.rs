//! Lookups over the merged, time-sorted UV series.

use chrono::{DateTime, Days, Duration, NaiveTime, TimeZone, Timelike, Utc};

use crate::types::UvSample;

/// First local hour shown on the dial
pub const WINDOW_START_HOUR: u32 = 7;
/// From this local hour on, the dial shows tomorrow
pub const WINDOW_ROLLOVER_HOUR: u32 = 18;
pub const WINDOW_HOURS: i64 = 12;

/// Sample closest in time to `target`; ties go to the earlier entry.
/// `None` only for an empty slice.
pub fn find_closest(points: &[UvSample], target: DateTime<Utc>) -> Option<UvSample> {
    let mut best: Option<(UvSample, i64)> = None;
    for point in points {
        let diff = (point.time - target).num_milliseconds().abs();
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((*point, diff)),
        }
    }
    best.map(|(point, _)| point)
}

/// First sample strictly after `after` whose UV index exceeds `threshold`
pub fn next_above(points: &[UvSample], after: DateTime<Utc>, threshold: f64) -> Option<UvSample> {
    points
        .iter()
        .filter(|p| p.time > after && p.uvi > threshold)
        .min_by_key(|p| p.time)
        .copied()
}

/// 12-hour clock position (1..=12) of `time` in `tz`
pub fn clock_hour<Tz: TimeZone>(time: DateTime<Utc>, tz: &Tz) -> u32 {
    match time.with_timezone(tz).hour() % 12 {
        0 => 12,
        h => h,
    }
}

/// The 12 hours of samples the dial shows: 07:00 to 19:00 local
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DisplayWindow {
    /// Today's window, or tomorrow's once the local time reaches 18:00
    pub fn for_now<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let mut date = now.date_naive();
        if now.hour() >= WINDOW_ROLLOVER_HOUR {
            date = date.checked_add_days(Days::new(1)).unwrap_or(date);
        }

        let start_time = NaiveTime::from_hms_opt(WINDOW_START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
        let naive = date.and_time(start_time);
        let start = tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive));

        Self {
            start,
            end: start + Duration::hours(WINDOW_HOURS),
        }
    }

    /// Half-open: `start <= time < end`
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        time >= self.start && time < self.end
    }

    pub fn filter(&self, points: &[UvSample]) -> Vec<UvSample> {
        points.iter().filter(|p| self.contains(p.time)).copied().collect()
    }

    /// Absolute time of a dial position (1..=12). Each position appears
    /// exactly once in the window: 7..=11 morning, 12 noon, 1..=6 afternoon.
    pub fn slot_time(&self, clock_hour: u32) -> DateTime<Utc> {
        let position = clock_hour % 12;
        let offset = (position + 12 - WINDOW_START_HOUR % 12) % 12;
        self.start + Duration::hours(i64::from(offset))
    }
}
