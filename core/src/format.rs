//! Display helpers for health values and dates.
//!
//! All functions are pure. The clock-dependent ones come in pairs: the plain
//! name reads the local clock, the `_at` variant takes `now` explicitly.
//!
//! Date inputs may be RFC 3339 timestamps (converted to local time), naive
//! date-times (taken as local time) or plain `YYYY-MM-DD` dates (local
//! midnight). Anything else renders as `"Invalid Date"` and never counts as
//! upcoming or past.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};

pub const INVALID_DATE: &str = "Invalid Date";

pub const DEFAULT_UPCOMING_WINDOW_DAYS: i64 = 7;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a date or date-time string into local wall-clock time.
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// `"Jan 15, 2024"`.
pub fn format_date(input: &str) -> String {
    match parse_timestamp(input) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// `"Jan 15, 2024, 10:30 AM"`.
pub fn format_date_time(input: &str) -> String {
    match parse_timestamp(input) {
        Some(dt) => dt.format("%b %-d, %Y, %I:%M %p").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// A metric reading as it arrives from a form or the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading<'a> {
    Number(f64),
    /// Non-numeric input, rendered verbatim.
    Text(&'a str),
}

impl From<f64> for Reading<'_> {
    fn from(value: f64) -> Self {
        Reading::Number(value)
    }
}

impl From<i32> for Reading<'_> {
    fn from(value: i32) -> Self {
        Reading::Number(f64::from(value))
    }
}

impl<'a> From<&'a str> for Reading<'a> {
    fn from(value: &'a str) -> Self {
        Reading::Text(value)
    }
}

/// Numbers get exactly one decimal place; text passes through untouched.
pub fn format_metric_value<'a>(value: impl Into<Reading<'a>>, unit: &str) -> String {
    match value.into() {
        Reading::Number(n) => format!("{} {unit}", to_fixed_1(n)),
        Reading::Text(text) => format!("{text} {unit}"),
    }
}

pub fn format_lab_value(value: &str, unit: &str, reference_range: Option<&str>) -> String {
    match reference_range.filter(|r| !r.is_empty()) {
        Some(range) => format!("{value} {unit} (Ref: {range})"),
        None => format!("{value} {unit}"),
    }
}

pub fn format_blood_pressure(systolic: f64, diastolic: f64) -> String {
    format!("{}/{} mmHg", js_number(systolic), js_number(diastolic))
}

/// Body-mass index from kilograms and centimetres. A zero height yields
/// infinity.
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Share of the distance from `start` to `target` covered by `current`,
/// as a whole percentage. A goal whose target equals its start is complete.
pub fn format_goal_progress(current: f64, target: f64, start: f64) -> String {
    let total_change = target - start;
    if total_change == 0.0 {
        return "100%".to_string();
    }
    let progress = (current - start) / total_change * 100.0;
    // half-up, matching how browsers round percentages
    format!("{}%", js_number((progress + 0.5).floor()))
}

pub fn is_upcoming_date(input: &str, days_ahead: Option<i64>) -> bool {
    is_upcoming_date_at(
        input,
        days_ahead.unwrap_or(DEFAULT_UPCOMING_WINDOW_DAYS),
        local_now(),
    )
}

/// True iff `now <= date <= now + days_ahead days`.
pub fn is_upcoming_date_at(input: &str, days_ahead: i64, now: NaiveDateTime) -> bool {
    let Some(date) = parse_timestamp(input) else {
        return false;
    };
    let Some(horizon) = Duration::try_days(days_ahead).and_then(|d| now.checked_add_signed(d))
    else {
        return false;
    };
    date >= now && date <= horizon
}

pub fn is_past_date(input: &str) -> bool {
    is_past_date_at(input, local_now())
}

/// True iff the date falls strictly before local midnight of `now`'s day.
pub fn is_past_date_at(input: &str, now: NaiveDateTime) -> bool {
    match (parse_timestamp(input), now.date().and_hms_opt(0, 0, 0)) {
        (Some(date), Some(midnight)) => date < midnight,
        _ => false,
    }
}

pub fn get_relative_time(input: &str) -> String {
    get_relative_time_at(input, local_now())
}

/// Coarse "time ago" label. Every bucket floors; the unit word is always
/// plural except for the two named days.
pub fn get_relative_time_at(input: &str, now: NaiveDateTime) -> String {
    let Some(date) = parse_timestamp(input) else {
        return INVALID_DATE.to_string();
    };
    let days = (now - date).num_milliseconds().div_euclid(MILLIS_PER_DAY);
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{d} days ago"),
        d if d < 30 => format!("{} weeks ago", d / 7),
        d if d < 365 => format!("{} months ago", d / 30),
        d => format!("{} years ago", d / 365),
    }
}

/// One decimal, ties away from zero. A negative input keeps its sign even
/// when it rounds to zero (`-0.04` gives `"-0.0"`).
fn to_fixed_1(value: f64) -> String {
    if !value.is_finite() || value.abs() >= 1e21 {
        return js_number(value);
    }
    let magnitude = value.abs();
    // The only exact binary ties at one decimal are .25 and .75. `{:.1}`
    // rounds ties to even, which already lifts .75, so only .25 is adjusted.
    let digits = if magnitude.fract() == 0.25 {
        format!("{:.0}.3", magnitude.trunc())
    } else {
        format!("{magnitude:.1}")
    };
    if value < 0.0 {
        format!("-{digits}")
    } else {
        digits
    }
}

fn js_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(input: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn shifted(now: NaiveDateTime, days: i64) -> String {
        (now + Duration::days(days))
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    }

    #[test]
    fn formats_dates() {
        assert_eq!(format_date("2024-01-15T10:30:00"), "Jan 15, 2024");
        assert_eq!(format_date("2024-01-15"), "Jan 15, 2024");
        assert_eq!(format_date("not a date"), "Invalid Date");
    }

    #[test]
    fn formats_date_times() {
        let rendered = format_date_time("2024-01-15T10:30:00");
        assert!(rendered.contains("Jan 15, 2024"));
        assert!(rendered.contains("10:30"));
        assert_eq!(rendered, "Jan 15, 2024, 10:30 AM");
        assert_eq!(format_date_time(""), "Invalid Date");
    }

    #[test]
    fn metric_values_get_one_decimal() {
        assert_eq!(format_metric_value(123.456, "kg"), "123.5 kg");
        assert_eq!(format_metric_value(100, "bpm"), "100.0 bpm");
        assert_eq!(format_metric_value(98.0, "%"), "98.0 %");
    }

    #[test]
    fn metric_value_ties_round_away_from_zero() {
        assert_eq!(format_metric_value(0.25, "x"), "0.3 x");
        assert_eq!(format_metric_value(36.25, "°C"), "36.3 °C");
        assert_eq!(format_metric_value(1.25, "mmol/L"), "1.3 mmol/L");
        assert_eq!(format_metric_value(0.75, "x"), "0.8 x");
        assert_eq!(format_metric_value(-2.25, "x"), "-2.3 x");
        // 98.45 and 9.95 are not exact in binary: nearest wins
        assert_eq!(format_metric_value(98.45, "x"), "98.5 x");
        assert_eq!(format_metric_value(9.95, "x"), "9.9 x");
        assert_eq!(format_metric_value(0.96, "x"), "1.0 x");
    }

    #[test]
    fn small_negative_metric_values_keep_their_sign() {
        assert_eq!(format_metric_value(-0.04, "x"), "-0.0 x");
        assert_eq!(format_metric_value(-0.0, "x"), "0.0 x");
        assert_eq!(format_metric_value(-1.5, "x"), "-1.5 x");
    }

    #[test]
    fn non_numeric_metric_values_pass_through() {
        assert_eq!(format_metric_value("120.456", "mg/dL"), "120.456 mg/dL");
        assert_eq!(format_metric_value("n/a", "kg"), "n/a kg");
        assert_eq!(format_metric_value(f64::NAN, "kg"), "NaN kg");
    }

    #[test]
    fn lab_values_include_range_only_when_present() {
        assert_eq!(format_lab_value("5.4", "%", None), "5.4 %");
        assert_eq!(format_lab_value("5.4", "%", Some("")), "5.4 %");
        assert_eq!(
            format_lab_value("5.4", "%", Some("4.0-5.6")),
            "5.4 % (Ref: 4.0-5.6)"
        );
    }

    #[test]
    fn blood_pressure() {
        assert_eq!(format_blood_pressure(120.0, 80.0), "120/80 mmHg");
        assert_eq!(format_blood_pressure(135.0, 0.0), "135/0 mmHg");
    }

    #[test]
    fn bmi() {
        assert!((calculate_bmi(70.0, 175.0) - 22.86).abs() < 0.01);
        assert!(calculate_bmi(70.0, 0.0).is_infinite());
    }

    #[test]
    fn goal_progress() {
        assert_eq!(format_goal_progress(75.0, 80.0, 70.0), "50%");
        assert_eq!(format_goal_progress(80.0, 80.0, 70.0), "100%");
        assert_eq!(format_goal_progress(70.0, 70.0, 70.0), "100%");
        assert_eq!(format_goal_progress(12.0, 70.0, 70.0), "100%");
        // weight-loss goal: start above target
        assert_eq!(format_goal_progress(85.0, 80.0, 90.0), "50%");
        assert_eq!(format_goal_progress(70.5, 80.0, 70.0), "5%");
    }

    #[test]
    fn upcoming_dates() {
        let now = at("2024-03-10T12:00:00");
        assert!(is_upcoming_date_at(&shifted(now, 1), 7, now));
        assert!(!is_upcoming_date_at(&shifted(now, 10), 7, now));
        assert!(!is_upcoming_date_at(&shifted(now, -1), 7, now));
        assert!(is_upcoming_date_at(&shifted(now, 15), 20, now));
        assert!(is_upcoming_date_at(&shifted(now, 7), 7, now));
        assert!(!is_upcoming_date_at("garbage", 7, now));
    }

    #[test]
    fn upcoming_date_uses_default_window() {
        let tomorrow = shifted(local_now(), 1);
        let later = shifted(local_now(), 10);
        assert!(is_upcoming_date(&tomorrow, None));
        assert!(!is_upcoming_date(&later, None));
        assert!(is_upcoming_date(&later, Some(20)));
    }

    #[test]
    fn past_dates_are_before_midnight() {
        let now = at("2024-03-10T12:00:00");
        assert!(is_past_date_at("2024-03-09T23:59:59", now));
        assert!(!is_past_date_at("2024-03-10T00:00:00", now));
        assert!(!is_past_date_at("2024-03-10", now));
        assert!(!is_past_date_at("2024-03-11", now));
        assert!(!is_past_date_at("", now));
    }

    #[test]
    fn relative_time_buckets() {
        let now = at("2024-03-10T12:00:00");
        assert_eq!(get_relative_time_at(&shifted(now, 0), now), "Today");
        assert_eq!(get_relative_time_at(&shifted(now, -1), now), "Yesterday");
        assert_eq!(get_relative_time_at(&shifted(now, -5), now), "5 days ago");
        assert_eq!(get_relative_time_at(&shifted(now, -14), now), "2 weeks ago");
        assert_eq!(get_relative_time_at(&shifted(now, -29), now), "4 weeks ago");
        assert_eq!(get_relative_time_at(&shifted(now, -60), now), "2 months ago");
        assert_eq!(get_relative_time_at(&shifted(now, -400), now), "1 years ago");
        assert_eq!(get_relative_time_at(&shifted(now, -800), now), "2 years ago");
    }

    #[test]
    fn relative_time_floors_partial_days() {
        let now = at("2024-03-10T12:00:00");
        assert_eq!(get_relative_time_at("2024-03-09T13:00:00", now), "Today");
        assert_eq!(get_relative_time_at("2024-03-09T11:00:00", now), "Yesterday");
        assert_eq!(get_relative_time_at("nope", now), "Invalid Date");
    }
}
