// Date helpers for the search form and booking summary.
// Values are local wall-clock times; nothing here looks at time zones.

use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const MS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextStyle {
    Long,
    Short,
    Narrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonthStyle {
    Long,
    Short,
    Narrow,
    Numeric,
    TwoDigit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumericStyle {
    Numeric,
    TwoDigit,
}

// Component selection for format_date, rendered with en-US conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFormatOptions {
    pub weekday: Option<TextStyle>,
    pub month: Option<MonthStyle>,
    pub day: Option<NumericStyle>,
    pub year: Option<NumericStyle>,
}

impl Default for DateFormatOptions {
    fn default() -> Self {
        Self {
            weekday: None,
            month: Some(MonthStyle::Long),
            day: Some(NumericStyle::Numeric),
            year: Some(NumericStyle::Numeric),
        }
    }
}

/// Midnight on the given calendar date. `month` is 1-based.
pub fn local_date(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day).and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn numeric(value: u32, style: NumericStyle) -> String {
    match style {
        NumericStyle::Numeric => value.to_string(),
        NumericStyle::TwoDigit => format!("{:02}", value % 100),
    }
}

fn year_part(year: i32, style: NumericStyle) -> String {
    match style {
        NumericStyle::Numeric => year.to_string(),
        NumericStyle::TwoDigit => format!("{:02}", year.rem_euclid(100)),
    }
}

fn text(name: &str, style: TextStyle) -> String {
    match style {
        TextStyle::Long => name.to_string(),
        TextStyle::Short => name.chars().take(3).collect(),
        TextStyle::Narrow => name.chars().take(1).collect(),
    }
}

/// Formats a date from the selected components, e.g. `May 15, 2023` with the defaults,
/// `Monday, May 15, 2023` with a long weekday or `5/15/2023` with a numeric month.
pub fn format_date<D: Datelike>(date: &D, options: &DateFormatOptions) -> String {
    let day = options.day.map(|style| numeric(date.day(), style));
    let year = options.year.map(|style| year_part(date.year(), style));
    let month_name = MONTH_NAMES[date.month0() as usize];

    let body = match options.month {
        Some(MonthStyle::Numeric) | Some(MonthStyle::TwoDigit) => {
            let style = if options.month == Some(MonthStyle::TwoDigit) {
                NumericStyle::TwoDigit
            } else {
                NumericStyle::Numeric
            };
            let parts: Vec<String> = [Some(numeric(date.month(), style)), day, year]
                .into_iter()
                .flatten()
                .collect();
            parts.join("/")
        }
        Some(textual) => {
            let style = match textual {
                MonthStyle::Short => TextStyle::Short,
                MonthStyle::Narrow => TextStyle::Narrow,
                _ => TextStyle::Long,
            };
            let month = text(month_name, style);
            match (day, year) {
                (Some(day), Some(year)) => format!("{month} {day}, {year}"),
                (Some(day), None) => format!("{month} {day}"),
                (None, Some(year)) => format!("{month} {year}"),
                (None, None) => month,
            }
        }
        None => [day, year].into_iter().flatten().collect::<Vec<_>>().join(" "),
    };

    match options.weekday {
        Some(style) => {
            let weekday = text(
                WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize],
                style,
            );
            if body.is_empty() {
                weekday
            } else {
                format!("{weekday}, {body}")
            }
        }
        None => body,
    }
}

/// Whole days from `a` to `b`, positive when `b` is later. Halves round up.
pub fn get_date_difference(a: NaiveDateTime, b: NaiveDateTime) -> i64 {
    let days = (b - a).num_milliseconds() as f64 / MS_PER_DAY;
    (days + 0.5).floor() as i64
}

pub fn is_date_in_past(date: &NaiveDateTime) -> bool {
    is_date_in_past_on(date, Local::now().date_naive())
}

// Compares calendar days only; the caller's value is not touched
pub fn is_date_in_past_on(date: &NaiveDateTime, today: NaiveDate) -> bool {
    date.date() < today
}

/// Calendar-day offset, keeping the time of day. Saturates at the ends of chrono's range.
pub fn add_days(date: NaiveDateTime, n: i64) -> NaiveDateTime {
    let offset = Days::new(n.unsigned_abs());
    let shifted = if n >= 0 {
        date.checked_add_days(offset)
    } else {
        date.checked_sub_days(offset)
    };

    shifted.unwrap_or(if n >= 0 {
        NaiveDateTime::MAX
    } else {
        NaiveDateTime::MIN
    })
}

/// `May 15 - 20, 2023`, `May 15 - June 10, 2023` or
/// `December 25, 2023 - January 5, 2024` depending on what the ends share.
pub fn format_date_range<D: Datelike>(start: &D, end: &D) -> String {
    let start_month = MONTH_NAMES[start.month0() as usize];
    let end_month = MONTH_NAMES[end.month0() as usize];

    if start.year() == end.year() && start.month() == end.month() {
        format!(
            "{start_month} {} - {}, {}",
            start.day(),
            end.day(),
            start.year()
        )
    } else if start.year() == end.year() {
        format!(
            "{start_month} {} - {end_month} {}, {}",
            start.day(),
            end.day(),
            start.year()
        )
    } else {
        let options = DateFormatOptions::default();
        format!(
            "{} - {}",
            format_date(start, &options),
            format_date(end, &options)
        )
    }
}
