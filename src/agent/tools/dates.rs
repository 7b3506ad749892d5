//! Expiry dates as the model tends to write them.

use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RELATIVE_DATE: Regex =
        Regex::new(r"^in\s+(\d+)\s+(day|week|month|year)s?$").unwrap();
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DD` dates and a few relative
/// phrases ("today", "tomorrow", "next week", "in 3 months"). Dates without a
/// time resolve to midnight UTC.
pub fn parse_expiry_date(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = input.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(start_of_day(date));
    }

    let phrase = text.to_lowercase();
    let today = now.date_naive();
    let date = match phrase.as_str() {
        "today" => Some(today),
        "tomorrow" => shift(today, 1, "day"),
        "next week" => shift(today, 1, "week"),
        "next month" => shift(today, 1, "month"),
        "next year" => shift(today, 1, "year"),
        _ => {
            let caps = RELATIVE_DATE.captures(&phrase)?;
            let amount = caps[1].parse::<u32>().ok()?;
            shift(today, amount, &caps[2])
        }
    };
    date.map(start_of_day)
}

fn shift(date: NaiveDate, amount: u32, unit: &str) -> Option<NaiveDate> {
    match unit {
        "day" => date.checked_add_days(Days::new(amount.into())),
        "week" => date.checked_add_days(Days::new(u64::from(amount) * 7)),
        "month" => date.checked_add_months(Months::new(amount)),
        "year" => date.checked_add_months(Months::new(amount.checked_mul(12)?)),
        _ => None,
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
