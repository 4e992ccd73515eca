use chrono::{DateTime, TimeZone};

pub const RUN_MESSAGE: &str = "Automated test run";

/// Long date and 24-hour time, e.g. `19 October 2026, 14:03:05`.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-d %B %Y, %H:%M:%S").to_string()
}

/// `"<suite name> - <timestamp> - (Automated test run)"`
pub fn run_name(suite_name: &str, timestamp: &str) -> String {
    format!("{suite_name} - {timestamp} - ({RUN_MESSAGE})")
}
