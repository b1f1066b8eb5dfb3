//! Display formatting for document and masthead dates
//!
//! Documents carry their publication date as text in one of several formats,
//! as a numeric epoch, or not at all. Everything is normalized to
//! "Month Day, Year"; formatting never fails.

use crate::types::PublishedDate;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;

const DISPLAY_FORMAT: &str = "%B %-d, %Y";
const MASTHEAD_FORMAT: &str = "%A, %B %-d, %Y";

/// Parsers tried in order against textual dates
const TEXT_PARSERS: &[fn(&str) -> Option<String>] =
    &[parse_offset_timestamp, parse_utc_timestamp, parse_bare_date, parse_rfc3339];

/// Format a published date for an article byline
pub fn format_published_date(value: Option<&PublishedDate>) -> String {
    match value {
        Some(PublishedDate::Text(text)) => format_text_date(text),
        Some(PublishedDate::Epoch(seconds)) => format_epoch(*seconds),
        Some(PublishedDate::Unrecognized(other)) => {
            debug!("ignoring published_date of unexpected shape: {}", other);
            String::new()
        }
        None => String::new(),
    }
}

/// Format the run date for the masthead, e.g. "Monday, January 2, 2006"
pub fn format_masthead_date(date: NaiveDate) -> String {
    date.format(MASTHEAD_FORMAT).to_string()
}

fn format_text_date(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    TEXT_PARSERS.iter().find_map(|parse| parse(text)).unwrap_or_else(|| text.to_string())
}

fn format_epoch(seconds: f64) -> String {
    // Fractional seconds are truncated
    DateTime::from_timestamp(seconds as i64, 0)
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

/// Digit positions are `d`; everything else must match literally
const DATE_SHAPE: &str = "dddd-dd-dd";
const TIMESTAMP_SHAPE: &str = "dddd-dd-ddTdd:dd:dd";

/// chrono accepts unpadded fields; these layouts require the full width
fn has_shape(text: &str, shape: &str) -> bool {
    text.len() >= shape.len()
        && text.bytes().zip(shape.bytes()).all(|(c, s)| if s == b'd' { c.is_ascii_digit() } else { c == s })
}

fn parse_offset_timestamp(text: &str) -> Option<String> {
    // The offset must be written as +hh:mm
    if !has_shape(text, TIMESTAMP_SHAPE) || !text.get(text.len().saturating_sub(3)..)?.starts_with(':') {
        return None;
    }
    DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%:z").ok().map(|dt| dt.format(DISPLAY_FORMAT).to_string())
}

fn parse_utc_timestamp(text: &str) -> Option<String> {
    if !has_shape(text, TIMESTAMP_SHAPE) {
        return None;
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.fZ").ok().map(|dt| dt.format(DISPLAY_FORMAT).to_string())
}

fn parse_bare_date(text: &str) -> Option<String> {
    if text.len() != DATE_SHAPE.len() || !has_shape(text, DATE_SHAPE) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().map(|d| d.format(DISPLAY_FORMAT).to_string())
}

fn parse_rfc3339(text: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.format(DISPLAY_FORMAT).to_string())
}
