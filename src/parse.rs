//! Argument parsing shared by the CLI and the shell.
//!
//! Splits word lists into a free-text name plus `key=value` attributes, and
//! normalizes shorthand timestamps.

use crate::types::Attrs;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use eyre::Result;
use serde_json::Value;

/// Split tokens into a leading free-text name and key=value attributes.
///
/// A token containing `=` starts a pair; following tokens without `=`
/// extend that pair's value ("q=multi word value"). Tokens before the
/// first pair join into the name.
pub fn split_name_attrs(tokens: &[String]) -> (String, Attrs) {
    let mut name_words: Vec<&str> = Vec::new();
    let mut attrs = Attrs::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for token in tokens {
        match token.split_once('=') {
            Some((key, first)) => {
                if let Some((key, words)) = current.take() {
                    attrs.insert(key, Value::from(words.join(" ")));
                }
                current = Some((key.to_string(), vec![first.to_string()]));
            }
            None => match current.as_mut() {
                Some((_, words)) => words.push(token.clone()),
                None => name_words.push(token),
            },
        }
    }
    if let Some((key, words)) = current {
        attrs.insert(key, Value::from(words.join(" ")));
    }

    (name_words.join(" "), attrs)
}

/// Parse tokens that must all be key=value pairs.
///
/// Fails if a leading free-text run is present.
pub fn parse_key_values(tokens: &[String]) -> Result<Attrs> {
    let (name, attrs) = split_name_attrs(tokens);
    if !name.is_empty() {
        eyre::bail!("unexpected token '{}': expected key=value pairs", name);
    }
    Ok(attrs)
}

// Shorthand formats accepted for date entry, most specific first.
const DATETIME_FORMATS: &[&str] = &["%Y %b %d %H:%M", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y %b %d", "%Y-%m-%d", "%b %d"];
const TIME_FORMATS: &[&str] = &["%H:%M", "%I:%M %p"];

/// Parse a shorthand timestamp like "Oct 16", "14:02", or "2025 Oct 16".
///
/// Partial inputs borrow the missing parts from today: a bare date means
/// midnight, a bare time means today.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let today = Local::now().date_naive();

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
        // Formats without a year parse against the current one.
        let with_year = format!("{} {}", today.format("%Y"), s);
        let fmt_with_year = format!("%Y {}", fmt);
        if let Ok(date) = NaiveDate::parse_from_str(&with_year, &fmt_with_year) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }
    for fmt in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(s, fmt) {
            return Ok(today.and_time(time));
        }
    }
    // A bare number is a day in the current month: "16".
    if let Ok(day) = s.parse::<u32>()
        && let Some(date) = today.with_day(day)
    {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    eyre::bail!("Unable to parse '{}' as a timestamp", s)
}

/// Keys whose values are treated as dates on entry.
const DATE_KEYS: &[&str] = &["due"];

/// Canonicalize shorthand dates in the given attributes, in place.
///
/// Only string values under the date keys are touched; anything that fails
/// to parse is left as typed.
pub fn normalize_dates(attrs: &mut Attrs) {
    for key in DATE_KEYS {
        let parsed = match attrs.get(*key) {
            Some(Value::String(raw)) => parse_timestamp(raw).ok(),
            _ => None,
        };
        if let Some(dt) = parsed {
            attrs.insert(
                (*key).to_string(),
                Value::from(dt.format("%Y-%m-%d %H:%M").to_string()),
            );
        }
    }
}
