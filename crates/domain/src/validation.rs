// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

const DATE_TIME_MINUTES: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const DATE_TIME_SECONDS: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const DATE_ONLY: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Trims `input` and rejects it if nothing remains.
///
/// # Errors
///
/// Returns `DomainError::MissingField(field)` if the trimmed input is empty.
pub fn require_text(input: &str, field: &'static str) -> Result<String, DomainError> {
    let trimmed: &str = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Trims `input` and returns `None` if nothing remains.
#[must_use]
pub fn optional_text(input: &str) -> Option<String> {
    let trimmed: &str = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parses a decimal amount typed by a user.
///
/// Leading and trailing whitespace is ignored. Infinite and NaN values
/// are rejected.
///
/// # Errors
///
/// Returns `error` if the input is not a finite number.
pub fn parse_amount(input: &str, error: DomainError) -> Result<f64, DomainError> {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(error),
    }
}

/// Parses an optional decimal amount; blank input yields `None`.
///
/// # Errors
///
/// Returns `error` if the input is non-blank and not a finite number.
pub fn parse_optional_amount(input: &str, error: DomainError) -> Result<Option<f64>, DomainError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_amount(input, error).map(Some)
}

/// Parses a `YYYY-MM-DDTHH:MM` or `YYYY-MM-DDTHH:MM:SS` value.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateTime` if neither layout matches.
pub fn parse_date_time(input: &str, field: &'static str) -> Result<PrimitiveDateTime, DomainError> {
    let trimmed: &str = input.trim();
    PrimitiveDateTime::parse(trimmed, DATE_TIME_SECONDS)
        .or_else(|_| PrimitiveDateTime::parse(trimmed, DATE_TIME_MINUTES))
        .map_err(|_| DomainError::InvalidDateTime {
            field,
            value: trimmed.to_string(),
        })
}

/// Normalizes an optional date-time input to `YYYY-MM-DDTHH:MM:SS`.
///
/// Minute-precision inputs (as produced by date-time pickers) gain `:00`.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateTime` if a non-blank input does not parse.
pub fn normalize_date_time(
    input: &str,
    field: &'static str,
) -> Result<Option<(PrimitiveDateTime, String)>, DomainError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    let parsed: PrimitiveDateTime = parse_date_time(input, field)?;
    Ok(Some((parsed, format_date_time(parsed))))
}

/// Parses a history filter bound given as a date or a date-time.
///
/// A bare date is treated as midnight.
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` if the input matches neither layout.
pub fn parse_filter_bound(
    input: &str,
    field: &'static str,
) -> Result<PrimitiveDateTime, DomainError> {
    let trimmed: &str = input.trim();
    if let Ok(date_time) = parse_date_time(trimmed, field) {
        return Ok(date_time);
    }
    Date::parse(trimmed, DATE_ONLY)
        .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
        .map_err(|_| DomainError::InvalidDate {
            field,
            value: trimmed.to_string(),
        })
}

/// Parses an optional filter bound; `None` and blank input yield `None`.
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` if a non-blank input does not parse.
pub fn parse_optional_bound(
    input: Option<&str>,
    field: &'static str,
) -> Result<Option<PrimitiveDateTime>, DomainError> {
    input
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_filter_bound(raw, field))
        .transpose()
}

/// Formats a date-time as `YYYY-MM-DDTHH:MM:SS`.
#[must_use]
pub fn format_date_time(value: PrimitiveDateTime) -> String {
    let date: Date = value.date();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        date.year(),
        u8::from(date.month()),
        date.day(),
        value.hour(),
        value.minute(),
        value.second()
    )
}

/// Cuts a backend timestamp down to the `YYYY-MM-DDTHH:MM` form used for editing.
#[must_use]
pub fn to_date_time_input(value: Option<&str>) -> String {
    value
        .map(|raw| raw.chars().take(16).collect())
        .unwrap_or_default()
}
