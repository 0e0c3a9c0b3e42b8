//! Field parsing utilities for checklist page tokens
//!
//! This module converts the raw text captured between page markers into typed
//! values: dates, effort durations and distances, and species counts. Every
//! parser returns `Error::DataValidation` on malformed input; the extractor
//! attaches the checklist identifier and field name.

use crate::constants::{self, KM_PER_MILE, MINUTES_PER_HOUR};
use crate::{Error, Result};
use chrono::NaiveDate;

/// Parse the observation date from a `datetime` attribute value
///
/// Accepts `YYYY-MM-DD` optionally followed by a time part
/// (`2020-10-24T07:15`); the time is ignored.
pub fn parse_date(token: &str) -> Result<NaiveDate> {
    let date_part = token.split('T').next().unwrap_or_default().trim();

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
        Error::data_validation(format!(
            "Invalid date format '{}' (expected 'YYYY-MM-DD'): {}",
            token, e
        ))
    })
}

/// Parse an effort duration badge into minutes
///
/// Recognized forms:
/// - `"45 min"` → 45
/// - `"2 h"` / `"2 hr"` → 120
/// - `"1 h, 30 min"` → 90
pub fn parse_duration(token: &str) -> Result<f64> {
    let token = token.trim();
    let (value, rest) = split_leading_number(token)
        .map_err(|e| Error::data_validation(format!("Invalid duration '{}': {}", token, e)))?;
    let unit = rest.trim_start();

    if unit.starts_with('h') {
        let mut minutes = value * MINUTES_PER_HOUR;
        if let Some(comma) = unit.find(',') {
            let remainder = unit[comma + 1..].trim_start();
            let (extra, _) = split_leading_number(remainder).map_err(|e| {
                Error::data_validation(format!(
                    "Invalid minutes remainder in duration '{}': {}",
                    token, e
                ))
            })?;
            minutes += extra;
        }
        Ok(minutes)
    } else if unit.starts_with('m') {
        Ok(value)
    } else {
        Err(Error::data_validation(format!(
            "Unrecognized duration unit in '{}' (expected hours or minutes)",
            token
        )))
    }
}

/// Parse an effort distance badge into kilometers
///
/// `"2.5 mi"` is converted to kilometers; `"3 km"` passes through.
pub fn parse_distance(token: &str) -> Result<f64> {
    let token = token.trim();
    let (value, rest) = split_leading_number(token)
        .map_err(|e| Error::data_validation(format!("Invalid distance '{}': {}", token, e)))?;
    let unit = rest.trim();

    if unit.starts_with("mi") {
        Ok(value * KM_PER_MILE)
    } else if unit.starts_with("km") {
        Ok(value)
    } else {
        Err(Error::data_validation(format!(
            "Unrecognized distance unit in '{}' (expected mi or km)",
            token
        )))
    }
}

/// Parse a species count; the token "X" means present but not counted (0)
pub fn parse_count(token: &str) -> Result<u32> {
    let token = token.trim();
    if token == constants::UNCOUNTED_TOKEN {
        return Ok(0);
    }

    token.parse::<u32>().map_err(|e| {
        Error::data_validation(format!("Invalid species count '{}': {}", token, e))
    })
}

/// Split a token into its leading decimal number and the remaining text
fn split_leading_number(token: &str) -> std::result::Result<(f64, &str), String> {
    let end = token
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(token.len());

    if end == 0 {
        return Err("no leading numeric value".to_string());
    }

    let value = token[..end]
        .parse::<f64>()
        .map_err(|e| format!("'{}' is not a number ({})", &token[..end], e))?;

    Ok((value, &token[end..]))
}

/// Normalize captured page text for use as a name
///
/// Decodes the HTML entities eBird emits in names (`Cooper&#39;s Hawk`),
/// collapses whitespace runs to one space and trims the ends.
pub fn clean_text(raw: &str) -> String {
    normalize_ws(&decode_entities(raw))
}

/// Collapse runs of whitespace into a single space and trim
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Decode named and numeric HTML character references
///
/// Unknown or malformed references are kept verbatim.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];

        // References are short; a distant ';' belongs to something else
        let decoded = candidate
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&candidate[1..semi]).map(|ch| (ch, semi)));

        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &candidate[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
