//! Observation date consistency checks
//!
//! A compiled summary normally covers one outing, so all checklists should
//! share a date. Checklists are grouped by a compact integer date code; when
//! more than one code appears, a [`DateWarning`] is produced. Warnings are
//! advisory and never stop aggregation.

use crate::constants::{
    DATE_CODE_BASE_YEAR, DATE_CODE_DAY_FACTOR, DATE_CODE_MONTH_FACTOR, DOMINANT_DATE_FRACTION,
};
use crate::app::models::ChecklistField;
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::warn;

/// Integer encoding of a calendar date: `(year - 1700) + month*1000 + day*100000`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DateCode(u32);

impl DateCode {
    /// Encode a date
    ///
    /// # Errors
    ///
    /// Returns `Error::DataValidation` for years outside 1701..=2699, which
    /// the three-digit year field cannot represent.
    pub fn encode(date: NaiveDate) -> Result<Self> {
        let year_offset = date.year() - DATE_CODE_BASE_YEAR;
        if !(1..DATE_CODE_MONTH_FACTOR as i32).contains(&year_offset) {
            return Err(Error::data_validation(format!(
                "Date {} is outside the encodable range (years {}..{})",
                date,
                DATE_CODE_BASE_YEAR + 1,
                DATE_CODE_BASE_YEAR + DATE_CODE_MONTH_FACTOR as i32
            )));
        }

        Ok(Self(
            year_offset as u32
                + date.month() * DATE_CODE_MONTH_FACTOR
                + date.day() * DATE_CODE_DAY_FACTOR,
        ))
    }

    /// Decode back into a calendar date
    pub fn decode(self) -> Result<NaiveDate> {
        let year = (self.0 % DATE_CODE_MONTH_FACTOR) as i32 + DATE_CODE_BASE_YEAR;
        let month = (self.0 % DATE_CODE_DAY_FACTOR) / DATE_CODE_MONTH_FACTOR;
        let day = self.0 / DATE_CODE_DAY_FACTOR;

        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| Error::data_validation(format!("Invalid date code {}", self.0)))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for DateCode {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        let code = Self(value);
        code.decode()?;
        Ok(code)
    }
}

/// Advisory warning about checklists from different dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateWarning {
    /// One date covers most checklists; the rest are probably mistakes
    LikelyErroneous {
        dominant_date: NaiveDate,
        identifiers: Vec<String>,
    },

    /// No date dominates; checklist count per date
    MixedDates { breakdown: Vec<(NaiveDate, usize)> },
}

impl std::fmt::Display for DateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateWarning::LikelyErroneous {
                dominant_date,
                identifiers,
            } => write!(
                f,
                "Most checklists are from {}; these may have the wrong date: {}",
                dominant_date,
                identifiers.join(", ")
            ),
            DateWarning::MixedDates { breakdown } => {
                write!(f, "Checklists span {} dates:", breakdown.len())?;
                for (date, count) in breakdown {
                    write!(f, "\n  {}: {} checklist(s)", date, count)?;
                }
                Ok(())
            }
        }
    }
}

/// Checklist identifiers grouped by date code, in first-seen order
#[derive(Debug, Default)]
pub struct DateGroups {
    groups: Vec<(DateCode, NaiveDate, Vec<String>)>,
    total: usize,
}

impl DateGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one checklist's date
    ///
    /// # Errors
    ///
    /// Returns `Error::Extraction` naming the checklist and its date field
    /// when the date cannot be encoded.
    pub fn add(&mut self, identifier: &str, date: NaiveDate) -> Result<()> {
        let code = DateCode::encode(date)
            .map_err(|e| Error::extraction(identifier, ChecklistField::Date, e.to_string()))?;
        match self.groups.iter_mut().find(|(c, _, _)| *c == code) {
            Some((_, _, identifiers)) => identifiers.push(identifier.to_string()),
            None => self.groups.push((code, date, vec![identifier.to_string()])),
        }
        self.total += 1;
        Ok(())
    }

    pub fn record_count(&self) -> usize {
        self.total
    }

    pub fn distinct_dates(&self) -> usize {
        self.groups.len()
    }

    /// Warning for the current grouping, or `None` when all dates agree
    pub fn warning(&self) -> Option<DateWarning> {
        if self.distinct_dates() < 2 {
            return None;
        }

        let (_, dominant_date, dominant_ids) = self
            .groups
            .iter()
            .max_by_key(|(_, _, identifiers)| identifiers.len())?;

        let warning = if dominant_ids.len() as f64 > self.total as f64 * DOMINANT_DATE_FRACTION {
            DateWarning::LikelyErroneous {
                dominant_date: *dominant_date,
                identifiers: self
                    .groups
                    .iter()
                    .filter(|(_, date, _)| date != dominant_date)
                    .flat_map(|(_, _, identifiers)| identifiers.iter().cloned())
                    .collect(),
            }
        } else {
            DateWarning::MixedDates {
                breakdown: self
                    .groups
                    .iter()
                    .map(|(_, date, identifiers)| (*date, identifiers.len()))
                    .collect(),
            }
        };

        warn!("{}", warning);
        Some(warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_code_encoding() {
        assert_eq!(DateCode::encode(date(2020, 10, 24)).unwrap().value(), 2_410_320);
        assert_eq!(DateCode::encode(date(1701, 1, 1)).unwrap().value(), 101_001);
    }

    #[test]
    fn test_date_code_round_trip() {
        for d in [
            date(1701, 1, 1),
            date(1999, 12, 31),
            date(2020, 2, 29),
            date(2020, 10, 24),
            date(2699, 6, 15),
        ] {
            assert_eq!(DateCode::encode(d).unwrap().decode().unwrap(), d);
        }
    }

    #[test]
    fn test_date_code_rejects_unencodable_years() {
        assert!(DateCode::encode(date(1700, 5, 5)).is_err());
        assert!(DateCode::encode(date(1650, 5, 5)).is_err());
        assert!(DateCode::encode(date(2700, 1, 1)).is_err());
    }

    #[test]
    fn test_date_code_try_from_validates() {
        assert!(DateCode::try_from(2_410_320).is_ok());
        // Month 13
        assert!(DateCode::try_from(2_413_320).is_err());
    }

    #[test]
    fn test_single_date_has_no_warning() {
        let mut groups = DateGroups::new();
        groups.add("S1", date(2020, 10, 24)).unwrap();
        groups.add("S2", date(2020, 10, 24)).unwrap();

        assert_eq!(groups.distinct_dates(), 1);
        assert!(groups.warning().is_none());
    }

    #[test]
    fn test_dominant_date_flags_minority() {
        let mut groups = DateGroups::new();
        for id in ["S1", "S2", "S3", "S4", "S5"] {
            groups.add(id, date(2020, 10, 24)).unwrap();
        }
        groups.add("S6", date(2020, 10, 23)).unwrap();

        assert_eq!(
            groups.warning(),
            Some(DateWarning::LikelyErroneous {
                dominant_date: date(2020, 10, 24),
                identifiers: vec!["S6".to_string()],
            })
        );
    }

    #[test]
    fn test_exactly_eighty_percent_is_a_breakdown() {
        let mut groups = DateGroups::new();
        for id in ["S1", "S2", "S3", "S4"] {
            groups.add(id, date(2020, 10, 24)).unwrap();
        }
        groups.add("S5", date(2020, 10, 25)).unwrap();

        let warning = groups.warning().unwrap();
        assert_eq!(
            warning,
            DateWarning::MixedDates {
                breakdown: vec![(date(2020, 10, 24), 4), (date(2020, 10, 25), 1)],
            }
        );
        assert!(warning.to_string().contains("2020-10-25: 1 checklist(s)"));
    }

    #[test]
    fn test_unencodable_date_names_the_checklist() {
        let mut groups = DateGroups::new();

        let err = groups.add("S42", date(1650, 5, 5)).unwrap_err();

        assert_eq!(err.failed_field(), Some(ChecklistField::Date));
        assert!(err.to_string().contains("S42"));
        assert_eq!(groups.record_count(), 0);
    }

    #[test]
    fn test_even_split_is_a_breakdown() {
        let mut groups = DateGroups::new();
        groups.add("S1", date(2020, 10, 24)).unwrap();
        groups.add("S2", date(2021, 1, 1)).unwrap();

        assert!(matches!(
            groups.warning(),
            Some(DateWarning::MixedDates { .. })
        ));
    }
}
