//! Data models for checklist compilation
//!
//! This module contains the core data structures for representing a single
//! extracted eBird checklist, the taxonomy reference table, and the compiled
//! multi-checklist summary.

use crate::constants::{self, protocols};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Checklist Fields
// =============================================================================

/// Checklist fields, in the order the extractor looks for them
///
/// Used to report which field was being sought when extraction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecklistField {
    Date,
    Location,
    Participants,
    ObservationMethod,
    Duration,
    Distance,
    SpeciesList,
}

impl std::fmt::Display for ChecklistField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChecklistField::Date => "date",
            ChecklistField::Location => "location",
            ChecklistField::Participants => "participants",
            ChecklistField::ObservationMethod => "observation method",
            ChecklistField::Duration => "duration",
            ChecklistField::Distance => "distance",
            ChecklistField::SpeciesList => "species list",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// Observation Method
// =============================================================================

/// eBird observation protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationMethod {
    Traveling,
    Stationary,
    Incidental,
    Other,
}

impl ObservationMethod {
    /// Map the protocol text shown on a checklist page to a method
    ///
    /// Unrecognized protocols (area, banding, nocturnal flight call, ...) map
    /// to `Other` rather than failing.
    pub fn from_protocol(protocol: &str) -> Self {
        match protocol {
            protocols::TRAVELING => ObservationMethod::Traveling,
            protocols::STATIONARY => ObservationMethod::Stationary,
            protocols::INCIDENTAL => ObservationMethod::Incidental,
            _ => ObservationMethod::Other,
        }
    }

    /// Whether checklists with this method carry a duration badge
    pub fn has_duration(&self) -> bool {
        matches!(
            self,
            ObservationMethod::Traveling | ObservationMethod::Stationary
        )
    }

    /// Whether checklists with this method carry a distance badge
    pub fn has_distance(&self) -> bool {
        matches!(self, ObservationMethod::Traveling)
    }
}

impl std::fmt::Display for ObservationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObservationMethod::Traveling => "Traveling",
            ObservationMethod::Stationary => "Stationary",
            ObservationMethod::Incidental => "Incidental",
            ObservationMethod::Other => "Other",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// Species and Checklist Records
// =============================================================================

/// One species line from a checklist or summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    /// Common name exactly as shown on the page (may include a subspecies group)
    pub name: String,

    /// Number of individuals; 0 means present but not counted ("X")
    pub count: u32,

    /// Taxonomic sequence key resolved from the taxonomy table
    pub taxonomic_order: u32,
}

impl SpeciesEntry {
    pub fn new(name: impl Into<String>, count: u32, taxonomic_order: u32) -> Self {
        Self {
            name: name.into(),
            count,
            taxonomic_order,
        }
    }

    /// True when the observer reported presence without a number
    pub fn is_uncounted(&self) -> bool {
        self.count == 0
    }

    /// Count as shown in reports: the number, or "X" when uncounted
    pub fn display_count(&self) -> String {
        if self.is_uncounted() {
            constants::UNCOUNTED_TOKEN.to_string()
        } else {
            self.count.to_string()
        }
    }

    /// Whether this entry is a spuh ("duck sp.") or slash ("Greater/Lesser Scaup")
    pub fn is_spuh_or_slash(&self) -> bool {
        is_spuh_or_slash(&self.name)
    }
}

/// Whether a (stripped) name denotes genus-level or either-of-two uncertainty
pub fn is_spuh_or_slash(name: &str) -> bool {
    name.contains(constants::SPUH_MARKER) || name.contains(constants::SLASH_MARKER)
}

/// Structured record extracted from one checklist page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistRecord {
    /// Checklist identifier (e.g. "S76543210")
    pub identifier: String,

    /// Observation date
    pub date: NaiveDate,

    /// Location (hotspot or personal location) name
    pub location: String,

    /// Owner first, then other participants in page order
    pub participants: Vec<String>,

    pub observation_method: ObservationMethod,

    /// Effort duration in minutes (0 when the method has no duration)
    pub duration_minutes: f64,

    /// Effort distance in kilometers (0 unless traveling)
    pub distance_km: f64,

    /// Species in page order, shared sub-lists already merged
    pub species: Vec<SpeciesEntry>,
}

impl ChecklistRecord {
    /// Whether the anonymous participant appears on this checklist
    pub fn has_anonymous_participant(&self) -> bool {
        self.participants
            .iter()
            .any(|p| p == constants::ANONYMOUS_PARTICIPANT)
    }

    /// Total individuals on this checklist (uncounted entries contribute 0)
    pub fn total_individuals(&self) -> u64 {
        self.species.iter().map(|s| s.count as u64).sum()
    }
}

// =============================================================================
// Taxonomy
// =============================================================================

/// eBird taxonomy category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxonomyCategory {
    Species,
    Hybrid,
    Spuh,
    Slash,
    IdentifiableSubSpecificGroup,
    Intergrade,
    Domestic,
    Form,
}

impl FromStr for TaxonomyCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "species" => Ok(TaxonomyCategory::Species),
            "hybrid" => Ok(TaxonomyCategory::Hybrid),
            "spuh" => Ok(TaxonomyCategory::Spuh),
            "slash" => Ok(TaxonomyCategory::Slash),
            "issf" => Ok(TaxonomyCategory::IdentifiableSubSpecificGroup),
            "intergrade" => Ok(TaxonomyCategory::Intergrade),
            "domestic" => Ok(TaxonomyCategory::Domestic),
            "form" => Ok(TaxonomyCategory::Form),
            _ => Err(Error::taxonomy(format!(
                "Invalid taxonomy category '{}': expected species, hybrid, spuh, slash, issf, intergrade, domestic or form",
                s
            ))),
        }
    }
}

/// One row of the taxonomy reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    /// Taxonomic sequence key (TAXON_ORDER)
    pub sequence_key: u32,
    pub category: TaxonomyCategory,
    pub species_code: String,
    /// Lookup key (PRIMARY_COM_NAME)
    pub common_name: String,
    pub scientific_name: String,
    pub order: String,
    pub family: String,
    pub species_group: String,
    pub report_as: String,
}

// =============================================================================
// Summary
// =============================================================================

/// Summary of a batch of checklists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Distinct participants in first-seen order
    pub participants: Vec<String>,

    /// More than one checklist carried the anonymous participant, so the
    /// participant count may under-represent distinct people
    pub includes_multiple_anonymous_contributors: bool,

    pub total_distance_km: f64,
    pub total_minutes: f64,
    pub distinct_location_count: usize,

    /// Species with subspecies groups folded in, sorted taxonomically
    pub species: Vec<SpeciesEntry>,
}

impl SummaryRecord {
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn total_distance_miles(&self) -> f64 {
        self.total_distance_km * constants::MILES_PER_KM
    }

    /// Sum of all counts (uncounted entries contribute 0)
    pub fn total_individuals(&self) -> u64 {
        self.species.iter().map(|s| s.count as u64).sum()
    }

    /// Split the species list into (full species, other taxa)
    ///
    /// Spuhs and slashes are reported as "other taxa" rather than species.
    pub fn species_counts(&self) -> (usize, usize) {
        let other_taxa = self.species.iter().filter(|s| s.is_spuh_or_slash()).count();
        (self.species.len() - other_taxa, other_taxa)
    }
}
