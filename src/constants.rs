//! Application constants for the eBird compiler
//!
//! This module contains the literal page markers, unit conversion factors,
//! default values and file formats used throughout the compiler.

// =============================================================================
// Checklist Page Markers
// =============================================================================

/// Literal markers that delimit fields on an eBird checklist page.
///
/// The extractor never parses HTML structure; it only searches for these
/// exact strings moving forward through the page.
pub mod markers {
    /// Opens the machine-readable observation date (`<time datetime="2020-10-24T07:15">`)
    pub const DATE_OPEN: &str = "<time datetime=\"";
    pub const DATE_CLOSE: &str = "\"";

    /// Label preceding the location name
    pub const LOCATION_LABEL: &str = "<h6 class=\"is-visuallyHidden\">Location</h6>";

    /// Generic span wrapping single values (location, owner, counts)
    pub const SPAN_OPEN: &str = "<span>";
    pub const SPAN_CLOSE: &str = "</span>";

    /// Label preceding the checklist owner's name
    pub const OWNER_LABEL: &str = "<h6 class=\"is-visuallyHidden\">Owner</h6>";

    /// Present only on shared checklists with more than one participant
    pub const OTHER_PARTICIPANTS_LABEL: &str = "Other participating eBirders";

    /// Opens the comma-separated list of other participants
    pub const PARTICIPANT_BREADCRUMB: &str = "<ul class=\"Breadcrumbs";

    /// Closes the participant list block
    pub const BLOCK_CLOSE: &str = "</ul>";

    /// Smaller span wrapping each additional participant name
    pub const PARTICIPANT_OPEN: &str = "<span class=\"Breadcrumbs-item\">";

    /// Titled span carrying the observation protocol
    pub const PROTOCOL_OPEN: &str = "<span title=\"Protocol\">";

    /// Titled badges carrying effort values
    pub const DURATION_OPEN: &str = "<span class=\"Badge\" title=\"Duration\">";
    pub const DISTANCE_OPEN: &str = "<span class=\"Badge\" title=\"Distance\">";

    /// Species list boundaries
    pub const SPECIES_LIST_START: &str = "<div class=\"Checklist-species\">";
    pub const SPECIES_LIST_END: &str = "<div class=\"Checklist-footer\">";

    /// Heading that starts a sub-list contributed by another shared participant
    pub const ADDITIONAL_SPECIES: &str = "<h3 class=\"Heading Heading--shared\">";

    /// One species observation section
    pub const SECTION_OPEN: &str = "<section class=\"Observation\">";
    pub const SECTION_CLOSE: &str = "</section>";

    /// Heading span carrying the species common name
    pub const SPECIES_NAME_OPEN: &str = "<span class=\"Heading-main\">";

    /// Label preceding the count span
    pub const NUMBER_OBSERVED_LABEL: &str = "<span class=\"is-visuallyHidden\">Number observed:</span>";
}

/// Protocol names exactly as they are matched on checklist pages
pub mod protocols {
    pub const TRAVELING: &str = "Traveling";
    pub const STATIONARY: &str = "Stationary";
    /// Matched verbatim, including the misspelling
    pub const INCIDENTAL: &str = "Incidential";
}

// =============================================================================
// Species and Participant Conventions
// =============================================================================

/// Participant name eBird substitutes for observers who hide their identity
pub const ANONYMOUS_PARTICIPANT: &str = "Anonymous eBirder";

/// Count token meaning "present, number not reported"
pub const UNCOUNTED_TOKEN: &str = "X";

/// Name fragments that mark a non-species taxon (genus-level or either/or)
pub const SPUH_MARKER: &str = "sp.";
pub const SLASH_MARKER: char = '/';

// =============================================================================
// Unit Conversions
// =============================================================================

/// Kilometers per statute mile
pub const KM_PER_MILE: f64 = 1.609344;

/// Miles per kilometer, as used in the printed report
pub const MILES_PER_KM: f64 = 0.621371;

pub const MINUTES_PER_HOUR: f64 = 60.0;

// =============================================================================
// Date Codes
// =============================================================================

/// Date code = (year - BASE_YEAR) + month * MONTH_FACTOR + day * DAY_FACTOR
pub const DATE_CODE_BASE_YEAR: i32 = 1700;
pub const DATE_CODE_MONTH_FACTOR: u32 = 1_000;
pub const DATE_CODE_DAY_FACTOR: u32 = 100_000;

/// A date shared by more than this share of checklists is treated as the
/// batch date; the remaining checklists are reported as likely mistakes
pub const DOMINANT_DATE_FRACTION: f64 = 0.8;

// =============================================================================
// Taxonomy Reference Table
// =============================================================================

/// Column names expected in the taxonomy CSV header, in order
pub const TAXONOMY_COLUMNS: &[&str] = &[
    "TAXON_ORDER",
    "CATEGORY",
    "SPECIES_CODE",
    "PRIMARY_COM_NAME",
    "SCI_NAME",
    "ORDER1",
    "FAMILY",
    "SPECIES_GROUP",
    "REPORT_AS",
];

/// Minimum number of fields a taxonomy row must carry (order through common name)
pub const TAXONOMY_REQUIRED_FIELDS: usize = 4;

/// Default taxonomy file name
pub const TAXONOMY_FILE_NAME: &str = "eBird_Taxonomy.csv";

// =============================================================================
// Retrieval Defaults
// =============================================================================

/// User agent sent with every request and matched against robots.txt groups
pub const DEFAULT_USER_AGENT: &str = "eBird Compiler";

/// Base URL that bare checklist identifiers are appended to
pub const DEFAULT_CHECKLIST_BASE_URL: &str = "https://ebird.org/checklist/";

/// Prefix letter of bare checklist identifiers (S12345678)
pub const CHECKLIST_ID_PREFIX: char = 'S';

pub const ROBOTS_FILE_NAME: &str = "robots.txt";

/// Used when robots.txt cannot be retrieved
pub const DEFAULT_CRAWL_DELAY_SECS: u64 = 1;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Configuration
// =============================================================================

/// Directory name used under the platform config and data directories
pub const APP_DIR_NAME: &str = "ebird-compiler";

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overrides
pub mod env_vars {
    pub const TAXONOMY_PATH: &str = "EBIRD_COMPILER_TAXONOMY";
    pub const USER_AGENT: &str = "EBIRD_COMPILER_USER_AGENT";
    pub const CRAWL_DELAY: &str = "EBIRD_COMPILER_CRAWL_DELAY";
}
