//! Country catalogs and destination gating.
//!
//! Matching is deliberately substring-based and case-insensitive to cope
//! with free-text answers like "I visited the Czech Republic and Dubai".

/// Schengen-area country names, including common aliases.
pub const SCHENGEN_COUNTRIES: &[&str] = &[
    "Austria",
    "Belgium",
    "Croatia",
    "Czech Republic",
    "Czech",
    "Denmark",
    "Estonia",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Hungary",
    "Iceland",
    "Italy",
    "Latvia",
    "Liechtenstein",
    "Lithuania",
    "Luxembourg",
    "Malta",
    "Netherlands",
    "Norway",
    "Poland",
    "Portugal",
    "Slovakia",
    "Slovenia",
    "Spain",
    "Sweden",
    "Switzerland",
];

/// Countries whose visas are treated as a strong positive signal.
pub const HEAVY_VISA_COUNTRIES: &[&str] = &[
    "USA",
    "United States",
    "America",
    "UK",
    "United Kingdom",
    "Britain",
    "England",
    "Canada",
    "Australia",
];

/// Destinations we recognize but do not assess.
///
/// Mentioning one of these as the target country routes the conversation to
/// the not-supported side stage instead of re-asking.
const UNSUPPORTED_DESTINATIONS: &[&str] = &[
    "USA",
    "United States",
    "America",
    "UK",
    "United Kingdom",
    "Britain",
    "England",
    "Canada",
    "Australia",
    "New Zealand",
    "Japan",
    "Singapore",
    "Malaysia",
    "Thailand",
    "China",
    "Dubai",
    "UAE",
    "United Arab Emirates",
    "Turkey",
];

/// Aliases that select the Schengen area as a whole.
const AREA_ALIASES: &[&str] = &["schengen", "europe", "european"];

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Finds the Schengen destination named in free text, if any.
///
/// Returns the canonical country name, or `"Schengen Area"` when the text
/// selects the area as a whole ("Europe", "Schengen").
pub fn match_supported_country(text: &str) -> Option<String> {
    for country in SCHENGEN_COUNTRIES {
        if contains_ignore_case(text, country) {
            return Some((*country).to_string());
        }
    }
    for alias in AREA_ALIASES {
        if contains_ignore_case(text, alias) {
            return Some("Schengen Area".to_string());
        }
    }
    None
}

/// Returns true if the text names a destination we explicitly do not assess.
pub fn is_unsupported_destination(text: &str) -> bool {
    UNSUPPORTED_DESTINATIONS
        .iter()
        .any(|country| contains_ignore_case(text, country))
}

/// Returns true if the text mentions a Schengen country.
pub fn is_schengen_country(text: &str) -> bool {
    SCHENGEN_COUNTRIES
        .iter()
        .any(|country| contains_ignore_case(text, country))
}

/// Returns true if the text mentions a heavy-visa country.
pub fn is_heavy_visa_country(text: &str) -> bool {
    HEAVY_VISA_COUNTRIES
        .iter()
        .any(|country| contains_ignore_case(text, country))
}
