use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use validator::Validate;

use crate::models::domain::{Mentee, Mentor, Person};

pub const DEFAULT_TEXT: &str = "Not provided";
pub const DEFAULT_STATE: &str = "VIC";
pub const DEFAULT_COUNTRY: &str = "AU";
pub const DEFAULT_CAPACITY: u32 = 1;

/// Errors raised while turning a raw row into a domain record
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Missing required field: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid boolean for `{field}`: {value:?}")]
    InvalidBoolean { field: &'static str, value: String },

    #[error("Invalid capacity: {value:?}")]
    InvalidCapacity { value: String },
}

/// Raw mentee row as it appears in the input CSV
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MenteeRecord {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(length(min = 1))]
    pub gender: String,
    #[validate(length(min = 1))]
    pub contact_email: String,
    #[serde(default)]
    pub locations: Option<String>,
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default)]
    pub looking_for: Option<String>,
    #[serde(default)]
    pub state_of_origin: Option<String>,
    #[serde(default)]
    pub country_of_origin: Option<String>,
    #[serde(default)]
    pub gender_preference: Option<String>,
    #[serde(default)]
    pub prefers_from_origin: Option<String>,
}

/// Raw mentor row as it appears in the input CSV
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MentorRecord {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(length(min = 1))]
    pub gender: String,
    #[validate(length(min = 1))]
    pub contact_email: String,
    #[serde(default)]
    pub locations: Option<String>,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default)]
    pub state_of_origin: Option<String>,
    #[serde(default)]
    pub country_of_origin: Option<String>,
    #[serde(default)]
    pub gender_preference: Option<String>,
}

impl TryFrom<MenteeRecord> for Mentee {
    type Error = RecordError;

    fn try_from(record: MenteeRecord) -> Result<Self, Self::Error> {
        record.validate()?;

        let person = Person {
            id: record.id.trim().to_string(),
            name: record.full_name.trim().to_string(),
            gender: normalize_gender(&record.gender),
            contact_email: record.contact_email.trim().to_string(),
            locations: parse_locations(record.locations.as_deref()),
            intro: text_or_default(record.intro),
            state_of_origin: text_or(record.state_of_origin, DEFAULT_STATE),
            country_of_origin: text_or(record.country_of_origin, DEFAULT_COUNTRY),
            prefers_own_gender: parse_flag(
                "gender_preference",
                record.gender_preference.as_deref(),
                false,
            )?,
        };

        Ok(Mentee {
            person,
            looking_for: text_or_default(record.looking_for),
            prefers_same_origin: parse_flag(
                "prefers_from_origin",
                record.prefers_from_origin.as_deref(),
                true,
            )?,
        })
    }
}

impl TryFrom<MentorRecord> for Mentor {
    type Error = RecordError;

    fn try_from(record: MentorRecord) -> Result<Self, Self::Error> {
        record.validate()?;

        let person = Person {
            id: record.id.trim().to_string(),
            name: record.full_name.trim().to_string(),
            gender: normalize_gender(&record.gender),
            contact_email: record.contact_email.trim().to_string(),
            locations: parse_locations(record.locations.as_deref()),
            intro: text_or_default(record.intro),
            state_of_origin: text_or(record.state_of_origin, DEFAULT_STATE),
            country_of_origin: text_or(record.country_of_origin, DEFAULT_COUNTRY),
            prefers_own_gender: parse_flag(
                "gender_preference",
                record.gender_preference.as_deref(),
                false,
            )?,
        };

        Ok(Mentor {
            person,
            capacity: parse_capacity(record.capacity.as_deref())?,
        })
    }
}

/// Genders are compared by exact equality after this normalization
pub fn normalize_gender(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Split a `;`-delimited tag list into a deduplicated set.
///
/// Empty tags (e.g. from a trailing `;`) are dropped.
pub fn parse_locations(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|value| {
        value
            .split(';')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Parse a boolean flag, accepting `true`/`false` in any case and `1`/`0`
pub fn parse_flag(field: &'static str, raw: Option<&str>, default: bool) -> Result<bool, RecordError> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(default),
        Some(value) => value,
    };

    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(RecordError::InvalidBoolean {
            field,
            value: value.to_string(),
        }),
    }
}

/// Parse a mentor capacity; blank means the default of 1
pub fn parse_capacity(raw: Option<&str>) -> Result<u32, RecordError> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_CAPACITY),
        Some(value) => value,
    };

    if let Ok(capacity) = value.parse::<u32>() {
        return Ok(capacity);
    }

    // Spreadsheet exports sometimes write integral numbers as "2.0"
    match value.parse::<f64>() {
        Ok(capacity) if capacity.fract() == 0.0 && capacity >= 0.0 && capacity <= u32::MAX as f64 => {
            Ok(capacity as u32)
        }
        _ => Err(RecordError::InvalidCapacity {
            value: value.to_string(),
        }),
    }
}

fn text_or(raw: Option<String>, default: &str) -> String {
    match raw {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}

fn text_or_default(raw: Option<String>) -> String {
    text_or(raw, DEFAULT_TEXT)
}
