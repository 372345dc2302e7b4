//! Segment-level and document-level validation.
//!
//! Two independent passes, both pure functions returning
//! [`Diagnostic`](crate::models::Diagnostic)s rather than errors:
//!
//! - [`segment`] - rules local to one segment (element counts, date formats)
//! - [`structure`] - rules over the whole sequence (envelope presence, and in
//!   strict mode trailers, ordering, counts and control numbers)
//!
//! Every applicable rule fires; nothing stops at the first finding.
//!
//! # Profiles
//!
//! | Profile   | Segment rules                   | Structural rules                       |
//! |-----------|---------------------------------|----------------------------------------|
//! | `lenient` | envelope elements, ISA arity, DTM date | ISA / GS / ST presence          |
//! | `strict`  | lenient + unknown-tag notices   | lenient + trailers, order, counts, control numbers, batch notice |
//!
//! # Example
//!
//! ```rust,ignore
//! use edi_ingest::parser::tokenize;
//! use edi_ingest::validation::{validate_segment, validate_structure};
//!
//! let segments = tokenize("DTM*097*2024-01-01");
//! let warnings = validate_segment(&segments[0]);
//! assert_eq!(warnings[0].element_index, Some(2));
//!
//! let structural = validate_structure(&segments);
//! assert_eq!(structural.len(), 3); // ISA, GS and ST all missing
//! ```

pub mod segment;
pub mod structure;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

pub use segment::{validate_segment, validate_segment_with, ISA_ELEMENT_COUNT};
pub use structure::{validate_structure, validate_structure_with};

/// How much checking to apply beyond the baseline rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationProfile {
    /// Presence-only envelope checks; unknown tags pass silently.
    #[default]
    Lenient,
    /// Adds envelope trailer, ordering, count and control-number checks.
    Strict,
}

impl ValidationProfile {
    pub fn is_strict(self) -> bool {
        matches!(self, ValidationProfile::Strict)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValidationProfile::Lenient => "lenient",
            ValidationProfile::Strict => "strict",
        }
    }
}

impl FromStr for ValidationProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" | "default" => Ok(ValidationProfile::Lenient),
            "strict" => Ok(ValidationProfile::Strict),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

impl fmt::Display for ValidationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
