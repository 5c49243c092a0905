//! Lenient conversion of user-entered editor text into pet fields.
//!
//! # Responsibility
//! - Turn raw form text into a `PetFields` mapping.
//!
//! # Invariants
//! - Weight text that does not parse as a 32-bit integer becomes `0`; this
//!   never raises an error.
//! - Empty or unrecognized gender labels become `Gender::Unknown`.
//! - Name and breed are trimmed before they reach the store.

use crate::contract::Gender;
use crate::model::pet::PetFields;

/// Parses editor weight text, coercing empty, non-numeric and overflowing
/// input to `0`.
///
/// Negative numbers parse as-is; field validation rejects them later.
pub fn parse_weight(text: &str) -> i64 {
    text.trim().parse::<i32>().map_or(0, i64::from)
}

/// Maps a gender selector label to the enum. Matching ignores case and
/// surrounding whitespace.
pub fn gender_from_label(label: &str) -> Gender {
    let normalized = label.trim();
    if normalized.eq_ignore_ascii_case(Gender::Male.label()) {
        Gender::Male
    } else if normalized.eq_ignore_ascii_case(Gender::Female.label()) {
        Gender::Female
    } else {
        Gender::Unknown
    }
}

/// Raw editor form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetForm {
    pub name: String,
    pub breed: String,
    pub weight_text: String,
    pub gender: Gender,
}

impl PetForm {
    /// Returns whether every input is still at its initial blank value.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.breed.trim().is_empty()
            && self.weight_text.trim().is_empty()
            && self.gender == Gender::Unknown
    }

    /// Builds the complete field set written by a save.
    pub fn to_fields(&self) -> PetFields {
        PetFields::new()
            .name(self.name.trim())
            .breed(self.breed.trim())
            .gender(self.gender)
            .weight(parse_weight(&self.weight_text))
    }
}
