//! Pet domain model.
//!
//! # Responsibility
//! - Define the persisted `Pet` record and the partial `PetFields` mapping
//!   callers hand to the storage gateway.
//! - Validate field values before any SQL mutation.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `name` is never empty after trimming.
//! - `gender` is always one of the contract gender codes.
//! - `weight` is never negative.

use crate::contract::{
    is_valid_gender, Gender, COLUMN_PET_BREED, COLUMN_PET_GENDER, COLUMN_PET_NAME,
    COLUMN_PET_WEIGHT,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier (`_id` column).
pub type PetId = i64;

/// One persisted pet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    /// `None` when the column is NULL.
    pub breed: Option<String>,
    pub gender: Gender,
    pub weight: i64,
}

/// Column-to-value mapping for insert and update calls.
///
/// Every field is optional so updates can overwrite a subset of columns.
/// `gender` stays a raw code so out-of-range values reach validation
/// instead of being unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetFields {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<i64>,
    pub weight: Option<i64>,
}

impl PetFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender.code());
        self
    }

    /// Sets a raw gender code without checking it.
    pub fn gender_code(mut self, code: i64) -> Self {
        self.gender = Some(code);
        self
    }

    pub fn weight(mut self, weight: i64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Full field set mirroring an existing row.
    pub fn from_pet(pet: &Pet) -> Self {
        Self {
            name: Some(pet.name.clone()),
            breed: pet.breed.clone(),
            gender: Some(pet.gender.code()),
            weight: Some(pet.weight),
        }
    }

    /// Returns whether no column is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.breed.is_none()
            && self.gender.is_none()
            && self.weight.is_none()
    }

    /// Validates a field set used to create a new row.
    ///
    /// `name` and `gender` are required; `breed` and `weight` fall back to
    /// the column defaults.
    pub fn validate_for_insert(&self) -> Result<(), PetValidationError> {
        if self.name.is_none() {
            return Err(PetValidationError::MissingField(COLUMN_PET_NAME));
        }
        if self.gender.is_none() {
            return Err(PetValidationError::MissingField(COLUMN_PET_GENDER));
        }
        self.validate_supplied()
    }

    /// Validates only the supplied columns of a partial update.
    pub fn validate_for_update(&self) -> Result<(), PetValidationError> {
        self.validate_supplied()
    }

    fn validate_supplied(&self) -> Result<(), PetValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(PetValidationError::EmptyName);
            }
        }
        if let Some(gender) = self.gender {
            if !is_valid_gender(gender) {
                return Err(PetValidationError::InvalidGender(gender));
            }
        }
        if let Some(weight) = self.weight {
            if weight < 0 {
                return Err(PetValidationError::NegativeWeight(weight));
            }
        }
        Ok(())
    }

    /// Supplied columns in table order, used to build partial updates.
    pub(crate) fn supplied_columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(4);
        if self.name.is_some() {
            columns.push(COLUMN_PET_NAME);
        }
        if self.breed.is_some() {
            columns.push(COLUMN_PET_BREED);
        }
        if self.gender.is_some() {
            columns.push(COLUMN_PET_GENDER);
        }
        if self.weight.is_some() {
            columns.push(COLUMN_PET_WEIGHT);
        }
        columns
    }
}

/// Field-level validation failures raised before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetValidationError {
    EmptyName,
    InvalidGender(i64),
    NegativeWeight(i64),
    MissingField(&'static str),
}

impl Display for PetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "pet requires a name"),
            Self::InvalidGender(code) => write!(f, "pet requires valid gender, got {code}"),
            Self::NegativeWeight(weight) => {
                write!(f, "pet requires valid weight, got {weight}")
            }
            Self::MissingField(column) => write!(f, "pet requires column `{column}`"),
        }
    }
}

impl Error for PetValidationError {}
