//! Domain model for shelter pets.
//!
//! # Responsibility
//! - Define the persisted pet record and caller-supplied field sets.
//! - Convert loosely typed editor input into field sets.
//!
//! # Invariants
//! - Validation happens on `PetFields` before any SQL mutation.

pub mod input;
pub mod pet;
