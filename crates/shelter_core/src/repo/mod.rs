//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from the storage gateway.
//!
//! # Invariants
//! - Repository writes must validate `PetFields` before persistence.

pub mod pet_repo;
