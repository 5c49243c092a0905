//! Core data layer for the shelter pet inventory.
//! This crate is the single source of truth for pet storage invariants.

pub mod config;
pub mod contract;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use contract::{is_valid_gender, ContractError, Gender, PetAddress};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::input::{gender_from_label, parse_weight, PetForm};
pub use model::pet::{Pet, PetFields, PetId, PetValidationError};
pub use repo::pet_repo::{PetRepository, RepoError, RepoResult, SqlitePetRepository};
pub use service::editor::{DeleteOutcome, EditorSession, SaveOutcome};
pub use service::gateway::{ArgumentError, GatewayError, GatewayResult, StorageGateway};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
