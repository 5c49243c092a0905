//! Editor view-model for creating and editing a single pet.
//!
//! # Responsibility
//! - Hold editor form state and the explicit unsaved-changes flag.
//! - Turn save/delete requests into gateway calls and report outcomes the
//!   UI can map to success/failure messages.
//!
//! # Invariants
//! - `has_changed` is owned by the session; there is no shared global flag.
//! - A new pet has no item address, so it cannot be deleted.
//! - Storage errors propagate to the caller unchanged.

use crate::contract::{Gender, PetAddress};
use crate::model::input::{gender_from_label, PetForm};
use crate::model::pet::{Pet, PetId};
use crate::service::gateway::{ArgumentError, GatewayError, GatewayResult, StorageGateway};

/// Result of a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new row was created.
    Inserted(PetId),
    /// The existing row was overwritten.
    Updated,
    /// The addressed row no longer exists.
    UpdateFailed,
    /// New pet with an untouched blank form; nothing was written.
    Skipped,
}

const INSERT_FAILED_MESSAGE: &str = "Error with saving pet";
const UPDATE_FAILED_MESSAGE: &str = "Error with updating pet";

impl SaveOutcome {
    /// Maps the row count of an update to its outcome.
    pub fn from_update_rows(rows: usize) -> Self {
        match rows {
            0 => Self::UpdateFailed,
            _ => Self::Updated,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Inserted(_) | Self::Updated | Self::Skipped)
    }

    /// User-facing confirmation text.
    pub fn message(self) -> &'static str {
        match self {
            Self::Inserted(_) => "Pet saved",
            Self::Updated => "Pet updated",
            Self::UpdateFailed => UPDATE_FAILED_MESSAGE,
            Self::Skipped => "Nothing to save",
        }
    }

    /// Text shown when a save is rejected with an error instead of an
    /// outcome.
    pub fn error_message(is_new: bool) -> &'static str {
        if is_new {
            INSERT_FAILED_MESSAGE
        } else {
            UPDATE_FAILED_MESSAGE
        }
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    DeleteFailed,
}

impl DeleteOutcome {
    pub fn from_rows(rows: usize) -> Self {
        match rows {
            0 => Self::DeleteFailed,
            _ => Self::Deleted,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Deleted
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Deleted => "Pet deleted",
            Self::DeleteFailed => "Error with deleting pet",
        }
    }
}

/// State of one editor screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSession {
    address: Option<PetAddress>,
    form: PetForm,
    has_changed: bool,
    /// The loaded row had a NULL breed.
    breed_was_null: bool,
}

impl EditorSession {
    /// Session for adding a new pet.
    pub fn new_pet() -> Self {
        Self {
            address: None,
            form: PetForm::default(),
            has_changed: false,
            breed_was_null: false,
        }
    }

    /// Session for editing pet `id`. Call `load` once the row is read.
    pub fn edit(id: PetId) -> Self {
        Self {
            address: Some(PetAddress::Item(id)),
            form: PetForm::default(),
            has_changed: false,
            breed_was_null: false,
        }
    }

    /// Opens an editing session and fills it from the store.
    pub fn open(gateway: &StorageGateway, id: PetId) -> GatewayResult<Self> {
        let pet = gateway.get_by_id(id)?;
        let mut session = Self::edit(id);
        session.load(&pet);
        Ok(session)
    }

    pub fn is_new(&self) -> bool {
        self.address.is_none()
    }

    pub fn address(&self) -> Option<PetAddress> {
        self.address
    }

    pub fn form(&self) -> &PetForm {
        &self.form
    }

    /// Replaces the form with a stored row. Does not mark the form changed.
    ///
    /// A NULL breed shows as empty text and stays NULL on save unless the
    /// user types a breed.
    pub fn load(&mut self, pet: &Pet) {
        self.breed_was_null = pet.breed.is_none();
        self.form = PetForm {
            name: pet.name.clone(),
            breed: pet.breed.clone().unwrap_or_default(),
            weight_text: pet.weight.to_string(),
            gender: pet.gender,
        };
    }

    /// Clears every input back to its blank value.
    pub fn reset(&mut self) {
        self.form = PetForm::default();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
        self.has_changed = true;
    }

    pub fn set_breed(&mut self, breed: impl Into<String>) {
        self.form.breed = breed.into();
        self.has_changed = true;
    }

    pub fn set_weight_text(&mut self, weight_text: impl Into<String>) {
        self.form.weight_text = weight_text.into();
        self.has_changed = true;
    }

    pub fn select_gender(&mut self, gender: Gender) {
        self.form.gender = gender;
        self.has_changed = true;
    }

    /// Selects gender from a selector label; unknown labels pick
    /// `Gender::Unknown`.
    pub fn select_gender_label(&mut self, label: &str) {
        self.select_gender(gender_from_label(label));
    }

    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    /// Leaving the editor must be confirmed when edits would be lost.
    pub fn needs_discard_confirmation(&self) -> bool {
        self.has_changed
    }

    /// The delete action is only offered for stored pets.
    pub fn can_delete(&self) -> bool {
        !self.is_new()
    }

    /// Writes the form through the gateway.
    ///
    /// A successful insert turns the session into an editing session for
    /// the new row. Any completed write clears `has_changed`.
    pub fn save(&mut self, gateway: &StorageGateway) -> GatewayResult<SaveOutcome> {
        let outcome = match self.address {
            None if self.form.is_blank() => SaveOutcome::Skipped,
            None => {
                let id = gateway.insert(&self.form.to_fields())?;
                self.address = Some(PetAddress::Item(id));
                SaveOutcome::Inserted(id)
            }
            Some(address) => {
                let mut fields = self.form.to_fields();
                if self.breed_was_null && self.form.breed.trim().is_empty() {
                    fields.breed = None;
                }
                let rows = gateway.update_at(&address, &fields)?;
                let outcome = SaveOutcome::from_update_rows(rows);
                if outcome.is_success() {
                    self.breed_was_null = fields.breed.is_none();
                }
                outcome
            }
        };

        if outcome.is_success() {
            self.has_changed = false;
        }
        Ok(outcome)
    }

    /// Deletes the stored pet.
    ///
    /// # Errors
    /// - `GatewayError::InvalidArgument` for a new pet that has no row yet.
    pub fn delete(&self, gateway: &StorageGateway) -> GatewayResult<DeleteOutcome> {
        let address = self.address.ok_or(GatewayError::InvalidArgument(
            ArgumentError::ItemAddressRequired("delete"),
        ))?;
        Ok(DeleteOutcome::from_rows(gateway.delete_at(&address)?))
    }
}

#[cfg(test)]
mod tests {
    use super::{DeleteOutcome, EditorSession, SaveOutcome};
    use crate::contract::Gender;
    use crate::model::pet::Pet;

    #[test]
    fn edits_set_the_changed_flag() {
        let mut session = EditorSession::new_pet();
        assert!(!session.has_changed());
        assert!(!session.can_delete());

        session.set_weight_text("7");
        assert!(session.has_changed());
        assert!(session.needs_discard_confirmation());
    }

    #[test]
    fn load_fills_form_without_marking_changes() {
        let mut session = EditorSession::edit(4);
        session.load(&Pet {
            id: 4,
            name: "Binx".to_string(),
            breed: None,
            gender: Gender::Male,
            weight: 6,
        });

        assert!(!session.has_changed());
        assert!(session.can_delete());
        assert_eq!(session.form().breed, "");
        assert_eq!(session.form().weight_text, "6");

        session.reset();
        assert!(session.form().is_blank());
    }

    #[test]
    fn outcome_messages_distinguish_success_and_failure() {
        assert!(SaveOutcome::Inserted(1).is_success());
        assert!(!SaveOutcome::UpdateFailed.is_success());
        assert_ne!(
            SaveOutcome::Updated.message(),
            SaveOutcome::UpdateFailed.message()
        );
    }

    #[test]
    fn row_counts_map_to_outcomes_with_shared_wording() {
        assert_eq!(SaveOutcome::from_update_rows(1), SaveOutcome::Updated);
        assert_eq!(SaveOutcome::from_update_rows(0), SaveOutcome::UpdateFailed);
        assert_eq!(
            SaveOutcome::error_message(false),
            SaveOutcome::UpdateFailed.message()
        );
        assert_eq!(SaveOutcome::error_message(true), "Error with saving pet");

        assert_eq!(DeleteOutcome::from_rows(1), DeleteOutcome::Deleted);
        assert_eq!(DeleteOutcome::from_rows(0).message(), "Error with deleting pet");
    }
}
