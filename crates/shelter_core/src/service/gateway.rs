//! Storage gateway over the shelter `pets` store.
//!
//! # Responsibility
//! - Own the single store handle and serialize every access to it.
//! - Expose list/get/insert/update/delete by id and by logical address.
//! - Translate repository failures into the caller-facing error taxonomy.
//!
//! # Invariants
//! - Only the gateway opens the store file; callers never see the
//!   connection.
//! - Invalid field values and unaddressed deletes are rejected before any
//!   write.
//! - Dropping the gateway closes the store handle.

use crate::contract::{ContractError, PetAddress};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::pet::{Pet, PetFields, PetId, PetValidationError};
use crate::repo::pet_repo::{PetRepository, RepoError, RepoResult, SqlitePetRepository};
use log::{error, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Why a request was rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// A supplied field value is out of range.
    Field(PetValidationError),
    /// The operation needs an item address but got the collection.
    ItemAddressRequired(&'static str),
    /// The operation only accepts the collection address.
    CollectionAddressRequired(&'static str),
    /// The address text could not be parsed.
    Address(ContractError),
}

impl Display for ArgumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(err) => write!(f, "{err}"),
            Self::ItemAddressRequired(operation) => {
                write!(f, "{operation} requires an item address")
            }
            Self::CollectionAddressRequired(operation) => {
                write!(f, "{operation} is not supported for an item address")
            }
            Self::Address(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ArgumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(err) => Some(err),
            Self::Address(err) => Some(err),
            Self::ItemAddressRequired(_) | Self::CollectionAddressRequired(_) => None,
        }
    }
}

/// Errors surfaced to gateway callers.
#[derive(Debug)]
pub enum GatewayError {
    /// Store file cannot be created, opened or recognized.
    StorageInit(RepoError),
    /// Request rejected before any write.
    InvalidArgument(ArgumentError),
    /// Item address matched no row.
    NotFound(PetId),
    /// Store failure while executing a statement.
    Storage(RepoError),
    /// A previous caller panicked while holding the store handle.
    Poisoned,
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageInit(err) => write!(f, "failed to initialize pet store: {err}"),
            Self::InvalidArgument(err) => write!(f, "invalid argument: {err}"),
            Self::NotFound(id) => write!(f, "pet not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "pet store handle is poisoned"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageInit(err) | Self::Storage(err) => Some(err),
            Self::InvalidArgument(err) => Some(err),
            Self::NotFound(_) | Self::Poisoned => None,
        }
    }
}

impl From<RepoError> for GatewayError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidArgument(ArgumentError::Field(err)),
            other => Self::Storage(other),
        }
    }
}

impl From<ContractError> for GatewayError {
    fn from(value: ContractError) -> Self {
        Self::InvalidArgument(ArgumentError::Address(value))
    }
}

/// Handle to an open pet store.
///
/// Every call takes an internal lock, so the gateway can be shared across
/// threads (for example behind `Arc`) and concurrent writes never
/// interleave.
pub struct StorageGateway {
    conn: Mutex<Connection>,
    location: Option<PathBuf>,
}

impl StorageGateway {
    /// Opens or creates the store file at `location`.
    ///
    /// A new file gets the `pets` table; an existing file at the current
    /// schema version is opened as-is.
    ///
    /// # Errors
    /// - `GatewayError::StorageInit` when the location is unwritable, the
    ///   file is corrupt, or its schema is newer or incomplete.
    pub fn initialize(location: impl AsRef<Path>) -> GatewayResult<Self> {
        let location = location.as_ref();
        let conn = open_db(location).map_err(storage_init_error)?;
        Self::from_connection(conn, Some(location.to_path_buf()))
    }

    /// Opens a private in-memory store.
    pub fn initialize_in_memory() -> GatewayResult<Self> {
        let conn = open_db_in_memory().map_err(storage_init_error)?;
        Self::from_connection(conn, None)
    }

    fn from_connection(conn: Connection, location: Option<PathBuf>) -> GatewayResult<Self> {
        if let Err(err) = SqlitePetRepository::try_new(&conn) {
            error!(
                "event=gateway_init module=gateway status=error error_code=schema_not_ready error={}",
                err
            );
            return Err(GatewayError::StorageInit(err));
        }
        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    /// File backing this store, `None` for in-memory stores.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Returns every pet, ordered by id.
    pub fn list_all(&self) -> GatewayResult<Vec<Pet>> {
        self.with_repo(|repo| repo.list_pets())
    }

    /// Returns the pet with `id`.
    ///
    /// # Errors
    /// - `GatewayError::NotFound` when no row matches.
    pub fn get_by_id(&self, id: PetId) -> GatewayResult<Pet> {
        self.with_repo(|repo| repo.get_pet(id))?
            .ok_or(GatewayError::NotFound(id))
    }

    /// Inserts a new pet and returns its store-assigned id.
    ///
    /// # Errors
    /// - `GatewayError::InvalidArgument` for missing name/gender or
    ///   out-of-range values; no row is created.
    pub fn insert(&self, fields: &PetFields) -> GatewayResult<PetId> {
        let result = self.with_repo(|repo| repo.insert_pet(fields));
        match &result {
            Ok(id) => info!("event=pet_insert module=gateway status=ok pet_id={id}"),
            Err(err) => warn!("event=pet_insert module=gateway status=error error={err}"),
        }
        result
    }

    /// Overwrites the supplied columns of pet `id`.
    ///
    /// Returns `0` when no row matched and `1` when the row was updated.
    pub fn update(&self, id: PetId, fields: &PetFields) -> GatewayResult<usize> {
        let result = self.with_repo(|repo| repo.update_pet(id, fields));
        match &result {
            Ok(rows) => info!(
                "event=pet_update module=gateway status=ok pet_id={id} rows_affected={rows}"
            ),
            Err(err) => {
                warn!("event=pet_update module=gateway status=error pet_id={id} error={err}")
            }
        }
        result
    }

    /// Removes pet `id`. Returns `0` or `1`.
    pub fn delete(&self, id: PetId) -> GatewayResult<usize> {
        let result = self.with_repo(|repo| repo.delete_pet(id));
        match &result {
            Ok(rows) => info!(
                "event=pet_delete module=gateway status=ok pet_id={id} rows_affected={rows}"
            ),
            Err(err) => {
                warn!("event=pet_delete module=gateway status=error pet_id={id} error={err}")
            }
        }
        result
    }

    /// Reads the rows behind `address`: all pets, or zero-or-one pet.
    pub fn query(&self, address: &PetAddress) -> GatewayResult<Vec<Pet>> {
        match address {
            PetAddress::Collection => self.list_all(),
            PetAddress::Item(id) => Ok(self
                .with_repo(|repo| repo.get_pet(*id))?
                .into_iter()
                .collect()),
        }
    }

    /// Inserts through the collection address and returns the new item
    /// address.
    pub fn insert_at(&self, address: &PetAddress, fields: &PetFields) -> GatewayResult<PetAddress> {
        match address {
            PetAddress::Collection => self.insert(fields).map(PetAddress::Item),
            PetAddress::Item(_) => Err(GatewayError::InvalidArgument(
                ArgumentError::CollectionAddressRequired("insert"),
            )),
        }
    }

    /// Updates the pet behind an item address. Returns rows affected.
    pub fn update_at(&self, address: &PetAddress, fields: &PetFields) -> GatewayResult<usize> {
        let id = require_item(address, "update")?;
        self.update(id, fields)
    }

    /// Deletes the pet behind an item address. The collection address is
    /// rejected: there is no bulk delete.
    pub fn delete_at(&self, address: &PetAddress) -> GatewayResult<usize> {
        let id = require_item(address, "delete")?;
        self.delete(id)
    }

    /// Closes the store handle, reporting any error from SQLite.
    ///
    /// Dropping the gateway also closes the handle but discards that error.
    pub fn close(self) -> GatewayResult<()> {
        let conn = self.conn.into_inner().map_err(|_| GatewayError::Poisoned)?;
        conn.close()
            .map_err(|(_, err)| GatewayError::Storage(RepoError::Db(DbError::Sqlite(err))))?;
        info!("event=gateway_close module=gateway status=ok");
        Ok(())
    }

    /// Runs `f` under the store lock. The schema was verified when the
    /// gateway was built, so it is not re-checked per call.
    fn with_repo<T>(
        &self,
        f: impl FnOnce(&SqlitePetRepository<'_>) -> RepoResult<T>,
    ) -> GatewayResult<T> {
        let conn = self.conn.lock().map_err(|_| GatewayError::Poisoned)?;
        Ok(f(&SqlitePetRepository::from_verified(&conn))?)
    }
}

fn require_item(address: &PetAddress, operation: &'static str) -> GatewayResult<PetId> {
    address.id().ok_or(GatewayError::InvalidArgument(
        ArgumentError::ItemAddressRequired(operation),
    ))
}

fn storage_init_error(err: DbError) -> GatewayError {
    GatewayError::StorageInit(RepoError::Db(err))
}

#[cfg(test)]
mod tests {
    use super::StorageGateway;
    use crate::contract::Gender;
    use crate::model::pet::PetFields;

    #[test]
    fn operations_skip_schema_readiness_check_after_init() {
        let gateway = StorageGateway::initialize_in_memory().unwrap();
        gateway
            .conn
            .lock()
            .unwrap()
            .execute_batch("PRAGMA user_version = 0;")
            .unwrap();

        let id = gateway
            .insert(&PetFields::new().name("Rex").gender(Gender::Male))
            .unwrap();
        assert_eq!(gateway.list_all().unwrap().len(), 1);
        assert_eq!(gateway.get_by_id(id).unwrap().name, "Rex");
    }
}
