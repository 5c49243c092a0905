//! Pet repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/get/insert/update/delete over the single `pets` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate `PetFields` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Updates and deletes report affected row counts (`0` or `1`); a missing
//!   row is not an error at this layer.

use crate::contract::{
    Gender, COLUMN_ID, COLUMN_PET_BREED, COLUMN_PET_GENDER, COLUMN_PET_NAME, COLUMN_PET_WEIGHT,
    TABLE_NAME,
};
use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::pet::{Pet, PetFields, PetId, PetValidationError};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PET_SELECT_SQL: &str = "SELECT
    _id,
    name,
    breed,
    gender,
    weight
FROM pets";

const REQUIRED_COLUMNS: [&str; 5] = [
    COLUMN_ID,
    COLUMN_PET_NAME,
    COLUMN_PET_BREED,
    COLUMN_PET_GENDER,
    COLUMN_PET_WEIGHT,
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for pet persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Field values rejected before any write.
    Validation(PetValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Persisted row cannot be converted to a valid `Pet`.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted pet data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "pet repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "pet repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "pet repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<PetValidationError> for RepoError {
    fn from(value: PetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for pet CRUD operations.
pub trait PetRepository {
    /// Returns every row, ordered by id.
    fn list_pets(&self) -> RepoResult<Vec<Pet>>;
    /// Returns the row with `id`, if any.
    fn get_pet(&self, id: PetId) -> RepoResult<Option<Pet>>;
    /// Inserts one row and returns its store-assigned id.
    fn insert_pet(&self, fields: &PetFields) -> RepoResult<PetId>;
    /// Overwrites the supplied columns of row `id`; returns rows affected.
    fn update_pet(&self, id: PetId, fields: &PetFields) -> RepoResult<usize>;
    /// Removes row `id`; returns rows affected.
    fn delete_pet(&self, id: PetId) -> RepoResult<usize>;
}

/// SQLite-backed pet repository.
pub struct SqlitePetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePetRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_pet_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Wraps a connection that already passed `try_new` once.
    pub(crate) fn from_verified(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PetRepository for SqlitePetRepository<'_> {
    fn list_pets(&self) -> RepoResult<Vec<Pet>> {
        let mut stmt = self.conn.prepare(&format!("{PET_SELECT_SQL} ORDER BY _id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut pets = Vec::new();

        while let Some(row) = rows.next()? {
            pets.push(parse_pet_row(row)?);
        }

        Ok(pets)
    }

    fn get_pet(&self, id: PetId) -> RepoResult<Option<Pet>> {
        let mut stmt = self.conn.prepare(&format!("{PET_SELECT_SQL} WHERE _id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_pet_row(row)?));
        }

        Ok(None)
    }

    fn insert_pet(&self, fields: &PetFields) -> RepoResult<PetId> {
        fields.validate_for_insert()?;

        let (columns, values) = bind_supplied_fields(fields);
        let placeholders = (1..=columns.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        self.conn.execute(
            &format!(
                "INSERT INTO {TABLE_NAME} ({}) VALUES ({placeholders});",
                columns.join(", ")
            ),
            params_from_iter(values),
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_pet(&self, id: PetId, fields: &PetFields) -> RepoResult<usize> {
        fields.validate_for_update()?;

        if fields.is_empty() {
            // Nothing to write; report whether the addressed row exists.
            let exists = self
                .conn
                .query_row(
                    &format!("SELECT 1 FROM {TABLE_NAME} WHERE {COLUMN_ID} = ?1;"),
                    [id],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?;
            return Ok(usize::from(exists.is_some()));
        }

        let (columns, mut values) = bind_supplied_fields(fields);
        let assignments = columns
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        values.push(Value::Integer(id));

        let changed = self.conn.execute(
            &format!(
                "UPDATE {TABLE_NAME} SET {assignments} WHERE {COLUMN_ID} = ?{};",
                values.len()
            ),
            params_from_iter(values),
        )?;

        Ok(changed)
    }

    fn delete_pet(&self, id: PetId) -> RepoResult<usize> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {TABLE_NAME} WHERE {COLUMN_ID} = ?1;"),
            [id],
        )?;
        Ok(changed)
    }
}

fn bind_supplied_fields(fields: &PetFields) -> (Vec<&'static str>, Vec<Value>) {
    let columns = fields.supplied_columns();
    let mut values = Vec::with_capacity(columns.len() + 1);
    if let Some(name) = &fields.name {
        values.push(Value::Text(name.clone()));
    }
    if let Some(breed) = &fields.breed {
        values.push(Value::Text(breed.clone()));
    }
    if let Some(gender) = fields.gender {
        values.push(Value::Integer(gender));
    }
    if let Some(weight) = fields.weight {
        values.push(Value::Integer(weight));
    }
    (columns, values)
}

fn parse_pet_row(row: &Row<'_>) -> RepoResult<Pet> {
    let id: PetId = row.get(COLUMN_ID)?;

    let name: String = row.get(COLUMN_PET_NAME)?;
    if name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty name for pet {id} in pets.name"
        )));
    }

    let gender_code: i64 = row.get(COLUMN_PET_GENDER)?;
    let gender = Gender::from_code(gender_code).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid gender `{gender_code}` for pet {id} in pets.gender"
        ))
    })?;

    let weight: i64 = row.get(COLUMN_PET_WEIGHT)?;
    if weight < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative weight `{weight}` for pet {id} in pets.weight"
        )));
    }

    Ok(Pet {
        id,
        name,
        breed: row.get(COLUMN_PET_BREED)?,
        gender,
        weight,
    })
}

fn ensure_pet_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, TABLE_NAME)? {
        return Err(RepoError::MissingRequiredTable(TABLE_NAME));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, TABLE_NAME, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: TABLE_NAME,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
