//! Schema contract for the shelter `pets` store.
//!
//! # Responsibility
//! - Name the table, columns and identifier column used by every caller.
//! - Define the gender enum and its validity predicate.
//! - Define the collection/item addressing scheme exposed to collaborators.
//!
//! # Invariants
//! - Pure metadata: nothing in this module performs I/O.
//! - Item addresses always carry a positive row id.

use crate::model::pet::PetId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Name for the entire content provider surface.
pub const CONTENT_AUTHORITY: &str = "com.example.android.pets";
/// Base of every address handed to collaborators.
pub const BASE_CONTENT_URI: &str = "content://com.example.android.pets";
/// Path segment appended to the base address for pet rows.
pub const PATH_PETS: &str = TABLE_NAME;
/// Collection address of all pets.
pub const CONTENT_URI: &str = "content://com.example.android.pets/pets";
/// MIME type of the collection address.
pub const CONTENT_LIST_TYPE: &str = "vnd.android.cursor.dir/com.example.android.pets/pets";
/// MIME type of an item address.
pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/com.example.android.pets/pets";

/// Database table holding pet rows.
pub const TABLE_NAME: &str = "pets";
/// Identifier column, auto-incrementing primary key.
pub const COLUMN_ID: &str = "_id";
/// Pet name. Type: TEXT NOT NULL.
pub const COLUMN_PET_NAME: &str = "name";
/// Pet breed. Type: TEXT, nullable.
pub const COLUMN_PET_BREED: &str = "breed";
/// Pet gender, one of the `GENDER_*` codes. Type: INTEGER NOT NULL.
pub const COLUMN_PET_GENDER: &str = "gender";
/// Pet weight. Type: INTEGER NOT NULL DEFAULT 0.
pub const COLUMN_PET_WEIGHT: &str = "weight";

pub const GENDER_UNKNOWN: i64 = 0;
pub const GENDER_MALE: i64 = 1;
pub const GENDER_FEMALE: i64 = 2;

/// Returns whether `gender` is one of `GENDER_UNKNOWN`, `GENDER_MALE` or
/// `GENDER_FEMALE`.
pub fn is_valid_gender(gender: i64) -> bool {
    gender == GENDER_UNKNOWN || gender == GENDER_MALE || gender == GENDER_FEMALE
}

/// Gender of a pet as stored in the `gender` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Integer code persisted in the `gender` column.
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => GENDER_UNKNOWN,
            Self::Male => GENDER_MALE,
            Self::Female => GENDER_FEMALE,
        }
    }

    /// Maps a persisted code back to the enum. `None` for invalid codes.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            GENDER_UNKNOWN => Some(Self::Unknown),
            GENDER_MALE => Some(Self::Male),
            GENDER_FEMALE => Some(Self::Female),
            _ => None,
        }
    }

    /// Display label used by the editor's gender selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Builds the single `CREATE TABLE` statement from the column constants.
pub fn create_table_sql() -> String {
    format!(
        "CREATE TABLE {TABLE_NAME} (\
{COLUMN_ID} INTEGER PRIMARY KEY AUTOINCREMENT, \
{COLUMN_PET_NAME} TEXT NOT NULL, \
{COLUMN_PET_BREED} TEXT, \
{COLUMN_PET_GENDER} INTEGER NOT NULL, \
{COLUMN_PET_WEIGHT} INTEGER NOT NULL DEFAULT 0);"
    )
}

/// Logical address understood by the storage gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PetAddress {
    /// Every pet row.
    Collection,
    /// One pet row addressed by id.
    Item(PetId),
}

impl PetAddress {
    /// Item address for `id`.
    pub fn item(id: PetId) -> Self {
        Self::Item(id)
    }

    /// Row id carried by an item address.
    pub fn id(&self) -> Option<PetId> {
        match self {
            Self::Collection => None,
            Self::Item(id) => Some(*id),
        }
    }

    /// MIME type of the rows behind this address.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Collection => CONTENT_LIST_TYPE,
            Self::Item(_) => CONTENT_ITEM_TYPE,
        }
    }

    /// Renders the address as a content URI.
    pub fn to_uri(&self) -> String {
        match self {
            Self::Collection => CONTENT_URI.to_string(),
            Self::Item(id) => format!("{CONTENT_URI}/{id}"),
        }
    }

    /// Parses `content://<authority>/pets[/<id>]`.
    ///
    /// # Errors
    /// - Foreign scheme/authority or unknown path.
    /// - Item id that is not a positive integer.
    pub fn parse(uri: &str) -> Result<Self, ContractError> {
        let trimmed = uri.trim().trim_end_matches('/');
        let rest = trimmed
            .strip_prefix(BASE_CONTENT_URI)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| ContractError::UnknownAuthority(uri.to_string()))?;

        let mut segments = rest.split('/');
        if segments.next() != Some(PATH_PETS) {
            return Err(ContractError::UnknownPath(uri.to_string()));
        }

        match (segments.next(), segments.next()) {
            (None, _) => Ok(Self::Collection),
            (Some(raw_id), None) => match raw_id.parse::<PetId>() {
                Ok(id) if id > 0 => Ok(Self::Item(id)),
                _ => Err(ContractError::InvalidItemId(raw_id.to_string())),
            },
            (Some(_), Some(_)) => Err(ContractError::UnknownPath(uri.to_string())),
        }
    }
}

impl Display for PetAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_uri())
    }
}

/// Address parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    UnknownAuthority(String),
    UnknownPath(String),
    InvalidItemId(String),
}

impl Display for ContractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAuthority(uri) => write!(f, "unknown content authority in `{uri}`"),
            Self::UnknownPath(uri) => write!(f, "unknown content path in `{uri}`"),
            Self::InvalidItemId(raw) => write!(f, "invalid pet id `{raw}`"),
        }
    }
}

impl Error for ContractError {}

#[cfg(test)]
mod tests {
    use super::{
        create_table_sql, is_valid_gender, ContractError, Gender, PetAddress, CONTENT_ITEM_TYPE,
        CONTENT_LIST_TYPE, CONTENT_URI,
    };

    #[test]
    fn gender_codes_roundtrip_through_enum() {
        for gender in [Gender::Unknown, Gender::Male, Gender::Female] {
            assert_eq!(Gender::from_code(gender.code()), Some(gender));
            assert!(is_valid_gender(gender.code()));
        }
        assert_eq!(Gender::from_code(3), None);
    }

    #[test]
    fn create_table_sql_matches_column_layout() {
        assert_eq!(
            create_table_sql(),
            "CREATE TABLE pets (_id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, \
             breed TEXT, gender INTEGER NOT NULL, weight INTEGER NOT NULL DEFAULT 0);"
        );
    }

    #[test]
    fn addresses_render_and_parse() {
        assert_eq!(PetAddress::Collection.to_uri(), CONTENT_URI);
        assert_eq!(
            PetAddress::parse("content://com.example.android.pets/pets").unwrap(),
            PetAddress::Collection
        );
        assert_eq!(
            PetAddress::parse(&PetAddress::item(7).to_uri()).unwrap(),
            PetAddress::Item(7)
        );
        assert_eq!(PetAddress::Collection.mime_type(), CONTENT_LIST_TYPE);
        assert_eq!(PetAddress::Item(1).mime_type(), CONTENT_ITEM_TYPE);
    }

    #[test]
    fn parse_rejects_foreign_and_malformed_addresses() {
        assert!(matches!(
            PetAddress::parse("content://other.app/pets"),
            Err(ContractError::UnknownAuthority(_))
        ));
        assert!(matches!(
            PetAddress::parse("content://com.example.android.pets/cats"),
            Err(ContractError::UnknownPath(_))
        ));
        assert!(matches!(
            PetAddress::parse("content://com.example.android.pets/pets/abc"),
            Err(ContractError::InvalidItemId(_))
        ));
        assert!(matches!(
            PetAddress::parse("content://com.example.android.pets/pets/0"),
            Err(ContractError::InvalidItemId(_))
        ));
    }
}
