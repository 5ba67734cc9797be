//! Domain models mirroring the `pets` table. These stay plain data holders; the
//! provider owns validation and the storage layer owns SQL.

use std::fmt;

use crate::contract::{COLUMN_BREED, COLUMN_GENDER, COLUMN_ID, COLUMN_NAME, COLUMN_WEIGHT};
use crate::db::Record;
use crate::error::{Operation, ProviderError, Result};
use crate::values::{ContentValues, Value};

/// Gender codes as stored in the `gender` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gender {
    /// Code 0, also what the editor shows before a choice is made.
    #[default]
    Unknown = 0,
    Male = 1,
    Female = 2,
}

impl Gender {
    /// `None` for any code outside 0..=2.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Gender::Unknown),
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn is_valid(code: i64) -> bool {
        Self::from_code(code).is_some()
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Unknown => "Unknown",
            Gender::Male => "Male",
            Gender::Female => "Female",
        };
        f.write_str(label)
    }
}

/// One stored row of the `pets` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    /// Assigned by the store on insert; never reused while the row exists.
    pub id: i64,
    /// Never blank.
    pub name: String,
    /// Free text, including absent.
    pub breed: Option<String>,
    pub gender: Gender,
    /// Kilograms. Zero when the caller never provided one.
    pub weight: i64,
}

impl Pet {
    /// Render every editable field as insert/update values. The id is left out
    /// because the store assigns it.
    pub fn to_values(&self) -> ContentValues {
        ContentValues::new()
            .with(COLUMN_NAME, self.name.as_str())
            .with(COLUMN_BREED, self.breed.clone())
            .with(COLUMN_GENDER, self.gender.code())
            .with(COLUMN_WEIGHT, self.weight)
    }

    /// Hydrate a pet from a row that carries every column. A missing column
    /// or a value the column cannot hold is a [`ProviderError::StorageFailure`]
    /// naming that column.
    pub fn from_record(record: &Record) -> Result<Self> {
        let integer = |column: &str| {
            record
                .get_i64(column)
                .ok_or_else(|| unusable_column(record, column))
        };

        let breed = match record.get(COLUMN_BREED) {
            Some(Value::Null) => None,
            Some(other) => Some(
                other
                    .as_text()
                    .ok_or_else(|| unusable_column(record, COLUMN_BREED))?,
            ),
            None => return Err(unusable_column(record, COLUMN_BREED)),
        };

        let code = integer(COLUMN_GENDER)?;
        let gender = Gender::from_code(code).ok_or_else(|| {
            let index = record.column_index(COLUMN_GENDER).unwrap_or_default();
            ProviderError::storage(
                Operation::Query,
                rusqlite::Error::IntegralValueOutOfRange(index, code),
            )
        })?;

        Ok(Pet {
            id: integer(COLUMN_ID)?,
            name: record
                .get_string(COLUMN_NAME)
                .ok_or_else(|| unusable_column(record, COLUMN_NAME))?,
            breed,
            gender,
            weight: integer(COLUMN_WEIGHT)?,
        })
    }
}

fn unusable_column(record: &Record, column: &str) -> ProviderError {
    let source = match (record.column_index(column), record.get(column)) {
        (Some(index), Some(value)) => {
            rusqlite::Error::InvalidColumnType(index, column.to_string(), value.sql_type())
        }
        _ => rusqlite::Error::InvalidColumnName(column.to_string()),
    };
    ProviderError::storage(Operation::Query, source)
}

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.breed {
            Some(breed) if !breed.trim().is_empty() => write!(f, "{} ({breed})", self.name),
            _ => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_codes() {
        assert_eq!(Gender::from_code(1), Some(Gender::Male));
        assert_eq!(Gender::Female.code(), 2);
        assert!(Gender::is_valid(0));
        assert!(!Gender::is_valid(3));
        assert!(!Gender::is_valid(-1));
    }

    #[test]
    fn test_to_values_omits_id() {
        let pet = Pet {
            id: 9,
            name: "Toto".to_string(),
            breed: None,
            gender: Gender::Male,
            weight: 14,
        };
        let values = pet.to_values();

        assert!(!values.contains_key(COLUMN_ID));
        assert_eq!(values.get(COLUMN_BREED), Some(&Value::Null));
        assert_eq!(values.get_as_integer(COLUMN_GENDER), Some(1));
    }

    fn record(gender: Value, weight: Value) -> Record {
        Record::new(vec![
            (COLUMN_ID.to_string(), Value::Integer(3)),
            (COLUMN_NAME.to_string(), Value::from("Toto")),
            (COLUMN_BREED.to_string(), Value::Null),
            (COLUMN_GENDER.to_string(), gender),
            (COLUMN_WEIGHT.to_string(), weight),
        ])
    }

    #[test]
    fn test_from_record_hydrates_every_field() {
        let pet = Pet::from_record(&record(Value::Integer(2), Value::Integer(4))).unwrap();
        assert_eq!(pet.id, 3);
        assert_eq!(pet.breed, None);
        assert_eq!(pet.gender, Gender::Female);
        assert_eq!(pet.weight, 4);
    }

    #[test]
    fn test_from_record_reports_unusable_column() {
        let err = Pet::from_record(&record(Value::Integer(1), Value::from("heavy"))).unwrap_err();
        match err {
            ProviderError::StorageFailure {
                operation: Operation::Query,
                source: rusqlite::Error::InvalidColumnType(index, column, found),
            } => {
                assert_eq!(index, 4);
                assert_eq!(column, COLUMN_WEIGHT);
                assert_eq!(found, rusqlite::types::Type::Text);
            }
            other => panic!("expected StorageFailure, got {other:?}"),
        }

        let err = Pet::from_record(&record(Value::Integer(7), Value::Integer(4))).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::StorageFailure {
                source: rusqlite::Error::IntegralValueOutOfRange(3, 7),
                ..
            }
        ));
    }

    #[test]
    fn test_from_record_reports_missing_column() {
        let partial = Record::new(vec![(COLUMN_ID.to_string(), Value::Integer(1))]);
        assert!(matches!(
            Pet::from_record(&partial),
            Err(ProviderError::StorageFailure {
                source: rusqlite::Error::InvalidColumnName(_),
                ..
            })
        ));
    }

    #[test]
    fn test_display_includes_breed_when_known() {
        let mut pet = Pet {
            id: 1,
            name: "Toto".to_string(),
            breed: Some("Terrier".to_string()),
            gender: Gender::Male,
            weight: 14,
        };
        assert_eq!(pet.to_string(), "Toto (Terrier)");

        pet.breed = None;
        assert_eq!(pet.to_string(), "Toto");
    }
}
