//! Field rules for pets. Validation never touches storage: it either hands
//! back a normalized copy of the caller's values, ready to bind, or the first
//! rule that failed.

use crate::contract::{is_column, COLUMN_BREED, COLUMN_GENDER, COLUMN_ID, COLUMN_NAME, COLUMN_WEIGHT};
use crate::error::{ProviderError, Result};
use crate::models::Gender;
use crate::values::{ContentValues, SortOrder, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Name and gender must be present.
    Insert,
    /// Only present keys are checked.
    Update,
}

/// Rules for a new row: `name` and `gender` required, `weight` optional.
pub(crate) fn insert_values(values: &ContentValues) -> Result<ContentValues> {
    validate(values, Mode::Insert)
}

/// Rules for a partial update: whatever is present must be valid.
pub(crate) fn update_values(values: &ContentValues) -> Result<ContentValues> {
    validate(values, Mode::Update)
}

fn validate(values: &ContentValues, mode: Mode) -> Result<ContentValues> {
    let mut clean = ContentValues::new();

    match values.get(COLUMN_NAME) {
        Some(value) => {
            let name = value
                .as_text()
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| ProviderError::invalid(COLUMN_NAME, "name required"))?;
            clean.put(COLUMN_NAME, name);
        }
        None if mode == Mode::Insert => {
            return Err(ProviderError::invalid(COLUMN_NAME, "name required"));
        }
        None => {}
    }

    match values.get(COLUMN_GENDER) {
        Some(value) => {
            let gender = value
                .as_integer()
                .and_then(Gender::from_code)
                .ok_or_else(|| ProviderError::invalid(COLUMN_GENDER, "invalid gender"))?;
            clean.put(COLUMN_GENDER, gender.code());
        }
        None if mode == Mode::Insert => {
            return Err(ProviderError::invalid(COLUMN_GENDER, "invalid gender"));
        }
        None => {}
    }

    // The column is NOT NULL with a default, so an explicit null is rejected
    // rather than left for the engine to refuse.
    if let Some(value) = values.get(COLUMN_WEIGHT) {
        let weight = value
            .as_integer()
            .filter(|weight| *weight >= 0)
            .ok_or_else(|| ProviderError::invalid(COLUMN_WEIGHT, "invalid weight"))?;
        clean.put(COLUMN_WEIGHT, weight);
    }

    // Null clears the breed; anything else is stored as text.
    if let Some(value) = values.get(COLUMN_BREED) {
        match value {
            Value::Null => clean.put_null(COLUMN_BREED),
            Value::Blob(_) => return Err(ProviderError::invalid(COLUMN_BREED, "invalid breed")),
            other => clean.put(COLUMN_BREED, other.to_string()),
        }
    }

    for key in values.keys() {
        if key == COLUMN_ID {
            return Err(ProviderError::invalid(COLUMN_ID, "assigned by the provider"));
        }
        if !is_column(key) {
            return Err(ProviderError::invalid(key, "unknown column"));
        }
    }

    Ok(clean)
}

/// Every projected column must exist. An empty projection means all columns.
pub(crate) fn projection(columns: &[&str]) -> Result<()> {
    match columns.iter().find(|column| !is_column(column)) {
        Some(column) => Err(ProviderError::invalid(*column, "unknown column")),
        None => Ok(()),
    }
}

pub(crate) fn sort_order(order: &SortOrder) -> Result<()> {
    match order.keys().iter().find(|(column, _)| !is_column(column)) {
        Some((column, _)) => Err(ProviderError::invalid(column.as_str(), "unknown column")),
        None => Ok(()),
    }
}
