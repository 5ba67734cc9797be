//! URI-addressed CRUD over a single-table SQLite store of pets.
//!
//! Callers address the collection as `content://<authority>/pets` and a single
//! pet as `content://<authority>/pets/<id>`, and talk to [`PetProvider`]
//! through four operations: query, insert, update, and delete. Values are
//! validated before anything is written, and every failure comes back as one
//! of the [`ProviderError`] kinds.
pub mod config;
pub mod contract;
pub mod db;
pub mod error;
pub mod models;
pub mod provider;
pub mod uri;
mod validate;
pub mod values;

/// Where the store lives and which authority it answers to.
pub use config::{DatabaseLocation, ProviderConfig};

/// The storage adapter and the row types queries hand back.
pub use db::{Cursor, PetDbHelper, Record};

/// Every operation reports failure through these.
pub use error::{Operation, ProviderError, Result};

/// Typed view of a stored row.
pub use models::{Gender, Pet};

/// The record access service and the routing it is assembled from.
pub use provider::{pet_matcher, MimeKind, MimeType, PetCode, PetProvider, Target};

/// Addressing: URIs and the matcher that classifies them.
pub use uri::{ContentUri, UriMatcher};

/// Loosely typed inputs: column values, row filters, and sort keys.
pub use values::{ContentValues, Direction, Selection, SortOrder, Value};
