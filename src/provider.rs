//! The record access service. Every entry point resolves its URI first, so an
//! unknown URI fails before validation or storage are touched; validation then
//! runs to completion before anything is written.

use std::fmt;

use tracing::{debug, error, warn};

use crate::config::ProviderConfig;
use crate::contract::{CURSOR_DIR_BASE_TYPE, CURSOR_ITEM_BASE_TYPE, PATH_PETS, SCHEME};
use crate::db::{self, Cursor, PetDbHelper};
use crate::error::{Operation, ProviderError, Result};
use crate::uri::{ContentUri, UriMatcher};
use crate::validate;
use crate::values::{ContentValues, Selection, SortOrder};

/// Route codes registered with the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetCode {
    /// `content://<authority>/pets`
    Pets,
    /// `content://<authority>/pets/#`
    PetId,
}

/// What a resolved URI addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Every row.
    Collection,
    /// The row with this id.
    Item(i64),
}

/// Matcher answering the pets collection and single-pet URIs under
/// `authority`.
pub fn pet_matcher(authority: &str) -> UriMatcher<PetCode> {
    UriMatcher::builder()
        .route(authority, PATH_PETS, PetCode::Pets)
        .route(authority, &format!("{PATH_PETS}/#"), PetCode::PetId)
        .build()
}

/// Whether a URI names many rows or one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeKind {
    Directory,
    Item,
}

/// Content type of a pets URI, e.g. `vnd.android.cursor.item/<authority>/pets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeType {
    pub kind: MimeKind,
    authority: String,
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.kind {
            MimeKind::Directory => CURSOR_DIR_BASE_TYPE,
            MimeKind::Item => CURSOR_ITEM_BASE_TYPE,
        };
        write!(f, "{base}/{}/{PATH_PETS}", self.authority)
    }
}

/// Validates and routes every query, insert, update, and delete on pets URIs
/// to the store.
pub struct PetProvider {
    helper: PetDbHelper,
    matcher: UriMatcher<PetCode>,
    authority: String,
}

impl PetProvider {
    /// Open the database described by `config` and register the pets routes
    /// under its authority.
    pub fn open(config: &ProviderConfig) -> anyhow::Result<Self> {
        let helper = PetDbHelper::open(config)?;
        Ok(Self::new(
            helper,
            pet_matcher(&config.authority),
            &config.authority,
        ))
    }

    /// Assemble a provider from an already opened store and a matcher whose
    /// routes use [`PetCode`].
    pub fn new(helper: PetDbHelper, matcher: UriMatcher<PetCode>, authority: &str) -> Self {
        Self {
            helper,
            matcher,
            authority: authority.to_string(),
        }
    }

    /// `content://<authority>/pets`
    pub fn content_uri(&self) -> ContentUri {
        ContentUri::new(SCHEME, &self.authority).with_segment(PATH_PETS)
    }

    /// `content://<authority>/pets/<id>`
    pub fn pet_uri(&self, id: i64) -> ContentUri {
        self.content_uri().with_appended_id(id)
    }

    /// Map a URI onto the collection or one row.
    pub fn resolve(&self, uri: &ContentUri) -> Result<Target> {
        let unknown = || ProviderError::UnknownResource(uri.to_string());

        let target = match self.matcher.matches(uri).ok_or_else(unknown)? {
            PetCode::Pets => Target::Collection,
            // The route only admits digits, but an id past i64::MAX still
            // fails to parse.
            PetCode::PetId => Target::Item(uri.parse_id().ok_or_else(unknown)?),
        };
        debug!(%uri, ?target, "resolved URI");
        Ok(target)
    }

    /// Rows of the collection, or the single row an item URI names. For an
    /// item URI the caller's selection is replaced with the URI's id. An empty
    /// projection selects every column; without a sort order rows come back
    /// in insertion order.
    pub fn query(
        &self,
        uri: &ContentUri,
        projection: &[&str],
        selection: &Selection,
        sort_order: Option<&SortOrder>,
    ) -> Result<Cursor<'_>> {
        let selection = self.scope(uri, selection)?;
        validate::projection(projection)?;
        if let Some(order) = sort_order {
            validate::sort_order(order)?;
        }

        db::query_pets(self.helper.readable(), projection, &selection, sort_order)
            .inspect_err(|err| error!(%uri, %err, "failed to query pets"))
    }

    /// Insert a pet and return its new id. Only the collection URI accepts
    /// inserts.
    pub fn insert(&self, uri: &ContentUri, values: &ContentValues) -> Result<i64> {
        if let Target::Item(_) = self.resolve(uri)? {
            return Err(ProviderError::UnsupportedOperation {
                operation: Operation::Insert,
                uri: uri.to_string(),
            });
        }

        let values = validate::insert_values(values)
            .inspect_err(|err| warn!(%uri, %err, "rejected pet insert"))?;

        let id = db::insert_pet(self.helper.writable(), &values).map_err(|err| {
            error!(%uri, %err, "failed to insert pet");
            ProviderError::storage(Operation::Insert, err)
        })?;
        debug!(id, "inserted pet");
        Ok(id)
    }

    /// Apply a partial update and return how many rows changed. Values with
    /// nothing in them are a no-op reported as zero rows.
    pub fn update(
        &self,
        uri: &ContentUri,
        values: &ContentValues,
        selection: &Selection,
    ) -> Result<usize> {
        let selection = self.scope(uri, selection)?;
        let values = validate::update_values(values)
            .inspect_err(|err| warn!(%uri, %err, "rejected pet update"))?;

        if values.is_empty() {
            debug!(%uri, "nothing to update");
            return Ok(0);
        }

        let rows = db::update_pets(self.helper.writable(), &values, &selection).map_err(|err| {
            error!(%uri, %err, "failed to update pets");
            ProviderError::storage(Operation::Update, err)
        })?;
        debug!(%uri, rows, "updated pets");
        Ok(rows)
    }

    /// Delete matching rows and return how many went away. An empty selection
    /// on the collection URI deletes everything.
    pub fn delete(&self, uri: &ContentUri, selection: &Selection) -> Result<usize> {
        let selection = self.scope(uri, selection)?;

        let rows = db::delete_pets(self.helper.writable(), &selection).map_err(|err| {
            error!(%uri, %err, "failed to delete pets");
            ProviderError::storage(Operation::Delete, err)
        })?;
        debug!(%uri, rows, "deleted pets");
        Ok(rows)
    }

    /// Directory type for the collection, item type for one pet.
    pub fn get_type(&self, uri: &ContentUri) -> Result<MimeType> {
        let kind = match self.resolve(uri)? {
            Target::Collection => MimeKind::Directory,
            Target::Item(_) => MimeKind::Item,
        };
        Ok(MimeType {
            kind,
            authority: uri.authority().to_string(),
        })
    }

    /// The selection an operation on `uri` actually runs with.
    fn scope(&self, uri: &ContentUri, selection: &Selection) -> Result<Selection> {
        Ok(match self.resolve(uri)? {
            Target::Collection => selection.clone(),
            Target::Item(id) => Selection::by_id(id),
        })
    }
}
