//! Static description of the `pets` table and the content URIs that address
//! it. Nothing in here performs I/O; the constants are shared by the storage
//! adapter, the provider, and callers building values or projections.

/// Scheme used by every content URI the provider answers.
pub const SCHEME: &str = "content";
/// Default authority the provider registers under.
pub const CONTENT_AUTHORITY: &str = "com.example.android.pets";
/// Path segment naming the pets collection.
pub const PATH_PETS: &str = "pets";

/// MIME base type for a URI naming many rows.
pub const CURSOR_DIR_BASE_TYPE: &str = "vnd.android.cursor.dir";
/// MIME base type for a URI naming a single row.
pub const CURSOR_ITEM_BASE_TYPE: &str = "vnd.android.cursor.item";

pub const TABLE_NAME: &str = "pets";

pub const COLUMN_ID: &str = "_id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_BREED: &str = "breed";
pub const COLUMN_GENDER: &str = "gender";
pub const COLUMN_WEIGHT: &str = "weight";

/// Every column in table order. A `SELECT *` returns exactly these.
pub const ALL_COLUMNS: [&str; 5] = [
    COLUMN_ID,
    COLUMN_NAME,
    COLUMN_BREED,
    COLUMN_GENDER,
    COLUMN_WEIGHT,
];

/// Statement run when the database is first created.
pub const CREATE_PETS_TABLE: &str = "CREATE TABLE IF NOT EXISTS pets (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    breed TEXT,
    gender INTEGER NOT NULL,
    weight INTEGER NOT NULL DEFAULT 0
)";

/// Whether `name` is one of the table's columns.
pub fn is_column(name: &str) -> bool {
    ALL_COLUMNS.contains(&name)
}
