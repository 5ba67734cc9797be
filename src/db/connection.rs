use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use crate::config::{DatabaseLocation, ProviderConfig};
use crate::contract::CREATE_PETS_TABLE;

/// Schema steps in order. Entry `n` moves a database from version `n` to
/// `n + 1`, so appending a statement is how the schema evolves.
const MIGRATIONS: &[&str] = &[CREATE_PETS_TABLE];

/// Version recorded in `PRAGMA user_version` once every migration has run.
pub const DATABASE_VERSION: i64 = MIGRATIONS.len() as i64;

/// Distinguishes shared-cache in-memory databases opened by the same process.
static MEMORY_DATABASES: AtomicUsize = AtomicUsize::new(0);

/// Owns the two SQLite handles the provider works through: one writable
/// connection that every insert, update, and delete goes through, and one
/// query-only connection for reads. Both are closed when the helper drops.
pub struct PetDbHelper {
    writable: Connection,
    readable: Connection,
}

impl PetDbHelper {
    /// Open (creating if needed) the database described by `config` and bring
    /// its schema up to [`DATABASE_VERSION`].
    pub fn open(config: &ProviderConfig) -> Result<Self> {
        match &config.location {
            DatabaseLocation::File(path) => Self::open_file(path, config.busy_timeout),
            DatabaseLocation::Memory => Self::open_in_memory(config.busy_timeout),
        }
    }

    fn open_file(path: &Path, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }

        let mut writable = Connection::open(path).context("failed to open SQLite database")?;
        writable
            .busy_timeout(busy_timeout)
            .context("failed to set busy timeout")?;

        // WAL lets the read handle keep streaming rows while a write commits.
        let journal_mode: String = writable
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .context("failed to switch journal mode")?;
        debug!(path = %path.display(), %journal_mode, "opened writable pets database");

        migrate(&mut writable)?;

        let readable = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("failed to open read-only SQLite handle")?;
        readable
            .busy_timeout(busy_timeout)
            .context("failed to set busy timeout")?;

        Ok(Self { writable, readable })
    }

    fn open_in_memory(busy_timeout: Duration) -> Result<Self> {
        let name = format!(
            "file:pet-provider-{}-{}?mode=memory&cache=shared",
            std::process::id(),
            MEMORY_DATABASES.fetch_add(1, Ordering::Relaxed)
        );
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let mut writable = Connection::open_with_flags(&name, flags)
            .context("failed to open in-memory SQLite database")?;
        writable
            .busy_timeout(busy_timeout)
            .context("failed to set busy timeout")?;
        migrate(&mut writable)?;

        let readable = Connection::open_with_flags(&name, flags)
            .context("failed to open in-memory read handle")?;
        // Shared-cache connections take table locks; reading uncommitted data
        // keeps an open cursor from blocking the writer.
        readable
            .execute_batch("PRAGMA query_only = ON; PRAGMA read_uncommitted = ON;")
            .context("failed to configure in-memory read handle")?;
        debug!(db = %name, "opened in-memory pets database");

        Ok(Self { writable, readable })
    }

    /// Handle for queries. Writes through it fail.
    pub fn readable(&self) -> &Connection {
        &self.readable
    }

    /// Handle shared by every write.
    pub fn writable(&self) -> &Connection {
        &self.writable
    }

    pub fn schema_version(&self) -> Result<i64> {
        read_version(&self.writable)
    }
}

fn read_version(conn: &Connection) -> Result<i64> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .context("failed to read schema version")
}

/// Apply every migration the database has not seen yet inside one
/// transaction. Databases written by a newer schema are refused rather than
/// guessed at.
fn migrate(conn: &mut Connection) -> Result<()> {
    let current = read_version(conn)?;
    let Ok(applied) = usize::try_from(current) else {
        bail!("database schema version {current} is not a valid version");
    };

    if current > DATABASE_VERSION {
        bail!(
            "database schema version {current} is newer than supported version {DATABASE_VERSION}"
        );
    }
    if current == DATABASE_VERSION {
        debug!(version = current, "pets schema up to date");
        return Ok(());
    }

    let tx = conn
        .transaction()
        .context("failed to start schema migration")?;
    for (step, statement) in MIGRATIONS.iter().enumerate().skip(applied) {
        tx.execute_batch(statement)
            .with_context(|| format!("failed to apply schema step {}", step + 1))?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {DATABASE_VERSION}"))
        .context("failed to record schema version")?;
    tx.commit().context("failed to commit schema migration")?;

    if current == 0 {
        info!(version = DATABASE_VERSION, "created pets schema");
    } else {
        info!(from = current, to = DATABASE_VERSION, "upgraded pets schema");
    }
    Ok(())
}
