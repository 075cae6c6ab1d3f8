use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use rusqlite::Connection;
use tracing::debug;

use super::error::{StoreError, StoreResult};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".plant-care-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "plants.sqlite";

/// Open the database at its default location, creating the data directory
/// and running lazy migrations on the way. This is the entry point the
/// application calls once at startup; the returned connection is then passed
/// by reference to every store function.
pub fn open_default() -> StoreResult<Connection> {
    let db_path = db_path()?;

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }

    open_at(&db_path)
}

/// Open (or create) the database at an explicit path. Split out from
/// [`open_default`] so tools and tests can point the store at a scratch file.
pub fn open_at(path: &Path) -> StoreResult<Connection> {
    let conn = Connection::open(path).map_err(|source| StoreError::Connection {
        path: path.to_path_buf(),
        source,
    })?;
    ensure_schema(&conn)?;
    debug!(path = %path.display(), "opened plant database");
    Ok(conn)
}

/// Open a throwaway in-memory database with the full schema applied. Used by
/// the test suite so every case starts from an empty store.
pub fn open_in_memory() -> StoreResult<Connection> {
    let conn = Connection::open_in_memory().map_err(|source| StoreError::Connection {
        path: PathBuf::from(":memory:"),
        source,
    })?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the tables if they do not exist yet. The function also toggles
/// `PRAGMA foreign_keys = ON` so the engine behaves the same during tests and
/// production runs. `plants.category` stays a free-text reference rather than
/// a declared foreign key; the category store keeps it consistent itself.
pub fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS plants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            species TEXT,
            acquireDate TEXT,
            waterFreq INTEGER,
            repotFreq INTEGER,
            pruneFreq INTEGER,
            status TEXT,
            image TEXT,
            notes TEXT,
            waterCountdown INTEGER,
            repotCountdown INTEGER,
            pruneCountdown INTEGER,
            category TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            name TEXT PRIMARY KEY
        )",
        [],
    )?;

    Ok(())
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn db_path() -> StoreResult<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| {
        StoreError::DataDir(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "could not locate home directory",
        ))
    })?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
