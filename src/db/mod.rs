pub mod models;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

use crate::state::DbPool;

/// Collections backing the site. Pages are keyed by `url` through a unique
/// index, which also serves every page lookup and upsert conflict.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS config (
    ident      INTEGER PRIMARY KEY,
    full_name  TEXT NOT NULL,
    short_name TEXT NOT NULL,
    footer     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pages (
    url         TEXT NOT NULL,
    short_title TEXT NOT NULL DEFAULT '',
    full_title  TEXT NOT NULL DEFAULT '',
    subtitle    TEXT NOT NULL DEFAULT '',
    items       TEXT NOT NULL DEFAULT '[]',
    image       TEXT NOT NULL DEFAULT '',
    body        TEXT NOT NULL DEFAULT '',
    visible     INTEGER NOT NULL DEFAULT 0
);

CREATE UNIQUE INDEX IF NOT EXISTS pages_url_idx ON pages (url);

CREATE TABLE IF NOT EXISTS index_titles (
    ident       INTEGER PRIMARY KEY CHECK (ident = 1),
    short_title TEXT NOT NULL,
    full_title  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS admins (
    username      TEXT PRIMARY KEY NOT NULL,
    password_hash TEXT NOT NULL
);
";

pub fn create_pool(db_path: &Path) -> anyhow::Result<DbPool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Per-connection settings; concurrent writers wait on the lock instead
    // of failing with SQLITE_BUSY.
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            ",
        )
    });
    let pool = Pool::builder().max_size(8).build(manager)?;

    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;

    Ok(pool)
}

/// Creates the tables and the URL index. Startup cannot continue without
/// them, so callers treat an error here as fatal.
pub fn ensure_schema(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;
    conn.execute_batch(SCHEMA)?;
    tracing::info!("Database schema ready");
    Ok(())
}
