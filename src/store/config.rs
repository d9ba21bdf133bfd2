use rusqlite::params;

use crate::db::models::SiteConfig;
use crate::state::DbPool;
use crate::store::StoreError;

const CONFIG_IDENT: i64 = 1;

/// Singleton site configuration.
#[derive(Clone)]
pub struct ConfigStore {
    pool: DbPool,
}

impl ConfigStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn load(&self) -> Result<Option<SiteConfig>, StoreError> {
        let conn = self.pool.get()?;
        let result = conn.query_row(
            "SELECT full_name, short_name, footer FROM config WHERE ident = ?1",
            params![CONFIG_IDENT],
            |row| {
                Ok(SiteConfig {
                    full_name: row.get(0)?,
                    short_name: row.get(1)?,
                    footer: row.get(2)?,
                })
            },
        );

        match result {
            Ok(config) => Ok(Some(config)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set-on-insert: an existing configuration is left untouched.
    pub fn insert_if_absent(&self, config: &SiteConfig) -> Result<bool, StoreError> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "INSERT INTO config (ident, full_name, short_name, footer) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(ident) DO NOTHING",
            params![
                CONFIG_IDENT,
                config.full_name,
                config.short_name,
                config.footer
            ],
        )?;
        Ok(rows > 0)
    }
}
