use rusqlite::params;

use crate::db::models::Admin;
use crate::state::DbPool;
use crate::store::StoreError;

#[derive(Clone)]
pub struct AdminStore {
    pool: DbPool,
}

impl AdminStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn find(&self, username: &str) -> Result<Option<Admin>, StoreError> {
        let conn = self.pool.get()?;
        let result = conn.query_row(
            "SELECT username, password_hash FROM admins WHERE username = ?1",
            params![username],
            |row| {
                Ok(Admin {
                    username: row.get(0)?,
                    password_hash: row.get(1)?,
                })
            },
        );

        match result {
            Ok(admin) => Ok(Some(admin)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stores the credential unless the username is already taken.
    pub fn insert_if_absent(&self, admin: &Admin) -> Result<bool, StoreError> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "INSERT OR IGNORE INTO admins (username, password_hash) VALUES (?1, ?2)",
            params![admin.username, admin.password_hash],
        )?;
        Ok(rows > 0)
    }
}
