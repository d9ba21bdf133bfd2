use async_trait::async_trait;
use rusqlite::{params, Transaction};

use crate::db::models::{IndexTitles, NavEntry, Page, INDEX_URL};
use crate::state::DbPool;
use crate::store::StoreError;

/// Page collection - the only authority on stored pages.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Exact-match lookup by URL.
    async fn find(&self, url: &str) -> Result<Option<Page>, StoreError>;

    /// `{url, short_title, visible}` of every stored page, hidden ones included.
    async fn list_nav(&self) -> Result<Vec<NavEntry>, StoreError>;

    /// Create or fully replace the page stored under `page.url`.
    /// Saving `index` also rewrites the index titles in the same transaction.
    async fn upsert(&self, page: &Page) -> Result<(), StoreError>;

    /// Store `page` only if its URL is free. Returns whether it was written.
    async fn insert_if_absent(&self, page: &Page) -> Result<bool, StoreError>;

    /// Delete by URL. Missing pages are not an error.
    async fn remove(&self, url: &str) -> Result<(), StoreError>;

    async fn index_titles(&self) -> Result<Option<IndexTitles>, StoreError>;
}

pub struct SqlitePageStore {
    pool: DbPool,
}

impl SqlitePageStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const SELECT_PAGE: &str = "SELECT url, short_title, full_title, subtitle, items, image, body, visible
     FROM pages WHERE url = ?1";

const INSERT_PAGE: &str = "INSERT INTO pages (url, short_title, full_title, subtitle, items, image, body, visible)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

fn write_page(tx: &Transaction<'_>, sql: &str, page: &Page) -> Result<usize, StoreError> {
    let items = serde_json::to_string(&page.items)?;
    let rows = tx.execute(
        sql,
        params![
            page.url,
            page.short_title,
            page.full_title,
            page.subtitle,
            items,
            page.image,
            page.body,
            page.visible,
        ],
    )?;
    Ok(rows)
}

fn write_index_titles(tx: &Transaction<'_>, page: &Page) -> Result<(), StoreError> {
    tx.execute(
        "INSERT INTO index_titles (ident, short_title, full_title) VALUES (1, ?1, ?2)
         ON CONFLICT(ident) DO UPDATE SET
           short_title = excluded.short_title,
           full_title = excluded.full_title",
        params![page.short_title, page.full_title],
    )?;
    Ok(())
}

#[async_trait]
impl PageStore for SqlitePageStore {
    async fn find(&self, url: &str) -> Result<Option<Page>, StoreError> {
        let conn = self.pool.get()?;

        let result = conn.query_row(SELECT_PAGE, params![url], |row| {
            let page = Page {
                url: row.get(0)?,
                short_title: row.get(1)?,
                full_title: row.get(2)?,
                subtitle: row.get(3)?,
                image: row.get(5)?,
                body: row.get(6)?,
                visible: row.get(7)?,
                ..Page::default()
            };
            let items: String = row.get(4)?;
            Ok((page, items))
        });

        match result {
            Ok((mut page, items)) => {
                page.items = serde_json::from_str(&items)?;
                Ok(Some(page))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_nav(&self) -> Result<Vec<NavEntry>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT url, short_title, visible FROM pages ORDER BY rowid")?;
        let entries = stmt
            .query_map([], |row| {
                Ok(NavEntry {
                    url: row.get(0)?,
                    short_title: row.get(1)?,
                    visible: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    async fn upsert(&self, page: &Page) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let sql = format!(
            "{INSERT_PAGE}
             ON CONFLICT(url) DO UPDATE SET
               short_title = excluded.short_title,
               full_title = excluded.full_title,
               subtitle = excluded.subtitle,
               items = excluded.items,
               image = excluded.image,
               body = excluded.body,
               visible = excluded.visible"
        );
        write_page(&tx, &sql, page)?;
        if page.url == INDEX_URL {
            write_index_titles(&tx, page)?;
        }

        tx.commit()?;
        Ok(())
    }

    async fn insert_if_absent(&self, page: &Page) -> Result<bool, StoreError> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let sql = format!("{INSERT_PAGE} ON CONFLICT(url) DO NOTHING");
        let inserted = write_page(&tx, &sql, page)? > 0;
        if inserted && page.url == INDEX_URL {
            write_index_titles(&tx, page)?;
        }

        tx.commit()?;
        Ok(inserted)
    }

    async fn remove(&self, url: &str) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM pages WHERE url = ?1", params![url])?;
        Ok(())
    }

    async fn index_titles(&self) -> Result<Option<IndexTitles>, StoreError> {
        let conn = self.pool.get()?;
        let result = conn.query_row(
            "SELECT short_title, full_title FROM index_titles WHERE ident = 1",
            [],
            |row| {
                Ok(IndexTitles {
                    short_title: row.get(0)?,
                    full_title: row.get(1)?,
                })
            },
        );

        match result {
            Ok(titles) => Ok(Some(titles)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
