use std::path::PathBuf;
use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::db::models::SiteConfig;
use crate::auth::Authenticator;
use crate::store::pages::PageStore;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<dyn PageStore>,
    pub auth: Arc<Authenticator>,
    /// Site configuration as it stood after bootstrap.
    pub site: Arc<SiteConfig>,
    pub assets_dir: PathBuf,
}
