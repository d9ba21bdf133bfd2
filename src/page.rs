use thiserror::Error;

use crate::db::models::{Page, SiteConfig};
use crate::store::pages::PageStore;
use crate::store::StoreError;

/// Why a page could not be assembled for rendering.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Page lookup failed: {0}")]
    Lookup(#[source] StoreError),

    #[error("Navigation listing failed: {0}")]
    Navigation(#[source] StoreError),
}

/// Fetch a page and attach what every rendered page carries: the
/// navigation over all stored pages and the site footer.
pub async fn load_page(
    store: &dyn PageStore,
    site: &SiteConfig,
    url: &str,
) -> Result<Page, LoadError> {
    let mut page = store
        .find(url)
        .await
        .map_err(LoadError::Lookup)?
        .ok_or_else(|| LoadError::NotFound(url.to_string()))?;

    page.nav_bar = store.list_nav().await.map_err(LoadError::Navigation)?;
    page.footer = site.footer.clone();
    Ok(page)
}

/// Public view of a page. Hidden pages are swapped for the "Coming soon."
/// placeholder; navigation survives either way.
pub fn visibility_gate(page: Page) -> Page {
    if page.visible {
        page
    } else {
        Page::coming_soon(page.nav_bar, page.footer)
    }
}
