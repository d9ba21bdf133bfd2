use serde::{Deserialize, Serialize};

/// Slug of the home page.
pub const INDEX_URL: &str = "index";

/// Titles shown in place of a page that is not yet public.
pub const COMING_SOON: &str = "Coming soon.";

/// A content record addressed by its URL slug.
///
/// `nav_bar` and `footer` are filled in when the page is loaded for
/// rendering and are never written to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub short_title: String,
    pub full_title: String,
    pub subtitle: String,
    pub items: Vec<Item>,
    pub nav_bar: Vec<NavEntry>,
    pub footer: String,
    pub image: String,
    pub body: String,
    pub visible: bool,
}

impl Page {
    /// Placeholder served publicly while a page is hidden. Navigation and
    /// footer are carried over so the site chrome stays intact.
    pub fn coming_soon(nav_bar: Vec<NavEntry>, footer: String) -> Self {
        Self {
            short_title: COMING_SOON.to_string(),
            full_title: COMING_SOON.to_string(),
            nav_bar,
            footer,
            ..Self::default()
        }
    }
}

/// One entry in a page's list, stored as JSON alongside the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub category: String,
    pub title: String,
    pub description: String,
    pub runners_up: String,
    pub image: String,
}

impl Item {
    /// True when every field is empty, as in the edit form's spare row.
    pub fn is_blank(&self) -> bool {
        [
            &self.category,
            &self.title,
            &self.description,
            &self.runners_up,
            &self.image,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub url: String,
    pub short_title: String,
    pub visible: bool,
}

/// Singleton site configuration, stored under ident 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub full_name: String,
    pub short_name: String,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub username: String,
    pub password_hash: String,
}

/// Denormalized copy of the home page titles, rewritten on every save of
/// the `index` page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTitles {
    pub short_title: String,
    pub full_title: String,
}
