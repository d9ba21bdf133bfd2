//! Lenient decoding of submitted page forms.
//!
//! Browsers and scripts post pages with whatever subset of fields they
//! have. Missing fields keep their defaults; anything that cannot be
//! understood is reported back as a [`DecodeFailure`] and skipped, so a
//! partially valid form still produces a page.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::db::models::{Item, Page};

#[derive(Debug, Error)]
pub enum DecodeFailure {
    #[error("Malformed form data: {0}")]
    Malformed(#[from] serde_urlencoded::de::Error),

    #[error("Unknown field {0:?}")]
    UnknownField(String),

    #[error("Invalid boolean {value:?} for field {field:?}")]
    InvalidBool { field: String, value: String },

    #[error("Invalid item key {0:?}")]
    InvalidItemKey(String),
}

pub type FormPairs = Vec<(String, String)>;

/// Query-string pairs followed by url-encoded body pairs, so body values
/// win when a key appears in both.
pub fn form_pairs(query: Option<&str>, body: &[u8]) -> (FormPairs, Vec<DecodeFailure>) {
    let mut pairs = FormPairs::new();
    let mut failures = Vec::new();

    if let Some(query) = query {
        match serde_urlencoded::from_str::<FormPairs>(query) {
            Ok(found) => pairs.extend(found),
            Err(e) => failures.push(e.into()),
        }
    }
    if !body.is_empty() {
        match serde_urlencoded::from_bytes::<FormPairs>(body) {
            Ok(found) => pairs.extend(found),
            Err(e) => failures.push(e.into()),
        }
    }

    (pairs, failures)
}

/// Last value submitted for `name`, matched like page fields are.
pub fn field<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    let wanted = normalize(name);
    pairs
        .iter()
        .rev()
        .find(|(key, _)| normalize(key) == wanted)
        .map(|(_, value)| value.as_str())
}

/// Field names are case-insensitive and ignore `_` and `-`, so
/// `ShortTitle`, `shorttitle` and `short_title` all name the same field.
fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse_bool(field: &str, value: &str) -> Result<bool, DecodeFailure> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "false" | "off" | "0" | "no" | "" => Ok(false),
        _ => Err(DecodeFailure::InvalidBool {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

fn set_item_field(item: &mut Item, field: &str, value: &str) -> bool {
    let slot = match field {
        "category" => &mut item.category,
        "title" => &mut item.title,
        "description" => &mut item.description,
        "runnersup" => &mut item.runners_up,
        "image" => &mut item.image,
        _ => return false,
    };
    *slot = value.to_string();
    true
}

/// Build a page from form pairs. Items arrive as `items.<n>.<field>` and
/// are ordered by `<n>`; gaps in the numbering are closed up and rows
/// left entirely blank are dropped.
pub fn decode_page(pairs: &[(String, String)]) -> (Page, Vec<DecodeFailure>) {
    let mut page = Page::default();
    let mut items: BTreeMap<usize, Item> = BTreeMap::new();
    let mut failures = Vec::new();

    for (key, value) in pairs {
        let name = normalize(key);
        match name.as_str() {
            "url" => page.url = value.trim().trim_start_matches('/').to_string(),
            "shorttitle" => page.short_title = value.clone(),
            "fulltitle" => page.full_title = value.clone(),
            "subtitle" => page.subtitle = value.clone(),
            "image" => page.image = value.clone(),
            "body" => page.body = value.clone(),
            "visible" => match parse_bool(key, value) {
                Ok(visible) => page.visible = visible,
                Err(e) => failures.push(e),
            },
            _ if name.starts_with("items.") => {
                let mut parts = name.splitn(3, '.').skip(1);
                let index = parts.next().and_then(|i| i.parse::<usize>().ok());
                let field = parts.next();
                match (index, field) {
                    (Some(index), Some(field)) => {
                        let item = items.entry(index).or_default();
                        if !set_item_field(item, field, value) {
                            failures.push(DecodeFailure::InvalidItemKey(key.clone()));
                        }
                    }
                    _ => failures.push(DecodeFailure::InvalidItemKey(key.clone())),
                }
            }
            _ => failures.push(DecodeFailure::UnknownField(key.clone())),
        }
    }

    page.items = items
        .into_values()
        .filter(|item| !item.is_blank())
        .collect();
    (page, failures)
}
