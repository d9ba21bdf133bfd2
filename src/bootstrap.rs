use crate::auth::password::hash_password;
use crate::config::{AdminDefaults, Config, SiteDefaults};
use crate::db;
use crate::db::models::{Admin, Page, SiteConfig, INDEX_URL};
use crate::state::DbPool;
use crate::store::admin::AdminStore;
use crate::store::config::ConfigStore;
use crate::store::pages::PageStore;

/// Prepare the database and seed whatever is missing: site configuration,
/// the home and admin pages, and the administrator credential. Existing
/// records are never replaced.
///
/// Only a schema failure aborts; a failed seed is logged and startup goes
/// on. Returns the site configuration the server should run with.
pub async fn run(
    pool: &DbPool,
    pages: &dyn PageStore,
    config: &Config,
) -> anyhow::Result<SiteConfig> {
    db::ensure_schema(pool)?;

    let site = seed_config(&ConfigStore::new(pool.clone()), &config.site);
    seed_pages(pages, &site).await;
    seed_admin(&AdminStore::new(pool.clone()), &config.admin);

    Ok(site)
}

fn seed_config(store: &ConfigStore, defaults: &SiteDefaults) -> SiteConfig {
    let seed = SiteConfig {
        full_name: defaults.full_name.clone(),
        short_name: defaults.short_name.clone(),
        footer: defaults.footer.clone(),
    };

    match store.insert_if_absent(&seed) {
        Ok(true) => tracing::info!("Seeded site configuration"),
        Ok(false) => {}
        Err(e) => tracing::error!("Seeding site configuration failed: {}", e),
    }

    match store.load() {
        Ok(Some(site)) => site,
        Ok(None) => {
            tracing::error!("Site configuration missing after seeding, using defaults");
            seed
        }
        Err(e) => {
            tracing::error!("Site configuration retrieval failed, using defaults: {}", e);
            seed
        }
    }
}

async fn seed_pages(pages: &dyn PageStore, site: &SiteConfig) {
    let seeds = [(INDEX_URL, "Default Subtitle"), ("admin", "Admin Panel")];

    for (url, subtitle) in seeds {
        let page = Page {
            url: url.to_string(),
            short_title: site.short_name.clone(),
            full_title: site.full_name.clone(),
            subtitle: subtitle.to_string(),
            visible: true,
            ..Page::default()
        };
        match pages.insert_if_absent(&page).await {
            Ok(true) => tracing::info!(url = %page.url, "Seeded page"),
            Ok(false) => {}
            Err(e) => tracing::error!(url = %page.url, "Seeding page failed: {}", e),
        }
    }
}

fn seed_admin(store: &AdminStore, defaults: &AdminDefaults) {
    match store.find(&defaults.username) {
        Ok(Some(_)) => return,
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Administrator lookup failed: {}", e);
            return;
        }
    }

    let password_hash = match hash_password(&defaults.password, defaults.bcrypt_cost) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Hashing administrator password failed: {}", e);
            return;
        }
    };
    let admin = Admin {
        username: defaults.username.clone(),
        password_hash,
    };

    match store.insert_if_absent(&admin) {
        Ok(true) => tracing::info!(username = %admin.username, "Seeded administrator"),
        Ok(false) => {}
        Err(e) => tracing::error!("Seeding administrator failed: {}", e),
    }
}
