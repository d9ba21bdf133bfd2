use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use osma::auth::Authenticator;
use osma::config::{Cli, Config};
use osma::state::AppState;
use osma::store::admin::AdminStore;
use osma::store::pages::SqlitePageStore;
use osma::{bootstrap, db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting up");

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Open the database and seed anything missing
    let pool = db::create_pool(&config.db_path())?;
    let pages = Arc::new(SqlitePageStore::new(pool.clone()));
    let site = bootstrap::run(&pool, pages.as_ref(), &config).await?;

    let auth = Authenticator::new(AdminStore::new(pool), config.admin.bcrypt_cost)?;

    let state = AppState {
        pages,
        auth: Arc::new(auth),
        site: Arc::new(site),
        assets_dir: config.assets.dir.clone(),
    };

    let app = routes::app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
