use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "osma", about = "A minimal page-based content management server")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory served under /data/
    #[arg(long)]
    pub assets_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub assets: AssetsConfig,
    pub site: SiteDefaults,
    pub admin: AdminDefaults,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AssetsConfig {
    pub dir: PathBuf,
}

/// Values written into the `config` table the first time the server starts.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SiteDefaults {
    pub full_name: String,
    pub short_name: String,
    pub footer: String,
}

/// Seed credential for the administrator account. The password is hashed
/// before it is stored.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AdminDefaults {
    pub username: String,
    pub password: String,
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

impl Default for SiteDefaults {
    fn default() -> Self {
        Self {
            full_name: "Default Full Website Name".to_string(),
            short_name: "Short Name".to_string(),
            footer: "Default Footer".to_string(),
        }
    }
}

impl Default for AdminDefaults {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "password".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli);
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // CLI overrides
        if let Some(ref host) = cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(ref dir) = cli.assets_dir {
            config.assets.dir = dir.clone();
        }

        if config.database.path.is_none() {
            config.database.path = Some(data_dir.join("osma.db"));
        }

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".osma")
        })
    }

    /// Database file location. `load` always resolves it; a hand-built
    /// `Config` falls back to `osma.db` in the working directory.
    pub fn db_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("osma.db"))
    }
}
