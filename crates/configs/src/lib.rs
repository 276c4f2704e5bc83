//! # configs
//!
//! Layered runtime configuration: built-in defaults, then an optional
//! `lost-found.{toml,yaml,json}` file, then `.env`, then `LF_*` environment
//! variables. Nested keys use a double underscore, e.g.
//! `LF_SEED__ADMIN_PASSWORD`.

use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use lf_core::seed::Seed;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// Base name of the optional config file.
pub const CONFIG_FILE: &str = "lost-found";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. "info" or "lf_board_local=debug"
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

/// Content for a brand-new document.
#[derive(Debug)]
pub struct SeedConfig {
    pub admin_username: String,
    pub admin_password: SecretString,
    pub admin_wechat: String,
    pub sample_posts: bool,
}

impl SeedConfig {
    pub fn to_seed(&self) -> Seed {
        Seed {
            admin_username: self.admin_username.clone(),
            admin_password: self.admin_password.expose_secret().to_string(),
            admin_wechat: self.admin_wechat.clone(),
            sample_posts: self.sample_posts,
        }
    }
}

#[derive(Debug)]
pub struct AppConfig {
    /// Directory holding the board document
    pub data_dir: PathBuf,
    pub log: LogConfig,
    pub seed: SeedConfig,
    /// The `.env` file that was read, if any. Logging is not set up yet
    /// while configuration loads, so the caller reports it.
    pub env_file: Option<PathBuf>,
}

#[derive(Deserialize)]
struct RawConfig {
    data_dir: PathBuf,
    log: LogConfig,
    seed: RawSeed,
}

#[derive(Deserialize)]
struct RawSeed {
    admin_username: String,
    admin_password: String,
    admin_wechat: String,
    sample_posts: bool,
}

impl AppConfig {
    /// Reads every source in precedence order.
    pub fn load() -> Result<Self, ConfigError> {
        let env_file = dotenvy::dotenv().ok();

        let cfg = Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix("LF")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(Self { env_file, ..Self::from_config(cfg)? })
    }

    /// A builder preloaded with the built-in defaults.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let seed = Seed::default();
        Ok(Config::builder()
            .set_default("data_dir", "./data")?
            .set_default("log.filter", "info")?
            .set_default("log.json", false)?
            .set_default("seed.admin_username", seed.admin_username)?
            .set_default("seed.admin_password", seed.admin_password)?
            .set_default("seed.admin_wechat", seed.admin_wechat)?
            .set_default("seed.sample_posts", seed.sample_posts)?)
    }

    pub fn from_config(cfg: Config) -> Result<Self, ConfigError> {
        let raw: RawConfig = cfg.try_deserialize()?;

        if raw.seed.admin_username.trim().is_empty() {
            return Err(ConfigError::Empty("seed.admin_username"));
        }
        if raw.seed.admin_password.is_empty() {
            return Err(ConfigError::Empty("seed.admin_password"));
        }

        Ok(Self {
            data_dir: raw.data_dir,
            log: raw.log,
            seed: SeedConfig {
                admin_username: raw.seed.admin_username,
                admin_password: SecretString::from(raw.seed.admin_password),
                admin_wechat: raw.seed.admin_wechat,
                sample_posts: raw.seed.sample_posts,
            },
            env_file: None,
        })
    }
}
