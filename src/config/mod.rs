//! Tries to create an `AppConfig` from layered sources.
//! Uses `figment` to merge `config/base.toml`, the environment specific file and `APP_` prefixed
//! environment variables (`APP_NET_CONFIG__APP_PORT=9000`), in that order.
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod error;
mod structs;

use std::{path::Path, sync::OnceLock};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use secrecy::SecretString;
use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use structs::{AppConfig, Environment, NetConfig, SiteConfig, SubscriberApiConfig};

/// Process environment variable holding the subscriber API token.
pub const API_KEY_VAR: &str = "MAILERLITE_API_KEY";
/// Process environment variable holding the group new subscribers are assigned to.
pub const GROUP_ID_VAR: &str = "MAILERLITE_GROUP_ID";

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!(
            "{:<20} - Initializing the configuration",
            "get_or_init_config"
        );
        AppConfig::load().unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"))
    })
}

impl AppConfig {
    /// Loads the configuration from the `config` directory in the current working directory.
    /// The environment is picked with `APP_ENVIRONMENT` and defaults to `local`.
    pub fn load() -> ConfigResult<Self> {
        let config_dir = std::env::current_dir()?.join("config");
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()?;

        Self::load_from(&config_dir, environment)
    }

    pub fn load_from(config_dir: &Path, environment: Environment) -> ConfigResult<Self> {
        let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

        let mut config: AppConfig = Figment::new()
            .merge(Toml::file(config_dir.join("base.toml")))
            .merge(Toml::file(config_dir.join(environment_filename)))
            .merge(Env::prefixed("APP_").split("__"))
            .extract()?;

        // Secrets never live in the config files.
        config.subscriber_api.api_key = non_empty_env_var(API_KEY_VAR).map(SecretString::from);
        config.subscriber_api.group_id = non_empty_env_var(GROUP_ID_VAR);

        Ok(config)
    }
}

fn non_empty_env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|val| !val.is_empty())
}
