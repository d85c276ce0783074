//! The configuration structs used to build the AppConfig, and their impls.
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;

use crate::config::ConfigError;
use crate::subscriber_client::ApiCredentials;

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub subscriber_api: SubscriberApiConfig,
    pub site: SiteConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SubscriberApiConfig {
    pub base_url: String,
    pub timeout_millis: u64,
    /// Filled from `MAILERLITE_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<SecretString>,
    /// Filled from `MAILERLITE_GROUP_ID`.
    #[serde(skip)]
    pub group_id: Option<String>,
}

/// Metadata rendered into the landing page.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub lang: String,
    pub dir: String,
}

// ###################################
// ->   IMPLs
// ###################################
impl SubscriberApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }

    /// Returns the credentials only if both the API key and the group ID are present.
    pub fn credentials(&self) -> Option<ApiCredentials> {
        match (&self.api_key, &self.group_id) {
            (Some(api_key), Some(group_id)) => {
                Some(ApiCredentials::new(api_key.clone(), group_id.clone()))
            }
            _ => None,
        }
    }
}

// ###################################
// ->   TRY FROMs
// ###################################
impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail(value)),
        }
    }
}
