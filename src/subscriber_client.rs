use reqwest::{header, Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use strum_macros::AsRefStr;
use tracing::debug;

use crate::web::types::SubscriberEmail;

/// Status given to every subscriber we create, they skip double opt-in.
#[derive(Debug, Clone, Copy, AsRefStr)]
pub enum SubscriberStatus {
    #[strum(serialize = "active")]
    Active,
}

/// The server-held secrets needed to talk to the subscriber API.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    api_key: SecretString,
    group_id: String,
}

impl ApiCredentials {
    pub fn new(api_key: SecretString, group_id: String) -> Self {
        Self { api_key, group_id }
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }
}

/// Client for the MailerLite subscribers API.
#[derive(Debug)]
pub struct SubscriberClient {
    http_client: Client,
    url: reqwest::Url,
    credentials: Option<ApiCredentials>,
}

impl SubscriberClient {
    pub fn new<S: AsRef<str>>(
        base_url: S,
        credentials: Option<ApiCredentials>,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let mut url = reqwest::Url::parse(base_url.as_ref())
            .map_err(|e| Error::UrlParsing(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(Error::UrlParsing(format!("not a base url: {url}")));
        }
        // `Url::join` replaces the last segment unless the path ends with a slash.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(SubscriberClient {
            http_client,
            url,
            credentials,
        })
    }

    /// `None` when the deployment is missing the API key or the group ID.
    pub fn credentials(&self) -> Option<&ApiCredentials> {
        self.credentials.as_ref()
    }

    /// Creates an active subscriber in the configured group. Single attempt, never retried.
    pub async fn add_subscriber(
        &self,
        email: &SubscriberEmail,
        credentials: &ApiCredentials,
    ) -> Result<()> {
        let url = self
            .url
            .join("subscribers")
            .map_err(|e| Error::UrlParsing(e.to_string()))?;

        let new_subscriber = NewSubscriber {
            email: email.as_ref(),
            groups: [credentials.group_id()],
            status: SubscriberStatus::Active.as_ref(),
        };

        let resp = self
            .http_client
            .post(url)
            .bearer_auth(credentials.api_key().expose_secret())
            .header(header::ACCEPT, "application/json")
            .header(header::CACHE_CONTROL, "no-store")
            .json(&new_subscriber)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(Error::Rejected { status, body });
        }
        debug!("{:<20} - {status}", "subscriber api");

        Ok(())
    }
}

#[derive(Serialize)]
pub struct NewSubscriber<'a> {
    pub email: &'a str,
    pub groups: [&'a str; 1],
    pub status: &'a str,
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse the subscriber API url: {0}")]
    UrlParsing(String),
    #[error("subscriber API rejected the request with {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
