pub mod serve;

// re-export
pub use serve::serve;

use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    config::{AppConfig, SiteConfig},
    templ_manager::TemplateManager,
    Result, SubscriberClient,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let credentials = config.subscriber_api.credentials();
        if credentials.is_none() {
            warn!(
                "{:<20} - subscriber API key or group ID missing, subscriptions will fail",
                "build_from_config"
            );
        }

        let tm = TemplateManager::init();
        let subscriber_client = SubscriberClient::new(
            &config.subscriber_api.base_url,
            credentials,
            config.subscriber_api.timeout(),
        )?;

        let app_state = AppState::new(tm, subscriber_client, config.site);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

pub struct InternalState {
    pub templ_mgr: TemplateManager,
    pub subscriber_client: SubscriberClient,
    pub site: SiteConfig,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(
        templ_mgr: TemplateManager,
        subscriber_client: SubscriberClient,
        site: SiteConfig,
    ) -> Self {
        AppState(Arc::new(InternalState {
            templ_mgr,
            subscriber_client,
            site,
        }))
    }
}
