use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::affiliate::AffiliateFlow;
use crate::auth::AuthFlow;
use crate::catalog::CatalogClient;
use crate::checkout::CheckoutFlow;
use crate::config::LuxeConfig;
use crate::device::DeviceSignal;
use crate::error::Result;
use crate::rest::LuxeHttpClient;
use crate::session::{Session, SessionStore};
use crate::types::{ApiStatus, Product};

/// Entry point wiring the shared pieces together.
///
/// Flows are created per view: each call hands out a fresh controller with
/// its own cancellation scope, all sharing one HTTP client and one
/// [`SessionStore`].
#[derive(Debug, Clone)]
pub struct Luxe {
    pub http_client: Arc<LuxeHttpClient>,
    pub session: Arc<SessionStore>,
    pub device: Arc<DeviceSignal>,
    catalog: CatalogClient,
    shutdown: CancellationToken,
}

impl Luxe {
    /// Build a client whose session persists at `config.session_path`.
    pub fn new(config: LuxeConfig) -> Result<Self> {
        let session = SessionStore::open(&config.session_path);
        Self::with_session(config, session)
    }

    /// Build a client over an existing session store.
    pub fn with_session(config: LuxeConfig, session: SessionStore) -> Result<Self> {
        let api_url = config.api_url()?;
        let http_client = Arc::new(LuxeHttpClient::with_timeout(
            &api_url,
            config.request_timeout,
        )?);
        tracing::debug!(api_url = %api_url, "storefront client ready");
        Ok(Self {
            catalog: CatalogClient::new(Arc::clone(&http_client), config.catalog_failure),
            http_client,
            session: Arc::new(session),
            device: Arc::new(DeviceSignal::default()),
            shutdown: CancellationToken::new(),
        })
    }

    /// Replace the device signal source.
    pub fn with_device(mut self, device: DeviceSignal) -> Self {
        self.device = Arc::new(device);
        self
    }

    /// Cancel every flow handed out by this client.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn auth_flow(&self) -> AuthFlow {
        AuthFlow::with_parent(
            Arc::clone(&self.http_client),
            Arc::clone(&self.session),
            Arc::clone(&self.device),
            &self.shutdown,
        )
    }

    pub fn checkout(&self, product: Product) -> CheckoutFlow {
        CheckoutFlow::new(Arc::clone(&self.http_client), product).cancelled_with(&self.shutdown)
    }

    pub fn affiliate_flow(&self) -> AffiliateFlow {
        AffiliateFlow::new(Arc::clone(&self.http_client)).cancelled_with(&self.shutdown)
    }

    pub fn current_session(&self) -> Session {
        self.session.get()
    }

    /// Drop the session. Flows are unaffected.
    pub fn logout(&self) -> Result<()> {
        self.session.clear()
    }

    /// Fetch the API banner.
    pub async fn ping(&self) -> Result<ApiStatus> {
        self.http_client.get_status().await
    }
}
