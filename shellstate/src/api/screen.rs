//! Display configuration adapter.

use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::watch;
use zbus::Connection;

use crate::Result;
use crate::api::control::DisplayConfigSource;
use crate::api::models::{DisplayConfig, Error, Output};
use crate::api::options::BusEndpoint;
use crate::core::kscreen::parse_config;
use crate::core::snapshot::service_running;
use crate::dbus::KScreenBackendProxy;
use crate::monitoring::screen as screen_monitor;

/// The KScreen backend on the session bus.
#[derive(Debug, Clone)]
pub struct KScreenBackend {
    conn: Connection,
    endpoint: BusEndpoint,
}

impl KScreenBackend {
    pub async fn new(endpoint: BusEndpoint) -> Result<Self> {
        let conn = Connection::session().await?;
        Ok(Self::with_connection(conn, endpoint))
    }

    pub fn with_connection(conn: Connection, endpoint: BusEndpoint) -> Self {
        Self { conn, endpoint }
    }

    pub(crate) async fn proxy(&self) -> Result<KScreenBackendProxy<'_>> {
        Ok(KScreenBackendProxy::builder(&self.conn)
            .destination(self.endpoint.service.as_str())?
            .path(self.endpoint.path.as_str())?
            .interface(self.endpoint.interface.as_str())?
            .build()
            .await?)
    }
}

#[async_trait]
impl DisplayConfigSource for KScreenBackend {
    async fn load_config(&self) -> Result<DisplayConfig> {
        if !service_running(&self.conn, &self.endpoint.service).await? {
            return Err(Error::ServiceUnavailable(self.endpoint.service.clone()));
        }
        let map = self.proxy().await?.get_config().await?;
        parse_config(&map)
    }
}

/// Publishes the current display configuration.
///
/// While a reload is in flight the configuration is absent, so observers
/// drop the old output model before the new one arrives.
pub struct Screen<S> {
    source: S,
    config: watch::Sender<Option<DisplayConfig>>,
}

impl<S: DisplayConfigSource> Screen<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: watch::Sender::new(None),
        }
    }

    /// Reloads the configuration. On failure it stays absent.
    pub async fn load(&self) {
        self.config.send_if_modified(|current| current.take().is_some());

        match self.source.load_config().await {
            Ok(config) => {
                debug!("Loaded display config with {} outputs", config.outputs.len());
                self.config.send_replace(Some(config));
            }
            Err(e) => warn!("Failed to load display config: {e}"),
        }
    }

    pub fn config(&self) -> Option<DisplayConfig> {
        self.config.borrow().clone()
    }

    pub fn output_model(&self) -> Option<Vec<Output>> {
        self.config.borrow().as_ref().map(|c| c.outputs.clone())
    }

    pub fn auto_rotation_supported(&self) -> bool {
        self.config
            .borrow()
            .as_ref()
            .is_some_and(DisplayConfig::auto_rotation_supported)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<DisplayConfig>> {
        self.config.subscribe()
    }
}

impl Screen<KScreenBackend> {
    /// Reloads whenever the backend reports a new configuration, until
    /// `shutdown` fires.
    pub async fn monitor(&self, shutdown: watch::Receiver<()>) -> Result<()> {
        screen_monitor::monitor_screen(self, &self.source, shutdown).await
    }
}
