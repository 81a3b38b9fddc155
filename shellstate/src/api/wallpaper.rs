//! Wallpaper settings exposed by the theme daemon.

use log::{info, warn};
use tokio::sync::watch;
use zbus::Connection;
use zbus::proxy::CacheProperties;

use crate::Result;
use crate::api::models::WallpaperEvent;
use crate::api::options::BusEndpoint;
use crate::core::snapshot::service_running;
use crate::dbus::ThemeProxy;
use crate::monitoring::wallpaper as wallpaper_monitor;

/// Reads the wallpaper path and the dark mode dimming flag.
///
/// A missing daemon is not an error: reads fall back to an empty path and
/// no dimming.
#[derive(Debug, Clone)]
pub struct Wallpaper {
    conn: Connection,
    endpoint: BusEndpoint,
}

impl Wallpaper {
    pub async fn new(endpoint: BusEndpoint) -> Result<Self> {
        let conn = Connection::session().await?;
        Ok(Self::with_connection(conn, endpoint))
    }

    pub fn with_connection(conn: Connection, endpoint: BusEndpoint) -> Self {
        Self { conn, endpoint }
    }

    pub(crate) async fn proxy(&self) -> Result<ThemeProxy<'_>> {
        Ok(ThemeProxy::builder(&self.conn)
            .destination(self.endpoint.service.as_str())?
            .path(self.endpoint.path.as_str())?
            .interface(self.endpoint.interface.as_str())?
            .cache_properties(CacheProperties::No)
            .build()
            .await?)
    }

    /// Whether the settings daemon is on the bus.
    pub async fn is_available(&self) -> bool {
        match service_running(&self.conn, &self.endpoint.service).await {
            Ok(running) => running,
            Err(e) => {
                warn!("Failed to query {}: {e}", self.endpoint.service);
                false
            }
        }
    }

    pub async fn path(&self) -> String {
        match self.read_path().await {
            Ok(path) => path,
            Err(e) => {
                warn!("Failed to read wallpaper path: {e}");
                String::new()
            }
        }
    }

    pub async fn dims_wallpaper(&self) -> bool {
        match self.read_dims().await {
            Ok(dims) => dims,
            Err(e) => {
                warn!("Failed to read wallpaper dimming: {e}");
                false
            }
        }
    }

    async fn read_path(&self) -> Result<String> {
        Ok(self.proxy().await?.wallpaper().await?)
    }

    pub(crate) async fn read_dims(&self) -> Result<bool> {
        Ok(self.proxy().await?.dark_mode_dims_wallpaper().await?)
    }

    /// Forwards change notifications until `shutdown` fires.
    ///
    /// Returns immediately when the daemon is not running.
    pub async fn monitor<F>(&self, shutdown: watch::Receiver<()>, callback: F) -> Result<()>
    where
        F: FnMut(WallpaperEvent),
    {
        if !self.is_available().await {
            info!(
                "{} is not running, wallpaper changes are not monitored",
                self.endpoint.service
            );
            return Ok(());
        }
        wallpaper_monitor::monitor_wallpaper(self, shutdown, callback).await
    }
}
