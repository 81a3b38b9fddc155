use async_trait::async_trait;
use tokio::sync::watch;
use zbus::Connection;

use crate::Result;
use crate::api::control::NetworkControl;
use crate::api::models::{NetworkEvent, NetworkSnapshot};
use crate::core::connection as commands;
use crate::core::snapshot::fetch_snapshot;
use crate::monitoring::network as network_monitor;

/// NetworkManager on the system bus.
///
/// This is the bus-backed `NetworkControl` the indicator and the networking
/// panel are driven by.
///
/// # Example
///
/// ```no_run
/// use shellstate::{DisplayState, NetworkManager};
///
/// # async fn example() -> shellstate::Result<()> {
/// let nm = NetworkManager::new().await?;
/// let snapshot = nm.snapshot().await?;
/// let display = DisplayState::derive(&snapshot);
/// println!("{} ({})", display.connection_name, display.icon_name);
/// # Ok(())
/// # }
/// ```
///
/// `NetworkManager` is `Clone`; clones share the same D-Bus connection.
#[derive(Debug, Clone)]
pub struct NetworkManager {
    conn: Connection,
}

impl NetworkManager {
    /// Connects to the system D-Bus.
    pub async fn new() -> Result<Self> {
        let conn = Connection::system().await?;
        Ok(Self { conn })
    }

    pub fn with_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Reads everything the indicator and the panel derive their state from.
    pub async fn snapshot(&self) -> Result<NetworkSnapshot> {
        fetch_snapshot(&self.conn).await
    }

    /// Monitors NetworkManager until `shutdown` fires.
    ///
    /// The callback receives every change notification together with a
    /// snapshot read after it. Feed both into `NetworkIndicator::handle` and
    /// `Networking::handle`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use shellstate::{NetworkIndicator, NetworkManager};
    /// use tokio::sync::watch;
    ///
    /// # async fn example() -> shellstate::Result<()> {
    /// let nm = NetworkManager::new().await?;
    /// let indicator = NetworkIndicator::new(nm.clone());
    /// indicator.load().await?;
    ///
    /// let (_stop, shutdown) = watch::channel(());
    /// nm.monitor(shutdown, |event, snapshot| {
    ///     indicator.handle(&event, snapshot);
    /// })
    /// .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn monitor<F>(&self, shutdown: watch::Receiver<()>, callback: F) -> Result<()>
    where
        F: FnMut(NetworkEvent, &NetworkSnapshot),
    {
        network_monitor::monitor_network(&self.conn, shutdown, callback).await
    }
}

#[async_trait]
impl NetworkControl for NetworkManager {
    async fn snapshot(&self) -> Result<NetworkSnapshot> {
        fetch_snapshot(&self.conn).await
    }

    async fn set_networking_enabled(&self, enabled: bool) -> Result<()> {
        commands::set_networking_enabled(&self.conn, enabled).await
    }

    async fn set_wireless_enabled(&self, enabled: bool) -> Result<()> {
        commands::set_wireless_enabled(&self.conn, enabled).await
    }

    async fn set_wwan_enabled(&self, enabled: bool) -> Result<()> {
        commands::set_wwan_enabled(&self.conn, enabled).await
    }

    async fn activate_connection(
        &self,
        connection: &str,
        device: Option<&str>,
        specific_object: Option<&str>,
    ) -> Result<String> {
        commands::activate_connection(&self.conn, connection, device, specific_object).await
    }

    async fn add_and_activate_connection(
        &self,
        device: &str,
        access_point: &str,
        password: &str,
    ) -> Result<String> {
        commands::add_and_activate_connection(&self.conn, device, access_point, password).await
    }

    async fn deactivate_connection(&self, connection: &str, device: &str) -> Result<()> {
        commands::deactivate_connection(&self.conn, connection, device).await
    }

    async fn remove_connection(&self, connection: &str) -> Result<()> {
        commands::remove_connection(&self.conn, connection).await
    }
}
