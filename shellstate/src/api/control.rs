//! Collaborator traits the adapters are written against.
//!
//! The adapters never touch the bus directly. `NetworkManager` and
//! `KScreenBackend` are the bus-backed implementations; tests substitute
//! in-memory fakes.

use async_trait::async_trait;

use crate::Result;
use crate::api::models::{DisplayConfig, NetworkSnapshot};

/// Network service operations.
#[async_trait]
pub trait NetworkControl: Send + Sync {
    /// Reads the current state of the network service.
    async fn snapshot(&self) -> Result<NetworkSnapshot>;

    async fn set_networking_enabled(&self, enabled: bool) -> Result<()>;

    async fn set_wireless_enabled(&self, enabled: bool) -> Result<()>;

    /// Mobile broadband radio switch.
    async fn set_wwan_enabled(&self, enabled: bool) -> Result<()>;

    /// Activates a saved profile, returning the active connection path.
    async fn activate_connection(
        &self,
        connection: &str,
        device: Option<&str>,
        specific_object: Option<&str>,
    ) -> Result<String>;

    /// Creates and activates a profile for a visible access point.
    async fn add_and_activate_connection(
        &self,
        device: &str,
        access_point: &str,
        password: &str,
    ) -> Result<String>;

    async fn deactivate_connection(&self, connection: &str, device: &str) -> Result<()>;

    async fn remove_connection(&self, connection: &str) -> Result<()>;
}

/// Source of the display configuration.
#[async_trait]
pub trait DisplayConfigSource: Send + Sync {
    async fn load_config(&self) -> Result<DisplayConfig>;
}
