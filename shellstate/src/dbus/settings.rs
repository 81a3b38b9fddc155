//! NetworkManager Settings proxies.

use std::collections::HashMap;
use zbus::{Result, proxy};
use zvariant::{OwnedObjectPath, OwnedValue};

/// Saved connection profiles.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Settings",
    default_service = "org.freedesktop.NetworkManager",
    default_path = "/org/freedesktop/NetworkManager/Settings"
)]
pub trait NMSettings {
    fn list_connections(&self) -> Result<Vec<OwnedObjectPath>>;
}

/// One saved connection profile.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Settings.Connection",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMSettingsConnection {
    /// Settings without secrets, keyed by setting name then property.
    fn get_settings(&self) -> Result<HashMap<String, HashMap<String, OwnedValue>>>;

    fn delete(&self) -> Result<()>;

    /// Emitted when the profile is changed on disk or over the bus.
    #[zbus(signal)]
    fn updated(&self);
}
