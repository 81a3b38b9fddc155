//! Runtime options shared by the adapters.
//!
//! Every field has a default, so a partial configuration file deserializes
//! into a complete `ShellOptions`.

use serde::{Deserialize, Serialize};

use crate::types::constants::bus;

/// Location of a D-Bus object on the session bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusEndpoint {
    pub service: String,
    pub path: String,
    pub interface: String,
}

impl BusEndpoint {
    pub fn new(
        service: impl Into<String>,
        path: impl Into<String>,
        interface: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            path: path.into(),
            interface: interface.into(),
        }
    }

    /// The settings daemon that owns the wallpaper properties.
    pub fn wallpaper() -> Self {
        Self::new(
            bus::WALLPAPER_SERVICE,
            bus::WALLPAPER_PATH,
            bus::WALLPAPER_INTERFACE,
        )
    }

    /// The KScreen backend launcher.
    pub fn kscreen() -> Self {
        Self::new(bus::KSCREEN_SERVICE, bus::KSCREEN_PATH, bus::KSCREEN_INTERFACE)
    }
}

/// Options controlling what the adapters show and where they connect.
///
/// # Example
///
/// ```rust
/// use shellstate::ShellOptions;
///
/// let opts = ShellOptions {
///     manage_virtual_connections: false,
///     ..Default::default()
/// };
/// assert_eq!(opts.wallpaper.path, "/Theme");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellOptions {
    /// Include bond, bridge, infiniband, team and vlan connections in the
    /// active connection summary.
    pub manage_virtual_connections: bool,
    pub wallpaper: BusEndpoint,
    pub kscreen: BusEndpoint,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            manage_virtual_connections: true,
            wallpaper: BusEndpoint::wallpaper(),
            kscreen: BusEndpoint::kscreen(),
        }
    }
}
