//! NetworkManager Wireless Device proxy.

use zbus::{Result, proxy};
use zvariant::OwnedObjectPath;

/// Proxy for wireless devices.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Device.Wireless",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMWireless {
    /// Signal emitted when a new access point becomes visible.
    #[zbus(signal)]
    fn access_point_added(&self, path: OwnedObjectPath);

    /// Operating mode (1 = ad-hoc, 2 = infrastructure, 3 = AP, 4 = mesh).
    #[zbus(property)]
    fn mode(&self) -> Result<u32>;

    #[zbus(property)]
    fn access_points(&self) -> Result<Vec<OwnedObjectPath>>;

    /// The associated access point, or `/`.
    #[zbus(property)]
    fn active_access_point(&self) -> Result<OwnedObjectPath>;
}
