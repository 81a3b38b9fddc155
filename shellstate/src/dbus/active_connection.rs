//! NetworkManager Active Connection proxy.

use zbus::{Result, proxy};
use zvariant::OwnedObjectPath;

/// Proxy for active connection interface.
///
/// Describes an in-progress or established connection: which profile it
/// came from, which devices carry it and whether it owns a default route.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Connection.Active",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMActiveConnection {
    /// Values:
    /// - 0: Unknown
    /// - 1: Activating
    /// - 2: Activated
    /// - 3: Deactivating
    /// - 4: Deactivated
    #[zbus(property)]
    fn state(&self) -> Result<u32>;

    /// Path to the connection settings used for this connection.
    #[zbus(property)]
    fn connection(&self) -> Result<OwnedObjectPath>;

    /// Connection identifier shown to the user.
    #[zbus(property)]
    fn id(&self) -> Result<String>;

    #[zbus(property)]
    fn uuid(&self) -> Result<String>;

    /// Setting type string, e.g. `802-11-wireless`.
    #[zbus(property, name = "Type")]
    fn connection_type(&self) -> Result<String>;

    /// Paths to devices using this connection.
    #[zbus(property)]
    fn devices(&self) -> Result<Vec<OwnedObjectPath>>;

    /// Owns the IPv4 default route.
    #[zbus(property, name = "Default")]
    fn is_default(&self) -> Result<bool>;

    /// Owns the IPv6 default route.
    #[zbus(property, name = "Default6")]
    fn is_default6(&self) -> Result<bool>;

    #[zbus(property)]
    fn vpn(&self) -> Result<bool>;

    /// Master device path for enslaved connections, or `/`.
    #[zbus(property)]
    fn master(&self) -> Result<OwnedObjectPath>;
}
