//! NetworkManager Access Point proxy.

use zbus::{Result, proxy};

/// Proxy for a visible access point.
#[proxy(
    interface = "org.freedesktop.NetworkManager.AccessPoint",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMAccessPoint {
    /// SSID as raw bytes.
    #[zbus(property)]
    fn ssid(&self) -> Result<Vec<u8>>;

    /// Signal quality, 0 to 100.
    #[zbus(property)]
    fn strength(&self) -> Result<u8>;

    #[zbus(property)]
    fn flags(&self) -> Result<u32>;

    #[zbus(property)]
    fn wpa_flags(&self) -> Result<u32>;

    #[zbus(property)]
    fn rsn_flags(&self) -> Result<u32>;

    #[zbus(property)]
    fn mode(&self) -> Result<u32>;
}
