//! NetworkManager Device proxy.

use zbus::{Result, proxy};

/// Proxy for the generic device interface.
///
/// Type specific interfaces (wireless) live on the same object path.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Device",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMDevice {
    /// Interface name, e.g. `wlan0`.
    #[zbus(property)]
    fn interface(&self) -> Result<String>;

    /// Device type code, see `DeviceType`.
    #[zbus(property)]
    fn device_type(&self) -> Result<u32>;

    #[zbus(property)]
    fn state(&self) -> Result<u32>;

    /// Disconnects the device and blocks autoconnect until the user acts.
    fn disconnect(&self) -> Result<()>;
}
