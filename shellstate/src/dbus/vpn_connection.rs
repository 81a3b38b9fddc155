//! NetworkManager VPN Connection proxy.

use zbus::{Result, proxy};

/// Extra interface exposed by active connections that are VPNs.
#[proxy(
    interface = "org.freedesktop.NetworkManager.VPN.Connection",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMVpnConnection {
    /// `NMVpnConnectionState` code.
    #[zbus(property)]
    fn vpn_state(&self) -> Result<u32>;
}
