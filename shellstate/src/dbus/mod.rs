//! D-Bus proxy interfaces.
//!
//! NetworkManager proxies talk to the system bus. The KScreen backend and the
//! theme settings daemon live on the session bus; their proxies carry no
//! default destination because the endpoint is configurable.

mod access_point;
mod active_connection;
mod device;
mod kscreen;
mod main_nm;
mod settings;
mod vpn_connection;
mod wallpaper;
mod wireless;

pub(crate) use access_point::NMAccessPointProxy;
pub(crate) use active_connection::NMActiveConnectionProxy;
pub(crate) use device::NMDeviceProxy;
pub(crate) use kscreen::KScreenBackendProxy;
pub(crate) use main_nm::NMProxy;
pub(crate) use settings::{NMSettingsConnectionProxy, NMSettingsProxy};
pub(crate) use vpn_connection::NMVpnConnectionProxy;
pub(crate) use wallpaper::ThemeProxy;
pub(crate) use wireless::NMWirelessProxy;
