//! Constants for the D-Bus interface values this crate consumes.
//!
//! These correspond to the numeric codes used by NetworkManager's and
//! KScreen's D-Bus APIs.

/// NetworkManager device type constants.
pub mod device_type {
    pub const UNKNOWN: u32 = 0;
    pub const ETHERNET: u32 = 1;
    pub const WIFI: u32 = 2;
    pub const BLUETOOTH: u32 = 5;
    pub const OLPC_MESH: u32 = 6;
    pub const WIMAX: u32 = 7;
    pub const MODEM: u32 = 8;
    pub const INFINIBAND: u32 = 9;
    pub const BOND: u32 = 10;
    pub const VLAN: u32 = 11;
    pub const ADSL: u32 = 12;
    pub const BRIDGE: u32 = 13;
    pub const GENERIC: u32 = 14;
    pub const TEAM: u32 = 15;
    pub const TUN: u32 = 16;
    pub const WIREGUARD: u32 = 29;
    pub const WIFI_P2P: u32 = 30;
    pub const LOOPBACK: u32 = 32;
}

/// NetworkManager global connectivity state (`NMState`).
pub mod nm_state {
    pub const ASLEEP: u32 = 10;
    pub const DISCONNECTED: u32 = 20;
    pub const DISCONNECTING: u32 = 30;
    pub const CONNECTING: u32 = 40;
    pub const CONNECTED_LOCAL: u32 = 50;
    pub const CONNECTED_SITE: u32 = 60;
    pub const CONNECTED_GLOBAL: u32 = 70;
}

/// VPN connection state (`NMVpnConnectionState`).
pub mod vpn_state {
    pub const UNKNOWN: u32 = 0;
    pub const PREPARE: u32 = 1;
    pub const NEED_AUTH: u32 = 2;
    pub const CONNECT: u32 = 3;
    pub const IP_CONFIG_GET: u32 = 4;
    pub const ACTIVATED: u32 = 5;
    pub const FAILED: u32 = 6;
    pub const DISCONNECTED: u32 = 7;
}

/// WiFi mode constants
pub mod wifi_mode {
    pub const ADHOC: u32 = 1;
    pub const INFRA: u32 = 2;
    pub const AP: u32 = 3;
    pub const MESH: u32 = 4;
}

/// Thresholds for the five wireless icon buckets.
pub mod signal_bucket {
    pub const LOW_MAX: u8 = 25;
    pub const MEDIUM_MAX: u8 = 50;
    pub const HIGH_MAX: u8 = 75;
    pub const FULL: u8 = 100;
}

/// Minimum NetworkManager version the status strings are written against.
pub mod nm_version {
    pub const MIN_MAJOR: u32 = 0;
    pub const MIN_MINOR: u32 = 9;
    pub const MIN_MICRO: u32 = 8;
}

/// Well-known bus names and object paths.
pub mod bus {
    pub const NM_SERVICE: &str = "org.freedesktop.NetworkManager";
    pub const NM_PATH: &str = "/org/freedesktop/NetworkManager";
    pub const NO_OBJECT: &str = "/";

    pub const KSCREEN_SERVICE: &str = "org.kde.KScreen";
    pub const KSCREEN_PATH: &str = "/backend";
    pub const KSCREEN_INTERFACE: &str = "org.kde.kscreen.Backend";

    pub const WALLPAPER_SERVICE: &str = "com.cutefish.Settings";
    pub const WALLPAPER_PATH: &str = "/Theme";
    pub const WALLPAPER_INTERFACE: &str = "com.cutefish.Theme";
}

/// Icon name prefix for the wireless indicator.
pub const WIRELESS_ICON_PREFIX: &str = "network-wireless-connected-";
