use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::types::constants::{device_type, nm_state, vpn_state, wifi_mode};

/// Display ordering category of a network connection.
///
/// The declaration order is the priority used when listing active
/// connections: lower variants are listed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    Wired,
    Wireless,
    Gsm,
    Cdma,
    Pppoe,
    Adsl,
    Infiniband,
    OLPCMesh,
    Bluetooth,
    Vpn,
    Other,
}

impl From<ConnectionType> for ConnectionKind {
    fn from(ty: ConnectionType) -> Self {
        match ty {
            ConnectionType::Adsl => Self::Adsl,
            ConnectionType::Bluetooth => Self::Bluetooth,
            ConnectionType::Cdma => Self::Cdma,
            ConnectionType::Gsm => Self::Gsm,
            ConnectionType::Infiniband => Self::Infiniband,
            ConnectionType::OLPCMesh => Self::OLPCMesh,
            ConnectionType::Pppoe => Self::Pppoe,
            ConnectionType::Vpn => Self::Vpn,
            ConnectionType::Wired => Self::Wired,
            ConnectionType::Wireless => Self::Wireless,
            _ => Self::Other,
        }
    }
}

/// NetworkManager connection setting type.
///
/// Variants are declared in NetworkManager's own numeric order, so the
/// derived `Ord` matches the `<=` comparisons used by primary connection
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConnectionType {
    Unknown,
    Adsl,
    Bluetooth,
    Bond,
    Bridge,
    Cdma,
    Gsm,
    Infiniband,
    OLPCMesh,
    Pppoe,
    Vlan,
    Vpn,
    Wimax,
    Wired,
    Wireless,
    Team,
    Generic,
    Tun,
    IpTunnel,
    WireGuard,
}

impl ConnectionType {
    /// Parses the `connection.type` setting string.
    pub fn from_setting_type(s: &str) -> Self {
        match s {
            "adsl" => Self::Adsl,
            "bluetooth" => Self::Bluetooth,
            "bond" => Self::Bond,
            "bridge" => Self::Bridge,
            "cdma" => Self::Cdma,
            "gsm" => Self::Gsm,
            "infiniband" => Self::Infiniband,
            "802-11-olpc-mesh" => Self::OLPCMesh,
            "pppoe" => Self::Pppoe,
            "vlan" => Self::Vlan,
            "vpn" => Self::Vpn,
            "wimax" => Self::Wimax,
            "802-3-ethernet" => Self::Wired,
            "802-11-wireless" => Self::Wireless,
            "team" => Self::Team,
            "generic" => Self::Generic,
            "tun" => Self::Tun,
            "ip-tunnel" => Self::IpTunnel,
            "wireguard" => Self::WireGuard,
            _ => Self::Unknown,
        }
    }

    /// Returns the `connection.type` setting string.
    pub fn setting_type(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Adsl => "adsl",
            Self::Bluetooth => "bluetooth",
            Self::Bond => "bond",
            Self::Bridge => "bridge",
            Self::Cdma => "cdma",
            Self::Gsm => "gsm",
            Self::Infiniband => "infiniband",
            Self::OLPCMesh => "802-11-olpc-mesh",
            Self::Pppoe => "pppoe",
            Self::Vlan => "vlan",
            Self::Vpn => "vpn",
            Self::Wimax => "wimax",
            Self::Wired => "802-3-ethernet",
            Self::Wireless => "802-11-wireless",
            Self::Team => "team",
            Self::Generic => "generic",
            Self::Tun => "tun",
            Self::IpTunnel => "ip-tunnel",
            Self::WireGuard => "wireguard",
        }
    }

    /// Virtual connections aggregate or wrap other interfaces.
    pub fn is_virtual(&self) -> bool {
        matches!(
            self,
            Self::Bond | Self::Bridge | Self::Infiniband | Self::Team | Self::Vlan
        )
    }

    /// Whether connections of this type are shown to the user at all.
    ///
    /// Generic and tun connections never are; virtual ones only when the
    /// shell manages virtual connections.
    pub fn is_supported(&self, manage_virtual: bool) -> bool {
        match self {
            Self::Generic | Self::Tun => false,
            t if t.is_virtual() => manage_virtual,
            _ => true,
        }
    }

    pub fn kind(&self) -> ConnectionKind {
        ConnectionKind::from(*self)
    }
}

impl Display for ConnectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.setting_type())
    }
}

/// NetworkManager active connection state.
///
/// These values represent the lifecycle states of an active connection
/// as reported by the NM D-Bus API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveConnectionState {
    /// Connection state is unknown.
    Unknown,
    /// Connection is activating (connecting).
    Activating,
    /// Connection is fully activated (connected).
    Activated,
    /// Connection is deactivating (disconnecting).
    Deactivating,
    /// Connection is fully deactivated (disconnected).
    Deactivated,
    /// Unknown state code not mapped to a specific variant.
    Other(u32),
}

impl From<u32> for ActiveConnectionState {
    fn from(code: u32) -> Self {
        match code {
            0 => Self::Unknown,
            1 => Self::Activating,
            2 => Self::Activated,
            3 => Self::Deactivating,
            4 => Self::Deactivated,
            v => Self::Other(v),
        }
    }
}

impl Display for ActiveConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Activating => write!(f, "activating"),
            Self::Activated => write!(f, "activated"),
            Self::Deactivating => write!(f, "deactivating"),
            Self::Deactivated => write!(f, "deactivated"),
            Self::Other(v) => write!(f, "unknown state ({v})"),
        }
    }
}

/// VPN plugin connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VpnConnectionState {
    Unknown,
    Prepare,
    NeedAuth,
    Connecting,
    GettingIpConfig,
    Activated,
    Failed,
    Disconnected,
    Other(u32),
}

impl VpnConnectionState {
    /// Prepare through GettingIpConfig.
    pub fn is_connecting(&self) -> bool {
        matches!(
            self,
            Self::Prepare | Self::NeedAuth | Self::Connecting | Self::GettingIpConfig
        )
    }
}

impl From<u32> for VpnConnectionState {
    fn from(code: u32) -> Self {
        match code {
            vpn_state::UNKNOWN => Self::Unknown,
            vpn_state::PREPARE => Self::Prepare,
            vpn_state::NEED_AUTH => Self::NeedAuth,
            vpn_state::CONNECT => Self::Connecting,
            vpn_state::IP_CONFIG_GET => Self::GettingIpConfig,
            vpn_state::ACTIVATED => Self::Activated,
            vpn_state::FAILED => Self::Failed,
            vpn_state::DISCONNECTED => Self::Disconnected,
            v => Self::Other(v),
        }
    }
}

/// Read-only copy of one NetworkManager active connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveConnection {
    /// D-Bus path of the active connection object.
    pub path: String,
    /// Connection name shown to the user.
    pub id: String,
    pub uuid: String,
    /// D-Bus path of the settings profile this connection was activated from.
    pub connection: String,
    pub connection_type: ConnectionType,
    pub state: ActiveConnectionState,
    /// Device paths; empty for some VPN connections.
    pub devices: Vec<String>,
    /// Carries the IPv4 or IPv6 default route.
    pub is_default: bool,
    pub vpn: bool,
    pub vpn_state: Option<VpnConnectionState>,
    /// Device path of the bond, bridge or team this connection is enslaved to.
    pub master: Option<String>,
}

impl ActiveConnection {
    pub fn kind(&self) -> ConnectionKind {
        self.connection_type.kind()
    }

    pub fn first_device(&self) -> Option<&str> {
        self.devices.first().map(String::as_str)
    }
}

/// NetworkManager device types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    Unknown,
    Ethernet,
    Wifi,
    Bluetooth,
    OlpcMesh,
    Wimax,
    Modem,
    Infiniband,
    Bond,
    Vlan,
    Adsl,
    Bridge,
    Generic,
    Team,
    Tun,
    WireGuard,
    WifiP2P,
    Loopback,
    /// Unmapped device type with raw code.
    Other(u32),
}

impl DeviceType {
    /// Returns the raw NetworkManager type code for this device.
    pub fn to_code(&self) -> u32 {
        match self {
            Self::Unknown => device_type::UNKNOWN,
            Self::Ethernet => device_type::ETHERNET,
            Self::Wifi => device_type::WIFI,
            Self::Bluetooth => device_type::BLUETOOTH,
            Self::OlpcMesh => device_type::OLPC_MESH,
            Self::Wimax => device_type::WIMAX,
            Self::Modem => device_type::MODEM,
            Self::Infiniband => device_type::INFINIBAND,
            Self::Bond => device_type::BOND,
            Self::Vlan => device_type::VLAN,
            Self::Adsl => device_type::ADSL,
            Self::Bridge => device_type::BRIDGE,
            Self::Generic => device_type::GENERIC,
            Self::Team => device_type::TEAM,
            Self::Tun => device_type::TUN,
            Self::WireGuard => device_type::WIREGUARD,
            Self::WifiP2P => device_type::WIFI_P2P,
            Self::Loopback => device_type::LOOPBACK,
            Self::Other(code) => *code,
        }
    }

    /// Label used in the active connection summary.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ethernet => "Wired Ethernet",
            Self::Wifi => "Wi-Fi",
            Self::Bluetooth => "Bluetooth",
            Self::OlpcMesh => "Wireless Mesh",
            Self::Wimax => "WiMAX",
            Self::Modem => "Mobile Broadband",
            Self::Infiniband => "Infiniband",
            Self::Bond => "Bond",
            Self::Vlan => "VLAN",
            Self::Adsl => "ADSL",
            Self::Bridge => "Bridge",
            Self::Team => "Team",
            Self::Tun => "TUN",
            Self::WireGuard => "WireGuard",
            Self::WifiP2P => "Wi-Fi P2P",
            Self::Loopback => "Loopback",
            Self::Unknown | Self::Generic | Self::Other(_) => "Unknown",
        }
    }
}

impl From<u32> for DeviceType {
    fn from(value: u32) -> Self {
        match value {
            device_type::UNKNOWN => Self::Unknown,
            device_type::ETHERNET => Self::Ethernet,
            device_type::WIFI => Self::Wifi,
            device_type::BLUETOOTH => Self::Bluetooth,
            device_type::OLPC_MESH => Self::OlpcMesh,
            device_type::WIMAX => Self::Wimax,
            device_type::MODEM => Self::Modem,
            device_type::INFINIBAND => Self::Infiniband,
            device_type::BOND => Self::Bond,
            device_type::VLAN => Self::Vlan,
            device_type::ADSL => Self::Adsl,
            device_type::BRIDGE => Self::Bridge,
            device_type::GENERIC => Self::Generic,
            device_type::TEAM => Self::Team,
            device_type::TUN => Self::Tun,
            device_type::WIREGUARD => Self::WireGuard,
            device_type::WIFI_P2P => Self::WifiP2P,
            device_type::LOOPBACK => Self::Loopback,
            v => Self::Other(v),
        }
    }
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Other(v) => write!(f, "Other({v})"),
            other => f.write_str(other.label()),
        }
    }
}

/// NetworkManager device states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceState {
    Unmanaged,
    Unavailable,
    Disconnected,
    Prepare,
    Config,
    Activated,
    Deactivating,
    Failed,
    Other(u32),
}

impl From<u32> for DeviceState {
    fn from(value: u32) -> Self {
        match value {
            10 => DeviceState::Unmanaged,
            20 => DeviceState::Unavailable,
            30 => DeviceState::Disconnected,
            40 => DeviceState::Prepare,
            50 => DeviceState::Config,
            100 => DeviceState::Activated,
            110 => DeviceState::Deactivating,
            120 => DeviceState::Failed,
            v => DeviceState::Other(v),
        }
    }
}

/// Operating mode of a wireless device or access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WirelessMode {
    Unknown,
    Adhoc,
    Infrastructure,
    AccessPoint,
    Mesh,
}

impl From<u32> for WirelessMode {
    fn from(value: u32) -> Self {
        match value {
            wifi_mode::ADHOC => Self::Adhoc,
            wifi_mode::INFRA => Self::Infrastructure,
            wifi_mode::AP => Self::AccessPoint,
            wifi_mode::MESH => Self::Mesh,
            _ => Self::Unknown,
        }
    }
}

bitflags! {
    /// General access point capability flags (`NM80211ApFlags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct ApFlags: u32 {
        const PRIVACY = 0x1;
        const WPS = 0x2;
    }
}

bitflags! {
    /// WPA / RSN security flags (`NM80211ApSecurityFlags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct ApSecurityFlags: u32 {
        const PAIR_WEP40 = 0x1;
        const PAIR_WEP104 = 0x2;
        const PAIR_TKIP = 0x4;
        const PAIR_CCMP = 0x8;
        const GROUP_WEP40 = 0x10;
        const GROUP_WEP104 = 0x20;
        const GROUP_TKIP = 0x40;
        const GROUP_CCMP = 0x80;
        const KEY_MGMT_PSK = 0x100;
        const KEY_MGMT_802_1X = 0x200;
        const KEY_MGMT_SAE = 0x400;
    }
}

/// A visible access point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPoint {
    pub path: String,
    pub ssid: String,
    /// Signal strength as percentage (0-100).
    pub strength: u8,
    pub mode: WirelessMode,
    pub flags: ApFlags,
    pub wpa_flags: ApSecurityFlags,
    pub rsn_flags: ApSecurityFlags,
}

/// Signal strength of the network a wireless device is associated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirelessSample {
    pub ssid: String,
    pub strength: u8,
}

/// Wi-Fi specific state of a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirelessDetails {
    pub mode: WirelessMode,
    /// Path of the associated access point, `None` when not associated.
    pub active_access_point: Option<String>,
    pub access_points: Vec<AccessPoint>,
}

impl WirelessDetails {
    pub fn find_access_point(&self, path: &str) -> Option<&AccessPoint> {
        self.access_points.iter().find(|ap| ap.path == path)
    }

    /// Paths of the access points broadcasting the associated SSID.
    ///
    /// These are the ones whose strength feeds `sample`.
    pub fn network_access_points(&self) -> Vec<&str> {
        let Some(active) = self
            .active_access_point
            .as_deref()
            .and_then(|path| self.find_access_point(path))
        else {
            return Vec::new();
        };
        self.access_points
            .iter()
            .filter(|ap| ap.ssid == active.ssid)
            .map(|ap| ap.path.as_str())
            .collect()
    }

    /// Sample for the associated network.
    ///
    /// Several access points may broadcast the associated SSID; the network
    /// strength is that of the strongest one.
    pub fn sample(&self) -> Option<WirelessSample> {
        let active = self.find_access_point(self.active_access_point.as_deref()?)?;
        let strength = self
            .access_points
            .iter()
            .filter(|ap| ap.ssid == active.ssid)
            .map(|ap| ap.strength)
            .max()
            .unwrap_or(active.strength);

        Some(WirelessSample {
            ssid: active.ssid.clone(),
            strength,
        })
    }
}

/// Network device as seen at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub path: String,
    pub interface: String,
    pub device_type: DeviceType,
    pub state: DeviceState,
    /// Present for Wi-Fi devices only.
    pub wireless: Option<WirelessDetails>,
}

impl Device {
    /// Returns `true` if this is a wired (Ethernet) device.
    pub fn is_wired(&self) -> bool {
        matches!(self.device_type, DeviceType::Ethernet)
    }

    /// Returns `true` if this is a wireless (Wi-Fi) device.
    pub fn is_wireless(&self) -> bool {
        matches!(self.device_type, DeviceType::Wifi)
    }
}

/// NetworkManager global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NmState {
    #[default]
    Unknown,
    Asleep,
    Disconnected,
    Disconnecting,
    Connecting,
    ConnectedLinkLocal,
    ConnectedSiteOnly,
    Connected,
}

impl NmState {
    /// Link-local, site-only and global connectivity all count as connected.
    pub fn is_connected(&self) -> bool {
        matches!(
            self,
            Self::ConnectedLinkLocal | Self::ConnectedSiteOnly | Self::Connected
        )
    }
}

impl From<u32> for NmState {
    fn from(value: u32) -> Self {
        match value {
            nm_state::ASLEEP => Self::Asleep,
            nm_state::DISCONNECTED => Self::Disconnected,
            nm_state::DISCONNECTING => Self::Disconnecting,
            nm_state::CONNECTING => Self::Connecting,
            nm_state::CONNECTED_LOCAL => Self::ConnectedLinkLocal,
            nm_state::CONNECTED_SITE => Self::ConnectedSiteOnly,
            nm_state::CONNECTED_GLOBAL => Self::Connected,
            _ => Self::Unknown,
        }
    }
}

/// Everything the display derivations read, captured at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// NetworkManager owns its bus name.
    pub service_running: bool,
    pub version: Option<String>,
    pub state: NmState,
    pub networking_enabled: bool,
    pub wireless_enabled: bool,
    pub wireless_hardware_enabled: bool,
    pub wwan_enabled: bool,
    pub wwan_hardware_enabled: bool,
    pub active_connections: Vec<ActiveConnection>,
    /// Path of the connection currently being activated, if any.
    pub activating: Option<String>,
    pub devices: Vec<Device>,
}

impl NetworkSnapshot {
    pub fn find_device(&self, path: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.path == path)
    }

    pub fn find_active(&self, path: &str) -> Option<&ActiveConnection> {
        self.active_connections.iter().find(|c| c.path == path)
    }

    /// Access points whose strength changes can move the wireless icon.
    pub fn watched_access_points(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .devices
            .iter()
            .filter_map(|d| d.wireless.as_ref())
            .flat_map(|w| w.network_access_points())
            .map(str::to_string)
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }
}

/// Origin of an entry in the network list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkItemKind {
    /// A connection that can be brought up on a present device.
    AvailableConnection,
    /// A visible access point without a connection of its own.
    AvailableAccessPoint,
    /// A saved profile whose device or network is not around.
    UnavailableConnection,
}

/// One entry of the network list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkItem {
    /// Active connection or access point path.
    pub path: String,
    pub name: String,
    pub connection_type: ConnectionType,
    pub kind: NetworkItemKind,
    pub state: ActiveConnectionState,
    pub device: Option<String>,
    /// Strength for access points, 0 otherwise.
    pub strength: u8,
    /// Enslaved to a bond, bridge or team.
    pub slave: bool,
    /// Another entry already represents the same network.
    pub duplicate: bool,
}

/// Device lookup used when deriving the wireless icon.
pub trait DeviceLookup {
    fn find_device(&self, path: &str) -> Option<&Device>;
}

impl DeviceLookup for NetworkSnapshot {
    fn find_device(&self, path: &str) -> Option<&Device> {
        NetworkSnapshot::find_device(self, path)
    }
}

impl DeviceLookup for [Device] {
    fn find_device(&self, path: &str) -> Option<&Device> {
        self.iter().find(|d| d.path == path)
    }
}

/// State published by the network indicator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayState {
    /// Name of the active wireless connection, empty when none.
    pub connection_name: String,
    /// Wireless icon id, empty when no wireless icon is shown.
    pub icon_name: String,
}

/// Change notifications delivered by the network service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    NetworkingEnabledChanged,
    WirelessEnabledChanged,
    WirelessHardwareEnabledChanged,
    WwanEnabledChanged,
    WwanHardwareEnabledChanged,
    StatusChanged,
    ActiveConnectionsChanged,
    ActivatingConnectionChanged,
    /// The connection carrying the default route changed.
    PrimaryConnectionChanged,
    /// A connection profile in use by an active connection was updated.
    ConnectionUpdated(String),
    /// A wireless device sees a new network.
    WirelessNetworkAppeared(String),
    /// Strength of an access point changed.
    SignalStrengthChanged { access_point: String, strength: u8 },
    /// An active connection moved between activation states.
    ActiveConnectionStateChanged(String),
    /// A wireless device associated with a different access point.
    ActiveAccessPointChanged(String),
    /// A device was added or removed.
    DevicesChanged,
    /// NetworkManager appeared on or left the bus.
    ServiceOwnerChanged,
}

impl NetworkEvent {
    /// The set of watched objects changed, so signal subscriptions are stale.
    pub fn changes_watched_objects(&self) -> bool {
        matches!(
            self,
            Self::ActiveConnectionsChanged
                | Self::ActiveAccessPointChanged(_)
                | Self::DevicesChanged
                | Self::ServiceOwnerChanged
        )
    }
}

bitflags! {
    /// Capabilities reported by the display backend.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct ScreenFeatures: u32 {
        const PRIMARY_DISPLAY = 1;
        const WRITABLE = 1 << 1;
        const PER_OUTPUT_SCALING = 1 << 2;
        const OUTPUT_REPLICATION = 1 << 3;
        const AUTO_ROTATION = 1 << 4;
        const TABLET_MODE = 1 << 5;
    }
}

/// Output rotation as reported by KScreen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Normal,
    Left,
    Inverted,
    Right,
}

impl From<i64> for Rotation {
    fn from(value: i64) -> Self {
        match value {
            2 => Self::Left,
            4 => Self::Inverted,
            8 => Self::Right,
            _ => Self::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// One display output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    pub id: i32,
    pub name: String,
    pub enabled: bool,
    pub connected: bool,
    pub primary: bool,
    pub position: Position,
    /// Resolution of the current mode, if one is set.
    pub size: Option<Size>,
    pub refresh_rate: Option<f64>,
    pub scale: f64,
    pub rotation: Rotation,
}

/// Display configuration as loaded from the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub features: ScreenFeatures,
    pub outputs: Vec<Output>,
}

impl DisplayConfig {
    pub fn auto_rotation_supported(&self) -> bool {
        self.features
            .intersects(ScreenFeatures::AUTO_ROTATION | ScreenFeatures::TABLET_MODE)
    }
}

/// Change notifications from the wallpaper settings daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WallpaperEvent {
    PathChanged(String),
    DimsWallpaperChanged(bool),
}

/// Errors returned by shellstate operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A D-Bus communication error occurred.
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    /// A standard `org.freedesktop.DBus` error was returned.
    #[error("D-Bus error: {0}")]
    Fdo(#[from] zbus::fdo::Error),

    /// A reply could not be decoded.
    #[error("invalid D-Bus value: {0}")]
    Variant(#[from] zvariant::Error),

    /// A D-Bus call failed with extra context.
    #[error("{context}: {source}")]
    DbusOperation {
        context: String,
        #[source]
        source: zbus::Error,
    },

    /// The service is not present on the bus.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// No saved or active connection matches.
    #[error("connection not found: {0}")]
    ConnectionNotFound(String),

    /// No device matches.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// No visible access point matches.
    #[error("access point not found: {0}")]
    AccessPointNotFound(String),

    /// The access point requires credentials this crate does not configure.
    #[error("unsupported wireless security: {0}")]
    UnsupportedSecurity(String),

    /// A configuration map from a service could not be interpreted.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A signal stream closed.
    #[error("monitoring ended: {0}")]
    MonitorEnded(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ap(path: &str, ssid: &str, strength: u8) -> AccessPoint {
        AccessPoint {
            path: path.into(),
            ssid: ssid.into(),
            strength,
            mode: WirelessMode::Infrastructure,
            flags: ApFlags::empty(),
            wpa_flags: ApSecurityFlags::empty(),
            rsn_flags: ApSecurityFlags::empty(),
        }
    }

    #[test]
    fn connection_type_round_trips_setting_strings() {
        for ty in [
            ConnectionType::Wired,
            ConnectionType::Wireless,
            ConnectionType::Vpn,
            ConnectionType::WireGuard,
            ConnectionType::OLPCMesh,
            ConnectionType::Tun,
        ] {
            assert_eq!(ConnectionType::from_setting_type(ty.setting_type()), ty);
        }
        assert_eq!(
            ConnectionType::from_setting_type("something-new"),
            ConnectionType::Unknown
        );
    }

    #[test]
    fn connection_type_order_follows_network_manager() {
        assert!(ConnectionType::Unknown < ConnectionType::Adsl);
        assert!(ConnectionType::Bluetooth < ConnectionType::Cdma);
        assert!(ConnectionType::Cdma < ConnectionType::Gsm);
        assert!(ConnectionType::Vpn < ConnectionType::Wired);
        assert!(ConnectionType::Wireless < ConnectionType::WireGuard);
    }

    #[test]
    fn kind_maps_unlisted_types_to_other() {
        assert_eq!(ConnectionType::Wired.kind(), ConnectionKind::Wired);
        assert_eq!(ConnectionType::Vpn.kind(), ConnectionKind::Vpn);
        assert_eq!(ConnectionType::WireGuard.kind(), ConnectionKind::Other);
        assert_eq!(ConnectionType::Bridge.kind(), ConnectionKind::Other);
    }

    #[test]
    fn supported_types_respect_virtual_setting() {
        assert!(!ConnectionType::Generic.is_supported(true));
        assert!(!ConnectionType::Tun.is_supported(true));
        assert!(!ConnectionType::Bridge.is_supported(false));
        assert!(ConnectionType::Bridge.is_supported(true));
        assert!(ConnectionType::Wired.is_supported(false));
    }

    #[test]
    fn nm_state_connected_variants() {
        assert!(NmState::from(50).is_connected());
        assert!(NmState::from(60).is_connected());
        assert!(NmState::from(70).is_connected());
        assert!(!NmState::from(40).is_connected());
        assert_eq!(NmState::from(999), NmState::Unknown);
    }

    #[test]
    fn device_type_codes() {
        assert_eq!(DeviceType::from(2), DeviceType::Wifi);
        assert_eq!(DeviceType::from(14), DeviceType::Generic);
        assert_eq!(DeviceType::Team.to_code(), 15);
        assert_eq!(DeviceType::from(77), DeviceType::Other(77));
        assert_eq!(format!("{}", DeviceType::Other(77)), "Other(77)");
        assert_eq!(format!("{}", DeviceType::Ethernet), "Wired Ethernet");
    }

    #[test]
    fn vpn_state_connecting_range() {
        assert!(VpnConnectionState::from(1).is_connecting());
        assert!(VpnConnectionState::from(4).is_connecting());
        assert!(!VpnConnectionState::from(5).is_connecting());
        assert!(!VpnConnectionState::from(0).is_connecting());
    }

    #[test]
    fn wireless_sample_uses_strongest_ap_of_network() {
        let details = WirelessDetails {
            mode: WirelessMode::Infrastructure,
            active_access_point: Some("/ap/1".into()),
            access_points: vec![ap("/ap/1", "home", 30), ap("/ap/2", "home", 70), ap("/ap/3", "cafe", 90)],
        };

        let sample = details.sample().unwrap();
        assert_eq!(sample.ssid, "home");
        assert_eq!(sample.strength, 70);
    }

    #[test]
    fn network_access_points_share_the_active_ssid() {
        let details = WirelessDetails {
            mode: WirelessMode::Infrastructure,
            active_access_point: Some("/ap/2".into()),
            access_points: vec![ap("/ap/1", "home", 30), ap("/ap/2", "home", 70), ap("/ap/3", "cafe", 90)],
        };
        assert_eq!(details.network_access_points(), vec!["/ap/1", "/ap/2"]);

        let unassociated = WirelessDetails {
            active_access_point: None,
            ..details
        };
        assert!(unassociated.network_access_points().is_empty());
    }

    #[test]
    fn wireless_sample_missing_when_not_associated() {
        let details = WirelessDetails {
            mode: WirelessMode::Infrastructure,
            active_access_point: None,
            access_points: vec![ap("/ap/1", "home", 30)],
        };
        assert!(details.sample().is_none());

        let stale = WirelessDetails {
            active_access_point: Some("/ap/9".into()),
            ..details
        };
        assert!(stale.sample().is_none());
    }
}
