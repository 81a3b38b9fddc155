//! Reads a `NetworkSnapshot` from NetworkManager.
//!
//! Objects can disappear between listing and reading them. Per-object read
//! failures are logged and the object is skipped; only failures on the main
//! NetworkManager object fail the snapshot.

use log::debug;
use zbus::Connection;
use zbus::fdo::DBusProxy;
use zbus::names::BusName;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::models::{
    AccessPoint, ActiveConnection, ApFlags, ApSecurityFlags, ConnectionType, Device, DeviceType,
    Error, NetworkSnapshot, NmState, VpnConnectionState, WirelessDetails, WirelessMode,
};
use crate::dbus::{
    NMAccessPointProxy, NMActiveConnectionProxy, NMDeviceProxy, NMProxy, NMVpnConnectionProxy,
    NMWirelessProxy,
};
use crate::try_log;
use crate::types::constants::bus;
use crate::util::utils::{decode_ssid_or_empty, path_or_none};

/// Whether `name` currently has an owner on the bus.
pub(crate) async fn service_running(conn: &Connection, name: &str) -> Result<bool> {
    let name = BusName::try_from(name).map_err(zbus::Error::from)?;
    let dbus = DBusProxy::new(conn).await?;
    Ok(dbus.name_has_owner(name).await?)
}

/// Reads everything the display derivations need.
///
/// When NetworkManager is not on the bus the snapshot is the default one
/// with `service_running` false.
pub(crate) async fn fetch_snapshot(conn: &Connection) -> Result<NetworkSnapshot> {
    if !service_running(conn, bus::NM_SERVICE).await? {
        debug!("NetworkManager is not running");
        return Ok(NetworkSnapshot::default());
    }

    let nm = NMProxy::new(conn).await?;

    let state = nm.state().await.map_err(|e| Error::DbusOperation {
        context: "failed to read NetworkManager state".to_string(),
        source: e,
    })?;

    let mut active_connections = Vec::new();
    for path in nm.active_connections().await? {
        if let Some(active) = read_active_connection(conn, path).await {
            active_connections.push(active);
        }
    }

    let mut devices = Vec::new();
    for path in nm.get_devices().await? {
        if let Some(device) = read_device(conn, path).await {
            devices.push(device);
        }
    }

    let activating = nm
        .activating_connection()
        .await
        .ok()
        .as_ref()
        .and_then(path_or_none);

    Ok(NetworkSnapshot {
        service_running: true,
        version: nm.version().await.ok(),
        state: NmState::from(state),
        networking_enabled: nm.networking_enabled().await?,
        wireless_enabled: nm.wireless_enabled().await?,
        wireless_hardware_enabled: nm.wireless_hardware_enabled().await?,
        wwan_enabled: nm.wwan_enabled().await?,
        wwan_hardware_enabled: nm.wwan_hardware_enabled().await?,
        active_connections,
        activating,
        devices,
    })
}

pub(crate) async fn read_active_connection(
    conn: &Connection,
    path: OwnedObjectPath,
) -> Option<ActiveConnection> {
    let builder = try_log!(
        NMActiveConnectionProxy::builder(conn).path(path.clone()),
        "Failed to create active connection proxy builder"
    );
    let ac = try_log!(
        builder.build().await,
        "Failed to build active connection proxy"
    );

    let id = try_log!(ac.id().await, "Failed to get connection id");
    let raw_type = try_log!(ac.connection_type().await, "Failed to get connection type");
    let state = try_log!(ac.state().await, "Failed to get active connection state");
    let devices = try_log!(ac.devices().await, "Failed to get connection devices");
    let vpn = ac.vpn().await.unwrap_or(false);

    let vpn_state = if vpn {
        read_vpn_state(conn, &path).await
    } else {
        None
    };

    Some(ActiveConnection {
        path: path.to_string(),
        id,
        uuid: ac.uuid().await.unwrap_or_default(),
        connection: ac
            .connection()
            .await
            .map(|p| p.to_string())
            .unwrap_or_default(),
        connection_type: ConnectionType::from_setting_type(&raw_type),
        state: state.into(),
        devices: devices.iter().map(|d| d.to_string()).collect(),
        is_default: ac.is_default().await.unwrap_or(false)
            || ac.is_default6().await.unwrap_or(false),
        vpn,
        vpn_state,
        master: ac.master().await.ok().as_ref().and_then(path_or_none),
    })
}

async fn read_vpn_state(conn: &Connection, path: &OwnedObjectPath) -> Option<VpnConnectionState> {
    let builder = try_log!(
        NMVpnConnectionProxy::builder(conn).path(path.clone()),
        "Failed to create VPN connection proxy builder"
    );
    let vpn = try_log!(builder.build().await, "Failed to build VPN connection proxy");
    let state = try_log!(vpn.vpn_state().await, "Failed to get VPN state");
    Some(state.into())
}

pub(crate) async fn read_device(conn: &Connection, path: OwnedObjectPath) -> Option<Device> {
    let builder = try_log!(
        NMDeviceProxy::builder(conn).path(path.clone()),
        "Failed to create device proxy builder"
    );
    let dev = try_log!(builder.build().await, "Failed to build device proxy");

    let interface = try_log!(dev.interface().await, "Failed to get interface name");
    let device_type = DeviceType::from(try_log!(
        dev.device_type().await,
        "Failed to get device type"
    ));
    let state = try_log!(dev.state().await, "Failed to get device state");

    let wireless = if device_type == DeviceType::Wifi {
        read_wireless(conn, &path).await
    } else {
        None
    };

    Some(Device {
        path: path.to_string(),
        interface,
        device_type,
        state: state.into(),
        wireless,
    })
}

async fn read_wireless(conn: &Connection, path: &OwnedObjectPath) -> Option<WirelessDetails> {
    let builder = try_log!(
        NMWirelessProxy::builder(conn).path(path.clone()),
        "Failed to create wireless proxy builder"
    );
    let wifi = try_log!(builder.build().await, "Failed to build wireless proxy");

    let mode = try_log!(wifi.mode().await, "Failed to get wireless mode");
    let active_access_point = wifi
        .active_access_point()
        .await
        .ok()
        .as_ref()
        .and_then(path_or_none);

    let mut access_points = Vec::new();
    for ap_path in try_log!(wifi.access_points().await, "Failed to get access points") {
        if let Some(ap) = read_access_point(conn, ap_path).await {
            access_points.push(ap);
        }
    }

    Some(WirelessDetails {
        mode: WirelessMode::from(mode),
        active_access_point,
        access_points,
    })
}

async fn read_access_point(conn: &Connection, path: OwnedObjectPath) -> Option<AccessPoint> {
    let builder = try_log!(
        NMAccessPointProxy::builder(conn).path(path.clone()),
        "Failed to create access point proxy builder"
    );
    let ap = try_log!(builder.build().await, "Failed to build access point proxy");

    let ssid = try_log!(ap.ssid().await, "Failed to get SSID bytes");

    Some(AccessPoint {
        path: path.to_string(),
        ssid: decode_ssid_or_empty(&ssid).into_owned(),
        strength: try_log!(ap.strength().await, "Failed to get signal strength"),
        mode: WirelessMode::from(ap.mode().await.unwrap_or(0)),
        flags: ApFlags::from_bits_truncate(ap.flags().await.unwrap_or(0)),
        wpa_flags: ApSecurityFlags::from_bits_truncate(ap.wpa_flags().await.unwrap_or(0)),
        rsn_flags: ApSecurityFlags::from_bits_truncate(ap.rsn_flags().await.unwrap_or(0)),
    })
}
