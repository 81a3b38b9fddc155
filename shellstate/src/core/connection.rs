//! Commands forwarded to NetworkManager.

use log::{debug, info, warn};
use std::collections::HashMap;
use zbus::Connection;
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::Result;
use crate::api::models::{ConnectionType, Error};
use crate::core::snapshot::{read_active_connection, read_device};
use crate::core::wifi_settings::WirelessConnectionBuilder;
use crate::dbus::{NMDeviceProxy, NMProxy, NMSettingsConnectionProxy, NMSettingsProxy};
use crate::types::constants::bus;
use crate::util::utils::current_user;

type SettingsMap = HashMap<String, HashMap<String, OwnedValue>>;

fn object_path(path: &str) -> Result<OwnedObjectPath> {
    Ok(OwnedObjectPath::try_from(path)?)
}

fn optional_path(path: Option<&str>) -> Result<OwnedObjectPath> {
    object_path(path.unwrap_or(bus::NO_OBJECT))
}

fn connection_field(settings: &SettingsMap, key: &str) -> Option<String> {
    match &**settings.get("connection")?.get(key)? {
        Value::Str(s) => Some(s.to_string()),
        _ => None,
    }
}

pub(crate) async fn set_networking_enabled(conn: &Connection, enabled: bool) -> Result<()> {
    let nm = NMProxy::new(conn).await?;
    nm.enable(enabled).await.map_err(|e| Error::DbusOperation {
        context: format!("failed to set networking enabled to {enabled}"),
        source: e,
    })?;
    info!("Networking enabled set to {enabled}");
    Ok(())
}

pub(crate) async fn set_wireless_enabled(conn: &Connection, enabled: bool) -> Result<()> {
    let nm = NMProxy::new(conn).await?;
    nm.set_wireless_enabled(enabled)
        .await
        .map_err(|e| Error::DbusOperation {
            context: format!("failed to set wireless enabled to {enabled}"),
            source: e,
        })?;
    info!("Wireless enabled set to {enabled}");
    Ok(())
}

pub(crate) async fn set_wwan_enabled(conn: &Connection, enabled: bool) -> Result<()> {
    let nm = NMProxy::new(conn).await?;
    nm.set_wwan_enabled(enabled)
        .await
        .map_err(|e| Error::DbusOperation {
            context: format!("failed to set mobile broadband enabled to {enabled}"),
            source: e,
        })?;
    info!("Mobile broadband enabled set to {enabled}");
    Ok(())
}

async fn saved_settings(conn: &Connection, path: &str) -> Result<SettingsMap> {
    let proxy = NMSettingsConnectionProxy::builder(conn)
        .path(object_path(path)?)?
        .build()
        .await?;
    proxy
        .get_settings()
        .await
        .map_err(|_| Error::ConnectionNotFound(path.to_string()))
}

/// Activates a saved profile.
///
/// `device` and `specific_object` may be omitted to let NetworkManager pick.
pub(crate) async fn activate_connection(
    conn: &Connection,
    connection: &str,
    device: Option<&str>,
    specific_object: Option<&str>,
) -> Result<String> {
    let settings = saved_settings(conn, connection).await?;
    let id = connection_field(&settings, "id").unwrap_or_default();
    let kind = connection_field(&settings, "type")
        .map(|t| ConnectionType::from_setting_type(&t))
        .unwrap_or(ConnectionType::Unknown);

    if kind == ConnectionType::Vpn {
        debug!("Activating VPN connection {id}");
    }

    let nm = NMProxy::new(conn).await?;
    let active = nm
        .activate_connection(
            object_path(connection)?,
            optional_path(device)?,
            optional_path(specific_object)?,
        )
        .await
        .map_err(|e| Error::DbusOperation {
            context: format!("failed to activate connection {id}"),
            source: e,
        })?;

    info!("Activated connection {id}");
    Ok(active.to_string())
}

/// Creates a profile for a visible access point and activates it.
pub(crate) async fn add_and_activate_connection(
    conn: &Connection,
    device: &str,
    access_point: &str,
    password: &str,
) -> Result<String> {
    let wifi_device = read_device(conn, object_path(device)?)
        .await
        .ok_or_else(|| Error::DeviceNotFound(device.to_string()))?;

    let ap = wifi_device
        .wireless
        .as_ref()
        .and_then(|w| w.find_access_point(access_point))
        .ok_or_else(|| Error::AccessPointNotFound(access_point.to_string()))?;

    let settings = WirelessConnectionBuilder::for_access_point(ap)
        .password(password)
        .user(current_user())
        .build()?;

    let nm = NMProxy::new(conn).await?;
    let (_, active) = nm
        .add_and_activate_connection(settings, object_path(device)?, object_path(access_point)?)
        .await
        .map_err(|e| Error::DbusOperation {
            context: format!("failed to add connection for {}", ap.ssid),
            source: e,
        })?;

    info!("Added and activated connection for {}", ap.ssid);
    Ok(active.to_string())
}

/// Deactivates every active instance of a saved profile on `device`.
///
/// VPN instances are deactivated directly; others disconnect their device.
pub(crate) async fn deactivate_connection(
    conn: &Connection,
    connection: &str,
    device: &str,
) -> Result<()> {
    let settings = saved_settings(conn, connection).await?;
    let uuid = connection_field(&settings, "uuid")
        .ok_or_else(|| Error::ConnectionNotFound(connection.to_string()))?;

    let nm = NMProxy::new(conn).await?;
    for path in nm.active_connections().await? {
        let Some(active) = read_active_connection(conn, path).await else {
            continue;
        };

        if active.uuid != uuid || !(active.vpn || active.first_device() == Some(device)) {
            continue;
        }

        if active.vpn {
            nm.deactivate_connection(object_path(&active.path)?)
                .await
                .map_err(|e| Error::DbusOperation {
                    context: format!("failed to deactivate {}", active.id),
                    source: e,
                })?;
        } else if let Some(dev_path) = active.first_device() {
            let dev = NMDeviceProxy::builder(conn)
                .path(object_path(dev_path)?)?
                .build()
                .await?;
            dev.disconnect().await.map_err(|e| Error::DbusOperation {
                context: format!("failed to disconnect {dev_path}"),
                source: e,
            })?;
        }
        info!("Deactivated connection {}", active.id);
    }

    Ok(())
}

/// Deletes a saved profile together with the profiles enslaved to it.
pub(crate) async fn remove_connection(conn: &Connection, connection: &str) -> Result<()> {
    let settings = saved_settings(conn, connection).await?;
    let uuid = connection_field(&settings, "uuid")
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::ConnectionNotFound(connection.to_string()))?;

    let all = NMSettingsProxy::new(conn).await?;
    for path in all.list_connections().await? {
        if path.as_str() == connection {
            continue;
        }

        let proxy = NMSettingsConnectionProxy::builder(conn)
            .path(path.clone())?
            .build()
            .await?;
        let Ok(slave) = proxy.get_settings().await else {
            continue;
        };

        if connection_field(&slave, "master").as_deref() == Some(uuid.as_str()) {
            match proxy.delete().await {
                Ok(()) => debug!("Deleted slave connection {}", path.as_str()),
                Err(e) => warn!("Failed to delete slave connection {}: {e}", path.as_str()),
            }
        }
    }

    let proxy = NMSettingsConnectionProxy::builder(conn)
        .path(object_path(connection)?)?
        .build()
        .await?;
    proxy.delete().await.map_err(|e| Error::DbusOperation {
        context: format!("failed to delete connection {connection}"),
        source: e,
    })?;

    info!("Removed connection {connection}");
    Ok(())
}
