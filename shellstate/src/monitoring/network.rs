//! Real-time network monitoring using D-Bus signals.
//!
//! Subscribes to property changes on NetworkManager, on each active
//! connection and on each wireless device and the access points of its
//! network, plus settings updates for the profiles in use. Every signal
//! becomes a `NetworkEvent`; the callback receives it together with a snapshot read
//! right after it arrived.
//!
//! When the set of watched objects changes the subscriptions are rebuilt.
//! Nothing NetworkManager does ends the monitor; a missing service is
//! logged and waited for.

use futures::stream::{self, Stream, StreamExt};
use log::{debug, warn};
use std::collections::HashMap;
use std::pin::Pin;
use tokio::sync::watch;
use zbus::Connection;
use zbus::fdo::{DBusProxy, PropertiesProxy};
use zvariant::{OwnedObjectPath, Value};

use crate::Result;
use crate::api::models::{Error, NetworkEvent, NetworkSnapshot};
use crate::core::snapshot::fetch_snapshot;
use crate::dbus::{NMProxy, NMSettingsConnectionProxy, NMWirelessProxy};
use crate::types::constants::bus;

type EventStream = Pin<Box<dyn Stream<Item = NetworkEvent>>>;

const NM_INTERFACE: &str = "org.freedesktop.NetworkManager";
const ACTIVE_INTERFACE: &str = "org.freedesktop.NetworkManager.Connection.Active";
const WIRELESS_INTERFACE: &str = "org.freedesktop.NetworkManager.Device.Wireless";
const ACCESS_POINT_INTERFACE: &str = "org.freedesktop.NetworkManager.AccessPoint";

/// Translates one `PropertiesChanged` signal into events.
pub(crate) fn property_events(
    path: &str,
    interface: &str,
    changed: &HashMap<&str, Value<'_>>,
) -> Vec<NetworkEvent> {
    let mut events = Vec::new();

    for (name, value) in changed {
        let event = match (interface, *name) {
            (NM_INTERFACE, "NetworkingEnabled") => NetworkEvent::NetworkingEnabledChanged,
            (NM_INTERFACE, "WirelessEnabled") => NetworkEvent::WirelessEnabledChanged,
            (NM_INTERFACE, "WirelessHardwareEnabled") => {
                NetworkEvent::WirelessHardwareEnabledChanged
            }
            (NM_INTERFACE, "WwanEnabled") => NetworkEvent::WwanEnabledChanged,
            (NM_INTERFACE, "WwanHardwareEnabled") => NetworkEvent::WwanHardwareEnabledChanged,
            (NM_INTERFACE, "State") => NetworkEvent::StatusChanged,
            (NM_INTERFACE, "ActiveConnections") => NetworkEvent::ActiveConnectionsChanged,
            (NM_INTERFACE, "ActivatingConnection") => NetworkEvent::ActivatingConnectionChanged,
            (NM_INTERFACE, "PrimaryConnection") => NetworkEvent::PrimaryConnectionChanged,
            (ACTIVE_INTERFACE, "Default" | "Default6") => NetworkEvent::PrimaryConnectionChanged,
            (ACTIVE_INTERFACE, "State") => {
                NetworkEvent::ActiveConnectionStateChanged(path.to_string())
            }
            (WIRELESS_INTERFACE, "ActiveAccessPoint") => {
                NetworkEvent::ActiveAccessPointChanged(path.to_string())
            }
            (ACCESS_POINT_INTERFACE, "Strength") => match value {
                Value::U8(strength) => NetworkEvent::SignalStrengthChanged {
                    access_point: path.to_string(),
                    strength: *strength,
                },
                _ => continue,
            },
            _ => continue,
        };

        if !events.contains(&event) {
            events.push(event);
        }
    }

    events
}

async fn properties_stream(conn: &Connection, path: &str) -> Result<EventStream> {
    let proxy = PropertiesProxy::builder(conn)
        .destination(bus::NM_SERVICE)?
        .path(OwnedObjectPath::try_from(path)?)?
        .build()
        .await?;
    let path = path.to_string();

    let signals = proxy.receive_properties_changed().await?;
    Ok(Box::pin(signals.flat_map(move |signal| {
        let events = match signal.args() {
            Ok(args) => property_events(
                &path,
                args.interface_name().as_str(),
                args.changed_properties(),
            ),
            Err(e) => {
                warn!("Malformed PropertiesChanged signal on {path}: {e}");
                Vec::new()
            }
        };
        stream::iter(events)
    })))
}

/// NetworkManager taking or releasing its bus name.
async fn service_owner_changes(conn: &Connection) -> Result<EventStream> {
    let dbus = DBusProxy::new(conn).await?;
    let changes = dbus.receive_name_owner_changed().await?;
    Ok(Box::pin(changes.filter_map(|signal| async move {
        let args = signal.args().ok()?;
        (args.name().as_str() == bus::NM_SERVICE).then_some(NetworkEvent::ServiceOwnerChanged)
    })))
}

async fn manager_streams(conn: &Connection) -> Result<Vec<EventStream>> {
    let nm = NMProxy::new(conn).await?;
    let streams: Vec<EventStream> = vec![
        properties_stream(conn, bus::NM_PATH).await?,
        Box::pin(nm.receive_device_added().await?.map(|_| NetworkEvent::DevicesChanged)),
        Box::pin(nm.receive_device_removed().await?.map(|_| NetworkEvent::DevicesChanged)),
    ];
    Ok(streams)
}

async fn wireless_streams(conn: &Connection, path: &str) -> Result<Vec<EventStream>> {
    let wifi = NMWirelessProxy::builder(conn)
        .path(OwnedObjectPath::try_from(path)?)?
        .build()
        .await?;
    let appeared = wifi.receive_access_point_added().await?.map(|signal| {
        let ap = signal
            .args()
            .map(|args| args.path().to_string())
            .unwrap_or_default();
        NetworkEvent::WirelessNetworkAppeared(ap)
    });
    let streams: Vec<EventStream> = vec![properties_stream(conn, path).await?, Box::pin(appeared)];
    Ok(streams)
}

async fn settings_updates(conn: &Connection, settings_path: &str) -> Result<EventStream> {
    let settings = NMSettingsConnectionProxy::builder(conn)
        .path(OwnedObjectPath::try_from(settings_path)?)?
        .build()
        .await?;
    let updates = settings.receive_updated().await?;

    let settings_path = settings_path.to_string();
    Ok(Box::pin(updates.map(move |_| {
        NetworkEvent::ConnectionUpdated(settings_path.clone())
    })))
}

fn keep_or_skip(streams: &mut Vec<EventStream>, watched: Result<Vec<EventStream>>, what: &str) {
    match watched {
        Ok(s) => streams.extend(s),
        Err(e) => warn!("Failed to watch {what}: {e}"),
    }
}

/// Builds one stream per object the snapshot depends on.
///
/// Objects that vanish while subscribing are skipped.
async fn subscribe(conn: &Connection, snapshot: &NetworkSnapshot) -> Vec<EventStream> {
    let mut streams = Vec::new();
    if !snapshot.service_running {
        return streams;
    }

    keep_or_skip(&mut streams, manager_streams(conn).await, "NetworkManager");

    for active in &snapshot.active_connections {
        let watched = properties_stream(conn, &active.path).await.map(|s| vec![s]);
        keep_or_skip(&mut streams, watched, &active.path);

        if !active.connection.is_empty() && active.connection != bus::NO_OBJECT {
            let updates = settings_updates(conn, &active.connection).await.map(|s| vec![s]);
            keep_or_skip(&mut streams, updates, &active.connection);
        }
    }

    for device in snapshot.devices.iter().filter(|d| d.wireless.is_some()) {
        keep_or_skip(&mut streams, wireless_streams(conn, &device.path).await, &device.path);
        debug!("Subscribed to wireless signals on device: {}", device.path);
    }

    for ap in snapshot.watched_access_points() {
        let watched = properties_stream(conn, &ap).await.map(|s| vec![s]);
        keep_or_skip(&mut streams, watched, &ap);
    }

    streams
}

/// Whether subscriptions built while watching `watched` access points are
/// out of date after `event`.
///
/// Besides events that change the watched objects, a new access point
/// joining the associated network counts, since its strength feeds the icon.
fn subscriptions_stale(
    event: &NetworkEvent,
    watched: &[String],
    snapshot: Option<&NetworkSnapshot>,
) -> bool {
    event.changes_watched_objects()
        || snapshot.is_some_and(|s| s.watched_access_points() != watched)
}

/// Reads a snapshot, logging a failed read.
async fn read_snapshot(conn: &Connection) -> Option<NetworkSnapshot> {
    match fetch_snapshot(conn).await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!("Failed to read NetworkManager state: {e}");
            None
        }
    }
}

/// Delivers events with fresh snapshots until `shutdown` fires.
///
/// Each event is fully handled before the next one is read. While
/// NetworkManager is absent only its bus name is watched; subscriptions
/// are rebuilt once it shows up again.
pub(crate) async fn monitor_network<F>(
    conn: &Connection,
    mut shutdown: watch::Receiver<()>,
    mut callback: F,
) -> Result<()>
where
    F: FnMut(NetworkEvent, &NetworkSnapshot),
{
    loop {
        let snapshot = read_snapshot(conn).await.unwrap_or_default();
        if !snapshot.service_running {
            warn!("NetworkManager is not running, waiting for it to appear");
        }
        let watched = snapshot.watched_access_points();

        let mut streams = vec![service_owner_changes(conn).await?];
        streams.extend(subscribe(conn, &snapshot).await);
        debug!("Monitoring {} signal streams for network changes", streams.len());
        let mut merged = stream::select_all(streams);

        loop {
            let event = tokio::select! {
                _ = shutdown.changed() => {
                    debug!("Network monitoring stopped");
                    return Ok(());
                }
                event = merged.next() => event,
            };

            let Some(event) = event else {
                warn!("Network monitoring stream ended unexpectedly");
                return Err(Error::MonitorEnded("network signal streams ended".into()));
            };

            let snapshot = read_snapshot(conn).await;
            let resubscribe = subscriptions_stale(&event, &watched, snapshot.as_ref());
            if let Some(snapshot) = &snapshot {
                callback(event, snapshot);
            }

            if resubscribe {
                debug!("Watched objects changed, resubscribing");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{
        AccessPoint, ApFlags, ApSecurityFlags, Device, DeviceState, DeviceType, WirelessDetails,
        WirelessMode,
    };

    #[test]
    fn manager_properties_map_to_events() {
        let changed = HashMap::from([
            ("WirelessEnabled", Value::from(false)),
            ("State", Value::from(20u32)),
            ("Version", Value::from("1.46.0")),
        ]);
        let mut events = property_events(bus::NM_PATH, NM_INTERFACE, &changed);
        events.sort_by_key(|e| format!("{e:?}"));

        assert_eq!(
            events,
            vec![
                NetworkEvent::StatusChanged,
                NetworkEvent::WirelessEnabledChanged
            ]
        );
    }

    #[test]
    fn default_route_flags_collapse_to_one_event() {
        let changed = HashMap::from([
            ("Default", Value::from(true)),
            ("Default6", Value::from(true)),
        ]);
        let events = property_events("/ac/1", ACTIVE_INTERFACE, &changed);
        assert_eq!(events, vec![NetworkEvent::PrimaryConnectionChanged]);
    }

    #[test]
    fn access_point_strength_carries_value() {
        let changed = HashMap::from([("Strength", Value::from(42u8))]);
        let events = property_events("/ap/7", ACCESS_POINT_INTERFACE, &changed);
        assert_eq!(
            events,
            vec![NetworkEvent::SignalStrengthChanged {
                access_point: "/ap/7".into(),
                strength: 42
            }]
        );
    }

    #[test]
    fn unrelated_interfaces_are_ignored() {
        let changed = HashMap::from([("State", Value::from(100u32))]);
        let events = property_events("/dev/1", "org.freedesktop.NetworkManager.Device", &changed);
        assert!(events.is_empty());
    }

    fn associated(ssid_paths: &[(&str, &str)], active: &str) -> NetworkSnapshot {
        let access_points = ssid_paths
            .iter()
            .map(|(path, ssid)| AccessPoint {
                path: path.to_string(),
                ssid: ssid.to_string(),
                strength: 40,
                mode: WirelessMode::Infrastructure,
                flags: ApFlags::empty(),
                wpa_flags: ApSecurityFlags::empty(),
                rsn_flags: ApSecurityFlags::empty(),
            })
            .collect();
        NetworkSnapshot {
            service_running: true,
            devices: vec![Device {
                path: "/dev/wlan0".into(),
                interface: "wlan0".into(),
                device_type: DeviceType::Wifi,
                state: DeviceState::Activated,
                wireless: Some(WirelessDetails {
                    mode: WirelessMode::Infrastructure,
                    active_access_point: Some(active.into()),
                    access_points,
                }),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn same_network_access_point_appearing_resubscribes() {
        let before = associated(&[("/ap/1", "home"), ("/ap/3", "cafe")], "/ap/1");
        let watched = before.watched_access_points();
        assert_eq!(watched, vec!["/ap/1".to_string()]);

        let appeared = NetworkEvent::WirelessNetworkAppeared("/ap/2".into());
        let after = associated(&[("/ap/1", "home"), ("/ap/2", "home"), ("/ap/3", "cafe")], "/ap/1");
        assert!(subscriptions_stale(&appeared, &watched, Some(&after)));

        let other = NetworkEvent::WirelessNetworkAppeared("/ap/4".into());
        let after = associated(&[("/ap/1", "home"), ("/ap/3", "cafe"), ("/ap/4", "cafe")], "/ap/1");
        assert!(!subscriptions_stale(&other, &watched, Some(&after)));
    }

    #[test]
    fn service_loss_resubscribes_even_without_snapshot() {
        let watched = vec!["/ap/1".to_string()];
        assert!(subscriptions_stale(&NetworkEvent::ServiceOwnerChanged, &watched, None));
        assert!(subscriptions_stale(
            &NetworkEvent::ServiceOwnerChanged,
            &watched,
            Some(&NetworkSnapshot::default())
        ));
        assert!(!subscriptions_stale(&NetworkEvent::StatusChanged, &watched, None));
    }

    #[test]
    fn resubscribe_events() {
        assert!(NetworkEvent::ActiveConnectionsChanged.changes_watched_objects());
        assert!(NetworkEvent::DevicesChanged.changes_watched_objects());
        assert!(NetworkEvent::ActiveAccessPointChanged("/d".into()).changes_watched_objects());
        assert!(NetworkEvent::ServiceOwnerChanged.changes_watched_objects());
        assert!(!NetworkEvent::StatusChanged.changes_watched_objects());
        assert!(
            !NetworkEvent::ActiveConnectionStateChanged("/a".into()).changes_watched_objects()
        );
    }
}
