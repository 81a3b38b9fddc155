//! Entries of the connection picker and its filter.
//!
//! Active connections are listed first, followed by the visible access
//! points. Access points of a network that is already listed are kept but
//! marked as duplicates so the filter can drop them.

use std::collections::HashSet;

use crate::api::models::{
    ActiveConnectionState, ConnectionType, NetworkItem, NetworkItemKind, NetworkSnapshot,
};

/// Builds the network list from a snapshot.
pub fn network_items(snapshot: &NetworkSnapshot) -> Vec<NetworkItem> {
    let mut items: Vec<NetworkItem> = snapshot
        .active_connections
        .iter()
        .map(|c| NetworkItem {
            path: c.path.clone(),
            name: c.id.clone(),
            connection_type: c.connection_type,
            kind: NetworkItemKind::AvailableConnection,
            state: c.state,
            device: c.first_device().map(str::to_string),
            strength: 0,
            slave: c.master.is_some(),
            duplicate: false,
        })
        .collect();

    for device in &snapshot.devices {
        let Some(wireless) = device.wireless.as_ref() else {
            continue;
        };

        // The associated network is represented by its active connection
        let mut seen: HashSet<&str> = wireless
            .sample()
            .filter(|_| {
                snapshot
                    .active_connections
                    .iter()
                    .any(|c| c.first_device() == Some(device.path.as_str()))
            })
            .and_then(|sample| {
                wireless
                    .access_points
                    .iter()
                    .find(|ap| ap.ssid == sample.ssid)
                    .map(|ap| ap.ssid.as_str())
            })
            .into_iter()
            .collect();

        let mut access_points: Vec<_> = wireless
            .access_points
            .iter()
            .filter(|ap| !ap.ssid.is_empty())
            .collect();
        access_points.sort_by(|a, b| b.strength.cmp(&a.strength));

        for ap in access_points {
            items.push(NetworkItem {
                path: ap.path.clone(),
                name: ap.ssid.clone(),
                connection_type: ConnectionType::Wireless,
                kind: NetworkItemKind::AvailableAccessPoint,
                state: ActiveConnectionState::Deactivated,
                device: Some(device.path.clone()),
                strength: ap.strength,
                slave: false,
                duplicate: !seen.insert(ap.ssid.as_str()),
            });
        }
    }

    items
}

/// Keeps the entries the picker shows.
///
/// - slaves and duplicates are dropped
/// - `connection_type`, when set, must match exactly
/// - only available connections and access points are kept
/// - deactivated entries need `show_inactive`
/// - a non-empty `pattern` must occur in the name, ignoring case
pub fn filter_networks<'a>(
    items: &'a [NetworkItem],
    connection_type: Option<ConnectionType>,
    show_inactive: bool,
    pattern: &str,
) -> Vec<&'a NetworkItem> {
    let pattern = pattern.to_lowercase();

    items
        .iter()
        .filter(|item| !item.slave && !item.duplicate)
        .filter(|item| connection_type.is_none_or(|ty| item.connection_type == ty))
        .filter(|item| {
            matches!(
                item.kind,
                NetworkItemKind::AvailableConnection | NetworkItemKind::AvailableAccessPoint
            )
        })
        .filter(|item| show_inactive || item.state != ActiveConnectionState::Deactivated)
        .filter(|item| pattern.is_empty() || item.name.to_lowercase().contains(&pattern))
        .collect()
}
