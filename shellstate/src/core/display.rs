//! Derivation of the indicator's `DisplayState`.

use crate::api::models::{ActiveConnection, DeviceType, DisplayState, NetworkSnapshot, NmState};
use crate::core::selection::{icon_for_selection, select_primary};

impl DisplayState {
    /// Computes the indicator state for one snapshot.
    ///
    /// With wireless off or NetworkManager disconnected both fields are
    /// empty. The connection name is taken from the last wireless
    /// connection in kind order, and only while connected.
    pub fn derive(snapshot: &NetworkSnapshot) -> Self {
        if !snapshot.wireless_enabled || snapshot.state == NmState::Disconnected {
            return Self::default();
        }

        let connection_name = if snapshot.state.is_connected() {
            wireless_connection_name(snapshot).unwrap_or_default()
        } else {
            String::new()
        };

        let primary = select_primary(
            &snapshot.active_connections,
            snapshot.activating.as_deref(),
        );
        let icon_name = icon_for_selection(primary, snapshot).icon_name();

        Self {
            connection_name,
            icon_name,
        }
    }
}

fn wireless_connection_name(snapshot: &NetworkSnapshot) -> Option<String> {
    let mut active: Vec<&ActiveConnection> = snapshot.active_connections.iter().collect();
    active.sort_by_key(|c| c.kind());

    active
        .into_iter()
        .filter(|c| {
            c.first_device()
                .and_then(|path| snapshot.find_device(path))
                .is_some_and(|d| d.device_type == DeviceType::Wifi)
        })
        .next_back()
        .map(|c| c.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{
        AccessPoint, ActiveConnectionState, ApFlags, ApSecurityFlags, ConnectionType, Device,
        DeviceState, WirelessDetails, WirelessMode,
    };

    fn snapshot(strength: u8) -> NetworkSnapshot {
        NetworkSnapshot {
            service_running: true,
            state: NmState::Connected,
            networking_enabled: true,
            wireless_enabled: true,
            wireless_hardware_enabled: true,
            active_connections: vec![ActiveConnection {
                path: "/active/1".into(),
                id: "home".into(),
                uuid: "u1".into(),
                connection: "/settings/1".into(),
                connection_type: ConnectionType::Wireless,
                state: ActiveConnectionState::Activated,
                devices: vec!["/dev/wlan0".into()],
                is_default: true,
                vpn: false,
                vpn_state: None,
                master: None,
            }],
            devices: vec![Device {
                path: "/dev/wlan0".into(),
                interface: "wlan0".into(),
                device_type: DeviceType::Wifi,
                state: DeviceState::Activated,
                wireless: Some(WirelessDetails {
                    mode: WirelessMode::Infrastructure,
                    active_access_point: Some("/ap/1".into()),
                    access_points: vec![AccessPoint {
                        path: "/ap/1".into(),
                        ssid: "home".into(),
                        strength,
                        mode: WirelessMode::Infrastructure,
                        flags: ApFlags::PRIVACY,
                        wpa_flags: ApSecurityFlags::empty(),
                        rsn_flags: ApSecurityFlags::KEY_MGMT_PSK,
                    }],
                }),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn connected_wireless() {
        let state = DisplayState::derive(&snapshot(63));
        assert_eq!(state.connection_name, "home");
        assert_eq!(state.icon_name, "network-wireless-connected-75");
    }

    #[test]
    fn wireless_disabled_clears_everything() {
        let mut s = snapshot(63);
        s.wireless_enabled = false;
        assert_eq!(DisplayState::derive(&s), DisplayState::default());
    }

    #[test]
    fn disconnected_clears_everything() {
        let mut s = snapshot(63);
        s.state = NmState::Disconnected;
        assert_eq!(DisplayState::derive(&s), DisplayState::default());
    }

    #[test]
    fn connecting_shows_icon_without_name() {
        let mut s = snapshot(10);
        s.state = NmState::Connecting;
        let state = DisplayState::derive(&s);
        assert_eq!(state.connection_name, "");
        assert_eq!(state.icon_name, "network-wireless-connected-25");
    }

    #[test]
    fn same_snapshot_same_state() {
        let s = snapshot(90);
        assert_eq!(DisplayState::derive(&s), DisplayState::derive(&s));
    }
}
