//! Primary connection selection and wireless icon derivation.
//!
//! When several connections are active at once, the shell shows one of them
//! as "the network". The choice starts from what NetworkManager reports
//! (the activating connection, then the default-route connection) and falls
//! back to an override chain over all active connections.
//!
//! The override chain is not a total order: later rules replace earlier
//! picks depending on the pick's type, so the result depends on the order
//! of the input list. It has to be evaluated rule by rule.

use crate::api::models::{
    ActiveConnection, ConnectionType, DeviceLookup, DeviceType, WirelessMode,
};
use crate::types::constants::{WIRELESS_ICON_PREFIX, signal_bucket as bucket};

/// Picks the connection that represents overall network status.
///
/// `activating` is the path of the connection NetworkManager is currently
/// bringing up, if any.
pub fn select_primary<'a>(
    connections: &'a [ActiveConnection],
    activating: Option<&str>,
) -> Option<&'a ActiveConnection> {
    if connections.is_empty() {
        return None;
    }

    let mut pick = activating.and_then(|path| connections.iter().find(|c| c.path == path));

    // No icons for virtual connections, use whatever carries the default route
    if pick.is_none_or(|c| {
        c.connection_type.is_virtual() || c.connection_type == ConnectionType::WireGuard
    }) {
        pick = connections.iter().find(|c| c.is_default);
    }

    let needs_fallback = pick.is_none_or(|c| {
        matches!(
            c.connection_type,
            ConnectionType::Generic | ConnectionType::Tun
        )
    });

    if needs_fallback {
        for candidate in connections {
            pick = override_pick(pick, candidate);
        }
    }

    pick
}

/// One step of the fallback chain.
fn override_pick<'a>(
    pick: Option<&'a ActiveConnection>,
    candidate: &'a ActiveConnection,
) -> Option<&'a ActiveConnection> {
    let current = pick.map(|c| c.connection_type);
    let replace = match candidate.connection_type {
        ConnectionType::Bluetooth => current.is_none_or(|t| t <= ConnectionType::Bluetooth),
        ConnectionType::Cdma => current.is_none_or(|t| t <= ConnectionType::Cdma),
        ConnectionType::Gsm => current.is_none_or(|t| t <= ConnectionType::Gsm),
        ConnectionType::Vpn | ConnectionType::WireGuard => true,
        // Only a plain VPN pick survives a wired connection, WireGuard does not
        ConnectionType::Wired => current.is_none_or(|t| t != ConnectionType::Vpn),
        ConnectionType::Wireless => current
            .is_none_or(|t| t != ConnectionType::Vpn && t != ConnectionType::Wired),
        _ => false,
    };

    if replace { Some(candidate) } else { pick }
}

/// Outcome of deriving the wireless icon for the selected connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WirelessIcon {
    /// No wireless icon is shown.
    Clear,
    /// Show the icon for this signal strength.
    Strength(u8),
}

impl WirelessIcon {
    /// Icon id, empty for `Clear`.
    pub fn icon_name(&self) -> String {
        match self {
            Self::Clear => String::new(),
            Self::Strength(s) => format!("{WIRELESS_ICON_PREFIX}{}", signal_bucket(*s)),
        }
    }
}

/// Derives the wireless icon for the selected connection.
///
/// Missing devices or access points are not errors; they clear the icon.
pub fn icon_for_selection<L>(selected: Option<&ActiveConnection>, devices: &L) -> WirelessIcon
where
    L: DeviceLookup + ?Sized,
{
    let Some(device) = selected
        .and_then(ActiveConnection::first_device)
        .and_then(|path| devices.find_device(path))
    else {
        return WirelessIcon::Clear;
    };

    if device.device_type != DeviceType::Wifi {
        return WirelessIcon::Clear;
    }

    let Some(wireless) = device.wireless.as_ref() else {
        return WirelessIcon::Clear;
    };

    if wireless.mode == WirelessMode::Adhoc {
        return WirelessIcon::Strength(bucket::FULL);
    }

    match wireless.sample() {
        Some(sample) => WirelessIcon::Strength(sample.strength),
        None => WirelessIcon::Clear,
    }
}

/// Maps a strength percentage onto one of five icon buckets.
///
/// Each bucket includes its upper bound: 25 maps to 25, 26 to 50.
pub fn signal_bucket(strength: u8) -> u8 {
    match strength {
        0 => 0,
        1..=bucket::LOW_MAX => bucket::LOW_MAX,
        26..=bucket::MEDIUM_MAX => bucket::MEDIUM_MAX,
        51..=bucket::HIGH_MAX => bucket::HIGH_MAX,
        _ => bucket::FULL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{
        AccessPoint, ActiveConnectionState, ApFlags, ApSecurityFlags, Device, DeviceState,
        WirelessDetails,
    };

    fn active(path: &str, ty: ConnectionType) -> ActiveConnection {
        ActiveConnection {
            path: path.into(),
            id: path.trim_start_matches('/').into(),
            uuid: String::new(),
            connection: String::new(),
            connection_type: ty,
            state: ActiveConnectionState::Activated,
            devices: vec![format!("/dev{path}")],
            is_default: false,
            vpn: ty == ConnectionType::Vpn,
            vpn_state: None,
            master: None,
        }
    }

    fn wifi_device(path: &str, mode: WirelessMode, strength: Option<u8>) -> Device {
        let access_points = strength
            .map(|s| {
                vec![AccessPoint {
                    path: "/ap/1".into(),
                    ssid: "home".into(),
                    strength: s,
                    mode,
                    flags: ApFlags::empty(),
                    wpa_flags: ApSecurityFlags::empty(),
                    rsn_flags: ApSecurityFlags::empty(),
                }]
            })
            .unwrap_or_default();

        Device {
            path: path.into(),
            interface: "wlan0".into(),
            device_type: DeviceType::Wifi,
            state: DeviceState::Activated,
            wireless: Some(WirelessDetails {
                mode,
                active_access_point: strength.map(|_| "/ap/1".to_string()),
                access_points,
            }),
        }
    }

    #[test]
    fn empty_list_has_no_primary() {
        assert!(select_primary(&[], None).is_none());
        assert!(select_primary(&[], Some("/a")).is_none());
    }

    #[test]
    fn activating_connection_wins() {
        let mut wired = active("/wired", ConnectionType::Wired);
        wired.is_default = true;
        let wifi = active("/wifi", ConnectionType::Wireless);
        let list = [wired, wifi];

        let pick = select_primary(&list, Some("/wifi")).unwrap();
        assert_eq!(pick.path, "/wifi");
    }

    #[test]
    fn single_wired_connection_is_always_selected() {
        let list = [active("/wired", ConnectionType::Wired)];
        assert_eq!(select_primary(&list, None).unwrap().path, "/wired");
        assert_eq!(select_primary(&list, Some("/wired")).unwrap().path, "/wired");
        assert_eq!(select_primary(&list, Some("/gone")).unwrap().path, "/wired");

        let mut default_route = active("/wired", ConnectionType::Wired);
        default_route.is_default = true;
        let list = [default_route];
        assert_eq!(select_primary(&list, None).unwrap().path, "/wired");
    }

    #[test]
    fn unknown_activating_path_uses_default_route() {
        let mut wired = active("/wired", ConnectionType::Wired);
        wired.is_default = true;
        let list = [active("/wifi", ConnectionType::Wireless), wired];

        let pick = select_primary(&list, Some("/gone")).unwrap();
        assert_eq!(pick.path, "/wired");
    }

    #[test]
    fn virtual_activating_connection_falls_through_to_default_route() {
        let bridge = active("/bridge", ConnectionType::Bridge);
        let mut wifi = active("/wifi", ConnectionType::Wireless);
        wifi.is_default = true;
        let list = [bridge, wifi];

        assert_eq!(select_primary(&list, Some("/bridge")).unwrap().path, "/wifi");
    }

    #[test]
    fn wireguard_activating_connection_falls_through_to_default_route() {
        let wg = active("/wg", ConnectionType::WireGuard);
        let mut wired = active("/wired", ConnectionType::Wired);
        wired.is_default = true;
        let list = [wg, wired];

        assert_eq!(select_primary(&list, Some("/wg")).unwrap().path, "/wired");
    }

    #[test]
    fn vpn_activating_connection_is_kept() {
        let vpn = active("/vpn", ConnectionType::Vpn);
        let mut wired = active("/wired", ConnectionType::Wired);
        wired.is_default = true;
        let list = [vpn, wired];

        assert_eq!(select_primary(&list, Some("/vpn")).unwrap().path, "/vpn");
    }

    #[test]
    fn generic_default_route_triggers_fallback_scan() {
        let mut generic = active("/generic", ConnectionType::Generic);
        generic.is_default = true;
        let list = [generic, active("/wifi", ConnectionType::Wireless)];

        assert_eq!(select_primary(&list, None).unwrap().path, "/wifi");
    }

    #[test]
    fn tun_default_route_is_replaced_by_wired() {
        let mut tun = active("/tun", ConnectionType::Tun);
        tun.is_default = true;
        let list = [tun, active("/wired", ConnectionType::Wired)];

        assert_eq!(select_primary(&list, None).unwrap().path, "/wired");
    }

    #[test]
    fn mobile_chain_prefers_gsm_over_cdma_over_bluetooth() {
        let bt = active("/bt", ConnectionType::Bluetooth);
        let cdma = active("/cdma", ConnectionType::Cdma);
        let gsm = active("/gsm", ConnectionType::Gsm);

        let list = [bt.clone(), cdma.clone(), gsm.clone()];
        assert_eq!(select_primary(&list, None).unwrap().path, "/gsm");

        let list = [bt.clone(), cdma.clone()];
        assert_eq!(select_primary(&list, None).unwrap().path, "/cdma");

        let list = [bt];
        assert_eq!(select_primary(&list, None).unwrap().path, "/bt");
    }

    #[test]
    fn bluetooth_does_not_replace_gsm() {
        let list = [
            active("/gsm", ConnectionType::Gsm),
            active("/bt", ConnectionType::Bluetooth),
        ];
        assert_eq!(select_primary(&list, None).unwrap().path, "/gsm");
    }

    #[test]
    fn wired_does_not_replace_vpn() {
        let list = [
            active("/vpn", ConnectionType::Vpn),
            active("/wired", ConnectionType::Wired),
        ];
        assert_eq!(select_primary(&list, None).unwrap().path, "/vpn");
    }

    #[test]
    fn wired_replaces_wireguard_in_fallback_scan() {
        // Regression: the wired guard never protected WireGuard picks.
        let list = [
            active("/wg", ConnectionType::WireGuard),
            active("/wired", ConnectionType::Wired),
        ];
        assert_eq!(select_primary(&list, None).unwrap().path, "/wired");
    }

    #[test]
    fn wireless_replaces_wireguard_in_fallback_scan() {
        let list = [
            active("/wg", ConnectionType::WireGuard),
            active("/wifi", ConnectionType::Wireless),
        ];
        assert_eq!(select_primary(&list, None).unwrap().path, "/wifi");
    }

    #[test]
    fn wireless_does_not_replace_wired() {
        let list = [
            active("/wired", ConnectionType::Wired),
            active("/wifi", ConnectionType::Wireless),
        ];
        assert_eq!(select_primary(&list, None).unwrap().path, "/wired");
    }

    #[test]
    fn unlisted_types_never_picked_by_fallback() {
        let list = [
            active("/pppoe", ConnectionType::Pppoe),
            active("/adsl", ConnectionType::Adsl),
        ];
        assert!(select_primary(&list, None).is_none());
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(signal_bucket(0), 0);
        assert_eq!(signal_bucket(1), 25);
        assert_eq!(signal_bucket(25), 25);
        assert_eq!(signal_bucket(26), 50);
        assert_eq!(signal_bucket(50), 50);
        assert_eq!(signal_bucket(51), 75);
        assert_eq!(signal_bucket(75), 75);
        assert_eq!(signal_bucket(76), 100);
        assert_eq!(signal_bucket(100), 100);
    }

    #[test]
    fn icon_names() {
        assert_eq!(WirelessIcon::Clear.icon_name(), "");
        assert_eq!(
            WirelessIcon::Strength(40).icon_name(),
            "network-wireless-connected-50"
        );
        assert_eq!(
            WirelessIcon::Strength(0).icon_name(),
            "network-wireless-connected-0"
        );
    }

    #[test]
    fn icon_clear_without_selection() {
        let devices: Vec<Device> = Vec::new();
        assert_eq!(icon_for_selection(None, devices.as_slice()), WirelessIcon::Clear);
    }

    #[test]
    fn icon_clear_for_wired_device() {
        let conn = active("/wired", ConnectionType::Wired);
        let devices = vec![Device {
            path: "/dev/wired".into(),
            interface: "eth0".into(),
            device_type: DeviceType::Ethernet,
            state: DeviceState::Activated,
            wireless: None,
        }];
        assert_eq!(
            icon_for_selection(Some(&conn), devices.as_slice()),
            WirelessIcon::Clear
        );
    }

    #[test]
    fn icon_clear_for_missing_device() {
        let conn = active("/wifi", ConnectionType::Wireless);
        let devices: Vec<Device> = Vec::new();
        assert_eq!(
            icon_for_selection(Some(&conn), devices.as_slice()),
            WirelessIcon::Clear
        );
    }

    #[test]
    fn icon_uses_network_strength() {
        let conn = active("/wifi", ConnectionType::Wireless);
        let devices = vec![wifi_device("/dev/wifi", WirelessMode::Infrastructure, Some(40))];
        let icon = icon_for_selection(Some(&conn), devices.as_slice());
        assert_eq!(icon, WirelessIcon::Strength(40));
        assert_eq!(icon.icon_name(), "network-wireless-connected-50");
    }

    #[test]
    fn adhoc_forces_full_strength() {
        let conn = active("/wifi", ConnectionType::Wireless);
        let devices = vec![wifi_device("/dev/wifi", WirelessMode::Adhoc, Some(5))];
        assert_eq!(
            icon_for_selection(Some(&conn), devices.as_slice()),
            WirelessIcon::Strength(100)
        );
    }

    #[test]
    fn icon_clear_without_access_point() {
        let conn = active("/wifi", ConnectionType::Wireless);
        let devices = vec![wifi_device("/dev/wifi", WirelessMode::Infrastructure, None)];
        assert_eq!(
            icon_for_selection(Some(&conn), devices.as_slice()),
            WirelessIcon::Clear
        );
    }
}
