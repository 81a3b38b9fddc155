//! Human-readable network status and active connection summary.

use crate::api::models::{
    ActiveConnection, ActiveConnectionState, DeviceType, NetworkSnapshot, NmState,
    VpnConnectionState,
};
use crate::types::constants::{device_type, nm_version};
use crate::util::utils::parse_version;

/// Status line for the overall NetworkManager state.
pub fn network_status(snapshot: &NetworkSnapshot) -> String {
    match snapshot.state {
        NmState::ConnectedLinkLocal | NmState::ConnectedSiteOnly | NmState::Connected => {
            "Connected".to_string()
        }
        NmState::Asleep => "Inactive".to_string(),
        NmState::Disconnected => "Disconnected".to_string(),
        NmState::Disconnecting => "Disconnecting".to_string(),
        NmState::Connecting => "Connecting".to_string(),
        NmState::Unknown => unknown_reason(snapshot),
    }
}

fn unknown_reason(snapshot: &NetworkSnapshot) -> String {
    if !snapshot.service_running {
        return "NetworkManager not running".to_string();
    }

    let minimum = (
        nm_version::MIN_MAJOR,
        nm_version::MIN_MINOR,
        nm_version::MIN_MICRO,
    );
    let version = snapshot.version.as_deref().unwrap_or_default();
    match parse_version(version) {
        Some(found) if found >= minimum => "Unknown".to_string(),
        _ => format!(
            "NetworkManager {}.{}.{} required, found {version}",
            minimum.0, minimum.1, minimum.2
        ),
    }
}

/// One line per displayable active connection, sorted by kind.
///
/// When NetworkManager is not connected the summary is the status line.
pub fn active_connections_summary(
    snapshot: &NetworkSnapshot,
    manage_virtual_connections: bool,
) -> String {
    if !snapshot.state.is_connected() {
        return network_status(snapshot);
    }

    let mut active: Vec<&ActiveConnection> = snapshot.active_connections.iter().collect();
    active.sort_by_key(|c| c.kind());

    active
        .into_iter()
        .filter(|c| c.connection_type.is_supported(manage_virtual_connections))
        .filter_map(|c| {
            let device = snapshot.find_device(c.first_device()?)?;
            if device.device_type == DeviceType::Generic
                || device.device_type.to_code() > device_type::TEAM
            {
                return None;
            }

            let label = if c.vpn { "VPN" } else { device.device_type.label() };
            Some(format!("{label}: {}", connection_status(c)))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn connection_status(c: &ActiveConnection) -> String {
    let (connecting, connected) = match (c.vpn, c.vpn_state) {
        (true, Some(vpn)) => (vpn.is_connecting(), vpn == VpnConnectionState::Activated),
        _ => (
            c.state == ActiveConnectionState::Activating,
            c.state == ActiveConnectionState::Activated,
        ),
    };

    if connecting {
        format!("Connecting to {}", c.id)
    } else if connected {
        format!("Connected to {}", c.id)
    } else {
        String::new()
    }
}
