//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use shellstate::{
    AccessPoint, ActiveConnection, ActiveConnectionState, ApFlags, ApSecurityFlags,
    ConnectionType, Device, DeviceState, DeviceType, Error, NetworkControl, NetworkSnapshot,
    NmState, Result, WirelessDetails, WirelessMode,
};

/// A command received by `FakeControl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Networking(bool),
    Wireless(bool),
    Wwan(bool),
    Activate {
        connection: String,
        device: Option<String>,
        specific_object: Option<String>,
    },
    AddAndActivate {
        device: String,
        access_point: String,
        password: String,
    },
    Deactivate {
        connection: String,
        device: String,
    },
    Remove(String),
}

/// Records commands and serves a settable snapshot.
///
/// Radio commands also update the snapshot, like NetworkManager would.
#[derive(Clone, Default)]
pub struct FakeControl {
    pub snapshot: Arc<Mutex<NetworkSnapshot>>,
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub fail: bool,
}

impl FakeControl {
    pub fn new(snapshot: NetworkSnapshot) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(snapshot)),
            ..Default::default()
        }
    }

    pub fn failing(snapshot: NetworkSnapshot) -> Self {
        Self {
            fail: true,
            ..Self::new(snapshot)
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn current(&self) -> NetworkSnapshot {
        self.snapshot.lock().unwrap().clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut NetworkSnapshot)) {
        f(&mut self.snapshot.lock().unwrap());
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(Error::ServiceUnavailable("org.freedesktop.NetworkManager".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl NetworkControl for FakeControl {
    async fn snapshot(&self) -> Result<NetworkSnapshot> {
        Ok(self.current())
    }

    async fn set_networking_enabled(&self, enabled: bool) -> Result<()> {
        self.record(Call::Networking(enabled))?;
        self.update(|s| s.networking_enabled = enabled);
        Ok(())
    }

    async fn set_wireless_enabled(&self, enabled: bool) -> Result<()> {
        self.record(Call::Wireless(enabled))?;
        self.update(|s| s.wireless_enabled = enabled);
        Ok(())
    }

    async fn set_wwan_enabled(&self, enabled: bool) -> Result<()> {
        self.record(Call::Wwan(enabled))?;
        self.update(|s| s.wwan_enabled = enabled);
        Ok(())
    }

    async fn activate_connection(
        &self,
        connection: &str,
        device: Option<&str>,
        specific_object: Option<&str>,
    ) -> Result<String> {
        self.record(Call::Activate {
            connection: connection.into(),
            device: device.map(Into::into),
            specific_object: specific_object.map(Into::into),
        })?;
        Ok("/org/freedesktop/NetworkManager/ActiveConnection/9".into())
    }

    async fn add_and_activate_connection(
        &self,
        device: &str,
        access_point: &str,
        password: &str,
    ) -> Result<String> {
        self.record(Call::AddAndActivate {
            device: device.into(),
            access_point: access_point.into(),
            password: password.into(),
        })?;
        Ok("/org/freedesktop/NetworkManager/ActiveConnection/10".into())
    }

    async fn deactivate_connection(&self, connection: &str, device: &str) -> Result<()> {
        self.record(Call::Deactivate {
            connection: connection.into(),
            device: device.into(),
        })
    }

    async fn remove_connection(&self, connection: &str) -> Result<()> {
        self.record(Call::Remove(connection.into()))
    }
}

pub fn active(id: &str, ty: ConnectionType, device: &str) -> ActiveConnection {
    ActiveConnection {
        path: format!("/active/{id}"),
        id: id.into(),
        uuid: format!("uuid-{id}"),
        connection: format!("/settings/{id}"),
        connection_type: ty,
        state: ActiveConnectionState::Activated,
        devices: vec![device.into()],
        is_default: false,
        vpn: matches!(ty, ConnectionType::Vpn),
        vpn_state: None,
        master: None,
    }
}

pub fn wired_device(path: &str) -> Device {
    Device {
        path: path.into(),
        interface: "eth0".into(),
        device_type: DeviceType::Ethernet,
        state: DeviceState::Activated,
        wireless: None,
    }
}

pub fn wifi_device(path: &str, ssid: &str, strength: u8) -> Device {
    Device {
        path: path.into(),
        interface: "wlan0".into(),
        device_type: DeviceType::Wifi,
        state: DeviceState::Activated,
        wireless: Some(WirelessDetails {
            mode: WirelessMode::Infrastructure,
            active_access_point: Some("/ap/1".into()),
            access_points: vec![AccessPoint {
                path: "/ap/1".into(),
                ssid: ssid.into(),
                strength,
                mode: WirelessMode::Infrastructure,
                flags: ApFlags::PRIVACY,
                wpa_flags: ApSecurityFlags::empty(),
                rsn_flags: ApSecurityFlags::KEY_MGMT_PSK | ApSecurityFlags::PAIR_CCMP,
            }],
        }),
    }
}

/// NetworkManager connected through one Wi-Fi network.
pub fn wifi_snapshot(ssid: &str, strength: u8) -> NetworkSnapshot {
    let mut home = active(ssid, ConnectionType::Wireless, "/dev/wlan0");
    home.is_default = true;

    NetworkSnapshot {
        service_running: true,
        version: Some("1.46.0".into()),
        state: NmState::Connected,
        networking_enabled: true,
        wireless_enabled: true,
        wireless_hardware_enabled: true,
        wwan_enabled: false,
        wwan_hardware_enabled: true,
        active_connections: vec![home],
        activating: None,
        devices: vec![wifi_device("/dev/wlan0", ssid, strength)],
    }
}
