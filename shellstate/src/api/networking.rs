//! Networking panel state and commands.

use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::{Mutex, watch};

use crate::Result;
use crate::api::control::NetworkControl;
use crate::api::models::{NetworkEvent, NetworkSnapshot};
use crate::api::options::ShellOptions;
use crate::core::summary::{active_connections_summary, network_status};

/// Everything the networking panel displays.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NetworkingState {
    pub enabled: bool,
    pub wireless_enabled: bool,
    pub wireless_hardware_enabled: bool,
    pub mobile_enabled: bool,
    pub mobile_hardware_enabled: bool,
    /// Both wireless and mobile radios are off.
    pub airplane_mode: bool,
    pub network_status: String,
    /// One line per active connection, or the status when not connected.
    pub active_connections: String,
}

impl NetworkingState {
    pub fn derive(snapshot: &NetworkSnapshot, options: &ShellOptions) -> Self {
        Self {
            enabled: snapshot.networking_enabled,
            wireless_enabled: snapshot.wireless_enabled,
            wireless_hardware_enabled: snapshot.wireless_hardware_enabled,
            mobile_enabled: snapshot.wwan_enabled,
            mobile_hardware_enabled: snapshot.wwan_hardware_enabled,
            airplane_mode: !snapshot.wireless_enabled && !snapshot.wwan_enabled,
            network_status: network_status(snapshot),
            active_connections: active_connections_summary(
                snapshot,
                options.manage_virtual_connections,
            ),
        }
    }
}

/// Radio switches as they were before airplane mode was turned on.
#[derive(Debug, Clone, Copy)]
struct RadioMemory {
    wireless: bool,
    mobile: bool,
}

pub struct Networking<C> {
    control: C,
    options: ShellOptions,
    state: watch::Sender<NetworkingState>,
    remembered: Mutex<Option<RadioMemory>>,
}

impl<C: NetworkControl> Networking<C> {
    pub fn new(control: C, options: ShellOptions) -> Self {
        Self {
            control,
            options,
            state: watch::Sender::new(NetworkingState::default()),
            remembered: Mutex::new(None),
        }
    }

    pub async fn load(&self) -> Result<()> {
        let snapshot = self.control.snapshot().await?;
        self.apply(&snapshot);
        Ok(())
    }

    pub fn state(&self) -> NetworkingState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NetworkingState> {
        self.state.subscribe()
    }

    /// Recomputes after a notification. Returns whether anything changed.
    pub fn handle(&self, event: &NetworkEvent, snapshot: &NetworkSnapshot) -> bool {
        debug!("Networking recompute after {event:?}");
        self.apply(snapshot)
    }

    fn apply(&self, snapshot: &NetworkSnapshot) -> bool {
        let next = NetworkingState::derive(snapshot, &self.options);
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        })
    }

    pub async fn set_enabled(&self, enabled: bool) {
        if let Err(e) = self.control.set_networking_enabled(enabled).await {
            warn!("Failed to set networking enabled to {enabled}: {e}");
        }
    }

    pub async fn set_wireless_enabled(&self, enabled: bool) {
        self.switch_wireless(enabled).await;
    }

    pub async fn set_mobile_enabled(&self, enabled: bool) {
        self.switch_mobile(enabled).await;
    }

    async fn switch_wireless(&self, enabled: bool) -> bool {
        match self.control.set_wireless_enabled(enabled).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to set wireless enabled to {enabled}: {e}");
                false
            }
        }
    }

    async fn switch_mobile(&self, enabled: bool) -> bool {
        match self.control.set_wwan_enabled(enabled).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to set mobile broadband enabled to {enabled}: {e}");
                false
            }
        }
    }

    /// Turns both radios off, or restores the ones that were on before.
    ///
    /// Without a remembered state (airplane mode was already on when the
    /// panel started) leaving airplane mode turns wireless back on. The
    /// published mode only changes when at least one radio was switched.
    pub async fn set_airplane_mode_enabled(&self, enabled: bool) {
        let mut remembered = self.remembered.lock().await;
        let current = self.state();
        if current.airplane_mode == enabled {
            return;
        }

        let switched = if enabled {
            let wireless = self.switch_wireless(false).await;
            let mobile = self.switch_mobile(false).await;
            if wireless || mobile {
                *remembered = Some(RadioMemory {
                    wireless: current.wireless_enabled,
                    mobile: current.mobile_enabled,
                });
            }
            wireless || mobile
        } else {
            let restore = remembered.unwrap_or(RadioMemory {
                wireless: true,
                mobile: false,
            });
            let wireless = restore.wireless && self.switch_wireless(true).await;
            let mobile = restore.mobile && self.switch_mobile(true).await;
            if wireless || mobile {
                *remembered = None;
            }
            wireless || mobile
        };

        if !switched {
            warn!("Airplane mode left at {}, no radio could be switched", current.airplane_mode);
            return;
        }

        self.state.send_modify(|s| s.airplane_mode = enabled);
        info!("Airplane mode set to {enabled}");
    }

    pub async fn activate_connection(
        &self,
        connection: &str,
        device: Option<&str>,
        specific_object: Option<&str>,
    ) {
        match self
            .control
            .activate_connection(connection, device, specific_object)
            .await
        {
            Ok(active) => debug!("Activation of {connection} started as {active}"),
            Err(e) => warn!("Unable to activate connection {connection}: {e}"),
        }
    }

    pub async fn add_and_activate_connection(
        &self,
        device: &str,
        access_point: &str,
        password: &str,
    ) {
        match self
            .control
            .add_and_activate_connection(device, access_point, password)
            .await
        {
            Ok(active) => debug!("New connection for {access_point} started as {active}"),
            Err(e) => warn!("Unable to add connection for {access_point}: {e}"),
        }
    }

    pub async fn deactivate_connection(&self, connection: &str, device: &str) {
        if let Err(e) = self.control.deactivate_connection(connection, device).await {
            warn!("Failed to deactivate connection {connection}: {e}");
        }
    }

    pub async fn remove_connection(&self, connection: &str) {
        if let Err(e) = self.control.remove_connection(connection).await {
            warn!("Not possible to remove connection {connection}: {e}");
        }
    }
}
