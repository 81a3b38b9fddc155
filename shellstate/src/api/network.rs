//! Network indicator.
//!
//! Owns the `DisplayState` shown in the panel: the active wireless
//! connection name and the wireless icon. Every notification recomputes it
//! from a fresh snapshot; subscribers only see values that differ from the
//! previous one.

use log::{debug, warn};
use serde::Serialize;
use tokio::sync::watch;

use crate::Result;
use crate::api::control::NetworkControl;
use crate::api::models::{DisplayState, NetworkEvent, NetworkSnapshot};

/// Radio switches mirrored by the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IndicatorFlags {
    pub enabled: bool,
    pub wireless_enabled: bool,
    pub wireless_hardware_enabled: bool,
}

impl From<&NetworkSnapshot> for IndicatorFlags {
    fn from(snapshot: &NetworkSnapshot) -> Self {
        Self {
            enabled: snapshot.networking_enabled,
            wireless_enabled: snapshot.wireless_enabled,
            wireless_hardware_enabled: snapshot.wireless_hardware_enabled,
        }
    }
}

pub struct NetworkIndicator<C> {
    control: C,
    display: watch::Sender<DisplayState>,
    flags: watch::Sender<IndicatorFlags>,
}

impl<C: NetworkControl> NetworkIndicator<C> {
    pub fn new(control: C) -> Self {
        Self {
            control,
            display: watch::Sender::new(DisplayState::default()),
            flags: watch::Sender::new(IndicatorFlags::default()),
        }
    }

    /// Reads an initial snapshot and publishes it.
    pub async fn load(&self) -> Result<()> {
        let snapshot = self.control.snapshot().await?;
        self.apply(&snapshot);
        Ok(())
    }

    pub fn display_state(&self) -> DisplayState {
        self.display.borrow().clone()
    }

    pub fn flags(&self) -> IndicatorFlags {
        *self.flags.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.display.subscribe()
    }

    pub fn subscribe_flags(&self) -> watch::Receiver<IndicatorFlags> {
        self.flags.subscribe()
    }

    /// Recomputes after a notification.
    ///
    /// Returns whether a new `DisplayState` was published.
    pub fn handle(&self, event: &NetworkEvent, snapshot: &NetworkSnapshot) -> bool {
        debug!("Indicator recompute after {event:?}");
        self.apply(snapshot)
    }

    fn apply(&self, snapshot: &NetworkSnapshot) -> bool {
        let flags = IndicatorFlags::from(snapshot);
        self.flags.send_if_modified(|current| {
            if *current == flags {
                return false;
            }
            *current = flags;
            true
        });

        let state = DisplayState::derive(snapshot);
        self.display.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            debug!("Display state changed: {state:?}");
            *current = state;
            true
        })
    }

    pub async fn set_enabled(&self, enabled: bool) {
        if let Err(e) = self.control.set_networking_enabled(enabled).await {
            warn!("Failed to set networking enabled to {enabled}: {e}");
        }
    }

    pub async fn set_wireless_enabled(&self, enabled: bool) {
        if let Err(e) = self.control.set_wireless_enabled(enabled).await {
            warn!("Failed to set wireless enabled to {enabled}: {e}");
        }
    }
}
