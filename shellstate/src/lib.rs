//! Desktop shell state backed by D-Bus services.
//!
//! This crate computes what a desktop shell's status bar and settings pages
//! show about networking, displays and the wallpaper:
//!
//! - The primary network connection and the wireless signal icon
//! - The network indicator's `DisplayState` (connection name and icon)
//! - The networking panel: radio switches, airplane mode, status text and
//!   the active connection summary, plus connection commands
//! - The network list of the connection picker and its filter
//! - The display configuration reported by the KScreen backend
//! - The wallpaper path and the dark mode dimming flag from the settings
//!   daemon
//!
//! # Example
//!
//! ```no_run
//! use shellstate::{NetworkIndicator, NetworkManager};
//!
//! # async fn example() -> shellstate::Result<()> {
//! let nm = NetworkManager::new().await?;
//! let indicator = NetworkIndicator::new(nm);
//! indicator.load().await?;
//!
//! let state = indicator.display_state();
//! println!("{}: {}", state.connection_name, state.icon_name);
//! # Ok(())
//! # }
//! ```
//!
//! # Adapters and collaborators
//!
//! `NetworkIndicator`, `Networking` and `Screen` are written against the
//! `NetworkControl` and `DisplayConfigSource` traits. `NetworkManager` and
//! `KScreenBackend` are the D-Bus implementations. Published state lives in
//! `tokio::sync::watch` channels; subscribers are woken only when a value
//! actually changes.
//!
//! # Monitoring
//!
//! `NetworkManager::monitor`, `Screen::monitor` and `Wallpaper::monitor`
//! subscribe to D-Bus signals and run until their shutdown receiver fires.
//!
//! # Error Handling
//!
//! Fallible operations return [`Result<T>`](Result) with [`Error`]. Commands
//! issued through the adapters log failures and never return them, matching
//! how a shell treats a switch that did not take effect.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`. For example:
//!
//! ```no_run,ignore
//! env_logger::init();
//! // ...
//! ```

pub mod api;
mod core;
mod dbus;
mod monitoring;
mod types;
mod util;

// Re-exported public API
pub use crate::api::control::{DisplayConfigSource, NetworkControl};
pub use crate::api::models::{
    AccessPoint, ActiveConnection, ActiveConnectionState, ApFlags, ApSecurityFlags,
    ConnectionKind, ConnectionType, Device, DeviceLookup, DeviceState, DeviceType, DisplayConfig,
    DisplayState, Error, NetworkEvent, NetworkItem, NetworkItemKind, NetworkSnapshot, NmState,
    Output, Position, Rotation, ScreenFeatures, Size, VpnConnectionState, WallpaperEvent,
    WirelessDetails, WirelessMode, WirelessSample,
};
pub use crate::api::network::{IndicatorFlags, NetworkIndicator};
pub use crate::api::network_manager::NetworkManager;
pub use crate::api::networking::{Networking, NetworkingState};
pub use crate::api::options::{BusEndpoint, ShellOptions};
pub use crate::api::screen::{KScreenBackend, Screen};
pub use crate::api::wallpaper::Wallpaper;
pub use crate::core::network_list::{filter_networks, network_items};
pub use crate::core::selection::{WirelessIcon, icon_for_selection, select_primary, signal_bucket};
pub use crate::core::summary::{active_connections_summary, network_status};

/// A specialized `Result` type for shellstate operations.
pub type Result<T> = std::result::Result<T, Error>;
