//! Core derivations and NetworkManager operations.
//!
//! `selection`, `summary`, `network_list` and `display` are pure functions
//! over a `NetworkSnapshot`. The remaining modules talk to the bus.

pub(crate) mod connection;
pub(crate) mod display;
pub(crate) mod kscreen;
pub mod network_list;
pub mod selection;
pub(crate) mod snapshot;
pub mod summary;
pub(crate) mod wifi_settings;
