//! Public API: the adapters, their collaborators and the data they publish.

pub mod control;
pub mod models;
pub mod network;
pub mod network_manager;
pub mod networking;
pub mod options;
pub mod screen;
pub mod wallpaper;
