//! Signal subscriptions that drive the adapters.
//!
//! Each monitor runs until its shutdown receiver fires or its sender is
//! dropped. A signal stream that closes on its own is reported as
//! `Error::MonitorEnded`.

pub(crate) mod network;
pub(crate) mod screen;
pub(crate) mod wallpaper;
