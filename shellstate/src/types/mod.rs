//! Type definitions and constants.
//!
//! This module contains NetworkManager and KScreen constants.

pub(crate) mod constants;
