//! Settings dictionary for joining a visible access point.
//!
//! NetworkManager's `AddAndActivateConnection` takes a nested dictionary:
//! - `connection`: type, id, uuid, autoconnect, permissions
//! - `802-11-wireless`: ssid, mode and a reference to the security section
//! - `802-11-wireless-security`: key management and the secret
//!
//! Enterprise (802.1X) networks need more than a password and are rejected
//! here; they have to be configured through a full connection editor.

use std::collections::HashMap;
use uuid::Uuid;
use zvariant::Value;

use crate::Result;
use crate::api::models::{AccessPoint, ApFlags, ApSecurityFlags, Error, WirelessMode};

pub(crate) type ConnectionSettings = HashMap<&'static str, HashMap<&'static str, Value<'static>>>;

const WIRELESS: &str = "802-11-wireless";
const WIRELESS_SECURITY: &str = "802-11-wireless-security";

/// Security scheme chosen for a new profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WirelessSecurity {
    Open,
    StaticWep,
    /// WPA personal on an ad-hoc network.
    WpaNone,
    WpaPsk,
    Sae,
    Enterprise,
}

impl WirelessSecurity {
    /// Picks the scheme from the flags an access point advertises.
    pub fn for_access_point(ap: &AccessPoint) -> Self {
        let wpa = ap.wpa_flags | ap.rsn_flags;

        if wpa.is_empty() {
            return if ap.flags.contains(ApFlags::PRIVACY) {
                Self::StaticWep
            } else {
                Self::Open
            };
        }

        if ap.mode == WirelessMode::Adhoc {
            return Self::WpaNone;
        }

        if wpa.contains(ApSecurityFlags::KEY_MGMT_PSK) {
            Self::WpaPsk
        } else if wpa.contains(ApSecurityFlags::KEY_MGMT_SAE) {
            Self::Sae
        } else if wpa.contains(ApSecurityFlags::KEY_MGMT_802_1X) {
            Self::Enterprise
        } else {
            Self::WpaPsk
        }
    }

    fn key_mgmt(&self) -> Option<&'static str> {
        match self {
            Self::Open | Self::Enterprise => None,
            Self::StaticWep => Some("none"),
            Self::WpaNone => Some("wpa-none"),
            Self::WpaPsk => Some("wpa-psk"),
            Self::Sae => Some("sae"),
        }
    }
}

/// Builds the profile for a visible access point.
pub struct WirelessConnectionBuilder {
    ssid: String,
    adhoc: bool,
    security: WirelessSecurity,
    password: String,
    user: Option<String>,
}

impl WirelessConnectionBuilder {
    pub fn for_access_point(ap: &AccessPoint) -> Self {
        Self {
            ssid: ap.ssid.clone(),
            adhoc: ap.mode == WirelessMode::Adhoc,
            security: WirelessSecurity::for_access_point(ap),
            password: String::new(),
            user: None,
        }
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Restricts the profile to one login.
    pub fn user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    pub fn build(self) -> Result<ConnectionSettings> {
        if self.security == WirelessSecurity::Enterprise {
            return Err(Error::UnsupportedSecurity(format!(
                "{} requires 802.1X credentials",
                self.ssid
            )));
        }

        let mut settings = HashMap::new();

        let mut connection = HashMap::new();
        connection.insert("type", Value::from(WIRELESS));
        connection.insert("id", Value::from(self.ssid.clone()));
        connection.insert("uuid", Value::from(Uuid::new_v4().to_string()));
        connection.insert("autoconnect", Value::from(true));
        if let Some(user) = &self.user {
            connection.insert("permissions", Value::from(vec![format!("user:{user}:")]));
        }
        settings.insert("connection", connection);

        let mut wireless = HashMap::new();
        wireless.insert("ssid", Value::from(self.ssid.as_bytes().to_vec()));
        if self.adhoc {
            wireless.insert("mode", Value::from("adhoc"));
        }

        if let Some(key_mgmt) = self.security.key_mgmt() {
            wireless.insert("security", Value::from(WIRELESS_SECURITY));

            let mut security = HashMap::new();
            security.insert("key-mgmt", Value::from(key_mgmt));
            match self.security {
                WirelessSecurity::StaticWep => {
                    security.insert("wep-key0", Value::from(self.password));
                }
                _ => {
                    security.insert("psk", Value::from(self.password));
                }
            }
            settings.insert(WIRELESS_SECURITY, security);
        }
        settings.insert(WIRELESS, wireless);

        Ok(settings)
    }
}
