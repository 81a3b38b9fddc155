//! Small conversion helpers shared by the D-Bus readers.

use log::warn;
use std::borrow::Cow;
use std::str;
use zvariant::OwnedObjectPath;

use crate::types::constants::bus;

/// Decode SSID bytes, defaulting to empty string if invalid.
pub(crate) fn decode_ssid_or_empty(bytes: &[u8]) -> Cow<'static, str> {
    if bytes.is_empty() {
        return Cow::Borrowed("");
    }

    match str::from_utf8(bytes) {
        Ok(s) => Cow::Owned(s.to_owned()),
        Err(e) => {
            warn!("Invalid UTF-8 in SSID: {e}");
            Cow::Borrowed("")
        }
    }
}

/// NetworkManager uses `/` for "no object".
pub(crate) fn path_or_none(path: &OwnedObjectPath) -> Option<String> {
    match path.as_str() {
        bus::NO_OBJECT => None,
        p => Some(p.to_string()),
    }
}

/// Parses a `major.minor.micro` version string, ignoring any suffix.
pub(crate) fn parse_version(version: &str) -> Option<(u32, u32, u32)> {
    let mut parts = version.split('.').map(|p| {
        p.chars()
            .take_while(char::is_ascii_digit)
            .collect::<String>()
            .parse::<u32>()
    });

    let major = parts.next()?.ok()?;
    let minor = parts.next().and_then(|p| p.ok()).unwrap_or(0);
    let micro = parts.next().and_then(|p| p.ok()).unwrap_or(0);
    Some((major, minor, micro))
}

/// Login name used in connection permissions.
pub(crate) fn current_user() -> Option<String> {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .ok()
        .filter(|u| !u.is_empty())
}

/// Macro to convert Result to Option with error logging.
/// Usage: `try_log!(result, "context message")`
#[macro_export]
macro_rules! try_log {
    ($result:expr, $context:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => {
                log::warn!("{}: {:?}", $context, e);
                return None;
            }
        }
    };
}
