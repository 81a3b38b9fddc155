//! KScreen backend proxy.

use std::collections::HashMap;
use zbus::{Result, proxy};
use zvariant::OwnedValue;

/// The out-of-process KScreen backend.
///
/// `getConfig` returns the whole display configuration as a nested
/// `a{sv}`; `configChanged` carries the new one.
#[proxy(interface = "org.kde.kscreen.Backend")]
pub trait KScreenBackend {
    #[zbus(name = "getConfig")]
    fn get_config(&self) -> Result<HashMap<String, OwnedValue>>;

    #[zbus(signal, name = "configChanged")]
    fn config_changed(&self, config: HashMap<String, OwnedValue>);
}
