//! Theme settings daemon proxy.

use zbus::{Result, proxy};

/// Wallpaper related part of the theme settings interface.
///
/// The daemon's property and signal names are lower camel case, and the
/// dims property is spelled `darkModeDimsWallpaer` on the bus. Changes are
/// announced through the daemon's own signals, not `PropertiesChanged`.
#[proxy(interface = "com.cutefish.Theme")]
pub trait Theme {
    #[zbus(property(emits_changed_signal = "false"), name = "wallpaper")]
    fn wallpaper(&self) -> Result<String>;

    #[zbus(
        property(emits_changed_signal = "false"),
        name = "darkModeDimsWallpaer"
    )]
    fn dark_mode_dims_wallpaper(&self) -> Result<bool>;

    #[zbus(signal, name = "wallpaperChanged")]
    fn wallpaper_changed(&self, path: String);

    #[zbus(signal, name = "darkModeDimsWallpaerChanged")]
    fn dark_mode_dims_wallpaper_changed(&self);
}
