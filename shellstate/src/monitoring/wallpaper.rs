//! Wallpaper change monitoring.

use futures::stream::{self, Stream, StreamExt};
use log::{debug, warn};
use std::pin::Pin;
use tokio::sync::watch;

use crate::Result;
use crate::api::models::{Error, WallpaperEvent};
use crate::api::wallpaper::Wallpaper;
use crate::dbus::ThemeProxy;

enum Change {
    Path(String),
    Dims,
}

type ChangeStream = Pin<Box<dyn Stream<Item = Change>>>;

/// Merges the daemon's change signals into one stream.
async fn change_stream(proxy: &ThemeProxy<'_>) -> Result<ChangeStream> {
    let path_changes = proxy.receive_wallpaper_changed().await?.filter_map(|signal| async move {
        match signal.args() {
            Ok(args) => Some(Change::Path(args.path().clone())),
            Err(e) => {
                warn!("Malformed wallpaperChanged signal: {e}");
                None
            }
        }
    });
    let dims_changes = proxy
        .receive_dark_mode_dims_wallpaper_changed()
        .await?
        .map(|_| Change::Dims);

    let streams: Vec<ChangeStream> = vec![Box::pin(path_changes), Box::pin(dims_changes)];
    Ok(Box::pin(stream::select_all(streams)))
}

pub(crate) async fn monitor_wallpaper<F>(
    wallpaper: &Wallpaper,
    mut shutdown: watch::Receiver<()>,
    mut callback: F,
) -> Result<()>
where
    F: FnMut(WallpaperEvent),
{
    let proxy = wallpaper.proxy().await?;
    let mut merged = change_stream(&proxy).await?;
    debug!("Subscribed to wallpaper changes");

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                debug!("Wallpaper monitoring stopped");
                return Ok(());
            }
            change = merged.next() => match change {
                Some(Change::Path(path)) => callback(WallpaperEvent::PathChanged(path)),
                Some(Change::Dims) => match wallpaper.read_dims().await {
                    Ok(dims) => callback(WallpaperEvent::DimsWallpaperChanged(dims)),
                    Err(e) => warn!("Failed to read wallpaper dimming after change: {e}"),
                },
                None => {
                    warn!("Wallpaper signal streams ended unexpectedly");
                    return Err(Error::MonitorEnded("wallpaper streams ended".into()));
                }
            }
        }
    }
}
