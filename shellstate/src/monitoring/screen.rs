//! Display configuration change monitoring.

use futures::StreamExt;
use log::{debug, warn};
use tokio::sync::watch;

use crate::Result;
use crate::api::models::Error;
use crate::api::screen::{KScreenBackend, Screen};

pub(crate) async fn monitor_screen(
    screen: &Screen<KScreenBackend>,
    backend: &KScreenBackend,
    mut shutdown: watch::Receiver<()>,
) -> Result<()> {
    let proxy = backend.proxy().await?;
    let mut changes = proxy.receive_config_changed().await?;
    debug!("Subscribed to display configuration changes");

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                debug!("Screen monitoring stopped");
                return Ok(());
            }
            signal = changes.next() => {
                if signal.is_none() {
                    warn!("Display configuration stream ended unexpectedly");
                    return Err(Error::MonitorEnded("configChanged stream ended".into()));
                }
                debug!("Display configuration changed");
                screen.load().await;
            }
        }
    }
}
