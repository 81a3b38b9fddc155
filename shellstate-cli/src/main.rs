mod config;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::watch;

use shellstate::{
    ConnectionType, DisplayState, KScreenBackend, NetworkControl, NetworkIndicator,
    NetworkManager, Networking, NetworkingState, Screen, ShellOptions, Wallpaper, WallpaperEvent,
    filter_networks, network_items,
};

#[derive(Parser, Debug)]
#[command(name = "shellstate", version)]
#[command(about = "Desktop shell network, display and wallpaper state")]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file, defaults to $XDG_CONFIG_HOME/shellstate/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Switch {
    fn enabled(self) -> bool {
        matches!(self, Switch::On)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Technology {
    Adsl,
    Bluetooth,
    Cdma,
    Gsm,
    OlpcMesh,
    Pppoe,
    Vpn,
    Wimax,
    Wired,
    Wireless,
}

impl From<Technology> for ConnectionType {
    fn from(value: Technology) -> Self {
        match value {
            Technology::Adsl => ConnectionType::Adsl,
            Technology::Bluetooth => ConnectionType::Bluetooth,
            Technology::Cdma => ConnectionType::Cdma,
            Technology::Gsm => ConnectionType::Gsm,
            Technology::OlpcMesh => ConnectionType::OLPCMesh,
            Technology::Pppoe => ConnectionType::Pppoe,
            Technology::Vpn => ConnectionType::Vpn,
            Technology::Wimax => ConnectionType::Wimax,
            Technology::Wired => ConnectionType::Wired,
            Technology::Wireless => ConnectionType::Wireless,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the indicator and panel state
    Status,
    /// Print state changes until interrupted
    Monitor,
    /// List connections and visible networks
    Networks {
        /// Only list this technology
        #[arg(long)]
        technology: Option<Technology>,
        /// Include networks that are not connected
        #[arg(long)]
        all: bool,
        /// Case-insensitive name filter
        #[arg(long, default_value = "")]
        filter: String,
    },
    /// Turn networking on or off
    Networking { state: Switch },
    /// Turn the wireless radio on or off
    Wifi { state: Switch },
    /// Turn the mobile broadband radio on or off
    Mobile { state: Switch },
    /// Turn airplane mode on or off
    Airplane { state: Switch },
    /// Activate a saved connection profile
    Activate {
        /// Settings object path of the profile
        connection: String,
        #[arg(long)]
        device: Option<String>,
        /// Access point or other specific object path
        #[arg(long)]
        specific_object: Option<String>,
    },
    /// Deactivate a profile on a device
    Deactivate { connection: String, device: String },
    /// Delete a saved profile and the profiles enslaved to it
    Remove { connection: String },
    /// Create a profile for a visible access point and connect
    Join {
        device: String,
        access_point: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Show the display configuration
    Screens {
        /// Keep printing the configuration as it changes
        #[arg(long)]
        watch: bool,
    },
    /// Show the wallpaper settings
    Wallpaper {
        /// Keep printing wallpaper changes
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Serialize)]
struct Status<'a> {
    indicator: &'a DisplayState,
    networking: &'a NetworkingState,
}

#[derive(Serialize)]
struct WallpaperStatus {
    available: bool,
    path: String,
    dims_wallpaper: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Sends the shutdown signal on Ctrl-C.
fn shutdown_on_ctrl_c() -> watch::Receiver<()> {
    let (tx, rx) = watch::channel(());
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Failed to listen for Ctrl-C: {e}");
        }
        let _ = tx.send(());
    });
    rx
}

fn print_status(
    json: bool,
    indicator: &DisplayState,
    networking: &NetworkingState,
) -> anyhow::Result<()> {
    if json {
        return print_json(&Status {
            indicator,
            networking,
        });
    }

    println!("Status:       {}", networking.network_status);
    println!(
        "Wireless:     {}{}",
        if indicator.connection_name.is_empty() {
            "-"
        } else {
            indicator.connection_name.as_str()
        },
        if indicator.icon_name.is_empty() {
            String::new()
        } else {
            format!(" ({})", indicator.icon_name)
        }
    );
    println!(
        "Radios:       networking={} wifi={} mobile={} airplane={}",
        networking.enabled,
        networking.wireless_enabled,
        networking.mobile_enabled,
        networking.airplane_mode
    );
    if !networking.active_connections.is_empty() {
        println!("Connections:");
        for line in networking.active_connections.lines() {
            println!("  {line}");
        }
    }
    Ok(())
}

async fn status(nm: &NetworkManager, options: &ShellOptions, json: bool) -> anyhow::Result<()> {
    let snapshot = nm.snapshot().await.context("failed to read NetworkManager state")?;
    let indicator = DisplayState::derive(&snapshot);
    let networking = NetworkingState::derive(&snapshot, options);
    print_status(json, &indicator, &networking)
}

async fn networks(
    nm: &NetworkManager,
    technology: Option<Technology>,
    all: bool,
    filter: &str,
    json: bool,
) -> anyhow::Result<()> {
    let snapshot = nm.snapshot().await.context("failed to read NetworkManager state")?;
    let items = network_items(&snapshot);
    let shown = filter_networks(&items, technology.map(ConnectionType::from), all, filter);

    if json {
        return print_json(&shown);
    }
    for item in shown {
        let strength = if item.strength > 0 {
            format!("{:>3}%", item.strength)
        } else {
            String::new()
        };
        println!(
            "{:<24} {:<14} {:<12} {strength}",
            item.name,
            format!("{:?}", item.connection_type),
            item.state.to_string()
        );
    }
    Ok(())
}

async fn monitor(nm: NetworkManager, options: ShellOptions, json: bool) -> anyhow::Result<()> {
    let indicator = NetworkIndicator::new(nm.clone());
    let networking = Networking::new(nm.clone(), options);
    indicator.load().await?;
    networking.load().await?;
    print_status(json, &indicator.display_state(), &networking.state())?;

    let shutdown = shutdown_on_ctrl_c();
    nm.monitor(shutdown, |event, snapshot| {
        log::debug!("{event:?}");
        let shown = indicator.handle(&event, snapshot);
        let panel = networking.handle(&event, snapshot);
        if shown || panel {
            if let Err(e) = print_status(json, &indicator.display_state(), &networking.state()) {
                log::warn!("Failed to print status: {e}");
            }
        }
    })
    .await
    .context("network monitoring failed")
}

async fn screens(options: &ShellOptions, json: bool, watch: bool) -> anyhow::Result<()> {
    let backend = KScreenBackend::new(options.kscreen.clone()).await?;
    let screen = Screen::new(backend);
    screen.load().await;

    let print = |screen: &Screen<KScreenBackend>| -> anyhow::Result<()> {
        let Some(config) = screen.config() else {
            println!("No display configuration available");
            return Ok(());
        };
        if json {
            return print_json(&config);
        }
        println!("Auto rotation: {}", config.auto_rotation_supported());
        for out in &config.outputs {
            let mode = match (out.size, out.refresh_rate) {
                (Some(size), Some(rate)) => format!("{}x{}@{rate:.0}", size.width, size.height),
                (Some(size), None) => format!("{}x{}", size.width, size.height),
                _ => "-".to_string(),
            };
            println!(
                "{:>3} {:<10} {:<8} {mode:<14} pos {},{} scale {} {:?}{}",
                out.id,
                out.name,
                if out.connected { "connected" } else { "off" },
                out.position.x,
                out.position.y,
                out.scale,
                out.rotation,
                if out.primary { " primary" } else { "" }
            );
        }
        Ok(())
    };

    print(&screen)?;
    if !watch {
        return Ok(());
    }

    let mut changes = screen.subscribe();
    let shutdown = shutdown_on_ctrl_c();
    let monitor = screen.monitor(shutdown);
    tokio::pin!(monitor);

    loop {
        tokio::select! {
            result = &mut monitor => return result.context("display monitoring failed"),
            Ok(()) = changes.changed() => {
                if changes.borrow_and_update().is_some() {
                    print(&screen)?;
                }
            }
        }
    }
}

async fn wallpaper(options: &ShellOptions, json: bool, watch: bool) -> anyhow::Result<()> {
    let wallpaper = Wallpaper::new(options.wallpaper.clone()).await?;
    let status = WallpaperStatus {
        available: wallpaper.is_available().await,
        path: wallpaper.path().await,
        dims_wallpaper: wallpaper.dims_wallpaper().await,
    };

    if json {
        print_json(&status)?;
    } else {
        println!("Available:  {}", status.available);
        println!("Path:       {}", status.path);
        println!("Dims:       {}", status.dims_wallpaper);
    }

    if !watch {
        return Ok(());
    }

    wallpaper
        .monitor(shutdown_on_ctrl_c(), |event| match event {
            WallpaperEvent::PathChanged(path) => println!("Path:       {path}"),
            WallpaperEvent::DimsWallpaperChanged(dims) => println!("Dims:       {dims}"),
        })
        .await
        .context("wallpaper monitoring failed")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let options = config::load_options(args.config.as_deref())?;

    match args.command {
        Command::Screens { watch } => return screens(&options, args.json, watch).await,
        Command::Wallpaper { watch } => return wallpaper(&options, args.json, watch).await,
        _ => {}
    }

    let nm = NetworkManager::new()
        .await
        .context("failed to connect to the system bus")?;

    match args.command {
        Command::Status => status(&nm, &options, args.json).await,
        Command::Monitor => monitor(nm, options, args.json).await,
        Command::Networks {
            technology,
            all,
            filter,
        } => networks(&nm, technology, all, &filter, args.json).await,
        Command::Networking { state } => Ok(nm
            .set_networking_enabled(state.enabled())
            .await
            .context("failed to switch networking")?),
        Command::Wifi { state } => Ok(nm
            .set_wireless_enabled(state.enabled())
            .await
            .context("failed to switch wireless")?),
        Command::Mobile { state } => Ok(nm
            .set_wwan_enabled(state.enabled())
            .await
            .context("failed to switch mobile broadband")?),
        Command::Airplane { state } => {
            let networking = Networking::new(nm, options);
            networking.load().await?;
            networking.set_airplane_mode_enabled(state.enabled()).await;
            Ok(())
        }
        Command::Activate {
            connection,
            device,
            specific_object,
        } => {
            let active = nm
                .activate_connection(&connection, device.as_deref(), specific_object.as_deref())
                .await
                .with_context(|| format!("failed to activate {connection}"))?;
            println!("{active}");
            Ok(())
        }
        Command::Deactivate { connection, device } => Ok(nm
            .deactivate_connection(&connection, &device)
            .await
            .with_context(|| format!("failed to deactivate {connection}"))?),
        Command::Remove { connection } => Ok(nm
            .remove_connection(&connection)
            .await
            .with_context(|| format!("failed to remove {connection}"))?),
        Command::Join {
            device,
            access_point,
            password,
        } => {
            let active = nm
                .add_and_activate_connection(&device, &access_point, &password)
                .await
                .with_context(|| format!("failed to join {access_point}"))?;
            println!("{active}");
            Ok(())
        }
        Command::Screens { .. } | Command::Wallpaper { .. } => Ok(()),
    }
}
