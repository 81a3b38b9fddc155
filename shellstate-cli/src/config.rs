use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

use shellstate::ShellOptions;

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push("shellstate");
        path.push("config.toml");
        path
    })
}

/// Loads options from `path`, or from the user config directory.
///
/// A missing default file yields the defaults; a missing explicit file is an
/// error.
pub fn load_options(path: Option<&Path>) -> anyhow::Result<ShellOptions> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return Ok(ShellOptions::default()),
        },
    };

    if !explicit && !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(ShellOptions::default());
    }

    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_options(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn parse_options(text: &str) -> anyhow::Result<ShellOptions> {
    Ok(toml::from_str(text)?)
}
