use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Leap second list shipped with tzdata on most Linux distributions.
pub const SYSTEM_LEAP_FILE: &str = "/usr/share/zoneinfo/leap-seconds.list";
pub const LEAP_FILE_NAME: &str = "leap-seconds.list";

fn home() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}

fn xdg_dir(var: &str, fallback: &str) -> Result<PathBuf> {
    let base = match std::env::var_os(var) {
        Some(dir) => PathBuf::from(dir),
        None => home()?.join(fallback),
    };
    Ok(base.join("marstime"))
}

/// Returns `$XDG_CONFIG_HOME/marstime` or `~/.config/marstime`.
pub fn config_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// Returns `$XDG_DATA_HOME/marstime` or `~/.local/share/marstime`, creating it.
pub fn data_dir() -> Result<PathBuf> {
    let dir = xdg_dir("XDG_DATA_HOME", ".local/share")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data dir: {}", dir.display()))?;
    Ok(dir)
}

/// Where to read the leap second table from, most specific first:
/// the command line, the config file, a downloaded copy, the system copy.
pub fn resolve_leap_file(cli: Option<PathBuf>, configured: Option<PathBuf>) -> PathBuf {
    let downloaded = xdg_dir("XDG_DATA_HOME", ".local/share")
        .ok()
        .map(|dir| dir.join(LEAP_FILE_NAME));
    pick_leap_file(cli.or(configured), downloaded, Path::new(SYSTEM_LEAP_FILE))
}

/// With neither copy on disk, the downloaded path is returned so the load
/// error points at where `marstime leap update` would write.
fn pick_leap_file(
    explicit: Option<PathBuf>,
    downloaded: Option<PathBuf>,
    system: &Path,
) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    match downloaded {
        Some(path) if path.exists() || !system.exists() => path,
        _ => system.to_path_buf(),
    }
}
