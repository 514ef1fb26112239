//! Config command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::output::{print_error, print_info, print_success};
use hs_core::config::{self, SsoConfig};

fn resolve_path(config_path: Option<&PathBuf>) -> PathBuf {
    config_path
        .cloned()
        .unwrap_or_else(config::default_config_path)
}

/// Print the effective configuration with secrets masked
pub fn config_show(config_path: Option<&PathBuf>, current: &SsoConfig) -> Result<()> {
    let path = resolve_path(config_path);
    if path.exists() {
        print_info(&format!("Config file: {}", path.display()));
    } else {
        print_info(&format!(
            "No config file at {} - showing defaults",
            path.display()
        ));
    }

    let mut shown = current.clone();
    shown.remote = current.remote.redacted();
    println!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}

/// Write a default configuration file
pub fn config_init(config_path: Option<&PathBuf>, force: bool) -> Result<()> {
    let path = resolve_path(config_path);

    if path.exists() && !force {
        print_error(&format!("Config file already exists: {}", path.display()));
        print_info("Use --force to overwrite");
        return Ok(());
    }

    write_default(&path)?;
    print_success(&format!("Created config file: {}", path.display()));
    Ok(())
}

fn write_default(path: &Path) -> Result<()> {
    config::save_config(path, &SsoConfig::default())
        .with_context(|| format!("Failed to write config to {}", path.display()))
}

/// Print the config file path
pub fn config_path(config_path: Option<&PathBuf>) -> Result<()> {
    println!("{}", resolve_path(config_path).display());
    Ok(())
}
