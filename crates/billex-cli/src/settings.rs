//! Configuration lookup.

use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;

use billex_core::BillexConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "BILLEX_CONFIG";

/// Load `$BILLEX_CONFIG`, else the per-user config file, else defaults.
///
/// An explicitly named file must exist; the per-user file is optional.
pub fn load_config() -> anyhow::Result<BillexConfig> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
        debug!("Loading config from {} ({})", path.display(), CONFIG_ENV);
        return BillexConfig::from_file(&path)
            .with_context(|| format!("failed to read config file {}", path.display()));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            debug!("Loading config from {}", path.display());
            BillexConfig::from_file(&path)
                .with_context(|| format!("failed to read config file {}", path.display()))
        }
        _ => Ok(BillexConfig::default()),
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("billex").join("config.json"))
}
