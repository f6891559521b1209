use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default siteup data directory: ~/.siteup
pub fn get_siteup_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".siteup"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    Ok(toml::from_str::<AppConfig>(&s)?)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.siteup/config.toml (highest)
    let siteup_config = get_siteup_data_dir()?.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if siteup_config.exists() {
        load_from_path(&siteup_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

/// Environment variable overrides (Priority 0: highest).
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("SITEUP_PLATFORM") {
        cfg.platform = v.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    }
    if let Some(v) = non_empty("SITEUP_NAMESPACE") {
        cfg.namespace = Some(v);
    }
    if let Some(v) = non_empty("SITEUP_RELEASE_VERSION") {
        cfg.release_version = Some(v);
    }
    Ok(())
}
