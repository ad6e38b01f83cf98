use anyhow::{Context, Result, bail};
use argvs::StoreOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "argvs.json";
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,

    /// Options applied to every store the tool builds.
    #[serde(default)]
    pub store: StoreOptions,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: Config,
}

/// Load `argvs.json`.
///
/// An explicit path must exist. Without one, `argvs.json` in the current
/// directory is used if present.
pub fn load_config(config_path: Option<&Path>) -> Result<Option<LoadedConfig>> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let (path, explicit) = match config_path {
        Some(p) => (resolve_against(&cwd, p), true),
        None => (cwd.join(DEFAULT_CONFIG_NAME), false),
    };

    if !path.exists() {
        if explicit {
            bail!("config not found: {}", path.display());
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: Config = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse config JSON: {}", path.display()))?;

    if let Some(version) = config.schema_version
        && version > CONFIG_SCHEMA_VERSION
    {
        bail!(
            "unsupported config schemaVersion {version} in {} (max {CONFIG_SCHEMA_VERSION})",
            path.display()
        );
    }

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(Some(LoadedConfig { path, config }))
}

/// Write a config holding the default options into `dir`.
///
/// An existing file is left alone unless `overwrite` is set.
pub fn write_default_config(dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = dir.join(DEFAULT_CONFIG_NAME);
    if dest.exists() && !overwrite {
        bail!("{} already exists (use --force to replace it)", dest.display());
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let config = Config {
        schema_version: Some(CONFIG_SCHEMA_VERSION),
        store: StoreOptions::default(),
    };
    let mut out = serde_json::to_string_pretty(&config).context("failed to serialize config")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
