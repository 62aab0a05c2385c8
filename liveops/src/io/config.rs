//! Operator configuration stored in `liveops.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "liveops.toml";

/// Storage key the document has always been saved under.
pub const DEFAULT_STORAGE_KEY: &str = "drjackson_podcast_live_ops_v1";

/// Live-ops configuration (TOML).
///
/// Meant to be edited by hand. Missing fields fall back to defaults; relative
/// directories resolve against the directory holding the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LiveOpsConfig {
    /// Key the document is persisted under.
    pub storage_key: String,

    /// Directory backing the key-value storage.
    pub data_dir: PathBuf,

    /// Directory export files are saved into.
    pub export_dir: PathBuf,
}

impl Default for LiveOpsConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: PathBuf::from(".liveops"),
            export_dir: PathBuf::from("exports"),
        }
    }
}

impl LiveOpsConfig {
    pub fn validate(&self) -> Result<()> {
        let key = self.storage_key.trim();
        if key.is_empty() {
            return Err(anyhow!("storage_key must be non-empty"));
        }
        if key != self.storage_key {
            return Err(anyhow!("storage_key must not have surrounding whitespace"));
        }
        if key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(anyhow!("storage_key must not contain path separators"));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(anyhow!("data_dir must be non-empty"));
        }
        if self.export_dir.as_os_str().is_empty() {
            return Err(anyhow!("export_dir must be non-empty"));
        }
        Ok(())
    }

    /// Resolve relative directories against `base`.
    pub fn resolved(mut self, base: &Path) -> Self {
        if self.data_dir.is_relative() {
            self.data_dir = base.join(&self.data_dir);
        }
        if self.export_dir.is_relative() {
            self.export_dir = base.join(&self.export_dir);
        }
        self
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `LiveOpsConfig::default()`. Directories in
/// the result are resolved against the file's parent directory.
pub fn load_config(path: &Path) -> Result<LiveOpsConfig> {
    let base = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = LiveOpsConfig::default();
        cfg.validate()?;
        return Ok(cfg.resolved(base));
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LiveOpsConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg.resolved(base))
}

/// Write config to disk as pretty TOML.
pub fn write_config(path: &Path, cfg: &LiveOpsConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(cfg.data_dir, temp.path().join(".liveops"));
        assert_eq!(cfg.export_dir, temp.path().join("exports"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "export_dir = \"/srv/exports\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.export_dir, PathBuf::from("/srv/exports"));
        assert_eq!(cfg.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILENAME);
        let cfg = LiveOpsConfig {
            storage_key: "show_two".to_string(),
            ..LiveOpsConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg.resolved(temp.path()));
    }

    #[test]
    fn rejects_path_like_storage_keys() {
        let cfg = LiveOpsConfig {
            storage_key: "../escape".to_string(),
            ..LiveOpsConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
