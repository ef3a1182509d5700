use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Where compressed output goes relative to the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Write `<file>.zst` next to the source (or into `output_dir`); keep the source.
    #[default]
    Separate,
    /// Write `<file>.zst` and delete the source once the output is in place.
    Replace,
}

/// Global configuration loaded from `~/.config/shrink/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShrinkConfig {
    /// Number of concurrent compression workers.
    pub workers: usize,
    /// zstd compression level (clamped to the codec's supported range).
    pub level: i32,
    /// Output placement policy.
    #[serde(default)]
    pub output_mode: OutputMode,
    /// Optional directory for compressed output in `separate` mode (None = next to source).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// File extensions (without dot, case-insensitive) picked up by the scanner.
    /// Empty = every file.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Descend into subdirectories when scanning.
    #[serde(default)]
    pub recursive: bool,
}

impl Default for ShrinkConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            level: 3,
            output_mode: OutputMode::Separate,
            output_dir: None,
            extensions: Vec::new(),
            recursive: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("shrink")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ShrinkConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ShrinkConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ShrinkConfig = toml::from_str(&data)?;
    Ok(cfg)
}
