//! Configuration loading and discovery for `snowglobe.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::SnowglobeConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery
pub const CONFIG_FILE: &str = "snowglobe.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse snowglobe.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the starting effect
    pub effect: Option<String>,
    /// Override the number of frames
    pub frames: Option<u32>,
    /// Override the per-frame display time
    pub frame_ms: Option<u32>,
    /// Override canvas width
    pub width: Option<u32>,
    /// Override canvas height
    pub height: Option<u32>,
    /// Override the random seed
    pub seed: Option<u64>,
    /// Override the background color
    pub background: Option<String>,
}

/// Find snowglobe.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for snowglobe.toml
/// 2. Check XDG_CONFIG_HOME/snowglobe/snowglobe.toml (or ~/.config/snowglobe/snowglobe.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find snowglobe.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("snowglobe").join(CONFIG_FILE);
    config_path.exists().then_some(config_path)
}

/// Find snowglobe.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise, uses [`find_config`]
/// to locate the config file. If no config file is found, returns
/// [`default_config`].
///
/// ```ignore
/// let config = load_config(Some(Path::new("renders/snowglobe.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<SnowglobeConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(default_config()),
    }
}

fn load_config_file(path: &Path) -> Result<SnowglobeConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate configuration text.
pub fn parse_config(contents: &str) -> Result<SnowglobeConfig, ConfigError> {
    let config: SnowglobeConfig = toml::from_str(contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}

/// Configuration used when no snowglobe.toml is found.
pub fn default_config() -> SnowglobeConfig {
    SnowglobeConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The result is
/// re-validated since overrides can introduce problems of their own.
pub fn merge_cli_overrides(
    config: &mut SnowglobeConfig,
    overrides: &CliOverrides,
) -> Result<(), ConfigError> {
    if let Some(ref effect) = overrides.effect {
        config.animation.effect = effect.clone();
    }
    if let Some(frames) = overrides.frames {
        config.animation.frames = frames;
    }
    if let Some(frame_ms) = overrides.frame_ms {
        config.animation.frame_ms = frame_ms;
    }
    if let Some(width) = overrides.width {
        config.canvas.width = width;
    }
    if let Some(height) = overrides.height {
        config.canvas.height = height;
    }
    if let Some(seed) = overrides.seed {
        config.animation.seed = Some(seed);
    }
    if let Some(ref background) = overrides.background {
        config.canvas.background = background.clone();
    }

    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors))
    }
}
