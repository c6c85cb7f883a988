//! YAML configuration I/O
//!
//! Config files are read leniently: a missing or unreadable file yields the
//! defaults, and values that parse but can't be used are repaired by the
//! type's [`ConfigFile::sanitize`] hook.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// A configuration type stored as a YAML file
pub trait ConfigFile: DeserializeOwned + Default {
    /// Replace unusable values with defaults, returning a note per fix
    fn sanitize(&mut self) -> Vec<String> {
        Vec::new()
    }
}

/// Load configuration from a YAML file
///
/// Missing file or invalid YAML fall back to `T::default()`. A config that
/// parses is passed through [`ConfigFile::sanitize`] before it is returned.
pub fn load_config<T: ConfigFile>(path: &Path) -> T {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No config at {:?}, using defaults", path);
            return T::default();
        }
        Err(e) => {
            log::warn!("Could not read config {:?}: {}, using defaults", path, e);
            return T::default();
        }
    };

    let mut config = match serde_yaml::from_str::<T>(&contents) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Could not parse config {:?}: {}, using defaults", path, e);
            return T::default();
        }
    };

    for fix in config.sanitize() {
        log::warn!("Config {:?}: {}", path, fix);
    }
    log::info!("Loaded config from {:?}", path);
    config
}

/// Save configuration to a YAML file, creating parent directories
pub fn save_config<T: Serialize>(config: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write config {:?}", path))?;

    log::info!("Saved config to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::types::Color;

    #[test]
    fn test_load_nonexistent_returns_default() {
        let config: RenderConfig = load_config(Path::new("/nonexistent/mipwave/render.yaml"));
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("render.yaml");

        let config = RenderConfig {
            sample_rate: 48000.0,
            color: Color::CYAN,
            max_frames_in_flight: 2,
        };

        save_config(&config, &path).unwrap();
        let loaded: RenderConfig = load_config(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_yaml_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.yaml");
        std::fs::write(&path, "sample_rate: [not, a, number").unwrap();

        let loaded: RenderConfig = load_config(&path);
        assert_eq!(loaded, RenderConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.yaml");
        std::fs::write(&path, "sample_rate: 96000.0\n").unwrap();

        let loaded: RenderConfig = load_config(&path);
        assert_eq!(loaded.sample_rate, 96000.0);
        assert_eq!(loaded.color, Color::BLUE);
        assert_eq!(loaded.max_frames_in_flight, 3);
    }

    #[test]
    fn test_unusable_values_are_repaired() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.yaml");
        std::fs::write(&path, "sample_rate: -8000.0\nmax_frames_in_flight: 0\n").unwrap();

        let loaded: RenderConfig = load_config(&path);
        assert_eq!(loaded.sample_rate, 44100.0);
        assert_eq!(loaded.max_frames_in_flight, 1);
    }
}
