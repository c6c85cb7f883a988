//! Standard locations for mipwave configuration files

use std::path::PathBuf;

/// Get the default config directory
///
/// Returns: `<platform config dir>/mipwave` (e.g. `~/.config/mipwave` on Linux)
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mipwave")
}

/// Get the default path for a config file
///
/// # Arguments
/// * `filename` - Config file name (e.g., "render.yaml")
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_ends_with_mipwave() {
        assert!(default_config_dir().ends_with("mipwave"));
    }

    #[test]
    fn test_config_path_includes_filename() {
        assert!(default_config_path("render.yaml").ends_with("mipwave/render.yaml"));
    }
}
