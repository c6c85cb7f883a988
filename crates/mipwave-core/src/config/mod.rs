//! Configuration for mipwave renderers
//!
//! - Generic YAML config loading/saving
//! - Default config file location
//! - Render configuration (sample rate, color, frame pacing)
//!
//! # Usage
//!
//! ```ignore
//! use mipwave_core::config::{default_config_path, load_config, RenderConfig};
//!
//! let config: RenderConfig = load_config(&default_config_path("render.yaml"));
//! let constants = config.constants();
//! ```

mod io;
mod paths;
mod render;

pub use io::{load_config, save_config, ConfigFile};
pub use paths::{default_config_dir, default_config_path};
pub use render::RenderConfig;
