//! Serializable operator and render configuration.
//!
//! A configuration file looks like:
//!
//! ```toml
//! bbox = "A"
//!
//! [render]
//! parallel = true
//! max_threads = 4
//! ```
//!
//! Every field is optional and falls back to its default.

use crate::core::error::ConfigResult;
use crate::execution::engine::RenderOptions;
use crate::filters::bbox::BBoxPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the region renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Render rows on multiple threads.
    pub parallel: bool,
    /// Size of a dedicated thread pool (0 = use the global pool).
    pub max_threads: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            parallel: true,
            max_threads: 0,
        }
    }
}

/// Full MergeMedian configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeMedianConfig {
    /// Bounding-box policy ("union", "A" or "B").
    pub bbox: BBoxPolicy,
    /// Region renderer settings.
    pub render: RenderSettings,
}

impl MergeMedianConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration file. `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Renderer options described by this configuration.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new()
            .with_parallel(self.render.parallel)
            .with_max_threads(self.render.max_threads)
    }
}
