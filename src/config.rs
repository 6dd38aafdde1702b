use serde::{Deserialize, Serialize};
use std::fs;

/// Where the script is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// A visitor's published page. Action targets start hidden.
    #[default]
    Live,
    /// The authoring/preview surface. Targets are tagged but stay visible.
    Preview,
}

/// Tunables for the field resolver's fuzzy strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Minimum shared-token ratio, relative to the shorter token set.
    pub token_overlap_ratio: f64,
    /// Similarities strictly above this accept a fuzzy match.
    pub fuzzy_threshold: f64,
    /// A wrapper counts as "small" when it holds at most this many controls.
    pub wrapper_max_controls: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            token_overlap_ratio: 0.5,
            fuzzy_threshold: 0.7,
            wrapper_max_controls: 3,
        }
    }
}

/// Engine-wide settings, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub surface: Surface,
    /// How many ancestor levels show/hide may touch.
    pub ancestor_depth: usize,
    /// Delay the host should wait before calling the late re-hide pass.
    pub rehide_delay_ms: u64,
    /// Attribute used to tag action targets in preview.
    pub target_marker_attribute: String,
    pub resolver: ResolverConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            surface: Surface::Live,
            ancestor_depth: 3,
            rehide_delay_ms: 500,
            target_marker_attribute: "data-logic-target".to_string(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn preview() -> Self {
        Self {
            surface: Surface::Preview,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}
