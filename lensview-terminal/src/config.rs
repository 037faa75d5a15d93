/// Viewer settings, loaded from an optional JSON file
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lensview_core::{Variant, DEFAULT_QUIESCENCE};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Projection model (`a`, `b`, `c` or the long names).
    #[serde(deserialize_with = "variant_from_name")]
    pub variant: Variant,
    /// Quiet period before parameter edits are applied.
    pub debounce_ms: u64,
    /// Slider steps across a control's full range.
    pub slider_divisions: u32,
    /// Empty cells kept around the plotted points.
    pub canvas_margin: u16,
    /// Point file loaded at startup.
    pub points: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Perspective,
            debounce_ms: DEFAULT_QUIESCENCE.as_millis() as u64,
            slider_divisions: 100,
            canvas_margin: 2,
            points: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data = fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn variant_from_name<'de, D>(deserializer: D) -> Result<Variant, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(serde::de::Error::custom)
}
