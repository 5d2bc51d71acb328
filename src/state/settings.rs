use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GrapherError, Result};
use crate::state::palette::{Palette, Rgb};

/// User configuration, read from a JSON file. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial inner size of the main window.
    pub window_size: [f32; 2],
    /// Quiet time after the last resize before the chart is redrawn.
    pub resize_debounce_ms: u64,
    pub csv_file_name: String,
    pub snapshot_file_name: String,
    /// Fill behind transparent parts of a snapshot.
    pub snapshot_background: Rgb,
    pub canvas_background: Rgb,
    pub palette: Palette,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_size: [1100.0, 750.0],
            resize_debounce_ms: 200,
            csv_file_name: "voidata.csv".to_string(),
            snapshot_file_name: "snapshot.png".to_string(),
            snapshot_background: Rgb::new(0x55, 0x55, 0x55),
            canvas_background: Rgb::new(0x22, 0x22, 0x22),
            palette: Palette::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text)?;
        settings.validate()?;
        tracing::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, name) in [
            ("csv_file_name", &self.csv_file_name),
            ("snapshot_file_name", &self.snapshot_file_name),
        ] {
            if name.trim().is_empty() {
                return Err(GrapherError::Config(format!("{field} must not be empty")));
            }
        }
        if self.window_size.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(GrapherError::Config(format!(
                "window_size must be positive, got {:?}",
                self.window_size
            )));
        }
        Ok(())
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}
