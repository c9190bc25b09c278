use crate::error::{PatternError, Result};
use crate::mutate::UpdatePolicy;
use serde::{Deserialize, Serialize};

pub const MIN_CELL_SIZE: u32 = 4;
pub const MAX_UPDATE_SPEED: f32 = 60.0;

/// Parameters the control panel edits between frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternConfig {
    pub cell_size: u32,
    pub probability_horizontal: f64,
    pub probability_vertical: f64,
    pub update_policy: UpdatePolicy,
    /// Updates per second. Zero pauses the pattern.
    pub update_speed: f32,
    pub colored: bool,
    /// Pixels reserved on the right edge of the viewport for controls.
    pub panel_width: u32,
    pub seed: Option<u64>,
    pub colors: PatternColors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternColors {
    pub background: String,
    pub stitch: String,
    pub island_a: String,
    pub island_b: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            cell_size: 40,
            probability_horizontal: 0.5,
            probability_vertical: 0.5,
            update_policy: UpdatePolicy::Regenerate,
            update_speed: 10.0,
            colored: false,
            panel_width: 250,
            seed: None,
            colors: PatternColors::default(),
        }
    }
}

impl Default for PatternColors {
    fn default() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            stitch: "#000000".to_string(),
            island_a: "#E34948".to_string(),
            island_b: "#F0EBD5".to_string(),
        }
    }
}

impl PatternConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config = serde_json::from_str::<PatternConfig>(raw)?;
        Ok(config.sanitized())
    }

    /// Clamp every field into the range the core accepts.
    pub fn sanitized(mut self) -> Self {
        self.cell_size = self.cell_size.max(MIN_CELL_SIZE);
        self.probability_horizontal = clamp_probability(self.probability_horizontal);
        self.probability_vertical = clamp_probability(self.probability_vertical);
        self.update_speed = if self.update_speed.is_finite() {
            self.update_speed.clamp(0.0, MAX_UPDATE_SPEED)
        } else {
            0.0
        };
        self
    }

    /// Grid size that fits the viewport left of the control panel.
    pub fn grid_dimensions(
        &self,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Result<(usize, usize)> {
        let cell = self.cell_size.max(MIN_CELL_SIZE);
        let usable_width = viewport_width.saturating_sub(self.panel_width);
        let width = (usable_width / cell) as usize;
        let height = (viewport_height / cell) as usize;
        if width == 0 || height == 0 {
            return Err(PatternError::InvalidDimensions { width, height });
        }
        Ok((width, height))
    }
}

fn clamp_probability(value: f64) -> f64 {
    if value.is_nan() {
        0.5
    } else {
        value.clamp(0.0, 1.0)
    }
}
