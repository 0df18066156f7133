use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters used to procedurally generate a farm map.
/// Stored with the generated map for reproducibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_cols")]
    pub cols: u32,
    /// Share of open ground that starts tilled.
    #[serde(default = "default_soil_ratio")]
    pub soil_ratio: f32,
    /// Noise threshold above which ponds form; 1.0 disables water.
    #[serde(default = "default_water_level")]
    pub water_level: f32,
    #[serde(default = "default_stone_density")]
    pub stone_density: f32,
    #[serde(default = "default_fence_border")]
    pub fence_border: bool,
}

fn default_rows() -> u32 {
    12
}
fn default_cols() -> u32 {
    16
}
fn default_soil_ratio() -> f32 {
    0.15
}
fn default_water_level() -> f32 {
    0.45
}
fn default_stone_density() -> f32 {
    0.03
}
fn default_fence_border() -> bool {
    true
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationParams {
            seed: 0,
            rows: default_rows(),
            cols: default_cols(),
            soil_ratio: default_soil_ratio(),
            water_level: default_water_level(),
            stone_density: default_stone_density(),
            fence_border: default_fence_border(),
        }
    }
}

impl GenerationParams {
    /// Load generation parameters from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        let params: Self = toml::from_str(&content)
            .map_err(|e| format!("Invalid TOML in {}: {}", path.display(), e))?;
        params.validate()?;
        Ok(params)
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !(3..=128).contains(&self.rows) {
            return Err(format!("rows must be 3-128, got {}", self.rows));
        }
        if !(3..=128).contains(&self.cols) {
            return Err(format!("cols must be 3-128, got {}", self.cols));
        }
        if !(0.0..=1.0).contains(&self.soil_ratio) {
            return Err(format!(
                "soil_ratio must be 0.0-1.0, got {}",
                self.soil_ratio
            ));
        }
        if !(0.0..=1.0).contains(&self.water_level) {
            return Err(format!(
                "water_level must be 0.0-1.0, got {}",
                self.water_level
            ));
        }
        if !(0.0..=1.0).contains(&self.stone_density) {
            return Err(format!(
                "stone_density must be 0.0-1.0, got {}",
                self.stone_density
            ));
        }
        Ok(())
    }
}
