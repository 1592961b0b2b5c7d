use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::{CloudError, Dimensions, Result, Seed};
use crate::fbm::FractalAccumulator;

/// Everything one synthesis run depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudParams {
    pub width: u32,
    pub height: u32,
    /// Bigger means larger cloud masses.
    pub base_scale: f64,
    /// More octaves add finer edge detail.
    pub octaves: u32,
    pub lacunarity: f64,
    pub gain: f64,
    /// Exponent applied before thresholding; above 1 tightens bright cores.
    pub bias_power: f32,
    /// Higher means fewer white clouds.
    pub threshold: f32,
    /// Clouds black on white.
    pub invert: bool,
    pub tileable: bool,
    /// Border width in pixels over which clouds fade to black.
    pub padding: u32,
    /// Blur sigma before thresholding, for rounder shapes.
    pub smooth_radius: f32,
    /// Blur sigma after thresholding, for soft edges.
    pub feather_radius: f32,
    pub seed: u64,
    pub output_path: PathBuf,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            base_scale: 220.0,
            octaves: 5,
            lacunarity: 2.0,
            gain: 0.5,
            bias_power: 1.0,
            threshold: 0.55,
            invert: false,
            tileable: false,
            padding: 0,
            smooth_radius: 3.0,
            feather_radius: 5.0,
            seed: 7,
            output_path: PathBuf::from("clouds_bw.png"),
        }
    }
}

impl CloudParams {
    /// Checks every precondition before any computation starts.
    pub fn validate(&self) -> Result<()> {
        self.dimensions()?;
        self.fractal().validate()?;
        if !self.bias_power.is_finite() {
            return Err(CloudError::invalid("bias_power", "must be finite"));
        }
        if self.threshold.is_nan() {
            return Err(CloudError::invalid("threshold", "must be a number"));
        }
        Ok(())
    }

    pub fn dimensions(&self) -> Result<Dimensions> {
        Dimensions::new(self.width, self.height)
    }

    pub fn seed(&self) -> Seed {
        Seed(self.seed)
    }

    pub fn fractal(&self) -> FractalAccumulator {
        FractalAccumulator {
            base_scale: self.base_scale,
            octaves: self.octaves,
            lacunarity: self.lacunarity,
            gain: self.gain,
            tileable: self.tileable,
        }
    }

    pub fn from_ron_str(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Loads a `.ron` or `.json` file; missing fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::from_ron_str(&text),
            Some("json") => Self::from_json_str(&text),
            other => Err(CloudError::UnsupportedFormat(other.unwrap_or("").to_string())),
        }
    }

    pub fn to_ron_string(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}
