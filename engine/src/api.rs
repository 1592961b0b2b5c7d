use image::GrayImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CloudError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse RON config: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("failed to serialize config: {0}")]
    RonSerialize(#[from] ron::Error),
    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format `{0}` (expected .ron or .json)")]
    UnsupportedFormat(String),
}

impl CloudError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        CloudError::InvalidParameter { name, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

/// Continuous scalar field, indexed `[y, x]`.
pub type NoiseField = Array2<f32>;

/// Final single-channel 8-bit raster.
pub type MaskImage = GrayImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(pub u64);

impl Seed {
    /// Seed of the `index`-th octave derived from this base seed.
    pub fn octave(self, index: u32) -> Seed {
        Seed(self.0.wrapping_add(OCTAVE_SEED_STRIDE.wrapping_mul(index as u64)))
    }
}

pub const OCTAVE_SEED_STRIDE: u64 = 1013;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 {
            return Err(CloudError::invalid("width", "must be > 0"));
        }
        if height == 0 {
            return Err(CloudError::invalid("height", "must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// `(rows, cols)` as used by `ndarray`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height as usize, self.width as usize)
    }
}

/// Something that turns its configuration into a finished mask.
pub trait MaskEngine: Send + Sync {
    fn validate(&self) -> Result<()>;
    fn render(&self) -> Result<MaskImage>;
}
