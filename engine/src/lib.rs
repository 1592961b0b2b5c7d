//! Seeded fractal gradient noise cut into cloud-silhouette masks.
//!
//! Pipeline: [`lattice`] gradients feed [`perlin`] noise, [`fbm`] sums
//! octaves of it, and [`mask`] turns the sum into an 8-bit mask.

pub mod api;
pub mod fbm;
pub mod lattice;
pub mod mask;
pub mod params;
pub mod perlin;
pub mod sampling;

pub use api::{CloudError, Dimensions, MaskEngine, MaskImage, NoiseField, Result, Seed};
pub use fbm::FractalAccumulator;
pub use mask::MaskPostProcessor;
pub use params::CloudParams;
pub use sampling::{synthesize, CloudEngine};
