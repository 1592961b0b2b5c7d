//! Fractal Brownian motion: weighted sum of gradient-noise octaves.

use log::debug;
use ndarray::Array2;
use rayon::prelude::*;

use crate::api::{CloudError, Dimensions, NoiseField, Result, Seed};
use crate::perlin;

/// Added to the amplitude sum before renormalizing.
const AMPLITUDE_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Octave {
    pub index: u32,
    pub scale: f64,
    pub seed: Seed,
    pub amplitude: f64,
}

/// Octave layout for one fBm sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalAccumulator {
    pub base_scale: f64,
    pub octaves: u32,
    pub lacunarity: f64,
    pub gain: f64,
    pub tileable: bool,
}

impl FractalAccumulator {
    pub fn validate(&self) -> Result<()> {
        if self.octaves < 1 {
            return Err(CloudError::invalid("octaves", "must be >= 1"));
        }
        if !(self.base_scale > 0.0) || !self.base_scale.is_finite() {
            return Err(CloudError::invalid("base_scale", format!("must be a finite value > 0, got {}", self.base_scale)));
        }
        Ok(())
    }

    /// Scale, seed and weight of every octave.
    ///
    /// Built by repeated division and multiplication rather than `powi` so the
    /// float values match an iterative accumulation exactly.
    pub fn schedule(&self, seed: Seed) -> Vec<Octave> {
        let mut scale = self.base_scale;
        let mut amplitude = 1.0;
        (0..self.octaves)
            .map(|index| {
                let octave = Octave { index, scale, seed: seed.octave(index), amplitude };
                scale /= self.lacunarity;
                amplitude *= self.gain;
                octave
            })
            .collect()
    }

    /// Sums every octave into one field clamped to `[0, 1]`.
    ///
    /// Octaves are evaluated in parallel; the weighted sum runs in octave order.
    pub fn accumulate(&self, dims: Dimensions, seed: Seed) -> Result<NoiseField> {
        self.validate()?;
        let schedule = self.schedule(seed);

        let layers = schedule
            .par_iter()
            .map(|octave| {
                debug!("octave {}: scale {:.3}, seed {}, amplitude {:.4}", octave.index, octave.scale, octave.seed.0, octave.amplitude);
                perlin::evaluate(dims, octave.scale, octave.seed, self.tileable)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut total = Array2::<f32>::zeros(dims.shape());
        let mut amplitude_sum = 0.0;
        for (octave, layer) in schedule.iter().zip(&layers) {
            total.scaled_add(octave.amplitude as f32, layer);
            amplitude_sum += octave.amplitude;
        }

        let norm = (amplitude_sum + AMPLITUDE_EPSILON) as f32;
        total.mapv_inplace(|v| (v / norm).clamp(0.0, 1.0));
        Ok(total)
    }
}

/// Free-function form of [`FractalAccumulator::accumulate`].
pub fn accumulate(
    dims: Dimensions,
    base_scale: f64,
    octaves: u32,
    lacunarity: f64,
    gain: f64,
    seed: Seed,
    tileable: bool,
) -> Result<NoiseField> {
    FractalAccumulator { base_scale, octaves, lacunarity, gain, tileable }.accumulate(dims, seed)
}
