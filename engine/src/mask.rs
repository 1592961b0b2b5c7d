//! Turns a continuous noise field into a cloud silhouette.
//!
//! Stages run in a fixed order: bias, smooth, edge falloff, threshold,
//! invert, feather. Every stage returns a new buffer.

use image::{imageops, GrayImage, Luma};
use log::debug;
use ndarray::{Array1, Array2};

use crate::api::{Dimensions, MaskImage, NoiseField};
use crate::params::CloudParams;
use crate::perlin::fade;

/// Per-pixel multiplier in `[0, 1]` fading the canvas border to black.
pub type FalloffMask = Array2<f32>;

pub const ON: u8 = 255;
pub const OFF: u8 = 0;

/// `clamp(v, 0, 1)^power` for every value; identity when `power == 1`.
pub fn apply_bias(field: &NoiseField, power: f32) -> NoiseField {
    if power == 1.0 {
        return field.clone();
    }
    field.mapv(|v| v.clamp(0.0, 1.0).powf(power))
}

/// Quantizes to 8 bits by truncation, matching the grayscale intermediate
/// the mask is rendered through.
fn to_gray(field: &NoiseField) -> GrayImage {
    let (rows, cols) = field.dim();
    GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        Luma([(field[[y as usize, x as usize]] * 255.0) as u8])
    })
}

fn from_gray(image: &GrayImage) -> NoiseField {
    let (w, h) = image.dimensions();
    Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
        image.get_pixel(x as u32, y as u32)[0] as f32 / 255.0
    })
}

/// Gaussian blur of the field through an 8-bit round trip; `radius` is sigma.
pub fn smooth(field: &NoiseField, radius: f32) -> NoiseField {
    if !(radius > 0.0) {
        return field.clone();
    }
    from_gray(&imageops::blur(&to_gray(field), radius))
}

/// One axis of the falloff: 0 on the border, 1 from `padding` pixels inward.
fn edge_ramp(len: usize, padding: u32) -> Array1<f64> {
    let p = padding as f64;
    Array1::from_shape_fn(len, |i| {
        let near = (i as f64 / p).clamp(0.0, 1.0);
        let far = ((len - 1 - i) as f64 / p).clamp(0.0, 1.0);
        fade(near.min(far))
    })
}

/// Outer product of the vertical and horizontal edge ramps.
///
/// `padding == 0` yields an all-ones mask.
pub fn falloff_mask(dims: Dimensions, padding: u32) -> FalloffMask {
    if padding == 0 {
        return Array2::ones(dims.shape());
    }
    let (rows, cols) = dims.shape();
    let ramp_y = edge_ramp(rows, padding);
    let ramp_x = edge_ramp(cols, padding);
    Array2::from_shape_fn((rows, cols), |(y, x)| (ramp_y[y] * ramp_x[x]) as f32)
}

pub fn apply_padding(field: &NoiseField, padding: u32) -> NoiseField {
    if padding == 0 {
        return field.clone();
    }
    let (rows, cols) = field.dim();
    let dims = Dimensions { width: cols as u32, height: rows as u32 };
    field * &falloff_mask(dims, padding)
}

/// `ON` where `value > threshold`, else `OFF`.
pub fn threshold(field: &NoiseField, threshold: f32) -> MaskImage {
    let (rows, cols) = field.dim();
    GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        let on = field[[y as usize, x as usize]] > threshold;
        Luma([if on { ON } else { OFF }])
    })
}

/// `255 - v` for every pixel.
pub fn invert(mask: &MaskImage) -> MaskImage {
    let mut out = mask.clone();
    imageops::invert(&mut out);
    out
}

/// Gaussian blur of the mask for soft edges; `radius` is sigma.
pub fn feather(mask: &MaskImage, radius: f32) -> MaskImage {
    if !(radius > 0.0) {
        return mask.clone();
    }
    imageops::blur(mask, radius)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskPostProcessor {
    pub bias_power: f32,
    pub smooth_radius: f32,
    pub padding: u32,
    pub threshold: f32,
    pub invert: bool,
    pub feather_radius: f32,
}

impl MaskPostProcessor {
    pub fn from_params(params: &CloudParams) -> Self {
        Self {
            bias_power: params.bias_power,
            smooth_radius: params.smooth_radius,
            padding: params.padding,
            threshold: params.threshold,
            invert: params.invert,
            feather_radius: params.feather_radius,
        }
    }

    /// Bias through invert: the strict binary mask before feathering.
    pub fn binary_mask(&self, field: &NoiseField) -> MaskImage {
        let biased = apply_bias(field, self.bias_power);
        let smoothed = smooth(&biased, self.smooth_radius);
        let padded = apply_padding(&smoothed, self.padding);
        let mask = threshold(&padded, self.threshold);
        if self.invert {
            invert(&mask)
        } else {
            mask
        }
    }

    pub fn process(&self, field: &NoiseField) -> MaskImage {
        debug!(
            "post-processing: bias {}, smooth {}, padding {}, threshold {}, invert {}, feather {}",
            self.bias_power, self.smooth_radius, self.padding, self.threshold, self.invert, self.feather_radius
        );
        feather(&self.binary_mask(field), self.feather_radius)
    }
}
