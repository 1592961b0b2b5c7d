//! Single-scale 2-D gradient noise over a pixel grid.

use ndarray::{Array2, Zip};

use crate::api::{CloudError, Dimensions, NoiseField, Result, Seed};
use crate::lattice::{GradientLattice, MAX_LATTICE_CELLS};

/// Added to the observed range so a flat field normalizes to zero instead of NaN.
const RANGE_EPSILON: f64 = 1e-12;

/// Quintic fade `6t^5 - 15t^4 + 10t^3`: zero first and second derivative at 0 and 1.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Rejects a lattice too large to allocate before any float-to-int cast.
fn check_lattice_size(cells_x: f64, cells_y: f64) -> Result<()> {
    let cells = cells_x * cells_y;
    if !(cells <= MAX_LATTICE_CELLS as f64) {
        return Err(CloudError::invalid(
            "scale",
            format!("needs a {cells_x}x{cells_y} lattice, over the {MAX_LATTICE_CELLS}-cell limit"),
        ));
    }
    Ok(())
}

/// Gradient noise bound to one sample grid.
///
/// Pixel `(px, py)` maps to noise space `(px * step_x, py * step_y)`. In
/// tileable mode the steps are chosen so the grid spans a whole number of
/// lattice cells, which is what lets the wrapping lattice meet itself at the
/// far edge.
#[derive(Debug, Clone)]
pub struct CoherentNoise {
    dims: Dimensions,
    step_x: f64,
    step_y: f64,
    lattice: GradientLattice,
}

impl CoherentNoise {
    pub fn new(dims: Dimensions, scale: f64, seed: Seed, tileable: bool) -> Result<Self> {
        if !(scale > 0.0) || !scale.is_finite() {
            return Err(CloudError::invalid("scale", format!("must be a finite value > 0, got {scale}")));
        }
        let (w, h) = (dims.width as f64, dims.height as f64);

        if tileable {
            let cells_x = (w / scale).round().max(1.0);
            let cells_y = (h / scale).round().max(1.0);
            check_lattice_size(cells_x, cells_y)?;
            let (cells_x, cells_y) = (cells_x as usize, cells_y as usize);
            Ok(Self {
                dims,
                step_x: cells_x as f64 / w,
                step_y: cells_y as f64 / h,
                lattice: GradientLattice::wrapping(cells_x, cells_y, seed.0)?,
            })
        } else {
            let step_x = (w / scale) / w;
            let step_y = (h / scale) / h;
            // Sample coordinates are non-negative and increasing, so the first
            // pixel sets the low corner and the last pixel's far corner the high one.
            let max_x = ((w - 1.0) * step_x).floor() + 1.0;
            let max_y = ((h - 1.0) * step_y).floor() + 1.0;
            check_lattice_size(max_x + 1.0, max_y + 1.0)?;
            Ok(Self {
                dims,
                step_x,
                step_y,
                lattice: GradientLattice::bounded([0, 0], [max_x as i64, max_y as i64], seed.0)?,
            })
        }
    }

    pub fn lattice(&self) -> &GradientLattice {
        &self.lattice
    }

    /// Noise-space coordinate of a pixel.
    #[inline]
    pub fn sample_point(&self, px: usize, py: usize) -> (f64, f64) {
        (px as f64 * self.step_x, py as f64 * self.step_y)
    }

    /// Un-normalized noise at a noise-space point.
    ///
    /// On a non-tileable field the point must lie inside the sampled extent.
    pub fn raw_sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let sx = x - x0;
        let sy = y - y0;
        let (ix, iy) = (x0 as i64, y0 as i64);

        let g00 = self.lattice.lookup(ix, iy);
        let g10 = self.lattice.lookup(ix + 1, iy);
        let g01 = self.lattice.lookup(ix, iy + 1);
        let g11 = self.lattice.lookup(ix + 1, iy + 1);

        let n00 = g00[0] * sx + g00[1] * sy;
        let n10 = g10[0] * (sx - 1.0) + g10[1] * sy;
        let n01 = g01[0] * sx + g01[1] * (sy - 1.0);
        let n11 = g11[0] * (sx - 1.0) + g11[1] * (sy - 1.0);

        let u = fade(sx);
        let v = fade(sy);
        lerp(lerp(n00, n10, u), lerp(n01, n11, u), v)
    }

    /// Raw noise for every pixel, rows evaluated in parallel.
    pub fn raw_field(&self) -> Array2<f64> {
        let mut raw = Array2::<f64>::zeros(self.dims.shape());
        Zip::indexed(&mut raw).par_for_each(|(py, px), value| {
            let (x, y) = self.sample_point(px, py);
            *value = self.raw_sample(x, y);
        });
        raw
    }

    /// Noise for every pixel, min-max normalized into `[0, 1]`.
    pub fn field(&self) -> NoiseField {
        let raw = self.raw_field();
        let (lo, hi) = raw
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let range = hi - lo + RANGE_EPSILON;
        raw.mapv(|v| ((v - lo) / range) as f32)
    }
}

/// Evaluates one octave of gradient noise, normalized against its own range.
pub fn evaluate(dims: Dimensions, scale: f64, seed: Seed, tileable: bool) -> Result<NoiseField> {
    Ok(CoherentNoise::new(dims, scale, seed, tileable)?.field())
}
