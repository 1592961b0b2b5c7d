//! Seeded unit gradients on an integer lattice.
//!
//! Angles come from `ChaCha8Rng::seed_from_u64(seed)`, drawn as
//! `gen_range(0.0..TAU)` in row-major order (row outer, column inner). The
//! stream is fixed by `rand_chacha`, so a seed reproduces the same gradients
//! bit for bit on every platform.

use std::f64::consts::TAU;

use log::trace;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::api::{CloudError, Result};

pub type Gradient = [f64; 2];

/// Largest lattice a single octave may allocate (16 bytes per cell).
pub const MAX_LATTICE_CELLS: usize = 1 << 26;

fn too_large(width: impl std::fmt::Display, height: impl std::fmt::Display) -> CloudError {
    CloudError::invalid(
        "scale",
        format!("lattice of {width}x{height} cells exceeds the {MAX_LATTICE_CELLS}-cell limit"),
    )
}

/// Dense row-major grid of gradients.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientGrid {
    width: usize,
    height: usize,
    cells: Vec<Gradient>,
}

impl GradientGrid {
    pub fn build(width: usize, height: usize, seed: u64) -> Result<Self> {
        let count = width
            .checked_mul(height)
            .filter(|&n| n <= MAX_LATTICE_CELLS)
            .ok_or_else(|| too_large(width, height))?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut cells = Vec::with_capacity(count);
        for _gy in 0..height {
            for _gx in 0..width {
                let theta: f64 = rng.gen_range(0.0..TAU);
                cells.push([theta.cos(), theta.sin()]);
            }
        }
        trace!("built {}x{} gradient grid (seed {})", width, height, seed);
        Ok(Self { width, height, cells })
    }

    pub fn width(&self) -> usize { self.width }

    pub fn height(&self) -> usize { self.height }

    #[inline]
    fn at(&self, gx: usize, gy: usize) -> Gradient {
        self.cells[gy * self.width + gx]
    }
}

/// Gradient lookup by absolute lattice coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum GradientLattice {
    /// Covers the bounding box of every corner a sample grid touches.
    /// Lookups outside it are a bug in the caller's corner math.
    Bounded { min_x: i64, min_y: i64, grid: GradientGrid },
    /// Torus of `grid.width() x grid.height()` cells; coordinates wrap.
    Wrapping { grid: GradientGrid },
}

impl GradientLattice {
    /// Lattice spanning the inclusive corner range `[min, max]` on each axis.
    pub fn bounded(min: [i64; 2], max: [i64; 2], seed: u64) -> Result<Self> {
        debug_assert!(max[0] >= min[0] && max[1] >= min[1]);
        let extent = |lo: i64, hi: i64| {
            hi.checked_sub(lo)
                .and_then(|d| d.checked_add(1))
                .and_then(|n| usize::try_from(n).ok())
        };
        let (width, height) = match (extent(min[0], max[0]), extent(min[1], max[1])) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(too_large(max[0] as i128 - min[0] as i128 + 1, max[1] as i128 - min[1] as i128 + 1)),
        };
        let grid = GradientGrid::build(width, height, seed)?;
        Ok(GradientLattice::Bounded { min_x: min[0], min_y: min[1], grid })
    }

    pub fn wrapping(cells_x: usize, cells_y: usize, seed: u64) -> Result<Self> {
        let grid = GradientGrid::build(cells_x.max(1), cells_y.max(1), seed)?;
        Ok(GradientLattice::Wrapping { grid })
    }

    pub fn grid(&self) -> &GradientGrid {
        match self {
            GradientLattice::Bounded { grid, .. } | GradientLattice::Wrapping { grid } => grid,
        }
    }

    /// Gradient at lattice point `(ix, iy)`.
    ///
    /// # Panics
    /// On a `Bounded` lattice when the point lies outside the bounding box.
    #[inline]
    pub fn lookup(&self, ix: i64, iy: i64) -> Gradient {
        match self {
            GradientLattice::Bounded { min_x, min_y, grid } => {
                let gx = ix - min_x;
                let gy = iy - min_y;
                assert!(
                    gx >= 0 && gy >= 0 && (gx as usize) < grid.width && (gy as usize) < grid.height,
                    "lattice lookup ({}, {}) outside bounding box origin ({}, {}) size {}x{}",
                    ix, iy, min_x, min_y, grid.width, grid.height
                );
                grid.at(gx as usize, gy as usize)
            }
            GradientLattice::Wrapping { grid } => {
                let gx = ix.rem_euclid(grid.width as i64) as usize;
                let gy = iy.rem_euclid(grid.height as i64) as usize;
                grid.at(gx, gy)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_gradients() {
        let a = GradientGrid::build(7, 5, 42).unwrap();
        let b = GradientGrid::build(7, 5, 42).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, GradientGrid::build(7, 5, 43).unwrap());
    }

    #[test]
    fn gradients_are_unit_length() {
        let grid = GradientGrid::build(16, 16, 1).unwrap();
        for g in &grid.cells {
            let len = (g[0] * g[0] + g[1] * g[1]).sqrt();
            assert!((len - 1.0).abs() < 1e-12, "gradient length {len}");
        }
    }

    #[test]
    fn bounded_lookup_uses_offset() {
        let lattice = GradientLattice::bounded([-2, 3], [1, 5], 9).unwrap();
        let grid = lattice.grid().clone();
        assert_eq!((grid.width(), grid.height()), (4, 3));
        assert_eq!(lattice.lookup(-2, 3), grid.at(0, 0));
        assert_eq!(lattice.lookup(1, 5), grid.at(3, 2));
    }

    #[test]
    #[should_panic(expected = "outside bounding box")]
    fn bounded_lookup_out_of_range_panics() {
        let lattice = GradientLattice::bounded([0, 0], [2, 2], 9).unwrap();
        lattice.lookup(3, 0);
    }

    #[test]
    #[should_panic(expected = "outside bounding box")]
    fn bounded_lookup_negative_panics() {
        let lattice = GradientLattice::bounded([0, 0], [2, 2], 9).unwrap();
        lattice.lookup(0, -1);
    }

    #[test]
    fn wrapping_lookup_repeats_every_grid_size() {
        let lattice = GradientLattice::wrapping(4, 3, 11).unwrap();
        for iy in -3..3 {
            for ix in -4..4 {
                assert_eq!(lattice.lookup(ix, iy), lattice.lookup(ix + 4, iy));
                assert_eq!(lattice.lookup(ix, iy), lattice.lookup(ix, iy + 3));
            }
        }
    }

    #[test]
    fn oversized_grids_are_rejected() {
        let err = GradientGrid::build(usize::MAX, 2, 0).unwrap_err();
        assert!(matches!(err, CloudError::InvalidParameter { name: "scale", .. }));
        assert!(GradientGrid::build(MAX_LATTICE_CELLS, 2, 0).is_err());
        assert!(GradientLattice::wrapping(1 << 14, 1 << 13, 0).is_err());
    }

    #[test]
    fn bounded_extent_overflow_is_rejected() {
        let err = GradientLattice::bounded([i64::MIN, 0], [i64::MAX, 1], 0).unwrap_err();
        assert!(matches!(err, CloudError::InvalidParameter { name: "scale", .. }));
    }
}
