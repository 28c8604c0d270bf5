//! Convolution and addition kernels.
//!
//! The scalar convolution here is the correctness oracle: the classical
//! O(n·m) double loop, accumulating with wrapping `i32` arithmetic. The
//! vectorized path lives behind [`VectorKernel`], which carries a
//! [`TileConfig`] and dispatches through [`crate::simd::Dispatcher`] to
//! the best kernel the host supports. Both paths implement
//! [`ConvolutionKernel`], so callers are polymorphic over the strategy.
//!
//! All arithmetic wraps on overflow. That is deliberate: the scalar and
//! vector paths must produce bit-identical results, and 256-bit integer
//! lanes wrap silently, so the scalar side wraps too.

use crate::buffer::{round_up_lanes, CoeffBuffer, LANE_WIDTH};
use crate::error::{PolyMultError, Result};
use crate::simd::Dispatcher;

/// Cache-blocking tile sizes for the vectorized convolution.
///
/// The original untiled / single-tiled / double-tiled kernel variants are
/// one parameterized algorithm here: `tile_i` blocks the outer loop over
/// A's coefficients, `tile_j` blocks the inner lane-group loop over B.
/// [`TileConfig::untiled`] degenerates both tiles to the whole iteration
/// range. `tile_j` is always a multiple of [`LANE_WIDTH`] so every lane
/// group inside a tile is full-width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileConfig {
    tile_i: usize,
    tile_j: usize,
}

impl TileConfig {
    /// Default outer (A) tile, in coefficients.
    pub const DEFAULT_TILE_I: usize = 256;

    /// Default inner (B) tile, in coefficients. Sized so one B tile plus
    /// the output span it touches stay resident in L1.
    pub const DEFAULT_TILE_J: usize = 512;

    /// Creates a tile configuration, rounding `tile_j` up to a whole
    /// number of lanes.
    pub fn new(tile_i: usize, tile_j: usize) -> Result<Self> {
        if tile_i == 0 || tile_j == 0 {
            return Err(PolyMultError::InvalidTileConfig(format!(
                "tile sizes must be positive, got {tile_i} x {tile_j}"
            )));
        }
        let tile_j = round_up_lanes(tile_j);
        Ok(Self { tile_i, tile_j })
    }

    /// Degenerate configuration covering the whole iteration space in a
    /// single tile.
    pub fn untiled() -> Self {
        Self {
            tile_i: usize::MAX,
            // Largest lane multiple; loops advance with saturating adds.
            tile_j: usize::MAX & !(LANE_WIDTH - 1),
        }
    }

    pub fn tile_i(&self) -> usize {
        self.tile_i
    }

    pub fn tile_j(&self) -> usize {
        self.tile_j
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            tile_i: Self::DEFAULT_TILE_I,
            tile_j: Self::DEFAULT_TILE_J,
        }
    }
}

/// Reference scalar convolution: `out[i + j] += a[i] * b[j]` over
/// `i in 0..=deg_a`, `j in 0..=deg_b`, with wrapping arithmetic.
///
/// Zeroes the whole output buffer first, then accumulates in place.
///
/// # Panics
/// Panics if any slice is shorter than its declared degree requires;
/// undersized buffers are a caller contract violation, not a recoverable
/// condition.
pub fn mult_scalar(a: &[i32], deg_a: usize, b: &[i32], deg_b: usize, out: &mut [i32]) {
    assert!(a.len() > deg_a, "input A shorter than degree {deg_a}");
    assert!(b.len() > deg_b, "input B shorter than degree {deg_b}");
    assert!(
        out.len() >= deg_a + deg_b + 1,
        "output shorter than result degree {}",
        deg_a + deg_b
    );

    out.fill(0);

    for i in 0..=deg_a {
        let ai = a[i];
        // One result offset per inner loop, as the inner loop walks B.
        let dst = &mut out[i..];
        for j in 0..=deg_b {
            dst[j] = dst[j].wrapping_add(ai.wrapping_mul(b[j]));
        }
    }
}

/// Elementwise scalar addition: `out[i] = a[i] + b[i]` (wrapping) for
/// `i in 0..len`.
///
/// # Panics
/// Panics if any slice is shorter than `len`.
pub fn add_scalar(a: &[i32], b: &[i32], out: &mut [i32], len: usize) {
    assert!(a.len() >= len && b.len() >= len && out.len() >= len);

    for i in 0..len {
        out[i] = a[i].wrapping_add(b[i]);
    }
}

/// Counts coefficient mismatches between two result buffers over indices
/// `0..=deg_common`. Zero means exact agreement; coefficients are exact
/// integers, so there is no tolerance.
pub fn count_mismatches(a: &[i32], b: &[i32], deg_common: usize) -> usize {
    debug_assert!(a.len() > deg_common && b.len() > deg_common);

    a.iter()
        .zip(b.iter())
        .take(deg_common + 1)
        .filter(|(x, y)| x != y)
        .count()
}

/// A polynomial multiplication strategy.
///
/// `multiply` computes the full convolution of `a` (degree `deg_a`) and
/// `b` (degree `deg_b`) into `out`, overwriting it entirely. All
/// implementations must produce bit-identical coefficients for indices
/// `0..=deg_a + deg_b`.
pub trait ConvolutionKernel {
    fn multiply(
        &self,
        a: &CoeffBuffer,
        deg_a: usize,
        b: &CoeffBuffer,
        deg_b: usize,
        out: &mut CoeffBuffer,
    ) -> Result<()>;

    fn name(&self) -> &'static str;
}

/// The scalar reference kernel.
pub struct ScalarKernel;

impl ConvolutionKernel for ScalarKernel {
    fn multiply(
        &self,
        a: &CoeffBuffer,
        deg_a: usize,
        b: &CoeffBuffer,
        deg_b: usize,
        out: &mut CoeffBuffer,
    ) -> Result<()> {
        check_len(a.len(), deg_a + 1)?;
        check_len(b.len(), deg_b + 1)?;
        check_len(out.len(), deg_a + deg_b + 1)?;

        mult_scalar(a, deg_a, b, deg_b, out);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "scalar"
    }
}

/// The cache-blocked, lane-wide kernel, dispatched at runtime to AVX2 or
/// the portable lane-group fallback.
pub struct VectorKernel {
    dispatcher: Dispatcher,
    tiles: TileConfig,
}

impl VectorKernel {
    pub fn new(tiles: TileConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            tiles,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(TileConfig::default())
    }

    pub fn tiles(&self) -> TileConfig {
        self.tiles
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl ConvolutionKernel for VectorKernel {
    fn multiply(
        &self,
        a: &CoeffBuffer,
        deg_a: usize,
        b: &CoeffBuffer,
        deg_b: usize,
        out: &mut CoeffBuffer,
    ) -> Result<()> {
        let size_b = round_up_lanes(deg_b + 1);
        check_len(a.len(), deg_a + 1)?;
        check_len(b.len(), size_b)?;
        // The furthest unaligned store ends at deg_a + size_b.
        check_len(out.len(), deg_a + size_b)?;

        self.dispatcher.mult(a, deg_a, b, deg_b, out, self.tiles);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "vectorized"
    }
}

fn check_len(got: usize, needed: usize) -> Result<()> {
    if got < needed {
        Err(PolyMultError::BufferTooSmall { needed, got })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::CoeffBuffer;

    fn input_from(coeffs: &[i32]) -> CoeffBuffer {
        let mut buf = CoeffBuffer::for_input(coeffs.len() - 1);
        buf[..coeffs.len()].copy_from_slice(coeffs);
        buf
    }

    #[test]
    fn test_scalar_degree_one_product() {
        // (1 + 2x)(3 + 4x) = 3 + 10x + 8x^2
        let a = input_from(&[1, 2]);
        let b = input_from(&[3, 4]);
        let mut out = CoeffBuffer::for_product(1, 1);

        mult_scalar(&a, 1, &b, 1, &mut out);
        assert_eq!(&out[..3], &[3, 10, 8]);
    }

    #[test]
    fn test_scalar_degree_zero_product() {
        let a = input_from(&[5]);
        let b = input_from(&[-3]);
        let mut out = CoeffBuffer::for_product(0, 0);

        mult_scalar(&a, 0, &b, 0, &mut out);
        assert_eq!(out[0], -15);
    }

    #[test]
    fn test_scalar_multiply_commutes() {
        let a = input_from(&[2, -1, 4, 7]);
        let b = input_from(&[-5, 3]);
        let mut ab = CoeffBuffer::for_product(3, 1);
        let mut ba = CoeffBuffer::for_product(1, 3);

        mult_scalar(&a, 3, &b, 1, &mut ab);
        mult_scalar(&b, 1, &a, 3, &mut ba);
        assert_eq!(&ab[..5], &ba[..5]);
    }

    #[test]
    fn test_scalar_multiply_wraps_on_overflow() {
        let a = input_from(&[i32::MAX]);
        let b = input_from(&[2]);
        let mut out = CoeffBuffer::for_product(0, 0);

        mult_scalar(&a, 0, &b, 0, &mut out);
        assert_eq!(out[0], i32::MAX.wrapping_mul(2));
    }

    #[test]
    fn test_scalar_kernel_trait_reports_undersized_output() {
        let a = input_from(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let b = input_from(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        // Product of two degree-8 inputs needs 17 slots; an input-sized
        // buffer only has 16.
        let mut out = CoeffBuffer::for_input(8);

        let err = ScalarKernel
            .multiply(&a, 8, &b, 8, &mut out)
            .unwrap_err();
        match err {
            PolyMultError::BufferTooSmall { needed, got } => {
                assert_eq!(needed, 17);
                assert_eq!(got, 16);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_add_scalar_identity_and_wraparound() {
        let a = input_from(&[1, -2, i32::MAX, 0, 0, 0, 0, 0]);
        let b = input_from(&[10, 20, 1, 0, 0, 0, 0, 0]);
        let mut out = CoeffBuffer::with_capacity(8);

        add_scalar(&a, &b, &mut out, 8);
        assert_eq!(out[0], 11);
        assert_eq!(out[1], 18);
        assert_eq!(out[2], i32::MIN);
    }

    #[test]
    fn test_count_mismatches() {
        let a = [1, 2, 3, 4, 5];
        let b = [1, 9, 3, 9, 5];
        assert_eq!(count_mismatches(&a, &b, 4), 2);
        assert_eq!(count_mismatches(&a, &b, 0), 0);
        assert_eq!(count_mismatches(&a, &a, 4), 0);
    }

    #[test]
    fn test_comparator_ignores_padding() {
        let mut a = CoeffBuffer::for_product(2, 2);
        let mut b = CoeffBuffer::for_product(2, 2);
        a[..5].copy_from_slice(&[1, 2, 3, 4, 5]);
        b[..5].copy_from_slice(&[1, 2, 3, 4, 5]);
        // Disagreeing junk past the result degree must not count.
        a[5] = 77;
        b[5] = -77;

        assert_eq!(count_mismatches(&a, &b, 4), 0);
    }

    #[test]
    fn test_tile_config_validation() {
        assert!(TileConfig::new(0, 8).is_err());
        assert!(TileConfig::new(4, 0).is_err());

        let tiles = TileConfig::new(3, 9).unwrap();
        assert_eq!(tiles.tile_i(), 3);
        // Rounded up to the next lane multiple.
        assert_eq!(tiles.tile_j(), 16);

        let untiled = TileConfig::untiled();
        assert_eq!(untiled.tile_j() % crate::buffer::LANE_WIDTH, 0);
    }
}
