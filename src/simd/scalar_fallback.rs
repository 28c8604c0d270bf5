//! Portable lane-group kernels.
//!
//! These walk the same tile boundaries and eight-wide lane groups as the
//! AVX2 kernels, in the same order, using wrapping scalar arithmetic.
//! Integer accumulation is exact under reordering, so the results are
//! bit-identical to both the AVX2 path and the scalar reference; the
//! point of mirroring the group structure is that the equivalence tests
//! exercise the same addressing and padding behavior on every
//! architecture.
//!
//! The functions are `unsafe fn` only so they share a function-pointer
//! type with the AVX2 kernels in the dispatcher; their bodies contain no
//! unsafe operations beyond the shared size contract.

use crate::buffer::{round_up_lanes, LANE_WIDTH};
use crate::kernel::TileConfig;

/// Blocked convolution in lane groups; semantics of
/// [`mult_avx2`](super::avx2::mult_avx2) without intrinsics.
///
/// # Safety
/// Same size contract as the AVX2 kernel: `b` at least
/// `round_up_lanes(deg_b + 1)` elements with zeroed padding, `out` at
/// least `deg_a + round_up_lanes(deg_b + 1)` elements.
pub unsafe fn mult_lanes(
    a: &[i32],
    deg_a: usize,
    b: &[i32],
    deg_b: usize,
    out: &mut [i32],
    tiles: TileConfig,
) {
    let size_b = round_up_lanes(deg_b + 1);
    debug_assert!(a.len() > deg_a);
    debug_assert!(b.len() >= size_b);
    debug_assert!(out.len() >= deg_a + size_b);

    out.fill(0);

    let mut ii = 0;
    while ii <= deg_a {
        let i_end = tiles.tile_i().saturating_add(ii).min(deg_a + 1);

        let mut jj = 0;
        while jj < size_b {
            let j_end = tiles.tile_j().saturating_add(jj).min(size_b);

            for i in ii..i_end {
                let ai = a[i];

                let mut j = jj;
                while j < j_end {
                    // One full-width lane group; padding multiplies to zero.
                    for lane in 0..LANE_WIDTH {
                        let k = i + j + lane;
                        out[k] = out[k].wrapping_add(ai.wrapping_mul(b[j + lane]));
                    }
                    j += LANE_WIDTH;
                }
            }

            jj = j_end;
        }

        ii = i_end;
    }
}

/// Elementwise addition in lane groups; `len` must be a lane multiple.
///
/// # Safety
/// All slices must hold at least `len` elements.
pub unsafe fn add_lanes(a: &[i32], b: &[i32], out: &mut [i32], len: usize) {
    debug_assert_eq!(len % LANE_WIDTH, 0);
    debug_assert!(a.len() >= len && b.len() >= len && out.len() >= len);

    let mut i = 0;
    while i < len {
        for lane in 0..LANE_WIDTH {
            out[i + lane] = a[i + lane].wrapping_add(b[i + lane]);
        }
        i += LANE_WIDTH;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::CoeffBuffer;
    use crate::kernel::mult_scalar;

    fn input_from(coeffs: &[i32]) -> CoeffBuffer {
        let mut buf = CoeffBuffer::for_input(coeffs.len() - 1);
        buf[..coeffs.len()].copy_from_slice(coeffs);
        buf
    }

    #[test]
    fn test_lane_mult_degree_one_product() {
        let a = input_from(&[1, 2]);
        let b = input_from(&[3, 4]);
        let mut out = CoeffBuffer::for_product(1, 1);

        unsafe { mult_lanes(&a, 1, &b, 1, &mut out, TileConfig::default()) };
        assert_eq!(&out[..3], &[3, 10, 8]);
    }

    #[test]
    fn test_lane_mult_degree_zero_product() {
        let a = input_from(&[5]);
        let b = input_from(&[-3]);
        let mut out = CoeffBuffer::for_product(0, 0);

        unsafe { mult_lanes(&a, 0, &b, 0, &mut out, TileConfig::untiled()) };
        assert_eq!(out[0], -15);
    }

    #[test]
    fn test_lane_mult_matches_scalar_reference() {
        for (deg_a, deg_b) in [(3, 12), (8, 8), (17, 5), (31, 31)] {
            let a: Vec<i32> = (1..=(deg_a as i32 + 1)).collect();
            let b: Vec<i32> = (1..=(deg_b as i32 + 1)).map(|i| -i).collect();
            let a_buf = input_from(&a);
            let b_buf = input_from(&b);

            let mut reference = CoeffBuffer::for_product(deg_a, deg_b);
            mult_scalar(&a_buf, deg_a, &b_buf, deg_b, &mut reference);

            let mut out = CoeffBuffer::for_product(deg_a, deg_b);
            unsafe { mult_lanes(&a_buf, deg_a, &b_buf, deg_b, &mut out, TileConfig::new(4, 16).unwrap()) };

            assert_eq!(&out[..=deg_a + deg_b], &reference[..=deg_a + deg_b]);
        }
    }

    #[test]
    fn test_lane_add() {
        let a = input_from(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let b = input_from(&[-1, -2, -3, -4, -5, -6, -7, -8]);
        let mut out = CoeffBuffer::with_capacity(8);

        unsafe { add_lanes(&a, &b, &mut out, 8) };
        assert!(out[..8].iter().all(|&c| c == 0));
    }
}
