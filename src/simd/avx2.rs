//! AVX2 kernels: 256-bit vectors, 8 x i32 lanes.
//!
//! Addressing contract: B is read with aligned loads, because the lane
//! group offset `j` is always a multiple of [`LANE_WIDTH`] and
//! [`CoeffBuffer`](crate::buffer::CoeffBuffer) allocations are 32-byte
//! aligned. The output is read and written at offset `i + j`, which
//! shifts by one as `i` advances, so the output side must use the
//! unaligned load/store forms.
//!
//! All integer operations (`_mm256_mullo_epi32`, `_mm256_add_epi32`)
//! wrap on overflow, matching the wrapping arithmetic of the scalar
//! reference.

use std::arch::x86_64::*;

use crate::buffer::{round_up_lanes, LANE_WIDTH};
use crate::kernel::TileConfig;

/// Cache-blocked convolution: `out[i + j] += a[i] * b[j]` over the full
/// iteration space, processed one broadcast A coefficient against eight
/// B lanes at a time.
///
/// The output buffer is zeroed first; accumulation is in place. Lane
/// groups over B run to `round_up_lanes(deg_b + 1)`, so the zero padding
/// absorbs what would otherwise be a scalar remainder loop.
///
/// # Safety
/// - Requires AVX2 (the dispatcher only selects this after detection).
/// - `b` must be 32-byte aligned and hold at least
///   `round_up_lanes(deg_b + 1)` elements, all slots past `deg_b` zero.
/// - `out` must hold at least `deg_a + round_up_lanes(deg_b + 1)`
///   elements.
/// - `a` must hold at least `deg_a + 1` elements.
#[target_feature(enable = "avx2")]
pub unsafe fn mult_avx2(
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
    debug_assert_eq!(b.as_ptr() as usize % crate::buffer::ALIGNMENT, 0);

    // Accumulate-in-place semantics: the whole buffer, padding included,
    // starts at zero.
    out.fill(0);

    let b_ptr = b.as_ptr();
    let out_ptr = out.as_mut_ptr();

    let mut ii = 0;
    while ii <= deg_a {
        let i_end = tiles.tile_i().saturating_add(ii).min(deg_a + 1);

        let mut jj = 0;
        while jj < size_b {
            let j_end = tiles.tile_j().saturating_add(jj).min(size_b);

            for i in ii..i_end {
                // One A coefficient across all eight lanes.
                let a_vec = _mm256_set1_epi32(*a.get_unchecked(i));

                let mut j = jj;
                while j < j_end {
                    // j is a lane multiple: aligned load from B.
                    let b_vec = _mm256_load_si256(b_ptr.add(j) as *const __m256i);
                    let prod = _mm256_mullo_epi32(a_vec, b_vec);

                    // i + j is generally not a lane multiple: unaligned
                    // forms for the output.
                    let acc = _mm256_loadu_si256(out_ptr.add(i + j) as *const __m256i);
                    let sum = _mm256_add_epi32(acc, prod);
                    _mm256_storeu_si256(out_ptr.add(i + j) as *mut __m256i, sum);

                    j += LANE_WIDTH;
                }
            }

            jj = j_end;
        }

        ii = i_end;
    }
}

/// Elementwise addition over `len` coefficients, eight lanes per step.
///
/// Streaming kernel: no reuse to exploit, so no tiling.
///
/// # Safety
/// - Requires AVX2.
/// - `len` must be a multiple of [`LANE_WIDTH`].
/// - All three slices must be 32-byte aligned and hold at least `len`
///   elements.
#[target_feature(enable = "avx2")]
pub unsafe fn add_avx2(a: &[i32], b: &[i32], out: &mut [i32], len: usize) {
    debug_assert_eq!(len % LANE_WIDTH, 0);
    debug_assert!(a.len() >= len && b.len() >= len && out.len() >= len);

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();
    let out_ptr = out.as_mut_ptr();

    let mut i = 0;
    while i < len {
        let a_vec = _mm256_load_si256(a_ptr.add(i) as *const __m256i);
        let b_vec = _mm256_load_si256(b_ptr.add(i) as *const __m256i);
        let sum = _mm256_add_epi32(a_vec, b_vec);
        _mm256_store_si256(out_ptr.add(i) as *mut __m256i, sum);
        i += LANE_WIDTH;
    }
}
