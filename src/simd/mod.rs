//! Runtime SIMD capability detection and kernel dispatch.
//!
//! The convolution and addition kernels exist in two renditions with
//! identical semantics:
//!
//! - [`avx2`]: 256-bit AVX2 intrinsics, 8 × `i32` per register (x86_64
//!   only, selected when the host supports it);
//! - [`scalar_fallback`]: portable code that walks the same lane groups
//!   and tile boundaries in the same order, so its accumulation pattern
//!   -- and therefore its wrapping-integer results -- are bit-identical
//!   to the AVX2 path on any architecture.
//!
//! [`Dispatcher`] detects the capability once and holds plain function
//! pointers to the selected kernels; after construction, dispatch is a
//! single indirect call with no further feature checks.

#[cfg(target_arch = "x86_64")]
pub mod avx2;
pub mod scalar_fallback;

use crate::buffer::{round_up_lanes, CoeffBuffer, LANE_WIDTH};
use crate::kernel::TileConfig;

/// SIMD instruction sets the dispatcher can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdCapability {
    /// No usable vector unit; portable lane-group fallback.
    None,
    /// AVX2: 256-bit integer vectors, 8 x i32 lanes.
    Avx2,
}

impl SimdCapability {
    /// Detects the best capability available on the running processor.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx2") {
                return SimdCapability::Avx2;
            }
        }
        SimdCapability::None
    }

    pub fn name(&self) -> &'static str {
        match self {
            SimdCapability::None => "portable fallback",
            SimdCapability::Avx2 => "avx2",
        }
    }
}

type MultFn = unsafe fn(&[i32], usize, &[i32], usize, &mut [i32], TileConfig);
type AddFn = unsafe fn(&[i32], &[i32], &mut [i32], usize);

/// Selects kernel implementations once and dispatches through function
/// pointers thereafter.
pub struct Dispatcher {
    capability: SimdCapability,
    mult_fn: MultFn,
    add_fn: AddFn,
}

impl Dispatcher {
    pub fn new() -> Self {
        match SimdCapability::detect() {
            #[cfg(target_arch = "x86_64")]
            SimdCapability::Avx2 => Self {
                capability: SimdCapability::Avx2,
                mult_fn: avx2::mult_avx2,
                add_fn: avx2::add_avx2,
            },
            _ => Self {
                capability: SimdCapability::None,
                mult_fn: scalar_fallback::mult_lanes,
                add_fn: scalar_fallback::add_lanes,
            },
        }
    }

    pub fn capability(&self) -> SimdCapability {
        self.capability
    }

    /// Runs the selected blocked convolution kernel.
    ///
    /// # Panics
    /// Panics if `b` is shorter than `round_up_lanes(deg_b + 1)` or `out`
    /// shorter than `deg_a + round_up_lanes(deg_b + 1)`; those sizes are
    /// what make the kernel's full-lane loads and stores in-bounds.
    pub fn mult(
        &self,
        a: &CoeffBuffer,
        deg_a: usize,
        b: &CoeffBuffer,
        deg_b: usize,
        out: &mut CoeffBuffer,
        tiles: TileConfig,
    ) {
        let size_b = round_up_lanes(deg_b + 1);
        assert!(a.len() > deg_a);
        assert!(b.len() >= size_b);
        assert!(out.len() >= deg_a + size_b);

        // SAFETY: the selected function pointer matches the detected
        // capability, sizes were checked above, and CoeffBuffer
        // guarantees the 32-byte alignment the aligned B loads need.
        unsafe { (self.mult_fn)(&a[..], deg_a, &b[..], deg_b, &mut out[..], tiles) }
    }

    /// Runs the selected elementwise addition kernel over `len` elements.
    ///
    /// # Panics
    /// Panics if `len` is not a lane multiple or any buffer is shorter
    /// than `len`. Lane-rounded allocation makes the vector form
    /// remainder-free, so a non-multiple `len` is a caller error.
    pub fn add(&self, a: &CoeffBuffer, b: &CoeffBuffer, out: &mut CoeffBuffer, len: usize) {
        assert_eq!(len % LANE_WIDTH, 0, "length {len} is not a lane multiple");
        assert!(a.len() >= len && b.len() >= len && out.len() >= len);

        // SAFETY: as in `mult`; all three buffers are 32-byte aligned and
        // hold at least `len` elements.
        unsafe { (self.add_fn)(&a[..], &b[..], &mut out[..], len) }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("capability", &self.capability)
            .finish()
    }
}
