//! Aligned coefficient buffers for vectorized polynomial arithmetic.
//!
//! Every polynomial operand and result lives in a [`CoeffBuffer`]: a
//! contiguous, owned block of `i32` coefficients that is
//!
//! - aligned to the 256-bit vector register width (32 bytes), so the
//!   vector kernels may use aligned loads on lane-multiple offsets,
//! - sized up to a multiple of [`LANE_WIDTH`], so the vector kernels can
//!   always process full lane groups without a scalar remainder loop,
//! - zero-initialized, so the padding beyond the logical degree
//!   contributes nothing when a kernel multiplies through it.
//!
//! Allocation failure is fatal: a one-shot numeric benchmark has no
//! recoverable out-of-memory path, so the allocator diagnoses and aborts
//! via [`std::alloc::handle_alloc_error`].

use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// Number of `i32` lanes in one 256-bit vector register.
pub const LANE_WIDTH: usize = 8;

/// Byte alignment required for aligned 256-bit loads and stores.
pub const ALIGNMENT: usize = 32;

/// Rounds `n` up to the nearest multiple of [`LANE_WIDTH`].
pub const fn round_up_lanes(n: usize) -> usize {
    (n + LANE_WIDTH - 1) & !(LANE_WIDTH - 1)
}

/// Owned, 32-byte-aligned, zero-initialized `i32` storage.
///
/// Dereferences to `[i32]`; the slice length is the full capacity
/// including lane-rounding and tail padding, not the logical coefficient
/// count. Callers track logical degrees separately, exactly as the
/// kernels' signatures do.
pub struct CoeffBuffer {
    ptr: NonNull<i32>,
    len: usize,
}

impl CoeffBuffer {
    /// Allocates a zeroed buffer of at least `min_elements` coefficients,
    /// rounded up to a whole number of lanes.
    pub fn with_capacity(min_elements: usize) -> Self {
        // Always at least one full lane so vector kernels never see an
        // empty operand.
        let len = round_up_lanes(min_elements.max(1));
        let size = len
            .checked_mul(mem::size_of::<i32>())
            .unwrap_or_else(|| panic!("coefficient buffer of {len} elements overflows usize"));
        let layout = Layout::from_size_align(size, ALIGNMENT)
            .unwrap_or_else(|_| panic!("invalid layout for {len}-element coefficient buffer"));

        // SAFETY: layout has non-zero size (len >= LANE_WIDTH).
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = match NonNull::new(raw as *mut i32) {
            Some(ptr) => ptr,
            None => handle_alloc_error(layout),
        };

        Self { ptr, len }
    }

    /// Buffer for an input polynomial of the given degree.
    ///
    /// Capacity is `round_up_lanes(degree + 1)`; the slots past the
    /// logical degree stay zero and are safe for full-lane loads.
    pub fn for_input(degree: usize) -> Self {
        Self::with_capacity(degree + 1)
    }

    /// Buffer for the product of polynomials of degrees `deg_a` and `deg_b`.
    ///
    /// Capacity is `round_up_lanes(deg_a + deg_b + 1) + LANE_WIDTH`. The
    /// extra lane of tail slack keeps the unaligned vector stores at
    /// offset `i + j` in bounds: the furthest store begins at
    /// `deg_a + round_up_lanes(deg_b + 1) - LANE_WIDTH`, so
    /// `deg_a + round_up_lanes(deg_b + 1)` elements is the exact minimum
    /// and the chosen capacity is always at least that.
    pub fn for_product(deg_a: usize, deg_b: usize) -> Self {
        Self::with_capacity(round_up_lanes(deg_a + deg_b + 1) + LANE_WIDTH)
    }

    /// Total capacity in elements, including padding.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_ptr(&self) -> *const i32 {
        self.ptr.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut i32 {
        self.ptr.as_ptr()
    }
}

impl Deref for CoeffBuffer {
    type Target = [i32];

    fn deref(&self) -> &[i32] {
        // SAFETY: ptr is valid for len elements for the buffer's lifetime.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl DerefMut for CoeffBuffer {
    fn deref_mut(&mut self) -> &mut [i32] {
        // SAFETY: ptr is valid for len elements and exclusively owned.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for CoeffBuffer {
    fn drop(&mut self) {
        let size = self.len * mem::size_of::<i32>();
        // SAFETY: identical layout to the allocation in with_capacity.
        unsafe {
            let layout = Layout::from_size_align_unchecked(size, ALIGNMENT);
            dealloc(self.ptr.as_ptr() as *mut u8, layout);
        }
    }
}

// The buffer is a plain owned block of integers, so transferring or
// sharing it across threads is sound even though the crate itself only
// ever uses it from one thread.
unsafe impl Send for CoeffBuffer {}
unsafe impl Sync for CoeffBuffer {}

impl std::fmt::Debug for CoeffBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoeffBuffer")
            .field("len", &self.len)
            .finish()
    }
}
