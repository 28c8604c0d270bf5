//! Cache-blocked, vectorized polynomial multiplication with scalar
//! validation.
//!
//! The crate multiplies two dense `i32`-coefficient polynomials with a
//! tiled AVX2 convolution kernel and checks the result bit-for-bit
//! against a scalar reference. Elementwise addition kernels accompany
//! the multiply pair. The `polymul` binary drives both kernels over
//! randomly generated inputs and reports timings, the speedup ratio, and
//! the mismatch count.
//!
//! Layout:
//! - [`buffer`]: aligned, lane-rounded, zero-initialized coefficient
//!   storage;
//! - [`generate`]: random non-zero coefficient fill;
//! - [`kernel`]: scalar reference kernels, the [`ConvolutionKernel`]
//!   strategy trait, tile configuration, and the result comparator;
//! - [`simd`]: capability detection plus the AVX2 and portable
//!   lane-group kernels behind a function-pointer dispatcher;
//! - [`timing`]: monotonic wall-clock measurement.
//!
//! Coefficient arithmetic wraps on overflow throughout; scalar and
//! vector paths wrap identically, so equality checks are exact.

pub mod buffer;
pub mod error;
pub mod generate;
pub mod kernel;
pub mod simd;
pub mod timing;

pub use buffer::{round_up_lanes, CoeffBuffer, ALIGNMENT, LANE_WIDTH};
pub use error::{PolyMultError, Result};
pub use generate::random_fill;
pub use kernel::{
    add_scalar, count_mismatches, mult_scalar, ConvolutionKernel, ScalarKernel, TileConfig,
    VectorKernel,
};
pub use simd::{Dispatcher, SimdCapability};
pub use timing::time_kernel;
