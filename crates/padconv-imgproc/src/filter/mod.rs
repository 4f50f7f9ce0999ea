//! Filter operations
//!
//! This module provides the padded 2D convolution and its kernels.

/// Filter kernels
pub mod kernels;
pub use kernels::{Kernel, KernelError, NamedKernel};

/// Convolution operations
mod convolution;
pub use convolution::*;
