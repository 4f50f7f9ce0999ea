#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Tab separated matrix dumps.
pub mod dat;

/// Error types for the io module.
pub mod error;

pub use crate::error::IoError;
