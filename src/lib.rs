//! `cardinality-sketch` estimates the number of distinct elements in a stream
//! using fixed-memory HyperLogLog sketches with a seeded 32-bit hash function.
//!
//! The crate provides three layers:
//! - [`Sketch`]: a single HyperLogLog register array with `add`/`estimate`/`reset`.
//! - [`SketchEnsemble`]: `k` independently seeded sketches whose estimates are
//!   averaged, trading `k`x memory and hashing for roughly `1/sqrt(k)` lower
//!   estimation error.
//! - [`TrackedSketch`]/[`TrackedEnsemble`]: validation wrappers that also keep
//!   an exact set of seen elements for accuracy measurement.
//!
//! Expected relative standard error of a single sketch with precision `b` is
//! `1.04 / sqrt(2^b)`, e.g. 1.62% at `b = 12`.

use std::fmt;

pub mod ensemble;
mod hash;
pub mod sketch;
pub mod tracked;

pub use ensemble::SketchEnsemble;
pub use sketch::Sketch;
pub use tracked::{TrackedEnsemble, TrackedSketch};

/// Construction-time errors; no operation after construction can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Precision outside the supported `[4, 16]` range.
    InvalidPrecision(u8),
    /// Ensemble constructed with zero member sketches.
    InvalidEnsembleSize,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPrecision(b) => {
                write!(f, "precision {b} is outside the [4, 16] range")
            }
            Error::InvalidEnsembleSize => {
                write!(f, "ensemble must have at least one member sketch")
            }
        }
    }
}

impl std::error::Error for Error {}
