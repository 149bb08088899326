//! Validation wrappers that pair a sketch with exact ground truth.
//!
//! The exact set exists purely so accuracy harnesses can compare an estimate
//! against the true distinct count. It lives outside the sketches so the
//! estimator's hot path and O(m) memory footprint stay untouched; it never
//! influences `estimate`.

use std::collections::HashSet;
use std::hash::BuildHasherDefault;

use wyhash::WyHash;

use crate::ensemble::SketchEnsemble;
use crate::sketch::Sketch;
use crate::Error;

type ExactSet = HashSet<Vec<u8>, BuildHasherDefault<WyHash>>;

/// A [`Sketch`] that also remembers every element it has seen.
#[derive(Debug, Clone)]
pub struct TrackedSketch {
    sketch: Sketch,
    seen: ExactSet,
}

impl TrackedSketch {
    /// Creates a tracked sketch with the default hash seed.
    pub fn new(precision: u8) -> Result<Self, Error> {
        Ok(Self {
            sketch: Sketch::new(precision)?,
            seen: ExactSet::default(),
        })
    }

    /// Creates a tracked sketch with the given hash seed.
    pub fn with_seed(precision: u8, seed: u32) -> Result<Self, Error> {
        Ok(Self {
            sketch: Sketch::with_seed(precision, seed)?,
            seen: ExactSet::default(),
        })
    }

    /// Adds one element to the sketch and records it in the exact set.
    pub fn add(&mut self, element: &[u8]) {
        self.seen.insert(element.to_vec());
        self.sketch.add(element);
    }

    /// Returns the sketch's estimate of the distinct count.
    pub fn estimate(&self) -> f64 {
        self.sketch.estimate()
    }

    /// Returns the true number of distinct elements added.
    pub fn exact_count(&self) -> usize {
        self.seen.len()
    }

    /// Returns `|estimate - exact| / exact`, or 0 for an empty stream.
    pub fn relative_error(&self) -> f64 {
        let exact = self.exact_count() as f64;
        if exact == 0.0 {
            return 0.0;
        }
        (self.estimate() - exact).abs() / exact
    }

    /// Resets the sketch and clears the exact set.
    pub fn reset(&mut self) {
        self.sketch.reset();
        self.seen.clear();
    }

    /// Returns the wrapped sketch.
    pub fn sketch(&self) -> &Sketch {
        &self.sketch
    }
}

/// A [`SketchEnsemble`] that also remembers every element it has seen.
///
/// One exact set serves all members, since every member observes the
/// identical element sequence.
#[derive(Debug, Clone)]
pub struct TrackedEnsemble {
    ensemble: SketchEnsemble,
    seen: ExactSet,
}

impl TrackedEnsemble {
    /// Creates a tracked ensemble; see [`SketchEnsemble::new`].
    pub fn new(precision: u8, k: usize, base_seed: u32) -> Result<Self, Error> {
        Ok(Self {
            ensemble: SketchEnsemble::new(precision, k, base_seed)?,
            seen: ExactSet::default(),
        })
    }

    /// Adds one element to every member and records it in the exact set.
    pub fn add(&mut self, element: &[u8]) {
        self.seen.insert(element.to_vec());
        self.ensemble.add(element);
    }

    /// Returns the mean of the member estimates.
    pub fn estimate_mean(&self) -> f64 {
        self.ensemble.estimate_mean()
    }

    /// Returns the true number of distinct elements added.
    pub fn exact_count(&self) -> usize {
        self.seen.len()
    }

    /// Returns `|estimate_mean - exact| / exact`, or 0 for an empty stream.
    pub fn relative_error(&self) -> f64 {
        let exact = self.exact_count() as f64;
        if exact == 0.0 {
            return 0.0;
        }
        (self.estimate_mean() - exact).abs() / exact
    }

    /// Resets every member and clears the exact set.
    pub fn reset(&mut self) {
        self.ensemble.reset();
        self.seen.clear();
    }

    /// Returns the wrapped ensemble.
    pub fn ensemble(&self) -> &SketchEnsemble {
        &self.ensemble
    }
}
