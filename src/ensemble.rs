//! Ensemble of independently seeded sketches.
//!
//! Each member sees every element added to the ensemble, but hashes it with
//! its own seed, so the members' estimation errors are (near-)independent.
//! Averaging `k` such estimates reduces the standard error by roughly
//! `1/sqrt(k)` at `k`x the memory and hashing cost of a single sketch.

use crate::hash;
use crate::sketch::Sketch;
use crate::Error;

/// Odd 32-bit golden-ratio constant used to spread derived member seeds
/// across the seed space.
const GOLDEN_CONSTANT: u32 = 0x9e37_79b9;

/// Fixed group of `k` sketches sharing one precision but distinct seeds.
#[derive(Debug, Clone, PartialEq)]
pub struct SketchEnsemble {
    members: Vec<Sketch>,
}

impl SketchEnsemble {
    /// Creates `k` member sketches of the given precision, with member `i`
    /// seeded by avalanching `base_seed + i * GOLDEN_CONSTANT`.
    ///
    /// Returns [`Error::InvalidEnsembleSize`] when `k` is zero and
    /// [`Error::InvalidPrecision`] when `precision` is outside `[4, 16]`.
    pub fn new(precision: u8, k: usize, base_seed: u32) -> Result<Self, Error> {
        if k == 0 {
            return Err(Error::InvalidEnsembleSize);
        }
        let mut members = Vec::with_capacity(k);
        for i in 0..k {
            let seed = derive_seed(base_seed, i);
            members.push(Sketch::with_seed(precision, seed)?);
        }
        Ok(Self { members })
    }

    /// Adds one element to every member sketch, in member order.
    #[inline]
    pub fn add(&mut self, element: &[u8]) {
        for sketch in &mut self.members {
            sketch.add(element);
        }
    }

    /// Returns the arithmetic mean of all member estimates.
    pub fn estimate_mean(&self) -> f64 {
        let sum: f64 = self.members.iter().map(Sketch::estimate).sum();
        sum / self.members.len() as f64
    }

    /// Resets every member in place; seeds and precision are unchanged.
    pub fn reset(&mut self) {
        for sketch in &mut self.members {
            sketch.reset();
        }
    }

    /// Returns the number of member sketches `k`; always at least 1.
    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Returns the member sketches in construction order.
    #[inline]
    pub fn members(&self) -> &[Sketch] {
        &self.members
    }
}

/// Seed for member `i`, spread by the golden-ratio stride and avalanched so
/// nearby base seeds and member indices land far apart in seed space.
#[inline]
fn derive_seed(base_seed: u32, i: usize) -> u32 {
    hash::mix_seed(base_seed.wrapping_add((i as u32).wrapping_mul(GOLDEN_CONSTANT)))
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_zero_members_rejected() {
        assert_eq!(
            SketchEnsemble::new(12, 0, 42),
            Err(Error::InvalidEnsembleSize)
        );
    }

    #[test]
    fn test_invalid_precision_propagates() {
        assert_eq!(
            SketchEnsemble::new(3, 4, 42),
            Err(Error::InvalidPrecision(3))
        );
    }

    #[test]
    fn test_member_seeds_distinct() {
        let ensemble = SketchEnsemble::new(8, 16, 42).unwrap();
        let seeds: Vec<u32> = ensemble.members().iter().map(Sketch::seed).collect();
        for (i, &a) in seeds.iter().enumerate() {
            for &b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_fan_out_matches_standalone_sketches() {
        let mut ensemble = SketchEnsemble::new(10, 3, 7).unwrap();
        let mut standalone: Vec<Sketch> = (0..3)
            .map(|i| Sketch::with_seed(10, derive_seed(7, i)).unwrap())
            .collect();

        for i in 0..2000u32 {
            let element = format!("element-{i}");
            ensemble.add(element.as_bytes());
            for sketch in &mut standalone {
                sketch.add(element.as_bytes());
            }
        }

        for (member, sketch) in ensemble.members().iter().zip(&standalone) {
            assert_eq!(member, sketch);
        }
    }

    #[test]
    fn test_single_member_mean_equals_estimate() {
        let mut ensemble = SketchEnsemble::new(12, 1, 42).unwrap();
        for i in 0..1000u32 {
            ensemble.add(format!("item{i}").as_bytes());
        }
        assert_eq!(ensemble.estimate_mean(), ensemble.members()[0].estimate());
    }

    #[test]
    fn test_reset_resets_all_members() {
        let mut ensemble = SketchEnsemble::new(8, 4, 42).unwrap();
        for i in 0..500u32 {
            ensemble.add(format!("item{i}").as_bytes());
        }
        assert!(ensemble.estimate_mean() > 0.0);

        ensemble.reset();
        assert_eq!(ensemble.estimate_mean(), 0.0);
        assert_eq!(ensemble, SketchEnsemble::new(8, 4, 42).unwrap());
    }
}
