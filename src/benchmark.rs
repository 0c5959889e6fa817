//! Best-known tour lengths for named instances.
//!
//! Used only to report how far a run is from the reference value. Callers
//! load any JSON object of `{"name": length}` pairs, or start from the
//! bundled TSPLIB set.

use crate::error::AcoResult;
use std::collections::HashMap;

const TSPLIB_BEST_KNOWN: &str = include_str!("../data/tsplib_best_known.json");

/// Reference dataset of best-known tour lengths, keyed by instance name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkReference {
    lengths: HashMap<String, f64>,
}

impl BenchmarkReference {
    /// An empty reference; every lookup is unknown.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(lengths: HashMap<String, f64>) -> Self {
        Self { lengths }
    }

    pub fn from_json(json: &str) -> AcoResult<Self> {
        Ok(Self::from_map(serde_json::from_str(json)?))
    }

    /// The bundled TSPLIB symmetric instance optima.
    pub fn tsplib() -> AcoResult<Self> {
        Self::from_json(TSPLIB_BEST_KNOWN)
    }

    pub fn insert(&mut self, name: impl Into<String>, length: f64) {
        self.lengths.insert(name.into(), length);
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Best known length for `name`, or `0.0` when it is not in the table.
    pub fn best_known(&self, name: &str) -> f64 {
        self.lookup(name).unwrap_or(0.0)
    }

    /// Best known length for `name`, `None` when unknown.
    pub fn lookup(&self, name: &str) -> Option<f64> {
        self.lengths.get(name).copied().filter(|&len| len > 0.0)
    }

    /// Percentage by which `length` exceeds the best known length for
    /// `name`. `None` when no positive reference exists.
    pub fn gap_percent(&self, name: &str, length: f64) -> Option<f64> {
        self.lookup(name).map(|best| (length - best) / best * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tsplib_dataset_loads() {
        let reference = BenchmarkReference::tsplib().expect("bundled data parses");
        assert!(reference.len() > 100);
        assert!((reference.best_known("berlin52") - 7542.0).abs() < 1e-9);
        assert!((reference.best_known("eil51") - 426.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_is_sentinel() {
        let reference = BenchmarkReference::new();
        assert!(reference.is_empty());
        assert_eq!(reference.best_known("berlin52"), 0.0);
        assert_eq!(reference.lookup("berlin52"), None);
        assert_eq!(reference.gap_percent("berlin52", 8000.0), None);
    }

    #[test]
    fn test_zero_entry_is_not_a_bound() {
        let reference = BenchmarkReference::from_json(r#"{"weird": 0}"#).unwrap();
        assert_eq!(reference.gap_percent("weird", 10.0), None);
    }

    #[test]
    fn test_gap_percent() {
        let mut reference = BenchmarkReference::new();
        reference.insert("toy", 100.0);
        let gap = reference.gap_percent("toy", 102.0).unwrap();
        assert!((gap - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_injected_dataset() {
        let reference = BenchmarkReference::from_json(r#"{"custom": 12.5}"#).unwrap();
        assert!((reference.best_known("custom") - 12.5).abs() < 1e-12);
        assert_eq!(reference.best_known("berlin52"), 0.0);
    }
}
