use crate::castable::matrix::CompatibilityMatrix;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Which source pays each cost position. `sources()[p]` is the source index
/// assigned to position `p`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Assignment {
    sources: Vec<usize>,
}

impl Assignment {
    pub fn from_sources(sources: Vec<usize>) -> Self {
        Assignment { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn sources(&self) -> &[usize] {
        &self.sources
    }

    pub fn source_for(&self, position: usize) -> Option<usize> {
        self.sources.get(position).copied()
    }

    /// `(position, source)` pairs in position order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.sources.iter().copied().enumerate()
    }

    /// Source index -> position index
    pub fn by_source(&self) -> BTreeMap<usize, usize> {
        self.pairs().map(|(position, source)| (source, position)).collect()
    }

    /// No source appears twice.
    pub fn is_injective(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.sources.len());
        self.sources.iter().all(|source| seen.insert(*source))
    }

    /// Total over the matrix's positions, injective, and every pair compatible.
    pub fn is_valid_for(&self, matrix: &CompatibilityMatrix) -> bool {
        self.sources.len() == matrix.positions()
            && self.is_injective()
            && self
                .pairs()
                .all(|(position, source)| matrix.get(source, position))
    }

    pub fn swap_positions(&mut self, a: usize, b: usize) {
        self.sources.swap(a, b);
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .pairs()
            .map(|(position, source)| format!("{}<-{}", position, source))
            .collect();
        write!(f, "[{}]", pairs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injectivity() {
        assert!(Assignment::from_sources(vec![3, 1, 4]).is_injective());
        assert!(!Assignment::from_sources(vec![3, 1, 3]).is_injective());
        assert!(Assignment::default().is_injective());
    }

    #[test]
    fn test_validity_against_matrix() {
        let matrix =
            CompatibilityMatrix::from_rows(vec![vec![true, false], vec![true, true]], 2).unwrap();

        assert!(Assignment::from_sources(vec![0, 1]).is_valid_for(&matrix));
        assert!(!Assignment::from_sources(vec![1, 0]).is_valid_for(&matrix));
        assert!(!Assignment::from_sources(vec![1, 1]).is_valid_for(&matrix));
        assert!(!Assignment::from_sources(vec![0]).is_valid_for(&matrix));
    }

    #[test]
    fn test_by_source() {
        let assignment = Assignment::from_sources(vec![3, 1]);
        let by_source = assignment.by_source();
        assert_eq!(by_source.get(&3), Some(&0));
        assert_eq!(by_source.get(&1), Some(&1));
        assert_eq!(assignment.to_string(), "[0<-3, 1<-1]");
    }
}
