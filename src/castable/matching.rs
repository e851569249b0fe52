//! Augmenting-path bipartite matching (Kuhn), polynomial in the matrix size.

use crate::castable::assignment::Assignment;
use crate::castable::matrix::CompatibilityMatrix;
use crate::log::targets::MATCHING as LOG_MATCHING;

struct Matcher<'a> {
    columns: &'a [Vec<usize>],
    /// position currently paid by each source
    position_of: Vec<Option<usize>>,
    visited: Vec<bool>,
}

impl Matcher<'_> {
    fn augment(&mut self, position: usize) -> bool {
        let columns = self.columns;
        for &source in &columns[position] {
            if self.visited[source] {
                continue;
            }
            self.visited[source] = true;

            let free = match self.position_of[source] {
                None => true,
                Some(other) => self.augment(other),
            };
            if free {
                self.position_of[source] = Some(position);
                return true;
            }
        }
        false
    }
}

/// A maximum matching saturating every position, if one exists.
pub fn search(matrix: &CompatibilityMatrix) -> Option<Assignment> {
    let columns = matrix.column_sets();
    let mut matcher = Matcher {
        columns: &columns,
        position_of: vec![None; matrix.sources()],
        visited: vec![false; matrix.sources()],
    };

    for position in 0..columns.len() {
        matcher.visited.iter_mut().for_each(|v| *v = false);
        if !matcher.augment(position) {
            log::trace!(target: LOG_MATCHING, "No augmenting path for position {position}");
            return None;
        }
    }

    let mut sources = vec![0; columns.len()];
    for (source, position) in matcher.position_of.iter().enumerate() {
        if let Some(position) = position {
            sources[*position] = source;
        }
    }
    Some(Assignment::from_sources(sources))
}

pub fn is_feasible(matrix: &CompatibilityMatrix) -> bool {
    search(matrix).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reroutes_earlier_choice() {
        // position 0 first grabs source 0, position 1 needs it back
        let m = CompatibilityMatrix::from_rows(vec![vec![true, true], vec![true, false]], 2)
            .unwrap();
        let assignment = search(&m).unwrap();
        assert_eq!(assignment.sources(), &[1, 0]);
        assert!(assignment.is_valid_for(&m));
    }

    #[test]
    fn test_pigeonhole() {
        let m = CompatibilityMatrix::from_rows(vec![vec![true; 3]; 2], 3).unwrap();
        assert!(!is_feasible(&m));
    }

    #[test]
    fn test_empty_cost() {
        let m = CompatibilityMatrix::from_rows(Vec::new(), 0).unwrap();
        assert_eq!(search(&m), Some(Assignment::default()));
    }
}
