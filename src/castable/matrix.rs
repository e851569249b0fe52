use crate::card::{ManaSource, Symbol};
use crate::castable::rules::CompatibilityRules;
use crate::log::targets::MATRIX as LOG_MATRIX;
use std::fmt;

/// Which source can pay which cost position.
///
/// Rows are source indices, columns are cost positions. The matrix is built
/// once per query and exposes no mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityMatrix {
    rows: Vec<Vec<bool>>,
    positions: usize,
}

impl CompatibilityMatrix {
    pub fn build<R>(sources: &[ManaSource], cost: &[Symbol], rules: &R) -> Self
    where
        R: CompatibilityRules + ?Sized,
    {
        let rows: Vec<Vec<bool>> = sources
            .iter()
            .map(|source| {
                cost.iter()
                    .map(|symbol| rules.can_supply(source, *symbol))
                    .collect()
            })
            .collect();

        log::trace!(target: LOG_MATRIX, "Built {}x{} matrix", rows.len(), cost.len());

        CompatibilityMatrix {
            rows,
            positions: cost.len(),
        }
    }

    /// Build directly from 0/1 rows. Every row must have `positions` entries.
    pub fn from_rows(rows: Vec<Vec<bool>>, positions: usize) -> Option<Self> {
        if rows.iter().any(|row| row.len() != positions) {
            return None;
        }
        Some(CompatibilityMatrix { rows, positions })
    }

    pub fn sources(&self) -> usize {
        self.rows.len()
    }

    pub fn positions(&self) -> usize {
        self.positions
    }

    #[inline]
    pub fn get(&self, source: usize, position: usize) -> bool {
        self.rows
            .get(source)
            .and_then(|row| row.get(position))
            .copied()
            .unwrap_or(false)
    }

    pub fn row(&self, source: usize) -> &[bool] {
        &self.rows[source]
    }

    /// For each position, the ascending indices of the sources that can pay it.
    pub fn column_sets(&self) -> Vec<Vec<usize>> {
        (0..self.positions)
            .map(|position| {
                (0..self.rows.len())
                    .filter(|&source| self.rows[source][position])
                    .collect()
            })
            .collect()
    }

    /// The first position no source can pay, if any.
    pub fn uncoverable_position(&self) -> Option<usize> {
        (0..self.positions).find(|&position| self.rows.iter().all(|row| !row[position]))
    }
}

impl fmt::Display for CompatibilityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.rows.iter().enumerate() {
            write!(f, "{:>3} |", idx)?;
            for &bit in row {
                write!(f, " {}", u8::from(bit))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{parse_cost, parse_sources};
    use crate::castable::rules::StandardRules;

    #[test]
    fn test_dimensions() {
        let sources = parse_sources("BR,R,B,W,W,R").unwrap();
        let cost = parse_cost("WRWRB").unwrap();
        let matrix = CompatibilityMatrix::build(&sources, &cost, &StandardRules::default());

        assert_eq!(matrix.sources(), 6);
        assert_eq!(matrix.positions(), 5);
        for source in 0..matrix.sources() {
            assert_eq!(matrix.row(source).len(), 5);
        }
    }

    #[test]
    fn test_column_sets() {
        let sources = parse_sources("BR,R,B,W,W,R").unwrap();
        let cost = parse_cost("WRWRB").unwrap();
        let matrix = CompatibilityMatrix::build(&sources, &cost, &StandardRules::default());

        assert_eq!(
            matrix.column_sets(),
            vec![
                vec![3, 4],
                vec![0, 1, 5],
                vec![3, 4],
                vec![0, 1, 5],
                vec![0, 2],
            ]
        );
        assert_eq!(matrix.uncoverable_position(), None);
    }

    #[test]
    fn test_generic_column_is_full() {
        let sources = parse_sources("W,B,G").unwrap();
        let cost = parse_cost("1U").unwrap();
        let matrix = CompatibilityMatrix::build(&sources, &cost, &StandardRules::default());

        assert_eq!(matrix.column_sets()[0], vec![0, 1, 2]);
        assert_eq!(matrix.uncoverable_position(), Some(1));
    }

    #[test]
    fn test_empty_inputs() {
        let rules = StandardRules::default();
        let cost = parse_cost("WW").unwrap();

        let no_sources = CompatibilityMatrix::build(&[], &cost, &rules);
        assert_eq!(no_sources.sources(), 0);
        assert_eq!(no_sources.column_sets(), vec![Vec::<usize>::new(), Vec::new()]);
        assert_eq!(no_sources.uncoverable_position(), Some(0));

        let sources = parse_sources("W").unwrap();
        let no_cost = CompatibilityMatrix::build(&sources, &[], &rules);
        assert_eq!(no_cost.positions(), 0);
        assert!(no_cost.column_sets().is_empty());
        assert_eq!(no_cost.uncoverable_position(), None);
    }

    #[test]
    fn test_from_rows_checks_width() {
        assert!(CompatibilityMatrix::from_rows(vec![vec![true], vec![true, false]], 2).is_none());
        let matrix = CompatibilityMatrix::from_rows(vec![vec![true, false]], 2).unwrap();
        assert!(matrix.get(0, 0));
        assert!(!matrix.get(0, 1));
        assert!(!matrix.get(7, 0));
    }

    #[test]
    fn test_display() {
        let matrix = CompatibilityMatrix::from_rows(vec![vec![true, false]], 2).unwrap();
        assert_eq!(matrix.to_string(), "  0 | 1 0\n");
    }
}
