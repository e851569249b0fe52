//! Reduction of a compatibility matrix to CNF.
//!
//! Variable `x[s][p]` (source `s` pays position `p`) gets the id
//! `s * stride + p + 1`, where `stride` is the configured position bound. The
//! pairing is injective as long as `p < stride`, which [VariableLayout::new]
//! checks before any clause exists.

use crate::castable::error::{BoundKind, CastError};
use crate::castable::matrix::CompatibilityMatrix;
use crate::log::targets::ENCODING as LOG_ENCODING;
use std::fmt::Write;

/// Costs longer than this are outside the supported range.
pub const DEFAULT_MAX_POSITIONS: usize = 10;

pub const DEFAULT_MAX_SOURCES: usize = 10;

/// A signed variable id, DIMACS style: positive for the variable, negative for
/// its negation. Zero is never a literal.
pub type Literal = i32;

/// Checked pairing between (source, position) and variable ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableLayout {
    sources: usize,
    positions: usize,
    stride: usize,
}

impl VariableLayout {
    pub fn new(
        sources: usize,
        positions: usize,
        max_sources: usize,
        max_positions: usize,
    ) -> Result<Self, CastError> {
        if positions > max_positions {
            return Err(CastError::InputOutOfBounds {
                what: BoundKind::Positions,
                len: positions,
                max: max_positions,
            });
        }
        if sources > max_sources {
            return Err(CastError::InputOutOfBounds {
                what: BoundKind::Sources,
                len: sources,
                max: max_sources,
            });
        }

        let limit = Literal::MAX as usize;
        match max_sources.checked_mul(max_positions) {
            Some(space) if space <= limit => {}
            _ => {
                return Err(CastError::InputOutOfBounds {
                    what: BoundKind::Variables,
                    len: max_sources.saturating_mul(max_positions),
                    max: limit,
                })
            }
        }

        Ok(VariableLayout {
            sources,
            positions,
            stride: max_positions.max(1),
        })
    }

    pub fn sources(&self) -> usize {
        self.sources
    }

    pub fn positions(&self) -> usize {
        self.positions
    }

    #[inline]
    pub fn variable(&self, source: usize, position: usize) -> Literal {
        debug_assert!(source < self.sources && position < self.positions);
        (source * self.stride + position + 1) as Literal
    }

    /// Inverse of [VariableLayout::variable]; `None` for ids outside the layout.
    pub fn decode(&self, variable: Literal) -> Option<(usize, usize)> {
        if variable <= 0 {
            return None;
        }
        let idx = variable as usize - 1;
        let (source, position) = (idx / self.stride, idx % self.stride);
        if source < self.sources && position < self.positions {
            Some((source, position))
        } else {
            None
        }
    }

    /// Largest id the layout can produce, zero when it has no cells.
    pub fn max_variable(&self) -> Literal {
        if self.sources == 0 || self.positions == 0 {
            return 0;
        }
        self.variable(self.sources - 1, self.positions - 1)
    }
}

/// Clauses in conjunctive normal form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formula {
    clauses: Vec<Vec<Literal>>,
    max_variable: Literal,
}

impl Formula {
    pub fn new() -> Self {
        Formula::default()
    }

    pub fn add_clause(&mut self, clause: Vec<Literal>) {
        if let Some(max) = clause.iter().map(|l| l.abs()).max() {
            self.max_variable = self.max_variable.max(max);
        }
        self.clauses.push(clause);
    }

    pub fn clauses(&self) -> &[Vec<Literal>] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn max_variable(&self) -> Literal {
        self.max_variable
    }

    pub fn to_dimacs(&self) -> String {
        let mut out = format!("p cnf {} {}\n", self.max_variable, self.clauses.len());
        for clause in &self.clauses {
            for literal in clause {
                let _ = write!(out, "{} ", literal);
            }
            out.push_str("0\n");
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding {
    Formula(Formula),
    /// No source can pay this position; the coverage clause would be empty.
    Uncoverable { position: usize },
}

pub fn encode(matrix: &CompatibilityMatrix, layout: &VariableLayout) -> Encoding {
    if let Some(position) = matrix.uncoverable_position() {
        log::debug!(target: LOG_ENCODING, "Position {position} has no compatible source");
        return Encoding::Uncoverable { position };
    }

    let mut formula = Formula::new();
    coverage_clauses(matrix, layout, &mut formula);
    exclusivity_clauses(matrix, layout, &mut formula);
    compatibility_clauses(matrix, layout, &mut formula);

    log::debug!(
        target: LOG_ENCODING,
        "Encoded {}x{} matrix as {} clauses over {} variables",
        matrix.sources(),
        matrix.positions(),
        formula.len(),
        formula.max_variable()
    );

    Encoding::Formula(formula)
}

/// Every position is paid by at least one compatible source.
fn coverage_clauses(matrix: &CompatibilityMatrix, layout: &VariableLayout, formula: &mut Formula) {
    for position in 0..matrix.positions() {
        let clause: Vec<Literal> = (0..matrix.sources())
            .filter(|&source| matrix.get(source, position))
            .map(|source| layout.variable(source, position))
            .collect();
        formula.add_clause(clause);
    }
}

/// No source pays two positions. One clause per unordered pair.
fn exclusivity_clauses(
    matrix: &CompatibilityMatrix,
    layout: &VariableLayout,
    formula: &mut Formula,
) {
    for source in 0..matrix.sources() {
        for position in 0..matrix.positions() {
            for other in position + 1..matrix.positions() {
                formula.add_clause(vec![
                    -layout.variable(source, position),
                    -layout.variable(source, other),
                ]);
            }
        }
    }
}

/// Incompatible pairs are false, so any model only names real payments.
fn compatibility_clauses(
    matrix: &CompatibilityMatrix,
    layout: &VariableLayout,
    formula: &mut Formula,
) {
    for source in 0..matrix.sources() {
        for position in 0..matrix.positions() {
            if !matrix.get(source, position) {
                formula.add_clause(vec![-layout.variable(source, position)]);
            }
        }
    }
}
