//! SAT solvers the constraint strategy can hand a [Formula] to.

use crate::castable::encode::{Formula, Literal};
use crate::castable::error::CastError;
use crate::log::targets::BACKEND as LOG_BACKEND;
use rustsat::solvers::{Solve, SolverResult};
use rustsat::types::{Clause, Lit, TernaryVal};
use std::collections::BTreeSet;

/// A satisfying assignment as signed literals, one per variable occurring in
/// the solved formula, in ascending variable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    literals: Vec<Literal>,
}

impl Model {
    pub fn from_literals(literals: Vec<Literal>) -> Self {
        Model { literals }
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Variables set to true
    pub fn positive(&self) -> impl Iterator<Item = Literal> + '_ {
        self.literals.iter().copied().filter(|l| *l > 0)
    }

    pub fn value(&self, variable: Literal) -> Option<bool> {
        self.literals
            .iter()
            .find(|l| l.abs() == variable)
            .map(|l| *l > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatOutcome {
    Satisfiable(Model),
    Unsatisfiable,
}

/// Anything that can decide a CNF formula.
///
/// Errors mean the backend could not answer; they are never a stand-in for
/// `Unsatisfiable`.
pub trait SatBackend {
    fn name(&self) -> &'static str;

    fn solve(&mut self, formula: &Formula) -> Result<SatOutcome, CastError>;
}

impl<B: SatBackend + ?Sized> SatBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&mut self, formula: &Formula) -> Result<SatOutcome, CastError> {
        (**self).solve(formula)
    }
}

impl<B: SatBackend + ?Sized> SatBackend for &mut B {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&mut self, formula: &Formula) -> Result<SatOutcome, CastError> {
        (**self).solve(formula)
    }
}

/// BatSat through the rustsat `Solve` interface. A fresh solver is created
/// for every formula.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatsatBackend;

impl BatsatBackend {
    pub fn new() -> Self {
        BatsatBackend
    }
}

fn to_lit(literal: Literal) -> Result<Lit, CastError> {
    if literal == 0 {
        return Err(CastError::SolverFailure("literal 0 in clause".to_string()));
    }
    let lit = Lit::positive(literal.unsigned_abs() - 1);
    Ok(if literal < 0 { !lit } else { lit })
}

impl SatBackend for BatsatBackend {
    fn name(&self) -> &'static str {
        "batsat"
    }

    fn solve(&mut self, formula: &Formula) -> Result<SatOutcome, CastError> {
        let mut solver = rustsat_batsat::BasicSolver::default();

        for literals in formula.clauses() {
            let clause = literals
                .iter()
                .map(|l| to_lit(*l))
                .collect::<Result<Clause, _>>()?;
            solver
                .add_clause(clause)
                .map_err(|e| CastError::SolverFailure(e.to_string()))?;
        }

        let result = solver
            .solve()
            .map_err(|e| CastError::SolverFailure(e.to_string()))?;

        log::trace!(
            target: LOG_BACKEND,
            "{} answered {:?} for {} clauses",
            self.name(),
            result,
            formula.len()
        );

        match result {
            SolverResult::Sat => {
                let occurring: BTreeSet<Literal> = formula
                    .clauses()
                    .iter()
                    .flatten()
                    .map(|l| l.abs())
                    .collect();
                let mut literals = Vec::with_capacity(occurring.len());
                for variable in occurring {
                    let value = solver
                        .lit_val(to_lit(variable)?)
                        .map_err(|e| CastError::SolverFailure(e.to_string()))?;
                    match value {
                        TernaryVal::True => literals.push(variable),
                        TernaryVal::False | TernaryVal::DontCare => literals.push(-variable),
                    }
                }
                Ok(SatOutcome::Satisfiable(Model::from_literals(literals)))
            }
            SolverResult::Unsat => Ok(SatOutcome::Unsatisfiable),
            other => Err(CastError::SolverFailure(format!(
                "unexpected solver result {:?}",
                other
            ))),
        }
    }
}
