//! Can a set of mana sources pay a cost, each source paying one pip?
//!
//! Three strategies answer the same question from one [CompatibilityMatrix]:
//! a CNF reduction decided by a pluggable [SatBackend], a backtracking search
//! for a system of distinct representatives, and augmenting-path matching.
//! All three must agree on every input inside the configured bounds.

pub mod assignment;
pub mod backend;
pub mod encode;
pub mod error;
pub mod extract;
pub mod matching;
pub mod matrix;
pub mod rules;
pub mod sdr;

pub use assignment::Assignment;
pub use backend::{BatsatBackend, Model, SatBackend, SatOutcome};
pub use encode::{
    encode, Encoding, Formula, Literal, VariableLayout, DEFAULT_MAX_POSITIONS,
    DEFAULT_MAX_SOURCES,
};
pub use error::{BoundKind, CastError};
pub use extract::extract_assignment;
pub use matrix::CompatibilityMatrix;
pub use rules::{CompatibilityRules, StandardRules};

use crate::card::{ManaSource, Symbol};
use crate::config::CastConfig;
use crate::log::targets::ENCODING as LOG_ENCODING;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which solver answers a query
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// CNF reduction handed to the SAT backend
    #[default]
    Sat,
    /// Backtracking search for distinct representatives
    Sdr,
    /// Augmenting-path bipartite matching
    Matching,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Sat, Strategy::Sdr, Strategy::Matching];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sat => write!(f, "sat"),
            Strategy::Sdr => write!(f, "sdr"),
            Strategy::Matching => write!(f, "matching"),
        }
    }
}

/// Answers castability queries with fixed rules, backend and bounds.
///
/// Holds no per-query state; every call builds its own matrix and formula.
#[derive(Debug, Clone)]
pub struct Caster<R = StandardRules, B = BatsatBackend> {
    rules: R,
    backend: B,
    strategy: Strategy,
    max_sources: usize,
    max_positions: usize,
}

impl Caster {
    pub fn new() -> Self {
        Caster {
            rules: StandardRules::default(),
            backend: BatsatBackend::new(),
            strategy: Strategy::default(),
            max_sources: DEFAULT_MAX_SOURCES,
            max_positions: DEFAULT_MAX_POSITIONS,
        }
    }

    pub fn from_config(config: &CastConfig) -> Self {
        Caster {
            rules: config.rules(),
            backend: BatsatBackend::new(),
            strategy: config.strategy,
            max_sources: config.max_sources,
            max_positions: config.max_positions,
        }
    }
}

impl Default for Caster {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CompatibilityRules, B: SatBackend> Caster<R, B> {
    pub fn with_rules<R2: CompatibilityRules>(self, rules: R2) -> Caster<R2, B> {
        Caster {
            rules,
            backend: self.backend,
            strategy: self.strategy,
            max_sources: self.max_sources,
            max_positions: self.max_positions,
        }
    }

    pub fn with_backend<B2: SatBackend>(self, backend: B2) -> Caster<R, B2> {
        Caster {
            rules: self.rules,
            backend,
            strategy: self.strategy,
            max_sources: self.max_sources,
            max_positions: self.max_positions,
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_limits(mut self, max_sources: usize, max_positions: usize) -> Self {
        self.max_sources = max_sources;
        self.max_positions = max_positions;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn matrix(&self, sources: &[ManaSource], cost: &[Symbol]) -> CompatibilityMatrix {
        CompatibilityMatrix::build(sources, cost, &self.rules)
    }

    pub fn is_castable(&mut self, sources: &[ManaSource], cost: &[Symbol]) -> Result<bool, CastError> {
        self.find_assignment(sources, cost).map(|a| a.is_some())
    }

    /// A concrete payment, `None` when the cost cannot be paid.
    pub fn find_assignment(
        &mut self,
        sources: &[ManaSource],
        cost: &[Symbol],
    ) -> Result<Option<Assignment>, CastError> {
        self.solve_with(self.strategy, sources, cost)
    }

    pub fn solve_with(
        &mut self,
        strategy: Strategy,
        sources: &[ManaSource],
        cost: &[Symbol],
    ) -> Result<Option<Assignment>, CastError> {
        match strategy {
            Strategy::Sat => self.solve_sat(sources, cost),
            Strategy::Sdr => Ok(sdr::search(&self.matrix(sources, cost))),
            Strategy::Matching => Ok(matching::search(&self.matrix(sources, cost))),
        }
    }

    /// The constraint strategy. Bounds are checked before any clause is built;
    /// an empty cost is paid without consulting the backend.
    pub fn solve_sat(
        &mut self,
        sources: &[ManaSource],
        cost: &[Symbol],
    ) -> Result<Option<Assignment>, CastError> {
        if cost.is_empty() {
            return Ok(Some(Assignment::default()));
        }

        let layout = VariableLayout::new(
            sources.len(),
            cost.len(),
            self.max_sources,
            self.max_positions,
        )?;
        let matrix = self.matrix(sources, cost);

        let formula = match encode(&matrix, &layout) {
            Encoding::Formula(formula) => formula,
            Encoding::Uncoverable { position } => {
                log::debug!(
                    target: LOG_ENCODING,
                    "Cost symbol {} at position {} has no source",
                    cost[position],
                    position
                );
                return Ok(None);
            }
        };

        match self.backend.solve(&formula)? {
            SatOutcome::Satisfiable(model) => {
                extract_assignment(&model, &layout, &matrix).map(Some)
            }
            SatOutcome::Unsatisfiable => Ok(None),
        }
    }
}

/// Can `sources` pay `cost`? Default rules, BatSat, bounds of ten.
pub fn is_castable(sources: &[ManaSource], cost: &[Symbol]) -> Result<bool, CastError> {
    Caster::new().is_castable(sources, cost)
}

pub fn find_assignment(
    sources: &[ManaSource],
    cost: &[Symbol],
) -> Result<Option<Assignment>, CastError> {
    Caster::new().find_assignment(sources, cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{parse_cost, parse_sources};

    struct Unavailable;

    impl SatBackend for Unavailable {
        fn name(&self) -> &'static str {
            "unavailable"
        }

        fn solve(&mut self, _formula: &Formula) -> Result<SatOutcome, CastError> {
            Err(CastError::SolverUnavailable("no solver linked".to_string()))
        }
    }

    /// Claims every variable is true, which breaks exclusivity.
    struct Liar;

    impl SatBackend for Liar {
        fn name(&self) -> &'static str {
            "liar"
        }

        fn solve(&mut self, formula: &Formula) -> Result<SatOutcome, CastError> {
            Ok(SatOutcome::Satisfiable(Model::from_literals(
                (1..=formula.max_variable()).collect(),
            )))
        }
    }

    #[test]
    fn test_worked_example() {
        let sources = parse_sources("BR,R,B,W,W,R").unwrap();
        let cost = parse_cost("WRWRB").unwrap();

        let mut caster = Caster::new();
        let assignment = caster.find_assignment(&sources, &cost).unwrap().unwrap();
        assert!(assignment.is_valid_for(&caster.matrix(&sources, &cost)));

        for strategy in Strategy::ALL {
            assert!(caster.solve_with(strategy, &sources, &cost).unwrap().is_some());
        }
    }

    #[test]
    fn test_free_functions() {
        let sources = parse_sources("W").unwrap();
        assert_eq!(is_castable(&sources, &parse_cost("WW").unwrap()), Ok(false));
        assert_eq!(
            find_assignment(&sources, &parse_cost("W").unwrap()),
            Ok(Some(Assignment::from_sources(vec![0])))
        );
    }

    #[test]
    fn test_solver_unavailable_is_not_infeasible() {
        let sources = parse_sources("W,W").unwrap();
        let cost = parse_cost("WW").unwrap();
        let mut caster = Caster::new().with_backend(Unavailable);

        assert_eq!(
            caster.is_castable(&sources, &cost),
            Err(CastError::SolverUnavailable("no solver linked".to_string()))
        );
        // the other strategies never touch the backend
        assert_eq!(caster.solve_with(Strategy::Sdr, &sources, &cost).map(|a| a.is_some()), Ok(true));
    }

    #[test]
    fn test_uncoverable_skips_backend() {
        let sources = parse_sources("W,W").unwrap();
        let cost = parse_cost("WB").unwrap();
        let mut caster = Caster::new().with_backend(Unavailable);
        assert_eq!(caster.is_castable(&sources, &cost), Ok(false));
    }

    #[test]
    fn test_malformed_model_is_failure() {
        let sources = parse_sources("W,W").unwrap();
        let cost = parse_cost("WW").unwrap();
        let mut caster = Caster::new().with_backend(Liar);
        assert!(matches!(
            caster.is_castable(&sources, &cost),
            Err(CastError::SolverFailure(_))
        ));
    }

    #[test]
    fn test_bounds_checked_before_solving() {
        let sources = parse_sources("W").unwrap();
        let cost = parse_cost("11").unwrap();
        let mut caster = Caster::new().with_backend(Unavailable);

        assert_eq!(
            caster.is_castable(&sources, &cost),
            Err(CastError::InputOutOfBounds {
                what: BoundKind::Positions,
                len: 11,
                max: 10
            })
        );
    }

    #[test]
    fn test_wider_limits() {
        let sources = parse_sources(&vec!["W"; 12].join(",")).unwrap();
        let cost = parse_cost("WWWWWWWWWWWW").unwrap();

        assert!(matches!(
            Caster::new().is_castable(&sources, &cost),
            Err(CastError::InputOutOfBounds { .. })
        ));
        assert_eq!(
            Caster::new().with_limits(16, 16).is_castable(&sources, &cost),
            Ok(true)
        );
    }

    #[test]
    fn test_custom_rules() {
        let sources = parse_sources("W").unwrap();
        let cost = parse_cost("B").unwrap();
        let everything = |_: &ManaSource, _: Symbol| true;

        assert_eq!(Caster::new().is_castable(&sources, &cost), Ok(false));
        assert_eq!(
            Caster::new().with_rules(everything).is_castable(&sources, &cost),
            Ok(true)
        );
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::Matching.to_string(), "matching");
        assert_eq!(
            serde_json::from_str::<Strategy>(r#""sdr""#).unwrap(),
            Strategy::Sdr
        );
    }
}
