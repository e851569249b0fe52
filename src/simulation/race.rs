use crate::card::{ManaSource, Symbol};
use crate::castable::{Caster, CastError, Strategy};
use crate::config::CastConfig;
use std::time::{Duration, Instant};

/// Wall-clock cost of one strategy on one instance
#[derive(Debug, Clone, PartialEq)]
pub struct RaceResult {
    pub strategy: Strategy,
    pub castable: bool,
    pub iterations: u32,
    pub total: Duration,
}

impl RaceResult {
    pub fn per_iteration(&self) -> Duration {
        self.total / self.iterations.max(1)
    }
}

/// Time every strategy on the same instance, `iterations` queries each.
pub fn race(
    sources: &[ManaSource],
    cost: &[Symbol],
    config: &CastConfig,
    iterations: u32,
) -> Result<Vec<RaceResult>, CastError> {
    let iterations = iterations.max(1);
    let mut caster = Caster::from_config(config);

    Strategy::ALL
        .iter()
        .map(|&strategy| -> Result<RaceResult, CastError> {
            let start = Instant::now();
            let mut castable = false;
            for _ in 0..iterations {
                castable = caster.solve_with(strategy, sources, cost)?.is_some();
            }
            Ok(RaceResult {
                strategy,
                castable,
                iterations,
                total: start.elapsed(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{parse_cost, parse_sources};

    #[test]
    fn test_race_reports_every_strategy() {
        let sources = parse_sources("BR,R,B,W,W,R").unwrap();
        let cost = parse_cost("WRWRB").unwrap();

        let results = race(&sources, &cost, &CastConfig::default(), 3).unwrap();
        assert_eq!(results.len(), Strategy::ALL.len());
        for result in &results {
            assert!(result.castable, "{} should cast", result.strategy);
            assert_eq!(result.iterations, 3);
            assert!(result.per_iteration() <= result.total);
        }
    }

    #[test]
    fn test_race_propagates_bound_errors() {
        let sources = parse_sources("W").unwrap();
        let cost = parse_cost("{11}").unwrap();
        assert!(race(&sources, &cost, &CastConfig::default(), 1).is_err());
    }
}
