//! Randomized agreement check between the solving strategies.

use crate::card::{ManaSource, Symbol};
use crate::castable::{Caster, CastError, Strategy};
use crate::config::CastConfig;
use crate::log::targets::CROSSVAL as LOG_CROSSVAL;
use crate::rng::InstanceRng;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossvalParams {
    pub trials: usize,
    pub seed: u64,
    pub max_sources: usize,
    pub max_cost: usize,
    pub max_colors: usize,
    pub generic_weight: f64,
}

impl Default for CrossvalParams {
    fn default() -> Self {
        CrossvalParams {
            trials: 1000,
            seed: 0,
            max_sources: 8,
            max_cost: 6,
            max_colors: 2,
            generic_weight: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instance {
    pub sources: Vec<ManaSource>,
    pub cost: Vec<Symbol>,
}

/// Draw one instance. Sizes are uniform in `0..=max`.
pub fn random_instance(rng: &mut InstanceRng, params: &CrossvalParams) -> Instance {
    let source_count = rng.random_range(params.max_sources + 1);
    let cost_len = rng.random_range(params.max_cost + 1);

    let sources = (0..source_count)
        .map(|_| rng.source(params.max_colors, params.generic_weight))
        .collect();
    let cost = (0..cost_len)
        .map(|_| rng.symbol(params.generic_weight))
        .collect();

    Instance { sources, cost }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialOutcome {
    pub seed: u64,
    pub sat: bool,
    pub sdr: bool,
    pub matching: bool,
}

impl TrialOutcome {
    pub fn agrees(&self) -> bool {
        self.sat == self.sdr && self.sdr == self.matching
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disagreement {
    pub outcome: TrialOutcome,
    pub instance: Instance,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrossvalReport {
    pub generated_at: DateTime<Utc>,
    pub trials: usize,
    pub seed: u64,
    pub castable: usize,
    pub uncastable: usize,
    pub elapsed_ms: u128,
    pub disagreements: Vec<Disagreement>,
}

impl CrossvalReport {
    pub fn all_agree(&self) -> bool {
        self.disagreements.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Solve one seeded instance with every strategy.
pub fn run_trial(
    seed: u64,
    params: &CrossvalParams,
    config: &CastConfig,
) -> Result<(TrialOutcome, Instance), CastError> {
    let mut rng = InstanceRng::new(Some(seed));
    let instance = random_instance(&mut rng, params);
    let mut caster = Caster::from_config(config);

    let mut answer = |strategy| {
        caster
            .solve_with(strategy, &instance.sources, &instance.cost)
            .map(|a| a.is_some())
    };

    let outcome = TrialOutcome {
        seed,
        sat: answer(Strategy::Sat)?,
        sdr: answer(Strategy::Sdr)?,
        matching: answer(Strategy::Matching)?,
    };

    Ok((outcome, instance))
}

/// Run `params.trials` trials in parallel. Trial `i` uses seed
/// `params.seed + i`, so a report is reproducible regardless of scheduling.
pub fn run_crossval(
    params: &CrossvalParams,
    config: &CastConfig,
    show_progress: bool,
) -> Result<CrossvalReport, CastError> {
    let start = std::time::Instant::now();

    let progress = if show_progress {
        let bar = ProgressBar::new(params.trials as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} trials",
        ) {
            bar.set_style(style);
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<(TrialOutcome, Instance)> = (0..params.trials)
        .into_par_iter()
        .map(|i| {
            let result = run_trial(params.seed.wrapping_add(i as u64), params, config);
            progress.inc(1);
            result
        })
        .collect::<Result<_, _>>()?;

    progress.finish_and_clear();

    let castable = results.iter().filter(|(o, _)| o.sat).count();
    let disagreements: Vec<Disagreement> = results
        .into_iter()
        .filter(|(outcome, _)| !outcome.agrees())
        .map(|(outcome, instance)| {
            log::warn!(target: LOG_CROSSVAL, "Strategies disagree on seed {}", outcome.seed);
            Disagreement { outcome, instance }
        })
        .collect();

    let report = CrossvalReport {
        generated_at: Utc::now(),
        trials: params.trials,
        seed: params.seed,
        castable,
        uncastable: params.trials - castable,
        elapsed_ms: start.elapsed().as_millis(),
        disagreements,
    };

    log::info!(
        target: LOG_CROSSVAL,
        "{} trials, {} castable, {} disagreements",
        report.trials,
        report.castable,
        report.disagreements.len()
    );

    Ok(report)
}
