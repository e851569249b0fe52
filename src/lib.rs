pub mod card;
pub mod castable;
pub mod config;
pub mod log;
pub mod rng;
pub mod simulation;

pub use castable::{find_assignment, is_castable, Assignment, CastError, Caster, Strategy};
pub use config::CastConfig;

#[cfg(test)]
mod integration_tests;
