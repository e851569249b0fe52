pub mod crossval;
pub mod race;

pub use crossval::{run_crossval, run_trial, CrossvalParams, CrossvalReport, Instance};
pub use race::{race, RaceResult};
