//! Log targets, so `RUST_LOG=mana_castable::sdr=trace` style filters line up
//! with the component that emitted a record.

pub mod targets {
    pub const MATRIX: &str = "mana_castable::matrix";
    pub const ENCODING: &str = "mana_castable::encoding";
    pub const BACKEND: &str = "mana_castable::backend";
    pub const EXTRACTION: &str = "mana_castable::extraction";
    pub const SDR: &str = "mana_castable::sdr";
    pub const MATCHING: &str = "mana_castable::matching";
    pub const CROSSVAL: &str = "mana_castable::crossval";
}
