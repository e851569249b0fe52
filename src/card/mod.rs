pub mod database;
pub mod pool;
pub mod types;

pub use database::{LandCard, LandDatabase, LandDatabaseError};
pub use pool::{parse_pool, parse_pool_file, LandPoolError};
pub use types::{
    parse_cost, parse_sources, ManaColor, ManaCost, ManaSource, Symbol, SymbolParseError,
    SymbolSet,
};
