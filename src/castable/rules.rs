use crate::card::{ManaSource, Symbol};
use serde::{Deserialize, Serialize};

/// Decides whether one source can supply one cost symbol.
///
/// Implementations must be pure: the matrix builder calls this once per
/// (source, position) pair and assumes the answer never changes.
pub trait CompatibilityRules {
    fn can_supply(&self, source: &ManaSource, symbol: Symbol) -> bool;
}

impl<F> CompatibilityRules for F
where
    F: Fn(&ManaSource, Symbol) -> bool,
{
    fn can_supply(&self, source: &ManaSource, symbol: Symbol) -> bool {
        self(source, symbol)
    }
}

/// Membership plus the generic wildcard.
///
/// A generic pip in the cost can be paid by any source. When
/// `generic_source_is_wildcard` is set, a source that offers the generic symbol
/// can also pay any colored pip (an "any color" land); when it is cleared such a
/// source only matches generic pips, like every other source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardRules {
    pub generic_source_is_wildcard: bool,
}

impl StandardRules {
    pub fn strict() -> Self {
        StandardRules {
            generic_source_is_wildcard: false,
        }
    }
}

impl Default for StandardRules {
    fn default() -> Self {
        StandardRules {
            generic_source_is_wildcard: true,
        }
    }
}

impl CompatibilityRules for StandardRules {
    #[inline]
    fn can_supply(&self, source: &ManaSource, symbol: Symbol) -> bool {
        if symbol.is_generic() || source.offers(symbol) {
            return true;
        }
        self.generic_source_is_wildcard && source.offers(Symbol::Generic)
    }
}
