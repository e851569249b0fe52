use crate::card::{ManaColor, ManaSource, Symbol, SymbolSet};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded random number generator for reproducible instances
#[derive(Clone)]
pub struct InstanceRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl InstanceRng {
    /// Create a new InstanceRng with an optional seed
    /// If seed is None, generates a random seed
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            use rand::thread_rng;
            thread_rng().gen()
        });

        let rng = ChaCha8Rng::seed_from_u64(seed);
        InstanceRng { rng, seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random number in range [0, 1)
    pub fn random(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Generate a random integer in range [0, max)
    pub fn random_range(&mut self, max: usize) -> usize {
        self.rng.gen_range(0..max)
    }

    /// One of the five colors, never colorless
    pub fn color(&mut self) -> ManaColor {
        ManaColor::ALL[self.random_range(5)]
    }

    /// A cost symbol that is generic with probability `generic_weight`
    pub fn symbol(&mut self, generic_weight: f64) -> Symbol {
        if self.random() < generic_weight {
            Symbol::Generic
        } else {
            Symbol::Color(self.color())
        }
    }

    /// A source offering one to `max_colors` colors, or the generic symbol
    /// with probability `generic_weight`
    pub fn source(&mut self, max_colors: usize, generic_weight: f64) -> ManaSource {
        let mut produces = SymbolSet::new();
        if self.random() < generic_weight {
            produces.insert(Symbol::Generic);
            return ManaSource::new(produces);
        }

        let colors = 1 + self.random_range(max_colors.max(1));
        for _ in 0..colors {
            produces.insert(Symbol::Color(self.color()));
        }
        ManaSource::new(produces)
    }
}
