use crate::Float;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Source of initial parameter values. `in_size` and `size` are the sizes of the
/// layers a parameter connects.
pub trait Initializer {
    fn get(&mut self, in_size: usize, size: usize) -> Float;
}

impl<T: Initializer + ?Sized> Initializer for &mut T {
    fn get(&mut self, in_size: usize, size: usize) -> Float {
        (**self).get(in_size, size)
    }
}

/// Independent draws from the standard normal distribution.
pub struct Normal {
    rng: SmallRng,
}

impl Normal {
    /// Seeds from system entropy.
    pub fn new() -> Normal {
        Normal {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Reproducible draws.
    pub fn seeded(seed: u64) -> Normal {
        Normal {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for Normal {
    fn default() -> Self {
        Self::new()
    }
}

impl Initializer for Normal {
    fn get(&mut self, _in_size: usize, _size: usize) -> Float {
        self.rng.sample::<Float, _>(StandardNormal)
    }
}

///Always initializes parameters to the same value
#[derive(Clone, Copy, Debug)]
pub struct Constant(pub Float);

impl Initializer for Constant {
    fn get(&mut self, _: usize, _: usize) -> Float {
        self.0
    }
}
