use rand::{Rng, SeedableRng, rngs::StdRng};

enum Source {
    Std(StdRng),
    Custom(Box<dyn FnMut() -> f64 + Send>),
}

/// The random source every roll draws from.
///
/// Either a [`StdRng`] (OS-seeded or seeded explicitly) or an injected function
/// producing floats in `[0, 1)`. Everything above this type only ever asks for
/// [`Roller::random_int`] or [`Roller::d`], so an injected function fully
/// determines the outcome of a roll.
pub struct Roller {
    source: Source,
}

impl std::fmt::Debug for Roller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Source::Std(rng) => f.debug_struct("Roller").field("rng", rng).finish(),
            Source::Custom(_) => f.debug_struct("Roller").field("rng", &"<custom>").finish(),
        }
    }
}

impl Roller {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let rng = StdRng::from_os_rng();
        Roller {
            source: Source::Std(rng),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        Roller {
            source: Source::Std(rng),
        }
    }

    /// Wraps a function returning floats in `[0, 1)`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut() -> f64 + Send + 'static,
    {
        Roller {
            source: Source::Custom(Box::new(f)),
        }
    }

    /// Cycles through `values` forever. Handy for pinning down exact rolls.
    pub fn from_sequence(values: impl IntoIterator<Item = f64>) -> Self {
        let values: Vec<f64> = values.into_iter().collect();
        let mut index = 0;
        Self::from_fn(move || {
            if values.is_empty() {
                return 0.0;
            }
            let value = values[index % values.len()];
            index += 1;
            value
        })
    }

    /// An independent [`StdRng`]-backed roller seeded from this one.
    pub fn fork(&mut self) -> Self {
        let mut seed = [0u8; 32];
        match &mut self.source {
            Source::Std(rng) => rng.fill(&mut seed),
            Source::Custom(f) => {
                for chunk in seed.chunks_mut(8) {
                    let bits = (f() * u64::MAX as f64) as u64;
                    chunk.copy_from_slice(&bits.to_le_bytes());
                }
            }
        }
        Roller {
            source: Source::Std(StdRng::from_seed(seed)),
        }
    }

    pub fn random_float(&mut self) -> f64 {
        match &mut self.source {
            Source::Std(rng) => rng.random::<f64>(),
            Source::Custom(f) => f(),
        }
    }

    /// A value in `[0, max)`. Returns 0 for `max == 0`.
    pub fn random_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        let value = (self.random_float() * max as f64).floor();
        // injected sources are not trusted to stay inside [0, 1)
        value.clamp(0.0, (max - 1) as f64) as u32
    }

    /// A single die face in `[1, sides]`.
    pub fn d(&mut self, sides: u32) -> i64 {
        self.random_int(sides) as i64 + 1
    }

    pub fn spread_rolls(&mut self, quantity: u32, max: u32) -> Vec<i64> {
        (0..quantity).map(|_| self.d(max)).collect()
    }

    #[cfg(test)]
    pub fn test_rng() -> Self {
        Self::from_seed(42)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d_stays_in_range() {
        let mut rng = Roller::test_rng();
        for _ in 0..10000 {
            let value = rng.d(6);
            assert!((1..=6).contains(&value));
        }
    }

    #[test]
    fn test_random_int_from_fn() {
        let mut rng = Roller::from_sequence([0.0, 0.25, 0.5, 0.75, 0.999]);
        let values: Vec<u32> = (0..5).map(|_| rng.random_int(4)).collect();
        assert_eq!(values, vec![0, 1, 2, 3, 3]);
    }

    #[test]
    fn test_misbehaving_source_is_clamped() {
        let mut rng = Roller::from_sequence([1.0, -0.5, 7.0]);
        assert_eq!(rng.d(6), 6);
        assert_eq!(rng.d(6), 1);
        assert_eq!(rng.d(6), 6);
    }

    #[test]
    fn test_zero_max() {
        let mut rng = Roller::test_rng();
        assert_eq!(rng.random_int(0), 0);
    }

    #[test]
    fn test_spread_rolls() {
        let mut rng = Roller::from_sequence([0.0, 0.25, 0.5, 0.75]);
        assert_eq!(rng.spread_rolls(4, 4), vec![1, 2, 3, 4]);
        assert!(rng.spread_rolls(0, 4).is_empty());
    }

    #[test]
    fn test_seeded_rollers_agree() {
        let mut a = Roller::from_seed(7);
        let mut b = Roller::from_seed(7);
        assert_eq!(a.spread_rolls(20, 20), b.spread_rolls(20, 20));
    }

    #[test]
    fn test_fork_is_deterministic_for_seeded_parent() {
        let mut a = Roller::from_seed(7);
        let mut b = Roller::from_seed(7);
        let mut fa = a.fork();
        let mut fb = b.fork();
        assert_eq!(fa.spread_rolls(10, 100), fb.spread_rolls(10, 100));
    }
}
