//! Layer sampler (spec.md §4.D): draws a new node's top layer from a
//! geometric distribution parameterized by the level factor `mL`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draw a layer from the geometric distribution described in spec.md
/// §4.D: starting at layer 0, keep climbing while a fresh `U[0, 1)` draw
/// stays under `m_l`; return the layer reached on the first draw that
/// doesn't.
pub fn sample_layer(rng: &mut impl Rng, m_l: f64) -> usize {
    let mut layer = 0usize;
    loop {
        let u: f64 = rng.random::<f64>();
        if u < m_l {
            layer += 1;
        } else {
            break;
        }
    }
    layer
}

/// Stateful wrapper around [`sample_layer`] that owns the RNG threaded
/// through a build (spec.md §9: the global lazily-seeded PRNG becomes an
/// injectable parameter rather than shared process-wide state).
#[derive(Debug, Clone)]
pub struct LayerSampler {
    rng: StdRng,
}

impl LayerSampler {
    /// A sampler seeded from OS entropy, nondeterministic, matching the
    /// spec's default contract.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A sampler seeded deterministically, for reproducible builds and
    /// tests (spec.md §4.D's seed-override hook).
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sample a layer for the given level factor.
    pub fn sample(&mut self, m_l: f64) -> usize {
        sample_layer(&mut self.rng, m_l)
    }
}

impl Default for LayerSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sampler_is_deterministic() {
        let mut a = LayerSampler::with_seed(42);
        let mut b = LayerSampler::with_seed(42);
        let m_l = 1.0 / (16f64).ln();
        let draws_a: Vec<usize> = (0..200).map(|_| a.sample(m_l)).collect();
        let draws_b: Vec<usize> = (0..200).map(|_| b.sample(m_l)).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn layer_zero_is_far_more_common_than_higher_layers() {
        let mut sampler = LayerSampler::with_seed(7);
        let m_l = 1.0 / (16f64).ln();
        let mut layer_zero = 0;
        let trials = 5000;
        for _ in 0..trials {
            if sampler.sample(m_l) == 0 {
                layer_zero += 1;
            }
        }
        // With m_l ~ 0.36, P(layer == 0) = 1 - m_l ~ 0.64.
        let fraction = layer_zero as f64 / trials as f64;
        assert!(fraction > 0.5, "layer 0 fraction was {fraction}");
    }

    #[test]
    fn zero_level_factor_always_stays_at_layer_zero() {
        let mut sampler = LayerSampler::with_seed(1);
        for _ in 0..50 {
            assert_eq!(sampler.sample(0.0), 0);
        }
    }
}
