use log::debug;
use rand::{SeedableRng, rngs::StdRng};

use crate::{Fcnn, Init, Result};
use comms::specs::fcnn::ArchitectureDescriptor;

/// Builds fully connected networks out of their architecture.
///
/// Implementors are shared between every in flight request, so construction must not
/// depend on mutable state shared across calls.
pub trait ModelProvider: Send + Sync {
    /// Constructs a new network.
    ///
    /// # Arguments
    /// * `architecture` - The amount of neurons per layer.
    ///
    /// # Returns
    /// The network or an error if the architecture is invalid or the construction failed.
    fn construct(&self, architecture: &[usize]) -> Result<Fcnn>;
}

/// A `ModelProvider` that initializes every weight at random.
#[derive(Debug, Clone, Default)]
pub struct RandProvider {
    init: Init,
    seed: Option<u64>,
}

impl RandProvider {
    /// Creates a new `RandProvider`.
    ///
    /// # Arguments
    /// * `init` - How to draw the weights.
    /// * `seed` - An optional seed, when given every construction starts from it so the
    ///            same architecture always yields the same weights.
    pub fn new(init: Init, seed: Option<u64>) -> Self {
        Self { init, seed }
    }

    /// Generates a random number generator given (or not) a seed.
    fn generate_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

impl ModelProvider for RandProvider {
    fn construct(&self, architecture: &[usize]) -> Result<Fcnn> {
        let architecture = ArchitectureDescriptor::new(architecture)?;
        let mut rng = self.generate_rng();

        let weights = architecture
            .layers()
            .windows(2)
            .map(|pair| self.init.sample(&mut rng, pair[0], pair[1]))
            .collect::<Result<Vec<_>>>()?;

        debug!(layers = architecture.layers().len(); "constructed fcnn with {} weights", self.init);
        Fcnn::new(architecture.layers().to_vec(), weights)
    }
}

#[cfg(test)]
mod tests {
    use comms::specs::fcnn::ArchitectureErr;

    use super::*;
    use crate::ModelErr;

    #[test]
    fn follows_the_architecture() {
        let provider = RandProvider::default();
        let net = provider.construct(&[5, 10, 10, 1]).unwrap();

        let dims: Vec<_> = net.weights().iter().map(|w| w.dim()).collect();
        assert_eq!(dims, vec![(10, 5), (10, 10), (1, 10)]);
        assert_eq!(net.size(), 50 + 100 + 10);
    }

    #[test]
    fn rejects_invalid_architectures() {
        let provider = RandProvider::default();

        for (arch, expected) in [
            (Vec::<usize>::new(), ArchitectureErr::TooShort { len: 0 }),
            (vec![5], ArchitectureErr::TooShort { len: 1 }),
            (vec![3, 0, 2], ArchitectureErr::EmptyLayer { index: 1 }),
        ] {
            let err = provider.construct(&arch).unwrap_err();
            assert_eq!(err, ModelErr::InvalidArchitecture(expected));
        }
    }

    #[test]
    fn seeded_is_deterministic() {
        let provider = RandProvider::new(Init::Lecun, Some(42));

        let a = provider.construct(&[4, 4, 4]).unwrap();
        let b = provider.construct(&[4, 4, 4]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unseeded_differs() {
        let provider = RandProvider::default();

        let a = provider.construct(&[8, 8]).unwrap();
        let b = provider.construct(&[8, 8]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_init_is_a_construction_failure() {
        let provider = RandProvider::new(Init::Uniform { low: 2., high: 2. }, None);

        let err = provider.construct(&[2, 2]).unwrap_err();
        assert!(matches!(err, ModelErr::Construction(_)));
    }
}
