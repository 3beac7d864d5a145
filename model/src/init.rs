use std::{
    fmt::{self, Display},
    str::FromStr,
};

use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Normal, Uniform};

use crate::{ModelErr, Result};

/// How the weights of a freshly constructed network are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Init {
    /// Uniform over `[low, high)`.
    Uniform { low: f32, high: f32 },
    /// Uniform over `[-r, r)` with `r = sqrt(6 / (fan_in + fan_out))`.
    XavierUniform,
    /// Normal with mean 0 and standard deviation `sqrt(2 / fan_in)`.
    Kaiming,
    /// Normal with mean 0 and standard deviation `sqrt(1 / fan_in)`.
    Lecun,
}

impl Default for Init {
    fn default() -> Self {
        Self::Uniform { low: 0., high: 1. }
    }
}

impl Init {
    /// Samples the weight matrix between two layers.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `fan_in` - The amount of neurons of the source layer.
    /// * `fan_out` - The amount of neurons of the destination layer.
    ///
    /// # Returns
    /// A `(fan_out, fan_in)` matrix or a `Construction` error if the resulting
    /// distribution is invalid.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        fan_in: usize,
        fan_out: usize,
    ) -> Result<Array2<f32>> {
        let shape = (fan_out, fan_in);

        let weights = match *self {
            Init::Uniform { low, high } => Array2::random_using(shape, Uniform::new(low, high)?, rng),
            Init::XavierUniform => {
                let range = (6. / (fan_in + fan_out) as f32).sqrt();
                Array2::random_using(shape, Uniform::new(-range, range)?, rng)
            }
            Init::Kaiming => {
                let std_dev = (2. / fan_in as f32).sqrt();
                Array2::random_using(shape, Normal::new(0., std_dev)?, rng)
            }
            Init::Lecun => {
                let std_dev = (1. / fan_in as f32).sqrt();
                Array2::random_using(shape, Normal::new(0., std_dev)?, rng)
            }
        };

        Ok(weights)
    }
}

impl FromStr for Init {
    type Err = ModelErr;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uniform" => Ok(Self::default()),
            "xavier_uniform" => Ok(Self::XavierUniform),
            "kaiming" => Ok(Self::Kaiming),
            "lecun" => Ok(Self::Lecun),
            other => Err(ModelErr::Construction(format!(
                "unknown initialization {other:?}, expected one of uniform, xavier_uniform, kaiming or lecun"
            ))),
        }
    }
}

impl Display for Init {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Init::Uniform { low, high } => write!(f, "uniform[{low}, {high})"),
            Init::XavierUniform => f.write_str("xavier_uniform"),
            Init::Kaiming => f.write_str("kaiming"),
            Init::Lecun => f.write_str("lecun"),
        }
    }
}
