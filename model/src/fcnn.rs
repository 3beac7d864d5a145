use ndarray::{Array2, ArrayView2};

use crate::{ModelErr, Result};

/// A fully connected neural network.
///
/// Holds one weight matrix per layer transition, the `i`-th one shaped as
/// `(architecture[i + 1], architecture[i])`: each row belongs to a neuron of the
/// destination layer and each column to a neuron of the source layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Fcnn {
    architecture: Vec<usize>,
    weights: Vec<Array2<f32>>,
}

impl Fcnn {
    /// Creates a new `Fcnn` out of already built weight matrices.
    ///
    /// # Arguments
    /// * `architecture` - The amount of neurons per layer.
    /// * `weights` - The weight matrices, one per layer transition.
    ///
    /// # Returns
    /// A `ShapeMismatch` error if the matrices don't follow the architecture.
    pub fn new(architecture: Vec<usize>, weights: Vec<Array2<f32>>) -> Result<Self> {
        let transitions = architecture.len().saturating_sub(1);
        if weights.len() != transitions {
            return Err(ModelErr::ShapeMismatch {
                what: "weight matrices",
                got: weights.len(),
                expected: transitions,
            });
        }

        for (pair, w) in architecture.windows(2).zip(&weights) {
            if w.nrows() != pair[1] {
                return Err(ModelErr::ShapeMismatch {
                    what: "weight matrix rows",
                    got: w.nrows(),
                    expected: pair[1],
                });
            }

            if w.ncols() != pair[0] {
                return Err(ModelErr::ShapeMismatch {
                    what: "weight matrix columns",
                    got: w.ncols(),
                    expected: pair[0],
                });
            }
        }

        Ok(Self {
            architecture,
            weights,
        })
    }

    pub fn architecture(&self) -> &[usize] {
        &self.architecture
    }

    /// The weight matrices, ordered from the input layer to the output layer.
    pub fn weights(&self) -> &[Array2<f32>] {
        &self.weights
    }

    /// The total amount of weights.
    pub fn size(&self) -> usize {
        self.weights.iter().map(|w| w.len()).sum()
    }

    /// Makes a forward pass through the network.
    ///
    /// Every layer computes `sigmoid(x * w^T)`.
    ///
    /// # Arguments
    /// * `x` - The input data, one sample per row.
    ///
    /// # Returns
    /// The output of the last layer, one row per sample, or a `ShapeMismatch` error
    /// if the amount of columns of `x` isn't the width of the input layer.
    pub fn forward(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let input = self.architecture.first().copied().unwrap_or_default();
        if x.ncols() != input {
            return Err(ModelErr::ShapeMismatch {
                what: "input columns",
                got: x.ncols(),
                expected: input,
            });
        }

        let mut a = x.to_owned();
        for w in &self.weights {
            a = a.dot(&w.t());
            a.mapv_inplace(sigmoid);
        }

        Ok(a)
    }
}

fn sigmoid(z: f32) -> f32 {
    1. / (1. + (-z).exp())
}
