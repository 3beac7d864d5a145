//! Conversion between weight matrices and their wire representation.

use comms::specs::fcnn::{LayerWeights, ModelWeights, Shape};
use ndarray::{Array2, ArrayView2};

use crate::{ModelErr, Result};

/// Flattens `tensor` in row-major order, keeping its shape along.
pub fn encode(tensor: ArrayView2<f32>) -> LayerWeights {
    let (rows, cols) = tensor.dim();

    let weights = match tensor.as_slice() {
        Some(contiguous) => contiguous.to_vec(),
        None => tensor.iter().copied().collect(),
    };

    LayerWeights {
        weights,
        shape: Shape::new(rows, cols),
    }
}

/// Encodes every weight matrix of a network, in order.
pub fn encode_model<'a, I>(tensors: I) -> ModelWeights
where
    I: IntoIterator<Item = ArrayView2<'a, f32>>,
{
    ModelWeights::new(tensors.into_iter().map(encode).collect())
}

/// Rebuilds the weight matrix out of its flat representation.
///
/// # Returns
/// The matrix or a `ShapeMismatch` error if the amount of weights isn't `rows * cols`.
pub fn decode(layer: &LayerWeights) -> Result<Array2<f32>> {
    let LayerWeights { weights, shape } = layer;

    if weights.len() != shape.size() {
        return Err(shape_mismatch(weights.len(), *shape));
    }

    Array2::from_shape_vec((shape.rows, shape.cols), weights.clone())
        .map_err(|_| shape_mismatch(weights.len(), *shape))
}

/// Decodes every layer of `model`, stopping at the first inconsistent one.
pub fn decode_model(model: &ModelWeights) -> Result<Vec<Array2<f32>>> {
    model.layers.iter().map(decode).collect()
}

fn shape_mismatch(got: usize, shape: Shape) -> ModelErr {
    ModelErr::ShapeMismatch {
        what: "layer weights",
        got,
        expected: shape.size(),
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn round_trip() {
        let t = array![[0.1f32, -2.5, 3.75], [4., 5.5, -0.0625]];

        let layer = encode(t.view());
        assert_eq!(layer.shape, Shape::new(2, 3));
        assert_eq!(layer.weights, vec![0.1, -2.5, 3.75, 4., 5.5, -0.0625]);

        assert_eq!(decode(&layer).unwrap(), t);
    }

    #[test]
    fn transposed_view_is_flattened_logically() {
        let t = array![[1f32, 2., 3.], [4., 5., 6.]];

        let layer = encode(t.t());
        assert_eq!(layer.shape, Shape::new(3, 2));
        assert_eq!(layer.weights, vec![1., 4., 2., 5., 3., 6.]);
        assert_eq!(decode(&layer).unwrap(), t.t());
    }

    #[test]
    fn empty_tensor() {
        let t = Array2::<f32>::zeros((0, 4));

        let layer = encode(t.view());
        assert_eq!(layer.shape, Shape::new(0, 4));
        assert!(layer.weights.is_empty());
        assert_eq!(decode(&layer).unwrap(), t);
    }

    #[test]
    fn shape_mismatch() {
        let layer = LayerWeights {
            weights: vec![1., 2., 3.],
            shape: Shape::new(2, 2),
        };

        assert_eq!(
            decode(&layer).unwrap_err(),
            ModelErr::ShapeMismatch {
                what: "layer weights",
                got: 3,
                expected: 4,
            }
        );
    }

    #[test]
    fn model_round_trip() {
        let tensors = vec![array![[1f32, 2.], [3., 4.], [5., 6.]], array![[7f32, 8., 9.]]];

        let model = encode_model(tensors.iter().map(|t| t.view()));
        assert_eq!(model.len(), 2);
        assert_eq!(model.size(), 9);

        assert_eq!(decode_model(&model).unwrap(), tensors);
    }
}
