use std::{
    error::Error,
    fmt::{self, Display},
};

use serde::{Deserialize, Serialize};

use crate::MAX_FRAME_LEN;

const U32_SIZE: usize = size_of::<u32>();
const F32_SIZE: usize = size_of::<f32>();

/// The most weights a single response frame with `transitions` weight matrices can
/// carry, after its kind, layer count and shape headers.
pub fn max_weights(transitions: usize) -> usize {
    let headers = transitions
        .saturating_mul(2 * U32_SIZE)
        .saturating_add(2 * U32_SIZE);

    MAX_FRAME_LEN.saturating_sub(headers) / F32_SIZE
}

/// Error returned when an architecture can't describe a fully connected network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchitectureErr {
    TooShort { len: usize },
    EmptyLayer { index: usize },
    TooLarge { max: usize },
}

impl Display for ArchitectureErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchitectureErr::TooShort { len } => write!(
                f,
                "an architecture needs at least 2 layers, got {len}"
            ),
            ArchitectureErr::EmptyLayer { index } => {
                write!(f, "layer {index} has no neurons, every layer size must be positive")
            }
            ArchitectureErr::TooLarge { max } => {
                write!(f, "the network would hold more than {max} weights")
            }
        }
    }
}

impl Error for ArchitectureErr {}

/// The width of every layer of a fully connected network, input layer first.
///
/// Deserializing does not validate, the receiving side is expected to call
/// `ArchitectureDescriptor::validate` before using it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchitectureDescriptor(Vec<usize>);

impl ArchitectureDescriptor {
    /// Creates a new validated `ArchitectureDescriptor`.
    ///
    /// # Arguments
    /// * `layers` - The amount of neurons of each layer.
    ///
    /// # Returns
    /// The descriptor or an `ArchitectureErr` if there are less than two layers, any
    /// of them is empty or the weights wouldn't fit in a single response.
    pub fn new(layers: impl Into<Vec<usize>>) -> Result<Self, ArchitectureErr> {
        let arch = Self(layers.into());
        arch.validate()?;
        Ok(arch)
    }

    /// Checks that there are at least two layers, that none of them is empty and that
    /// the resulting weights fit in a single response frame.
    ///
    /// Only does arithmetic on the layer sizes, nothing gets allocated.
    pub fn validate(&self) -> Result<(), ArchitectureErr> {
        if self.0.len() < 2 {
            return Err(ArchitectureErr::TooShort { len: self.0.len() });
        }

        if let Some(index) = self.0.iter().position(|&size| size == 0) {
            return Err(ArchitectureErr::EmptyLayer { index });
        }

        let max = max_weights(self.transitions());
        match self.weight_count() {
            Some(count) if count <= max => Ok(()),
            _ => Err(ArchitectureErr::TooLarge { max }),
        }
    }

    /// The total amount of weights of a network with this architecture, `None` on overflow.
    pub fn weight_count(&self) -> Option<usize> {
        self.0
            .windows(2)
            .try_fold(0usize, |acc, pair| pair[0].checked_mul(pair[1])?.checked_add(acc))
    }

    pub fn layers(&self) -> &[usize] {
        &self.0
    }

    /// The amount of weight matrices a network with this architecture has.
    pub fn transitions(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}

/// Unchecked conversion, used by callers that leave validation to the server.
impl From<Vec<usize>> for ArchitectureDescriptor {
    fn from(value: Vec<usize>) -> Self {
        Self(value)
    }
}

/// The dimensions of a weight matrix, `rows` is the width of the destination layer and
/// `cols` the width of the source layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// The amount of elements a matrix of this shape holds.
    pub fn size(&self) -> usize {
        self.rows * self.cols
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}

/// A weight matrix flattened in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerWeights {
    pub weights: Vec<f32>,
    pub shape: Shape,
}

/// The weight matrices of a whole network, one per layer transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelWeights {
    pub layers: Vec<LayerWeights>,
}

impl ModelWeights {
    pub fn new(layers: Vec<LayerWeights>) -> Self {
        Self { layers }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The total amount of weights across every layer.
    pub fn size(&self) -> usize {
        self.layers.iter().map(|layer| layer.weights.len()).sum()
    }
}

/// The calls a client can make to the `FCNN` service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Request {
    CreateModel {
        architecture: ArchitectureDescriptor,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_architectures() {
        assert_eq!(
            ArchitectureDescriptor::new(vec![]),
            Err(ArchitectureErr::TooShort { len: 0 })
        );
        assert_eq!(
            ArchitectureDescriptor::new(vec![5]),
            Err(ArchitectureErr::TooShort { len: 1 })
        );
    }

    #[test]
    fn rejects_empty_layers() {
        assert_eq!(
            ArchitectureDescriptor::new(vec![3, 0, 2]),
            Err(ArchitectureErr::EmptyLayer { index: 1 })
        );
    }

    #[test]
    fn rejects_oversized_architectures() {
        let max = max_weights(1);
        assert_eq!(
            ArchitectureDescriptor::new(vec![100_000, 100_000]),
            Err(ArchitectureErr::TooLarge { max })
        );

        // Just over a gibibyte of weights.
        assert_eq!(
            ArchitectureDescriptor::new(vec![16_384, 16_385]),
            Err(ArchitectureErr::TooLarge { max })
        );

        assert_eq!(
            ArchitectureDescriptor::new(vec![usize::MAX, 2, 2]),
            Err(ArchitectureErr::TooLarge { max: max_weights(2) })
        );
    }

    #[test]
    fn largest_architecture_fits_in_a_frame() {
        let max = max_weights(1);
        let arch = ArchitectureDescriptor::new(vec![1, max]).unwrap();
        assert_eq!(arch.weight_count(), Some(max));

        let frame = 2 * U32_SIZE + 2 * U32_SIZE + max * F32_SIZE;
        assert!(frame <= MAX_FRAME_LEN);

        assert_eq!(
            ArchitectureDescriptor::new(vec![1, max + 1]),
            Err(ArchitectureErr::TooLarge { max })
        );
    }

    #[test]
    fn counts_weights() {
        let arch = ArchitectureDescriptor::new(vec![5, 10, 10, 1]).unwrap();
        assert_eq!(arch.weight_count(), Some(50 + 100 + 10));
    }

    #[test]
    fn counts_transitions() {
        let arch = ArchitectureDescriptor::new(vec![5, 10, 10, 1]).unwrap();
        assert_eq!(arch.layers(), &[5, 10, 10, 1]);
        assert_eq!(arch.transitions(), 3);
    }

    #[test]
    fn request_json_layout() {
        let req = Request::CreateModel {
            architecture: vec![2, 3].into(),
        };

        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"create_model":{"architecture":[2,3]}}"#);
    }
}
