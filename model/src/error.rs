use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use comms::specs::fcnn::ArchitectureErr;
use rand_distr::{NormalError, uniform::Error as UniformError};

/// The result type used in the entire model module.
pub type Result<T> = std::result::Result<T, ModelErr>;

/// The model module's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelErr {
    /// The architecture can't describe a fully connected network.
    InvalidArchitecture(ArchitectureErr),
    /// The provider failed while building the network.
    Construction(String),
    /// A flat buffer or an input doesn't match the shape it should have.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
}

impl Display for ModelErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelErr::InvalidArchitecture(e) => write!(f, "invalid architecture: {e}"),
            ModelErr::Construction(msg) => write!(f, "failed to construct the model: {msg}"),
            ModelErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "there's a shape mismatch in the {what}, got {got} and expected {expected}"
            ),
        }
    }
}

impl Error for ModelErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ModelErr::InvalidArchitecture(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArchitectureErr> for ModelErr {
    fn from(value: ArchitectureErr) -> Self {
        Self::InvalidArchitecture(value)
    }
}

impl From<UniformError> for ModelErr {
    fn from(value: UniformError) -> Self {
        Self::Construction(value.to_string())
    }
}

impl From<NormalError> for ModelErr {
    fn from(value: NormalError) -> Self {
        Self::Construction(value.to_string())
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<ModelErr> for io::Error {
    fn from(value: ModelErr) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, value)
    }
}
