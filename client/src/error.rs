use std::{error::Error, fmt, io};

use comms::Status;

/// The client module's result type.
pub type Result<T> = std::result::Result<T, ClientErr>;

/// Failures of a call, as seen by the caller.
#[derive(Debug)]
pub enum ClientErr {
    Io(io::Error),
    Status(Status<'static>),
    UnexpectedMessage(&'static str),
}

impl fmt::Display for ClientErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientErr::Io(e) => write!(f, "io error: {e}"),
            ClientErr::Status(status) => write!(f, "call failed with {status}"),
            ClientErr::UnexpectedMessage(got) => {
                write!(f, "unexpected message: expected a response, got {got}")
            }
        }
    }
}

impl Error for ClientErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClientErr::Io(e) => Some(e),
            ClientErr::Status(status) => Some(status),
            ClientErr::UnexpectedMessage(_) => None,
        }
    }
}

impl From<io::Error> for ClientErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<Status<'_>> for ClientErr {
    fn from(value: Status<'_>) -> Self {
        Self::Status(value.into_owned())
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<ClientErr> for io::Error {
    fn from(value: ClientErr) -> Self {
        match value {
            ClientErr::Io(e) => e,
            other => io::Error::other(other),
        }
    }
}
