use std::{
    borrow::Cow,
    error::Error,
    fmt::{self, Display},
    io,
};

/// The category of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Code {
    Unimplemented = 12,
    Internal = 13,
}

impl Code {
    pub fn as_str(&self) -> &'static str {
        match self {
            Code::Unimplemented => "UNIMPLEMENTED",
            Code::Internal => "INTERNAL",
        }
    }
}

impl TryFrom<u32> for Code {
    type Error = io::Error;

    fn try_from(value: u32) -> io::Result<Self> {
        match value {
            12 => Ok(Code::Unimplemented),
            13 => Ok(Code::Internal),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Received an invalid status code {other}"),
            )),
        }
    }
}

/// The error half of a call's outcome, as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status<'a> {
    pub code: Code,
    pub message: Cow<'a, str>,
}

impl<'a> Status<'a> {
    /// Creates a new `Status` with the `Internal` code.
    ///
    /// # Arguments
    /// * `message` - A human readable description of the failure.
    pub fn internal(message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            code: Code::Internal,
            message: message.into(),
        }
    }

    /// Creates a new `Status` with the `Unimplemented` code.
    ///
    /// # Arguments
    /// * `message` - A human readable description of the failure.
    pub fn unimplemented(message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            code: Code::Unimplemented,
            message: message.into(),
        }
    }

    /// Detaches the status from the buffer it was deserialized from.
    pub fn into_owned(self) -> Status<'static> {
        Status {
            code: self.code,
            message: Cow::Owned(self.message.into_owned()),
        }
    }
}

impl Display for Status<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl Error for Status<'_> {}
