use std::error;
use std::fmt;

/// An error which is returned when an underlying resource is unavailable.
///
/// The profile stores raise this when the connection pool cannot hand out a connection or the
/// database fails to run a statement for reasons unrelated to the statement itself. Nothing in
/// this crate retries on this error; it is surfaced to the caller immediately.
#[derive(Debug)]
pub struct ResourceTemporarilyUnavailableError {
    source: Box<dyn error::Error + Send + Sync>,
}

impl ResourceTemporarilyUnavailableError {
    /// Constructs a new `ResourceTemporarilyUnavailableError` from a specified source error.
    pub fn from_source(source: Box<dyn error::Error + Send + Sync>) -> Self {
        Self { source }
    }

    /// Constructs a new `ResourceTemporarilyUnavailableError` with a plain message.
    pub fn with_message(message: String) -> Self {
        Self {
            source: message.into(),
        }
    }
}

impl error::Error for ResourceTemporarilyUnavailableError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl fmt::Display for ResourceTemporarilyUnavailableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "storage unavailable: {}", self.source)
    }
}
