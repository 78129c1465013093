use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum BlobStoreError {
    /// The object is larger than the store accepts
    TooLarge { size: usize, limit: usize },
    Io(std::io::Error),
}

impl Error for BlobStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BlobStoreError::TooLarge { .. } => None,
            BlobStoreError::Io(err) => Some(err),
        }
    }
}

impl fmt::Display for BlobStoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BlobStoreError::TooLarge { size, limit } => write!(
                f,
                "image too large: {} bytes, max file size allowed is {} bytes",
                size, limit
            ),
            BlobStoreError::Io(err) => write!(f, "unable to store file: {}", err),
        }
    }
}

impl From<std::io::Error> for BlobStoreError {
    fn from(err: std::io::Error) -> Self {
        BlobStoreError::Io(err)
    }
}
