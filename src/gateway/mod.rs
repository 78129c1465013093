//! Object storage for uploaded profile images.

mod error;
mod file;

pub use error::BlobStoreError;
pub use file::FileBlobStore;

/// Largest object accepted by [`BlobStore::put`]
pub const MAX_UPLOAD_SIZE: usize = 2 * 1_024_000;

/// Stores opaque objects and hands back a public URL for each.
pub trait BlobStore: Send + Sync {
    /// Stores `data` under a freshly generated name and returns its public URL.
    ///
    /// `file_name` is only used for its extension.
    fn put(&self, file_name: &str, data: &[u8]) -> Result<String, BlobStoreError>;
}
