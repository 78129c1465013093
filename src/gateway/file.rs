use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{BlobStore, BlobStoreError, MAX_UPLOAD_SIZE};

/// A [`BlobStore`] that writes objects below a local directory.
///
/// Objects are named `images/<uuid><ext>`, and their URL is that name appended to
/// `public_url_prefix`.
#[derive(Clone, Debug)]
pub struct FileBlobStore {
    root: PathBuf,
    public_url_prefix: String,
}

impl FileBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url_prefix: public_url_prefix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BlobStore for FileBlobStore {
    fn put(&self, file_name: &str, data: &[u8]) -> Result<String, BlobStoreError> {
        if data.len() > MAX_UPLOAD_SIZE {
            return Err(BlobStoreError::TooLarge {
                size: data.len(),
                limit: MAX_UPLOAD_SIZE,
            });
        }

        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();
        let object_name = format!("images/{}{}", Uuid::new_v4(), extension);

        let path = self.root.join(&object_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, data)?;
        log::debug!("Stored {} bytes at {}", data.len(), path.display());

        Ok(format!("{}{}", self.public_url_prefix, object_name))
    }
}
