//! Product image storage on the local filesystem.
//!
//! Uploaded files are written under a single directory with a random prefix so
//! two uploads with the same original name never collide. Names handed back to
//! callers are bare filenames, never paths.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

/// Name used when sanitizing leaves nothing of the original filename.
const FALLBACK_NAME: &str = "upload";

/// Errors from image storage operations.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The requested name could escape the image directory or is empty.
    #[error("invalid image name: {0:?}")]
    InvalidName(String),

    /// No stored image has this name.
    #[error("image not found: {0}")]
    NotFound(String),

    /// Filesystem error.
    #[error("image storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem-backed store for product images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `root`. The directory is not touched until
    /// [`Self::ensure_dir`] or the first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the stored images.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the image directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AssetError::Io` if the directory cannot be created.
    pub async fn ensure_dir(&self) -> Result<(), AssetError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Persist an uploaded image and return its stored filename.
    ///
    /// The stored name is `<32 hex chars>_<sanitized original name>`.
    ///
    /// # Errors
    ///
    /// Returns `AssetError::Io` if the file cannot be written.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, AssetError> {
        self.ensure_dir().await?;

        let stored_name = format!(
            "{}_{}",
            Uuid::new_v4().simple(),
            sanitize_filename(original_name)
        );
        let path = self.root.join(&stored_name);

        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        fill_new_file(&path, file, bytes).await?;

        tracing::debug!(file = %stored_name, bytes = bytes.len(), "Stored product image");
        Ok(stored_name)
    }

    /// Remove a stored image. Removing a missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AssetError::InvalidName` for names that are not plain filenames.
    /// Returns `AssetError::Io` for filesystem errors other than not-found.
    pub async fn delete(&self, name: &str) -> Result<(), AssetError> {
        let path = self.resolve(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read a stored image.
    ///
    /// # Errors
    ///
    /// Returns `AssetError::InvalidName` for names that are not plain filenames.
    /// Returns `AssetError::NotFound` if no such file exists.
    /// Returns `AssetError::Io` for other filesystem errors.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AssetError::NotFound(name.to_owned())),
            Err(e) => Err(e.into()),
        }
    }

    /// Map a filename to a path inside the store, rejecting anything that is
    /// not a single plain path component.
    fn resolve(&self, name: &str) -> Result<PathBuf, AssetError> {
        if !is_plain_filename(name) {
            return Err(AssetError::InvalidName(name.to_owned()));
        }
        Ok(self.root.join(name))
    }
}

/// Write `bytes` into the file just created at `path`. A failed write
/// removes the file again so no truncated image is left behind.
async fn fill_new_file<W>(path: &Path, mut file: W, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match file.write_all(bytes).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };

    if written.is_err() {
        drop(file);
        if let Err(e) = fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial image");
        }
    }
    written
}

fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0'])
}

/// Reduce an uploaded filename to a safe single component.
///
/// Only the last path component is kept. The stem and the extension are
/// cleaned separately: whitespace in the stem becomes `_`, anything outside
/// `[A-Za-z0-9._-]` is dropped, and leading or trailing `.` and `_` are
/// trimmed so the result can never be `..` or a hidden file. The extension
/// keeps its ASCII alphanumerics and survives even when nothing of the stem
/// does (`صورة.jpg` becomes `upload.jpg`).
#[must_use]
pub fn sanitize_filename(original: &str) -> String {
    let last = original.rsplit(['/', '\\']).next().unwrap_or_default();

    let (stem, extension) = match last.rsplit_once('.') {
        Some((stem, extension)) => (stem, clean_extension(extension)),
        None => (last, None),
    };

    let stem = clean_stem(stem);
    let stem = if stem.is_empty() { FALLBACK_NAME } else { stem.as_str() };

    match extension {
        Some(extension) => format!("{stem}.{extension}"),
        None => stem.to_owned(),
    }
}

fn clean_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    cleaned.trim_matches(|c| c == '.' || c == '_').to_owned()
}

fn clean_extension(extension: &str) -> Option<String> {
    let cleaned: String = extension
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}
