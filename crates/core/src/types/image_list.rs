//! Ordered list of stored product image filenames.
//!
//! The list is persisted as a single delimited string. The delimiter is not
//! escaped: a filename containing it cannot be part of a list, so encoding is
//! always lossless and decoding is a plain split.

use serde::{Deserialize, Serialize};

/// Errors that can occur when building an [`ImageList`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageListError {
    /// A filename was empty.
    #[error("image filename cannot be empty")]
    EmptyName,
    /// A filename contained the list delimiter.
    #[error("image filename {0:?} contains the reserved delimiter")]
    ContainsDelimiter(String),
}

/// An ordered sequence of stored image filenames.
///
/// ## Examples
///
/// ```
/// use gothic_shop_core::ImageList;
///
/// let mut images = ImageList::new();
/// images.push("a1_front.png").unwrap();
/// images.push("b2_back.png").unwrap();
/// assert_eq!(images.encode(), "a1_front.png,b2_back.png");
///
/// let decoded = ImageList::decode("a1_front.png,b2_back.png");
/// assert_eq!(decoded, images);
///
/// assert!(ImageList::decode("").is_empty());
/// assert!(images.push("bad,name.png").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageList(Vec<String>);

impl ImageList {
    /// Delimiter used in the persisted form.
    pub const DELIMITER: char = ',';

    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a filename, keeping insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains [`Self::DELIMITER`].
    pub fn push(&mut self, name: impl Into<String>) -> Result<(), ImageListError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ImageListError::EmptyName);
        }
        if name.contains(Self::DELIMITER) {
            return Err(ImageListError::ContainsDelimiter(name));
        }
        self.0.push(name);
        Ok(())
    }

    /// Encode the list into its persisted form.
    #[must_use]
    pub fn encode(&self) -> String {
        self.0.join(&Self::DELIMITER.to_string())
    }

    /// Decode a persisted list.
    ///
    /// An empty string yields an empty list. Empty segments (for example from
    /// a trailing delimiter) are dropped.
    #[must_use]
    pub fn decode(encoded: &str) -> Self {
        Self(
            encoded
                .split(Self::DELIMITER)
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first image, used as the product thumbnail.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Iterate over the filenames in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
