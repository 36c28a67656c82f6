//! Fixed-capacity inline names.
//!
//! Display names live in a compact, `Copy` record so the name table and
//! search tokens never allocate per node. Over-long input is truncated at
//! the last UTF-8 character boundary that fits; it never fails.

use std::fmt;
use std::ops::Deref;

/// Maximum number of UTF-8 bytes a [`FixedName`] can hold.
///
/// Together with the length byte this keeps the record at 62 bytes,
/// inside a 64-byte slot.
pub const NAME_CAPACITY: usize = 61;

/// A short UTF-8 string stored inline with a fixed byte capacity.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FixedName {
    len: u8,
    bytes: [u8; NAME_CAPACITY],
}

impl FixedName {
    /// An empty name.
    pub const EMPTY: Self = Self {
        len: 0,
        bytes: [0; NAME_CAPACITY],
    };

    /// Creates a name from `text`, truncating to [`NAME_CAPACITY`] bytes.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let text = truncate_to_capacity(text);
        let mut bytes = [0; NAME_CAPACITY];
        bytes[..text.len()].copy_from_slice(text.as_bytes());
        Self {
            len: u8::try_from(text.len()).unwrap_or(u8::MAX),
            bytes,
        }
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ever filled from a `&str` cut at a char boundary.
        std::str::from_utf8(&self.bytes[..usize::from(self.len)]).unwrap_or_default()
    }

    /// Returns the number of bytes used.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// Returns true if the name is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if `text` had to be cut to fit.
    #[must_use]
    pub fn would_truncate(text: &str) -> bool {
        text.len() > NAME_CAPACITY
    }
}

/// Returns the longest prefix of `text` that fits in [`NAME_CAPACITY`] bytes
/// without splitting a character.
#[must_use]
pub fn truncate_to_capacity(text: &str) -> &str {
    if text.len() <= NAME_CAPACITY {
        return text;
    }
    let mut end = NAME_CAPACITY;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

impl Default for FixedName {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Deref for FixedName {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for FixedName {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Debug for FixedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedName({:?})", self.as_str())
    }
}

impl fmt::Display for FixedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use super::FixedName;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for FixedName {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.as_str())
        }
    }

    impl<'de> Deserialize<'de> for FixedName {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let text = String::deserialize(deserializer)?;
            Ok(Self::new(&text))
        }
    }
}
