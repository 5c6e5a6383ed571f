//! Stored values
//!
//! Tagged union of the two value kinds a dataset holds.

use bytes::Bytes;

/// A value headed for the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Raw binary payload (image files)
    Bytes(Bytes),

    /// UTF-8 text (labels, lexicons, counts)
    Text(String),
}

impl Value {
    /// The byte string written to the store
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Value::Bytes(bytes) => bytes,
            Value::Text(text) => text.as_bytes(),
        }
    }

    /// Length of the encoded value in bytes
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(bytes))
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}
