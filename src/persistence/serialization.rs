//! Serialization utilities: JSON for the collection file.

use crate::document::Document;
use crate::error::{RagError, Result};
use serde::{Deserialize, Serialize};

/// Encode data to indented JSON bytes.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|e| RagError::SerializationError(e.to_string()))
}

/// Decode data from JSON bytes.
pub fn from_json<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| RagError::SerializationError(e.to_string()))
}

/// Encode a collection as a JSON array of document records.
pub fn encode_collection(documents: &[Document]) -> Result<Vec<u8>> {
    to_json_pretty(documents)
}

/// Decode a JSON array of document records.
pub fn decode_collection(bytes: &[u8]) -> Result<Vec<Document>> {
    from_json(bytes)
}
