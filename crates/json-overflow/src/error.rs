//! Error types for the decode and encode mergers.

use std::fmt;

use thiserror::Error;

pub type Result<T, E = OverflowError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum OverflowError {
    /// The record's standard encoding is not a JSON object, so it has no
    /// top-level keys to partition.
    #[error("expected struct, got {0}")]
    ExpectedStruct(JsonKind),
    /// A key is produced both by a declared field and by the overflow map.
    #[error("named field present in overflow: '{0}'")]
    Collision(String),
    #[error(transparent)]
    Codec(#[from] serde_json::Error),
}

impl OverflowError {
    /// The colliding key, if this is a collision error.
    pub fn collision_key(&self) -> Option<&str> {
        match self {
            OverflowError::Collision(key) => Some(key),
            _ => None,
        }
    }
}

/// Kind of a top-level JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    /// Classifies serialized JSON text by its first significant byte.
    ///
    /// The input is expected to be codec output, i.e. already valid JSON.
    pub fn of_text(text: &str) -> Self {
        match text.trim_start().as_bytes().first() {
            Some(b'{') => JsonKind::Object,
            Some(b'[') => JsonKind::Array,
            Some(b'"') => JsonKind::String,
            Some(b't') | Some(b'f') => JsonKind::Bool,
            Some(b'n') | None => JsonKind::Null,
            Some(_) => JsonKind::Number,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "bool",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
