//! json-overflow - lossless JSON decode/encode for serde records.
//!
//! A record declares its known fields as usual with `serde` derives and adds
//! exactly one [`UnknownFields`] field marked `#[serde(skip)]`. Decoding
//! through this crate fills that field with every top-level key of the input
//! object that no declared field claimed; encoding writes those keys back
//! next to the declared ones, byte for byte.
//!
//! ```
//! use json_overflow::{unknown_fields, UnknownFields};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Cat {
//!     name: String,
//!     #[serde(skip)]
//!     rest: UnknownFields,
//! }
//! unknown_fields!(Cat => rest);
//!
//! let mut cat: Cat = json_overflow::from_str(r#"{"name":"Tom","age":5}"#)?;
//! cat.name = "Felix".into();
//! assert_eq!(json_overflow::to_string(&cat)?, r#"{"name":"Felix","age":5}"#);
//! # Ok::<(), json_overflow::OverflowError>(())
//! ```
//!
//! Which keys are "claimed" is learned from the record's own serde output
//! rather than from field names, so renames, `flatten` and
//! `skip_serializing_if` are all accounted for. Nested objects are not
//! partitioned: an unknown key inside a declared field's value is subject to
//! that field's own serde rules.
//!
//! Encoding fails with [`OverflowError::Collision`] when a key is present
//! both in the declared output and in the overflow map.

mod decode;
mod encode;
mod error;
mod lossless;
mod unknown_fields;

pub use decode::{decode_into, from_reader, from_slice, from_str};
pub use encode::{to_string, to_string_pretty, to_value, to_vec, to_vec_pretty, to_writer};
pub use error::{JsonKind, OverflowError, Result};
pub use lossless::Lossless;
pub use unknown_fields::{HasUnknownFields, UnknownFields};

pub use serde_json::value::RawValue;
