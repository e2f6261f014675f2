//! Decode merger: standard decode plus capture of every unclaimed key.

use std::io;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::encode::{encode_declared, RawObject};
use crate::error::Result;
use crate::unknown_fields::{HasUnknownFields, UnknownFields};

/// Decodes a JSON object into a record, keeping unclaimed keys in its
/// [`UnknownFields`].
///
/// Only top-level keys are partitioned. A key counts as claimed when the
/// record, re-encoded after decoding, emits it; so a key dropped by
/// `skip_serializing_if` stays in the overflow map and is written back on
/// encode.
///
/// Input that is not a JSON object fails with the serde_json type error.
pub fn from_slice<T>(data: &[u8]) -> Result<T>
where
    T: DeserializeOwned + Serialize + HasUnknownFields,
{
    let mut overflow: RawObject = serde_json::from_slice(data)?;
    let mut record: T = serde_json::from_slice(data)?;
    for key in encode_declared(&record)?.keys() {
        overflow.shift_remove(key);
    }
    *record.unknown_fields_mut() = UnknownFields::from(overflow);
    Ok(record)
}

pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned + Serialize + HasUnknownFields,
{
    from_slice(s.as_bytes())
}

/// Reads the whole of `reader` and decodes it.
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned + Serialize + HasUnknownFields,
{
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(serde_json::Error::io)?;
    from_slice(&data)
}

/// Decodes into an existing record.
///
/// `out` is replaced only when decoding succeeds; on error it keeps its
/// previous value.
pub fn decode_into<T>(data: &[u8], out: &mut T) -> Result<()>
where
    T: DeserializeOwned + Serialize + HasUnknownFields,
{
    *out = from_slice(data)?;
    Ok(())
}
