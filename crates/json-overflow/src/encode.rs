//! Encode merger: declared fields first, then the overflow keys.

use std::io;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::error::{JsonKind, OverflowError, Result};
use crate::unknown_fields::HasUnknownFields;

/// Top-level object as raw fragments, in emitted order.
pub(crate) type RawObject = IndexMap<String, Box<RawValue>>;

/// Runs the record's own serde encoding and reads back its top-level keys.
///
/// The overflow field is `#[serde(skip)]`, so this is exactly the set of
/// keys the declared fields produce for this value, including renames,
/// flattened fields and conditional omission.
pub(crate) fn encode_declared<T: Serialize + ?Sized>(record: &T) -> Result<RawObject> {
    let text = serde_json::to_string(record)?;
    match JsonKind::of_text(&text) {
        JsonKind::Object => Ok(serde_json::from_str(&text)?),
        kind => Err(OverflowError::ExpectedStruct(kind)),
    }
}

/// Declared-field output merged with the overflow map.
///
/// A key present in both is a [`OverflowError::Collision`]; nothing is
/// overwritten.
pub(crate) fn merge<T>(record: &T) -> Result<RawObject>
where
    T: Serialize + HasUnknownFields + ?Sized,
{
    let mut named = encode_declared(record)?;
    for (key, raw) in record.unknown_fields() {
        if named.contains_key(key) {
            return Err(OverflowError::Collision(key.clone()));
        }
        named.insert(key.clone(), raw.clone());
    }
    Ok(named)
}

/// Encodes `record` as a compact JSON object including its unknown fields.
pub fn to_vec<T>(record: &T) -> Result<Vec<u8>>
where
    T: Serialize + HasUnknownFields + ?Sized,
{
    Ok(serde_json::to_vec(&merge(record)?)?)
}

pub fn to_vec_pretty<T>(record: &T) -> Result<Vec<u8>>
where
    T: Serialize + HasUnknownFields + ?Sized,
{
    Ok(serde_json::to_vec_pretty(&merge(record)?)?)
}

pub fn to_string<T>(record: &T) -> Result<String>
where
    T: Serialize + HasUnknownFields + ?Sized,
{
    Ok(serde_json::to_string(&merge(record)?)?)
}

/// Pretty-printed output. Unknown fields keep their original formatting.
pub fn to_string_pretty<T>(record: &T) -> Result<String>
where
    T: Serialize + HasUnknownFields + ?Sized,
{
    Ok(serde_json::to_string_pretty(&merge(record)?)?)
}

/// Writes the encoding to `writer`. On a collision nothing is written.
pub fn to_writer<W, T>(writer: W, record: &T) -> Result<()>
where
    W: io::Write,
    T: Serialize + HasUnknownFields + ?Sized,
{
    let merged = merge(record)?;
    serde_json::to_writer(writer, &merged)?;
    Ok(())
}

pub fn to_value<T>(record: &T) -> Result<Value>
where
    T: Serialize + HasUnknownFields + ?Sized,
{
    Ok(serde_json::to_value(merge(record)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unknown_fields::UnknownFields;

    struct Manual {
        id: u32,
        rest: UnknownFields,
    }

    impl Serialize for Manual {
        fn serialize<S: serde::Serializer>(
            &self,
            serializer: S,
        ) -> std::result::Result<S::Ok, S::Error> {
            use serde::ser::SerializeMap;
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("id", &self.id)?;
            map.end()
        }
    }

    crate::unknown_fields!(Manual => rest);

    #[test]
    fn declared_keys_come_first() {
        let mut record = Manual {
            id: 3,
            rest: UnknownFields::new(),
        };
        record.rest.insert("z", "[ 1 ]").unwrap();
        record.rest.insert("a", "{}").unwrap();
        assert_eq!(to_string(&record).unwrap(), r#"{"id":3,"z":[ 1 ],"a":{}}"#);
    }

    #[test]
    fn collision_writes_nothing() {
        let mut record = Manual {
            id: 3,
            rest: UnknownFields::new(),
        };
        record.rest.insert("id", "4").unwrap();
        let mut out = Vec::new();
        let err = to_writer(&mut out, &record).unwrap_err();
        assert_eq!(err.collision_key(), Some("id"));
        assert!(out.is_empty());
    }

    #[test]
    fn non_object_encoding_is_rejected() {
        assert!(matches!(
            encode_declared(&[1, 2]),
            Err(OverflowError::ExpectedStruct(JsonKind::Array))
        ));
        assert!(matches!(
            encode_declared(&()),
            Err(OverflowError::ExpectedStruct(JsonKind::Null))
        ));
        assert!(matches!(
            encode_declared("s"),
            Err(OverflowError::ExpectedStruct(JsonKind::String))
        ));
    }

    #[test]
    fn to_value_parses_fragments() {
        let mut record = Manual {
            id: 1,
            rest: UnknownFields::new(),
        };
        record.rest.insert("tags", r#"["a","b"]"#).unwrap();
        assert_eq!(
            to_value(&record).unwrap(),
            serde_json::json!({"id": 1, "tags": ["a", "b"]})
        );
    }
}
