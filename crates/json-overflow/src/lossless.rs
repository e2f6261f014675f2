//! Serde adapter for nesting records with unknown fields in other documents.

use std::ops::{Deref, DerefMut};

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::unknown_fields::{HasUnknownFields, UnknownFields};
use crate::{decode, encode};

/// Wraps a record so that its own `Serialize`/`Deserialize` go through the
/// mergers.
///
/// The record's derived impls cover only its declared fields, so a record
/// nested inside another serde type would lose its unknown keys. Wrapping
/// it keeps them:
///
/// ```
/// use json_overflow::{unknown_fields, Lossless, UnknownFields};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Cat {
///     name: String,
///     #[serde(skip)]
///     rest: UnknownFields,
/// }
/// unknown_fields!(Cat => rest);
///
/// #[derive(Serialize, Deserialize)]
/// struct Shelter {
///     cats: Vec<Lossless<Cat>>,
/// }
///
/// let json = r#"{"cats":[{"name":"Tom","age":5}]}"#;
/// let shelter: Shelter = serde_json::from_str(json)?;
/// assert_eq!(shelter.cats[0].name, "Tom");
/// assert_eq!(serde_json::to_string(&shelter)?, json);
/// # Ok::<(), serde_json::Error>(())
/// ```
///
/// Only serde_json serializers and deserializers are supported, since the
/// unknown fields travel as raw JSON. Within serde_json, deserialization
/// needs the input to reach `Lossless` unbuffered: it works directly, in
/// sequences, maps, struct fields and `serde_json::from_value`, but fails
/// behind `#[serde(flatten)]`, in `#[serde(untagged)]` enums and in
/// internally tagged enums, where serde buffers the input first.
///
/// Decode errors of the nested record are reported as
/// `nested record: <error>`; the inner message keeps its position relative
/// to the nested object and serde_json appends the outer position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lossless<T>(pub T);

impl<T> Lossless<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Lossless<T> {
    fn from(record: T) -> Self {
        Lossless(record)
    }
}

impl<T> Deref for Lossless<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Lossless<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: HasUnknownFields> HasUnknownFields for Lossless<T> {
    fn unknown_fields(&self) -> &UnknownFields {
        self.0.unknown_fields()
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        self.0.unknown_fields_mut()
    }
}

impl<T> Serialize for Lossless<T>
where
    T: Serialize + HasUnknownFields,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode::merge(&self.0)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Lossless<T>
where
    T: DeserializeOwned + Serialize + HasUnknownFields,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        decode::from_str(raw.get())
            .map(Lossless)
            .map_err(|err| D::Error::custom(format_args!("nested record: {err}")))
    }
}
