//! The overflow container and the trait that locates it inside a record.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::value::RawValue;

use crate::error::Result;

/// Top-level JSON object keys that no declared field of a record claimed.
///
/// Values are kept as raw fragments, exactly as they appeared in the
/// decoded input, and are written back verbatim on encode. Insertion order
/// is preserved.
///
/// This type has no serde implementations of its own: the field holding it
/// must be marked `#[serde(skip)]`, and the mergers in this crate take care
/// of reading and writing it.
#[derive(Clone, Default)]
pub struct UnknownFields(IndexMap<String, Box<RawValue>>);

impl UnknownFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key).map(|raw| &**raw)
    }

    /// Inserts a fragment given as JSON text.
    ///
    /// Fails with a codec error if `json` is not exactly one JSON value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        json: impl Into<String>,
    ) -> Result<Option<Box<RawValue>>> {
        let raw = RawValue::from_string(json.into())?;
        Ok(self.insert_raw(key, raw))
    }

    pub fn insert_raw(
        &mut self,
        key: impl Into<String>,
        raw: Box<RawValue>,
    ) -> Option<Box<RawValue>> {
        self.0.insert(key.into(), raw)
    }

    /// Serializes `value` and inserts it as a fragment.
    pub fn insert_value<V: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &V,
    ) -> Result<Option<Box<RawValue>>> {
        let raw = serde_json::value::to_raw_value(value)?;
        Ok(self.insert_raw(key, raw))
    }

    /// Removes `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Box<RawValue>> {
        self.0.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), &**v))
    }

    pub fn into_inner(self) -> IndexMap<String, Box<RawValue>> {
        self.0
    }
}

impl From<IndexMap<String, Box<RawValue>>> for UnknownFields {
    fn from(map: IndexMap<String, Box<RawValue>>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Box<RawValue>)> for UnknownFields {
    fn from_iter<I: IntoIterator<Item = (String, Box<RawValue>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(String, Box<RawValue>)> for UnknownFields {
    fn extend<I: IntoIterator<Item = (String, Box<RawValue>)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for UnknownFields {
    type Item = (String, Box<RawValue>);
    type IntoIter = indexmap::map::IntoIter<String, Box<RawValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a UnknownFields {
    type Item = (&'a String, &'a Box<RawValue>);
    type IntoIter = indexmap::map::Iter<'a, String, Box<RawValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Two containers are equal when they hold the same keys with byte-identical
/// fragments. Key order is not compared.
impl PartialEq for UnknownFields {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o.get() == v.get()))
    }
}

impl Eq for UnknownFields {}

impl fmt::Debug for UnknownFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (k, v.get())))
            .finish()
    }
}

/// A record with exactly one field holding its [`UnknownFields`].
///
/// Implement it with the [`unknown_fields!`](crate::unknown_fields) macro.
/// The overflow field must be excluded from the record's own serde
/// implementation with `#[serde(skip)]`:
///
/// ```
/// use json_overflow::{unknown_fields, UnknownFields};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Cat {
///     name: String,
///     #[serde(skip)]
///     rest: UnknownFields,
/// }
///
/// unknown_fields!(Cat => rest);
///
/// let cat: Cat = json_overflow::from_str(r#"{"name":"Tom","age":5}"#)?;
/// assert_eq!(cat.name, "Tom");
/// assert_eq!(cat.rest.get("age").map(|v| v.get()), Some("5"));
/// assert_eq!(json_overflow::to_string(&cat)?, r#"{"name":"Tom","age":5}"#);
/// # Ok::<(), json_overflow::OverflowError>(())
/// ```
///
/// Leaving the overflow field visible to serde does not compile:
///
/// ```compile_fail
/// use json_overflow::UnknownFields;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Cat {
///     name: String,
///     rest: UnknownFields,
/// }
/// ```
///
/// Neither does a record without an overflow field:
///
/// ```compile_fail
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Cat {
///     name: String,
/// }
///
/// let cat: Cat = json_overflow::from_str("{}").unwrap();
/// ```
///
/// Nor one that designates two:
///
/// ```compile_fail
/// use json_overflow::{unknown_fields, UnknownFields};
///
/// struct Cat {
///     a: UnknownFields,
///     b: UnknownFields,
/// }
///
/// unknown_fields!(Cat => a);
/// unknown_fields!(Cat => b);
/// ```
pub trait HasUnknownFields {
    fn unknown_fields(&self) -> &UnknownFields;

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields;
}

impl<T: HasUnknownFields + ?Sized> HasUnknownFields for Box<T> {
    fn unknown_fields(&self) -> &UnknownFields {
        (**self).unknown_fields()
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        (**self).unknown_fields_mut()
    }
}

/// Implements [`HasUnknownFields`] by pointing it at one field.
///
/// ```
/// # use json_overflow::{unknown_fields, UnknownFields};
/// struct Plain {
///     rest: UnknownFields,
/// }
/// unknown_fields!(Plain => rest);
///
/// struct Tagged<T> {
///     tag: T,
///     extra: UnknownFields,
/// }
/// unknown_fields!(impl<T> Tagged<T> => extra);
/// ```
#[macro_export]
macro_rules! unknown_fields {
    (impl<$($gen:ident),+ $(,)?> $ty:ty => $field:tt) => {
        impl<$($gen),+> $crate::HasUnknownFields for $ty {
            fn unknown_fields(&self) -> &$crate::UnknownFields {
                &self.$field
            }

            fn unknown_fields_mut(&mut self) -> &mut $crate::UnknownFields {
                &mut self.$field
            }
        }
    };
    ($ty:ty => $field:tt) => {
        impl $crate::HasUnknownFields for $ty {
            fn unknown_fields(&self) -> &$crate::UnknownFields {
                &self.$field
            }

            fn unknown_fields_mut(&mut self) -> &mut $crate::UnknownFields {
                &mut self.$field
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair(u8, UnknownFields);
    crate::unknown_fields!(Pair => 1);

    #[test]
    fn insert_validates_fragment() {
        let mut fields = UnknownFields::new();
        assert!(fields.insert("a", "[1, 2]").unwrap().is_none());
        assert!(fields.insert("b", "{").is_err());
        assert!(fields.insert("c", "1 2").is_err());
        assert_eq!(fields.get("a").map(RawValue::get), Some("[1, 2]"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn insert_value_serializes() {
        let mut fields = UnknownFields::new();
        fields.insert_value("n", &[1, 2, 3]).unwrap();
        fields.insert_value("s", "hi").unwrap();
        assert_eq!(fields.get("n").unwrap().get(), "[1,2,3]");
        assert_eq!(fields.get("s").unwrap().get(), "\"hi\"");
    }

    #[test]
    fn remove_keeps_order() {
        let mut fields = UnknownFields::new();
        for key in ["a", "b", "c", "d"] {
            fields.insert(key, "0").unwrap();
        }
        assert!(fields.remove("b").is_some());
        assert!(fields.remove("zz").is_none());
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["a", "c", "d"]);
    }

    #[test]
    fn equality_ignores_order_but_not_bytes() {
        let mut a = UnknownFields::new();
        a.insert("x", "1").unwrap();
        a.insert("y", "2").unwrap();
        let mut b = UnknownFields::new();
        b.insert("y", "2").unwrap();
        b.insert("x", "1").unwrap();
        assert_eq!(a, b);

        b.insert("x", "1.0").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn debug_shows_fragments() {
        let mut fields = UnknownFields::new();
        fields.insert("k", "true").unwrap();
        assert_eq!(format!("{fields:?}"), r#"{"k": "true"}"#);
    }

    #[test]
    fn macro_supports_tuple_fields() {
        let mut pair = Pair(7, UnknownFields::new());
        pair.unknown_fields_mut().insert("z", "null").unwrap();
        assert!(pair.unknown_fields().contains_key("z"));
        assert_eq!(pair.0, 7);
    }
}
