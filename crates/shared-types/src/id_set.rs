//! Serde adapter for membership sets.
//!
//! The store keeps a set as an object keyed by the member id, with the id as
//! value (`{"u1": "u1"}`). Decoding is lenient: the values are ignored, an
//! array of ids is accepted (the store flattens objects with numeric keys into
//! arrays, leaving `null` holes), and `null` decodes to the empty set.
//!
//! ```ignore
//! #[serde(default, with = "id_set")]
//! pub assigned_volunteers: BTreeSet<UserId>,
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserializer, Serializer};

/// Encode a set as `{id: id}`.
pub fn serialize<S, T>(set: &BTreeSet<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: AsRef<str> + Ord,
{
    let mut map = serializer.serialize_map(Some(set.len()))?;
    for id in set {
        map.serialize_entry(id.as_ref(), id.as_ref())?;
    }
    map.end()
}

/// Decode a set from a keyed object, an id array, or `null`.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<BTreeSet<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String> + Ord,
{
    deserializer.deserialize_any(IdSetVisitor(PhantomData))
}

/// Encode a set into a store value. Empty sets become `null` so the store
/// drops the path instead of keeping an empty object.
pub fn to_value<T>(set: &BTreeSet<T>) -> serde_json::Value
where
    T: AsRef<str> + Ord,
{
    if set.is_empty() {
        return serde_json::Value::Null;
    }
    let map = set
        .iter()
        .map(|id| {
            (
                id.as_ref().to_string(),
                serde_json::Value::String(id.as_ref().to_string()),
            )
        })
        .collect();
    serde_json::Value::Object(map)
}

struct IdSetVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for IdSetVisitor<T>
where
    T: From<String> + Ord,
{
    type Value = BTreeSet<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object keyed by id, an array of ids, or null")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(BTreeSet::new())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(BTreeSet::new())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut set = BTreeSet::new();
        while let Some((key, IgnoredAny)) = map.next_entry::<String, IgnoredAny>()? {
            set.insert(T::from(key));
        }
        Ok(set)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = BTreeSet::new();
        while let Some(item) = seq.next_element::<Option<String>>()? {
            if let Some(id) = item {
                set.insert(T::from(id));
            }
        }
        Ok(set)
    }
}
