//! CyBuf deserialization.
//!
//! The [`Deserializer`] walks a parsed [`Tree`] and drives serde visitors from
//! it. Text is always parsed into a tree first, so a syntax error is reported
//! before any field is populated.
//!
//! ## Decoding rules
//!
//! - object keys match struct fields exactly (case-sensitive); unknown keys
//!   are skipped and missing fields fall back to `#[serde(default)]`
//! - when a key repeats, the last occurrence wins
//! - `nil` decodes to the zero value of the target (`0`, `""`, `false`, an
//!   empty collection, `None`)
//! - a whole-valued float decodes into an integer; a fractional or
//!   out-of-range one is an [`Error::Range`]
//! - a kind that cannot fit the target is an [`Error::TypeMismatch`] naming
//!   the field path, e.g. `Friends[0].School.Age`
//!
//! ```rust
//! use serde_cybuf::{from_str, Error};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct School { Name: String, Age: u32 }
//!
//! let school: School = from_str("{Name: \"Wuhan University\" Age: 120}").unwrap();
//! assert_eq!(school, School { Name: "Wuhan University".to_string(), Age: 120 });
//!
//! let err = from_str::<School>("{Name: 7 Age: 120}").unwrap_err();
//! assert!(matches!(err, Error::TypeMismatch { ref field, .. } if field == "Name"));
//! ```

use crate::tree::{Node, NodeId, Tree};
use crate::{Error, Number, Result};
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, DeserializeSeed, Visitor};
use serde::forward_to_deserialize_any;
use std::collections::HashSet;
use std::fmt;

/// Location of a node relative to the root, built up as the walk descends.
#[derive(Clone, Copy)]
enum Path<'p> {
    Root,
    Field { parent: &'p Path<'p>, name: &'p str },
    Index { parent: &'p Path<'p>, index: usize },
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Root => f.write_str("(root)"),
            Path::Field {
                parent: Path::Root,
                name,
            } => f.write_str(name),
            Path::Field { parent, name } => write!(f, "{}.{}", parent, name),
            Path::Index { parent, index } => write!(f, "{}[{}]", parent, index),
        }
    }
}

/// The CyBuf deserializer.
///
/// Borrows a [`Tree`] and deserializes the value rooted at one of its nodes.
/// String fields can borrow straight from the tree.
pub struct Deserializer<'de, 'p> {
    tree: &'de Tree,
    id: NodeId,
    path: Path<'p>,
}

impl<'de> Deserializer<'de, 'static> {
    /// Deserializes from the root of `tree`.
    pub fn new(tree: &'de Tree) -> Self {
        Deserializer {
            tree,
            id: tree.root(),
            path: Path::Root,
        }
    }
}

impl<'de, 'p> Deserializer<'de, 'p> {
    fn node(&self) -> &'de Node {
        self.tree.node(self.id)
    }

    fn mismatch(&self, want: &'static str) -> Error {
        Error::type_mismatch(self.path, want, self.node().kind())
    }

    /// Reads the node as an integer of type `T`, widening through `i128` so
    /// both signed and unsigned targets see the exact value.
    fn integer<T>(&self, target: &'static str) -> Result<T>
    where
        T: TryFrom<i128>,
    {
        let wide = match self.node() {
            Node::Nil => 0,
            Node::Number(Number::Integer(i)) => i128::from(*i),
            Node::Number(Number::Unsigned(u)) => i128::from(*u),
            Node::Number(Number::Float(f)) => self.whole_float(*f, target)?,
            _ => return Err(self.mismatch("integer")),
        };
        T::try_from(wide)
            .map_err(|_| Error::range(self.path, format!("{} does not fit in {}", wide, target)))
    }

    fn whole_float(&self, f: f64, target: &'static str) -> Result<i128> {
        // 2^64: anything at or past it cannot land in a 64-bit integer.
        const LIMIT: f64 = 18_446_744_073_709_551_616.0;
        if f.fract() != 0.0 {
            return Err(Error::range(
                self.path,
                format!("{} has a fractional part and cannot become {}", f, target),
            ));
        }
        if f <= -LIMIT || f >= LIMIT {
            return Err(Error::range(self.path, format!("{} does not fit in {}", f, target)));
        }
        Ok(f as i128)
    }

    fn float(&self) -> Result<f64> {
        match self.node() {
            Node::Nil => Ok(0.0),
            Node::Number(n) => Ok(n.as_f64()),
            _ => Err(self.mismatch("float")),
        }
    }

    fn array<V>(&self, items: &'de [NodeId], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let mut access = ArrayAccess {
            tree: self.tree,
            items,
            index: 0,
            path: &self.path,
        };
        let value = visitor.visit_seq(&mut access)?;
        if access.index < items.len() {
            let expected = format!("an array of {} elements", access.index);
            return Err(de::Error::invalid_length(items.len(), &expected.as_str()));
        }
        Ok(value)
    }

    fn object<V>(&self, entries: &'de [(String, NodeId)], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let mut entries = last_wins(entries);
        entries.reverse();
        visitor.visit_map(ObjectAccess {
            tree: self.tree,
            entries,
            pending: None,
            path: &self.path,
        })
    }
}

/// Drops every entry whose key shows up again later in the object.
fn last_wins(entries: &[(String, NodeId)]) -> Vec<(&str, NodeId)> {
    if entries.len() < 2 {
        return entries.iter().map(|(k, id)| (k.as_str(), *id)).collect();
    }
    let mut seen = HashSet::with_capacity(entries.len());
    let mut kept: Vec<(&str, NodeId)> = entries
        .iter()
        .rev()
        .filter(|(k, _)| seen.insert(k.as_str()))
        .map(|(k, id)| (k.as_str(), *id))
        .collect();
    kept.reverse();
    kept
}

macro_rules! deserialize_integer {
    ($method:ident, $ty:ty, $visit:ident) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: Visitor<'de>,
        {
            let n: $ty = self.integer(stringify!($ty))?;
            visitor.$visit(n)
        }
    };
}

impl<'de> de::Deserializer<'de> for Deserializer<'de, '_> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node() {
            Node::Nil => visitor.visit_unit(),
            Node::Bool(b) => visitor.visit_bool(*b),
            Node::Number(Number::Integer(i)) => visitor.visit_i64(*i),
            Node::Number(Number::Unsigned(u)) => visitor.visit_u64(*u),
            Node::Number(Number::Float(f)) => visitor.visit_f64(*f),
            Node::String(s) => visitor.visit_borrowed_str(s),
            Node::Array(items) => self.array(items, visitor),
            Node::Object(entries) => self.object(entries, visitor),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node() {
            Node::Bool(b) => visitor.visit_bool(*b),
            Node::Nil => visitor.visit_bool(false),
            _ => Err(self.mismatch("bool")),
        }
    }

    deserialize_integer!(deserialize_i8, i8, visit_i8);
    deserialize_integer!(deserialize_i16, i16, visit_i16);
    deserialize_integer!(deserialize_i32, i32, visit_i32);
    deserialize_integer!(deserialize_i64, i64, visit_i64);
    deserialize_integer!(deserialize_i128, i128, visit_i128);
    deserialize_integer!(deserialize_u8, u8, visit_u8);
    deserialize_integer!(deserialize_u16, u16, visit_u16);
    deserialize_integer!(deserialize_u32, u32, visit_u32);
    deserialize_integer!(deserialize_u64, u64, visit_u64);
    deserialize_integer!(deserialize_u128, u128, visit_u128);

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let f = self.float()?;
        if f.abs() > f64::from(f32::MAX) {
            return Err(Error::range(self.path, format!("{} does not fit in f32", f)));
        }
        visitor.visit_f32(f as f32)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f64(self.float()?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node() {
            Node::Nil => visitor.visit_char('\0'),
            Node::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(Error::custom(format!(
                        "expected a single character at `{}`, found {:?}",
                        self.path, s
                    ))),
                }
            }
            _ => Err(self.mismatch("char")),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node() {
            Node::String(s) => visitor.visit_borrowed_str(s),
            Node::Nil => visitor.visit_borrowed_str(""),
            _ => Err(self.mismatch("string")),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node() {
            Node::String(s) => visitor.visit_borrowed_bytes(s.as_bytes()),
            Node::Array(items) => self.array(items, visitor),
            Node::Nil => visitor.visit_borrowed_bytes(&[]),
            _ => Err(self.mismatch("bytes")),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node() {
            Node::Nil => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node() {
            Node::Nil => visitor.visit_unit(),
            _ => Err(self.mismatch("nil")),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node() {
            Node::Array(items) => self.array(items, visitor),
            Node::Nil => self.array(&[], visitor),
            _ => Err(self.mismatch("array")),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node() {
            Node::Object(entries) => self.object(entries, visitor),
            Node::Nil => self.object(&[], visitor),
            _ => Err(self.mismatch("object")),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node() {
            Node::String(s) => visitor.visit_enum(BorrowedStrDeserializer::<Error>::new(s)),
            Node::Object(entries) => match last_wins(entries).as_slice() {
                [(variant, id)] => visitor.visit_enum(TaggedVariant {
                    tree: self.tree,
                    variant: *variant,
                    id: *id,
                    path: self.path,
                }),
                _ => Err(Error::custom(format!(
                    "expected an object with exactly one variant key at `{}`",
                    self.path
                ))),
            },
            _ => Err(self.mismatch("enum")),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

struct ArrayAccess<'de, 'a> {
    tree: &'de Tree,
    items: &'de [NodeId],
    index: usize,
    path: &'a Path<'a>,
}

impl<'de> de::SeqAccess<'de> for ArrayAccess<'de, '_> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        let Some(&id) = self.items.get(self.index) else {
            return Ok(None);
        };
        let path = Path::Index {
            parent: self.path,
            index: self.index,
        };
        self.index += 1;
        seed.deserialize(Deserializer {
            tree: self.tree,
            id,
            path,
        })
        .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len() - self.index)
    }
}

struct ObjectAccess<'de, 'a> {
    tree: &'de Tree,
    /// Remaining entries, reversed so the next one pops off the end.
    entries: Vec<(&'de str, NodeId)>,
    pending: Option<(&'de str, NodeId)>,
    path: &'a Path<'a>,
}

impl<'de> de::MapAccess<'de> for ObjectAccess<'de, '_> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        let Some((key, id)) = self.entries.pop() else {
            return Ok(None);
        };
        self.pending = Some((key, id));
        seed.deserialize(KeyDeserializer { key }).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let (key, id) = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("next_value called before next_key"))?;
        seed.deserialize(Deserializer {
            tree: self.tree,
            id,
            path: Path::Field {
                parent: self.path,
                name: key,
            },
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Deserializes an object key. Keys are barewords, so besides strings they
/// can stand for integers or booleans in typed maps.
struct KeyDeserializer<'de> {
    key: &'de str,
}

macro_rules! deserialize_key_integer {
    ($method:ident, $ty:ty, $visit:ident) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: Visitor<'de>,
        {
            let n: $ty = self.key.parse().map_err(|_| {
                Error::custom(format!(
                    "object key {:?} is not a valid {}",
                    self.key,
                    stringify!($ty)
                ))
            })?;
            visitor.$visit(n)
        }
    };
}

impl<'de> de::Deserializer<'de> for KeyDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.key)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.key {
            "true" => visitor.visit_bool(true),
            "false" => visitor.visit_bool(false),
            other => Err(Error::custom(format!(
                "object key {:?} is not a bool",
                other
            ))),
        }
    }

    deserialize_key_integer!(deserialize_i8, i8, visit_i8);
    deserialize_key_integer!(deserialize_i16, i16, visit_i16);
    deserialize_key_integer!(deserialize_i32, i32, visit_i32);
    deserialize_key_integer!(deserialize_i64, i64, visit_i64);
    deserialize_key_integer!(deserialize_u8, u8, visit_u8);
    deserialize_key_integer!(deserialize_u16, u16, visit_u16);
    deserialize_key_integer!(deserialize_u32, u32, visit_u32);
    deserialize_key_integer!(deserialize_u64, u64, visit_u64);

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_enum(BorrowedStrDeserializer::<Error>::new(self.key))
    }

    forward_to_deserialize_any! {
        i128 u128 f32 f64 char str string bytes byte_buf unit unit_struct
        seq tuple tuple_struct map struct identifier ignored_any
    }
}

/// `{Variant: payload}` form of an enum.
struct TaggedVariant<'de, 'p> {
    tree: &'de Tree,
    variant: &'de str,
    id: NodeId,
    path: Path<'p>,
}

impl<'de, 'p> de::EnumAccess<'de> for TaggedVariant<'de, 'p> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(BorrowedStrDeserializer::<Error>::new(self.variant))?;
        Ok((variant, self))
    }
}

impl<'de> TaggedVariant<'de, '_> {
    fn payload<R>(&self, f: impl FnOnce(Deserializer<'de, '_>) -> Result<R>) -> Result<R> {
        f(Deserializer {
            tree: self.tree,
            id: self.id,
            path: Path::Field {
                parent: &self.path,
                name: self.variant,
            },
        })
    }
}

impl<'de> de::VariantAccess<'de> for TaggedVariant<'de, '_> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        self.payload(|payload| de::Deserialize::deserialize(payload))
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        self.payload(|payload| seed.deserialize(payload))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.payload(|payload| de::Deserializer::deserialize_seq(payload, visitor))
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.payload(|payload| de::Deserializer::deserialize_map(payload, visitor))
    }
}
