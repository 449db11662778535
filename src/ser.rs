//! CyBuf serialization.
//!
//! The [`Serializer`] turns any `T: Serialize` into a [`Tree`]; the writer then
//! renders that tree. Serde's data model maps onto the tree like this:
//!
//! - structs → objects, fields in declaration order
//! - maps → objects, keys **sorted** so equal maps always produce equal bytes
//! - sequences, tuples, bytes → arrays
//! - `None`, `()` and unit structs → `nil`
//! - enums are externally tagged: `"Variant"` or `{Variant: payload}`
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_cybuf::{to_string, to_string_indented};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct School { Name: String, Age: u32 }
//!
//! let school = School { Name: "Wuhan University".to_string(), Age: 120 };
//! assert_eq!(to_string(&school).unwrap(), "{Name: \"Wuhan University\" Age: 120}");
//! assert_eq!(
//!     to_string_indented(&school).unwrap(),
//!     "{\n\tName: \"Wuhan University\"\n\tAge: 120\n}"
//! );
//! ```

use crate::lexer::is_bareword;
use crate::options::DEFAULT_RECURSION_LIMIT;
use crate::tree::{Arena, Node, NodeId, Tree};
use crate::{Error, Number, Result};
use serde::ser::{self, Impossible, Serialize};

/// Builds the tree for a single value.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for values with no CyBuf form and
/// [`Error::CyclicValue`] when nesting exceeds the default recursion limit.
pub fn to_tree<T>(value: &T) -> Result<Tree>
where
    T: ?Sized + Serialize,
{
    build_tree(value, DEFAULT_RECURSION_LIMIT)
}

pub(crate) fn build_tree<T>(value: &T, limit: usize) -> Result<Tree>
where
    T: ?Sized + Serialize,
{
    let mut arena = Arena::new();
    let root = value.serialize(Serializer::new(&mut arena, limit))?;
    Ok(arena.finish(root))
}

/// The CyBuf serializer.
///
/// Each call pushes the nodes for one value into the arena and returns the
/// id of that value's node.
pub struct Serializer<'t> {
    arena: &'t mut Arena,
    depth: usize,
    limit: usize,
}

impl<'t> Serializer<'t> {
    pub(crate) fn new(arena: &'t mut Arena, limit: usize) -> Self {
        Serializer {
            arena,
            depth: 0,
            limit,
        }
    }

    fn push(self, node: Node) -> Result<NodeId> {
        Ok(self.arena.push(node))
    }

    /// Fails once the value nests past the limit. Every container and
    /// wrapper passes through here, so a self-referential value cannot
    /// recurse forever.
    fn enter(&self) -> Result<()> {
        if self.depth >= self.limit {
            tracing::debug!(limit = self.limit, "cybuf encode hit the recursion limit");
            return Err(Error::CyclicValue { limit: self.limit });
        }
        Ok(())
    }

    fn nested(self) -> Result<Serializer<'t>> {
        self.enter()?;
        Ok(Serializer {
            arena: self.arena,
            depth: self.depth + 1,
            limit: self.limit,
        })
    }

    /// Serializer for an element of the container that `nested` entered;
    /// the element sits at the depth already counted for it.
    fn child(&mut self) -> Serializer<'_> {
        Serializer {
            arena: &mut *self.arena,
            depth: self.depth,
            limit: self.limit,
        }
    }

    fn number(self, n: Number) -> Result<NodeId> {
        self.push(Node::Number(n))
    }
}

impl<'t> ser::Serializer for Serializer<'t> {
    type Ok = NodeId;
    type Error = Error;

    type SerializeSeq = SeqBuilder<'t>;
    type SerializeTuple = SeqBuilder<'t>;
    type SerializeTupleStruct = SeqBuilder<'t>;
    type SerializeTupleVariant = SeqBuilder<'t>;
    type SerializeMap = MapBuilder<'t>;
    type SerializeStruct = MapBuilder<'t>;
    type SerializeStructVariant = MapBuilder<'t>;

    fn serialize_bool(self, v: bool) -> Result<NodeId> {
        self.push(Node::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<NodeId> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<NodeId> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<NodeId> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<NodeId> {
        self.number(Number::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<NodeId> {
        if let Ok(i) = i64::try_from(v) {
            self.number(Number::Integer(i))
        } else if let Ok(u) = u64::try_from(v) {
            self.number(Number::Unsigned(u))
        } else {
            Err(Error::unsupported_type(format!(
                "integer {} does not fit in 64 bits",
                v
            )))
        }
    }

    fn serialize_u8(self, v: u8) -> Result<NodeId> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<NodeId> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<NodeId> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<NodeId> {
        self.number(Number::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<NodeId> {
        match u64::try_from(v) {
            Ok(u) => self.serialize_u64(u),
            Err(_) => Err(Error::unsupported_type(format!(
                "integer {} does not fit in 64 bits",
                v
            ))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<NodeId> {
        if !v.is_finite() {
            return Err(Error::unsupported_type(format!("non-finite float {}", v)));
        }
        // Widening keeps binary noise (0.1f32 -> 0.10000000149011612); going
        // through the f32's own shortest text keeps the output short.
        let widened = v.to_string().parse::<f64>().unwrap_or(f64::from(v));
        self.number(Number::Float(widened))
    }

    fn serialize_f64(self, v: f64) -> Result<NodeId> {
        if !v.is_finite() {
            return Err(Error::unsupported_type(format!("non-finite float {}", v)));
        }
        self.number(Number::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<NodeId> {
        self.push(Node::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<NodeId> {
        self.push(Node::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<NodeId> {
        self.enter()?;
        let items = v
            .iter()
            .map(|&b| self.arena.push(Node::Number(Number::Integer(i64::from(b)))))
            .collect();
        self.push(Node::Array(items))
    }

    fn serialize_none(self) -> Result<NodeId> {
        self.serialize_unit()
    }

    fn serialize_some<T>(self, value: &T) -> Result<NodeId>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self.nested()?)
    }

    fn serialize_unit(self) -> Result<NodeId> {
        self.push(Node::Nil)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<NodeId> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<NodeId> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<NodeId>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self.nested()?)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<NodeId>
    where
        T: ?Sized + Serialize,
    {
        let mut ser = self.nested()?;
        let payload = value.serialize(ser.child())?;
        ser.push(Node::Object(vec![(variant_key(variant)?, payload)]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder<'t>> {
        Ok(SeqBuilder {
            ser: self.nested()?,
            items: Vec::with_capacity(len.unwrap_or(0)),
            variant: None,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder<'t>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqBuilder<'t>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqBuilder<'t>> {
        Ok(SeqBuilder {
            ser: self.nested()?,
            items: Vec::with_capacity(len),
            variant: Some(variant_key(variant)?),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder<'t>> {
        Ok(MapBuilder {
            ser: self.nested()?,
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
            sort_keys: true,
            variant: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MapBuilder<'t>> {
        Ok(MapBuilder {
            ser: self.nested()?,
            entries: Vec::with_capacity(len),
            pending_key: None,
            sort_keys: false,
            variant: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<MapBuilder<'t>> {
        Ok(MapBuilder {
            ser: self.nested()?,
            entries: Vec::with_capacity(len),
            pending_key: None,
            sort_keys: false,
            variant: Some(variant_key(variant)?),
        })
    }
}

fn variant_key(variant: &str) -> Result<String> {
    if is_bareword(variant) {
        Ok(variant.to_string())
    } else {
        Err(Error::unsupported_type(format!(
            "enum variant {:?} is not a bareword",
            variant
        )))
    }
}

/// Wraps a finished payload as `{Variant: payload}` when serializing an enum.
fn finish(ser: Serializer<'_>, node: Node, variant: Option<String>) -> Result<NodeId> {
    let id = ser.arena.push(node);
    match variant {
        Some(name) => ser.push(Node::Object(vec![(name, id)])),
        None => Ok(id),
    }
}

pub struct SeqBuilder<'t> {
    ser: Serializer<'t>,
    items: Vec<NodeId>,
    variant: Option<String>,
}

impl SeqBuilder<'_> {
    fn push_item<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let id = value.serialize(self.ser.child())?;
        self.items.push(id);
        Ok(())
    }

    fn end_array(self) -> Result<NodeId> {
        finish(self.ser, Node::Array(self.items), self.variant)
    }
}

impl ser::SerializeSeq for SeqBuilder<'_> {
    type Ok = NodeId;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_item(value)
    }

    fn end(self) -> Result<NodeId> {
        self.end_array()
    }
}

impl ser::SerializeTuple for SeqBuilder<'_> {
    type Ok = NodeId;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_item(value)
    }

    fn end(self) -> Result<NodeId> {
        self.end_array()
    }
}

impl ser::SerializeTupleStruct for SeqBuilder<'_> {
    type Ok = NodeId;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_item(value)
    }

    fn end(self) -> Result<NodeId> {
        self.end_array()
    }
}

impl ser::SerializeTupleVariant for SeqBuilder<'_> {
    type Ok = NodeId;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_item(value)
    }

    fn end(self) -> Result<NodeId> {
        self.end_array()
    }
}

pub struct MapBuilder<'t> {
    ser: Serializer<'t>,
    entries: Vec<(String, NodeId)>,
    pending_key: Option<String>,
    sort_keys: bool,
    variant: Option<String>,
}

impl MapBuilder<'_> {
    fn push_field<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let id = value.serialize(self.ser.child())?;
        self.entries.push((key.to_string(), id));
        Ok(())
    }

    fn end_object(mut self) -> Result<NodeId> {
        if self.sort_keys {
            // Stable, so a map that somehow yields a key twice keeps its order.
            self.entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        }
        finish(self.ser, Node::Object(self.entries), self.variant)
    }
}

impl ser::SerializeMap for MapBuilder<'_> {
    type Ok = NodeId;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        let id = value.serialize(self.ser.child())?;
        self.entries.push((key, id));
        Ok(())
    }

    fn end(self) -> Result<NodeId> {
        self.end_object()
    }
}

impl ser::SerializeStruct for MapBuilder<'_> {
    type Ok = NodeId;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if !is_bareword(key) {
            return Err(Error::unsupported_type(format!(
                "field name {:?} is not a bareword",
                key
            )));
        }
        self.push_field(key, value)
    }

    fn end(self) -> Result<NodeId> {
        self.end_object()
    }
}

impl ser::SerializeStructVariant for MapBuilder<'_> {
    type Ok = NodeId;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeStruct::serialize_field(self, key, value)
    }

    fn end(self) -> Result<NodeId> {
        self.end_object()
    }
}

/// Turns a map key into its bareword spelling.
struct MapKeySerializer;

fn key_error(what: &str) -> Error {
    Error::unsupported_type(format!("map key must be a bareword, found {}", what))
}

fn bareword_key(key: String) -> Result<String> {
    if is_bareword(&key) {
        Ok(key)
    } else {
        Err(key_error(&format!("{:?}", key)))
    }
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        bareword_key(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        bareword_key(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        bareword_key(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        bareword_key(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(key_error("a float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(key_error("a float"))
    }

    fn serialize_char(self, v: char) -> Result<String> {
        bareword_key(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        bareword_key(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(key_error("bytes"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(key_error("nil"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Err(key_error("nil"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(key_error("a unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        bareword_key(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(key_error("an enum payload"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_error("a sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_error("a tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_error("a tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_error("an enum payload"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_error("a map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_error("a struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_error("an enum payload"))
    }
}
