//! Serde adapters for loosely-typed inputs.
//!
//! Hosts that do not know the shape of their data statically (JSON values,
//! configuration trees, ...) can hand any `Serialize` value to
//! [`Config::parse_value`](crate::Config::parse_value) and
//! [`Config::build_value`](crate::Config::build_value). The serializers in
//! this module check the shape while walking the value:
//!
//! - a query must be a scalar or nothing (`TypeMismatch` otherwise),
//! - pairs must be a sequence of two-element sequences of scalars
//!   (`InvalidPair` otherwise).

use std::fmt::Display;

use serde::ser::{self, Impossible, Serialize};

use crate::build::PairWriter;
use crate::error::{Error, Result};
use crate::scalar::Scalar;

impl ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Custom(msg.to_string())
    }
}

fn query_mismatch(found: &'static str) -> Error {
    Error::TypeMismatch(found)
}

fn pair_mismatch(found: &'static str) -> Error {
    Error::invalid_pair(format_args!("keys and values must be scalars, found {found}"))
}

/// Converts a query string input into its string form.
pub(crate) fn query_input<T>(query: &T) -> Result<Option<String>>
where
    T: Serialize + ?Sized,
{
    let scalar = query.serialize(ScalarSerializer {
        mismatch: query_mismatch,
    })?;
    Ok(scalar.map(Scalar::into_string))
}

/// Writes every pair of a loosely-typed pair list.
pub(crate) fn write_pairs<T>(pairs: &T, writer: &mut PairWriter<'_>) -> Result<()>
where
    T: Serialize + ?Sized,
{
    pairs.serialize(PairListSerializer { writer })
}

/// Serializes a single value into a [`Scalar`].
///
/// `None` and `()` give `Ok(None)`. Compound values are rejected with the
/// error built by `mismatch`.
struct ScalarSerializer {
    mismatch: fn(&'static str) -> Error,
}

impl ScalarSerializer {
    fn reject<T>(&self, found: &'static str) -> Result<T> {
        Err((self.mismatch)(found))
    }
}

macro_rules! serialize_scalar {
    (
        $($ty:ty => $meth:ident,)*) => {
        $(
            fn $meth(self, v: $ty) -> Result<Self::Ok> {
                Ok(Some(Scalar::from(v)))
            }
        )*
    };
}

impl ser::Serializer for ScalarSerializer {
    type Ok = Option<Scalar<'static>>;
    type Error = Error;
    type SerializeSeq = Impossible<Self::Ok, Error>;
    type SerializeTuple = Impossible<Self::Ok, Error>;
    type SerializeTupleStruct = Impossible<Self::Ok, Error>;
    type SerializeTupleVariant = Impossible<Self::Ok, Error>;
    type SerializeMap = Impossible<Self::Ok, Error>;
    type SerializeStruct = Impossible<Self::Ok, Error>;
    type SerializeStructVariant = Impossible<Self::Ok, Error>;

    serialize_scalar! {
        bool => serialize_bool,
        u8  => serialize_u8,
        u16 => serialize_u16,
        u32 => serialize_u32,
        u64 => serialize_u64,
        i8  => serialize_i8,
        i16 => serialize_i16,
        i32 => serialize_i32,
        i64 => serialize_i64,
        f32 => serialize_f32,
        f64 => serialize_f64,
        char => serialize_char,
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        Ok(Some(Scalar::from(v.to_owned())))
    }

    fn serialize_bytes(self, _value: &[u8]) -> Result<Self::Ok> {
        self.reject("bytes")
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        self.reject("a unit struct")
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        Ok(Some(Scalar::from(variant)))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok> {
        self.reject("an enum variant")
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.reject("a sequence")
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        self.reject("a tuple")
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.reject("a tuple struct")
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.reject("an enum variant")
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        self.reject("a map")
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        self.reject("a struct")
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.reject("an enum variant")
    }
}

macro_rules! reject_scalars {
    (
        $($meth:ident($ty:ty) => $found:literal,)*) => {
        $(
            fn $meth(self, _v: $ty) -> Result<Self::Ok> {
                Err(Self::unexpected($found))
            }
        )*
    };
}

/// Top level of a pair list: a sequence (or the values of a map) whose
/// elements are pairs.
struct PairListSerializer<'w, 'c> {
    writer: &'w mut PairWriter<'c>,
}

impl PairListSerializer<'_, '_> {
    fn unexpected(found: &'static str) -> Error {
        Error::invalid_pair(format_args!("expected a list of pairs, found {found}"))
    }
}

impl<'w, 'c> ser::Serializer for PairListSerializer<'w, 'c> {
    type Ok = ();
    type Error = Error;
    type SerializeSeq = PairList<'w, 'c>;
    type SerializeTuple = PairList<'w, 'c>;
    type SerializeTupleStruct = PairList<'w, 'c>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = PairList<'w, 'c>;
    type SerializeStruct = PairList<'w, 'c>;
    type SerializeStructVariant = Impossible<(), Error>;

    reject_scalars! {
        serialize_bool(bool) => "a boolean",
        serialize_i8(i8) => "a number",
        serialize_i16(i16) => "a number",
        serialize_i32(i32) => "a number",
        serialize_i64(i64) => "a number",
        serialize_u8(u8) => "a number",
        serialize_u16(u16) => "a number",
        serialize_u32(u32) => "a number",
        serialize_u64(u64) => "a number",
        serialize_f32(f32) => "a number",
        serialize_f64(f64) => "a number",
        serialize_char(char) => "a string",
        serialize_str(&str) => "a string",
        serialize_bytes(&[u8]) => "bytes",
    }

    /// Nothing to write: the builder will return `None`.
    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok> {
        Err(Self::unexpected("an enum variant"))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok> {
        Err(Self::unexpected("an enum variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(PairList { writer: self.writer })
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(PairList { writer: self.writer })
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(PairList { writer: self.writer })
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Self::unexpected("an enum variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(PairList { writer: self.writer })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(PairList { writer: self.writer })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Self::unexpected("an enum variant"))
    }
}

#[doc(hidden)]
pub struct PairList<'w, 'c> {
    writer: &'w mut PairWriter<'c>,
}

impl PairList<'_, '_> {
    fn write<T: ?Sized + Serialize>(&mut self, pair: &T) -> Result<()> {
        pair.serialize(PairSerializer {
            writer: self.writer,
        })
    }
}

impl ser::SerializeSeq for PairList<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.write(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(())
    }
}

impl ser::SerializeTuple for PairList<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.write(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for PairList<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.write(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(())
    }
}

/// The keys of a map of pairs are ignored, only the values are pairs.
impl ser::SerializeMap for PairList<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, _key: &T) -> Result<()> {
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.write(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(())
    }
}

impl ser::SerializeStruct for PairList<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Result<()> {
        self.write(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(())
    }
}

/// A single pair: a sequence of exactly two elements.
struct PairSerializer<'w, 'c> {
    writer: &'w mut PairWriter<'c>,
}

impl PairSerializer<'_, '_> {
    fn unexpected(found: &'static str) -> Error {
        Error::invalid_pair(format_args!("expected a (key, value) pair, found {found}"))
    }
}

impl<'w, 'c> ser::Serializer for PairSerializer<'w, 'c> {
    type Ok = ();
    type Error = Error;
    type SerializeSeq = PairElements<'w, 'c>;
    type SerializeTuple = PairElements<'w, 'c>;
    type SerializeTupleStruct = PairElements<'w, 'c>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = Impossible<(), Error>;
    type SerializeStructVariant = Impossible<(), Error>;

    reject_scalars! {
        serialize_bool(bool) => "a boolean",
        serialize_i8(i8) => "a number",
        serialize_i16(i16) => "a number",
        serialize_i32(i32) => "a number",
        serialize_i64(i64) => "a number",
        serialize_u8(u8) => "a number",
        serialize_u16(u16) => "a number",
        serialize_u32(u32) => "a number",
        serialize_u64(u64) => "a number",
        serialize_f32(f32) => "a number",
        serialize_f64(f64) => "a number",
        serialize_char(char) => "a string",
        serialize_str(&str) => "a string",
        serialize_bytes(&[u8]) => "bytes",
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Err(Self::unexpected("nothing"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Err(Self::unexpected("nothing"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        Err(Self::unexpected("a unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok> {
        Err(Self::unexpected("an enum variant"))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok> {
        Err(Self::unexpected("an enum variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(PairElements::new(self.writer))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(PairElements::new(self.writer))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(PairElements::new(self.writer))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Self::unexpected("an enum variant"))
    }

    /// Associative pairs such as `{"foo": "bar"}` are rejected: only the
    /// position of an element says whether it is the key or the value.
    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Self::unexpected("a map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Self::unexpected("a struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Self::unexpected("an enum variant"))
    }
}

#[doc(hidden)]
pub struct PairElements<'w, 'c> {
    writer: &'w mut PairWriter<'c>,
    key: Option<Scalar<'static>>,
    value: Option<Option<Scalar<'static>>>,
    extra: usize,
}

impl<'w, 'c> PairElements<'w, 'c> {
    fn new(writer: &'w mut PairWriter<'c>) -> Self {
        Self {
            writer,
            key: None,
            value: None,
            extra: 0,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, element: &T) -> Result<()> {
        if self.key.is_none() {
            let key = element.serialize(ScalarSerializer {
                mismatch: pair_mismatch,
            })?;
            let Some(key) = key else {
                return Err(Error::invalid_pair("the key of a pair cannot be empty"));
            };
            self.key = Some(key);
        } else if self.value.is_none() {
            self.value = Some(element.serialize(ScalarSerializer {
                mismatch: pair_mismatch,
            })?);
        } else {
            // keep counting to report the actual length
            self.extra += 1;
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        match (self.key, self.value) {
            (Some(key), Some(value)) if self.extra == 0 => {
                let value = value.map(|v| v.into_string());
                self.writer
                    .write_pair(&key.to_query_string(), value.as_deref());
                Ok(())
            }
            (key, value) => {
                let len = usize::from(key.is_some()) + usize::from(value.is_some()) + self.extra;
                Err(Error::invalid_pair(format_args!(
                    "a pair must have exactly two elements, found {len}"
                )))
            }
        }
    }
}

impl ser::SerializeSeq for PairElements<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.finish()
    }
}

impl ser::SerializeTuple for PairElements<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for PairElements<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.finish()
    }
}
