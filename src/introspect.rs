//! Field-by-field rendering of structured values.

use std::{
    fmt::{self, Write as _},
    panic::{self, AssertUnwindSafe},
};

use serde::ser::{Error as _, Impossible, Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::value::simple_type_name;

/// A plain data carrier that lists its own accessors for deep rendering.
///
/// Implementors report each accessor through [`Fields`]. An accessor that can
/// fail is reported with [`Fields::try_field`]: an error or a panic only blanks
/// that one field, the rest of the listing is still produced.
///
/// # Example
///
/// ```
/// use invocation_logger::{Fields, Introspect};
///
/// struct OrderDTO {
///     id: u32,
///     total: u32,
/// }
///
/// impl Introspect for OrderDTO {
///     fn accessors(&self, fields: &mut Fields<'_>) {
///         fields.field("id", &self.id).field("total", &self.total);
///     }
/// }
/// ```
pub trait Introspect {
    /// Name printed in front of the field listing.
    ///
    /// Defaults to the type name without its module path.
    fn type_name(&self) -> &str {
        simple_type_name(std::any::type_name::<Self>())
    }

    fn accessors(&self, fields: &mut Fields<'_>);
}

/// Collector of `label=<value>` entries for a single structured value.
pub struct Fields<'a> {
    accessor_prefix: &'a str,
    out: &'a mut String,
}

impl Fields<'_> {
    pub fn field(&mut self, name: &str, value: &dyn fmt::Display) -> &mut Self {
        self.entry(name, |out| write!(out, "{value}"))
    }

    pub fn field_debug(&mut self, name: &str, value: &dyn fmt::Debug) -> &mut Self {
        self.entry(name, |out| write!(out, "{value:?}"))
    }

    /// Reports an accessor that may fail.
    ///
    /// The field is rendered with an empty value if the accessor returns an
    /// error or panics.
    pub fn try_field<T, E, F>(&mut self, name: &str, accessor: F) -> &mut Self
    where
        F: FnOnce() -> Result<T, E>,
        T: fmt::Display,
    {
        match panic::catch_unwind(AssertUnwindSafe(accessor)) {
            Ok(Ok(value)) => self.entry(name, |out| write!(out, "{value}")),
            _ => self.entry(name, |_| Ok(())),
        }
    }

    fn entry<F>(&mut self, name: &str, write_value: F) -> &mut Self
    where
        F: FnOnce(&mut String) -> fmt::Result,
    {
        let label = field_label(name, self.accessor_prefix);
        self.out.push_str(label);
        self.out.push_str("=<");
        let start = self.out.len();
        if panic::catch_unwind(AssertUnwindSafe(|| write_value(&mut *self.out))).is_err() {
            self.out.truncate(start);
        }
        self.out.push('>');
        self
    }
}

impl fmt::Debug for Fields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fields")
            .field("accessor_prefix", &self.accessor_prefix)
            .finish_non_exhaustive()
    }
}

/// Derives a field label from an accessor name.
///
/// `getTotal` becomes `Total` and `get_total` becomes `total`; names without
/// the prefix are kept as is.
fn field_label<'n>(name: &'n str, accessor_prefix: &str) -> &'n str {
    if accessor_prefix.is_empty() {
        return name;
    }
    match name.strip_prefix(accessor_prefix) {
        Some(rest) if !rest.is_empty() => rest
            .strip_prefix('_')
            .filter(|rest| !rest.is_empty())
            .unwrap_or(rest),
        _ => name,
    }
}

/// Renders `value` as `TypeName {label=<value>label=<value>}`.
pub(crate) fn render(value: &dyn Introspect, accessor_prefix: &str) -> String {
    let mut out = String::new();
    out.push_str(value.type_name());
    out.push_str(" {");
    {
        let mut fields = Fields {
            accessor_prefix,
            out: &mut out,
        };
        // Whatever was listed before a panic is kept.
        let _ = panic::catch_unwind(AssertUnwindSafe(|| value.accessors(&mut fields)));
    }
    out.push('}');
    out
}

/// Renders the top-level fields of a serializable value in the same shape as [`render`].
///
/// Every field is serialized on its own, so a field that fails to serialize or
/// panics is left empty without affecting the others. A value that is neither
/// a struct nor a map renders without fields.
pub(crate) fn render_serde(type_name: &str, value: &dyn erased_serde::Serialize) -> String {
    let mut out = String::new();
    out.push_str(type_name);
    out.push_str(" {");
    {
        let mut listing = SerdeFields {
            fields: Fields {
                accessor_prefix: "",
                out: &mut out,
            },
            pending_key: String::new(),
        };
        // Whatever was listed before a panic is kept.
        let _ = panic::catch_unwind(AssertUnwindSafe(|| {
            erased_serde::serialize(value, &mut listing)
        }));
    }
    out.push('}');
    out
}

/// A serializer that only accepts a struct or a map and lists its entries.
struct SerdeFields<'a> {
    fields: Fields<'a>,
    pending_key: String,
}

impl SerdeFields<'_> {
    fn entry<T>(&mut self, name: &str, value: &T)
    where
        T: ?Sized + Serialize,
    {
        match to_json(value) {
            Some(value) => self.fields.entry(name, |out| write_json(out, &value)),
            None => self.fields.entry(name, |_| Ok(())),
        };
    }
}

fn to_json<T>(value: &T) -> Option<serde_json::Value>
where
    T: ?Sized + Serialize,
{
    panic::catch_unwind(AssertUnwindSafe(|| serde_json::to_value(value)))
        .ok()?
        .ok()
}

fn write_json(out: &mut String, value: &serde_json::Value) -> fmt::Result {
    match value {
        serde_json::Value::Null => Ok(()),
        serde_json::Value::String(text) => {
            out.push_str(text);
            Ok(())
        }
        other => write!(out, "{other}"),
    }
}

fn not_a_struct() -> serde_json::Error {
    serde_json::Error::custom("only structs and maps have fields")
}

macro_rules! reject_serialize {
    ($($method:ident($($arg:ty),*)),* $(,)?) => {
        $(
            fn $method(self, $(_: $arg),*) -> Result<(), serde_json::Error> {
                Err(not_a_struct())
            }
        )*
    };
}

impl Serializer for &mut SerdeFields<'_> {
    type Ok = ();
    type Error = serde_json::Error;

    type SerializeSeq = Impossible<(), serde_json::Error>;
    type SerializeTuple = Impossible<(), serde_json::Error>;
    type SerializeTupleStruct = Impossible<(), serde_json::Error>;
    type SerializeTupleVariant = Impossible<(), serde_json::Error>;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Impossible<(), serde_json::Error>;

    reject_serialize!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_none(),
        serialize_unit(),
        serialize_unit_struct(&'static str),
        serialize_unit_variant(&'static str, u32, &'static str),
    );

    fn serialize_some<T>(self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), Self::Error>
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
    ) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        Err(not_a_struct())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(not_a_struct())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(not_a_struct())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(not_a_struct())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(not_a_struct())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(self)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(not_a_struct())
    }
}

impl SerializeStruct for &mut SerdeFields<'_> {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.entry(key, value);
        Ok(())
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl SerializeMap for &mut SerdeFields<'_> {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key.clear();
        if let Some(key) = to_json(key) {
            let _ = write_json(&mut self.pending_key, &key);
        }
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        let key = std::mem::take(&mut self.pending_key);
        self.entry(&key, value);
        Ok(())
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}
