//! Runtime values held in field slots and passed through accessors.
//!
//! A [`Value`] is what a getter returns and a setter receives. Values are dynamically tagged; the typed
//! contract lives on the field ([`TypeRef`]) and is checked with [`Value::conforms_to`].
//!
//! ## Notes
//! - Equality is *observable* equality: floats compare by bit pattern (so a stored NaN reads back equal),
//!   objects compare by reference identity.
//! - Natural defaults follow the storage category: numeric zero for primitives, the zero instant for
//!   `date-time`, null for anything that admits null.

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use typeforge_core::{BuiltinType, TypeRef};

use crate::backend::Instance;

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    DateTime(NaiveDateTime),
    Str(Arc<str>),
    Array(Arc<[Value]>),
    Object(Instance),
}

/// The zero instant of `date-time`: `0001-01-01T00:00:00`.
pub fn zero_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

impl Value {
    /// The natural default of `ty`: what an uninitialized field slot of that type holds.
    ///
    /// Unembeddable types have no storage; they default to `Null`, and the backend never allocates slots
    /// for them.
    pub fn default_for(ty: &TypeRef) -> Value {
        match ty {
            TypeRef::Builtin(id) => match id {
                BuiltinType::Bool => Value::Bool(false),
                BuiltinType::Char => Value::Char('\0'),
                BuiltinType::Int8 => Value::I8(0),
                BuiltinType::Int16 => Value::I16(0),
                BuiltinType::Int32 => Value::I32(0),
                BuiltinType::Int64 => Value::I64(0),
                BuiltinType::UInt8 => Value::U8(0),
                BuiltinType::UInt16 => Value::U16(0),
                BuiltinType::UInt32 => Value::U32(0),
                BuiltinType::UInt64 => Value::U64(0),
                BuiltinType::Float32 => Value::F32(0.0),
                BuiltinType::Float64 => Value::F64(0.0),
                BuiltinType::DateTime => Value::DateTime(zero_instant()),
                BuiltinType::String | BuiltinType::Object => Value::Null,
            },
            _ => Value::Null,
        }
    }

    pub fn str(s: impl AsRef<str>) -> Value {
        Value::Str(Arc::from(s.as_ref()))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Value {
        Value::Array(items.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Instance> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Short name of the runtime tag, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::I8(_) => "int8",
            Value::I16(_) => "int16",
            Value::I32(_) => "int32",
            Value::I64(_) => "int64",
            Value::U8(_) => "uint8",
            Value::U16(_) => "uint16",
            Value::U32(_) => "uint32",
            Value::U64(_) => "uint64",
            Value::F32(_) => "float32",
            Value::F64(_) => "float64",
            Value::DateTime(_) => "date-time",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Whether this value may be stored in a slot of type `ty` without conversion.
    pub fn conforms_to(&self, ty: &TypeRef) -> bool {
        if self.is_null() {
            return ty.admits_null();
        }
        match ty {
            TypeRef::Builtin(id) => matches!(
                (id, self),
                (BuiltinType::Object, _)
                    | (BuiltinType::Bool, Value::Bool(_))
                    | (BuiltinType::Char, Value::Char(_))
                    | (BuiltinType::Int8, Value::I8(_))
                    | (BuiltinType::Int16, Value::I16(_))
                    | (BuiltinType::Int32, Value::I32(_))
                    | (BuiltinType::Int64, Value::I64(_))
                    | (BuiltinType::UInt8, Value::U8(_))
                    | (BuiltinType::UInt16, Value::U16(_))
                    | (BuiltinType::UInt32, Value::U32(_))
                    | (BuiltinType::UInt64, Value::U64(_))
                    | (BuiltinType::Float32, Value::F32(_))
                    | (BuiltinType::Float64, Value::F64(_))
                    | (BuiltinType::DateTime, Value::DateTime(_))
                    | (BuiltinType::String, Value::Str(_))
            ),
            TypeRef::Nullable(inner) => self.conforms_to(inner),
            TypeRef::Array(elem) => match self {
                Value::Array(items) => items.iter().all(|item| item.conforms_to(elem)),
                _ => false,
            },
            TypeRef::Class(class) => match self {
                Value::Object(obj) => obj.type_def().id() == class.id,
                _ => false,
            },
            TypeRef::GenericParam(_) | TypeRef::ByRef(_) | TypeRef::Void => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a.to_bits() == b.to_bits(),
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{:?}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
            Value::Str(v) => write!(f, "{:?}", v),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(obj) => write!(f, "<{}>", obj.type_def().full_name()),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    NaiveDateTime => DateTime,
    Instance => Object,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::str(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(Arc::from(v))
    }
}
