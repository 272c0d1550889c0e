//! Bindable values and raw SQL expressions.
//!
//! Every value position in a statement (comparison operand, BETWEEN bound,
//! IN list item, INSERT/UPDATE value) holds an [`Operand`]:
//!
//! - [`Operand::Bind`] becomes a `?` placeholder and its [`Value`] is appended
//!   to the statement's parameter list.
//! - [`Operand::Raw`] wraps an [`Expression`] that is written into the SQL
//!   text as-is and never bound.
//!
//! # Example
//! ```ignore
//! use polysql::{Dialect, raw, table};
//!
//! let stmt = table("users", Dialect::Generic)
//!     .eq("status", "active")
//!     .lt("created_at", raw("NOW()"))
//!     .select_all(&["*"])?;
//! assert_eq!(stmt.params.len(), 1);
//! # Ok::<(), polysql::QueryError>(())
//! ```

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// A value bound to a positional `?` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Bytes),
    Json(serde_json::Value),
    Uuid(Uuid),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
}

impl Value {
    /// Check if this is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short type name, used in logs and CLI output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Json(_) => "json",
            Value::Uuid(_) => "uuid",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Timestamp(_) => "timestamp",
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(_) => "decimal",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "'{v}'"),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Value::Json(v) => write!(f, "{v}"),
            Value::Uuid(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{v}"),
            Value::DateTime(v) => write!(f, "{v}"),
            Value::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v $(as $cast)?)
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int,
    u8 => Int as i64,
    u16 => Int as i64,
    u32 => Int as i64,
    u64 => UInt,
    f32 => Float as f64,
    f64 => Float,
    String => Text,
    Bytes => Bytes,
    serde_json::Value => Json,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    DateTime<Utc> => Timestamp,
}

#[cfg(feature = "rust_decimal")]
impl_from_value! {
    rust_decimal::Decimal => Decimal,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(v))
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A raw SQL fragment written into the statement verbatim.
///
/// Never quoted and never bound. Do not build expressions from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression(String);

impl Expression {
    /// Wrap a raw SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Expression(sql.into())
    }

    /// The fragment text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for [`Expression::new`].
pub fn raw(sql: impl Into<String>) -> Expression {
    Expression::new(sql)
}

/// A value position: bound parameter or inlined expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Bind(Value),
    Raw(Expression),
}

impl Operand {
    /// Check if this operand is inlined rather than bound.
    pub fn is_raw(&self) -> bool {
        matches!(self, Operand::Raw(_))
    }
}

impl<T: Into<Value>> From<T> for Operand {
    fn from(v: T) -> Self {
        Operand::Bind(v.into())
    }
}

impl From<Expression> for Operand {
    fn from(e: Expression) -> Self {
        Operand::Raw(e)
    }
}

impl From<&Expression> for Operand {
    fn from(e: &Expression) -> Self {
        Operand::Raw(e.clone())
    }
}
