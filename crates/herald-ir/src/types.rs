//! Type references in contract type tables
//!
//! A `TypeRef` describes the type of a property or constructor parameter
//! as it appears on the wire: a scalar, an array, or a named (possibly
//! generic) type resolved later against a module registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar (value) types with a well-known wire representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scalar {
    /// boolean
    Bool,
    /// 32-bit signed integer
    I32,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit signed integer
    I64,
    /// 64-bit unsigned integer
    U64,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
    /// fixed-point decimal (currency)
    Decimal,
    /// UTF-8 text
    String,
    /// unique identifier (uuid/guid)
    Uuid,
    /// date + time instant
    DateTime,
    /// calendar date
    Date,
    /// time span
    Duration,
}

impl Scalar {
    /// Canonical display name
    pub fn name(&self) -> &'static str {
        match self {
            Scalar::Bool => "bool",
            Scalar::I32 => "i32",
            Scalar::U32 => "u32",
            Scalar::I64 => "i64",
            Scalar::U64 => "u64",
            Scalar::F32 => "f32",
            Scalar::F64 => "f64",
            Scalar::Decimal => "decimal",
            Scalar::String => "string",
            Scalar::Uuid => "uuid",
            Scalar::DateTime => "datetime",
            Scalar::Date => "date",
            Scalar::Duration => "duration",
        }
    }

    /// Parse from a simple type name as emitted by contract compilers.
    ///
    /// Accepts the common aliases for each scalar (e.g. `Guid` for
    /// `Uuid`, `Text` for `String`, `Timestamp` for `DateTime`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Some(Scalar::Bool),
            "i32" | "int" | "int32" => Some(Scalar::I32),
            "u32" | "uint" | "uint32" => Some(Scalar::U32),
            "i64" | "long" | "int64" => Some(Scalar::I64),
            "u64" | "ulong" | "uint64" => Some(Scalar::U64),
            "f32" | "float" => Some(Scalar::F32),
            "f64" | "double" => Some(Scalar::F64),
            "decimal" | "money" | "currency" => Some(Scalar::Decimal),
            "string" | "text" => Some(Scalar::String),
            "uuid" | "guid" => Some(Scalar::Uuid),
            "datetime" | "timestamp" | "datetimeoffset" => Some(Scalar::DateTime),
            "date" | "dateonly" => Some(Scalar::Date),
            "duration" | "timespan" => Some(Scalar::Duration),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A reference to a type, as recorded in a module manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeRef {
    /// A scalar value type
    Scalar(Scalar),

    /// An array of an element type
    Array(Box<TypeRef>),

    /// A named type, possibly generic.
    ///
    /// `qualified` is the namespace-qualified name
    /// (`Acme.Billing.Contracts.Money`). Well-known collection shapes
    /// (`List`, `Set`, `Map`, ...) appear here under their simple name
    /// with their element types in `args`.
    Named {
        qualified: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<TypeRef>,
    },
}

impl TypeRef {
    /// A named type without generic arguments
    pub fn named(qualified: impl Into<String>) -> Self {
        TypeRef::Named {
            qualified: qualified.into(),
            args: vec![],
        }
    }

    /// A generic named type
    pub fn generic(qualified: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            qualified: qualified.into(),
            args,
        }
    }

    /// An array of the given element type
    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    /// Simple (unqualified) name of the referenced type
    pub fn simple_name(&self) -> &str {
        match self {
            TypeRef::Scalar(s) => s.name(),
            TypeRef::Array(_) => "array",
            TypeRef::Named { qualified, .. } => {
                qualified.rsplit('.').next().unwrap_or(qualified)
            }
        }
    }

    /// Human-friendly display form (`List<Money>`, `uuid`, `Money[]`)
    pub fn display(&self) -> String {
        match self {
            TypeRef::Scalar(s) => s.name().to_string(),
            TypeRef::Array(el) => format!("{}[]", el.display()),
            TypeRef::Named { qualified, args } => {
                let name = qualified.rsplit('.').next().unwrap_or(qualified);
                if args.is_empty() {
                    name.to_string()
                } else {
                    let inner: Vec<String> = args.iter().map(|a| a.display()).collect();
                    format!("{}<{}>", name, inner.join(", "))
                }
            }
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
