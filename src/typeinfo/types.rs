//! Source-language type model
//!
//! A structural mirror of the frontend type checker's view, reduced to
//! what zero-value synthesis and builtin dispatch need.

use serde::{Deserialize, Serialize};

/// Basic (predeclared scalar) type kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
}

impl BasicKind {
    pub fn is_boolean(self) -> bool {
        self == BasicKind::Bool
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            BasicKind::Int
                | BasicKind::Int8
                | BasicKind::Int16
                | BasicKind::Int32
                | BasicKind::Int64
                | BasicKind::Uint
                | BasicKind::Uint8
                | BasicKind::Uint16
                | BasicKind::Uint32
                | BasicKind::Uint64
                | BasicKind::Uintptr
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, BasicKind::Float32 | BasicKind::Float64)
    }

    pub fn is_string(self) -> bool {
        self == BasicKind::String
    }
}

/// Named struct field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub typ: Type,
}

/// Resolved type of an expression or type expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Type {
    Basic(BasicKind),
    Pointer(Box<Type>),
    Slice(Box<Type>),
    Array { len: u64, elem: Box<Type> },
    Map { key: Box<Type>, value: Box<Type> },
    Chan(Box<Type>),
    /// Function type; the translator never inspects params or results
    Signature,
    Interface,
    Named { name: String, underlying: Box<Type> },
    Struct { fields: Vec<StructField> },
}

impl Type {
    /// Chase `Named` links down to the structural type.
    pub fn underlying(&self) -> &Type {
        let mut t = self;
        while let Type::Named { underlying, .. } = t {
            t = underlying;
        }
        t
    }

    /// Whether the underlying type is the basic string type.
    pub fn is_string(&self) -> bool {
        matches!(self.underlying(), Type::Basic(k) if k.is_string())
    }

    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Type::Basic(k) => format!("{k:?}").to_lowercase(),
            Type::Pointer(t) => format!("*{}", t.describe()),
            Type::Slice(t) => format!("[]{}", t.describe()),
            Type::Array { len, elem } => format!("[{len}]{}", elem.describe()),
            Type::Map { key, value } => {
                format!("map[{}]{}", key.describe(), value.describe())
            }
            Type::Chan(t) => format!("chan {}", t.describe()),
            Type::Signature => "func".to_string(),
            Type::Interface => "interface".to_string(),
            Type::Named { name, .. } => name.clone(),
            Type::Struct { .. } => "struct".to_string(),
        }
    }
}
