//! Type-info oracle
//!
//! The translator's view of the frontend type checker: expression types,
//! identifier resolution, implicit type-switch bindings, and the
//! predeclared universe. Builtins are identified by symbol identity, never
//! by spelling, so user code that shadows `len` or `make` dispatches as an
//! ordinary call.

mod types;

pub use types::{BasicKind, StructField, Type};

use crate::goast::NodeId;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Predeclared builtin functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Builtin {
    Make,
    New,
    Len,
    Cap,
    Complex,
    Real,
    Imag,
    Delete,
    Append,
    Copy,
    Close,
    Panic,
    Recover,
    Print,
    Println,
}

/// Predeclared universe constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UniverseConst {
    True,
    False,
    Nil,
}

/// What a symbol denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    Var,
    Const,
    Func,
    TypeName,
    Builtin(Builtin),
    Universe(UniverseConst),
}

/// Index into the symbol arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// Resolved program entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
}

/// Spelling → builtin kind, used by frontends when they populate the
/// predeclared scope. Dispatch in the translator itself goes through
/// symbol identity.
pub static BUILTIN_TABLE: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("make", Builtin::Make);
    m.insert("new", Builtin::New);
    m.insert("len", Builtin::Len);
    m.insert("cap", Builtin::Cap);
    m.insert("complex", Builtin::Complex);
    m.insert("real", Builtin::Real);
    m.insert("imag", Builtin::Imag);
    m.insert("delete", Builtin::Delete);
    m.insert("append", Builtin::Append);
    m.insert("copy", Builtin::Copy);
    m.insert("close", Builtin::Close);
    m.insert("panic", Builtin::Panic);
    m.insert("recover", Builtin::Recover);
    m.insert("print", Builtin::Print);
    m.insert("println", Builtin::Println);
    m
});

/// Side tables produced by the frontend type checker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Resolved type of expressions and type expressions
    types: HashMap<NodeId, Type>,
    /// Identifier occurrence → symbol (defs and uses)
    objects: HashMap<NodeId, SymbolId>,
    /// Type-switch case clause → implicitly declared symbol
    implicits: HashMap<NodeId, SymbolId>,
    /// Symbol arena
    symbols: Vec<Symbol>,
}

impl TypeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_symbol(&mut self, name: impl Into<String>, kind: SymbolKind) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            name: name.into(),
            kind,
        });
        id
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn record_type(&mut self, node: NodeId, typ: Type) {
        self.types.insert(node, typ);
    }

    pub fn record_object(&mut self, node: NodeId, sym: SymbolId) {
        self.objects.insert(node, sym);
    }

    pub fn record_implicit(&mut self, clause: NodeId, sym: SymbolId) {
        self.implicits.insert(clause, sym);
    }

    /// *type-of(expression)*
    pub fn type_of(&self, node: NodeId) -> Option<&Type> {
        self.types.get(&node)
    }

    /// *object-of(identifier)*
    pub fn object_of(&self, node: NodeId) -> Option<SymbolId> {
        self.objects.get(&node).copied()
    }

    /// *implicits(case-clause)*
    pub fn implicit_of(&self, clause: NodeId) -> Option<SymbolId> {
        self.implicits.get(&clause).copied()
    }
}
