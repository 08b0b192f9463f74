//! AST construction helpers
//!
//! An in-process stand-in for the external frontend: allocates node ids,
//! owns the [`TypeInfo`] under construction, and keeps the symbol
//! bookkeeping in one place. Tests build their typed inputs through this;
//! embedders can too.

use super::{CaseClause, Expr, ExprKind, Ident, NodeId, Pos, Stmt, StmtKind};
use crate::typeinfo::{SymbolId, SymbolKind, Type, TypeInfo, UniverseConst, BUILTIN_TABLE};
use std::collections::HashMap;

/// Incremental builder for a typed AST plus its oracle
#[derive(Debug)]
pub struct AstBuilder {
    next_id: u32,
    info: TypeInfo,
    predeclared: HashMap<String, SymbolId>,
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AstBuilder {
    /// Create a builder with the predeclared universe registered:
    /// `true` / `false` / `nil` and every builtin in [`BUILTIN_TABLE`].
    pub fn new() -> Self {
        let mut info = TypeInfo::new();
        let mut predeclared = HashMap::new();
        for (name, value) in [
            ("true", UniverseConst::True),
            ("false", UniverseConst::False),
            ("nil", UniverseConst::Nil),
        ] {
            let sym = info.new_symbol(name, SymbolKind::Universe(value));
            predeclared.insert(name.to_string(), sym);
        }
        for (name, builtin) in BUILTIN_TABLE.iter() {
            let sym = info.new_symbol(*name, SymbolKind::Builtin(*builtin));
            predeclared.insert(name.to_string(), sym);
        }
        Self {
            next_id: 0,
            info,
            predeclared,
        }
    }

    fn next(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Finish building and hand over the oracle.
    pub fn finish(self) -> TypeInfo {
        self.info
    }

    pub fn info(&self) -> &TypeInfo {
        &self.info
    }

    /// Look up a predeclared symbol (`len`, `make`, `true`, ...).
    pub fn predeclared(&self, name: &str) -> Option<SymbolId> {
        self.predeclared.get(name).copied()
    }

    pub fn symbol(&mut self, name: &str, kind: SymbolKind) -> SymbolId {
        self.info.new_symbol(name, kind)
    }

    /// Fresh variable symbol. Distinct calls yield distinct symbols even
    /// for the same spelling, matching shadowing in nested source scopes.
    pub fn var(&mut self, name: &str) -> SymbolId {
        self.symbol(name, SymbolKind::Var)
    }

    pub fn func(&mut self, name: &str) -> SymbolId {
        self.symbol(name, SymbolKind::Func)
    }

    pub fn type_name(&mut self, name: &str) -> SymbolId {
        self.symbol(name, SymbolKind::TypeName)
    }

    pub fn constant(&mut self, name: &str) -> SymbolId {
        self.symbol(name, SymbolKind::Const)
    }

    /// Identifier occurrence resolving to `sym`.
    pub fn ident(&mut self, sym: SymbolId) -> Ident {
        let id = self.next();
        self.info.record_object(id, sym);
        Ident {
            id,
            pos: Pos::unknown(),
            name: self.info.symbol(sym).name.clone(),
        }
    }

    /// The blank identifier; resolves to nothing.
    pub fn blank_ident(&mut self) -> Ident {
        Ident {
            id: self.next(),
            pos: Pos::unknown(),
            name: "_".to_string(),
        }
    }

    /// Identifier occurrence that the frontend failed to resolve.
    pub fn unresolved_ident(&mut self, name: &str) -> Ident {
        Ident {
            id: self.next(),
            pos: Pos::unknown(),
            name: name.to_string(),
        }
    }

    /// Wrap an expression kind with a fresh node id.
    pub fn expr(&mut self, kind: ExprKind) -> Expr {
        Expr {
            id: self.next(),
            pos: Pos::unknown(),
            kind,
        }
    }

    /// Wrap an expression kind and record its resolved type.
    pub fn typed(&mut self, kind: ExprKind, typ: Type) -> Expr {
        let expr = self.expr(kind);
        self.info.record_type(expr.id, typ);
        expr
    }

    /// Record the resolved type of an already-built expression.
    pub fn with_type(&mut self, expr: Expr, typ: Type) -> Expr {
        self.info.record_type(expr.id, typ);
        expr
    }

    /// Identifier expression resolving to `sym`.
    pub fn name(&mut self, sym: SymbolId) -> Expr {
        let ident = self.ident(sym);
        self.expr(ExprKind::Ident(ident))
    }

    /// Identifier expression with a recorded type.
    pub fn typed_name(&mut self, sym: SymbolId, typ: Type) -> Expr {
        let ident = self.ident(sym);
        self.typed(ExprKind::Ident(ident), typ)
    }

    pub fn stmt(&self, kind: StmtKind) -> Stmt {
        Stmt {
            pos: Pos::unknown(),
            kind,
        }
    }

    /// Case clause with a fresh id; pass empty `list` for `default`.
    pub fn case(&mut self, list: Vec<Expr>, body: Vec<Stmt>) -> CaseClause {
        CaseClause {
            id: self.next(),
            pos: Pos::unknown(),
            list,
            body,
        }
    }

    /// Record the implicitly declared per-clause symbol of a type switch.
    pub fn implicit(&mut self, clause: &CaseClause, sym: SymbolId) {
        self.info.record_implicit(clause.id, sym);
    }
}
