//! Scope table
//!
//! DST functions have one flat scope, so source bindings that shadow each
//! other across nested blocks must be serialized into distinct output
//! spellings. Scopes form a parent-pointer tree; lexical sub-blocks share
//! their enclosing function's claimed-name set, function scopes own a
//! fresh one.

use crate::typeinfo::SymbolId;
use std::collections::{HashMap, HashSet};

/// Index into the scope arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

#[derive(Debug)]
struct ScopeData {
    parent: Option<ScopeId>,
    /// Index of the enclosing function's claimed-name set
    locals: usize,
    /// Symbol → DST identifier, recorded where first interned
    bindings: HashMap<SymbolId, String>,
}

/// Arena of lexical scopes
#[derive(Debug, Default)]
pub struct Scopes {
    scopes: Vec<ScopeData>,
    fn_locals: Vec<HashSet<String>>,
}

impl Scopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root scope with its own claimed-name set.
    pub fn fresh(&mut self) -> ScopeId {
        self.alloc(None, None)
    }

    /// Lexical sub-block: shares the parent function's claimed names.
    pub fn nested_block(&mut self, parent: ScopeId) -> ScopeId {
        let locals = self.scopes[parent.0].locals;
        self.alloc(Some(parent), Some(locals))
    }

    /// Function or function-literal scope: fresh claimed-name set.
    pub fn nested_function(&mut self, parent: ScopeId) -> ScopeId {
        self.alloc(Some(parent), None)
    }

    fn alloc(&mut self, parent: Option<ScopeId>, locals: Option<usize>) -> ScopeId {
        let locals = locals.unwrap_or_else(|| {
            self.fn_locals.push(HashSet::new());
            self.fn_locals.len() - 1
        });
        self.scopes.push(ScopeData {
            parent,
            locals,
            bindings: HashMap::new(),
        });
        ScopeId(self.scopes.len() - 1)
    }

    /// DST identifier for `sym`, assigning one on first request.
    /// The blank symbol is never uniquified.
    pub fn intern(&mut self, scope: ScopeId, sym: SymbolId, name: &str) -> String {
        if name == "_" {
            return "_".to_string();
        }
        let mut cursor = Some(scope);
        while let Some(s) = cursor {
            if let Some(id) = self.scopes[s.0].bindings.get(&sym) {
                return id.clone();
            }
            cursor = self.scopes[s.0].parent;
        }
        let id = self.claim(self.scopes[scope.0].locals, name);
        self.scopes[scope.0].bindings.insert(sym, id.clone());
        id
    }

    /// Fresh identifier spelled `base` or `base<N>`; no symbol binding.
    pub fn temp(&mut self, scope: ScopeId, base: &str) -> String {
        let locals = self.scopes[scope.0].locals;
        self.claim(locals, base)
    }

    fn claim(&mut self, locals: usize, name: &str) -> String {
        let set = &mut self.fn_locals[locals];
        let mut candidate = name.to_string();
        let mut n = 1;
        while set.contains(&candidate) {
            candidate = format!("{name}{n}");
            n += 1;
        }
        set.insert(candidate.clone());
        candidate
    }
}
