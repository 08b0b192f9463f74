//! Lowering module - typed SRC AST to DST AST translation
//!
//! The driver walks top-level declarations and delegates to the
//! expression translator (`exprs`) and statement translator (`stmts`).
//! One [`Lowerer`] translates one input; nothing is shared across runs.

pub mod builtins;
pub mod exprs;
pub mod scope;
pub mod stmts;


pub use scope::{ScopeId, Scopes};

use crate::error::{KuchinawaError, Result};
use crate::goast::{
    Block, Decl, Field, File, FuncDecl, FuncType, GenDecl, Ident, Pos, Spec, Stmt, StmtKind,
    TypeSpec,
};
use crate::pyast as py;
use crate::typeinfo::{StructField, Type, TypeInfo};
use builtins::*;
use std::collections::HashMap;

/// Translator state for one compilation input
pub struct Lowerer<'a> {
    info: &'a TypeInfo,
    scopes: Scopes,
    /// Current lexical scope
    scope: ScopeId,
    /// Name of the current function's defer list, when one is in effect
    defers: Option<String>,
}

/// Output partitions collected while walking declarations
#[derive(Default)]
struct ModuleParts {
    values: Vec<py::Stmt>,
    types: Vec<py::Stmt>,
    classes: Vec<py::ClassDef>,
    functions: Vec<py::FunctionDef>,
    methods: HashMap<String, Vec<py::FunctionDef>>,
}

impl<'a> Lowerer<'a> {
    pub fn new(info: &'a TypeInfo) -> Self {
        let mut scopes = Scopes::new();
        let scope = scopes.fresh();
        Self {
            info,
            scopes,
            scope,
            defers: None,
        }
    }

    pub fn info(&self) -> &'a TypeInfo {
        self.info
    }

    /// Translate a set of files into one DST module.
    ///
    /// Section order: module-level values, type aliases, classes with
    /// their methods appended in declaration order, free functions.
    pub fn lower_files(&mut self, files: &[File]) -> Result<py::Module> {
        let mut parts = ModuleParts::default();
        for file in files {
            for decl in &file.decls {
                self.lower_decl(decl, &mut parts)?;
            }
        }
        let mut module = py::Module::default();
        module.body.extend(parts.values);
        module.body.extend(parts.types);
        for mut class in parts.classes {
            if let Some(methods) = parts.methods.remove(&class.name) {
                class.body.extend(methods.into_iter().map(py::Stmt::FunctionDef));
            }
            module.body.push(py::Stmt::ClassDef(class));
        }
        module
            .body
            .extend(parts.functions.into_iter().map(py::Stmt::FunctionDef));
        Ok(module)
    }

    fn lower_decl(&mut self, decl: &Decl, parts: &mut ModuleParts) -> Result<()> {
        match decl {
            Decl::Func(func) => {
                if let Some(lowered) = self.lower_func_decl(func)? {
                    match lowered.class {
                        Some(class) => parts.methods.entry(class).or_default().push(lowered.def),
                        None => parts.functions.push(lowered.def),
                    }
                }
                Ok(())
            }
            Decl::Gen(decl) => self.lower_gen_decl(decl, parts),
        }
    }

    fn lower_gen_decl(&mut self, decl: &GenDecl, parts: &mut ModuleParts) -> Result<()> {
        for spec in &decl.specs {
            match spec {
                Spec::Type(spec) => match self.lower_type_spec(spec)? {
                    Some(py::Stmt::ClassDef(class)) => parts.classes.push(class),
                    Some(stmt) => parts.types.push(stmt),
                    None => {}
                },
                Spec::Value(spec) => parts.values.extend(self.lower_value_spec(spec)?),
                // Import rewriting is out of scope.
                Spec::Import(_) => {}
            }
        }
        Ok(())
    }

    /// Result of lowering one function declaration
    pub(crate) fn lower_func_decl(&mut self, decl: &FuncDecl) -> Result<Option<LoweredFunc>> {
        // External declaration without a body: nothing to translate.
        let Some(body) = &decl.body else {
            return Ok(None);
        };

        let mut class = None;
        let mut recv_ident = None;
        if let Some(recv) = &decl.recv {
            let field = match recv.as_slice() {
                [field] if field.names.len() <= 1 => field,
                _ => {
                    return Err(KuchinawaError::MalformedAst {
                        message: "multiple receivers".to_string(),
                        pos: decl.pos,
                    })
                }
            };
            recv_ident = field.names.first();
            class = Some(receiver_type_name(field, decl.pos)?);
        }

        // Method names live in their class namespace; free function names
        // are interned at module scope.
        let name = if class.is_some() {
            decl.name.name.clone()
        } else {
            self.py_ident(&decl.name)?
        };
        let mut def = self.lower_func(name, &decl.typ, body, class.is_some(), recv_ident)?;
        if let Some(doc) = &decl.doc {
            def.body.insert(0, doc_string(doc));
        }
        Ok(Some(LoweredFunc { class, def }))
    }

    /// Translate a function body under a fresh function scope.
    pub(crate) fn lower_func(
        &mut self,
        name: py::Identifier,
        typ: &FuncType,
        body: &Block,
        is_method: bool,
        recv: Option<&Ident>,
    ) -> Result<py::FunctionDef> {
        let saved_scope = self.scope;
        let saved_defers = self.defers.take();
        self.scope = self.scopes.nested_function(saved_scope);

        let result = self.lower_func_body(name, typ, body, is_method, recv);

        self.scope = saved_scope;
        self.defers = saved_defers;
        result
    }

    fn lower_func_body(
        &mut self,
        name: py::Identifier,
        typ: &FuncType,
        body: &Block,
        is_method: bool,
        recv: Option<&Ident>,
    ) -> Result<py::FunctionDef> {
        // Claim the defer list name before any parameter so a parameter
        // spelled "defers" gets the suffix, not the list.
        let defers_name = if stmts_contain_defer(&body.stmts) {
            let defers = self.scopes.temp(self.scope, "defers");
            self.defers = Some(defers.clone());
            Some(defers)
        } else {
            None
        };

        let mut args = py::Arguments::default();
        if is_method {
            let recv_id = match recv {
                Some(ident) => self.py_ident(ident)?,
                None => self.scopes.temp(self.scope, "self"),
            };
            args.args.push(py::Arg { arg: recv_id });
        }
        for field in &typ.params {
            for param in &field.names {
                args.args.push(py::Arg {
                    arg: self.py_ident(param)?,
                });
            }
        }

        let mut py_body = Vec::new();
        for stmt in &body.stmts {
            py_body.extend(self.lower_stmt(stmt)?);
        }

        if let Some(defers) = defers_name {
            let fun = self.scopes.temp(self.scope, "fun");
            let args_id = self.scopes.temp(self.scope, "args");
            let drain = py::Stmt::For {
                target: py::Expr::Tuple(vec![
                    py::Expr::Name(fun.clone()),
                    py::Expr::Name(args_id.clone()),
                ]),
                iter: py::Expr::Call {
                    func: Box::new(py_reversed()),
                    args: vec![py::Expr::Name(defers.clone())],
                    keywords: vec![],
                },
                body: vec![py::Stmt::ExprStmt {
                    value: py::Expr::Call {
                        func: Box::new(py::Expr::Name(fun)),
                        args: vec![py::Expr::Starred(Box::new(py::Expr::Name(args_id)))],
                        keywords: vec![],
                    },
                }],
            };
            py_body = vec![
                py::Stmt::Assign {
                    targets: vec![py::Expr::Name(defers)],
                    value: py::Expr::List(vec![]),
                },
                py::Stmt::Try {
                    body: py_body,
                    handlers: vec![],
                    orelse: vec![],
                    finalbody: vec![drain],
                },
            ];
        }

        if py_body.is_empty() {
            py_body.push(py::Stmt::Pass);
        }
        Ok(py::FunctionDef {
            name,
            args,
            body: py_body,
        })
    }

    /// Zero value for a declared-but-uninitialized binding (and `new`).
    pub(crate) fn zero_value(&self, typ: &Type, pos: Pos) -> Result<py::Expr> {
        match typ {
            Type::Pointer(_)
            | Type::Slice(_)
            | Type::Map { .. }
            | Type::Signature
            | Type::Interface
            | Type::Chan(_) => Ok(py_none()),
            Type::Basic(kind) if kind.is_string() => Ok(py_empty_string()),
            Type::Basic(kind) if kind.is_boolean() => Ok(py_false()),
            Type::Basic(kind) if kind.is_integer() => Ok(py_num("0")),
            Type::Basic(kind) if kind.is_float() => Ok(py_num("0.0")),
            Type::Named { name, .. } => Ok(py::Expr::Call {
                func: Box::new(py::Expr::Name(name.clone())),
                args: vec![],
                keywords: vec![],
            }),
            // A comprehension rather than [zero] * n: each slot must hold
            // a distinct object when the element type is not primitive.
            Type::Array { len, elem } => Ok(py::Expr::ListComp {
                elt: Box::new(self.zero_value(elem, pos)?),
                generators: vec![py::Comprehension {
                    target: py::Expr::name("_"),
                    iter: py::Expr::Call {
                        func: Box::new(py_range()),
                        args: vec![py_num(&len.to_string())],
                        keywords: vec![],
                    },
                    ifs: vec![],
                }],
            }),
            _ => Err(KuchinawaError::UnsupportedType {
                type_desc: typ.describe(),
                pos,
            }),
        }
    }

    /// `type Name T` in any position.
    pub(crate) fn lower_type_spec(&mut self, spec: &TypeSpec) -> Result<Option<py::Stmt>> {
        let typ = self
            .info
            .type_of(spec.typ.id)
            .ok_or_else(|| KuchinawaError::MalformedAst {
                message: format!("type '{}' has no resolved type", spec.name.name),
                pos: spec.name.pos,
            })?;
        match typ {
            Type::Struct { fields } => {
                let fields = fields.clone();
                let class = self.lower_struct_type(&spec.name, &fields, spec.doc.as_deref())?;
                Ok(Some(py::Stmt::ClassDef(class)))
            }
            Type::Named { name, .. } => {
                let value = py::Expr::Name(name.clone());
                Ok(Some(py::Stmt::Assign {
                    targets: vec![py::Expr::Name(self.py_ident(&spec.name)?)],
                    value,
                }))
            }
            Type::Interface => Ok(None),
            // A named basic or slice type becomes a single-field wrapper
            // class so it still constructs and compares by name.
            Type::Basic(_) | Type::Slice(_) => {
                let fields = vec![StructField {
                    name: "value".to_string(),
                    typ: typ.clone(),
                }];
                let class = self.lower_struct_type(&spec.name, &fields, spec.doc.as_deref())?;
                Ok(Some(py::Stmt::ClassDef(class)))
            }
            other => Err(KuchinawaError::MalformedAst {
                message: format!("unknown type spec: {}", other.describe()),
                pos: spec.name.pos,
            }),
        }
    }

    fn lower_struct_type(
        &mut self,
        name: &Ident,
        fields: &[StructField],
        doc: Option<&str>,
    ) -> Result<py::ClassDef> {
        let mut body = Vec::new();
        if let Some(doc) = doc {
            body.push(doc_string(doc));
        }
        if !fields.is_empty() {
            body.push(py::Stmt::FunctionDef(self.make_init_method(fields, name.pos)?));
        }
        if body.is_empty() {
            body.push(py::Stmt::Pass);
        }
        Ok(py::ClassDef {
            name: self.py_ident(name)?,
            bases: vec![],
            body,
        })
    }

    /// Constructor with one defaulted parameter per field.
    fn make_init_method(&mut self, fields: &[StructField], pos: Pos) -> Result<py::FunctionDef> {
        let mut args = vec![py::Arg {
            arg: "self".to_string(),
        }];
        let mut defaults = Vec::new();
        for field in fields {
            args.push(py::Arg {
                arg: field.name.clone(),
            });
            defaults.push(self.zero_value(&field.typ, pos)?);
        }
        let body = fields
            .iter()
            .map(|field| py::Stmt::Assign {
                targets: vec![py::Expr::Attribute {
                    value: Box::new(py::Expr::name("self")),
                    attr: field.name.clone(),
                }],
                value: py::Expr::Name(field.name.clone()),
            })
            .collect();
        Ok(py::FunctionDef {
            name: "__init__".to_string(),
            args: py::Arguments {
                args,
                defaults,
                ..py::Arguments::default()
            },
            body,
        })
    }

    /// Interned DST spelling for an identifier occurrence.
    pub(crate) fn py_ident(&mut self, ident: &Ident) -> Result<String> {
        if ident.is_blank() {
            return Ok("_".to_string());
        }
        let sym = self
            .info
            .object_of(ident.id)
            .ok_or_else(|| KuchinawaError::UnresolvedSymbol {
                name: ident.name.clone(),
                pos: ident.pos,
            })?;
        let name = self.info.symbol(sym).name.clone();
        Ok(self.scopes.intern(self.scope, sym, &name))
    }
}

#[derive(Debug)]
pub(crate) struct LoweredFunc {
    pub class: Option<String>,
    pub def: py::FunctionDef,
}

/// Receiver base type name: `T` or `*T`.
fn receiver_type_name(field: &Field, pos: Pos) -> Result<String> {
    use crate::goast::ExprKind;
    let typ = field.typ.as_ref().ok_or_else(|| KuchinawaError::MalformedAst {
        message: "receiver without a type".to_string(),
        pos,
    })?;
    match &typ.kind {
        ExprKind::Ident(ident) => Ok(ident.name.clone()),
        ExprKind::Star(inner) => match &inner.kind {
            ExprKind::Ident(ident) => Ok(ident.name.clone()),
            _ => Err(KuchinawaError::MalformedAst {
                message: "unknown receiver type".to_string(),
                pos,
            }),
        },
        _ => Err(KuchinawaError::MalformedAst {
            message: "unknown receiver type".to_string(),
            pos,
        }),
    }
}

fn doc_string(doc: &str) -> py::Stmt {
    py::Stmt::DocString {
        lines: doc.trim_end().lines().map(str::to_string).collect(),
    }
}

/// Shallow scan: descends into statements but not into function literals,
/// whose defers belong to the literal itself.
fn stmts_contain_defer(stmts: &[Stmt]) -> bool {
    stmts.iter().any(stmt_contains_defer)
}

fn stmt_contains_defer(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Defer { .. } => true,
        StmtKind::Block(block) => stmts_contain_defer(&block.stmts),
        StmtKind::If { init, body, els, .. } => {
            init.as_deref().is_some_and(stmt_contains_defer)
                || stmts_contain_defer(&body.stmts)
                || els.as_deref().is_some_and(stmt_contains_defer)
        }
        StmtKind::For {
            init, post, body, ..
        } => {
            init.as_deref().is_some_and(stmt_contains_defer)
                || post.as_deref().is_some_and(stmt_contains_defer)
                || stmts_contain_defer(&body.stmts)
        }
        StmtKind::Range { body, .. } => stmts_contain_defer(&body.stmts),
        StmtKind::Switch { init, cases, .. } | StmtKind::TypeSwitch { init, cases, .. } => {
            init.as_deref().is_some_and(stmt_contains_defer)
                || cases.iter().any(|case| stmts_contain_defer(&case.body))
        }
        StmtKind::Labeled { stmt, .. } => stmt_contains_defer(stmt),
        _ => false,
    }
}
