//! Statement translator
//!
//! Each SRC statement lowers to a list of DST statements. Hoisted
//! statements produced by expression translation are spliced in front of
//! the statement that consumed the expression.

use super::builtins::*;
use super::exprs::{make_tuple, ExprLowerer};
use super::Lowerer;
use crate::error::{KuchinawaError, Result};
use crate::goast::{
    AssignOp, Block, BranchKind, CaseClause, Expr, ExprKind, GenDecl, Ident, Pos, Spec, Stmt,
    StmtKind, ValueSpec,
};
use crate::pyast as py;
use crate::typeinfo::{Builtin, SymbolKind};

impl Lowerer<'_> {
    pub(crate) fn lower_stmts(&mut self, stmts: &[Stmt]) -> Result<Vec<py::Stmt>> {
        let mut out = Vec::new();
        for stmt in stmts {
            out.extend(self.lower_stmt(stmt)?);
        }
        Ok(out)
    }

    /// Lexical sub-block: own scope, shared function locals.
    pub(crate) fn lower_block(&mut self, block: &Block) -> Result<Vec<py::Stmt>> {
        let saved = self.scope;
        self.scope = self.scopes.nested_block(saved);
        let result = self.lower_stmts(&block.stmts);
        self.scope = saved;
        result
    }

    pub(crate) fn lower_stmt(&mut self, stmt: &Stmt) -> Result<Vec<py::Stmt>> {
        match &stmt.kind {
            StmtKind::Empty => Ok(vec![]),
            StmtKind::Expr(expr) => self.lower_expr_stmt(expr),
            StmtKind::Assign { lhs, op, rhs } => self.lower_assign(stmt.pos, lhs, *op, rhs),
            StmtKind::IncDec { x, dec } => self.lower_inc_dec(x, *dec),
            StmtKind::Decl(decl) => self.lower_decl_stmt(decl),
            StmtKind::Return { results } => {
                let mut ex = ExprLowerer::new(self);
                let value = ex.lower_tuple(results)?;
                let mut out = ex.finish();
                out.push(py::Stmt::Return { value });
                Ok(out)
            }
            StmtKind::Branch { kind } => self.lower_branch(stmt.pos, *kind),
            StmtKind::Block(block) => self.lower_block(block),
            StmtKind::If {
                init,
                cond,
                body,
                els,
            } => self.lower_if(init.as_deref(), cond, body, els.as_deref()),
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => self.lower_for(init.as_deref(), cond.as_ref(), post.as_deref(), body),
            StmtKind::Range {
                key,
                value,
                x,
                body,
            } => self.lower_range(stmt.pos, key.as_ref(), value.as_ref(), x, body),
            StmtKind::Switch { init, tag, cases } => {
                self.lower_switch(init.as_deref(), tag.as_ref(), cases)
            }
            StmtKind::TypeSwitch {
                init,
                bind,
                x,
                cases,
            } => self.lower_type_switch(init.as_deref(), bind.as_ref(), x, cases),
            StmtKind::Defer { call } => self.lower_defer(stmt.pos, call),
            StmtKind::Go { .. } => Err(KuchinawaError::UnsupportedNode {
                construct: "go statement".to_string(),
                pos: stmt.pos,
            }),
            StmtKind::Send { .. } => Err(KuchinawaError::UnsupportedNode {
                construct: "channel send".to_string(),
                pos: stmt.pos,
            }),
            StmtKind::Select => Err(KuchinawaError::UnsupportedNode {
                construct: "select statement".to_string(),
                pos: stmt.pos,
            }),
            StmtKind::Labeled { .. } => Err(KuchinawaError::UnsupportedNode {
                construct: "labeled statement".to_string(),
                pos: stmt.pos,
            }),
        }
    }

    fn lower_expr_stmt(&mut self, expr: &Expr) -> Result<Vec<py::Stmt>> {
        // Statement-only builtins are recognized by symbol identity.
        if let ExprKind::Call { fun, args } = &expr.kind {
            if let ExprKind::Ident(ident) = &fun.kind {
                if let Some(sym) = self.info().object_of(ident.id) {
                    if self.info().symbol(sym).kind == SymbolKind::Builtin(Builtin::Delete) {
                        return self.lower_delete(expr.pos, args);
                    }
                }
            }
        }
        let mut ex = ExprLowerer::new(self);
        let value = ex.lower(expr)?;
        let mut out = ex.finish();
        out.push(py::Stmt::ExprStmt { value });
        Ok(out)
    }

    /// `delete(m, k)` → `try: del m[k] / except KeyError: pass`
    fn lower_delete(&mut self, pos: Pos, args: &[Expr]) -> Result<Vec<py::Stmt>> {
        let [map, key] = args else {
            return Err(KuchinawaError::MalformedAst {
                message: "delete takes a map and a key".to_string(),
                pos,
            });
        };
        let mut ex = ExprLowerer::new(self);
        let target = py::Expr::Subscript {
            value: Box::new(ex.lower(map)?),
            slice: Box::new(py::Slice::Index(ex.lower(key)?)),
        };
        let mut out = ex.finish();
        out.push(py::Stmt::Try {
            body: vec![py::Stmt::Delete {
                targets: vec![target],
            }],
            handlers: vec![py::ExceptHandler {
                typ: Some(py_key_error()),
                name: None,
                body: vec![py::Stmt::Pass],
            }],
            orelse: vec![],
            finalbody: vec![],
        });
        Ok(out)
    }

    fn lower_assign(
        &mut self,
        pos: Pos,
        lhs: &[Expr],
        op: AssignOp,
        rhs: &[Expr],
    ) -> Result<Vec<py::Stmt>> {
        if matches!(op, AssignOp::Assign | AssignOp::Define) {
            let mut ex = ExprLowerer::new(self);
            let targets = ex.lower_all(lhs)?;
            let value = ex
                .lower_tuple(rhs)?
                .ok_or_else(|| malformed(pos, "assignment without values"))?;
            let mut out = ex.finish();
            out.push(py::Stmt::Assign { targets, value });
            return Ok(out);
        }

        let ([target], [value]) = (lhs, rhs) else {
            return Err(malformed(pos, "augmented assignment arity"));
        };
        let mut ex = ExprLowerer::new(self);
        let stmt = if op == AssignOp::AndNot {
            // x &^= y becomes x &= ~y
            py::Stmt::AugAssign {
                target: ex.lower(target)?,
                op: py::Operator::BitAnd,
                value: py::Expr::UnaryOp {
                    op: py::UnaryOp::Invert,
                    operand: Box::new(ex.lower(value)?),
                },
            }
        } else {
            py::Stmt::AugAssign {
                target: ex.lower(target)?,
                op: augmented_op(op, pos)?,
                value: ex.lower(value)?,
            }
        };
        let mut out = ex.finish();
        out.push(stmt);
        Ok(out)
    }

    fn lower_inc_dec(&mut self, x: &Expr, dec: bool) -> Result<Vec<py::Stmt>> {
        let mut ex = ExprLowerer::new(self);
        let target = ex.lower(x)?;
        let mut out = ex.finish();
        out.push(py::Stmt::AugAssign {
            target,
            op: if dec {
                py::Operator::Sub
            } else {
                py::Operator::Add
            },
            value: py_num("1"),
        });
        Ok(out)
    }

    fn lower_branch(&mut self, pos: Pos, kind: BranchKind) -> Result<Vec<py::Stmt>> {
        match kind {
            BranchKind::Break => Ok(vec![py::Stmt::Break]),
            BranchKind::Continue => Ok(vec![py::Stmt::Continue]),
            // No native equivalent; the sentinel preserves intent but
            // does not execute.
            BranchKind::Fallthrough => Ok(vec![py::Stmt::ExprStmt {
                value: py_todo_fallthrough(),
            }]),
            BranchKind::Goto => Err(KuchinawaError::UnsupportedNode {
                construct: "goto statement".to_string(),
                pos,
            }),
        }
    }

    fn lower_if(
        &mut self,
        init: Option<&Stmt>,
        cond: &Expr,
        body: &Block,
        els: Option<&Stmt>,
    ) -> Result<Vec<py::Stmt>> {
        let mut out = Vec::new();
        if let Some(init) = init {
            out.extend(self.lower_stmt(init)?);
        }
        let mut ex = ExprLowerer::new(self);
        let test = ex.lower(cond)?;
        out.extend(ex.finish());
        let body = self.lower_block(body)?;
        let orelse = match els {
            Some(stmt) => self.lower_stmt(stmt)?,
            None => vec![],
        };
        out.push(py::Stmt::If { test, body, orelse });
        Ok(out)
    }

    fn lower_for(
        &mut self,
        init: Option<&Stmt>,
        cond: Option<&Expr>,
        post: Option<&Stmt>,
        body: &Block,
    ) -> Result<Vec<py::Stmt>> {
        let mut out = Vec::new();
        if let Some(init) = init {
            out.extend(self.lower_stmt(init)?);
        }
        let test = match cond {
            Some(cond) => {
                let mut ex = ExprLowerer::new(self);
                let test = ex.lower(cond)?;
                out.extend(ex.finish());
                test
            }
            None => py_true(),
        };
        let mut loop_body = self.lower_block(body)?;
        if let Some(post) = post {
            loop_body.extend(self.lower_stmt(post)?);
        }
        out.push(py::Stmt::While {
            test,
            body: loop_body,
        });
        Ok(out)
    }

    fn lower_range(
        &mut self,
        pos: Pos,
        key: Option<&Expr>,
        value: Option<&Expr>,
        x: &Expr,
        body: &Block,
    ) -> Result<Vec<py::Stmt>> {
        let key_is_blank = key.is_some_and(is_blank_expr);
        let mut ex = ExprLowerer::new(self);
        let (target, iter) = match (key, value) {
            // for k := range X
            (Some(key), None) if !key_is_blank => {
                let target = ex.lower(key)?;
                let length = py::Expr::Call {
                    func: Box::new(py_len()),
                    args: vec![ex.lower(x)?],
                    keywords: vec![],
                };
                let iter = py::Expr::Call {
                    func: Box::new(py_range()),
                    args: vec![length],
                    keywords: vec![],
                };
                (target, iter)
            }
            // for _, v := range X
            (Some(_), Some(value)) if key_is_blank => (ex.lower(value)?, ex.lower(x)?),
            // for k, v := range X
            // NB enumerate is only correct for ordered sequences; maps
            // would need .items() and are not handled.
            (Some(key), Some(value)) => {
                let target = py::Expr::Tuple(vec![ex.lower(key)?, ex.lower(value)?]);
                let iter = py::Expr::Call {
                    func: Box::new(py_enumerate()),
                    args: vec![ex.lower(x)?],
                    keywords: vec![],
                };
                (target, iter)
            }
            _ => {
                return Err(KuchinawaError::UnsupportedNode {
                    construct: "range clause without loop variables".to_string(),
                    pos,
                })
            }
        };
        let mut out = ex.finish();
        let body = self.lower_block(body)?;
        out.push(py::Stmt::For { target, iter, body });
        Ok(out)
    }

    fn lower_switch(
        &mut self,
        init: Option<&Stmt>,
        tag: Option<&Expr>,
        cases: &[CaseClause],
    ) -> Result<Vec<py::Stmt>> {
        let mut out = Vec::new();
        if let Some(init) = init {
            out.extend(self.lower_stmt(init)?);
        }
        let tag = match tag {
            Some(tag_expr) => {
                let name = self.scopes.temp(self.scope, "tag");
                let mut ex = ExprLowerer::new(self);
                let value = ex.lower(tag_expr)?;
                out.extend(ex.finish());
                out.push(py::Stmt::Assign {
                    targets: vec![py::Expr::Name(name.clone())],
                    value,
                });
                Some(py::Expr::Name(name))
            }
            None => None,
        };

        let mut arms = Vec::new();
        let mut default_body = Vec::new();
        for case in cases {
            let body = self.lower_case_body(case, None)?;
            if case.list.is_empty() {
                default_body = body;
                continue;
            }
            let test = self.lower_case_test(&case.list, tag.as_ref(), &mut out)?;
            arms.push((test, body));
        }
        out.extend(chain_arms(arms, default_body));
        Ok(out)
    }

    fn lower_type_switch(
        &mut self,
        init: Option<&Stmt>,
        bind: Option<&Ident>,
        x: &Expr,
        cases: &[CaseClause],
    ) -> Result<Vec<py::Stmt>> {
        let mut out = Vec::new();
        if let Some(init) = init {
            out.extend(self.lower_stmt(init)?);
        }
        let base = bind.map_or("tag", |ident| ident.name.as_str());
        let tag_name = self.scopes.temp(self.scope, base);
        let mut ex = ExprLowerer::new(self);
        let subject = ex.lower(x)?;
        out.extend(ex.finish());
        out.push(py::Stmt::Assign {
            targets: vec![py::Expr::Name(tag_name.clone())],
            value: py::Expr::Call {
                func: Box::new(py_type()),
                args: vec![subject],
                keywords: vec![],
            },
        });
        let tag = py::Expr::Name(tag_name);

        let mut arms = Vec::new();
        let mut default_body = Vec::new();
        for case in cases {
            let implicit = match bind {
                Some(bind) => Some((
                    self.info()
                        .implicit_of(case.id)
                        .ok_or_else(|| KuchinawaError::UnresolvedSymbol {
                            name: bind.name.clone(),
                            pos: case.pos,
                        })?,
                    tag.clone(),
                )),
                None => None,
            };
            let body = self.lower_case_body(case, implicit)?;
            if case.list.is_empty() {
                default_body = body;
                continue;
            }
            let test = self.lower_case_test(&case.list, Some(&tag), &mut out)?;
            arms.push((test, body));
        }
        out.extend(chain_arms(arms, default_body));
        Ok(out)
    }

    /// Case body under its own sub-scope. For a bound type switch, the
    /// clause's implicit symbol is assigned the tag first, giving each
    /// clause its own correctly named alias.
    fn lower_case_body(
        &mut self,
        case: &CaseClause,
        implicit: Option<(crate::typeinfo::SymbolId, py::Expr)>,
    ) -> Result<Vec<py::Stmt>> {
        let saved = self.scope;
        self.scope = self.scopes.nested_block(saved);
        let mut result = Vec::new();
        let mut failed = None;
        if let Some((sym, tag)) = implicit {
            let name = self.info().symbol(sym).name.clone();
            let id = self.scopes.intern(self.scope, sym, &name);
            result.push(py::Stmt::Assign {
                targets: vec![py::Expr::Name(id)],
                value: tag,
            });
        }
        match self.lower_stmts(&case.body) {
            Ok(stmts) => result.extend(stmts),
            Err(err) => failed = Some(err),
        }
        self.scope = saved;
        match failed {
            Some(err) => Err(err),
            None => Ok(result),
        }
    }

    /// Test for one case clause: equality against the tag (or the bare
    /// expression for tagless switches), or-ed across the value list.
    fn lower_case_test(
        &mut self,
        list: &[Expr],
        tag: Option<&py::Expr>,
        out: &mut Vec<py::Stmt>,
    ) -> Result<py::Expr> {
        let mut ex = ExprLowerer::new(self);
        let mut tests = Vec::with_capacity(list.len());
        for expr in list {
            let value = ex.lower(expr)?;
            let test = match tag {
                Some(tag) => py::Expr::Compare {
                    left: Box::new(tag.clone()),
                    ops: vec![py::CmpOp::Eq],
                    comparators: vec![value],
                },
                None => value,
            };
            tests.push(test);
        }
        out.extend(ex.finish());
        if tests.len() == 1 {
            Ok(tests.remove(0))
        } else {
            Ok(py::Expr::BoolOp {
                op: py::BoolOp::Or,
                values: tests,
            })
        }
    }

    fn lower_decl_stmt(&mut self, decl: &GenDecl) -> Result<Vec<py::Stmt>> {
        let mut out = Vec::new();
        for spec in &decl.specs {
            match spec {
                Spec::Value(spec) => out.extend(self.lower_value_spec(spec)?),
                Spec::Type(spec) => out.extend(self.lower_type_spec(spec)?),
                Spec::Import(_) => {}
            }
        }
        Ok(out)
    }

    /// `var` / `const` names.
    ///
    /// Three shapes: no values (zero-initialize each name), one value per
    /// name, or one multi-value call for all names.
    pub(crate) fn lower_value_spec(&mut self, spec: &ValueSpec) -> Result<Vec<py::Stmt>> {
        let mut ex = ExprLowerer::new(self);
        let mut targets = Vec::with_capacity(spec.names.len());
        let mut values = Vec::new();
        for (i, ident) in spec.names.iter().enumerate() {
            if ident.is_blank() {
                targets.push(py::Expr::name("_"));
            } else {
                targets.push(py::Expr::Name(ex.cx.py_ident(ident)?));
            }
            if spec.values.is_empty() {
                let typ_expr = spec.typ.as_ref().ok_or_else(|| {
                    malformed(ident.pos, "declaration without type or values")
                })?;
                let typ = ex.cx.info().type_of(typ_expr.id).ok_or_else(|| {
                    malformed(typ_expr.pos, "declared type is not resolved")
                })?;
                values.push(ex.cx.zero_value(typ, ident.pos)?);
            } else if i < spec.values.len() {
                let value = ex.lower(&spec.values[i])?;
                values.push(value);
            }
        }
        let value = make_tuple(values).ok_or_else(|| {
            malformed(Pos::unknown(), "declaration without names")
        })?;
        let mut out = ex.finish();
        out.push(py::Stmt::Assign { targets, value });
        Ok(out)
    }

    /// `defer f(args...)` appends `(f, (args...))`; arguments are
    /// captured now, the call runs at unwind in reverse order.
    fn lower_defer(&mut self, pos: Pos, call: &Expr) -> Result<Vec<py::Stmt>> {
        let Some(defers) = self.defers.clone() else {
            return Err(KuchinawaError::Internal {
                message: "defer statement outside a scanned function body".to_string(),
            });
        };
        let ExprKind::Call { fun, args } = &call.kind else {
            return Err(malformed(pos, "defer target must be a call"));
        };
        let mut ex = ExprLowerer::new(self);
        let func = ex.lower(fun)?;
        let arg_tuple = py::Expr::Tuple(ex.lower_all(args)?);
        let mut out = ex.finish();
        out.push(py::Stmt::ExprStmt {
            value: py::Expr::Call {
                func: Box::new(py::Expr::Attribute {
                    value: Box::new(py::Expr::Name(defers)),
                    attr: "append".to_string(),
                }),
                args: vec![py::Expr::Tuple(vec![func, arg_tuple])],
                keywords: vec![],
            },
        });
        Ok(out)
    }
}

/// Right-nest (test, body) arms into an if/elif chain with the default
/// body as the terminal else. With no non-default arms the default body
/// stands alone.
fn chain_arms(arms: Vec<(py::Expr, Vec<py::Stmt>)>, default_body: Vec<py::Stmt>) -> Vec<py::Stmt> {
    let mut orelse = default_body;
    for (test, body) in arms.into_iter().rev() {
        orelse = vec![py::Stmt::If { test, body, orelse }];
    }
    orelse
}

fn is_blank_expr(expr: &Expr) -> bool {
    matches!(&expr.kind, ExprKind::Ident(ident) if ident.is_blank())
}

fn augmented_op(op: AssignOp, pos: Pos) -> Result<py::Operator> {
    match op {
        AssignOp::Add => Ok(py::Operator::Add),
        AssignOp::Sub => Ok(py::Operator::Sub),
        AssignOp::Mul => Ok(py::Operator::Mult),
        AssignOp::Quo => Ok(py::Operator::FloorDiv),
        AssignOp::Rem => Ok(py::Operator::Mod),
        AssignOp::And => Ok(py::Operator::BitAnd),
        AssignOp::Or => Ok(py::Operator::BitOr),
        AssignOp::Xor => Ok(py::Operator::BitXor),
        AssignOp::Shl => Ok(py::Operator::LShift),
        AssignOp::Shr => Ok(py::Operator::RShift),
        _ => Err(malformed(pos, "bad augmented assignment operator")),
    }
}

fn malformed(pos: Pos, message: &str) -> KuchinawaError {
    KuchinawaError::MalformedAst {
        message: message.to_string(),
        pos,
    }
}
