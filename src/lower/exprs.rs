//! Expression translator
//!
//! Produces one DST expression per SRC expression, plus a list of hoisted
//! statements for function literals: DST anonymous functions are limited
//! to a single expression, so literals become named `def`s that must be
//! spliced into the enclosing statement list before first use.

use super::builtins::*;
use super::Lowerer;
use crate::error::{KuchinawaError, Result};
use crate::goast::{BinaryOp, Expr, ExprKind, Ident, LitKind, Pos, UnaryOp};
use crate::pyast as py;
use crate::typeinfo::{Builtin, SymbolKind, Type, UniverseConst};

/// Expression lowering context for one statement
pub(crate) struct ExprLowerer<'l, 'a> {
    pub cx: &'l mut Lowerer<'a>,
    hoisted: Vec<py::Stmt>,
}

impl<'l, 'a> ExprLowerer<'l, 'a> {
    pub fn new(cx: &'l mut Lowerer<'a>) -> Self {
        Self {
            cx,
            hoisted: Vec::new(),
        }
    }

    /// Hoisted statements, to be emitted before the consuming statement.
    pub fn finish(self) -> Vec<py::Stmt> {
        self.hoisted
    }

    pub fn lower(&mut self, expr: &Expr) -> Result<py::Expr> {
        match &expr.kind {
            ExprKind::Ident(ident) => self.ident_expr(ident),
            ExprKind::BasicLit { kind, value } => Ok(basic_lit(*kind, value)),
            ExprKind::CompositeLit { .. } => self.composite_lit(expr, None),
            ExprKind::KeyValue { .. } => Err(KuchinawaError::Internal {
                message: "key: value element outside a composite literal".to_string(),
            }),
            ExprKind::Paren(inner) => self.lower(inner),
            ExprKind::Selector { x, sel } => Ok(py::Expr::Attribute {
                value: Box::new(self.lower(x)?),
                attr: sel.name.clone(),
            }),
            ExprKind::Index { x, index } => Ok(py::Expr::Subscript {
                value: Box::new(self.lower(x)?),
                slice: Box::new(py::Slice::Index(self.lower(index)?)),
            }),
            ExprKind::Slice { x, low, high } => {
                let value = self.lower(x)?;
                let lower = low.as_deref().map(|e| self.lower(e)).transpose()?;
                let upper = high.as_deref().map(|e| self.lower(e)).transpose()?;
                Ok(py::Expr::Subscript {
                    value: Box::new(value),
                    slice: Box::new(py::Slice::Range {
                        lower,
                        upper,
                        step: None,
                    }),
                })
            }
            ExprKind::Call { fun, args } => self.call(expr.pos, fun, args),
            // Dereference is erased; the output has no pointer identity.
            ExprKind::Star(inner) => self.lower(inner),
            ExprKind::Unary { op, x } => self.unary(expr.pos, *op, x),
            ExprKind::Binary { x, op, y } => self.binary(*op, x, y),
            ExprKind::FuncLit { typ, body } => {
                let name = self.cx.scopes.temp(self.cx.scope, "func");
                let def = self.cx.lower_func(name.clone(), typ, body, false, None)?;
                self.hoisted.push(py::Stmt::FunctionDef(def));
                Ok(py::Expr::Name(name))
            }
            // No runtime check: the assertion result is the operand.
            ExprKind::TypeAssert { x, .. } => self.lower(x),
            ExprKind::ArrayType { .. }
            | ExprKind::MapType { .. }
            | ExprKind::ChanType { .. }
            | ExprKind::StructType
            | ExprKind::InterfaceType
            | ExprKind::FuncTypeExpr => Err(KuchinawaError::MalformedAst {
                message: "type expression in value position".to_string(),
                pos: expr.pos,
            }),
        }
    }

    pub fn lower_all(&mut self, exprs: &[Expr]) -> Result<Vec<py::Expr>> {
        exprs.iter().map(|e| self.lower(e)).collect()
    }

    /// 0 values → `None`, 1 → the value, n → a tuple.
    pub fn lower_tuple(&mut self, exprs: &[Expr]) -> Result<Option<py::Expr>> {
        Ok(make_tuple(self.lower_all(exprs)?))
    }

    fn ident_expr(&mut self, ident: &Ident) -> Result<py::Expr> {
        if ident.is_blank() {
            return Ok(py::Expr::name("_"));
        }
        let sym = self
            .cx
            .info()
            .object_of(ident.id)
            .ok_or_else(|| KuchinawaError::UnresolvedSymbol {
                name: ident.name.clone(),
                pos: ident.pos,
            })?;
        match self.cx.info().symbol(sym).kind {
            SymbolKind::Universe(UniverseConst::True) => Ok(py_true()),
            SymbolKind::Universe(UniverseConst::False) => Ok(py_false()),
            SymbolKind::Universe(UniverseConst::Nil) => Ok(py_none()),
            _ => Ok(py::Expr::Name(self.cx.py_ident(ident)?)),
        }
    }

    fn unary(&mut self, pos: Pos, op: UnaryOp, x: &Expr) -> Result<py::Expr> {
        let py_op = match op {
            UnaryOp::Not => py::UnaryOp::Not,
            UnaryOp::Neg => py::UnaryOp::USub,
            UnaryOp::Pos => py::UnaryOp::UAdd,
            UnaryOp::Xor => py::UnaryOp::Invert,
            // Address-of is erased together with pointer identity.
            UnaryOp::And => return self.lower(x),
            UnaryOp::Recv => {
                return Err(KuchinawaError::UnsupportedNode {
                    construct: "channel receive".to_string(),
                    pos,
                })
            }
        };
        Ok(py::Expr::UnaryOp {
            op: py_op,
            operand: Box::new(self.lower(x)?),
        })
    }

    fn binary(&mut self, op: BinaryOp, x: &Expr, y: &Expr) -> Result<py::Expr> {
        if let Some(cmp) = comparator(op) {
            return Ok(py::Expr::Compare {
                left: Box::new(self.lower(x)?),
                ops: vec![cmp],
                comparators: vec![self.lower(y)?],
            });
        }
        if let Some(py_op) = bin_op(op) {
            return Ok(py::Expr::BinOp {
                left: Box::new(self.lower(x)?),
                op: py_op,
                right: Box::new(self.lower(y)?),
            });
        }
        match op {
            BinaryOp::LAnd | BinaryOp::LOr => Ok(py::Expr::BoolOp {
                op: if op == BinaryOp::LAnd {
                    py::BoolOp::And
                } else {
                    py::BoolOp::Or
                },
                values: vec![self.lower(x)?, self.lower(y)?],
            }),
            // No and-not in the target: a &^ b becomes a & ~b.
            BinaryOp::AndNot => Ok(py::Expr::BinOp {
                left: Box::new(self.lower(x)?),
                op: py::Operator::BitAnd,
                right: Box::new(py::Expr::UnaryOp {
                    op: py::UnaryOp::Invert,
                    operand: Box::new(self.lower(y)?),
                }),
            }),
            _ => Err(KuchinawaError::Internal {
                message: format!("binary operator {op:?} fell through"),
            }),
        }
    }

    fn composite_lit(&mut self, expr: &Expr, parent_elem: Option<&Type>) -> Result<py::Expr> {
        let ExprKind::CompositeLit { elts, .. } = &expr.kind else {
            return Err(KuchinawaError::Internal {
                message: "composite_lit on a non-composite expression".to_string(),
            });
        };
        // Nested literals may elide their type; they inherit the parent's
        // element type.
        let typ = match self.cx.info().type_of(expr.id) {
            Some(t) => t.clone(),
            None => parent_elem
                .cloned()
                .ok_or_else(|| KuchinawaError::MalformedAst {
                    message: "composite literal has no resolved type".to_string(),
                    pos: expr.pos,
                })?,
        };
        match &typ {
            Type::Named { name, .. } => {
                let mut args = Vec::new();
                let mut keywords = Vec::new();
                let keyed = matches!(elts.first().map(|e| &e.kind), Some(ExprKind::KeyValue { .. }));
                for elt in elts {
                    match (&elt.kind, keyed) {
                        (ExprKind::KeyValue { key, value }, true) => {
                            let ExprKind::Ident(field) = &key.kind else {
                                return Err(KuchinawaError::MalformedAst {
                                    message: "expected field name in composite literal"
                                        .to_string(),
                                    pos: key.pos,
                                });
                            };
                            keywords.push(py::Keyword {
                                arg: field.name.clone(),
                                value: self.element(value, None)?,
                            });
                        }
                        (_, false) => args.push(self.element(elt, None)?),
                        _ => {
                            return Err(KuchinawaError::MalformedAst {
                                message: "mixed keyed and positional elements".to_string(),
                                pos: elt.pos,
                            })
                        }
                    }
                }
                Ok(py::Expr::Call {
                    func: Box::new(py::Expr::Name(name.clone())),
                    args,
                    keywords,
                })
            }
            Type::Slice(elem) | Type::Array { elem, .. } => {
                let mut out = Vec::with_capacity(elts.len());
                for elt in elts {
                    if matches!(elt.kind, ExprKind::KeyValue { .. }) {
                        return Err(KuchinawaError::UnsupportedNode {
                            construct: "keyed array element".to_string(),
                            pos: elt.pos,
                        });
                    }
                    out.push(self.element(elt, Some(elem.as_ref()))?);
                }
                Ok(py::Expr::List(out))
            }
            Type::Map { key, value } => {
                let mut keys = Vec::with_capacity(elts.len());
                let mut values = Vec::with_capacity(elts.len());
                for elt in elts {
                    let ExprKind::KeyValue { key: k, value: v } = &elt.kind else {
                        return Err(KuchinawaError::MalformedAst {
                            message: "map literal element must be key: value".to_string(),
                            pos: elt.pos,
                        });
                    };
                    keys.push(self.element(k, Some(key.as_ref()))?);
                    values.push(self.element(v, Some(value.as_ref()))?);
                }
                Ok(py::Expr::Dict { keys, values })
            }
            other => Err(KuchinawaError::UnsupportedType {
                type_desc: other.describe(),
                pos: expr.pos,
            }),
        }
    }

    /// Composite-literal element: nested literals inherit `elem`.
    fn element(&mut self, expr: &Expr, elem: Option<&Type>) -> Result<py::Expr> {
        if matches!(expr.kind, ExprKind::CompositeLit { .. }) {
            self.composite_lit(expr, elem)
        } else {
            self.lower(expr)
        }
    }

    fn call(&mut self, pos: Pos, fun: &Expr, args: &[Expr]) -> Result<py::Expr> {
        // A callee denoting a type is a conversion; the value passes
        // through unchanged.
        if self.is_type_expr(fun) {
            let first = args.first().ok_or_else(|| KuchinawaError::MalformedAst {
                message: "conversion without an operand".to_string(),
                pos,
            })?;
            return self.lower(first);
        }
        if let ExprKind::Ident(ident) = &fun.kind {
            if let Some(sym) = self.cx.info().object_of(ident.id) {
                if let SymbolKind::Builtin(builtin) = self.cx.info().symbol(sym).kind {
                    return self.builtin_call(pos, builtin, args);
                }
            }
        }
        Ok(py::Expr::Call {
            func: Box::new(self.lower(fun)?),
            args: self.lower_all(args)?,
            keywords: vec![],
        })
    }

    /// Builtins are dispatched on symbol identity, so a user definition
    /// that shadows a predeclared name takes the ordinary call path.
    fn builtin_call(&mut self, pos: Pos, builtin: Builtin, args: &[Expr]) -> Result<py::Expr> {
        match builtin {
            Builtin::Make => self.make_call(pos, args),
            Builtin::New => {
                let typ = self.arg_type(pos, args, "new")?;
                self.cx.zero_value(&typ, pos)
            }
            Builtin::Len | Builtin::Cap => {
                let first = args.first().ok_or_else(|| KuchinawaError::MalformedAst {
                    message: "len/cap without an operand".to_string(),
                    pos,
                })?;
                let is_string = self
                    .cx
                    .info()
                    .type_of(first.id)
                    .is_some_and(Type::is_string);
                if is_string {
                    // Byte length, not code-point count.
                    let encode = py::Expr::Call {
                        func: Box::new(py::Expr::Attribute {
                            value: Box::new(self.lower(first)?),
                            attr: "encode".to_string(),
                        }),
                        args: vec![py::Expr::Str {
                            value: "\"utf-8\"".to_string(),
                        }],
                        keywords: vec![],
                    };
                    Ok(py::Expr::Call {
                        func: Box::new(py_len()),
                        args: vec![encode],
                        keywords: vec![],
                    })
                } else {
                    Ok(py::Expr::Call {
                        func: Box::new(py_len()),
                        args: self.lower_all(args)?,
                        keywords: vec![],
                    })
                }
            }
            Builtin::Complex => Ok(py::Expr::Call {
                func: Box::new(py_complex()),
                args: self.lower_all(args)?,
                keywords: vec![],
            }),
            Builtin::Real | Builtin::Imag => {
                let first = args.first().ok_or_else(|| KuchinawaError::MalformedAst {
                    message: "real/imag without an operand".to_string(),
                    pos,
                })?;
                Ok(py::Expr::Attribute {
                    value: Box::new(self.lower(first)?),
                    attr: if builtin == Builtin::Real {
                        "real".to_string()
                    } else {
                        "imag".to_string()
                    },
                })
            }
            Builtin::Delete => Err(KuchinawaError::MalformedAst {
                message: "delete is statement-only".to_string(),
                pos,
            }),
            // The rest have no defined mapping; they stay calls to their
            // bare names and are not guaranteed to execute.
            Builtin::Append
            | Builtin::Copy
            | Builtin::Close
            | Builtin::Panic
            | Builtin::Recover
            | Builtin::Print
            | Builtin::Println => Ok(py::Expr::Call {
                func: Box::new(py::Expr::Name(builtin_spelling(builtin).to_string())),
                args: self.lower_all(args)?,
                keywords: vec![],
            }),
        }
    }

    fn make_call(&mut self, pos: Pos, args: &[Expr]) -> Result<py::Expr> {
        let typ = self.arg_type(pos, args, "make")?;
        match typ.underlying() {
            Type::Slice(elem) => {
                let length = args.get(1).ok_or_else(|| KuchinawaError::MalformedAst {
                    message: "make of a slice needs a length".to_string(),
                    pos,
                })?;
                let length = self.lower(length)?;
                // Capacity, if given, is ignored.
                Ok(py::Expr::ListComp {
                    elt: Box::new(self.cx.zero_value(elem, pos)?),
                    generators: vec![py::Comprehension {
                        target: py::Expr::name("_"),
                        iter: py::Expr::Call {
                            func: Box::new(py_range()),
                            args: vec![length],
                            keywords: vec![],
                        },
                        ifs: vec![],
                    }],
                })
            }
            Type::Map { .. } => Ok(py::Expr::Dict {
                keys: vec![],
                values: vec![],
            }),
            _ => Err(KuchinawaError::MalformedAst {
                message: "bad type in make()".to_string(),
                pos,
            }),
        }
    }

    /// Resolved type of a builtin's type-expression argument.
    fn arg_type(&self, pos: Pos, args: &[Expr], what: &str) -> Result<Type> {
        let first = args.first().ok_or_else(|| KuchinawaError::MalformedAst {
            message: format!("{what} without a type argument"),
            pos,
        })?;
        self.cx
            .info()
            .type_of(first.id)
            .cloned()
            .ok_or_else(|| KuchinawaError::MalformedAst {
                message: format!("bad type in {what}()"),
                pos,
            })
    }

    fn is_type_expr(&self, expr: &Expr) -> bool {
        match &expr.kind {
            ExprKind::ArrayType { .. }
            | ExprKind::MapType { .. }
            | ExprKind::ChanType { .. }
            | ExprKind::StructType
            | ExprKind::InterfaceType
            | ExprKind::FuncTypeExpr => true,
            ExprKind::Paren(inner) => self.is_type_expr(inner),
            ExprKind::Star(inner) => matches!(
                &inner.kind,
                ExprKind::Ident(ident) if self.resolves_to_type_name(ident)
            ),
            ExprKind::Ident(ident) => self.resolves_to_type_name(ident),
            _ => false,
        }
    }

    fn resolves_to_type_name(&self, ident: &Ident) -> bool {
        self.cx
            .info()
            .object_of(ident.id)
            .is_some_and(|sym| self.cx.info().symbol(sym).kind == SymbolKind::TypeName)
    }
}

/// 0 → `None`, 1 → the expression, n → a tuple.
pub(crate) fn make_tuple(mut exprs: Vec<py::Expr>) -> Option<py::Expr> {
    match exprs.len() {
        0 => None,
        1 => Some(exprs.remove(0)),
        _ => Some(py::Expr::Tuple(exprs)),
    }
}

fn basic_lit(kind: LitKind, value: &str) -> py::Expr {
    match kind {
        // Octal 0NNN literals pass through verbatim; the output
        // language re-parses them as decimal. TODO rewrite as 0oNNN.
        LitKind::Int | LitKind::Float => py::Expr::Num {
            value: value.to_string(),
        },
        LitKind::Imag => py::Expr::Num {
            value: value.replacen('i', "j", 1),
        },
        LitKind::Char | LitKind::Str => py::Expr::Str {
            value: value.to_string(),
        },
    }
}

fn comparator(op: BinaryOp) -> Option<py::CmpOp> {
    match op {
        BinaryOp::Eql => Some(py::CmpOp::Eq),
        BinaryOp::Neq => Some(py::CmpOp::NotEq),
        BinaryOp::Lss => Some(py::CmpOp::Lt),
        BinaryOp::Leq => Some(py::CmpOp::LtE),
        BinaryOp::Gtr => Some(py::CmpOp::Gt),
        BinaryOp::Geq => Some(py::CmpOp::GtE),
        _ => None,
    }
}

fn bin_op(op: BinaryOp) -> Option<py::Operator> {
    match op {
        BinaryOp::Add => Some(py::Operator::Add),
        BinaryOp::Sub => Some(py::Operator::Sub),
        BinaryOp::Mul => Some(py::Operator::Mult),
        // Integer quotient; the output operator keeps integers integral.
        BinaryOp::Quo => Some(py::Operator::FloorDiv),
        BinaryOp::Rem => Some(py::Operator::Mod),
        BinaryOp::And => Some(py::Operator::BitAnd),
        BinaryOp::Or => Some(py::Operator::BitOr),
        BinaryOp::Xor => Some(py::Operator::BitXor),
        BinaryOp::Shl => Some(py::Operator::LShift),
        BinaryOp::Shr => Some(py::Operator::RShift),
        _ => None,
    }
}

fn builtin_spelling(builtin: Builtin) -> &'static str {
    match builtin {
        Builtin::Append => "append",
        Builtin::Copy => "copy",
        Builtin::Close => "close",
        Builtin::Panic => "panic",
        Builtin::Recover => "recover",
        Builtin::Print => "print",
        Builtin::Println => "println",
        Builtin::Make => "make",
        Builtin::New => "new",
        Builtin::Len => "len",
        Builtin::Cap => "cap",
        Builtin::Complex => "complex",
        Builtin::Real => "real",
        Builtin::Imag => "imag",
        Builtin::Delete => "delete",
    }
}
