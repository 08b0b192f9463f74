//! Emitter module - DST code generation
//!
//! Walks the DST AST and streams indented source text to a byte sink.
//! Parenthesization is purely precedence-driven: a child expression is
//! wrapped iff its rank is strictly below the surrounding rank. The two
//! asymmetric spots are `**` (right-associative, so an equal-precedence
//! *left* operand keeps its parens) and the non-associative operators
//! (`-`, `/`, `//`, `%`, `@`, `<<`, `>>`), whose equal-precedence *right*
//! operand keeps its parens.

use crate::pyast::ops::prec;
use crate::pyast::{
    Arguments, Comprehension, Expr, Module, Operator, Slice, Stmt,
};
use std::io::{self, Write};


/// Emit a module as DST source text.
pub fn emit(module: &Module) -> String {
    let mut buf = Vec::new();
    PyWriter::new(&mut buf)
        .write_module(module)
        .expect("writing to an in-memory buffer cannot fail");
    String::from_utf8(buf).expect("emitted text is valid UTF-8")
}

/// Render a single statement (tests and debug dumps).
pub fn stmt_to_string(stmt: &Stmt) -> String {
    let mut buf = Vec::new();
    PyWriter::new(&mut buf)
        .write_stmt(stmt)
        .expect("writing to an in-memory buffer cannot fail");
    String::from_utf8(buf).expect("emitted text is valid UTF-8")
}

/// Render a single expression (tests and debug dumps).
pub fn expr_to_string(expr: &Expr) -> String {
    let mut buf = Vec::new();
    PyWriter::new(&mut buf)
        .write_expr(expr)
        .expect("writing to an in-memory buffer cannot fail");
    String::from_utf8(buf).expect("emitted text is valid UTF-8")
}

/// Streaming DST writer
pub struct PyWriter<W: Write> {
    out: W,
    indent: usize,
}

impl<W: Write> PyWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, indent: 0 }
    }

    pub fn write_module(&mut self, module: &Module) -> io::Result<()> {
        for stmt in &module.body {
            self.write_stmt(stmt)?;
        }
        Ok(())
    }

    /// Write a complete statement, including its trailing newline.
    pub fn write_stmt(&mut self, stmt: &Stmt) -> io::Result<()> {
        match stmt {
            Stmt::FunctionDef(def) => {
                self.begin_line()?;
                write!(self.out, "def {}(", def.name)?;
                self.write_arguments(&def.args)?;
                write!(self.out, "):")?;
                self.end_line()?;
                self.block(&def.body)
            }
            Stmt::ClassDef(def) => {
                self.begin_line()?;
                write!(self.out, "class {}", def.name)?;
                if !def.bases.is_empty() {
                    write!(self.out, "(")?;
                    for (i, base) in def.bases.iter().enumerate() {
                        if i > 0 {
                            write!(self.out, ", ")?;
                        }
                        self.write_expr_prec(base, prec::ITEM)?;
                    }
                    write!(self.out, ")")?;
                }
                write!(self.out, ":")?;
                self.end_line()?;
                self.block(&def.body)
            }
            Stmt::Return { value } => {
                self.begin_line()?;
                write!(self.out, "return")?;
                if let Some(value) = value {
                    write!(self.out, " ")?;
                    self.write_expr_prec(value, prec::ITEM)?;
                }
                self.end_line()
            }
            Stmt::Delete { targets } => {
                self.begin_line()?;
                write!(self.out, "del ")?;
                for (i, target) in targets.iter().enumerate() {
                    if i > 0 {
                        write!(self.out, ", ")?;
                    }
                    self.write_expr_prec(target, prec::ITEM)?;
                }
                self.end_line()
            }
            Stmt::Assign { targets, value } => {
                self.begin_line()?;
                for (i, target) in targets.iter().enumerate() {
                    if i > 0 {
                        write!(self.out, ", ")?;
                    }
                    self.write_expr(target)?;
                }
                write!(self.out, " = ")?;
                self.write_expr(value)?;
                self.end_line()
            }
            Stmt::AugAssign { target, op, value } => {
                self.begin_line()?;
                self.write_expr(target)?;
                write!(self.out, " {}= ", op.as_str())?;
                self.write_expr(value)?;
                self.end_line()
            }
            Stmt::ExprStmt { value } => {
                self.begin_line()?;
                self.write_expr(value)?;
                self.end_line()
            }
            Stmt::If { test, body, orelse } => self.write_if(test, body, orelse, "if"),
            Stmt::While { test, body } => {
                self.begin_line()?;
                write!(self.out, "while ")?;
                self.write_expr(test)?;
                write!(self.out, ":")?;
                self.end_line()?;
                self.block(body)
            }
            Stmt::For { target, iter, body } => {
                self.begin_line()?;
                write!(self.out, "for ")?;
                self.write_expr_prec(target, prec::ITEM)?;
                write!(self.out, " in ")?;
                self.write_expr_prec(iter, prec::ITEM)?;
                write!(self.out, ":")?;
                self.end_line()?;
                self.block(body)
            }
            Stmt::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => {
                self.line("try:")?;
                self.block(body)?;
                for handler in handlers {
                    self.begin_line()?;
                    write!(self.out, "except")?;
                    if let Some(typ) = &handler.typ {
                        write!(self.out, " ")?;
                        self.write_expr_prec(typ, prec::ITEM)?;
                        if let Some(name) = &handler.name {
                            write!(self.out, " as {name}")?;
                        }
                    }
                    write!(self.out, ":")?;
                    self.end_line()?;
                    self.block(&handler.body)?;
                }
                if !orelse.is_empty() {
                    self.line("else:")?;
                    self.block(orelse)?;
                }
                if !finalbody.is_empty() {
                    self.line("finally:")?;
                    self.block(finalbody)?;
                }
                Ok(())
            }
            Stmt::Raise { exc, cause } => {
                self.begin_line()?;
                write!(self.out, "raise")?;
                if let Some(exc) = exc {
                    write!(self.out, " ")?;
                    self.write_expr_prec(exc, prec::ITEM)?;
                    if let Some(cause) = cause {
                        write!(self.out, " from ")?;
                        self.write_expr_prec(cause, prec::ITEM)?;
                    }
                }
                self.end_line()
            }
            Stmt::Import { names } => {
                self.begin_line()?;
                write!(self.out, "import ")?;
                for (i, alias) in names.iter().enumerate() {
                    if i > 0 {
                        write!(self.out, ", ")?;
                    }
                    write!(self.out, "{}", alias.name)?;
                    if let Some(asname) = &alias.asname {
                        write!(self.out, " as {asname}")?;
                    }
                }
                self.end_line()
            }
            Stmt::DocString { lines } => {
                self.begin_line()?;
                write!(self.out, "\"\"\"{}\"\"\"", lines.join("\n"))?;
                self.end_line()
            }
            Stmt::Pass => self.line("pass"),
            Stmt::Break => self.line("break"),
            Stmt::Continue => self.line("continue"),
        }
    }

    /// `if` / `elif` / `else` chain. An `orelse` holding exactly one
    /// nested `if` folds into `elif`.
    fn write_if(&mut self, test: &Expr, body: &[Stmt], orelse: &[Stmt], kw: &str) -> io::Result<()> {
        self.begin_line()?;
        write!(self.out, "{kw} ")?;
        self.write_expr(test)?;
        write!(self.out, ":")?;
        self.end_line()?;
        self.block(body)?;
        match orelse {
            [] => Ok(()),
            [Stmt::If { test, body, orelse }] => self.write_if(test, body, orelse, "elif"),
            _ => {
                self.line("else:")?;
                self.block(orelse)
            }
        }
    }

    /// Indented statement list; empty bodies become `pass`.
    fn block(&mut self, stmts: &[Stmt]) -> io::Result<()> {
        self.indent += 1;
        if stmts.is_empty() {
            self.line("pass")?;
        } else {
            for stmt in stmts {
                self.write_stmt(stmt)?;
            }
        }
        self.indent -= 1;
        Ok(())
    }

    fn write_arguments(&mut self, args: &Arguments) -> io::Result<()> {
        let mut sep = false;
        let default_offset = args.args.len() - args.defaults.len();
        for (i, arg) in args.args.iter().enumerate() {
            if sep {
                write!(self.out, ", ")?;
            }
            sep = true;
            write!(self.out, "{}", arg.arg)?;
            if i >= default_offset {
                write!(self.out, "=")?;
                self.write_expr_prec(&args.defaults[i - default_offset], prec::ITEM)?;
            }
        }
        if let Some(vararg) = &args.vararg {
            if sep {
                write!(self.out, ", ")?;
            }
            sep = true;
            write!(self.out, "*{}", vararg.arg)?;
        } else if !args.kwonlyargs.is_empty() {
            if sep {
                write!(self.out, ", ")?;
            }
            sep = true;
            write!(self.out, "*")?;
        }
        for (i, arg) in args.kwonlyargs.iter().enumerate() {
            if sep {
                write!(self.out, ", ")?;
            }
            sep = true;
            write!(self.out, "{}", arg.arg)?;
            if let Some(Some(default)) = args.kw_defaults.get(i) {
                write!(self.out, "=")?;
                self.write_expr_prec(default, prec::ITEM)?;
            }
        }
        if let Some(kwarg) = &args.kwarg {
            if sep {
                write!(self.out, ", ")?;
            }
            write!(self.out, "**{}", kwarg.arg)?;
        }
        Ok(())
    }

    /// Write an expression at statement position (tuples stay bare).
    pub fn write_expr(&mut self, expr: &Expr) -> io::Result<()> {
        self.write_expr_prec(expr, prec::TUPLE)
    }

    fn write_expr_prec(&mut self, expr: &Expr, parent: u8) -> io::Result<()> {
        // Forms that carry their own delimiters ignore the surrounding rank.
        match expr {
            Expr::Tuple(elts) if elts.is_empty() => return write!(self.out, "()"),
            Expr::GeneratorExp { elt, generators } => {
                write!(self.out, "(")?;
                self.write_expr_prec(elt, prec::ITEM)?;
                self.write_generators(generators)?;
                return write!(self.out, ")");
            }
            _ => {}
        }

        let rank = expr.precedence();
        let paren = rank < parent;
        if paren {
            write!(self.out, "(")?;
        }
        match expr {
            Expr::Name(id) => write!(self.out, "{id}")?,
            Expr::Num { value } => write!(self.out, "{value}")?,
            Expr::Str { value } => write!(self.out, "{value}")?,
            Expr::NameConstant(value) => {
                let text = match value {
                    crate::pyast::Singleton::None => "None",
                    crate::pyast::Singleton::True => "True",
                    crate::pyast::Singleton::False => "False",
                };
                write!(self.out, "{text}")?;
            }
            Expr::Ellipsis => write!(self.out, "...")?,
            Expr::UnaryOp { op, operand } => {
                write!(self.out, "{}", op.as_str())?;
                self.write_expr_prec(operand, rank)?;
            }
            Expr::BinOp { left, op, right } => {
                let (left_rank, right_rank) = if *op == Operator::Pow {
                    (rank + 1, rank)
                } else if op.right_needs_parens() {
                    (rank, rank + 1)
                } else {
                    (rank, rank)
                };
                self.write_expr_prec(left, left_rank)?;
                write!(self.out, " {} ", op.as_str())?;
                self.write_expr_prec(right, right_rank)?;
            }
            Expr::BoolOp { op, values } => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(self.out, "{}", op.as_str())?;
                    }
                    self.write_expr_prec(value, rank)?;
                }
            }
            Expr::Compare {
                left,
                ops,
                comparators,
            } => {
                self.write_expr_prec(left, rank)?;
                for (op, comparator) in ops.iter().zip(comparators) {
                    write!(self.out, "{}", op.as_str())?;
                    self.write_expr_prec(comparator, rank)?;
                }
            }
            Expr::Tuple(elts) => {
                for (i, elt) in elts.iter().enumerate() {
                    if i > 0 {
                        write!(self.out, ", ")?;
                    }
                    self.write_expr_prec(elt, prec::ITEM)?;
                }
                if elts.len() == 1 {
                    write!(self.out, ",")?;
                }
            }
            Expr::List(elts) => {
                write!(self.out, "[")?;
                for (i, elt) in elts.iter().enumerate() {
                    if i > 0 {
                        write!(self.out, ", ")?;
                    }
                    self.write_expr_prec(elt, prec::ITEM)?;
                }
                write!(self.out, "]")?;
            }
            Expr::Dict { keys, values } => {
                write!(self.out, "{{")?;
                for (i, (key, value)) in keys.iter().zip(values).enumerate() {
                    if i > 0 {
                        write!(self.out, ", ")?;
                    }
                    self.write_expr_prec(key, prec::ITEM)?;
                    write!(self.out, ": ")?;
                    self.write_expr_prec(value, prec::ITEM)?;
                }
                write!(self.out, "}}")?;
            }
            Expr::ListComp { elt, generators } => {
                write!(self.out, "[")?;
                self.write_expr_prec(elt, prec::ITEM)?;
                self.write_generators(generators)?;
                write!(self.out, "]")?;
            }
            Expr::SetComp { elt, generators } => {
                write!(self.out, "{{")?;
                self.write_expr_prec(elt, prec::ITEM)?;
                self.write_generators(generators)?;
                write!(self.out, "}}")?;
            }
            Expr::DictComp {
                key,
                value,
                generators,
            } => {
                write!(self.out, "{{")?;
                self.write_expr_prec(key, prec::ITEM)?;
                write!(self.out, ": ")?;
                self.write_expr_prec(value, prec::ITEM)?;
                self.write_generators(generators)?;
                write!(self.out, "}}")?;
            }
            Expr::GeneratorExp { .. } => unreachable!("handled above"),
            Expr::Attribute { value, attr } => {
                self.write_expr_prec(value, rank)?;
                write!(self.out, ".{attr}")?;
            }
            Expr::Subscript { value, slice } => {
                self.write_expr_prec(value, rank)?;
                write!(self.out, "[")?;
                self.write_slice(slice)?;
                write!(self.out, "]")?;
            }
            Expr::Call {
                func,
                args,
                keywords,
            } => {
                self.write_expr_prec(func, rank)?;
                write!(self.out, "(")?;
                let mut sep = false;
                for arg in args {
                    if sep {
                        write!(self.out, ", ")?;
                    }
                    sep = true;
                    self.write_expr_prec(arg, prec::ITEM)?;
                }
                for keyword in keywords {
                    if sep {
                        write!(self.out, ", ")?;
                    }
                    sep = true;
                    write!(self.out, "{}=", keyword.arg)?;
                    self.write_expr_prec(&keyword.value, prec::ITEM)?;
                }
                write!(self.out, ")")?;
            }
            Expr::Lambda { args, body } => {
                write!(self.out, "lambda")?;
                if args.args.is_empty()
                    && args.vararg.is_none()
                    && args.kwonlyargs.is_empty()
                    && args.kwarg.is_none()
                {
                    write!(self.out, ":")?;
                } else {
                    write!(self.out, " ")?;
                    self.write_arguments(args)?;
                    write!(self.out, ":")?;
                }
                write!(self.out, " ")?;
                self.write_expr_prec(body, prec::ITEM)?;
            }
            Expr::Starred(value) => {
                write!(self.out, "*")?;
                self.write_expr_prec(value, prec::POSTFIX)?;
            }
        }
        if paren {
            write!(self.out, ")")?;
        }
        Ok(())
    }

    fn write_generators(&mut self, generators: &[Comprehension]) -> io::Result<()> {
        for generator in generators {
            write!(self.out, " for ")?;
            self.write_expr_prec(&generator.target, prec::ITEM)?;
            write!(self.out, " in ")?;
            self.write_expr_prec(&generator.iter, prec::ITEM)?;
            for cond in &generator.ifs {
                write!(self.out, " if ")?;
                self.write_expr_prec(cond, prec::ITEM)?;
            }
        }
        Ok(())
    }

    fn write_slice(&mut self, slice: &Slice) -> io::Result<()> {
        match slice {
            Slice::Index(index) => self.write_expr(index),
            Slice::Range { lower, upper, step } => {
                if let Some(lower) = lower {
                    self.write_expr_prec(lower, prec::ITEM)?;
                }
                write!(self.out, ":")?;
                if let Some(upper) = upper {
                    self.write_expr_prec(upper, prec::ITEM)?;
                }
                if let Some(step) = step {
                    write!(self.out, ":")?;
                    self.write_expr_prec(step, prec::ITEM)?;
                }
                Ok(())
            }
        }
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        self.begin_line()?;
        write!(self.out, "{text}")?;
        self.end_line()
    }

    fn begin_line(&mut self) -> io::Result<()> {
        for _ in 0..self.indent {
            write!(self.out, "    ")?;
        }
        Ok(())
    }

    fn end_line(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }
}
