//! DST expression definitions
//!
//! 出力言語の式を定義する。各バリアントは静的な優先順位ランクを持ち、
//! プリンタが括弧付けの判断に使用する。

use super::ops::{prec, BoolOp, CmpOp, Operator, UnaryOp};

/// DST identifier spelling
pub type Identifier = String;

/// The three named constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Singleton {
    None,
    True,
    False,
}

/// DST expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Bare name
    Name(Identifier),
    /// Number literal, raw source text
    Num { value: String },
    /// String literal, raw text including quotes and escapes
    Str { value: String },
    /// `True` / `False` / `None`
    NameConstant(Singleton),
    /// `...`
    Ellipsis,
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    BinOp {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },
    /// Variadic `and` / `or`
    BoolOp { op: BoolOp, values: Vec<Expr> },
    /// Chained comparison `left op0 c0 op1 c1 ...`
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOp>,
        comparators: Vec<Expr>,
    },
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    /// Parallel key/value lists
    Dict { keys: Vec<Expr>, values: Vec<Expr> },
    ListComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    SetComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    DictComp {
        key: Box<Expr>,
        value: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    GeneratorExp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    /// `value.attr`
    Attribute {
        value: Box<Expr>,
        attr: Identifier,
    },
    /// `value[slice]`
    Subscript {
        value: Box<Expr>,
        slice: Box<Slice>,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    Lambda {
        args: Arguments,
        body: Box<Expr>,
    },
    /// `*value`
    Starred(Box<Expr>),
}

impl Expr {
    /// Static precedence rank used by the printer.
    pub fn precedence(&self) -> u8 {
        match self {
            Expr::Tuple(_) => prec::TUPLE,
            Expr::Lambda { .. } => prec::LAMBDA,
            Expr::Starred(_) => prec::ITEM,
            Expr::BoolOp { op, .. } => op.precedence(),
            Expr::Compare { .. } => prec::COMPARE,
            Expr::BinOp { op, .. } => op.precedence(),
            Expr::UnaryOp { op, .. } => op.precedence(),
            Expr::Attribute { .. } | Expr::Subscript { .. } | Expr::Call { .. } => prec::POSTFIX,
            Expr::List(_)
            | Expr::Dict { .. }
            | Expr::ListComp { .. }
            | Expr::SetComp { .. }
            | Expr::DictComp { .. }
            | Expr::GeneratorExp { .. } => prec::DISPLAY,
            Expr::Name(_)
            | Expr::Num { .. }
            | Expr::Str { .. }
            | Expr::NameConstant(_)
            | Expr::Ellipsis => prec::ATOM,
        }
    }

    /// Convenience constructor for a bare name.
    pub fn name(id: impl Into<Identifier>) -> Expr {
        Expr::Name(id.into())
    }
}

/// Subscript specifier
#[derive(Debug, Clone, PartialEq)]
pub enum Slice {
    /// Plain index `x[i]`
    Index(Expr),
    /// Range slice `x[lower:upper:step]` with all parts optional
    Range {
        lower: Option<Expr>,
        upper: Option<Expr>,
        step: Option<Expr>,
    },
}

/// One `for target in iter if ...` clause of a comprehension
#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension {
    pub target: Expr,
    pub iter: Expr,
    pub ifs: Vec<Expr>,
}

/// Formal parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub arg: Identifier,
}

/// Formal argument list; `defaults` is right-aligned against `args`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arguments {
    pub args: Vec<Arg>,
    pub defaults: Vec<Expr>,
    pub vararg: Option<Arg>,
    pub kwonlyargs: Vec<Arg>,
    pub kw_defaults: Vec<Option<Expr>>,
    pub kwarg: Option<Arg>,
}

/// `name=value` argument at a call site
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub arg: Identifier,
    pub value: Expr,
}

/// Import name with optional `as` alias
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    pub name: Identifier,
    pub asname: Option<Identifier>,
}
