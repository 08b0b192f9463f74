//! Typed source-language (Go-like) AST consumed by the translator
//!
//! Kuchinawa never lexes or parses source text; an external frontend hands
//! it this tree together with a [`crate::typeinfo::TypeInfo`] oracle. Every
//! expression, identifier and case clause carries a [`NodeId`] that keys
//! the oracle's side tables, plus a [`Pos`] for error messages.
//!
//! ## サブモジュール
//! - `pos` - 位置情報 (Pos)
//! - `build` - テスト/組み込み用のASTビルダー (AstBuilder)

pub mod build;
pub mod pos;

pub use build::AstBuilder;
pub use pos::Pos;

use serde::{Deserialize, Serialize};

/// Key into the type-info side tables.
///
/// The frontend assigns ids; the translator only compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Identifier occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub id: NodeId,
    pub pos: Pos,
    pub name: String,
}

impl Ident {
    /// The blank identifier never resolves to a symbol.
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub id: NodeId,
    pub pos: Pos,
    pub kind: ExprKind,
}

/// Literal kinds carried verbatim from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    Str,
}

/// Expression variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Identifier reference
    Ident(Ident),
    /// Literal with its raw source text (quotes and escapes included)
    BasicLit { kind: LitKind, value: String },
    /// Composite literal; `typ` is absent for nested literals with an
    /// elided element type
    CompositeLit {
        typ: Option<Box<Expr>>,
        elts: Vec<Expr>,
    },
    /// `key: value` element inside a composite literal
    KeyValue { key: Box<Expr>, value: Box<Expr> },
    /// Parenthesized expression
    Paren(Box<Expr>),
    /// Field or method selection `x.y`
    Selector { x: Box<Expr>, sel: Ident },
    /// Index access `x[k]`
    Index { x: Box<Expr>, index: Box<Expr> },
    /// Slice access `x[lo:hi]`
    Slice {
        x: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
    },
    /// Call or conversion
    Call { fun: Box<Expr>, args: Vec<Expr> },
    /// Pointer dereference or pointer type `*x`
    Star(Box<Expr>),
    /// Unary operation
    Unary { op: UnaryOp, x: Box<Expr> },
    /// Binary operation
    Binary {
        x: Box<Expr>,
        op: BinaryOp,
        y: Box<Expr>,
    },
    /// Function literal
    FuncLit { typ: FuncType, body: Block },
    /// Type assertion `x.(T)`; `typ` is `None` for the `x.(type)` form
    TypeAssert {
        x: Box<Expr>,
        typ: Option<Box<Expr>>,
    },
    /// Array or slice type `[N]T` / `[]T`
    ArrayType {
        len: Option<Box<Expr>>,
        elt: Box<Expr>,
    },
    /// Map type `map[K]V`
    MapType { key: Box<Expr>, value: Box<Expr> },
    /// Channel type
    ChanType { value: Box<Expr> },
    /// Struct type expression (fields live in the type oracle)
    StructType,
    /// Interface type expression
    InterfaceType,
    /// Function type expression
    FuncTypeExpr,
}

/// Unary operators of the source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Neg,
    /// `+`
    Pos,
    /// `^` (bitwise complement)
    Xor,
    /// `&` (address-of; erased on output)
    And,
    /// `<-` (channel receive; unsupported)
    Recv,
}

/// Binary operators of the source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    AndNot,
    Shl,
    Shr,
    LAnd,
    LOr,
    Eql,
    Neq,
    Lss,
    Leq,
    Gtr,
    Geq,
}

/// Assignment statement operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `:=`
    Define,
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
}

/// `break` / `continue` / `goto` / `fallthrough`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchKind {
    Break,
    Continue,
    Fallthrough,
    Goto,
}

/// Statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub pos: Pos,
    pub kind: StmtKind,
}

/// Brace-delimited statement list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

/// One case of a `switch` or type `switch`; an empty `list` is `default`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseClause {
    pub id: NodeId,
    pub pos: Pos,
    pub list: Vec<Expr>,
    pub body: Vec<Stmt>,
}

/// Statement variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    Empty,
    Expr(Expr),
    /// Assignment, short declaration, or augmented assignment
    Assign {
        lhs: Vec<Expr>,
        op: AssignOp,
        rhs: Vec<Expr>,
    },
    /// `x++` / `x--`
    IncDec { x: Expr, dec: bool },
    /// `var` / `const` / `type` declaration in statement position
    Decl(GenDecl),
    Return { results: Vec<Expr> },
    Branch { kind: BranchKind },
    Block(Block),
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        body: Block,
        els: Option<Box<Stmt>>,
    },
    /// Classic three-clause loop; all clauses optional
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Block,
    },
    /// `for k, v := range x`
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        x: Expr,
        body: Block,
    },
    Switch {
        init: Option<Box<Stmt>>,
        tag: Option<Expr>,
        cases: Vec<CaseClause>,
    },
    /// `switch y := x.(type)`; `bind` is absent for the bare `x.(type)` form
    TypeSwitch {
        init: Option<Box<Stmt>>,
        bind: Option<Ident>,
        x: Expr,
        cases: Vec<CaseClause>,
    },
    Defer { call: Expr },
    Go { call: Expr },
    Send { chan: Expr, value: Expr },
    Labeled { label: Ident, stmt: Box<Stmt> },
    Select,
}

/// Parameter or receiver group: `x, y int`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub names: Vec<Ident>,
    pub typ: Option<Expr>,
}

/// Function signature (parameter types live in the type oracle)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FuncType {
    pub params: Vec<Field>,
}

/// Top-level function or method declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub pos: Pos,
    pub name: Ident,
    /// Receiver field list; `None` for free functions
    pub recv: Option<Vec<Field>>,
    pub typ: FuncType,
    /// Absent for external declarations without a body
    pub body: Option<Block>,
    pub doc: Option<String>,
}

/// `type Name T`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: Ident,
    pub typ: Expr,
    pub doc: Option<String>,
}

/// `var` / `const` names with optional type and initializers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub typ: Option<Expr>,
    pub values: Vec<Expr>,
}

/// Import path (ignored by the translator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpec {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Spec {
    Type(TypeSpec),
    Value(ValueSpec),
    Import(ImportSpec),
}

/// Grouped declaration (`var (...)`, `const (...)`, `type (...)`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenDecl {
    pub pos: Pos,
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
}

/// One compilation file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub package: String,
    pub decls: Vec<Decl>,
}
