//! Canned DST names and constants used across the lowering

use crate::pyast::{Expr, Singleton};

pub fn py_true() -> Expr {
    Expr::NameConstant(Singleton::True)
}

pub fn py_false() -> Expr {
    Expr::NameConstant(Singleton::False)
}

pub fn py_none() -> Expr {
    Expr::NameConstant(Singleton::None)
}

pub fn py_empty_string() -> Expr {
    Expr::Str {
        value: "\"\"".to_string(),
    }
}

pub fn py_num(text: &str) -> Expr {
    Expr::Num {
        value: text.to_string(),
    }
}

pub fn py_range() -> Expr {
    Expr::name("range")
}

pub fn py_len() -> Expr {
    Expr::name("len")
}

pub fn py_enumerate() -> Expr {
    Expr::name("enumerate")
}

pub fn py_type() -> Expr {
    Expr::name("type")
}

pub fn py_key_error() -> Expr {
    Expr::name("KeyError")
}

pub fn py_complex() -> Expr {
    Expr::name("complex")
}

pub fn py_reversed() -> Expr {
    Expr::name("reversed")
}

/// Sentinel emitted for `fallthrough`; intentionally not executable.
pub fn py_todo_fallthrough() -> Expr {
    Expr::Call {
        func: Box::new(Expr::name("_TODO_fallthrough")),
        args: vec![],
        keywords: vec![],
    }
}
