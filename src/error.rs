//! Error types for the Kuchinawa translator

use crate::goast::Pos;
use thiserror::Error;

/// Main error type for Kuchinawa
///
/// Translation is all-or-nothing: any of these aborts the current file
/// with no partial output.
#[derive(Debug, Error)]
pub enum KuchinawaError {
    #[error("Unsupported construct at {pos}: {construct}")]
    UnsupportedNode { construct: String, pos: Pos },

    #[error("Unsupported type at {pos}: {type_desc}")]
    UnsupportedType { type_desc: String, pos: Pos },

    #[error("Unresolved symbol '{name}' at {pos}")]
    UnresolvedSymbol { name: String, pos: Pos },

    #[error("Malformed syntax tree at {pos}: {message}")]
    MalformedAst { message: String, pos: Pos },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl KuchinawaError {
    /// Source position the error points at, if it carries one.
    pub fn pos(&self) -> Option<Pos> {
        match self {
            KuchinawaError::UnsupportedNode { pos, .. }
            | KuchinawaError::UnsupportedType { pos, .. }
            | KuchinawaError::UnresolvedSymbol { pos, .. }
            | KuchinawaError::MalformedAst { pos, .. } => Some(*pos),
            KuchinawaError::Internal { .. } | KuchinawaError::IoError(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, KuchinawaError>;
