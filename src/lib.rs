//! Kuchinawa - typed Go AST to Python source translator
//!
//! # Overview
//! Consumes an already-typed source AST plus its type-info oracle and
//! emits executable Python-like text. Parsing and type checking stay in
//! the frontend; this crate owns the lowering and the printer.

pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod goast;
pub mod lower;
pub mod pyast;
pub mod typeinfo;

pub use error::{KuchinawaError, Result};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Translate typed files into a DST module AST.
pub fn translate(files: &[goast::File], info: &typeinfo::TypeInfo) -> Result<pyast::Module> {
    let mut lowerer = lower::Lowerer::new(info);
    lowerer.lower_files(files)
}

/// Translate typed files straight to DST source text.
pub fn translate_to_string(files: &[goast::File], info: &typeinfo::TypeInfo) -> Result<String> {
    let module = translate(files, info)?;
    Ok(emitter::emit(&module))
}

/// Translate, mapping any failure to coded diagnostics.
pub fn translate_with_diagnostics(
    files: &[goast::File],
    info: &typeinfo::TypeInfo,
    file: Option<&Path>,
) -> std::result::Result<String, diagnostics::KcnDiagnostics> {
    translate_to_string(files, info).map_err(|err| diagnostics::from_error(&err, file))
}

/// Serialized input: typed files plus their oracle, as produced by an
/// external frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub files: Vec<goast::File>,
    pub info: typeinfo::TypeInfo,
}
