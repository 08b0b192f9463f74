//! KcnDiagnostics - translation diagnostics collection and output

use crate::error::KuchinawaError;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticSpan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct KcnDiagnostic {
    pub code: String,
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub span: DiagnosticSpan,
    pub phase: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct KcnDiagnostics {
    pub diagnostics: Vec<KcnDiagnostic>,
}

impl KcnDiagnostics {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn add(&mut self, diag: KcnDiagnostic) {
        self.diagnostics.push(diag);
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for diag in &self.diagnostics {
            let file = diag.span.file.as_deref().unwrap_or("<input>");
            out.push_str(&format!(
                "[{}] {}:{}:{} {}\n",
                diag.code, file, diag.span.line, diag.span.column, diag.message
            ));
        }
        out
    }
}

pub fn span_for_pos(file: Option<&Path>, pos: Option<crate::goast::Pos>) -> DiagnosticSpan {
    let pos = pos.unwrap_or_default();
    DiagnosticSpan {
        file: file.map(|p| p.display().to_string()),
        line: pos.line,
        column: pos.column,
    }
}

pub fn error_diag(code: &str, message: String, span: DiagnosticSpan, phase: &str) -> KcnDiagnostic {
    KcnDiagnostic {
        code: code.to_string(),
        message,
        severity: DiagnosticSeverity::Error,
        span,
        phase: phase.to_string(),
    }
}

pub fn from_error(err: &KuchinawaError, file: Option<&Path>) -> KcnDiagnostics {
    let mut diags = KcnDiagnostics::new();
    let (code, phase) = match err {
        KuchinawaError::UnsupportedNode { .. } => ("KCN-UNSUPPORTED-NODE", "lower"),
        KuchinawaError::UnsupportedType { .. } => ("KCN-UNSUPPORTED-TYPE", "lower"),
        KuchinawaError::UnresolvedSymbol { .. } => ("KCN-UNRESOLVED-SYMBOL", "lower"),
        KuchinawaError::MalformedAst { .. } => ("KCN-MALFORMED-AST", "lower"),
        KuchinawaError::Internal { .. } => ("KCN-INTERNAL", "lower"),
        KuchinawaError::IoError(_) => ("KCN-IO-ERROR", "io"),
    };
    let span = span_for_pos(file, err.pos());
    diags.add(error_diag(code, format!("{err}"), span, phase));
    diags
}
