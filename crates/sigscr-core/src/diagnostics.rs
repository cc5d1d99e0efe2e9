use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// A finding tied to a 1-based source line of a signal script file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: String,
    pub severity: DiagnosticSeverity,
    pub line: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<Value>,
}

impl Diagnostic {
    pub fn warning(kind: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            severity: DiagnosticSeverity::Warning,
            line,
            message: message.into(),
            reference: None,
            related: None,
        }
    }

    pub fn error(kind: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            ..Self::warning(kind, line, message)
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_related(mut self, related: Value) -> Self {
        self.related = Some(related);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }

    pub fn sort_stable(diagnostics: &mut [Self]) {
        diagnostics.sort_by(|left, right| {
            (left.severity, left.line, &left.kind, &left.message).cmp(&(
                right.severity,
                right.line,
                &right.kind,
                &right.message,
            ))
        });
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        f.write_str(label)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] line {}: {}", self.severity, self.kind, self.line, self.message)
    }
}

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod tests;
