//! Diagnostics collected during normalization and emission.
//!
//! Nothing is silently dropped: every sentence, declaration, or clause a
//! backend skips is recorded here with the identity of the offending input,
//! and mirrored into the emitted text as a target-language comment.

use typelogic_ir::IrError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

/// A skipped or degraded piece of input, with enough identity to find it.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    /// Name of the sentence group the subject came from, if any.
    pub group: Option<String>,
    /// Rendering of the offending sentence, fact, or declaration.
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn error(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            level: DiagnosticLevel::Error,
            group: None,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            level: DiagnosticLevel::Warning,
            group: None,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn from_error(subject: impl Into<String>, error: &IrError) -> Self {
        Diagnostic::error(subject, error.to_string())
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// One-line rendering suitable for a target-language comment.
    pub fn format(&self) -> String {
        let level = match self.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
        };
        match &self.group {
            Some(group) => format!("{}: [{}] {}: {}", level, group, self.subject, self.message),
            None => format!("{}: {}: {}", level, self.subject, self.message),
        }
    }
}
