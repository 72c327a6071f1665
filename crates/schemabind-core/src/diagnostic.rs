//! Diagnostic codes for non-fatal build degradations
//!
//! Codes are stable string identifiers; never rename or remove one,
//! only add new ones.

use serde::{Deserialize, Serialize};

/// Stable diagnostic code registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    /// An enum or composite declaration collides with an already
    /// registered type name; the first registration wins.
    DuplicateType,

    /// An enum declaration carries no values and was skipped.
    EmptyEnum,

    /// A foreign-key target column could not be located; the relation
    /// was dropped and the column keeps its foreign role without a
    /// target.
    UnresolvedForeignKey,

    /// A key constraint row names a column that does not exist in the
    /// built tables; the row was ignored.
    UnknownKeyColumn,

    /// A function argument list did not parse into name/type tokens;
    /// the function was skipped.
    MalformedFunctionSignature,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateType => "DUPLICATE_TYPE",
            Self::EmptyEnum => "EMPTY_ENUM",
            Self::UnresolvedForeignKey => "UNRESOLVED_FOREIGN_KEY",
            Self::UnknownKeyColumn => "UNKNOWN_KEY_COLUMN",
            Self::MalformedFunctionSignature => "MALFORMED_FUNCTION_SIGNATURE",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A structured diagnostic recorded during a graph build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code.
    pub code: DiagnosticCode,

    /// Severity level.
    pub severity: Severity,

    /// Human-readable message.
    pub message: String,

    /// Catalog object the diagnostic refers to (best-effort), e.g.
    /// `user.auth_id` or a function name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            object: None,
        }
    }

    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        assert_eq!(DiagnosticCode::UnresolvedForeignKey.as_str(), "UNRESOLVED_FOREIGN_KEY");
        assert_eq!(
            DiagnosticCode::MalformedFunctionSignature.as_str(),
            "MALFORMED_FUNCTION_SIGNATURE"
        );
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::new(
            DiagnosticCode::UnresolvedForeignKey,
            Severity::Warn,
            "target column 'auth.id' not found",
        )
        .with_object("user.auth_id");

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("UNRESOLVED_FOREIGN_KEY"));
        assert!(json.contains("warn"));
        assert!(json.contains("user.auth_id"));
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Error > Severity::Warn);
        assert!(Severity::Warn > Severity::Info);
    }
}
