use serde::Serialize;

use pulse_contracts::PULSE_DIAG_SCHEMA_VERSION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
        }
    }
}

/// One validation finding. `path` addresses the offending node with the
/// document pointer grammar (`/sections[2]/subsections[0].components[1].title`);
/// `code` is a stable dotted rule identifier for machine consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub level: Level,
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    pub fn error(code: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            level: Level::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn warning(code: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            level: Level::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub schema_version: String,
    pub ok: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn ok() -> Self {
        Self {
            schema_version: PULSE_DIAG_SCHEMA_VERSION.to_string(),
            ok: true,
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics keep the traversal order they were emitted in; only the
    /// `ok` flag is recomputed. Warnings never flip `ok`.
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.ok = diagnostics.iter().all(|d| d.level != Level::Error);
        self.diagnostics = diagnostics;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_do_not_flip_ok() {
        let report = Report::ok().with_diagnostics(vec![Diagnostic::warning(
            "question.numeric_as_text",
            "/sections[0].questions[0].id",
            "id should be numeric",
        )]);
        assert!(report.ok);
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn any_error_clears_ok() {
        let report = Report::ok().with_diagnostics(vec![
            Diagnostic::warning("a", "/sections", "w"),
            Diagnostic::error("b", "/sections", "e"),
        ]);
        assert!(!report.ok);
    }

    #[test]
    fn serializes_lowercase_levels() {
        let d = Diagnostic::error("structure.duplicate_id", "/sections", "dup");
        let v = serde_json::to_value(&d).expect("serialize diagnostic");
        assert_eq!(v["level"], "error");
        assert_eq!(v["code"], "structure.duplicate_id");
    }
}
