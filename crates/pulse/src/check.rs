use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use jsonschema::Validator;
use serde::Serialize;
use serde_json::Value;
use walkdir::WalkDir;

use pulse_contracts::PULSE_TOOL_REPORT_SCHEMA_VERSION;
use pulse_lint::diagnostics::{Diagnostic, Level};
use pulse_lint::lint::{lint_report, LintOptions};
use pulse_lint::report::parse_report_value;

use crate::schema;

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Files or directories to check (directories are scanned recursively
    /// for *.report.json).
    #[arg(long, value_name = "PATH", required = true)]
    pub input: Vec<PathBuf>,

    /// Emit the machine-readable JSON report to stdout.
    #[arg(long)]
    pub report_json: bool,

    /// Maximum component nesting depth before validation fails.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,
}

#[derive(Debug, Serialize)]
struct FileCheck {
    file: String,
    ok: bool,
    diagnostics_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
struct CheckToolReport {
    schema_version: &'static str,
    command: &'static str,
    ok: bool,
    inputs_count: usize,
    files: Vec<FileCheck>,
    exit_code: u8,
}

pub fn cmd_check(args: CheckArgs) -> Result<std::process::ExitCode> {
    let inputs = collect_report_inputs(&args.input).context("collect inputs")?;
    let validator = schema::build_report_validator()?;
    let mut options = LintOptions::default();
    if let Some(depth) = args.max_depth {
        options.max_component_depth = depth;
    }

    let mut files: Vec<FileCheck> = Vec::new();
    let mut all_ok = true;
    for input in &inputs {
        let bytes = std::fs::read(input)
            .with_context(|| format!("read input: {}", input.display()))?;
        let diagnostics = check_document_bytes(&bytes, &validator, options);
        let ok = diagnostics.iter().all(|d| d.level != Level::Error);
        if !ok {
            all_ok = false;
        }
        files.push(FileCheck {
            file: input.display().to_string(),
            ok,
            diagnostics_count: diagnostics.len(),
            diagnostics,
        });
    }

    let exit_code: u8 = if all_ok { 0 } else { 1 };
    if args.report_json {
        let report = CheckToolReport {
            schema_version: PULSE_TOOL_REPORT_SCHEMA_VERSION,
            command: "check",
            ok: all_ok,
            inputs_count: inputs.len(),
            files,
            exit_code,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let mut errors = 0usize;
        let mut warnings = 0usize;
        for file in &files {
            for d in &file.diagnostics {
                match d.level {
                    Level::Error => errors += 1,
                    Level::Warning => warnings += 1,
                }
                let path = if d.path.is_empty() { "-" } else { d.path.as_str() };
                println!(
                    "{}: {}: {}: {} [{}]",
                    d.level.as_str(),
                    file.file,
                    path,
                    d.message,
                    d.code
                );
            }
        }
        println!(
            "checked {} file(s): {errors} error(s), {warnings} warning(s)",
            files.len()
        );
    }
    Ok(std::process::ExitCode::from(exit_code))
}

/// Grammar pre-pass first, then the semantic engine; both contribute to
/// one diagnostics list. Invalid JSON is a per-file diagnostic, not an
/// operational failure, so one broken file does not abort a batch.
fn check_document_bytes(bytes: &[u8], validator: &Validator, options: LintOptions) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let value: Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(err) => {
            diagnostics.push(Diagnostic::error(
                "parse.invalid_json",
                "",
                format!("invalid JSON: {err}"),
            ));
            return diagnostics;
        }
    };

    for error in validator.iter_errors(&value) {
        let path = instance_path_to_doc_path(&error.instance_path().to_string());
        diagnostics.push(Diagnostic::error("schema.invalid", path, error.to_string()));
    }

    match parse_report_value(&value) {
        Ok(doc) => {
            let report = lint_report(&doc, options);
            diagnostics.extend(report.diagnostics);
        }
        Err(err) => {
            // A non-object root is already a schema violation; keep the
            // parse error only when the schema pass somehow said nothing.
            if diagnostics.is_empty() {
                diagnostics.push(Diagnostic::error("parse.invalid_document", "", err.to_string()));
            }
        }
    }
    diagnostics
}

/// Converts a JSON Schema instance pointer to the document path grammar:
/// `/sections/0/subsections/1/components/2/title` becomes
/// `/sections[0]/subsections[1].components[2].title`.
fn instance_path_to_doc_path(pointer: &str) -> String {
    if pointer.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for (i, seg) in pointer.split('/').skip(1).enumerate() {
        if !seg.is_empty() && seg.chars().all(|c| c.is_ascii_digit()) {
            out.push('[');
            out.push_str(seg);
            out.push(']');
        } else if i == 0 || matches!(seg, "sections" | "subsections") {
            out.push('/');
            out.push_str(seg);
        } else {
            out.push('.');
            out.push_str(seg);
        }
    }
    out
}

fn should_walk_dir_entry(entry: &walkdir::DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if !entry.file_type().is_dir() {
        return true;
    }
    !matches!(name.as_ref(), ".git" | "target" | "node_modules")
}

fn collect_report_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut out: Vec<PathBuf> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for input in inputs {
        if input.is_file() {
            if seen.insert(input.clone()) {
                out.push(input.clone());
            }
            continue;
        }
        if input.is_dir() {
            let mut files: Vec<PathBuf> = Vec::new();
            for entry in WalkDir::new(input)
                .follow_links(false)
                .into_iter()
                .filter_entry(should_walk_dir_entry)
                .flatten()
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.into_path();
                if path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(".report.json"))
                {
                    files.push(path);
                }
            }
            files.sort();
            for file in files {
                if seen.insert(file.clone()) {
                    out.push(file);
                }
            }
            continue;
        }

        anyhow::bail!(
            "--input does not exist or is not a file/dir: {}",
            input.display()
        );
    }

    if out.is_empty() {
        anyhow::bail!("no *.report.json inputs found");
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_instance_pointers_to_document_paths() {
        assert_eq!(instance_path_to_doc_path(""), "");
        assert_eq!(instance_path_to_doc_path("/sections"), "/sections");
        assert_eq!(instance_path_to_doc_path("/sections/0/id"), "/sections[0].id");
        assert_eq!(
            instance_path_to_doc_path("/sections/0/subsections/1/components/2/title"),
            "/sections[0]/subsections[1].components[2].title"
        );
        assert_eq!(
            instance_path_to_doc_path("/sections/3/questions/2/questionType"),
            "/sections[3].questions[2].questionType"
        );
        assert_eq!(instance_path_to_doc_path("/surveyInfo/nps"), "/surveyInfo.nps");
    }

    #[test]
    fn schema_flags_wrong_primitive_kinds() {
        let validator = schema::build_report_validator().expect("validator");
        let doc = serde_json::json!({
            "sections": [{"id": 7, "index": 0}]
        });
        let diags = check_document_bytes(
            serde_json::to_string(&doc).expect("encode").as_bytes(),
            &validator,
            LintOptions::default(),
        );
        assert!(diags
            .iter()
            .any(|d| d.code == "schema.invalid" && d.path == "/sections[0].id"));
    }

    #[test]
    fn non_object_root_is_a_schema_error_not_a_crash() {
        let validator = schema::build_report_validator().expect("validator");
        let diags = check_document_bytes(b"[1, 2]", &validator, LintOptions::default());
        assert!(!diags.is_empty());
        assert!(diags.iter().all(|d| d.level == Level::Error));
    }

    #[test]
    fn invalid_json_is_a_diagnostic() {
        let validator = schema::build_report_validator().expect("validator");
        let diags = check_document_bytes(b"{oops", &validator, LintOptions::default());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "parse.invalid_json");
    }
}
