//! Document-level orchestration: structural invariants, per-section
//! resolution context, component/question/template passes.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::component;
use crate::diagnostics::{Diagnostic, Report};
use crate::question;
use crate::report::{ReportDoc, Section};
use crate::resolve::{is_question_section, ResolveCtx, ATTRIBUTES_SECTION_ID, QUESTION_SECTION_IDS};
use crate::shapes;

#[derive(Debug, Clone, Copy)]
pub struct LintOptions {
    /// Component trees deeper than this fail with a diagnostic instead of
    /// exhausting the call stack.
    pub max_component_depth: usize,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            max_component_depth: 32,
        }
    }
}

/// Validates one document snapshot. Pure and non-short-circuiting: every
/// reachable issue is reported in a single pass, and the same snapshot
/// always yields the same diagnostics list.
pub fn lint_report(doc: &ReportDoc, options: LintOptions) -> Report {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    check_duplicate_ids(
        doc.sections.iter().map(|s| s.id.as_deref()),
        "/sections",
        "section",
        &mut diagnostics,
    );
    check_index_density(
        doc.sections
            .iter()
            .enumerate()
            .map(|(i, s)| (format!("/sections[{i}]"), s.index.as_ref())),
        "/sections",
        "section",
        &mut diagnostics,
    );

    let mut questions_validated = false;
    for (i, section) in doc.sections.iter().enumerate() {
        let section_path = format!("/sections[{i}]");

        check_duplicate_ids(
            section.subsections.iter().map(|s| s.id.as_deref()),
            &format!("{section_path}/subsections"),
            "subsection",
            &mut diagnostics,
        );
        check_index_density(
            section
                .subsections
                .iter()
                .enumerate()
                .map(|(j, s)| (format!("{section_path}/subsections[{j}]"), s.index.as_ref())),
            &section_path,
            "subsection",
            &mut diagnostics,
        );

        let section_data = build_section_data(section);
        let ctx = ResolveCtx {
            section_id: section.id.as_deref(),
            section_data: section_data.as_ref(),
        };
        let ui_texts = doc.ui_texts.as_ref();

        if section.subsections.is_empty() {
            for (k, comp) in section.components.iter().enumerate() {
                component::check_component_tree(
                    comp,
                    section.data.as_ref(),
                    ui_texts,
                    &ctx,
                    &format!("{section_path}.components[{k}]"),
                    0,
                    &options,
                    &mut diagnostics,
                );
            }
        } else {
            // Section-level components are shadowed by subsections.
            for (j, sub) in section.subsections.iter().enumerate() {
                for (k, comp) in sub.components.iter().enumerate() {
                    component::check_component_tree(
                        comp,
                        sub.data.as_ref(),
                        ui_texts,
                        &ctx,
                        &format!("{section_path}/subsections[{j}].components[{k}]"),
                        0,
                        &options,
                        &mut diagnostics,
                    );
                }
            }
        }

        if let Some(questions) = &section.questions {
            match section.id.as_deref() {
                Some(id) if is_question_section(id) => {
                    // Ownership is not proven exclusive; only the first
                    // questions-bearing section is validated.
                    if !questions_validated {
                        questions_validated = true;
                        question::check_questions(questions, &section_path, &mut diagnostics);
                    }
                }
                _ => {
                    let message = match section.id.as_deref() {
                        Some(id) => format!(
                            "section \"{id}\" must not declare questions (allowed: {})",
                            QUESTION_SECTION_IDS.join(", ")
                        ),
                        None => format!(
                            "section must not declare questions (allowed: {})",
                            QUESTION_SECTION_IDS.join(", ")
                        ),
                    };
                    diagnostics.push(Diagnostic::error(
                        "structure.questions_section",
                        &section_path,
                        message,
                    ));
                }
            }
        }
    }

    check_survey_info(doc.survey_info.as_ref(), &mut diagnostics);

    Report::ok().with_diagnostics(diagnostics)
}

fn check_duplicate_ids<'a, I>(ids: I, list_path: &str, entity: &str, out: &mut Vec<Diagnostic>)
where
    I: Iterator<Item = Option<&'a str>>,
{
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut reported: BTreeSet<&str> = BTreeSet::new();
    for id in ids.flatten() {
        if !seen.insert(id) && reported.insert(id) {
            out.push(Diagnostic::error(
                "structure.duplicate_id",
                list_path,
                format!("duplicate {entity} id: \"{id}\""),
            ));
        }
    }
}

enum IndexValue {
    Int(i64),
    TextInt(i64),
    Bad,
}

fn index_value(value: &Value) -> IndexValue {
    match value {
        Value::Number(n) => n.as_i64().map(IndexValue::Int).unwrap_or(IndexValue::Bad),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(IndexValue::TextInt)
            .unwrap_or(IndexValue::Bad),
        _ => IndexValue::Bad,
    }
}

/// Density is judged on the sorted index set: a dense set declared out of
/// order passes. The comparison is skipped when any index is missing or
/// unusable, which already produced its own error.
fn check_index_density<'a, I>(items: I, list_path: &str, entity: &str, out: &mut Vec<Diagnostic>)
where
    I: Iterator<Item = (String, Option<&'a Value>)>,
{
    let mut found: Vec<i64> = Vec::new();
    let mut complete = true;
    let mut count = 0usize;
    for (entity_path, index) in items {
        count += 1;
        let Some(index) = index else {
            out.push(Diagnostic::error(
                "structure.missing_index",
                &entity_path,
                format!("{entity} is missing index"),
            ));
            complete = false;
            continue;
        };
        match index_value(index) {
            IndexValue::Int(i) => found.push(i),
            IndexValue::TextInt(i) => {
                out.push(Diagnostic::warning(
                    "structure.numeric_as_text",
                    format!("{entity_path}.index"),
                    format!("index should be numeric, got {}", shapes::kind_name(index)),
                ));
                found.push(i);
            }
            IndexValue::Bad => {
                out.push(Diagnostic::error(
                    "structure.index_kind",
                    format!("{entity_path}.index"),
                    format!("index must be an integer, got {}", shapes::kind_name(index)),
                ));
                complete = false;
            }
        }
    }
    if !complete || count == 0 {
        return;
    }
    found.sort_unstable();
    let expected: Vec<i64> = (0..count as i64).collect();
    if found != expected {
        out.push(Diagnostic::error(
            "structure.index_sequence",
            list_path,
            format!(
                "{entity} indexes are not sequential: found [{}], expected [{}]",
                join_ints(&found),
                join_ints(&expected)
            ),
        ));
    }
}

fn join_ints(values: &[i64]) -> String {
    let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
    rendered.join(", ")
}

/// Merged per-section resolution context: the section's own `data` plus
/// each subsection's `data`, keyed by the subsection id or by the bare
/// suffix when the id is `<sectionId>-<suffix>`. The attributes section
/// additionally aggregates subsection payloads into `attributes`.
fn build_section_data(section: &Section) -> Option<Value> {
    let mut merged: Map<String, Value> = match &section.data {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    let section_id = section.id.as_deref();
    for sub in &section.subsections {
        let (Some(sub_id), Some(data)) = (sub.id.as_deref(), sub.data.as_ref()) else {
            continue;
        };
        let key = section_id
            .and_then(|sid| sub_id.strip_prefix(&format!("{sid}-")))
            .filter(|suffix| !suffix.is_empty())
            .unwrap_or(sub_id);
        merged.insert(key.to_string(), data.clone());
    }
    if section_id == Some(ATTRIBUTES_SECTION_ID) {
        let payloads: Vec<Value> = section
            .subsections
            .iter()
            .filter_map(|sub| sub.data.clone())
            .collect();
        if !payloads.is_empty() {
            merged.insert("attributes".to_string(), Value::Array(payloads));
        }
    }
    if merged.is_empty() {
        None
    } else {
        Some(Value::Object(merged))
    }
}

fn check_survey_info(survey_info: Option<&Value>, out: &mut Vec<Diagnostic>) {
    let Some(nps) = survey_info.and_then(|v| v.get("nps")) else {
        return;
    };
    let path = "/surveyInfo.nps";
    let score = if let Some(n) = nps.as_f64() {
        Some(n)
    } else if let Some(s) = nps.as_str() {
        match s.trim().parse::<f64>() {
            Ok(n) => {
                out.push(Diagnostic::warning(
                    "survey.numeric_as_text",
                    path,
                    format!("nps should be numeric, got {}", shapes::kind_name(nps)),
                ));
                Some(n)
            }
            Err(_) => {
                out.push(Diagnostic::error(
                    "survey.field_kind",
                    path,
                    format!("nps must be numeric, got {}", shapes::kind_name(nps)),
                ));
                None
            }
        }
    } else {
        out.push(Diagnostic::error(
            "survey.field_kind",
            path,
            format!("nps must be numeric, got {}", shapes::kind_name(nps)),
        ));
        None
    };
    if let Some(n) = score {
        if !(-100.0..=100.0).contains(&n) {
            out.push(Diagnostic::error(
                "survey.nps_range",
                path,
                format!("surveyInfo nps must be within [-100, 100], got {n}"),
            ));
        }
    }
}
