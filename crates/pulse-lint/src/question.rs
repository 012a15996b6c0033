//! Per-question validation for the questions-bearing section.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::diagnostics::Diagnostic;
use crate::report::Question;
use crate::shapes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    Nps,
    OpenEnded,
    MultipleChoice,
    SingleChoice,
}

pub const ALL_QUESTION_TYPES: &[QuestionType] = &[
    QuestionType::Nps,
    QuestionType::OpenEnded,
    QuestionType::MultipleChoice,
    QuestionType::SingleChoice,
];

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Nps => "nps",
            QuestionType::OpenEnded => "open-ended",
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::SingleChoice => "single-choice",
        }
    }

    pub fn parse(s: &str) -> Option<QuestionType> {
        ALL_QUESTION_TYPES.iter().copied().find(|t| t.as_str() == s)
    }
}

fn valid_question_type_names() -> String {
    let names: Vec<&str> = ALL_QUESTION_TYPES.iter().map(|t| t.as_str()).collect();
    names.join(", ")
}

/// Validates every question in declaration order, then reports duplicated
/// ids once per id. `section_path` addresses the owning section.
pub fn check_questions(questions: &[Question], section_path: &str, out: &mut Vec<Diagnostic>) {
    for (i, question) in questions.iter().enumerate() {
        let path = format!("{section_path}.questions[{i}]");
        check_question(question, &path, out);
    }

    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut reported: BTreeSet<String> = BTreeSet::new();
    for question in questions {
        let Some(id) = canonical_id(question) else {
            continue;
        };
        if !seen.insert(id.clone()) && reported.insert(id.clone()) {
            out.push(Diagnostic::error(
                "question.duplicate_id",
                format!("{section_path}.questions"),
                format!("duplicate question id: \"{id}\""),
            ));
        }
    }
}

/// Ids are compared after collapsing numeric text, so `1` and `"1"`
/// collide.
fn canonical_id(question: &Question) -> Option<String> {
    match question.id.as_ref()? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

fn check_scalar_id(value: Option<&Value>, field: &str, path: &str, out: &mut Vec<Diagnostic>) {
    match value {
        None => {
            out.push(Diagnostic::error(
                "question.missing_field",
                path,
                format!("question is missing {field}"),
            ));
        }
        Some(Value::Number(_)) => {}
        Some(v @ Value::String(_)) if shapes::is_numeric_text(v) => {
            out.push(Diagnostic::warning(
                "question.numeric_as_text",
                format!("{path}.{field}"),
                format!("{field} should be numeric, got {}", shapes::kind_name(v)),
            ));
        }
        Some(Value::String(_)) if field == "id" => {
            // Free-form string ids are tolerated; only numeric text is
            // flagged as drift.
        }
        Some(v) => {
            out.push(Diagnostic::error(
                "question.field_kind",
                format!("{path}.{field}"),
                format!("{field} must be numeric, got {}", shapes::kind_name(v)),
            ));
        }
    }
}

fn check_question(question: &Question, path: &str, out: &mut Vec<Diagnostic>) {
    check_scalar_id(question.id.as_ref(), "id", path, out);
    check_scalar_id(question.index.as_ref(), "index", path, out);

    if question
        .question
        .as_deref()
        .map_or(true, |text| text.trim().is_empty())
    {
        out.push(Diagnostic::warning(
            "question.empty_text",
            path,
            "question text is empty",
        ));
    }

    let question_type = match question.question_type.as_deref() {
        Some(name) => match QuestionType::parse(name) {
            Some(question_type) => {
                if question.legacy_type.is_some() {
                    out.push(Diagnostic::warning(
                        "question.legacy_type_field",
                        path,
                        "legacy field \"type\" is ignored; questionType takes precedence",
                    ));
                }
                Some(question_type)
            }
            None => {
                out.push(Diagnostic::error(
                    "question.unknown_type",
                    path,
                    format!(
                        "invalid questionType: \"{name}\" (valid: {})",
                        valid_question_type_names()
                    ),
                ));
                None
            }
        },
        None if question.legacy_type.is_some() => {
            out.push(Diagnostic::error(
                "question.legacy_type_field",
                path,
                "question uses legacy field \"type\"; use \"questionType\"",
            ));
            None
        }
        None => {
            out.push(Diagnostic::error(
                "question.missing_type",
                path,
                "question is missing questionType",
            ));
            None
        }
    };

    let Some(question_type) = question_type else {
        return;
    };
    let data = question.data.as_ref();
    match question_type {
        QuestionType::Nps => check_nps_data(data, path, out),
        QuestionType::OpenEnded => check_open_ended_data(data, path, out),
        QuestionType::MultipleChoice | QuestionType::SingleChoice => {
            check_choice_data(question_type, data, path, out)
        }
    }
}

fn check_nps_data(data: Option<&Value>, path: &str, out: &mut Vec<Diagnostic>) {
    match data.and_then(|d| d.get("npsStackedChart")) {
        None => {
            out.push(Diagnostic::error(
                "question.missing_data",
                format!("{path}.data"),
                "nps question requires data.npsStackedChart",
            ));
        }
        Some(value) => {
            let base = format!("{path}.data.npsStackedChart");
            match value.as_array() {
                None => {
                    out.push(Diagnostic::error(
                        "question.data_kind",
                        &base,
                        format!(
                            "data.npsStackedChart must be a sequence, got {}",
                            shapes::kind_name(value)
                        ),
                    ));
                }
                Some(items) => {
                    shapes::check_bar_items(items, &base, out);
                    shapes::check_nps_category_coverage(items, &base, out);
                }
            }
        }
    }

    match data.and_then(|d| d.get("npsScore")) {
        None => {
            out.push(Diagnostic::error(
                "question.missing_data",
                format!("{path}.data"),
                "nps question requires data.npsScore",
            ));
        }
        Some(value) if value.is_number() => {}
        Some(value) if shapes::is_numeric_text(value) => {
            out.push(Diagnostic::warning(
                "question.numeric_as_text",
                format!("{path}.data.npsScore"),
                format!("npsScore should be numeric, got {}", shapes::kind_name(value)),
            ));
        }
        Some(value) => {
            out.push(Diagnostic::error(
                "question.data_kind",
                format!("{path}.data.npsScore"),
                format!("npsScore must be numeric, got {}", shapes::kind_name(value)),
            ));
        }
    }
}

fn check_open_ended_data(data: Option<&Value>, path: &str, out: &mut Vec<Diagnostic>) {
    let sentiment = data.and_then(|d| d.get("sentimentChart"));
    let word_cloud = data.and_then(|d| d.get("wordCloud"));
    let top_categories = data.and_then(|d| d.get("topCategories"));

    if sentiment.is_none() && word_cloud.is_none() && top_categories.is_none() {
        out.push(Diagnostic::error(
            "question.missing_data",
            format!("{path}.data"),
            "open-ended question requires at least one of data.sentimentChart, data.wordCloud, data.topCategories",
        ));
    }

    if let Some(value) = sentiment {
        let base = format!("{path}.data.sentimentChart");
        match value.as_array() {
            Some(items) => shapes::check_sentiment_items(items, &base, out),
            None => out.push(Diagnostic::error(
                "question.data_kind",
                &base,
                format!(
                    "data.sentimentChart must be a sequence, got {}",
                    shapes::kind_name(value)
                ),
            )),
        }
    }
    if let Some(value) = word_cloud {
        let base = format!("{path}.data.wordCloud");
        match shapes::as_item_sequence(value) {
            Some(items) => shapes::check_word_cloud_items(items, &base, out),
            None => out.push(Diagnostic::error(
                "question.data_kind",
                &base,
                format!(
                    "data.wordCloud must be a sequence, got {}",
                    shapes::kind_name(value)
                ),
            )),
        }
    }
    if let Some(value) = top_categories {
        let base = format!("{path}.data.topCategories");
        match shapes::as_item_sequence(value) {
            Some(items) => shapes::check_category_items(items, &base, out),
            None => out.push(Diagnostic::error(
                "question.data_kind",
                &base,
                format!(
                    "data.topCategories must be a sequence, got {}",
                    shapes::kind_name(value)
                ),
            )),
        }
    }

    for key in ["sentimentCategories", "topicsByCategory"] {
        if let Some(items) = data.and_then(|d| d.get(key)).and_then(Value::as_array) {
            if items.is_empty() {
                out.push(Diagnostic::warning(
                    "question.empty_array",
                    format!("{path}.data.{key}"),
                    format!("data.{key} is empty"),
                ));
            }
        }
    }
}

fn check_choice_data(
    question_type: QuestionType,
    data: Option<&Value>,
    path: &str,
    out: &mut Vec<Diagnostic>,
) {
    match data.and_then(|d| d.get("barChart")) {
        None => {
            out.push(Diagnostic::error(
                "question.missing_data",
                format!("{path}.data"),
                format!(
                    "{} question requires data.barChart as a sequence",
                    question_type.as_str()
                ),
            ));
        }
        Some(value) => {
            let base = format!("{path}.data.barChart");
            match value.as_array() {
                Some(items) => shapes::check_bar_items(items, &base, out),
                None => out.push(Diagnostic::error(
                    "question.data_kind",
                    &base,
                    format!(
                        "data.barChart must be a sequence, got {}",
                        shapes::kind_name(value)
                    ),
                )),
            }
        }
    }
}
