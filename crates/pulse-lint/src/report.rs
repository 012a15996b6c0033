//! Report document model.
//!
//! Parsing is deliberately lenient: the JSON Schema pre-pass owns
//! grammar-level rejection, so below the document root every field is
//! optional and a wrong-kind field reads as absent. The only hard parse
//! failures are non-JSON bytes and a non-object root. Question and
//! section ids/indexes stay raw [`Value`]s so the validators can tell a
//! number from numeric text.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportParseError {
    pub message: String,
    pub ptr: String,
}

impl std::fmt::Display for ReportParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ptr.is_empty() {
            write!(f, "{} at document root", self.message)
        } else {
            write!(f, "{} at {}", self.message, self.ptr)
        }
    }
}

impl std::error::Error for ReportParseError {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDoc {
    pub sections: Vec<Section>,
    pub ui_texts: Option<Value>,
    pub survey_info: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub id: Option<String>,
    pub index: Option<Value>,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub data: Option<Value>,
    pub subsections: Vec<Subsection>,
    pub components: Vec<Component>,
    /// `Some` when the section declares `questions`, even when empty.
    pub questions: Option<Vec<Question>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subsection {
    pub id: Option<String>,
    pub index: Option<Value>,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub data: Option<Value>,
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    /// The `type` tag. Kept as a raw string; the catalog decides validity.
    pub kind: Option<String>,
    pub data_path: Option<String>,
    pub config: Option<Value>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Question {
    pub id: Option<Value>,
    pub index: Option<Value>,
    pub question: Option<String>,
    pub question_type: Option<String>,
    /// Legacy `type` field, superseded by `questionType`.
    pub legacy_type: Option<String>,
    pub data: Option<Value>,
}

pub fn parse_report_json(bytes: &[u8]) -> Result<ReportDoc, ReportParseError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|err| ReportParseError {
        message: format!("invalid JSON: {err}"),
        ptr: String::new(),
    })?;
    parse_report_value(&value)
}

pub fn parse_report_value(value: &Value) -> Result<ReportDoc, ReportParseError> {
    let map = value.as_object().ok_or_else(|| ReportParseError {
        message: "report document must be a JSON object".to_string(),
        ptr: String::new(),
    })?;
    Ok(ReportDoc {
        sections: map
            .get("sections")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(parse_section).collect())
            .unwrap_or_default(),
        ui_texts: map.get("uiTexts").cloned(),
        survey_info: map.get("surveyInfo").cloned(),
    })
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn component_seq(value: &Value, key: &str) -> Vec<Component> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(parse_component).collect())
        .unwrap_or_default()
}

fn parse_section(value: &Value) -> Section {
    Section {
        id: str_field(value, "id"),
        index: value.get("index").cloned(),
        name: str_field(value, "name"),
        icon: str_field(value, "icon"),
        data: value.get("data").cloned(),
        subsections: value
            .get("subsections")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(parse_subsection).collect())
            .unwrap_or_default(),
        components: component_seq(value, "components"),
        questions: value
            .get("questions")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(parse_question).collect()),
    }
}

fn parse_subsection(value: &Value) -> Subsection {
    Subsection {
        id: str_field(value, "id"),
        index: value.get("index").cloned(),
        name: str_field(value, "name"),
        icon: str_field(value, "icon"),
        data: value.get("data").cloned(),
        components: component_seq(value, "components"),
    }
}

fn parse_component(value: &Value) -> Component {
    Component {
        kind: str_field(value, "type"),
        data_path: str_field(value, "dataPath"),
        config: value.get("config").cloned(),
        title: str_field(value, "title"),
        text: str_field(value, "text"),
        components: component_seq(value, "components"),
    }
}

fn parse_question(value: &Value) -> Question {
    Question {
        id: value.get("id").cloned(),
        index: value.get("index").cloned(),
        question: str_field(value, "question"),
        question_type: str_field(value, "questionType"),
        legacy_type: str_field(value, "type"),
        data: value.get("data").cloned(),
    }
}
