//! Per-type checks over resolved component data.
//!
//! Every checker appends item-indexed diagnostics (`{base}[i]`,
//! `{base}[i].{field}`) and never short-circuits. Numeric fields follow a
//! two-tier policy: `value`/`percentage`/score fields tolerate numeric
//! text with a warning, every other numeric field must be a real number.

use serde_json::Value;

use crate::catalog::{ComponentType, NPS_CATEGORIES};
use crate::diagnostics::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericRule {
    /// Any non-number kind is an error.
    Strict,
    /// Numeric text is a warning; other non-numbers are errors.
    Lenient,
}

pub fn is_numeric_text(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| s.trim().parse::<f64>().is_ok())
}

pub(crate) fn kind_name(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(s) => format!("string \"{s}\""),
        Value::Array(_) => "sequence".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

fn missing_field(field: &str, item_path: &str, out: &mut Vec<Diagnostic>) {
    out.push(Diagnostic::error(
        "shape.missing_field",
        item_path,
        format!("missing required field: {field}"),
    ));
}

fn check_numeric(
    item: &Value,
    field: &str,
    rule: NumericRule,
    required: bool,
    item_path: &str,
    out: &mut Vec<Diagnostic>,
) {
    let Some(value) = item.get(field) else {
        if required {
            missing_field(field, item_path, out);
        }
        return;
    };
    if value.is_number() {
        return;
    }
    if rule == NumericRule::Lenient && is_numeric_text(value) {
        out.push(Diagnostic::warning(
            "shape.numeric_as_text",
            format!("{item_path}.{field}"),
            format!("{field} should be numeric, got {}", kind_name(value)),
        ));
    } else {
        out.push(Diagnostic::error(
            "shape.field_kind",
            format!("{item_path}.{field}"),
            format!("{field} must be numeric, got {}", kind_name(value)),
        ));
    }
}

fn check_present(item: &Value, field: &str, item_path: &str, out: &mut Vec<Diagnostic>) {
    if item.get(field).is_none() {
        missing_field(field, item_path, out);
    }
}

/// Unwraps sequence-or-items data: either a bare sequence or a keyed
/// wrapper carrying the sequence under `items`.
pub fn as_item_sequence(value: &Value) -> Option<&[Value]> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get("items").and_then(Value::as_array).map(Vec::as_slice),
        _ => None,
    }
}

/// Key under which chart/table rows carry their segment label. Overridable
/// per component via `config.yAxisDataKey`, then `config.segmentKey`.
pub fn segment_key(config: Option<&Value>) -> String {
    for key in ["yAxisDataKey", "segmentKey"] {
        if let Some(name) = config.and_then(|c| c.get(key)).and_then(Value::as_str) {
            return name.to_string();
        }
    }
    "segment".to_string()
}

fn item_label<'a>(item: &'a Value) -> Option<&'a str> {
    item.get("option")
        .or_else(|| item.get("label"))
        .and_then(Value::as_str)
}

/// Bar-family item check: a label field, a lenient-numeric `value`, an
/// optional lenient-numeric `percentage`, and the pairing rule that a lone
/// `value` or lone `percentage` is advisory.
fn check_labeled_value_items(
    items: &[Value],
    base: &str,
    label_field: &str,
    accept_label_alias: bool,
    out: &mut Vec<Diagnostic>,
) {
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{base}[{i}]");
        if item.get(label_field).is_none() {
            if accept_label_alias && item.get("label").is_some() {
                out.push(Diagnostic::warning(
                    "shape.legacy_field",
                    format!("{item_path}.label"),
                    format!("item uses legacy field \"label\"; canonical field is \"{label_field}\""),
                ));
            } else {
                missing_field(label_field, &item_path, out);
            }
        }
        let has_value = item.get("value").is_some();
        let has_percentage = item.get("percentage").is_some();
        if !has_value && !has_percentage {
            missing_field("value", &item_path, out);
        }
        check_numeric(item, "value", NumericRule::Lenient, false, &item_path, out);
        check_numeric(
            item,
            "percentage",
            NumericRule::Lenient,
            false,
            &item_path,
            out,
        );
        if has_value != has_percentage {
            let message = if has_value {
                "item has value without percentage"
            } else {
                "item has percentage without value"
            };
            out.push(Diagnostic::warning(
                "shape.value_percentage_pair",
                &item_path,
                message,
            ));
        }
    }
}

pub fn check_bar_items(items: &[Value], base: &str, out: &mut Vec<Diagnostic>) {
    check_labeled_value_items(items, base, "option", true, out);
}

pub fn check_sentiment_items(items: &[Value], base: &str, out: &mut Vec<Diagnostic>) {
    check_labeled_value_items(items, base, "sentiment", false, out);
}

/// One aggregated error when a resolved NPS distribution does not cover
/// every canonical category. `path` is where the error lands (the
/// component for component data, the data key for question data).
pub fn check_nps_category_coverage(items: &[Value], path: &str, out: &mut Vec<Diagnostic>) {
    let missing: Vec<&str> = NPS_CATEGORIES
        .iter()
        .filter(|category| {
            !items
                .iter()
                .filter_map(item_label)
                .any(|label| category.matches(label))
        })
        .map(|category| category.label())
        .collect();
    if !missing.is_empty() {
        out.push(Diagnostic::error(
            "shape.nps_categories",
            path,
            format!("npsStackedChart data is missing categories: {}", missing.join(", ")),
        ));
    }
}

pub fn check_distribution_items(
    items: &[Value],
    config: Option<&Value>,
    base: &str,
    out: &mut Vec<Diagnostic>,
) {
    let segment = segment_key(config);
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{base}[{i}]");
        check_present(item, &segment, &item_path, out);
        check_numeric(item, "count", NumericRule::Strict, true, &item_path, out);
        check_numeric(
            item,
            "percentage",
            NumericRule::Lenient,
            false,
            &item_path,
            out,
        );
    }
}

pub fn check_segmentation_items(
    items: &[Value],
    config: Option<&Value>,
    base: &str,
    out: &mut Vec<Diagnostic>,
) {
    let segment = segment_key(config);
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{base}[{i}]");
        check_present(item, &segment, &item_path, out);
        check_numeric(item, "value", NumericRule::Lenient, true, &item_path, out);
        check_numeric(
            item,
            "percentage",
            NumericRule::Lenient,
            false,
            &item_path,
            out,
        );
    }
}

pub fn check_sentiment_divergent_items(items: &[Value], base: &str, out: &mut Vec<Diagnostic>) {
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{base}[{i}]");
        check_present(item, "option", &item_path, out);
        check_numeric(item, "positive", NumericRule::Strict, true, &item_path, out);
        check_numeric(item, "negative", NumericRule::Strict, true, &item_path, out);
    }
}

pub fn check_sentiment_three_color_items(items: &[Value], base: &str, out: &mut Vec<Diagnostic>) {
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{base}[{i}]");
        check_present(item, "option", &item_path, out);
        check_numeric(item, "positive", NumericRule::Strict, true, &item_path, out);
        check_numeric(item, "neutral", NumericRule::Strict, true, &item_path, out);
        check_numeric(item, "negative", NumericRule::Strict, true, &item_path, out);
    }
}

pub fn check_sentiment_impact_items(items: &[Value], base: &str, out: &mut Vec<Diagnostic>) {
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{base}[{i}]");
        check_present(item, "option", &item_path, out);
        check_numeric(item, "impact", NumericRule::Strict, true, &item_path, out);
        check_numeric(item, "mentions", NumericRule::Strict, true, &item_path, out);
    }
}

pub fn check_category_items(items: &[Value], base: &str, out: &mut Vec<Diagnostic>) {
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{base}[{i}]");
        check_present(item, "category", &item_path, out);
        check_numeric(item, "count", NumericRule::Strict, true, &item_path, out);
        check_numeric(
            item,
            "percentage",
            NumericRule::Lenient,
            false,
            &item_path,
            out,
        );
    }
}

pub fn check_word_cloud_items(items: &[Value], base: &str, out: &mut Vec<Diagnostic>) {
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{base}[{i}]");
        check_present(item, "text", &item_path, out);
        check_numeric(item, "value", NumericRule::Lenient, true, &item_path, out);
    }
}

pub fn check_analytical_items(
    items: &[Value],
    config: Option<&Value>,
    base: &str,
    out: &mut Vec<Diagnostic>,
) {
    let columns: Vec<&str> = config
        .and_then(|c| c.get("columns"))
        .and_then(Value::as_array)
        .map(|cols| {
            cols.iter()
                .filter_map(|col| col.get("dataKey").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    if columns.is_empty() {
        return;
    }
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{base}[{i}]");
        for column in &columns {
            check_present(item, column, &item_path, out);
        }
    }
}

/// `config.series` must be a non-empty list of `{dataKey, name}` entries.
/// A violation fails the whole component; on success the series keys are
/// returned for the per-item check.
pub fn check_mece_series(
    config: Option<&Value>,
    component_path: &str,
    out: &mut Vec<Diagnostic>,
) -> Option<Vec<String>> {
    let series = config.and_then(|c| c.get("series")).and_then(Value::as_array);
    let entries = match series {
        Some(entries) if !entries.is_empty() => entries,
        _ => {
            out.push(Diagnostic::error(
                "shape.series_config",
                component_path,
                "stackedBarMECE requires config.series with at least one {dataKey, name} entry",
            ));
            return None;
        }
    };
    let mut keys = Vec::with_capacity(entries.len());
    for entry in entries {
        let data_key = entry.get("dataKey").and_then(Value::as_str);
        let name = entry.get("name").and_then(Value::as_str);
        match (data_key, name) {
            (Some(data_key), Some(_)) => keys.push(data_key.to_string()),
            _ => {
                out.push(Diagnostic::error(
                    "shape.series_config",
                    component_path,
                    "stackedBarMECE requires config.series with at least one {dataKey, name} entry",
                ));
                return None;
            }
        }
    }
    Some(keys)
}

pub fn check_mece_items(
    items: &[Value],
    series_keys: &[String],
    config: Option<&Value>,
    base: &str,
    out: &mut Vec<Diagnostic>,
) {
    let segment = segment_key(config);
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{base}[{i}]");
        check_present(item, &segment, &item_path, out);
        for key in series_keys {
            check_numeric(item, key, NumericRule::Strict, true, &item_path, out);
        }
    }
}

pub fn check_score_card(value: &Value, base: &str, out: &mut Vec<Diagnostic>) {
    check_numeric(value, "value", NumericRule::Lenient, true, base, out);
}

pub fn check_kpi_card(value: &Value, base: &str, out: &mut Vec<Diagnostic>) {
    check_present(value, "label", base, out);
    check_numeric(value, "value", NumericRule::Lenient, true, base, out);
}

pub fn check_recommendation_items(items: &[Value], base: &str, out: &mut Vec<Diagnostic>) {
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{base}[{i}]");
        match item {
            Value::String(_) => {}
            Value::Object(_) => check_present(item, "text", &item_path, out),
            other => out.push(Diagnostic::error(
                "shape.field_kind",
                &item_path,
                format!("item must be a string or an object with text, got {}", kind_name(other)),
            )),
        }
    }
}

/// Dispatch for sequence-shaped component data. `component_path` names the
/// component itself; item diagnostics land under `{component_path}.data`.
pub fn check_sequence_items(
    kind: ComponentType,
    items: &[Value],
    config: Option<&Value>,
    component_path: &str,
    out: &mut Vec<Diagnostic>,
) {
    let base = format!("{component_path}.data");
    match kind {
        ComponentType::BarChart => check_bar_items(items, &base, out),
        ComponentType::NpsStackedChart => {
            check_bar_items(items, &base, out);
            check_nps_category_coverage(items, component_path, out);
        }
        ComponentType::StackedBarMece => {
            if let Some(keys) = check_mece_series(config, component_path, out) {
                check_mece_items(items, &keys, config, &base, out);
            }
        }
        ComponentType::SentimentChart => check_sentiment_items(items, &base, out),
        ComponentType::SentimentDivergentChart => {
            check_sentiment_divergent_items(items, &base, out)
        }
        ComponentType::SentimentThreeColorChart => {
            check_sentiment_three_color_items(items, &base, out)
        }
        ComponentType::SegmentationChart => check_segmentation_items(items, config, &base, out),
        ComponentType::WordCloud => check_word_cloud_items(items, &base, out),
        ComponentType::DistributionTable => check_distribution_items(items, config, &base, out),
        ComponentType::SentimentImpactTable => check_sentiment_impact_items(items, &base, out),
        ComponentType::PositiveCategoriesTable | ComponentType::NegativeCategoriesTable => {
            check_category_items(items, &base, out)
        }
        ComponentType::TopCategoriesTable => check_category_items(items, &base, out),
        ComponentType::AnalyticalTable => check_analytical_items(items, config, &base, out),
        ComponentType::RecommendationsCard => check_recommendation_items(items, &base, out),
        ComponentType::NpsScoreCard
        | ComponentType::KpiCard
        | ComponentType::Container
        | ComponentType::TextBlock => {}
    }
}

/// Dispatch for keyed component data.
pub fn check_keyed_value(
    kind: ComponentType,
    value: &Value,
    component_path: &str,
    out: &mut Vec<Diagnostic>,
) {
    let base = format!("{component_path}.data");
    match kind {
        ComponentType::NpsScoreCard => check_score_card(value, &base, out),
        ComponentType::KpiCard => check_kpi_card(value, &base, out),
        _ => {}
    }
}
