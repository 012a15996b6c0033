use serde_json::{json, Value};

use pulse_lint::diagnostics::{Level, Report};
use pulse_lint::lint::{lint_report, LintOptions};
use pulse_lint::report::parse_report_value;

fn lint(doc: &Value) -> Report {
    let parsed = parse_report_value(doc).expect("parse report");
    lint_report(&parsed, LintOptions::default())
}

#[test]
fn missing_ui_text_key_names_the_exact_marker() {
    let doc = json!({
        "sections": [{
            "id": "overview",
            "index": 0,
            "components": [{"type": "textBlock", "text": "Hello {{uiTexts.missing.key}}"}]
        }],
        "uiTexts": {"labels": {"total": "Total"}}
    });
    let report = lint(&doc);
    assert_eq!(report.diagnostics.len(), 1, "got: {:?}", report.diagnostics);
    let d = &report.diagnostics[0];
    assert_eq!(d.code, "template.unresolved_marker");
    assert_eq!(d.level, Level::Error);
    assert_eq!(d.path, "/sections[0].components[0].text");
    assert_eq!(
        d.message,
        "unresolved template marker {{uiTexts.missing.key}} in \"Hello {{uiTexts.missing.key}}\""
    );
}

#[test]
fn ui_text_markers_resolve_against_the_catalog_only() {
    // A matching uiTexts entry resolves regardless of section context or
    // section data.
    let doc = json!({
        "sections": [{
            "id": "attributes",
            "index": 0,
            "components": [{"type": "textBlock", "title": "{{uiTexts.labels.total}}"}]
        }],
        "uiTexts": {"labels": {"total": "Total"}}
    });
    let report = lint(&doc);
    assert!(report.ok, "unexpected: {:?}", report.diagnostics);
}

#[test]
fn title_and_text_are_both_scanned() {
    let doc = json!({
        "sections": [{
            "id": "overview",
            "index": 0,
            "data": {"a": 1},
            "components": [{"type": "textBlock", "title": "{{a}}", "text": "{{b}}"}]
        }]
    });
    let report = lint(&doc);
    assert_eq!(report.diagnostics.len(), 1, "got: {:?}", report.diagnostics);
    let d = &report.diagnostics[0];
    assert_eq!(d.path, "/sections[0].components[0].text");
    assert!(d.message.contains("{{b}}"));
}

#[test]
fn attribute_markers_are_satisfied_by_any_record() {
    let doc = json!({
        "sections": [{
            "id": "attributes",
            "index": 0,
            "subsections": [
                {
                    "id": "attributes-age",
                    "index": 0,
                    "data": {"name": "Age"},
                    "components": [{"type": "textBlock", "text": "{{currentAttribute.score}}"}]
                },
                {
                    "id": "attributes-sat",
                    "index": 1,
                    "data": {"score": 4},
                    "components": []
                }
            ]
        }]
    });
    // `score` only exists on the second attribute record; existence on any
    // record satisfies the marker.
    let report = lint(&doc);
    assert!(report.ok, "unexpected: {:?}", report.diagnostics);
}

#[test]
fn attribute_markers_missing_on_every_record_fail() {
    let doc = json!({
        "sections": [{
            "id": "attributes",
            "index": 0,
            "subsections": [
                {
                    "id": "attributes-age",
                    "index": 0,
                    "data": {"name": "Age"},
                    "components": [{"type": "textBlock", "text": "{{currentAttribute.missing}}"}]
                }
            ]
        }]
    });
    let report = lint(&doc);
    assert_eq!(report.diagnostics.len(), 1, "got: {:?}", report.diagnostics);
    let d = &report.diagnostics[0];
    assert_eq!(d.code, "template.unresolved_marker");
    assert_eq!(d.path, "/sections[0]/subsections[0].components[0].text");
    assert!(d.message.contains("{{currentAttribute.missing}}"));
}

#[test]
fn question_markers_are_dynamic_in_the_questions_section() {
    let doc = json!({
        "sections": [{
            "id": "questions",
            "index": 0,
            "components": [{"type": "textBlock", "title": "{{question.title}}"}],
            "questions": []
        }]
    });
    let report = lint(&doc);
    assert!(report.ok, "unexpected: {:?}", report.diagnostics);
}

#[test]
fn every_marker_is_checked_independently() {
    let doc = json!({
        "sections": [{
            "id": "overview",
            "index": 0,
            "data": {"a": 1},
            "components": [{"type": "textBlock", "text": "{{a}} and {{gone}} and {{alsoGone}}"}]
        }]
    });
    let report = lint(&doc);
    assert_eq!(report.diagnostics.len(), 2, "got: {:?}", report.diagnostics);
    assert!(report.diagnostics[0].message.contains("{{gone}}"));
    assert!(report.diagnostics[1].message.contains("{{alsoGone}}"));
}

#[test]
fn templates_in_nested_components_carry_the_full_path() {
    let doc = json!({
        "sections": [{
            "id": "overview",
            "index": 0,
            "components": [{
                "type": "container",
                "components": [{"type": "textBlock", "text": "{{nope}}"}]
            }]
        }]
    });
    let report = lint(&doc);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(
        report.diagnostics[0].path,
        "/sections[0].components[0].components[0].text"
    );
}
