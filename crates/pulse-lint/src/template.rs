//! Inline `{{ pointer }}` markers in component `title`/`text` fields.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::diagnostics::Diagnostic;
use crate::resolve::{resolve, Resolution, ResolveCtx, ATTRIBUTES_SECTION_ID};

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("static marker pattern"))
}

fn unresolved(marker: &str, text: &str, field_path: &str, out: &mut Vec<Diagnostic>) {
    out.push(Diagnostic::error(
        "template.unresolved_marker",
        field_path,
        format!("unresolved template marker {marker} in \"{text}\""),
    ));
}

/// Checks every marker in `text`. `data` is the component's local data
/// root; `ui_texts` the document-level text catalog.
///
/// `uiTexts.` markers ignore section context entirely. `currentAttribute.`
/// markers inside the attributes section are satisfied when at least one
/// attribute record carries the property, unlike the resolver's
/// representative-element rule for data pointers; the two behaviors are
/// kept distinct on purpose.
pub fn check_template(
    text: &str,
    field_path: &str,
    data: &Value,
    ui_texts: Option<&Value>,
    ctx: &ResolveCtx<'_>,
    out: &mut Vec<Diagnostic>,
) {
    for captures in marker_re().captures_iter(text) {
        let marker = &captures[0];
        let pointer = captures[1].trim();
        if pointer.is_empty() {
            unresolved(marker, text, field_path, out);
            continue;
        }

        if let Some(rest) = pointer.strip_prefix("uiTexts.") {
            let hit = ui_texts
                .map(|root| resolve(root, rest, &ResolveCtx::default()))
                .is_some_and(|r| r.is_found());
            if !hit {
                unresolved(marker, text, field_path, out);
            }
            continue;
        }

        if let Some(rest) = pointer.strip_prefix("currentAttribute.") {
            if ctx.section_id == Some(ATTRIBUTES_SECTION_ID) {
                let attributes = ctx
                    .section_data
                    .and_then(|d| d.get("attributes"))
                    .and_then(Value::as_array);
                match attributes {
                    Some(records) if !records.is_empty() => {
                        let any = records.iter().any(|record| {
                            resolve(record, rest, &ResolveCtx::default()).is_found()
                        });
                        if !any {
                            unresolved(marker, text, field_path, out);
                        }
                    }
                    // No attribute records collected: render-time data.
                    _ => {}
                }
                continue;
            }
        }

        if resolve(data, pointer, ctx) == Resolution::NotFound {
            unresolved(marker, text, field_path, out);
        }
    }
}
