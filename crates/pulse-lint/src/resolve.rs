use serde_json::Value;

/// Section ids that may carry `questions`. Pointer resolution and the
/// orchestrator both key off this set.
pub const QUESTION_SECTION_IDS: &[&str] = &["questions", "survey-questions"];

/// Section id with per-attribute dynamic context.
pub const ATTRIBUTES_SECTION_ID: &str = "attributes";

pub fn is_question_section(id: &str) -> bool {
    QUESTION_SECTION_IDS.contains(&id)
}

/// Outcome of resolving a data pointer. `Dynamic` means the pointer is
/// only bound at render time (per-question or per-attribute context) and
/// cannot be checked statically; it is distinct from `NotFound`, which is
/// a hard miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Found(&'a Value),
    NotFound,
    Dynamic,
}

impl<'a> Resolution<'a> {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

/// Per-section resolution context supplied by the orchestrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveCtx<'a> {
    pub section_id: Option<&'a str>,
    pub section_data: Option<&'a Value>,
}

/// Normalizes bracket indices to dotted segments: `a[0].b` becomes `a.0.b`.
pub fn normalize_pointer(pointer: &str) -> String {
    let mut out = String::with_capacity(pointer.len());
    for ch in pointer.chars() {
        match ch {
            '[' => out.push('.'),
            ']' => {}
            _ => out.push(ch),
        }
    }
    out
}

fn walk<'a>(start: &'a Value, pointer: &str) -> Option<&'a Value> {
    let normalized = normalize_pointer(pointer);
    let mut cur = start;
    for seg in normalized.split('.') {
        if seg.is_empty() {
            return None;
        }
        match cur {
            Value::Object(map) => cur = map.get(seg)?,
            Value::Array(items) => {
                let idx: usize = seg.parse().ok()?;
                cur = items.get(idx)?;
            }
            _ => return None,
        }
    }
    Some(cur)
}

/// Resolves `pointer` against `root` under the section context. Rules are
/// checked in order:
///
/// 1. `question.` inside a questions-bearing section is render-time data.
/// 2. `currentAttribute.` inside the attributes section resolves against a
///    representative element of `sectionData.attributes`; with no
///    attributes collected the pointer is render-time data.
/// 3. `sectionData.` resolves against the merged section context first and
///    only falls back to the document's own `sectionData` subtree.
/// 4. Anything else is a plain walk from `root`.
pub fn resolve<'a>(root: &'a Value, pointer: &str, ctx: &ResolveCtx<'a>) -> Resolution<'a> {
    let pointer = pointer.trim();
    if pointer.is_empty() {
        return Resolution::NotFound;
    }

    if pointer.starts_with("question.") && ctx.section_id.is_some_and(is_question_section) {
        return Resolution::Dynamic;
    }

    if let Some(rest) = pointer.strip_prefix("currentAttribute.") {
        if ctx.section_id == Some(ATTRIBUTES_SECTION_ID) {
            let representative = ctx
                .section_data
                .and_then(|d| d.get("attributes"))
                .and_then(Value::as_array)
                .and_then(|a| a.first());
            return match representative {
                Some(attribute) => match walk(attribute, rest) {
                    Some(value) => Resolution::Found(value),
                    None => Resolution::NotFound,
                },
                None => Resolution::Dynamic,
            };
        }
    }

    if let Some(rest) = pointer.strip_prefix("sectionData.") {
        if let Some(section_data) = ctx.section_data {
            if let Some(value) = walk(section_data, rest) {
                return Resolution::Found(value);
            }
        }
        return match walk(root, pointer) {
            Some(value) => Resolution::Found(value),
            None => Resolution::NotFound,
        };
    }

    match walk(root, pointer) {
        Some(value) => Resolution::Found(value),
        None => Resolution::NotFound,
    }
}
