//! Recursive validation of a component tree against the catalog.

use serde_json::Value;

use crate::catalog::{self, ComponentType, DataShape};
use crate::diagnostics::Diagnostic;
use crate::lint::LintOptions;
use crate::report::Component;
use crate::resolve::{normalize_pointer, resolve, Resolution, ResolveCtx};
use crate::shapes;
use crate::template;

/// Walks `component` and its children. `data` is the local data root the
/// component's `dataPath` is resolved against (subsection data when
/// subsections exist, section data otherwise); `path` addresses the
/// component in the document.
pub fn check_component_tree(
    component: &Component,
    data: Option<&Value>,
    ui_texts: Option<&Value>,
    ctx: &ResolveCtx<'_>,
    path: &str,
    depth: usize,
    options: &LintOptions,
    out: &mut Vec<Diagnostic>,
) {
    if depth >= options.max_component_depth {
        out.push(Diagnostic::error(
            "component.depth_exceeded",
            path,
            format!(
                "component nesting exceeds maximum depth ({})",
                options.max_component_depth
            ),
        ));
        return;
    }

    let local = data.unwrap_or(&Value::Null);

    match component.kind.as_deref() {
        None => {
            out.push(Diagnostic::error(
                "component.missing_type",
                path,
                "component is missing type",
            ));
        }
        Some(name) => match ComponentType::parse(name) {
            None => {
                out.push(Diagnostic::error(
                    "component.unknown_type",
                    path,
                    format!(
                        "unknown component type: \"{name}\" (valid types: {})",
                        catalog::valid_type_names()
                    ),
                ));
            }
            Some(kind) => {
                check_component_data(component, kind, local, ctx, path, out);
            }
        },
    }

    if let Some(title) = component.title.as_deref() {
        template::check_template(
            title,
            &format!("{path}.title"),
            local,
            ui_texts,
            ctx,
            out,
        );
    }
    if let Some(text) = component.text.as_deref() {
        template::check_template(text, &format!("{path}.text"), local, ui_texts, ctx, out);
    }

    for (i, child) in component.components.iter().enumerate() {
        check_component_tree(
            child,
            data,
            ui_texts,
            ctx,
            &format!("{path}.components[{i}]"),
            depth + 1,
            options,
            out,
        );
    }
}

fn check_component_data(
    component: &Component,
    kind: ComponentType,
    local: &Value,
    ctx: &ResolveCtx<'_>,
    path: &str,
    out: &mut Vec<Diagnostic>,
) {
    let entry = kind.entry();

    let Some(data_path) = component.data_path.as_deref() else {
        if entry.requires_data {
            out.push(Diagnostic::error(
                "component.missing_data_path",
                path,
                format!("{} requires dataPath", kind.as_str()),
            ));
        }
        return;
    };

    check_suffix_coherence(data_path, kind, path, out);

    match resolve(local, data_path, ctx) {
        Resolution::NotFound => {
            out.push(Diagnostic::error(
                "component.unresolved_data_path",
                format!("{path}.dataPath"),
                format!("dataPath \"{data_path}\" does not resolve to data"),
            ));
        }
        Resolution::Dynamic => {}
        Resolution::Found(value) => {
            check_resolved_shape(component, kind, value, path, out);
        }
    }
}

/// The final pointer segment doubles as a naming convention for what the
/// data feeds. Known suffixes must agree with the component type; unknown
/// ones are left alone.
fn check_suffix_coherence(
    data_path: &str,
    kind: ComponentType,
    path: &str,
    out: &mut Vec<Diagnostic>,
) {
    let normalized = normalize_pointer(data_path);
    let Some(suffix) = normalized.split('.').filter(|s| !s.is_empty()).last() else {
        return;
    };
    if suffix.chars().all(|c| c.is_ascii_digit()) {
        return;
    }
    let Some(expected) = catalog::expected_types_for_suffix(suffix) else {
        return;
    };
    if !expected.contains(&kind) {
        let names: Vec<&str> = expected.iter().map(|t| t.as_str()).collect();
        out.push(Diagnostic::error(
            "component.data_path_type",
            format!("{path}.dataPath"),
            format!(
                "dataPath \"{data_path}\" expects component type {}, got {}",
                names.join(" or "),
                kind.as_str()
            ),
        ));
    }
}

fn check_resolved_shape(
    component: &Component,
    kind: ComponentType,
    value: &Value,
    path: &str,
    out: &mut Vec<Diagnostic>,
) {
    let entry = kind.entry();
    let config = component.config.as_ref();
    match entry.shape {
        DataShape::None => {}
        DataShape::Sequence => match value.as_array() {
            Some(items) => check_items(kind, items, config, entry.allow_empty, path, out),
            None => {
                out.push(Diagnostic::error(
                    "component.data_shape",
                    path,
                    format!("{} data must be a sequence", kind.as_str()),
                ));
            }
        },
        DataShape::SequenceOrItems => match shapes::as_item_sequence(value) {
            Some(items) => check_items(kind, items, config, entry.allow_empty, path, out),
            None => {
                out.push(Diagnostic::error(
                    "component.data_shape",
                    path,
                    format!(
                        "{} data must be a sequence or an items wrapper",
                        kind.as_str()
                    ),
                ));
            }
        },
        DataShape::Keyed => {
            if value.is_object() {
                shapes::check_keyed_value(kind, value, path, out);
            } else {
                out.push(Diagnostic::error(
                    "component.data_shape",
                    path,
                    format!("{} data must be a keyed object", kind.as_str()),
                ));
            }
        }
    }
}

fn check_items(
    kind: ComponentType,
    items: &[Value],
    config: Option<&Value>,
    allow_empty: bool,
    path: &str,
    out: &mut Vec<Diagnostic>,
) {
    if items.is_empty() {
        if !allow_empty {
            out.push(Diagnostic::error(
                "component.empty_data",
                path,
                format!("{} data is an empty sequence", kind.as_str()),
            ));
        }
        return;
    }
    shapes::check_sequence_items(kind, items, config, path, out);
}
