use super::{Document, Element, NodeId};
use crate::error::DocumentError;
use itertools::Itertools;

/// Value a browser reports for a checkbox or radio that has no explicit `value`.
pub const CHECKBOX_PLACEHOLDER: &str = "on";

/// Value reported for a file input with at least one chosen file.
pub const FILE_SELECTED: &str = "file-selected";

/// The kind of control an element is, resolved once per element and dispatched by `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Checkbox,
    Radio,
    Select { multiple: bool },
    File,
    Numeric,
    Submit,
    Text,
    /// Not a form control at all (wrappers, labels, text).
    Other,
}

impl ControlKind {
    pub fn of(element: &Element) -> Self {
        match element.tag.as_str() {
            "select" => ControlKind::Select {
                multiple: element.has_attr("multiple"),
            },
            "textarea" => ControlKind::Text,
            "button" if element.is_submit_button() => ControlKind::Submit,
            "input" => match element.input_type().as_str() {
                "checkbox" => ControlKind::Checkbox,
                "radio" => ControlKind::Radio,
                "file" => ControlKind::File,
                "number" | "range" => ControlKind::Numeric,
                "submit" => ControlKind::Submit,
                _ => ControlKind::Text,
            },
            _ => ControlKind::Other,
        }
    }

    /// Name reported in SmartField `type`.
    pub fn type_name(&self) -> &'static str {
        match self {
            ControlKind::Checkbox => "checkbox",
            ControlKind::Radio => "radio",
            ControlKind::Select { multiple: false } => "select",
            ControlKind::Select { multiple: true } => "select-multiple",
            ControlKind::File => "file",
            ControlKind::Numeric => "number",
            ControlKind::Submit => "submit",
            ControlKind::Text => "text",
            ControlKind::Other => "other",
        }
    }
}

/// Reads the current value of a control the way a condition compares it.
pub fn extract_value(doc: &Document, node: NodeId) -> Result<String, DocumentError> {
    let element = doc.element(node)?;
    let value = match ControlKind::of(element) {
        ControlKind::Checkbox => {
            if !element.checked {
                "false".to_string()
            } else {
                match element.current_value() {
                    Some(v) if !v.is_empty() && v != CHECKBOX_PLACEHOLDER => v.to_string(),
                    _ => "true".to_string(),
                }
            }
        }
        ControlKind::Radio => radio_group_value(doc, node, element),
        ControlKind::Select { multiple } => {
            let options = select_options(doc, node);
            if multiple {
                options
                    .iter()
                    .filter(|(_, selected)| *selected)
                    .map(|(value, _)| value)
                    .join(",")
            } else {
                options
                    .iter()
                    .find(|(_, selected)| *selected)
                    .or(options.first())
                    .map(|(value, _)| value.clone())
                    .unwrap_or_default()
            }
        }
        ControlKind::File => {
            if element.files > 0 {
                FILE_SELECTED.to_string()
            } else {
                String::new()
            }
        }
        ControlKind::Numeric => element
            .current_value()
            .filter(|v| !v.is_empty())
            .unwrap_or("0")
            .to_string(),
        ControlKind::Submit | ControlKind::Text | ControlKind::Other => element
            .current_value()
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| Some(element.text.trim().to_string()).filter(|t| !t.is_empty()))
            .unwrap_or_default(),
    };
    Ok(value)
}

/// `(value, selected)` for every `<option>` under a select, in document order.
pub fn select_options(doc: &Document, select: NodeId) -> Vec<(String, bool)> {
    doc.descendants(select)
        .into_iter()
        .filter_map(|n| doc.get(n))
        .filter(|e| e.tag == "option")
        .map(|e| {
            let value = e
                .current_value()
                .map(str::to_string)
                .unwrap_or_else(|| e.text.trim().to_string());
            (value, e.selected)
        })
        .collect()
}

fn radio_group_value(doc: &Document, node: NodeId, element: &Element) -> String {
    let checked = match element.attr("name") {
        Some(name) => doc
            .radio_group(node, name)
            .into_iter()
            .filter_map(|n| doc.get(n))
            .find(|e| e.checked),
        None => Some(element).filter(|e| e.checked),
    };
    match checked {
        Some(radio) => match radio.current_value() {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => CHECKBOX_PLACEHOLDER.to_string(),
        },
        None => String::new(),
    }
}
