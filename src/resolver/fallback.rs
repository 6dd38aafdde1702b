use super::text::{alphanumeric, separator_variants};
use crate::dom::{Document, Element, NodeId};

/// Attributes page builders use to tag an element with a logical field name.
const FIELD_ATTRIBUTES: [&str; 4] = ["data-name", "data-field", "data-field-name", "data-field-id"];

/// A whole-document scan tried after every candidate strategy has failed.
///
/// Fallbacks see the live document rather than a pre-filtered candidate list,
/// because published markup drifts away from what was authored.
pub trait DomFallback: Send + Sync {
    fn name(&self) -> &'static str;
    fn locate(&self, identifier: &str, doc: &Document) -> Option<NodeId>;
}

/// Inputs, selects, textareas and submit buttons, in document order.
fn scannable(doc: &Document) -> Vec<NodeId> {
    doc.all()
        .into_iter()
        .filter(|n| {
            doc.get(*n)
                .is_some_and(|e| e.is_control() || e.is_submit_button())
        })
        .collect()
}

fn first_matching<F>(doc: &Document, nodes: Vec<NodeId>, pred: F) -> Option<NodeId>
where
    F: Fn(&Element) -> bool,
{
    nodes
        .into_iter()
        .find(|n| doc.get(*n).is_some_and(|e| pred(e)))
}

/// A `data-name`-style attribute equals the identifier, ignoring case.
pub struct AttributeEquivalent;

impl DomFallback for AttributeEquivalent {
    fn name(&self) -> &'static str {
        "attribute-equivalent"
    }
    fn locate(&self, identifier: &str, doc: &Document) -> Option<NodeId> {
        let wanted = identifier.trim();
        first_matching(doc, scannable(doc), |e| {
            FIELD_ATTRIBUTES
                .iter()
                .filter_map(|a| e.attr(a))
                .any(|v| v.trim().eq_ignore_ascii_case(wanted))
        })
    }
}

/// The identifier with hyphens, spaces and underscores swapped.
pub struct SeparatorVariants;

impl DomFallback for SeparatorVariants {
    fn name(&self) -> &'static str {
        "separator-variants"
    }
    fn locate(&self, identifier: &str, doc: &Document) -> Option<NodeId> {
        let variants = separator_variants(identifier.trim());
        if variants.is_empty() {
            return None;
        }
        first_matching(doc, scannable(doc), |e| {
            ["id", "name", "data-name"]
                .iter()
                .filter_map(|a| e.attr(a))
                .any(|v| variants.iter().any(|variant| variant == v))
        })
    }
}

/// Letters and digits only, case-insensitive, across every control and submit button.
pub struct AlphanumericScan;

impl DomFallback for AlphanumericScan {
    fn name(&self) -> &'static str {
        "alphanumeric-scan"
    }
    fn locate(&self, identifier: &str, doc: &Document) -> Option<NodeId> {
        let wanted = alphanumeric(identifier);
        if wanted.is_empty() {
            return None;
        }
        first_matching(doc, scannable(doc), |e| {
            let button_label = e.is_submit_button().then(|| e.text.as_str());
            ["id", "name", "data-name"]
                .iter()
                .filter_map(|a| e.attr(a))
                .chain(button_label)
                .any(|v| alphanumeric(v) == wanted)
        })
    }
}

/// A small container tagged with the identifier; returns its first nested control.
pub struct WrapperContainer {
    pub max_controls: usize,
}

impl DomFallback for WrapperContainer {
    fn name(&self) -> &'static str {
        "wrapper-container"
    }
    fn locate(&self, identifier: &str, doc: &Document) -> Option<NodeId> {
        let wanted = identifier.trim();
        if wanted.is_empty() {
            return None;
        }
        doc.all()
            .into_iter()
            .filter(|n| {
                doc.get(*n).is_some_and(|e| {
                    !e.is_control()
                        && !e.is_form()
                        && std::iter::once("id")
                            .chain(FIELD_ATTRIBUTES)
                            .filter_map(|a| e.attr(a))
                            .any(|v| v.trim().eq_ignore_ascii_case(wanted))
                })
            })
            .find_map(|wrapper| {
                let controls = doc.controls_within(wrapper);
                (!controls.is_empty() && controls.len() <= self.max_controls)
                    .then(|| controls[0])
            })
    }
}
