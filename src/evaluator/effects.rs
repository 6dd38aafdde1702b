use crate::dom::{Document, NodeId};
use crate::error::DocumentError;
use crate::rule::ActionType;

/// Ancestor tags treated as layout wrappers around a field.
const WRAPPER_TAGS: [&str; 2] = ["div", "label"];

/// Wrapper ancestors of `node`, nearest first, at most `depth` levels up and
/// never past the enclosing form.
fn wrapper_ancestors(doc: &Document, node: NodeId, depth: usize) -> Vec<NodeId> {
    doc.ancestors(node)
        .take(depth)
        .take_while(|a| doc.get(*a).is_some_and(|e| !e.is_form()))
        .filter(|a| {
            doc.get(*a)
                .is_some_and(|e| WRAPPER_TAGS.contains(&e.tag.as_str()))
        })
        .collect()
}

/// Reveals the element and its wrappers.
pub fn show(doc: &mut Document, node: NodeId, depth: usize) -> Result<(), DocumentError> {
    doc.reveal(node)?;
    for wrapper in wrapper_ancestors(doc, node, depth) {
        doc.reveal(wrapper)?;
    }
    Ok(())
}

/// Conceals the element, and each wrapper that serves no other visible control.
///
/// Climbing stops at the first wrapper that still holds another visible
/// control, since every wrapper above it holds that control too.
pub fn hide(doc: &mut Document, node: NodeId, depth: usize) -> Result<(), DocumentError> {
    let wrappers = wrapper_ancestors(doc, node, depth);
    doc.hide(node)?;
    for wrapper in wrappers {
        let others_visible = doc
            .controls_within(wrapper)
            .into_iter()
            .filter(|c| *c != node)
            .any(|c| doc.is_rendered(c));
        if others_visible {
            break;
        }
        doc.hide(wrapper)?;
    }
    Ok(())
}

/// Applies one effect to a resolved target. `Unknown` is a no-op.
pub fn apply(
    doc: &mut Document,
    node: NodeId,
    effect: &ActionType,
    depth: usize,
) -> Result<(), DocumentError> {
    match effect {
        ActionType::Show => show(doc, node, depth),
        ActionType::Hide => hide(doc, node, depth),
        ActionType::Toggle => {
            if doc.is_rendered(node) {
                hide(doc, node, depth)
            } else {
                show(doc, node, depth)
            }
        }
        ActionType::Enable => doc.set_disabled(node, false),
        ActionType::Disable => doc.set_disabled(node, true),
        ActionType::Focus => doc.focus(node),
        ActionType::ScrollTo => doc.scroll_into_view(node),
        ActionType::Unknown(_) => Ok(()),
    }
}
