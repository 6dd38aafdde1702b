use crate::error::DocumentError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classes the hosting platform uses to conceal elements.
pub const HIDDEN_CLASSES: [&str; 3] = ["hidden", "w-condition-invisible", "is-hidden"];

/// Tags that count as form controls.
const CONTROL_TAGS: [&str; 3] = ["input", "select", "textarea"];

/// Stable handle to an element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single element of the page, with the live state the engine reads and writes.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub attributes: AHashMap<String, String>,
    pub classes: Vec<String>,
    pub text: String,
    /// The control's current value. Falls back to the `value` attribute when unset.
    pub value: Option<String>,
    pub checked: bool,
    pub selected: bool,
    /// Number of files chosen in a file input.
    pub files: usize,
    /// Inline `display: none`.
    pub hidden: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_files(mut self, files: usize) -> Self {
        self.files = files;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// The `id` attribute, if present and non-empty.
    pub fn dom_id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    /// The lowercased `type` attribute, defaulting to `text` like a browser does.
    pub fn input_type(&self) -> String {
        self.attr("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "text".to_string())
    }

    /// The live value, falling back to the `value` attribute.
    pub fn current_value(&self) -> Option<&str> {
        self.value.as_deref().or_else(|| self.attr("value"))
    }

    pub fn is_control(&self) -> bool {
        CONTROL_TAGS.contains(&self.tag.as_str())
    }

    pub fn is_form(&self) -> bool {
        self.tag == "form"
    }

    /// Submit buttons, either `<button type=submit>` (the default button type) or `<input type=submit>`.
    pub fn is_submit_button(&self) -> bool {
        match self.tag.as_str() {
            "button" => self.attr("type").is_none_or(|t| t.eq_ignore_ascii_case("submit")),
            "input" => self.input_type() == "submit",
            _ => false,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.has_attr("disabled")
    }

    /// Whether this element itself carries hidden styling (ignores ancestors).
    pub fn is_self_hidden(&self) -> bool {
        self.hidden || HIDDEN_CLASSES.iter().any(|c| self.has_class(c))
    }
}

/// An in-memory page: an arena of elements rooted at a single node.
///
/// Node ids are stable for the lifetime of the document. Traversals return
/// nodes in document (pre-)order.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: NodeId,
    focused: Option<NodeId>,
    scrolled: Vec<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with a `<body>` root.
    pub fn new() -> Self {
        Self::with_root(Element::new("body"))
    }

    pub fn with_root(mut root: Element) -> Self {
        root.parent = None;
        root.children.clear();
        Self {
            nodes: vec![root],
            root: NodeId(0),
            focused: None,
            scrolled: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Appends `element` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, mut element: Element) -> Result<NodeId, DocumentError> {
        self.element(parent)?;
        let id = NodeId(self.nodes.len());
        element.parent = Some(parent);
        element.children.clear();
        self.nodes.push(element);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    pub fn element(&self, id: NodeId) -> Result<&Element, DocumentError> {
        self.nodes.get(id.0).ok_or(DocumentError::NodeNotFound(id))
    }

    pub fn element_mut(&mut self, id: NodeId) -> Result<&mut Element, DocumentError> {
        self.nodes.get_mut(id.0).ok_or(DocumentError::NodeNotFound(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// All descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Every node in document order, root first.
    pub fn all(&self) -> Vec<NodeId> {
        let mut out = vec![self.root];
        out.extend(self.descendants(self.root));
        out
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |n| self.parent(*n))
    }

    pub fn by_id(&self, dom_id: &str) -> Option<NodeId> {
        self.all()
            .into_iter()
            .find(|n| self.get(*n).and_then(Element::dom_id) == Some(dom_id))
    }

    pub fn forms(&self) -> Vec<NodeId> {
        self.filter_nodes(self.all(), Element::is_form)
    }

    /// Every input, select and textarea in the document.
    pub fn controls(&self) -> Vec<NodeId> {
        self.filter_nodes(self.all(), Element::is_control)
    }

    pub fn controls_within(&self, id: NodeId) -> Vec<NodeId> {
        self.filter_nodes(self.descendants(id), Element::is_control)
    }

    pub fn enclosing_form(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .find(|n| self.get(*n).is_some_and(Element::is_form))
    }

    /// Computed visibility: neither the element nor any ancestor is hidden.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        match self.get(id) {
            Some(element) if !element.is_self_hidden() => self
                .ancestors(id)
                .all(|a| self.get(a).is_some_and(|e| !e.is_self_hidden())),
            _ => false,
        }
    }

    /// Conceals an element via inline style.
    pub fn hide(&mut self, id: NodeId) -> Result<(), DocumentError> {
        self.element_mut(id)?.hidden = true;
        Ok(())
    }

    /// Clears inline hiding and every platform hidden class.
    pub fn reveal(&mut self, id: NodeId) -> Result<(), DocumentError> {
        let element = self.element_mut(id)?;
        element.hidden = false;
        element.classes.retain(|c| !HIDDEN_CLASSES.contains(&c.as_str()));
        Ok(())
    }

    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) -> Result<(), DocumentError> {
        let element = self.element_mut(id)?;
        if disabled {
            element
                .attributes
                .insert("disabled".to_string(), "disabled".to_string());
        } else {
            element.attributes.remove("disabled");
        }
        Ok(())
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DocumentError> {
        self.element_mut(id)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn focus(&mut self, id: NodeId) -> Result<(), DocumentError> {
        self.element(id)?;
        self.focused = Some(id);
        Ok(())
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Records a smooth scroll-into-view request for the host to replay.
    pub fn scroll_into_view(&mut self, id: NodeId) -> Result<(), DocumentError> {
        self.element(id)?;
        self.scrolled.push(id);
        Ok(())
    }

    pub fn scroll_requests(&self) -> &[NodeId] {
        &self.scrolled
    }

    /// Sets the live value of a text-like control, as typing would.
    pub fn set_value(&mut self, id: NodeId, value: &str) -> Result<(), DocumentError> {
        self.element_mut(id)?.value = Some(value.to_string());
        Ok(())
    }

    /// Checks a checkbox or radio. Checking a radio unchecks the rest of its
    /// name group within the same form.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<(), DocumentError> {
        let element = self.element(id)?;
        if checked && element.input_type() == "radio" {
            if let Some(name) = element.attr("name").map(str::to_string) {
                for sibling in self.radio_group(id, &name) {
                    self.element_mut(sibling)?.checked = false;
                }
            }
        }
        self.element_mut(id)?.checked = checked;
        Ok(())
    }

    /// Radios named `name` in the form enclosing `id`, or outside any form
    /// when `id` has none.
    pub fn radio_group(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        let form = self.enclosing_form(id);
        self.controls_within(form.unwrap_or_else(|| self.root()))
            .into_iter()
            .filter(|n| self.enclosing_form(*n) == form)
            .filter(|n| {
                self.get(*n)
                    .is_some_and(|e| e.input_type() == "radio" && e.attr("name") == Some(name))
            })
            .collect()
    }

    fn filter_nodes(&self, nodes: Vec<NodeId>, pred: fn(&Element) -> bool) -> Vec<NodeId> {
        nodes
            .into_iter()
            .filter(|n| self.get(*n).is_some_and(pred))
            .collect()
    }
}
