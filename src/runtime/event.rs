use crate::dom::{ControlKind, Document, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The DOM events rules react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomEventKind {
    Input,
    Change,
    Click,
}

impl fmt::Display for DomEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomEventKind::Input => write!(f, "input"),
            DomEventKind::Change => write!(f, "change"),
            DomEventKind::Click => write!(f, "click"),
        }
    }
}

/// An event bubbling up from `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomEvent {
    pub kind: DomEventKind,
    pub target: NodeId,
}

impl DomEvent {
    pub fn input(target: NodeId) -> Self {
        Self {
            kind: DomEventKind::Input,
            target,
        }
    }

    pub fn change(target: NodeId) -> Self {
        Self {
            kind: DomEventKind::Change,
            target,
        }
    }

    pub fn click(target: NodeId) -> Self {
        Self {
            kind: DomEventKind::Click,
            target,
        }
    }

    /// `input` and `change` always qualify; `click` only on a checkbox or radio.
    pub fn qualifies(&self, doc: &Document) -> bool {
        match self.kind {
            DomEventKind::Input | DomEventKind::Change => true,
            DomEventKind::Click => doc.get(self.target).is_some_and(|e| {
                matches!(ControlKind::of(e), ControlKind::Checkbox | ControlKind::Radio)
            }),
        }
    }
}
