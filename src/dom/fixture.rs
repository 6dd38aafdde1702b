use super::{Document, Element, NodeId};
use crate::error::DocumentError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;

/// JSON shape of a page snapshot, used by the CLI and by tests to load documents.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ElementFixture {
    pub tag: String,
    pub attrs: AHashMap<String, String>,
    pub classes: Vec<String>,
    pub text: String,
    pub value: Option<String>,
    pub checked: bool,
    pub selected: bool,
    pub files: usize,
    pub hidden: bool,
    pub children: Vec<ElementFixture>,
}

impl ElementFixture {
    fn to_element(&self) -> Element {
        let mut element = Element::new(if self.tag.is_empty() { "div" } else { &self.tag });
        element.attributes = self.attrs.clone();
        element.classes = self.classes.clone();
        element.text = self.text.clone();
        element.value = self.value.clone();
        element.checked = self.checked;
        element.selected = self.selected;
        element.files = self.files;
        element.hidden = self.hidden;
        element
    }
}

impl Document {
    /// Builds a document whose root is the fixture's top-level element.
    pub fn from_fixture(fixture: &ElementFixture) -> Result<Self, DocumentError> {
        let mut doc = Document::with_root(fixture.to_element());
        let root = doc.root();
        for child in &fixture.children {
            doc.append_fixture(root, child)?;
        }
        Ok(doc)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let fixture: ElementFixture = serde_json::from_str(json)
            .map_err(|e| DocumentError::FixtureParseError(e.to_string()))?;
        Self::from_fixture(&fixture)
    }

    pub fn from_file(path: &str) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path).map_err(|e| {
            DocumentError::FixtureParseError(format!("Could not read file '{}': {}", path, e))
        })?;
        Self::from_json(&content)
    }

    fn append_fixture(
        &mut self,
        parent: NodeId,
        fixture: &ElementFixture,
    ) -> Result<NodeId, DocumentError> {
        let node = self.append(parent, fixture.to_element())?;
        for child in &fixture.children {
            self.append_fixture(node, child)?;
        }
        Ok(node)
    }
}
