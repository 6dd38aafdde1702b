use crate::dom::{ControlKind, Document, select_options};
use crate::error::DocumentError;
use crate::resolver::Resolution;
use crate::resolver::text::{normalize, separator_variants};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Domain abbreviations applied when generating aliases.
const ABBREVIATIONS: [(&str, &str); 8] = [
    ("Account", "Acct"),
    ("Number", "Num"),
    ("Address", "Addr"),
    ("Telephone", "Tel"),
    ("Information", "Info"),
    ("Description", "Desc"),
    ("Quantity", "Qty"),
    ("Reference", "Ref"),
];

/// A resolved mapping from an authored field identifier to a live control.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SmartField {
    pub webflow_name: String,
    pub webflow_id: String,
    pub technical_id: String,
    pub live_name: String,
    /// Always the author-facing name.
    pub display_name: String,
    /// 1..=5, higher is more literal.
    pub confidence: u8,
    pub aliases: BTreeSet<String>,
    #[serde(rename = "type")]
    pub field_type: String,
    pub options: Vec<String>,
    pub is_form_field: bool,
}

impl SmartField {
    /// Builds the mapping entry for an identifier the resolver just located.
    pub fn from_resolution(
        identifier: &str,
        doc: &Document,
        resolution: &Resolution,
    ) -> Result<Self, DocumentError> {
        let element = doc.element(resolution.node)?;
        let name = element.attr("name").filter(|n| !n.is_empty());
        let dom_id = element.dom_id();
        let kind = ControlKind::of(element);

        let mut field = SmartField {
            webflow_name: identifier.to_string(),
            webflow_id: identifier.to_string(),
            technical_id: dom_id.or(name).unwrap_or_default().to_string(),
            live_name: element
                .attr("data-name")
                .filter(|n| !n.is_empty())
                .or(name)
                .or(dom_id)
                .unwrap_or_default()
                .to_string(),
            display_name: identifier.to_string(),
            confidence: resolution.confidence.clamp(1, 5),
            aliases: BTreeSet::new(),
            field_type: kind.type_name().to_string(),
            options: options_of(doc, resolution.node, kind),
            is_form_field: element.is_control(),
        };
        field.generate_aliases();
        Ok(field)
    }

    /// Same field across two resolution passes.
    pub fn identity_matches(&self, other: &SmartField) -> bool {
        self.same_authored_id(other) || same_id(&self.technical_id, &other.technical_id)
    }

    /// Both fields were recorded for the same authored identifier.
    pub fn same_authored_id(&self, other: &SmartField) -> bool {
        same_id(&self.webflow_id, &other.webflow_id)
    }

    /// True when `identifier` is any of this field's names, ids or aliases.
    pub fn answers_to(&self, identifier: &str) -> bool {
        !identifier.is_empty()
            && (self.canonical_names().contains(&identifier) || self.aliases.contains(identifier))
    }

    fn canonical_names(&self) -> [&str; 5] {
        [
            &self.webflow_name,
            &self.webflow_id,
            &self.technical_id,
            &self.live_name,
            &self.display_name,
        ]
    }

    /// Replaces the alias set with generated variants of the authored and live names.
    pub fn generate_aliases(&mut self) {
        let mut aliases = BTreeSet::new();
        aliases.insert(normalize(&self.webflow_name));
        aliases.insert(normalize(&self.live_name));
        aliases.extend(separator_variants(&self.webflow_name));
        aliases.extend(abbreviate(&self.webflow_name));

        let canonical = self.canonical_names();
        aliases.retain(|alias: &String| !alias.is_empty() && !canonical.contains(&alias.as_str()));
        self.aliases = aliases;
    }
}

fn same_id(a: &str, b: &str) -> bool {
    !a.is_empty() && a == b
}

fn options_of(doc: &Document, node: crate::dom::NodeId, kind: ControlKind) -> Vec<String> {
    match kind {
        ControlKind::Select { .. } => select_options(doc, node)
            .into_iter()
            .map(|(value, _)| value)
            .filter(|v| !v.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Each applicable abbreviation on its own, plus all of them together.
fn abbreviate(name: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut combined = name.to_string();
    for (long, short) in ABBREVIATIONS {
        for (from, to) in [
            (long.to_string(), short.to_string()),
            (long.to_lowercase(), short.to_lowercase()),
        ] {
            if name.contains(&from) {
                out.push(name.replace(&from, &to));
                combined = combined.replace(&from, &to);
            }
        }
    }
    if combined != name {
        out.push(combined);
    }
    out
}
