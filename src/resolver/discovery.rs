use crate::dom::{ControlKind, Document, NodeId};
use crate::error::DocumentError;
use crate::store::SmartField;

/// Builds one SmartField per control of `form`, in document order.
///
/// Radio buttons sharing a name collapse into a single field whose options are
/// the group's values. Controls with no usable name or id are skipped.
pub fn discover_fields(doc: &Document, form: NodeId) -> Result<Vec<SmartField>, DocumentError> {
    let mut fields: Vec<SmartField> = Vec::new();

    for node in doc.controls_within(form) {
        let element = doc.element(node)?;
        let kind = ControlKind::of(element);
        let name = element.attr("name").filter(|n| !n.is_empty());
        let dom_id = element.dom_id();
        let Some(authored) = element
            .attr("data-name")
            .filter(|n| !n.is_empty())
            .or(name)
            .or(dom_id)
        else {
            continue;
        };

        if kind == ControlKind::Radio {
            let value = element.current_value().unwrap_or_default().to_string();
            if let Some(group) = fields
                .iter_mut()
                .find(|f| f.field_type == kind.type_name() && f.technical_id == name.unwrap_or(authored))
            {
                if !value.is_empty() {
                    group.options.push(value);
                }
                continue;
            }
        }

        let mut field = SmartField {
            webflow_name: authored.to_string(),
            webflow_id: dom_id.or(name).unwrap_or(authored).to_string(),
            technical_id: match kind {
                ControlKind::Radio => name.unwrap_or(authored).to_string(),
                _ => name.or(dom_id).unwrap_or(authored).to_string(),
            },
            live_name: name.unwrap_or(authored).to_string(),
            display_name: authored.to_string(),
            confidence: 5,
            field_type: kind.type_name().to_string(),
            is_form_field: true,
            ..Default::default()
        };
        field.options = match kind {
            ControlKind::Select { .. } => crate::dom::select_options(doc, node)
                .into_iter()
                .map(|(value, _)| value)
                .filter(|v| !v.is_empty())
                .collect(),
            ControlKind::Radio => element
                .current_value()
                .filter(|v| !v.is_empty())
                .map(|v| vec![v.to_string()])
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        field.generate_aliases();
        fields.push(field);
    }

    Ok(fields)
}
