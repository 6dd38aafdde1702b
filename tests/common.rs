//! Common test utilities for building pages and rule sets.
use formlogic::prelude::*;

pub const SITE: &str = "site-1";
pub const FORM: &str = "signup";

/// A page with one form and the given `(name, type)` inputs, each inside its
/// own `div` wrapper.
///
/// Returns the document, the form node and the input nodes in order.
#[allow(dead_code)]
pub fn create_form_page(inputs: &[(&str, &str)]) -> (Document, NodeId, Vec<NodeId>) {
    let mut doc = Document::new();
    let form = doc
        .append(doc.root(), Element::new("form").with_attr("id", FORM))
        .unwrap();
    let nodes = inputs
        .iter()
        .map(|(name, input_type)| {
            let wrapper = doc
                .append(form, Element::new("div").with_class("form-field"))
                .unwrap();
            doc.append(
                wrapper,
                Element::new("input")
                    .with_attr("type", input_type)
                    .with_attr("name", name)
                    .with_attr("data-name", name),
            )
            .unwrap()
        })
        .collect();
    (doc, form, nodes)
}

/// Appends a radio group to `form`, one wrapper around all options.
#[allow(dead_code)]
pub fn add_radio_group(doc: &mut Document, form: NodeId, name: &str, values: &[&str]) -> Vec<NodeId> {
    let wrapper = doc.append(form, Element::new("div")).unwrap();
    values
        .iter()
        .map(|value| {
            let label = doc.append(wrapper, Element::new("label")).unwrap();
            doc.append(
                label,
                Element::new("input")
                    .with_attr("type", "radio")
                    .with_attr("name", name)
                    .with_attr("value", value),
            )
            .unwrap()
        })
        .collect()
}

/// Appends a single-choice select with the given option values.
#[allow(dead_code)]
pub fn add_select(doc: &mut Document, form: NodeId, name: &str, options: &[&str]) -> NodeId {
    let wrapper = doc.append(form, Element::new("div")).unwrap();
    let select = doc
        .append(wrapper, Element::new("select").with_attr("name", name))
        .unwrap();
    for option in options {
        doc.append(
            select,
            Element::new("option").with_attr("value", option).with_text(option),
        )
        .unwrap();
    }
    select
}

/// A rule on the shared site and form.
#[allow(dead_code)]
pub fn rule(id: &str) -> Rule {
    Rule::new(id, SITE, FORM)
}

/// `when <field> <operator> <value> then <action> <target>`
#[allow(dead_code)]
pub fn simple_rule(id: &str, field: &str, operator: &str, value: &str, action: &str, target: &str) -> Rule {
    rule(id)
        .with_condition(Condition::new(field, operator, value))
        .with_action(Action::new(action, target))
}

/// Runs one pass of `rules` against `doc` with a fresh live evaluator.
#[allow(dead_code)]
pub fn evaluate(doc: &mut Document, store: &mut FieldMappingStore, rules: Vec<Rule>) -> EvaluationReport {
    let evaluator = Evaluator::default();
    let mut ctx = EvaluationContext::new(doc, store);
    evaluator.evaluate(&mut ctx, &RuleSet::new(rules))
}

/// JSON of the shape the authoring service hands over.
#[allow(dead_code)]
pub const SIGNUP_RULES_JSON: &str = r#"
[
  {
    "id": "show-company",
    "siteId": "site-1",
    "formId": "signup",
    "name": "Company details for business plans",
    "logicType": "AND",
    "isActive": true,
    "conditions": [
      { "id": "c1", "fieldId": "Plan", "operator": "equals", "value": "business" }
    ],
    "actions": [
      { "id": "a1", "type": "show", "targetFieldId": "Company Name" }
    ]
  },
  {
    "id": "newsletter-topics",
    "siteId": "site-1",
    "formId": "signup",
    "logicType": "AND",
    "isActive": true,
    "conditions": [
      { "id": "c1", "fieldId": "Newsletter", "operator": "equals", "value": "true" }
    ],
    "actions": [
      { "id": "a1", "type": "show", "targetFieldId": "Topics" }
    ]
  },
  {
    "id": "disabled-rule",
    "siteId": "site-1",
    "formId": "signup",
    "logicType": "AND",
    "isActive": false,
    "conditions": [
      { "id": "c1", "fieldId": "Plan", "operator": "equals", "value": "free" }
    ],
    "actions": [
      { "id": "a1", "type": "show", "targetFieldId": "Coupon" }
    ]
  }
]
"#;

/// A page fixture matching [`SIGNUP_RULES_JSON`].
#[allow(dead_code)]
pub const SIGNUP_PAGE_JSON: &str = r#"
{
  "tag": "body",
  "children": [
    {
      "tag": "form",
      "attrs": { "id": "signup", "name": "Signup" },
      "children": [
        { "tag": "div", "classes": ["form-field"], "children": [
          { "tag": "select", "attrs": { "name": "Plan", "data-name": "Plan" }, "children": [
            { "tag": "option", "attrs": { "value": "free" }, "text": "Free" },
            { "tag": "option", "attrs": { "value": "business" }, "text": "Business" }
          ]}
        ]},
        { "tag": "div", "classes": ["form-field"], "children": [
          { "tag": "input", "attrs": { "type": "text", "id": "company-name", "name": "company_name" } }
        ]},
        { "tag": "label", "children": [
          { "tag": "input", "attrs": { "type": "checkbox", "name": "Newsletter", "value": "on" } }
        ]},
        { "tag": "div", "children": [
          { "tag": "input", "attrs": { "type": "text", "name": "Topics" } }
        ]},
        { "tag": "div", "children": [
          { "tag": "input", "attrs": { "type": "text", "name": "Coupon" } }
        ]},
        { "tag": "button", "attrs": { "type": "submit" }, "text": "Sign up" }
      ]
    }
  ]
}
"#;
