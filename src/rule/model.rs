use super::{ActionType, Operator};
use serde::{Deserialize, Serialize};

/// Declared combination of conditions.
///
/// Carried for the authoring service but not read by the evaluator, which
/// always ORs conditions on the same field and ANDs across fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicType {
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default)]
    pub id: String,
    /// Logical field identifier; not guaranteed to be a live DOM id.
    pub field_id: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub target_field_id: String,
}

/// "When these conditions hold, do these actions" for one form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub form_id: String,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub logic_type: LogicType,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Condition {
    pub fn new(field_id: &str, operator: impl Into<Operator>, value: &str) -> Self {
        Self {
            id: String::new(),
            field_id: field_id.to_string(),
            operator: operator.into(),
            value: value.to_string(),
        }
    }
}

impl Action {
    pub fn new(action_type: impl Into<ActionType>, target_field_id: &str) -> Self {
        Self {
            id: String::new(),
            action_type: action_type.into(),
            target_field_id: target_field_id.to_string(),
        }
    }
}

impl Rule {
    pub fn new(id: &str, site_id: &str, form_id: &str) -> Self {
        Self {
            id: id.to_string(),
            form_id: form_id.to_string(),
            site_id: site_id.to_string(),
            conditions: Vec::new(),
            actions: Vec::new(),
            logic_type: LogicType::And,
            is_active: true,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        if condition.id.is_empty() {
            let id = format!("{}-c{}", self.id, self.conditions.len());
            self.conditions.push(Condition { id, ..condition });
        } else {
            self.conditions.push(condition);
        }
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        if action.id.is_empty() {
            let id = format!("{}-a{}", self.id, self.actions.len());
            self.actions.push(Action { id, ..action });
        } else {
            self.actions.push(action);
        }
        self
    }

    pub fn with_logic(mut self, logic_type: LogicType) -> Self {
        self.logic_type = logic_type;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// The single field every condition targets, if there is exactly one.
    pub fn single_field(&self) -> Option<&str> {
        let first = self.conditions.first()?.field_id.as_str();
        self.conditions
            .iter()
            .all(|c| c.field_id == first)
            .then_some(first)
    }
}
