use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison applied by a condition. Unknown names survive loading so the
/// owning condition can fail closed at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Unknown(String),
}

impl From<String> for Operator {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "equals" | "is" | "eq" => Operator::Equals,
            "not_equals" | "is_not" | "neq" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "not_contains" | "does_not_contain" => Operator::NotContains,
            "starts_with" => Operator::StartsWith,
            "ends_with" => Operator::EndsWith,
            "is_empty" => Operator::IsEmpty,
            "is_not_empty" => Operator::IsNotEmpty,
            "greater_than" | "gt" => Operator::GreaterThan,
            "less_than" | "lt" => Operator::LessThan,
            "greater_or_equal" | "greater_than_or_equal" | "gte" => Operator::GreaterOrEqual,
            "less_or_equal" | "less_than_or_equal" | "lte" => Operator::LessOrEqual,
            _ => Operator::Unknown(raw),
        }
    }
}

impl From<&str> for Operator {
    fn from(raw: &str) -> Self {
        Operator::from(raw.to_string())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::GreaterOrEqual => "greater_or_equal",
            Operator::LessOrEqual => "less_or_equal",
            Operator::Unknown(raw) => raw.as_str(),
        };
        f.write_str(name)
    }
}

impl Operator {
    /// Applies the operator to an extracted field value and the condition's value.
    ///
    /// String comparisons are trimmed and case-insensitive. Numeric comparisons
    /// parse both sides and are unmet when either side is not a number.
    /// Unknown operators are never met.
    pub fn apply(&self, actual: &str, expected: &str) -> bool {
        let actual = actual.trim().to_lowercase();
        let expected = expected.trim().to_lowercase();
        match self {
            Operator::Equals => actual == expected,
            Operator::NotEquals => actual != expected,
            Operator::Contains => actual.contains(&expected),
            Operator::NotContains => !actual.contains(&expected),
            Operator::StartsWith => actual.starts_with(&expected),
            Operator::EndsWith => actual.ends_with(&expected),
            Operator::IsEmpty => actual.is_empty(),
            Operator::IsNotEmpty => !actual.is_empty(),
            Operator::GreaterThan => numeric(&actual, &expected, |a, b| a > b),
            Operator::LessThan => numeric(&actual, &expected, |a, b| a < b),
            Operator::GreaterOrEqual => numeric(&actual, &expected, |a, b| a >= b),
            Operator::LessOrEqual => numeric(&actual, &expected, |a, b| a <= b),
            Operator::Unknown(_) => false,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Unknown(_))
    }
}

fn numeric<F>(actual: &str, expected: &str, cmp: F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    match (actual.parse::<f64>(), expected.parse::<f64>()) {
        (Ok(a), Ok(b)) if a.is_finite() && b.is_finite() => cmp(a, b),
        _ => false,
    }
}

/// What an action does to its target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    Show,
    Hide,
    Enable,
    Disable,
    Toggle,
    Focus,
    ScrollTo,
    Unknown(String),
}

impl ActionType {
    /// The effect applied when the owning rule is not met, if the action has one.
    pub fn inverse(&self) -> Option<ActionType> {
        match self {
            ActionType::Show => Some(ActionType::Hide),
            ActionType::Hide => Some(ActionType::Show),
            ActionType::Enable => Some(ActionType::Disable),
            ActionType::Disable => Some(ActionType::Enable),
            ActionType::Toggle | ActionType::Focus | ActionType::ScrollTo | ActionType::Unknown(_) => None,
        }
    }
}

impl From<String> for ActionType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "show" => ActionType::Show,
            "hide" => ActionType::Hide,
            "enable" => ActionType::Enable,
            "disable" => ActionType::Disable,
            "toggle" => ActionType::Toggle,
            "focus" => ActionType::Focus,
            "scroll_to" | "scrollto" | "scroll-to" => ActionType::ScrollTo,
            _ => ActionType::Unknown(raw),
        }
    }
}

impl From<&str> for ActionType {
    fn from(raw: &str) -> Self {
        ActionType::from(raw.to_string())
    }
}

impl From<ActionType> for String {
    fn from(action: ActionType) -> Self {
        action.to_string()
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionType::Show => "show",
            ActionType::Hide => "hide",
            ActionType::Enable => "enable",
            ActionType::Disable => "disable",
            ActionType::Toggle => "toggle",
            ActionType::Focus => "focus",
            ActionType::ScrollTo => "scroll_to",
            ActionType::Unknown(raw) => raw.as_str(),
        };
        f.write_str(name)
    }
}
