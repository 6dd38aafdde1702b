use crate::dom::NodeId;
use crate::error::EvaluationError;
use crate::rule::{ActionType, Operator};
use std::fmt;

/// How a rule's actions were driven in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Condition `i` switches action `i`.
    IndexAligned,
    /// One verdict drives every action.
    Aggregate,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::IndexAligned => write!(f, "index-aligned"),
            ExecutionMode::Aggregate => write!(f, "aggregate"),
        }
    }
}

/// Something the evaluator worked around instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    FieldUnavailable { field_id: String },
    UnknownOperator { condition_id: String, operator: Operator },
    UnknownAction { action_id: String, action_type: ActionType },
    TargetUnavailable { action_id: String, target_field_id: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::FieldUnavailable { field_id } => {
                write!(f, "field '{}' could not be resolved", field_id)
            }
            Diagnostic::UnknownOperator {
                condition_id,
                operator,
            } => write!(f, "condition '{}' uses unknown operator '{}'", condition_id, operator),
            Diagnostic::UnknownAction {
                action_id,
                action_type,
            } => write!(f, "action '{}' has unknown type '{}'", action_id, action_type),
            Diagnostic::TargetUnavailable {
                action_id,
                target_field_id,
            } => write!(
                f,
                "action '{}' skipped: target '{}' could not be resolved",
                action_id, target_field_id
            ),
        }
    }
}

/// The verdict for all conditions sharing one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupVerdict {
    pub field_id: String,
    /// `None` when the field could not be resolved.
    pub value: Option<String>,
    pub met: bool,
}

/// One effect actually applied to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEffect {
    pub action_id: String,
    pub target_field_id: String,
    pub node: NodeId,
    pub effect: ActionType,
    /// True when this is the inverse of the action's declared type.
    pub inverse: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule_id: String,
    pub mode: ExecutionMode,
    /// Aggregate verdict; in index-aligned mode, whether any branch matched.
    pub met: bool,
    pub groups: Vec<GroupVerdict>,
    pub effects: Vec<AppliedEffect>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RuleOutcome {
    /// Effects applied for the action with `action_id`.
    pub fn effects_for(&self, action_id: &str) -> impl Iterator<Item = &AppliedEffect> {
        self.effects.iter().filter(move |e| e.action_id == action_id)
    }
}

/// The result of evaluating one rule. A failure stays local to its rule.
#[derive(Debug, Clone)]
pub struct RuleResult {
    pub rule_id: String,
    pub result: Result<RuleOutcome, EvaluationError>,
}

/// Everything one evaluation pass did, in rule order.
#[derive(Debug, Clone, Default)]
pub struct EvaluationReport {
    pub results: Vec<RuleResult>,
}

impl EvaluationReport {
    pub fn outcome(&self, rule_id: &str) -> Option<&RuleOutcome> {
        self.results
            .iter()
            .find(|r| r.rule_id == rule_id)
            .and_then(|r| r.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &EvaluationError)> {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().err().map(|e| (r.rule_id.as_str(), e)))
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().ok())
            .flat_map(|o| o.diagnostics.iter())
    }
}

/// Renders evaluation reports as human-readable text.
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn format_report(report: &EvaluationReport) -> String {
        if report.results.is_empty() {
            return "No active rules".to_string();
        }
        report
            .results
            .iter()
            .map(|r| match &r.result {
                Ok(outcome) => Self::format_outcome(outcome),
                Err(e) => format!("rule '{}': FAILED ({})", r.rule_id, e),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_outcome(outcome: &RuleOutcome) -> String {
        let mut lines = vec![format!(
            "rule '{}' [{}]: {}",
            outcome.rule_id,
            outcome.mode,
            if outcome.met { "met" } else { "not met" }
        )];
        for group in &outcome.groups {
            let value = match &group.value {
                Some(v) => format!("(was \"{}\")", v),
                None => "(unavailable)".to_string(),
            };
            lines.push(format!(
                "  ${} {} -> {}",
                group.field_id,
                value,
                if group.met { "met" } else { "not met" }
            ));
        }
        for effect in &outcome.effects {
            lines.push(format!(
                "  {} {} {}{}",
                effect.effect,
                effect.target_field_id,
                effect.node,
                if effect.inverse { " (inverse)" } else { "" }
            ));
        }
        for diagnostic in &outcome.diagnostics {
            lines.push(format!("  warning: {}", diagnostic));
        }
        lines.join("\n")
    }
}
