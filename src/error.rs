use crate::dom::NodeId;
use thiserror::Error;

/// Errors that can occur while loading rules handed over by the authoring service.
#[derive(Error, Debug)]
pub enum RuleLoadError {
    #[error("Failed to parse rule JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Rule '{rule_id}' is invalid: {message}")]
    ValidationError { rule_id: String, message: String },
}

/// Errors raised by the in-memory document model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Failed to parse page fixture: {0}")]
    FixtureParseError(String),

    #[error("Node {0:?} does not exist in this document")]
    NodeNotFound(NodeId),
}

/// Errors that abort the evaluation of a single rule.
///
/// These never abort a whole pass: the evaluator records them against the
/// owning rule and moves on to the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Rule '{0}' has no conditions")]
    NoConditions(String),

    #[error("Document error while evaluating rule '{rule_id}': {source}")]
    Document {
        rule_id: String,
        #[source]
        source: DocumentError,
    },
}

/// Errors that can occur while packaging a rule set for delivery.
#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Failed to serialize rules for site '{site_id}': {source}")]
    Serialization {
        site_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not read engine source '{path}': {message}")]
    EngineSource { path: String, message: String },
}
