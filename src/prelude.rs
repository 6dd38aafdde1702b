//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types of the formlogic crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use formlogic::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let rules = RuleSet::from_file("path/to/rules.json")?;
//! let doc = Document::from_file("path/to/page.json")?;
//!
//! let mut page = PageRuntime::new(doc, rules, EngineConfig::default());
//! let report = page.start()?;
//! println!("{}", ReportFormatter::format_report(&report));
//! # Ok(())
//! # }
//! ```

// Configuration
pub use crate::config::{EngineConfig, ResolverConfig, Surface};

// Page model
pub use crate::dom::{ControlKind, Document, Element, NodeId, extract_value};

// Rules
pub use crate::rule::{Action, ActionType, Condition, LogicType, Operator, Rule, RuleSet};

// Resolution and mapping
pub use crate::resolver::{Resolution, Resolver, discover_fields};
pub use crate::store::{FieldMappingStore, MappingDiff, SmartField};

// Evaluation
pub use crate::evaluator::{
    EvaluationContext, EvaluationReport, Evaluator, ExecutionMode, ReportFormatter, RuleOutcome,
};
pub use crate::runtime::{DomEvent, DomEventKind, PageRuntime};

// Packaging
pub use crate::emit::{ScriptBundle, ScriptEmitter};

// Error types
pub use crate::error::{DocumentError, EmitError, EvaluationError, RuleLoadError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
