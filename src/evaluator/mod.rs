use crate::config::EngineConfig;
use crate::dom::Document;
use crate::error::EvaluationError;
use crate::resolver::Resolver;
use crate::rule::{Rule, RuleSet};
use crate::store::FieldMappingStore;
use tracing::warn;

mod effects;
mod engine;
pub mod report;

use engine::RuleEngine;
pub use effects::{hide, show};
pub use report::{
    AppliedEffect, Diagnostic, EvaluationReport, ExecutionMode, GroupVerdict, ReportFormatter,
    RuleOutcome, RuleResult,
};

/// The mutable state one evaluation pass works on.
pub struct EvaluationContext<'a> {
    pub document: &'a mut Document,
    pub store: &'a mut FieldMappingStore,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(document: &'a mut Document, store: &'a mut FieldMappingStore) -> Self {
        Self { document, store }
    }
}

/// Interprets rules against a live document.
///
/// An `Evaluator` holds no per-page state: everything a pass reads or writes
/// lives in the [`EvaluationContext`]. Conditions on the same field are ORed
/// and fields are ANDed, whatever the rule's declared `logicType` says.
pub struct Evaluator {
    resolver: Resolver,
    config: EngineConfig,
}

impl Evaluator {
    /// An evaluator using the live resolver (candidate strategies plus DOM fallbacks).
    pub fn new(config: EngineConfig) -> Self {
        Self {
            resolver: Resolver::live(&config.resolver),
            config,
        }
    }

    pub fn with_resolver(resolver: Resolver, config: EngineConfig) -> Self {
        Self { resolver, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Runs every active rule once, in order.
    ///
    /// A rule that fails is recorded in the report and logged; the remaining
    /// rules still run.
    pub fn evaluate(&self, ctx: &mut EvaluationContext<'_>, rules: &RuleSet) -> EvaluationReport {
        let mut report = EvaluationReport::default();
        for rule in rules.active() {
            let result = self.evaluate_rule(ctx, rule);
            if let Err(e) = &result {
                warn!(rule_id = %rule.id, error = %e, "rule evaluation failed");
            }
            report.results.push(report::RuleResult {
                rule_id: rule.id.clone(),
                result,
            });
        }
        report
    }

    /// Evaluates one rule and applies its effects.
    pub fn evaluate_rule(
        &self,
        ctx: &mut EvaluationContext<'_>,
        rule: &Rule,
    ) -> Result<RuleOutcome, EvaluationError> {
        RuleEngine::new(rule, &self.resolver, &self.config, ctx.document, ctx.store).run()
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
