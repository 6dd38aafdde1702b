use super::effects;
use super::report::{AppliedEffect, Diagnostic, ExecutionMode, GroupVerdict, RuleOutcome};
use crate::config::{EngineConfig, Surface};
use crate::dom::{Document, extract_value};
use crate::error::{DocumentError, EvaluationError};
use crate::resolver::{Resolution, Resolver};
use crate::rule::{Action, ActionType, Condition, Rule};
use crate::store::{FieldMappingStore, SmartField};
use itertools::Itertools;
use tracing::{debug, warn};

/// Evaluates a single rule against the live document.
pub(super) struct RuleEngine<'a> {
    rule: &'a Rule,
    resolver: &'a Resolver,
    config: &'a EngineConfig,
    document: &'a mut Document,
    store: &'a mut FieldMappingStore,
    effects: Vec<AppliedEffect>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> RuleEngine<'a> {
    pub(super) fn new(
        rule: &'a Rule,
        resolver: &'a Resolver,
        config: &'a EngineConfig,
        document: &'a mut Document,
        store: &'a mut FieldMappingStore,
    ) -> Self {
        Self {
            rule,
            resolver,
            config,
            document,
            store,
            effects: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(super) fn run(mut self) -> Result<RuleOutcome, EvaluationError> {
        if self.rule.conditions.is_empty() {
            return Err(EvaluationError::NoConditions(self.rule.id.clone()));
        }

        let index_aligned = self.rule.single_field().is_some()
            && self.rule.conditions.len() == self.rule.actions.len();

        let (mode, met, groups) = if index_aligned {
            let (met, groups) = self.run_index_aligned()?;
            (ExecutionMode::IndexAligned, met, groups)
        } else {
            let groups = self.evaluate_groups()?;
            let met = groups.iter().all(|g| g.met);
            self.run_aggregate(met)?;
            (ExecutionMode::Aggregate, met, groups)
        };

        debug!(rule_id = %self.rule.id, %mode, met, effects = self.effects.len(), "rule evaluated");
        Ok(RuleOutcome {
            rule_id: self.rule.id.clone(),
            mode,
            met,
            groups,
            effects: self.effects,
            diagnostics: self.diagnostics,
        })
    }

    /// One verdict per distinct field, in first-seen order. Conditions on the
    /// same field are ORed. An unresolvable field makes its group unmet.
    fn evaluate_groups(&mut self) -> Result<Vec<GroupVerdict>, EvaluationError> {
        let rule = self.rule;
        let field_ids: Vec<&str> = rule
            .conditions
            .iter()
            .map(|c| c.field_id.as_str())
            .unique()
            .collect();

        let mut verdicts = Vec::with_capacity(field_ids.len());
        for field_id in field_ids {
            let group: Vec<&Condition> = rule
                .conditions
                .iter()
                .filter(|c| c.field_id == field_id)
                .collect();

            let Some(value) = self.field_value(field_id)? else {
                verdicts.push(GroupVerdict {
                    field_id: field_id.to_string(),
                    value: None,
                    met: false,
                });
                continue;
            };

            let mut met = false;
            for condition in group {
                if !condition.operator.is_known() {
                    self.diagnose(Diagnostic::UnknownOperator {
                        condition_id: condition.id.clone(),
                        operator: condition.operator.clone(),
                    });
                    continue;
                }
                if condition.operator.apply(&value, &condition.value) {
                    met = true;
                    break;
                }
            }
            verdicts.push(GroupVerdict {
                field_id: field_id.to_string(),
                value: Some(value),
                met,
            });
        }
        Ok(verdicts)
    }

    fn run_aggregate(&mut self, met: bool) -> Result<(), EvaluationError> {
        let rule = self.rule;
        for action in &rule.actions {
            self.drive(action, met)?;
        }
        Ok(())
    }

    /// Condition `i` switches action `i`: equal values fire the primary
    /// effect, anything else (including an unresolvable field) the inverse.
    fn run_index_aligned(&mut self) -> Result<(bool, Vec<GroupVerdict>), EvaluationError> {
        let rule = self.rule;
        let field_id = rule.conditions[0].field_id.as_str();
        let mut any_matched = false;
        let mut last_value = None;

        for (condition, action) in rule.conditions.iter().zip(&rule.actions) {
            let value = self.field_value(field_id)?;
            let matched = value.as_deref().is_some_and(|v| {
                v.trim().to_lowercase() == condition.value.trim().to_lowercase()
            });
            last_value = value;

            any_matched |= matched;
            self.drive(action, matched)?;
        }

        let groups = vec![GroupVerdict {
            field_id: field_id.to_string(),
            value: last_value,
            met: any_matched,
        }];
        Ok((any_matched, groups))
    }

    /// The declared effect when `met`, otherwise its inverse if it has one.
    /// Unknown action types are reported either way and never touch the page.
    /// The preview surface never applies inverse effects, so unmet targets
    /// stay as the author laid them out.
    fn drive(&mut self, action: &Action, met: bool) -> Result<(), EvaluationError> {
        if let ActionType::Unknown(_) = action.action_type {
            self.diagnose(Diagnostic::UnknownAction {
                action_id: action.id.clone(),
                action_type: action.action_type.clone(),
            });
            return Ok(());
        }
        if met {
            return self.perform(action, &action.action_type, false);
        }
        match action.action_type.inverse() {
            Some(inverse) if self.config.surface == Surface::Live => self.perform(action, &inverse, true),
            _ => Ok(()),
        }
    }

    fn perform(
        &mut self,
        action: &Action,
        effect: &ActionType,
        inverse: bool,
    ) -> Result<(), EvaluationError> {
        let Some(resolution) = self.locate(&action.target_field_id)? else {
            self.diagnose(Diagnostic::TargetUnavailable {
                action_id: action.id.clone(),
                target_field_id: action.target_field_id.clone(),
            });
            return Ok(());
        };

        effects::apply(
            self.document,
            resolution.node,
            effect,
            self.config.ancestor_depth,
        )
        .map_err(|e| self.document_error(e))?;

        self.effects.push(AppliedEffect {
            action_id: action.id.clone(),
            target_field_id: action.target_field_id.clone(),
            node: resolution.node,
            effect: effect.clone(),
            inverse,
        });
        Ok(())
    }

    /// The field's current value, or `None` (with a diagnostic) when it cannot be found.
    fn field_value(&mut self, field_id: &str) -> Result<Option<String>, EvaluationError> {
        match self.locate(field_id)? {
            Some(resolution) => extract_value(self.document, resolution.node)
                .map(Some)
                .map_err(|e| self.document_error(e)),
            None => {
                self.diagnose(Diagnostic::FieldUnavailable {
                    field_id: field_id.to_string(),
                });
                Ok(None)
            }
        }
    }

    /// Resolves an identifier, retrying every identifier the store knows for it,
    /// and records successful resolutions back into the store.
    fn locate(&mut self, identifier: &str) -> Result<Option<Resolution>, EvaluationError> {
        let rule = self.rule;
        let resolver = self.resolver;
        let (site, form) = (rule.site_id.as_str(), rule.form_id.as_str());
        let document: &Document = self.document;

        let resolution = resolver.resolve_in(document, identifier).or_else(|| {
            let known = self.store.find_by_any_identifier(site, form, identifier)?;
            [&known.technical_id, &known.live_name, &known.webflow_name]
                .into_iter()
                .chain(known.aliases.iter())
                .filter(|alt| !alt.is_empty() && alt.as_str() != identifier)
                .find_map(|alt| resolver.resolve_in(document, alt))
        });

        let Some(resolution) = resolution else {
            return Ok(None);
        };

        let field = SmartField::from_resolution(identifier, document, &resolution)
            .map_err(|e| self.document_error(e))?;
        let diff = self.store.record(site, form, field);
        if !diff.is_empty() {
            debug!(
                site,
                form,
                identifier,
                added = diff.added.len(),
                renamed = diff.renamed.len(),
                modified = diff.modified.len(),
                "field mapping changed"
            );
        }
        Ok(Some(resolution))
    }

    fn diagnose(&mut self, diagnostic: Diagnostic) {
        warn!(rule_id = %self.rule.id, "{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn document_error(&self, source: DocumentError) -> EvaluationError {
        EvaluationError::Document {
            rule_id: self.rule.id.clone(),
            source,
        }
    }
}
