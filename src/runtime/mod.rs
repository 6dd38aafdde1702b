use crate::config::{EngineConfig, Surface};
use crate::dom::{Document, NodeId};
use crate::error::DocumentError;
use crate::evaluator::{self, EvaluationContext, EvaluationReport, Evaluator};
use crate::rule::RuleSet;
use crate::store::FieldMappingStore;
use std::time::Duration;
use tracing::{debug, info, warn};

mod event;

pub use event::{DomEvent, DomEventKind};

/// One page with its rules: the deployment-state contract around the evaluator.
///
/// On [`start`](Self::start), live pages hide every action target before any
/// rule runs; the preview surface only tags them. Rules then run once, and again
/// for each qualifying event bubbling through a subscribed form. Everything is
/// synchronous: each event runs one full pass to completion.
pub struct PageRuntime {
    document: Document,
    store: FieldMappingStore,
    rules: RuleSet,
    evaluator: Evaluator,
    subscribed_forms: Vec<NodeId>,
    /// Action targets that were not in the document when the page started.
    pending_targets: Vec<String>,
    ready: bool,
}

impl PageRuntime {
    pub fn new(document: Document, rules: RuleSet, config: EngineConfig) -> Self {
        Self {
            document,
            store: FieldMappingStore::new(),
            rules,
            evaluator: Evaluator::new(config),
            subscribed_forms: Vec::new(),
            pending_targets: Vec::new(),
            ready: false,
        }
    }

    /// Reuses a store populated by earlier passes.
    pub fn with_store(mut self, store: FieldMappingStore) -> Self {
        self.store = store;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for hosts simulating user input between events.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn store(&self) -> &FieldMappingStore {
        &self.store
    }

    pub fn into_store(self) -> FieldMappingStore {
        self.store
    }

    pub fn config(&self) -> &EngineConfig {
        self.evaluator.config()
    }

    /// How long the host should wait before calling [`rehide_late_targets`](Self::rehide_late_targets).
    pub fn rehide_delay(&self) -> Duration {
        Duration::from_millis(self.config().rehide_delay_ms)
    }

    pub fn subscribed_forms(&self) -> &[NodeId] {
        &self.subscribed_forms
    }

    /// Prepares targets, subscribes every form and runs the initial pass.
    pub fn start(&mut self) -> Result<EvaluationReport, DocumentError> {
        let prepared = self.prepare_targets()?;
        self.subscribed_forms = self.document.forms();
        info!(
            surface = ?self.config().surface,
            rules = self.rules.len(),
            targets = prepared,
            forms = self.subscribed_forms.len(),
            "page runtime started"
        );
        Ok(self.run_rules())
    }

    /// Hides (live) or tags (preview) every distinct action target. Returns how
    /// many targets were found; the rest are kept for the late re-hide pass.
    pub fn prepare_targets(&mut self) -> Result<usize, DocumentError> {
        let targets: Vec<String> = self
            .rules
            .action_targets()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.pending_targets.clear();

        let mut prepared = 0;
        for target in targets {
            match self.evaluator.resolver().resolve_in(&self.document, &target) {
                Some(resolution) => {
                    self.prepare_target(resolution.node)?;
                    prepared += 1;
                }
                None => {
                    debug!(target = %target, "action target not rendered yet");
                    self.pending_targets.push(target);
                }
            }
        }
        Ok(prepared)
    }

    /// The delayed pass for late-rendered content: prepares targets that were
    /// missing at start and, once rules have run, re-runs them so the new
    /// elements reflect the current values.
    pub fn rehide_late_targets(&mut self) -> Result<Option<EvaluationReport>, DocumentError> {
        let pending = std::mem::take(&mut self.pending_targets);
        let mut prepared = 0;
        for target in pending {
            match self.evaluator.resolver().resolve_in(&self.document, &target) {
                Some(resolution) => {
                    self.prepare_target(resolution.node)?;
                    prepared += 1;
                }
                None => {
                    warn!(target = %target, "action target still missing after re-hide delay");
                    self.pending_targets.push(target);
                }
            }
        }
        self.subscribed_forms = self.document.forms();
        Ok((prepared > 0 && self.ready).then(|| self.run_rules()))
    }

    fn prepare_target(&mut self, node: NodeId) -> Result<(), DocumentError> {
        let config = self.evaluator.config();
        match config.surface {
            Surface::Live => evaluator::hide(&mut self.document, node, config.ancestor_depth),
            Surface::Preview => {
                self.document
                    .set_attr(node, &config.target_marker_attribute, "true")
            }
        }
    }

    /// One full pass over every active rule.
    pub fn run_rules(&mut self) -> EvaluationReport {
        self.ready = true;
        let mut ctx = EvaluationContext::new(&mut self.document, &mut self.store);
        self.evaluator.evaluate(&mut ctx, &self.rules)
    }

    /// Handles an event. Returns the pass it triggered, or `None` when the event
    /// does not qualify or did not bubble through a subscribed form.
    pub fn dispatch(&mut self, event: DomEvent) -> Option<EvaluationReport> {
        if !event.qualifies(&self.document) {
            return None;
        }
        let form = self.document.enclosing_form(event.target)?;
        if !self.subscribed_forms.contains(&form) {
            return None;
        }
        debug!(kind = %event.kind, target = %event.target, "re-evaluating rules");
        Some(self.run_rules())
    }
}
