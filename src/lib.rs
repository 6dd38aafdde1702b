//! # formlogic - Conditional Logic for Hosted Forms
//!
//! **formlogic** evaluates "when X then Y" rules against forms on pages it does
//! not control. Rules reference fields by logical identifiers that are not
//! guaranteed to match the live markup, so every lookup goes through an adaptive
//! resolver that tries increasingly tolerant matching strategies and remembers
//! what it found in a per-(site, form) mapping store.
//!
//! ## Core Workflow
//!
//! 1.  **Load Rules**: Parse the JSON handed over by the authoring service into a [`rule::RuleSet`].
//! 2.  **Load the Page**: Build a [`dom::Document`], either programmatically or from a JSON fixture.
//! 3.  **Start the Runtime**: [`runtime::PageRuntime::start`] hides every action target, subscribes
//!     every form and runs the rules once.
//! 4.  **Dispatch Events**: Each qualifying `input`, `change` or checkbox/radio `click` re-runs the
//!     whole rule set synchronously.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formlogic::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let rules = RuleSet::from_json(r#"[{
//!         "id": "r1", "siteId": "site", "formId": "signup", "logicType": "AND", "isActive": true,
//!         "conditions": [{ "id": "c1", "fieldId": "Plan", "operator": "equals", "value": "pro" }],
//!         "actions": [{ "id": "a1", "type": "show", "targetFieldId": "Company" }]
//!     }]"#)?;
//!
//!     let mut doc = Document::new();
//!     let form = doc.append(doc.root(), Element::new("form"))?;
//!     let plan = doc.append(form, Element::new("input").with_attr("name", "Plan"))?;
//!     doc.append(form, Element::new("input").with_attr("name", "Company"))?;
//!
//!     let mut page = PageRuntime::new(doc, rules, EngineConfig::default());
//!     page.start()?; // "Company" is hidden until the plan is "pro"
//!
//!     page.document_mut().set_value(plan, "Pro")?;
//!     if let Some(report) = page.dispatch(DomEvent::input(plan)) {
//!         println!("{}", ReportFormatter::format_report(&report));
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dom;
pub mod emit;
pub mod error;
pub mod evaluator;
pub mod prelude;
pub mod resolver;
pub mod rule;
pub mod runtime;
pub mod store;
