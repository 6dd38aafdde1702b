use crate::error::EmitError;
use crate::rule::{Rule, RuleSet};
use serde::Serialize;
use std::fs;

/// Placeholder the engine source uses for the rule payload.
pub const RULES_PLACEHOLDER: &str = "__FORMLOGIC_RULES__";

/// A deliverable artifact for one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBundle {
    pub site_id: String,
    pub rule_count: usize,
    pub text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload<'a> {
    site_id: &'a str,
    rules: Vec<&'a Rule>,
}

/// Packages a site's active rules together with the evaluator source.
///
/// The engine source is opaque text. If it contains [`RULES_PLACEHOLDER`] the
/// rule payload is substituted there, otherwise it is appended after it.
pub struct ScriptEmitter {
    engine_source: String,
}

impl ScriptEmitter {
    pub fn new(engine_source: impl Into<String>) -> Self {
        Self {
            engine_source: engine_source.into(),
        }
    }

    pub fn from_file(path: &str) -> Result<Self, EmitError> {
        let engine_source = fs::read_to_string(path).map_err(|e| EmitError::EngineSource {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(engine_source))
    }

    /// Builds the bundle for `site_id`. A site with no active rules still gets a
    /// bundle, carrying an empty rule list.
    pub fn emit(&self, site_id: &str, rules: &RuleSet) -> Result<ScriptBundle, EmitError> {
        let payload = Payload {
            site_id,
            rules: rules.active_for_site(site_id).collect(),
        };
        let rule_count = payload.rules.len();
        let json = serde_json::to_string(&payload).map_err(|source| EmitError::Serialization {
            site_id: site_id.to_string(),
            source,
        })?;

        let header = format!(
            "/* formlogic v{} | site {} | {} active rule(s) */\n",
            env!("CARGO_PKG_VERSION"),
            site_id,
            rule_count
        );
        let body = if self.engine_source.contains(RULES_PLACEHOLDER) {
            self.engine_source.replace(RULES_PLACEHOLDER, &json)
        } else {
            format!("{}\n{} = {};\n", self.engine_source, RULES_PLACEHOLDER, json)
        };

        Ok(ScriptBundle {
            site_id: site_id.to_string(),
            rule_count,
            text: header + &body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Action, Condition, Rule};

    fn rule(id: &str, site: &str) -> Rule {
        Rule::new(id, site, "form")
            .with_condition(Condition::new("plan", "equals", "pro"))
            .with_action(Action::new("show", "extras"))
    }

    #[test]
    fn only_active_rules_of_the_site_are_bundled() {
        let rules = RuleSet::new(vec![
            rule("r1", "site-a"),
            rule("r2", "site-a").inactive(),
            rule("r3", "site-b"),
        ]);
        let bundle = ScriptEmitter::new("run(__FORMLOGIC_RULES__);")
            .emit("site-a", &rules)
            .unwrap();
        assert_eq!(bundle.rule_count, 1);
        assert!(bundle.text.contains("\"r1\""));
        assert!(!bundle.text.contains("\"r2\""));
        assert!(!bundle.text.contains("\"r3\""));
        assert!(bundle.text.contains("run({"));
    }

    #[test]
    fn empty_site_still_gets_a_bundle() {
        let bundle = ScriptEmitter::new("engine();")
            .emit("nobody", &RuleSet::default())
            .unwrap();
        assert_eq!(bundle.rule_count, 0);
        assert!(bundle.text.contains("\"rules\":[]"));
    }
}
