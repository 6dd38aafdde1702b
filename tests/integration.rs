//! Integration tests for formlogic
//!
//! End-to-end tests that load rules and pages from JSON the way the CLI does.
mod common;
use common::*;
use formlogic::prelude::*;
use std::fs;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_rules_load_from_both_shapes() {
        let bare = RuleSet::from_json(SIGNUP_RULES_JSON).expect("Failed to load bare rule list");
        let wrapped_json = format!("{{ \"rules\": {} }}", SIGNUP_RULES_JSON);
        let wrapped = RuleSet::from_json(&wrapped_json).expect("Failed to load wrapped rule list");

        assert_eq!(bare, wrapped);
        assert_eq!(bare.len(), 3);
        assert_eq!(bare.active().count(), 2);
        assert_eq!(bare.action_targets(), ["Company Name", "Topics"]);
        assert_eq!(bare.rules[0].logic_type, LogicType::And);
    }

    #[test]
    fn test_duplicate_rule_ids_are_rejected() {
        let json = r#"[
            { "id": "r1", "conditions": [], "actions": [] },
            { "id": "r1", "conditions": [], "actions": [] }
        ]"#;
        match RuleSet::from_json(json) {
            Err(RuleLoadError::ValidationError { rule_id, .. }) => assert_eq!(rule_id, "r1"),
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_rules_are_a_parse_error() {
        let result = RuleSet::from_json("{ not json");
        assert!(matches!(result, Err(RuleLoadError::JsonParseError(_))));
    }

    #[test]
    fn test_full_visitor_session() {
        let rules = RuleSet::from_json(SIGNUP_RULES_JSON).unwrap();
        let doc = Document::from_json(SIGNUP_PAGE_JSON).unwrap();
        let mut page = PageRuntime::new(doc, rules, EngineConfig::default());

        let initial = page.start().expect("Page failed to start");
        let text = ReportFormatter::format_report(&initial);
        println!("{}", text);
        assert!(text.contains("rule 'show-company' [aggregate]: not met"));
        assert!(text.contains("$Plan (was \"free\") -> not met"));
        assert!(text.contains("(inverse)"));

        let resolver = Resolver::live(&ResolverConfig::default());
        let plan = resolver.resolve_in(page.document(), "Plan").unwrap().node;
        let company = resolver.resolve_in(page.document(), "Company Name").unwrap().node;
        let business = page.document().children(plan)[1];

        page.document_mut().element_mut(business).unwrap().selected = true;
        let report = page.dispatch(DomEvent::change(plan)).unwrap();
        assert!(report.outcome("show-company").unwrap().met);
        assert!(page.document().is_rendered(company));

        // The store learned the drifted identifier.
        let known = page
            .store()
            .find_by_any_identifier(SITE, FORM, "Company Name")
            .expect("Company Name should be remembered");
        assert_eq!(known.technical_id, "company-name");
        assert_eq!(known.live_name, "company_name");
        assert_eq!(known.confidence, 4);
    }

    #[test]
    fn test_page_fixture_from_file() {
        let dir = std::env::temp_dir().join("formlogic-fixture-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("page.json");
        fs::write(&path, SIGNUP_PAGE_JSON).unwrap();

        let doc = Document::from_file(path.to_str().unwrap()).expect("Failed to load fixture");
        assert_eq!(doc.forms().len(), 1);
        assert_eq!(doc.controls().len(), 5);

        assert!(Document::from_file("/nonexistent/page.json").is_err());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_engine_config_from_json() {
        let config = EngineConfig::from_json(r#"{ "surface": "preview", "ancestorDepth": 2 }"#)
            .expect("Failed to parse config");
        assert_eq!(config.surface, Surface::Preview);
        assert_eq!(config.ancestor_depth, 2);
        assert_eq!(config.rehide_delay_ms, 500);
        assert_eq!(config.target_marker_attribute, "data-logic-target");

        assert!(EngineConfig::from_json(r#"{ "surface": "staging" }"#).is_err());
    }
}

#[cfg(test)]
mod bundle_tests {
    use super::*;
    use formlogic::emit::RULES_PLACEHOLDER;

    #[test]
    fn test_bundle_embeds_only_active_site_rules() {
        let rules = RuleSet::from_json(SIGNUP_RULES_JSON).unwrap();
        let engine = format!("(function(rules){{ /* engine */ }})({});", RULES_PLACEHOLDER);
        let bundle = ScriptEmitter::new(engine)
            .emit(SITE, &rules)
            .expect("Failed to emit bundle");

        assert_eq!(bundle.site_id, SITE);
        assert_eq!(bundle.rule_count, 2);
        assert!(bundle.text.starts_with("/* formlogic v"));
        assert!(!bundle.text.contains(RULES_PLACEHOLDER));
        assert!(bundle.text.contains("\"show-company\""));
        assert!(!bundle.text.contains("\"disabled-rule\""));
        assert!(bundle.text.contains("\"siteId\":\"site-1\""));
    }

    #[test]
    fn test_bundled_rules_load_back() {
        let rules = RuleSet::from_json(SIGNUP_RULES_JSON).unwrap();
        let bundle = ScriptEmitter::new(RULES_PLACEHOLDER).emit(SITE, &rules).unwrap();
        let json = bundle.text.lines().skip(1).collect::<Vec<_>>().join("\n");

        let reloaded = RuleSet::from_json(&json).expect("Bundled payload should load as a rule set");
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.rules[0].conditions[0].operator, Operator::Equals);
        assert_eq!(reloaded.rules[1].actions[0].action_type, ActionType::Show);
    }

    #[test]
    fn test_missing_engine_source_is_an_error() {
        let result = ScriptEmitter::from_file("/nonexistent/engine.js");
        assert!(matches!(result, Err(EmitError::EngineSource { .. })));
    }
}
