//! Field resolver tests
//!
//! Strategy priority, document-order tie breaking and the DOM fallbacks.
mod common;
use common::*;
use formlogic::prelude::*;
use formlogic::resolver::FALLBACK_CONFIDENCE;

fn live() -> Resolver {
    Resolver::live(&ResolverConfig::default())
}

fn authoring() -> Resolver {
    Resolver::authoring(&ResolverConfig::default())
}

fn page_with(elements: Vec<Element>) -> (Document, Vec<NodeId>) {
    let mut doc = Document::new();
    let form = doc.append(doc.root(), Element::new("form")).unwrap();
    let nodes = elements
        .into_iter()
        .map(|e| doc.append(form, e).unwrap())
        .collect();
    (doc, nodes)
}

#[cfg(test)]
mod strategy_priority {
    use super::*;

    #[test]
    fn exact_id_beats_an_earlier_exact_name() {
        let (doc, nodes) = page_with(vec![
            Element::new("input").with_attr("name", "email"),
            Element::new("input").with_attr("id", "email"),
        ]);
        let resolution = live().resolve_in(&doc, "email").unwrap();
        assert_eq!(resolution.node, nodes[1]);
        assert_eq!(resolution.strategy, "exact-id");
        assert_eq!(resolution.confidence, 6);
    }

    #[test]
    fn each_strategy_reports_its_own_confidence() {
        let cases = [
            ("Email", Element::new("input").with_attr("data-name", "Email"), "exact-name", 5),
            ("Company Name", Element::new("input").with_attr("id", "company-name"), "normalized-name", 4),
            ("Phone", Element::new("input").with_attr("name", "Phone Number"), "substring", 3),
            (
                "Billing Street",
                Element::new("input").with_attr("name", "street-address-billing"),
                "token-overlap",
                2,
            ),
            ("Adress", Element::new("input").with_attr("name", "Address"), "fuzzy", 1),
        ];

        for (identifier, element, strategy, confidence) in cases {
            let (doc, nodes) = page_with(vec![element]);
            let resolution = authoring()
                .resolve_in(&doc, identifier)
                .unwrap_or_else(|| panic!("'{}' should resolve", identifier));
            assert_eq!(resolution.node, nodes[0], "{}", identifier);
            assert_eq!(resolution.strategy, strategy, "{}", identifier);
            assert_eq!(resolution.confidence, confidence, "{}", identifier);
        }
    }

    #[test]
    fn ties_go_to_document_order_whatever_the_candidate_order() {
        let (doc, nodes) = page_with(vec![
            Element::new("input").with_attr("name", "email"),
            Element::new("input").with_attr("name", "email"),
        ]);
        let reversed = vec![nodes[1], nodes[0]];
        let resolution = live().resolve(&doc, "email", &reversed).unwrap();
        assert_eq!(resolution.node, nodes[0]);
    }

    #[test]
    fn literal_match_wins_over_a_fuzzier_earlier_one() {
        let (doc, nodes) = page_with(vec![
            Element::new("input").with_attr("name", "Email Address"),
            Element::new("input").with_attr("name", "email"),
        ]);
        // "email" is a substring of the first, but the second matches by name.
        let resolution = live().resolve_in(&doc, "email").unwrap();
        assert_eq!(resolution.node, nodes[1]);
    }

    #[test]
    fn blank_identifier_never_resolves() {
        let (doc, _) = page_with(vec![Element::new("input").with_attr("name", "email")]);
        assert!(live().resolve_in(&doc, "").is_none());
        assert!(live().resolve_in(&doc, "   ").is_none());
    }

    #[test]
    fn unrelated_identifier_does_not_resolve() {
        let (doc, _) = page_with(vec![Element::new("input").with_attr("name", "email")]);
        assert!(live().resolve_in(&doc, "Shipping Method").is_none());
    }
}

#[cfg(test)]
mod fallbacks {
    use super::*;

    #[test]
    fn submit_button_is_found_by_its_label() {
        let (doc, nodes) = page_with(vec![
            Element::new("input").with_attr("name", "email"),
            Element::new("button").with_attr("type", "submit").with_text("Sign up"),
        ]);
        assert!(authoring().resolve_in(&doc, "SIGN-UP").is_none());

        let resolution = live().resolve_in(&doc, "SIGN-UP").unwrap();
        assert_eq!(resolution.node, nodes[1]);
        assert_eq!(resolution.strategy, "alphanumeric-scan");
        assert_eq!(resolution.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn tagged_wrapper_yields_its_first_control() {
        let mut doc = Document::new();
        let form = doc.append(doc.root(), Element::new("form")).unwrap();
        let wrapper = doc
            .append(form, Element::new("div").with_attr("data-field", "Budget"))
            .unwrap();
        let amount = doc
            .append(wrapper, Element::new("input").with_attr("name", "amt"))
            .unwrap();
        doc.append(wrapper, Element::new("input").with_attr("name", "currency"))
            .unwrap();

        let resolution = live().resolve_in(&doc, "budget").unwrap();
        assert_eq!(resolution.node, amount);
        assert_eq!(resolution.strategy, "wrapper-container");
    }

    #[test]
    fn oversized_wrapper_is_ignored() {
        let mut doc = Document::new();
        let form = doc.append(doc.root(), Element::new("form")).unwrap();
        let wrapper = doc
            .append(form, Element::new("div").with_attr("id", "Details"))
            .unwrap();
        for name in ["a1", "b2", "c3", "d4"] {
            doc.append(wrapper, Element::new("input").with_attr("name", name))
                .unwrap();
        }
        assert!(live().resolve_in(&doc, "Details").is_none());
    }

    #[test]
    fn custom_chain_can_be_assembled() {
        let resolver = Resolver::builder()
            .with_default_strategies(&ResolverConfig::default())
            .build();
        assert_eq!(resolver.strategy_count(), 6);
    }
}

#[cfg(test)]
mod discovery {
    use super::*;

    #[test]
    fn radios_collapse_into_one_field_with_options() {
        let (mut doc, form, _) = create_form_page(&[("Email", "email")]);
        add_radio_group(&mut doc, form, "Plan", &["free", "pro"]);
        add_select(&mut doc, form, "Country", &["us", "ca"]);

        let fields = discover_fields(&doc, form).unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.display_name.as_str()).collect();
        assert_eq!(names, ["Email", "Plan", "Country"]);

        let plan = &fields[1];
        assert_eq!(plan.field_type, "radio");
        assert_eq!(plan.options, ["free", "pro"]);
        assert_eq!(fields[2].options, ["us", "ca"]);
        assert!(fields.iter().all(|f| f.confidence == 5 && f.is_form_field));
    }
}
