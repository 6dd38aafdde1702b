//! Field mapping store tests
mod common;
use common::*;
use formlogic::prelude::*;

fn field(id: &str, name: &str) -> SmartField {
    let mut field = SmartField {
        webflow_name: name.to_string(),
        webflow_id: id.to_string(),
        technical_id: id.to_string(),
        live_name: name.to_string(),
        display_name: name.to_string(),
        confidence: 5,
        field_type: "text".to_string(),
        is_form_field: true,
        ..Default::default()
    };
    field.generate_aliases();
    field
}

#[cfg(test)]
mod versions {
    use super::*;

    #[test]
    fn every_put_bumps_the_version_by_one() {
        let mut store = FieldMappingStore::new();
        assert_eq!(store.put(SITE, FORM, vec![field("email", "Email")]), 1);
        assert_eq!(store.put(SITE, FORM, vec![field("email", "Email")]), 2);
        assert_eq!(store.put(SITE, "other", vec![]), 1);

        let entry = store.entry(SITE, FORM).unwrap();
        assert_eq!(entry.version, 2);
        assert_eq!(entry.fields.len(), 1);
    }

    #[test]
    fn clear_drops_entries_but_not_the_version_counter() {
        let mut store = FieldMappingStore::new();
        store.put(SITE, FORM, vec![field("email", "Email")]);
        store.put("site-2", FORM, vec![field("email", "Email")]);

        store.clear(SITE);
        assert!(store.get(SITE, FORM).is_empty());
        assert!(store.entry(SITE, FORM).is_none());
        assert_eq!(store.len(), 1);

        assert_eq!(store.put(SITE, FORM, vec![]), 2);
    }

    #[test]
    fn sync_only_writes_on_change() {
        let mut store = FieldMappingStore::new();
        let fields = vec![field("email", "Email"), field("phone", "Phone")];

        let first = store.sync(SITE, FORM, fields.clone());
        assert_eq!(first.added.len(), 2);
        assert_eq!(store.entry(SITE, FORM).unwrap().version, 1);

        let second = store.sync(SITE, FORM, fields);
        assert!(second.is_empty());
        assert_eq!(store.entry(SITE, FORM).unwrap().version, 1);

        let third = store.sync(SITE, FORM, vec![field("email", "E-mail")]);
        assert_eq!(third.renamed.len(), 1);
        assert_eq!(third.removed.len(), 1);
        assert_eq!(store.entry(SITE, FORM).unwrap().version, 2);
    }

    #[test]
    fn empty_form_still_gets_an_entry() {
        let mut store = FieldMappingStore::new();
        let diff = store.sync(SITE, FORM, Vec::new());
        assert!(diff.is_empty());
        assert_eq!(store.entry(SITE, FORM).unwrap().version, 1);
    }
}

#[cfg(test)]
mod lookups {
    use super::*;

    #[test]
    fn any_identifier_or_alias_finds_the_field() {
        let mut store = FieldMappingStore::new();
        store.put(SITE, FORM, vec![field("acct-no", "Account Number")]);

        for identifier in ["Account Number", "acct-no", "account-number", "Account_Number", "Acct Num"] {
            let found = store.find_by_any_identifier(SITE, FORM, identifier);
            assert_eq!(found.map(|f| f.technical_id.as_str()), Some("acct-no"), "{}", identifier);
        }
        assert!(store.find_by_any_identifier(SITE, FORM, "Routing").is_none());
        assert!(store.find_by_any_identifier(SITE, "other", "acct-no").is_none());
    }

    #[test]
    fn evaluation_records_resolved_fields_once() {
        let (mut doc, _, nodes) = create_form_page(&[("Plan", "text"), ("Extras", "text")]);
        doc.set_value(nodes[0], "pro").unwrap();
        let mut store = FieldMappingStore::new();
        let rules = || vec![simple_rule("r1", "Plan", "equals", "pro", "show", "Extras")];

        evaluate(&mut doc, &mut store, rules());
        let entry = store.entry(SITE, FORM).unwrap();
        let version = entry.version;
        let names: Vec<&str> = entry.fields.iter().map(|f| f.display_name.as_str()).collect();
        assert_eq!(names, ["Plan", "Extras"]);
        assert!(entry.fields.iter().all(|f| f.confidence == 5));

        evaluate(&mut doc, &mut store, rules());
        assert_eq!(store.entry(SITE, FORM).unwrap().version, version);
    }

    #[test]
    fn two_identifiers_for_one_control_keep_separate_mappings() {
        let (mut doc, _, nodes) = create_form_page(&[("Plan", "text"), ("Extras", "text")]);
        doc.set_value(nodes[0], "pro").unwrap();
        let mut store = FieldMappingStore::new();
        let rules = || {
            vec![
                simple_rule("r1", "Plan", "equals", "pro", "show", "Extras"),
                simple_rule("r2", "plan", "equals", "pro", "show", "Extras"),
            ]
        };

        evaluate(&mut doc, &mut store, rules());
        let version = store.entry(SITE, FORM).unwrap().version;
        for _ in 0..3 {
            evaluate(&mut doc, &mut store, rules());
            assert_eq!(store.entry(SITE, FORM).unwrap().version, version);
        }

        let mut ids: Vec<&str> = store.get(SITE, FORM).iter().map(|f| f.webflow_id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["Extras", "Plan", "plan"]);
        for identifier in ["Plan", "plan"] {
            let known = store.find_by_any_identifier(SITE, FORM, identifier).unwrap();
            assert_eq!(known.technical_id, "Plan", "{}", identifier);
        }
    }

    #[test]
    fn remembered_identifiers_resolve_fields_the_page_no_longer_names() {
        let mut doc = Document::new();
        let form = doc.append(doc.root(), Element::new("form")).unwrap();
        let renamed = doc
            .append(form, Element::new("input").with_attr("id", "org-7"))
            .unwrap();
        let extras = doc
            .append(form, Element::new("input").with_attr("name", "Extras"))
            .unwrap();
        doc.hide(extras).unwrap();

        let mut store = FieldMappingStore::new();
        store.put(SITE, FORM, vec![field("org-7", "Company")]);

        let rules = vec![simple_rule("r1", "Company", "is_empty", "", "show", "Extras")];
        let report = evaluate(&mut doc, &mut store, rules);

        let outcome = report.outcome("r1").unwrap();
        assert!(outcome.met);
        assert_eq!(outcome.groups[0].value.as_deref(), Some(""));
        assert!(doc.is_rendered(extras));
        assert!(doc.is_rendered(renamed));
    }
}
