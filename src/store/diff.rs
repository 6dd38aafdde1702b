use super::SmartField;
use serde::Serialize;

/// One field whose identity survived between passes but whose details changed.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub before: SmartField,
    pub after: SmartField,
}

/// Classification of a fresh field set against the previously stored one.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingDiff {
    pub added: Vec<SmartField>,
    pub removed: Vec<SmartField>,
    pub renamed: Vec<FieldChange>,
    pub modified: Vec<FieldChange>,
}

impl MappingDiff {
    /// Compares `current` against `stored`. Each current field is matched to the
    /// stored field with its authored id, else to the first stored field sharing
    /// its technical id that no current field claims by authored id.
    pub fn between(stored: &[SmartField], current: &[SmartField]) -> Self {
        let mut diff = MappingDiff::default();
        let claimed = |s: &SmartField| current.iter().any(|c| c.same_authored_id(s));

        for field in current {
            let before = stored
                .iter()
                .find(|s| s.same_authored_id(field))
                .or_else(|| stored.iter().find(|s| !claimed(s) && s.identity_matches(field)));
            match before {
                None => diff.added.push(field.clone()),
                Some(before)
                    if before.display_name != field.display_name
                        || before.technical_id != field.technical_id =>
                {
                    diff.renamed.push(FieldChange {
                        before: before.clone(),
                        after: field.clone(),
                    })
                }
                Some(before)
                    if before.confidence != field.confidence || before.aliases != field.aliases =>
                {
                    diff.modified.push(FieldChange {
                        before: before.clone(),
                        after: field.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        diff.removed = stored
            .iter()
            .filter(|s| !current.iter().any(|c| c.identity_matches(s)))
            .cloned()
            .collect();

        diff
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.renamed.is_empty()
            && self.modified.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.renamed.len() + self.modified.len()
    }
}
