use ahash::AHashMap;
use chrono::{DateTime, Utc};
use tracing::debug;

mod diff;
mod smart_field;

pub use diff::{FieldChange, MappingDiff};
pub use smart_field::SmartField;

/// The fields last resolved for one (site, form).
#[derive(Debug, Clone)]
pub struct MappingEntry {
    pub fields: Vec<SmartField>,
    pub last_updated: DateTime<Utc>,
    /// Increases by exactly one on every write.
    pub version: u64,
}

type StoreKey = (String, String);

fn key(site: &str, form: &str) -> StoreKey {
    (site.to_string(), form.to_string())
}

/// In-memory cache of resolved fields, keyed by (site, form).
///
/// The store is an owned value handed to the evaluator by `&mut`; it is not
/// shared across threads. Versions keep counting across [`clear`](Self::clear)
/// so a cleared-then-rewritten entry never reuses an old version.
#[derive(Debug, Default)]
pub struct FieldMappingStore {
    entries: AHashMap<StoreKey, MappingEntry>,
    versions: AHashMap<StoreKey, u64>,
}

impl FieldMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the entry, bumps its version and stamps the write time.
    pub fn put(&mut self, site: &str, form: &str, fields: Vec<SmartField>) -> u64 {
        let key = key(site, form);
        let version = self.versions.get(&key).copied().unwrap_or(0) + 1;
        self.versions.insert(key.clone(), version);
        debug!(site, form, version, fields = fields.len(), "mapping store write");
        self.entries.insert(
            key,
            MappingEntry {
                fields,
                last_updated: Utc::now(),
                version,
            },
        );
        version
    }

    /// Stored fields, or an empty slice when nothing was stored.
    pub fn get(&self, site: &str, form: &str) -> &[SmartField] {
        self.entries
            .get(&key(site, form))
            .map(|e| e.fields.as_slice())
            .unwrap_or(&[])
    }

    pub fn entry(&self, site: &str, form: &str) -> Option<&MappingEntry> {
        self.entries.get(&key(site, form))
    }

    /// Diffs `current` against what is stored now. Must run before the matching `put`.
    pub fn diff(&self, site: &str, form: &str, current: &[SmartField]) -> MappingDiff {
        MappingDiff::between(self.get(site, form), current)
    }

    /// Diff, then write if anything changed (or nothing was stored yet).
    pub fn sync(&mut self, site: &str, form: &str, current: Vec<SmartField>) -> MappingDiff {
        let diff = self.diff(site, form, &current);
        if !diff.is_empty() || self.entry(site, form).is_none() {
            self.put(site, form, current);
        }
        diff
    }

    /// Merges one freshly resolved field into the stored set and syncs.
    ///
    /// Entries are kept per authored identifier, so two identifiers reaching
    /// the same control each keep their own mapping. A field seen before keeps
    /// its stored aliases, since aliases are only generated on the first
    /// successful resolution.
    pub fn record(&mut self, site: &str, form: &str, mut field: SmartField) -> MappingDiff {
        let mut current = self.get(site, form).to_vec();
        match current.iter_mut().find(|f| f.same_authored_id(&field)) {
            Some(existing) => {
                if !existing.aliases.is_empty() {
                    field.aliases = existing.aliases.clone();
                }
                *existing = field;
            }
            None => current.push(field),
        }
        self.sync(site, form, current)
    }

    pub fn find_by_any_identifier(
        &self,
        site: &str,
        form: &str,
        identifier: &str,
    ) -> Option<&SmartField> {
        self.get(site, form).iter().find(|f| f.answers_to(identifier))
    }

    /// Drops every form entry of `site`.
    pub fn clear(&mut self, site: &str) {
        self.entries.retain(|(s, _), _| s != site);
        debug!(site, "mapping store cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
