use super::text::{normalize, similarity, token_overlap};
use crate::dom::{Element, NodeId};

/// Attributes that carry an author-facing field name.
pub(crate) const NAME_ATTRIBUTES: [&str; 2] = ["data-name", "name"];

/// The identifying strings of one candidate element, read once per resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub node: NodeId,
    pub dom_id: Option<String>,
    pub names: Vec<String>,
}

impl Candidate {
    pub fn from_element(node: NodeId, element: &Element) -> Self {
        let mut names: Vec<String> = Vec::new();
        for attr in NAME_ATTRIBUTES {
            if let Some(name) = element.attr(attr).filter(|n| !n.is_empty()) {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        Self {
            node,
            dom_id: element.dom_id().map(str::to_string),
            names,
        }
    }

    /// Names followed by the DOM id.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .map(String::as_str)
            .chain(self.dom_id.as_deref())
    }
}

/// One step of the resolver cascade: a predicate over pre-filtered candidates.
pub trait MatchStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn matches(&self, identifier: &str, candidate: &Candidate) -> bool;
}

/// The element's canonical id equals the identifier.
pub struct ExactId;

impl MatchStrategy for ExactId {
    fn name(&self) -> &'static str {
        "exact-id"
    }
    fn matches(&self, identifier: &str, candidate: &Candidate) -> bool {
        candidate.dom_id.as_deref() == Some(identifier)
    }
}

/// The element's display name equals the identifier.
pub struct ExactName;

impl MatchStrategy for ExactName {
    fn name(&self) -> &'static str {
        "exact-name"
    }
    fn matches(&self, identifier: &str, candidate: &Candidate) -> bool {
        candidate.names.iter().any(|n| n == identifier)
    }
}

pub struct NormalizedName;

impl MatchStrategy for NormalizedName {
    fn name(&self) -> &'static str {
        "normalized-name"
    }
    fn matches(&self, identifier: &str, candidate: &Candidate) -> bool {
        let wanted = normalize(identifier);
        !wanted.is_empty() && candidate.labels().any(|l| normalize(l) == wanted)
    }
}

/// Case-insensitive containment in either direction.
pub struct Substring;

impl MatchStrategy for Substring {
    fn name(&self) -> &'static str {
        "substring"
    }
    fn matches(&self, identifier: &str, candidate: &Candidate) -> bool {
        let wanted = identifier.trim().to_lowercase();
        if wanted.is_empty() {
            return false;
        }
        candidate.labels().any(|label| {
            let label = label.trim().to_lowercase();
            !label.is_empty() && (label.contains(&wanted) || wanted.contains(&label))
        })
    }
}

/// Shared whitespace/hyphen tokens, relative to the shorter token set.
pub struct TokenOverlap {
    pub min_ratio: f64,
}

impl MatchStrategy for TokenOverlap {
    fn name(&self) -> &'static str {
        "token-overlap"
    }
    fn matches(&self, identifier: &str, candidate: &Candidate) -> bool {
        candidate
            .labels()
            .any(|l| token_overlap(identifier, l) >= self.min_ratio)
    }
}

/// Levenshtein similarity of the normalized forms.
pub struct Fuzzy {
    pub threshold: f64,
}

impl MatchStrategy for Fuzzy {
    fn name(&self) -> &'static str {
        "fuzzy"
    }
    fn matches(&self, identifier: &str, candidate: &Candidate) -> bool {
        let wanted = normalize(identifier);
        if wanted.is_empty() {
            return false;
        }
        candidate.labels().any(|l| {
            let label = normalize(l);
            !label.is_empty() && similarity(&wanted, &label) > self.threshold
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(dom_id: Option<&str>, names: &[&str]) -> Candidate {
        Candidate {
            node: NodeId(1),
            dom_id: dom_id.map(str::to_string),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[test]
    fn exact_strategies_are_case_sensitive() {
        let c = candidate(Some("email"), &["Email"]);
        assert!(ExactId.matches("email", &c));
        assert!(!ExactId.matches("Email", &c));
        assert!(ExactName.matches("Email", &c));
        assert!(!ExactName.matches("email", &c));
    }

    #[test]
    fn normalized_matches_across_separators() {
        let c = candidate(None, &["First_Name"]);
        assert!(NormalizedName.matches("first name", &c));
    }

    #[test]
    fn substring_ignores_empty_labels() {
        let c = candidate(None, &[" "]);
        assert!(!Substring.matches("email", &c));
        let c = candidate(None, &["Work Email"]);
        assert!(Substring.matches("email", &c));
    }

    #[test]
    fn fuzzy_threshold_is_strict() {
        let c = candidate(None, &["Phone Numbr"]);
        assert!(Fuzzy { threshold: 0.7 }.matches("Phone Number", &c));
        let c = candidate(None, &["Company"]);
        assert!(!Fuzzy { threshold: 0.7 }.matches("Country", &c));
    }
}
