use crate::config::ResolverConfig;
use crate::dom::{Document, NodeId};
use ahash::AHashMap;
use tracing::trace;

pub mod discovery;
pub mod fallback;
pub mod strategy;
pub mod text;

pub use discovery::discover_fields;
pub use fallback::{AlphanumericScan, AttributeEquivalent, DomFallback, SeparatorVariants, WrapperContainer};
pub use strategy::{
    Candidate, ExactId, ExactName, Fuzzy, MatchStrategy, NormalizedName, Substring, TokenOverlap,
};
pub use text::normalize;

/// Confidence carried by matches from the whole-document fallback chain.
pub const FALLBACK_CONFIDENCE: u8 = 1;

/// The winning element for an identifier, and how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub node: NodeId,
    /// `strategy_count - index` of the winning strategy. Higher is more literal.
    pub confidence: u8,
    pub strategy: &'static str,
}

/// Turns logical field identifiers into concrete elements.
///
/// Candidate strategies run in order and the first one that matches anything
/// wins, with ties broken by document order. Only when all of them come up
/// empty are the fallbacks tried, each scanning the full document.
pub struct Resolver {
    strategies: Vec<Box<dyn MatchStrategy>>,
    fallbacks: Vec<Box<dyn DomFallback>>,
}

pub struct ResolverBuilder {
    strategies: Vec<Box<dyn MatchStrategy>>,
    fallbacks: Vec<Box<dyn DomFallback>>,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
            fallbacks: Vec::new(),
        }
    }

    /// The six candidate strategies, most literal first.
    pub fn with_default_strategies(mut self, config: &ResolverConfig) -> Self {
        self.strategies.push(Box::new(ExactId));
        self.strategies.push(Box::new(ExactName));
        self.strategies.push(Box::new(NormalizedName));
        self.strategies.push(Box::new(Substring));
        self.strategies.push(Box::new(TokenOverlap {
            min_ratio: config.token_overlap_ratio,
        }));
        self.strategies.push(Box::new(Fuzzy {
            threshold: config.fuzzy_threshold,
        }));
        self
    }

    /// The live-page fallback chain.
    pub fn with_default_fallbacks(mut self, config: &ResolverConfig) -> Self {
        self.fallbacks.push(Box::new(AttributeEquivalent));
        self.fallbacks.push(Box::new(SeparatorVariants));
        self.fallbacks.push(Box::new(AlphanumericScan));
        self.fallbacks.push(Box::new(WrapperContainer {
            max_controls: config.wrapper_max_controls,
        }));
        self
    }

    pub fn with_strategy(mut self, strategy: Box<dyn MatchStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn with_fallback(mut self, fallback: Box<dyn DomFallback>) -> Self {
        self.fallbacks.push(fallback);
        self
    }

    pub fn build(self) -> Resolver {
        Resolver {
            strategies: self.strategies,
            fallbacks: self.fallbacks,
        }
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    /// Candidate strategies only, as used when authoring against a known field list.
    pub fn authoring(config: &ResolverConfig) -> Self {
        Self::builder().with_default_strategies(config).build()
    }

    /// Candidate strategies plus the whole-document fallback chain.
    pub fn live(config: &ResolverConfig) -> Self {
        Self::builder()
            .with_default_strategies(config)
            .with_default_fallbacks(config)
            .build()
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// Resolves `identifier` against `candidates`, then against the whole document.
    pub fn resolve(
        &self,
        doc: &Document,
        identifier: &str,
        candidates: &[NodeId],
    ) -> Option<Resolution> {
        if identifier.trim().is_empty() {
            return None;
        }

        let order: AHashMap<NodeId, usize> = doc
            .all()
            .into_iter()
            .enumerate()
            .map(|(position, node)| (node, position))
            .collect();
        let mut prepared: Vec<Candidate> = candidates
            .iter()
            .filter_map(|n| doc.get(*n).map(|e| Candidate::from_element(*n, e)))
            .collect();
        prepared.sort_by_key(|c| order.get(&c.node).copied().unwrap_or(usize::MAX));

        let total = self.strategies.len();
        for (index, strategy) in self.strategies.iter().enumerate() {
            if let Some(winner) = prepared.iter().find(|c| strategy.matches(identifier, c)) {
                trace!(identifier, strategy = strategy.name(), node = %winner.node, "resolved");
                return Some(Resolution {
                    node: winner.node,
                    confidence: u8::try_from(total - index).unwrap_or(u8::MAX),
                    strategy: strategy.name(),
                });
            }
        }

        self.fallbacks.iter().find_map(|fallback| {
            fallback.locate(identifier, doc).map(|node| {
                trace!(identifier, strategy = fallback.name(), node = %node, "resolved by fallback");
                Resolution {
                    node,
                    confidence: FALLBACK_CONFIDENCE,
                    strategy: fallback.name(),
                }
            })
        })
    }

    /// Resolves against every control in the document.
    pub fn resolve_in(&self, doc: &Document, identifier: &str) -> Option<Resolution> {
        self.resolve(doc, identifier, &doc.controls())
    }
}
