//! Free-text query resolution against the topic dictionary.
//!
//! Defines the [`QueryResolver`] capability and its two implementations:
//! - **[`KeywordResolver`]**: symmetric substring matching over a shared
//!   [`TopicDictionary`].
//! - **[`NullResolver`]**: never matches; selected when the knowledge base is
//!   switched off so every query goes to the summary provider.
//!
//! # Matching
//!
//! The query is normalized (trim, lower-case, collapse whitespace). A topic
//! is a candidate when one of its triggers contains the query or the query
//! contains the trigger.
//!
//! | Match | Confidence |
//! |-------|------------|
//! | query equals a trigger | `1.0` |
//! | containment either way | `0.5` |
//! | none / empty query | `0.0`, no topic |
//!
//! An exact match anywhere in the dictionary beats a partial match earlier
//! in it. Among equals, dictionary order decides.
//!
//! ```rust
//! # use std::sync::Arc;
//! # use gambia_guide::dictionary::TopicDictionary;
//! # use gambia_guide::resolver::{KeywordResolver, QueryResolver};
//! let dict = Arc::new(TopicDictionary::bundled().unwrap());
//! let resolver = KeywordResolver::new(dict);
//! let m = resolver.resolve("  VISA ");
//! assert_eq!(m.topic_id.as_deref(), Some("visa"));
//! assert_eq!(m.confidence, 1.0);
//! ```

use std::sync::Arc;

use crate::config::Config;
use crate::dictionary::{normalize_text, TopicDictionary};
use crate::models::{MatchResult, TopicEntry};

pub const EXACT_CONFIDENCE: f64 = 1.0;
pub const PARTIAL_CONFIDENCE: f64 = 0.5;

/// Upper bound on [`QueryResolver::suggest_related`] results.
pub const MAX_RELATED: usize = 5;

/// Maps a free-text query to at most one topic.
///
/// Implementations are pure: the same query against the same dictionary
/// always yields the same [`MatchResult`], and "nothing found" is a value,
/// never an error.
pub trait QueryResolver: Send + Sync {
    fn resolve(&self, query: &str) -> MatchResult;

    /// Related topic ids declared by `topic_id`, in declaration order,
    /// at most [`MAX_RELATED`]. Unknown ids yield an empty list.
    fn suggest_related(&self, topic_id: &str) -> Vec<String>;

    fn topic(&self, topic_id: &str) -> Option<&TopicEntry>;

    fn topics(&self) -> &[TopicEntry];
}

// ============ Keyword Resolver ============

pub struct KeywordResolver {
    dictionary: Arc<TopicDictionary>,
    max_related: usize,
}

impl KeywordResolver {
    pub fn new(dictionary: Arc<TopicDictionary>) -> Self {
        Self {
            dictionary,
            max_related: MAX_RELATED,
        }
    }

    /// Lower the related-topic cap. Values above [`MAX_RELATED`] are clamped.
    pub fn with_max_related(mut self, max_related: usize) -> Self {
        self.max_related = max_related.min(MAX_RELATED);
        self
    }
}

impl QueryResolver for KeywordResolver {
    fn resolve(&self, query: &str) -> MatchResult {
        let normalized = normalize_text(query);
        if normalized.is_empty() {
            return MatchResult::no_match(normalized);
        }

        let entries = self.dictionary.entries();

        let exact = entries
            .iter()
            .find(|e| e.triggers.iter().any(|t| *t == normalized));
        if let Some(entry) = exact {
            return MatchResult {
                topic_id: Some(entry.id.clone()),
                confidence: EXACT_CONFIDENCE,
                normalized_query: normalized,
            };
        }

        let partial = entries.iter().find(|e| {
            e.triggers
                .iter()
                .any(|t| normalized.contains(t.as_str()) || t.contains(normalized.as_str()))
        });
        match partial {
            Some(entry) => MatchResult {
                topic_id: Some(entry.id.clone()),
                confidence: PARTIAL_CONFIDENCE,
                normalized_query: normalized,
            },
            None => MatchResult::no_match(normalized),
        }
    }

    fn suggest_related(&self, topic_id: &str) -> Vec<String> {
        self.dictionary
            .get(topic_id)
            .map(|e| e.related.iter().take(self.max_related).cloned().collect())
            .unwrap_or_default()
    }

    fn topic(&self, topic_id: &str) -> Option<&TopicEntry> {
        self.dictionary.get(topic_id)
    }

    fn topics(&self) -> &[TopicEntry] {
        self.dictionary.entries()
    }
}

// ============ Null Resolver ============

/// Resolver used when the knowledge base is disabled.
pub struct NullResolver;

impl QueryResolver for NullResolver {
    fn resolve(&self, query: &str) -> MatchResult {
        MatchResult::no_match(normalize_text(query))
    }

    fn suggest_related(&self, _topic_id: &str) -> Vec<String> {
        Vec::new()
    }

    fn topic(&self, _topic_id: &str) -> Option<&TopicEntry> {
        None
    }

    fn topics(&self) -> &[TopicEntry] {
        &[]
    }
}

/// Select the resolver for this process from `[knowledge]`.
pub fn create_resolver(config: &Config) -> Arc<dyn QueryResolver> {
    if !config.knowledge.enabled {
        tracing::info!("knowledge base disabled, using null resolver");
        return Arc::new(NullResolver);
    }

    let dictionary = Arc::new(TopicDictionary::load_or_empty(&config.knowledge));
    Arc::new(KeywordResolver::new(dictionary).with_max_related(config.retrieval.max_related))
}
