//! Question answering for the presentation layer.
//!
//! The [`Assistant`] ties the resolver to the summary fallback:
//!
//! ```text
//!  query ──▶ QueryResolver ──confidence ≥ threshold──▶ Answer::KnowledgeBase
//!                │
//!                └── no usable match ──▶ SummaryProvider ──success──▶ Answer::Summary
//!                                               │
//!                                               └── failure ──▶ Answer::NotFound
//! ```
//!
//! Empty queries short-circuit to [`Answer::Empty`] without any network
//! call. The assistant holds no per-user state; anything page-specific
//! belongs to the caller.

use serde::Serialize;
use std::sync::Arc;

use crate::config::Config;
use crate::models::{ExternalSummary, MatchResult};
use crate::resolver::QueryResolver;
use crate::summary::SummaryProvider;

/// Suggestions shown when nothing could be found.
pub const EXAMPLE_QUERIES: &[&str] = &[
    "visa requirements",
    "is gambia safe",
    "best time to visit",
    "best beach",
    "hotels",
    "things to do",
];

/// Queries at least this long are titled from the matched topic instead.
const MAX_TITLE_QUERY_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedTopic {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Answer {
    KnowledgeBase {
        title: String,
        topic_id: String,
        confidence: f64,
        answer: String,
        related: Vec<RelatedTopic>,
    },
    Summary(ExternalSummary),
    NotFound {
        query: String,
        examples: Vec<String>,
    },
    Empty {
        examples: Vec<String>,
    },
}

pub struct Assistant {
    resolver: Arc<dyn QueryResolver>,
    summaries: Arc<dyn SummaryProvider>,
    usable_confidence: f64,
}

impl Assistant {
    pub fn new(
        resolver: Arc<dyn QueryResolver>,
        summaries: Arc<dyn SummaryProvider>,
        config: &Config,
    ) -> Self {
        Self {
            resolver,
            summaries,
            usable_confidence: config.retrieval.usable_confidence,
        }
    }

    pub fn resolver(&self) -> &dyn QueryResolver {
        self.resolver.as_ref()
    }

    pub fn resolve(&self, query: &str) -> MatchResult {
        self.resolver.resolve(query)
    }

    pub async fn answer(&self, query: &str) -> Answer {
        let matched = self.resolver.resolve(query);
        if matched.normalized_query.is_empty() {
            return Answer::Empty {
                examples: examples(),
            };
        }

        if let Some(answer) = self.knowledge_answer(query, &matched) {
            tracing::debug!(
                query = %matched.normalized_query,
                topic = ?matched.topic_id,
                confidence = matched.confidence,
                "answered from knowledge base"
            );
            return answer;
        }

        let summary = self.summaries.fetch_summary(query.trim()).await;
        if summary.success {
            tracing::debug!(query = %matched.normalized_query, provider = self.summaries.name(), "answered from summary provider");
            Answer::Summary(summary)
        } else {
            tracing::info!(query = %matched.normalized_query, "no answer found");
            Answer::NotFound {
                query: query.trim().to_string(),
                examples: examples(),
            }
        }
    }

    fn knowledge_answer(&self, query: &str, matched: &MatchResult) -> Option<Answer> {
        if matched.confidence < self.usable_confidence {
            return None;
        }
        let topic_id = matched.topic_id.as_deref()?;
        let entry = self.resolver.topic(topic_id)?;

        let query = query.trim();
        let title = if query.chars().count() < MAX_TITLE_QUERY_LEN {
            title_case(query)
        } else {
            topic_label(topic_id)
        };

        let related = self
            .resolver
            .suggest_related(topic_id)
            .into_iter()
            .map(|id| RelatedTopic {
                label: topic_label(&id),
                id,
            })
            .collect();

        Some(Answer::KnowledgeBase {
            title,
            topic_id: topic_id.to_string(),
            confidence: matched.confidence,
            answer: entry.answer.clone(),
            related,
        })
    }
}

fn examples() -> Vec<String> {
    EXAMPLE_QUERIES.iter().map(|s| s.to_string()).collect()
}

/// Display label for a topic id: `best_time` → `Best Time`.
pub fn topic_label(id: &str) -> String {
    title_case(&id.replace('_', " "))
}

/// Upper-case the first letter of every word, lower-case the rest.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
