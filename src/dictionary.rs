//! The immutable topic dictionary.
//!
//! Built once at startup, either from the bundled `data/topics.toml` or from
//! a topics file named in `[knowledge].topics_path`, then shared by `Arc`
//! with every resolver. Load failures never stop the process: they are
//! logged and the dictionary degrades to empty, which makes every query a
//! no-match.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::config::KnowledgeConfig;
use crate::models::TopicEntry;

const BUNDLED_TOPICS: &str = include_str!("../data/topics.toml");

#[derive(Deserialize)]
struct TopicsFile {
    #[serde(default)]
    topics: Vec<TopicEntry>,
}

/// Ordered, read-only collection of [`TopicEntry`] values.
///
/// Trigger phrases are stored normalized (see [`normalize_text`]) so the
/// resolver can compare them directly against a normalized query.
#[derive(Debug, Clone, Default)]
pub struct TopicDictionary {
    entries: Vec<TopicEntry>,
}

impl TopicDictionary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a dictionary from entries, normalizing triggers and checking the
    /// entry invariants (unique non-empty id, at least one non-empty trigger,
    /// non-empty answer).
    pub fn from_entries(entries: Vec<TopicEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(entries.len());

        for mut entry in entries {
            entry.id = entry.id.trim().to_string();
            if entry.id.is_empty() {
                bail!("topic id must not be empty");
            }
            if !seen.insert(entry.id.clone()) {
                bail!("duplicate topic id: {}", entry.id);
            }

            entry.triggers = entry
                .triggers
                .iter()
                .map(|t| normalize_text(t))
                .filter(|t| !t.is_empty())
                .collect();
            if entry.triggers.is_empty() {
                bail!("topic '{}' has no non-empty trigger phrase", entry.id);
            }

            entry.answer = entry.answer.trim().to_string();
            if entry.answer.is_empty() {
                bail!("topic '{}' has an empty answer", entry.id);
            }

            entry.related = entry
                .related
                .iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();

            normalized.push(entry);
        }

        Ok(Self {
            entries: normalized,
        })
    }

    /// Parse a TOML document of `[[topics]]` tables.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let file: TopicsFile = toml::from_str(src).context("Failed to parse topics file")?;
        Self::from_entries(file.topics)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read topics file: {}", path.display()))?;
        Self::from_toml_str(&src)
    }

    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED_TOPICS)
    }

    /// Startup entry point. Never fails: any load error is logged and an
    /// empty dictionary is returned.
    pub fn load_or_empty(config: &KnowledgeConfig) -> Self {
        let loaded = match &config.topics_path {
            Some(path) => Self::from_path(path),
            None => Self::bundled(),
        };

        match loaded {
            Ok(dict) => {
                let warnings = dict.dangling_related();
                for (id, missing) in &warnings {
                    tracing::warn!(topic = %id, related = %missing, "related topic is not defined");
                }
                tracing::debug!(topics = dict.len(), "topic dictionary loaded");
                dict
            }
            Err(e) => {
                tracing::warn!("topic dictionary unavailable, continuing empty: {:#}", e);
                Self::empty()
            }
        }
    }

    pub fn entries(&self) -> &[TopicEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&TopicEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(topic, related_id)` pairs whose related id names no entry.
    fn dangling_related(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .flat_map(|e| {
                e.related
                    .iter()
                    .filter(|r| self.get(r).is_none())
                    .map(move |r| (e.id.clone(), r.clone()))
            })
            .collect()
    }
}

/// Trim, lower-case, and collapse internal whitespace runs to one space.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, triggers: &[&str], answer: &str) -> TopicEntry {
        TopicEntry {
            id: id.to_string(),
            triggers: triggers.iter().map(|s| s.to_string()).collect(),
            answer: answer.to_string(),
            related: vec![],
        }
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Do I   need a\tVISA?\n"), "do i need a visa?");
        assert_eq!(normalize_text("   "), "");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_bundled_topics_load() {
        let dict = TopicDictionary::bundled().unwrap();
        assert!(!dict.is_empty());
        assert_eq!(dict.entries()[0].id, "visa");
        assert!(dict.get("kunta_kinteh").is_some());
        assert!(dict.dangling_related().is_empty());
        for e in dict.entries() {
            assert!(e.related.len() <= 5, "{} declares too many related", e.id);
        }
    }

    #[test]
    fn test_triggers_are_normalized() {
        let dict =
            TopicDictionary::from_entries(vec![entry("a", &["  Best   BEACH ", ""], "x")]).unwrap();
        assert_eq!(dict.entries()[0].triggers, vec!["best beach"]);
    }

    #[test]
    fn test_rejects_entry_without_triggers() {
        let err = TopicDictionary::from_entries(vec![entry("a", &["  "], "x")]).unwrap_err();
        assert!(err.to_string().contains("no non-empty trigger"));
    }

    #[test]
    fn test_rejects_empty_answer() {
        assert!(TopicDictionary::from_entries(vec![entry("a", &["a"], " \n ")]).is_err());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = TopicDictionary::from_entries(vec![
            entry("visa", &["visa"], "x"),
            entry("visa", &["passport"], "y"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_load_or_empty_degrades_on_bad_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("topics.toml");
        std::fs::write(&path, "[[topics]]\nid = \"x\"\ntriggers = []\nanswer = \"y\"\n").unwrap();

        let config = KnowledgeConfig {
            enabled: true,
            topics_path: Some(path),
        };
        assert!(TopicDictionary::load_or_empty(&config).is_empty());
    }

    #[test]
    fn test_load_or_empty_missing_file() {
        let config = KnowledgeConfig {
            enabled: true,
            topics_path: Some("/nonexistent/topics.toml".into()),
        };
        assert!(TopicDictionary::load_or_empty(&config).is_empty());
    }
}
