//! External summary providers.
//!
//! When the resolver has no usable answer the assistant asks a
//! [`SummaryProvider`] for an encyclopedia-style summary instead:
//! - **[`WikipediaProvider`]**: maps the query onto a known Gambia article
//!   and fetches its summary from the Wikipedia REST API.
//! - **[`DisabledSummaryProvider`]**: always reports `success = false`.
//!
//! Providers never return errors. Network failures, timeouts, non-200
//! responses and queries with no known article all come back as
//! [`ExternalSummary::not_found`], so callers can render a graceful
//! "nothing found" state.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::config::SummaryConfig;
use crate::dictionary::normalize_text;
use crate::models::ExternalSummary;

#[async_trait]
pub trait SummaryProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_summary(&self, topic: &str) -> ExternalSummary;
}

/// Create the provider named in `[summary].provider`.
pub fn create_summary_provider(config: &SummaryConfig) -> Result<Box<dyn SummaryProvider>> {
    match config.provider.as_str() {
        "wikipedia" => Ok(Box::new(WikipediaProvider::new(config)?)),
        "disabled" => Ok(Box::new(DisabledSummaryProvider)),
        other => anyhow::bail!("Unknown summary provider: {}", other),
    }
}

// ============ Disabled Provider ============

pub struct DisabledSummaryProvider;

#[async_trait]
impl SummaryProvider for DisabledSummaryProvider {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn fetch_summary(&self, topic: &str) -> ExternalSummary {
        ExternalSummary::not_found(topic)
    }
}

// ============ Wikipedia Provider ============

/// Keyword → article slug. Checked in order with the same symmetric
/// containment rule as the topic resolver; more specific keys come first.
const GAMBIA_ARTICLES: &[(&str, &str)] = &[
    ("serekunda", "Serekunda"),
    ("bakau", "Bakau"),
    ("brikama", "Brikama"),
    ("banjul", "Banjul"),
    ("kololi", "Kololi"),
    ("kotu", "Kotu_Stream"),
    ("bijilo", "Bijilo"),
    ("brufut", "Brufut"),
    ("gunjur", "Gunjur"),
    ("sanyang", "Sanyang"),
    ("soma", "Soma,_Gambia"),
    ("farafenni", "Farafenni"),
    ("basse", "Basse_Santa_Su"),
    ("janjanbureh", "Janjanbureh"),
    ("kunta kinteh island", "Kunta_Kinteh_Island"),
    ("james island", "Kunta_Kinteh_Island"),
    ("kunta kinteh", "Kunta_Kinte"),
    ("kunta kinte", "Kunta_Kinte"),
    ("gambia river", "Gambia_River"),
    ("history", "History_of_the_Gambia"),
    ("mandinka", "Mandinka_people"),
    ("wolof", "Wolof_people"),
    ("fula", "Fula_people"),
    ("tourism", "Tourism_in_the_Gambia"),
    ("culture", "Culture_of_the_Gambia"),
    ("abuko", "Abuko_Nature_Reserve"),
    ("makasutu", "Makasutu_Culture_Forest"),
    ("stone circles", "Stone_Circles_of_Senegambia"),
    ("wassu", "Wassu_Stone_Circles"),
    ("gambia", "The_Gambia"),
    ("the gambia", "The_Gambia"),
];

/// Article slugs for `query`, in table order, without duplicates.
pub fn candidate_articles(query: &str) -> Vec<&'static str> {
    let q = normalize_text(query);
    if q.is_empty() {
        return Vec::new();
    }

    let mut slugs: Vec<&'static str> = Vec::new();
    for &(key, slug) in GAMBIA_ARTICLES {
        if (q.contains(key) || key.contains(q.as_str())) && !slugs.contains(&slug) {
            slugs.push(slug);
        }
    }
    slugs
}

#[derive(Deserialize)]
struct WikiSummaryResponse {
    title: Option<String>,
    extract: Option<String>,
    content_urls: Option<WikiContentUrls>,
    thumbnail: Option<WikiThumbnail>,
}

#[derive(Deserialize)]
struct WikiContentUrls {
    desktop: Option<WikiPage>,
}

#[derive(Deserialize)]
struct WikiPage {
    page: Option<String>,
}

#[derive(Deserialize)]
struct WikiThumbnail {
    source: Option<String>,
}

/// Wikipedia REST summary client.
///
/// A query makes at most one request: the first article from
/// [`candidate_articles`], bounded by `[summary].timeout_secs`. Successful
/// summaries are cached per normalized query for `[summary].cache_ttl_secs`;
/// failures are not cached.
pub struct WikipediaProvider {
    client: reqwest::Client,
    base_url: String,
    cache: TtlCache<String, ExternalSummary>,
}

impl WikipediaProvider {
    pub fn new(config: &SummaryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client for summary provider")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache: TtlCache::new(
                config.cache_capacity,
                Duration::from_secs(config.cache_ttl_secs),
            ),
        })
    }

    async fn fetch_article(&self, slug: &str) -> Result<ExternalSummary> {
        let url = format!("{}/page/summary/{}", self.base_url, slug);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("{} returned HTTP {}", url, status);
        }

        let body: WikiSummaryResponse = resp
            .json()
            .await
            .with_context(|| format!("invalid summary JSON from {}", url))?;

        Ok(ExternalSummary {
            title: body.title.unwrap_or_else(|| slug.replace('_', " ")),
            summary: body.extract.unwrap_or_default(),
            url: body
                .content_urls
                .and_then(|c| c.desktop)
                .and_then(|d| d.page)
                .unwrap_or_else(|| format!("https://en.wikipedia.org/wiki/{}", slug)),
            image: body
                .thumbnail
                .and_then(|t| t.source)
                .filter(|s| !s.is_empty()),
            success: true,
        })
    }
}

#[async_trait]
impl SummaryProvider for WikipediaProvider {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn fetch_summary(&self, topic: &str) -> ExternalSummary {
        let key = normalize_text(topic);
        if let Some(hit) = self.cache.get_fresh(&key).await {
            return hit;
        }

        // One upstream call per query: only the first matching article.
        let Some(slug) = candidate_articles(&key).into_iter().next() else {
            return ExternalSummary::not_found(topic);
        };

        match self.fetch_article(slug).await {
            Ok(summary) => {
                self.cache.insert(key, summary.clone()).await;
                summary
            }
            Err(e) => {
                tracing::warn!(article = slug, "summary fetch failed: {:#}", e);
                ExternalSummary::not_found(topic)
            }
        }
    }
}
