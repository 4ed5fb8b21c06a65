//! Dalasi exchange rates via the Frankfurter API.
//!
//! Frankfurter publishes no GMD quote, so the euro rate is the configured
//! peg (`[exchange].gmd_per_eur`) and USD/GBP are derived through the
//! EUR→USD and EUR→GBP cross rates.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::config::ExchangeConfig;
use crate::models::{CurrencyRate, ExchangeRates};

#[derive(Deserialize)]
struct LatestResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

pub struct ExchangeClient {
    client: reqwest::Client,
    config: ExchangeConfig,
    cache: TtlCache<(), ExchangeRates>,
}

impl ExchangeClient {
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for exchange rates")?;

        Ok(Self {
            client,
            config: config.clone(),
            cache: TtlCache::new(1, Duration::from_secs(config.cache_ttl_secs)),
        })
    }

    /// GMD rates for EUR, USD and GBP. Never fails: after an upstream error
    /// the last good rates come back with `stale = true`, or the typical
    /// rates with `success = false` when nothing was fetched yet.
    pub async fn rates(&self) -> ExchangeRates {
        if let Some(rates) = self.cache.get_fresh(&()).await {
            return rates;
        }

        match self.fetch().await {
            Ok(rates) => {
                self.cache.insert((), rates.clone()).await;
                rates
            }
            Err(e) => {
                tracing::warn!("exchange rate lookup failed: {:#}", e);
                match self.cache.get_stale(&()).await {
                    Some(last) => ExchangeRates {
                        stale: true,
                        ..last
                    },
                    None => ExchangeRates::fallback(),
                }
            }
        }
    }

    async fn fetch(&self) -> Result<ExchangeRates> {
        let url = format!("{}/latest", self.config.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .query(&[("from", "EUR"), ("to", "USD,GBP")])
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("{} returned HTTP {}", url, status);
        }

        let body: LatestResponse = resp.json().await.context("invalid exchange JSON")?;
        Ok(derive_rates(self.config.gmd_per_eur, &body.rates))
    }
}

/// Convert EUR cross rates into GMD-per-unit rates.
fn derive_rates(gmd_per_eur: f64, eur_rates: &HashMap<String, f64>) -> ExchangeRates {
    let cross = |code: &str, default: f64| {
        eur_rates
            .get(code)
            .copied()
            .filter(|r| *r > 0.0)
            .unwrap_or(default)
    };

    ExchangeRates {
        rates: vec![
            CurrencyRate::new("EUR", "€", gmd_per_eur),
            CurrencyRate::new("USD", "$", gmd_per_eur / cross("USD", 1.1)),
            CurrencyRate::new("GBP", "£", gmd_per_eur / cross("GBP", 0.85)),
        ],
        success: true,
        stale: false,
        fetched_at: Some(Utc::now()),
    }
}
