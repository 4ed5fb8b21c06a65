//! Core data models shared by the resolver, the upstream clients and the
//! HTTP/CLI surfaces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One pre-authored answer in the topic dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicEntry {
    pub id: String,
    pub triggers: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub related: Vec<String>,
}

/// Outcome of resolving a query against the topic dictionary.
///
/// `topic_id == None` is the no-match state and always carries a confidence
/// of `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub normalized_query: String,
    pub topic_id: Option<String>,
    pub confidence: f64,
}

impl MatchResult {
    pub fn no_match(normalized_query: String) -> Self {
        Self {
            normalized_query,
            topic_id: None,
            confidence: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.topic_id.is_some()
    }
}

/// Encyclopedia-style fallback answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalSummary {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub image: Option<String>,
    pub success: bool,
}

impl ExternalSummary {
    /// The `success = false` record returned for any failure.
    pub fn not_found(query: &str) -> Self {
        Self {
            title: query.to_string(),
            summary: String::new(),
            url: String::new(),
            image: None,
            success: false,
        }
    }
}

/// Current conditions for the configured location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_kmh: f64,
    pub weather_code: i64,
    pub success: bool,
    /// Last-known-good report served because the upstream just failed.
    pub stale: bool,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl WeatherReport {
    /// Typical dry-season values shown when nothing could be fetched.
    pub fn fallback() -> Self {
        Self {
            temperature_c: 28.0,
            humidity_pct: 70.0,
            wind_speed_kmh: 15.0,
            weather_code: 0,
            success: false,
            stale: false,
            fetched_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyRate {
    pub code: String,
    pub symbol: String,
    /// Dalasi per one unit of this currency.
    pub gmd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRates {
    pub rates: Vec<CurrencyRate>,
    pub success: bool,
    /// Served from the last good fetch after an upstream failure.
    pub stale: bool,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl ExchangeRates {
    pub fn fallback() -> Self {
        Self {
            rates: vec![
                CurrencyRate::new("EUR", "€", 70.0),
                CurrencyRate::new("USD", "$", 65.0),
                CurrencyRate::new("GBP", "£", 82.0),
            ],
            success: false,
            stale: false,
            fetched_at: None,
        }
    }

    pub fn get(&self, code: &str) -> Option<&CurrencyRate> {
        self.rates.iter().find(|r| r.code == code)
    }
}

impl CurrencyRate {
    pub fn new(code: &str, symbol: &str, gmd: f64) -> Self {
        Self {
            code: code.to_string(),
            symbol: symbol.to_string(),
            gmd,
        }
    }
}
