//! TOML configuration parsing.
//!
//! Every section is optional; missing keys fall back to the defaults below so
//! an empty file (or no file at all, see [`Config::default`]) yields a working
//! assistant backed by the bundled topics and the public upstream APIs.
//!
//! ```toml
//! [knowledge]
//! topics_path = "./data/topics.toml"
//!
//! [retrieval]
//! usable_confidence = 0.5
//!
//! [summary]
//! provider = "wikipedia"
//! timeout_secs = 10
//!
//! [server]
//! bind = "127.0.0.1:8510"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KnowledgeConfig {
    /// When false the assistant runs with the null resolver (every query
    /// falls through to the summary provider).
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Topics file to load instead of the bundled topics.
    #[serde(default)]
    pub topics_path: Option<PathBuf>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            topics_path: None,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_usable_confidence")]
    pub usable_confidence: f64,
    #[serde(default = "default_max_related")]
    pub max_related: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            usable_confidence: default_usable_confidence(),
            max_related: default_max_related(),
        }
    }
}

fn default_usable_confidence() -> f64 {
    0.5
}
fn default_max_related() -> usize {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct SummaryConfig {
    #[serde(default = "default_summary_provider")]
    pub provider: String,
    #[serde(default = "default_wikipedia_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_summary_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            provider: default_summary_provider(),
            base_url: default_wikipedia_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_summary_ttl(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl SummaryConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

fn default_summary_provider() -> String {
    "wikipedia".to_string()
}
fn default_wikipedia_url() -> String {
    "https://en.wikipedia.org/api/rest_v1".to_string()
}
fn default_user_agent() -> String {
    "GambiaTravelAssistant/1.0".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_summary_ttl() -> u64 {
    86_400
}
fn default_cache_capacity() -> usize {
    256
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_weather_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_weather_ttl(),
        }
    }
}

fn default_weather_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}
// Banjul
fn default_latitude() -> f64 {
    13.4549
}
fn default_longitude() -> f64 {
    -16.5790
}
fn default_weather_ttl() -> u64 {
    1_800
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExchangeConfig {
    #[serde(default = "default_exchange_url")]
    pub base_url: String,
    /// Dalasi per euro. The upstream API has no GMD quote, so USD and GBP
    /// are derived from this peg.
    #[serde(default = "default_gmd_per_eur")]
    pub gmd_per_eur: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_exchange_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_exchange_url(),
            gmd_per_eur: default_gmd_per_eur(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_exchange_ttl(),
        }
    }
}

fn default_exchange_url() -> String {
    "https://api.frankfurter.app".to_string()
}
fn default_gmd_per_eur() -> f64 {
    70.0
}
fn default_exchange_ttl() -> u64 {
    3_600
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8510".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if !(0.0..=1.0).contains(&config.retrieval.usable_confidence) {
        anyhow::bail!("retrieval.usable_confidence must be in [0.0, 1.0]");
    }

    match config.summary.provider.as_str() {
        "disabled" | "wikipedia" => {}
        other => anyhow::bail!(
            "Unknown summary provider: '{}'. Must be disabled or wikipedia.",
            other
        ),
    }

    if config.summary.cache_capacity == 0 {
        anyhow::bail!("summary.cache_capacity must be > 0");
    }

    if config.summary.timeout_secs == 0
        || config.weather.timeout_secs == 0
        || config.exchange.timeout_secs == 0
    {
        anyhow::bail!("timeout_secs must be > 0");
    }

    if config.exchange.gmd_per_eur <= 0.0 {
        anyhow::bail!("exchange.gmd_per_eur must be > 0");
    }

    Ok(())
}
