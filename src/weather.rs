//! Live weather from the Open-Meteo forecast API.
//!
//! Reads go through a one-slot [`TtlCache`]. When the upstream call fails the
//! last-known-good report is served with `stale = true`; with nothing cached,
//! the dry-season [`WeatherReport::fallback`] is returned with
//! `success = false`.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::config::WeatherConfig;
use crate::models::WeatherReport;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";

#[derive(Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: Option<CurrentConditions>,
}

#[derive(Deserialize)]
struct CurrentConditions {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    weather_code: Option<i64>,
    wind_speed_10m: Option<f64>,
}

pub struct WeatherClient {
    client: reqwest::Client,
    config: WeatherConfig,
    cache: TtlCache<(), WeatherReport>,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for weather")?;

        Ok(Self {
            client,
            config: config.clone(),
            cache: TtlCache::new(1, Duration::from_secs(config.cache_ttl_secs)),
        })
    }

    /// Current conditions. Never fails.
    pub async fn current(&self) -> WeatherReport {
        if let Some(report) = self.cache.get_fresh(&()).await {
            return report;
        }

        match self.fetch().await {
            Ok(report) => {
                self.cache.insert((), report.clone()).await;
                report
            }
            Err(e) => {
                tracing::warn!("weather lookup failed: {:#}", e);
                match self.cache.get_stale(&()).await {
                    Some(last) => WeatherReport {
                        stale: true,
                        ..last
                    },
                    None => WeatherReport::fallback(),
                }
            }
        }
    }

    async fn fetch(&self) -> Result<WeatherReport> {
        let url = format!("{}/forecast", self.config.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("latitude", self.config.latitude.to_string()),
                ("longitude", self.config.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("timezone", "GMT".to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("{} returned HTTP {}", url, status);
        }

        let body: ForecastResponse = resp.json().await.context("invalid forecast JSON")?;
        let current = body
            .current
            .ok_or_else(|| anyhow::anyhow!("forecast response has no current conditions"))?;

        let fallback = WeatherReport::fallback();
        Ok(WeatherReport {
            temperature_c: current.temperature_2m.unwrap_or(fallback.temperature_c),
            humidity_pct: current.relative_humidity_2m.unwrap_or(fallback.humidity_pct),
            wind_speed_kmh: current.wind_speed_10m.unwrap_or(fallback.wind_speed_kmh),
            weather_code: current.weather_code.unwrap_or(fallback.weather_code),
            success: true,
            stale: false,
            fetched_at: Some(Utc::now()),
        })
    }
}

/// Emoji for a WMO weather interpretation code.
pub fn weather_icon(code: i64) -> &'static str {
    match code {
        0 => "☀️",
        1..=3 => "⛅",
        45 | 48 => "🌫️",
        51 | 53 | 55 | 61 | 63 | 65 | 80 | 81 | 82 => "🌧️",
        95 | 96 | 99 => "⛈️",
        _ => "🌤️",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_icon() {
        assert_eq!(weather_icon(0), "☀️");
        assert_eq!(weather_icon(2), "⛅");
        assert_eq!(weather_icon(48), "🌫️");
        assert_eq!(weather_icon(63), "🌧️");
        assert_eq!(weather_icon(99), "⛈️");
        assert_eq!(weather_icon(7), "🌤️");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_returns_fallback() {
        let config = WeatherConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..WeatherConfig::default()
        };
        let client = WeatherClient::new(&config).unwrap();
        let report = client.current().await;
        assert_eq!(report, WeatherReport::fallback());
    }
}
