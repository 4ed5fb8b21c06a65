//! # Gambia Guide
//!
//! The Gambia Travel Assistant: answers visitor questions from a curated
//! topic dictionary, falls back to Wikipedia summaries, and serves live
//! weather and Dalasi exchange rates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌───────────────┐   ┌──────────────────┐
//! │ topics.toml │──▶│ QueryResolver │──▶│    Assistant     │
//! └─────────────┘   └───────────────┘   │ threshold, then  │
//!                                       │ summary fallback │
//!                 ┌─────────────────┐   └────────┬─────────┘
//!                 │ SummaryProvider │◀───────────┤
//!                 └─────────────────┘            ▼
//!                                   ┌──────────┐   ┌──────────┐
//!                                   │   CLI    │   │   HTTP   │
//!                                   │  (tgta)  │   │  (axum)  │
//!                                   └──────────┘   └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`dictionary`] | Immutable topic dictionary |
//! | [`resolver`] | Query → topic matching |
//! | [`cache`] | TTL cache with stale fallback |
//! | [`summary`] | Wikipedia summary fallback |
//! | [`weather`] | Open-Meteo current conditions |
//! | [`exchange`] | Dalasi exchange rates |
//! | [`assistant`] | Answer orchestration |
//! | [`server`] | HTTP API |

pub mod assistant;
pub mod cache;
pub mod config;
pub mod dictionary;
pub mod exchange;
pub mod models;
pub mod resolver;
pub mod server;
pub mod summary;
pub mod weather;
