//! # Gambia Travel Assistant CLI (`tgta`)
//!
//! Answers visitor questions from the terminal and serves the JSON API used
//! by the browser front end.
//!
//! ## Usage
//!
//! ```bash
//! tgta --config ./config/tgta.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tgta ask "<question>"` | Answer a question (topics, then Wikipedia) |
//! | `tgta resolve "<question>"` | Show the raw topic match |
//! | `tgta related <id>` | Related topics for a topic id |
//! | `tgta topics` | List all topics |
//! | `tgta guide <id>` | Print a topic's full guide text |
//! | `tgta weather` | Current weather in Banjul |
//! | `tgta rates` | Dalasi exchange rates |
//! | `tgta serve` | Start the HTTP server |
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (default `warn` for commands, `info` for `serve`).

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use gambia_guide::assistant::{Answer, Assistant};
use gambia_guide::config::{self, Config};
use gambia_guide::exchange::ExchangeClient;
use gambia_guide::resolver::{create_resolver, QueryResolver};
use gambia_guide::server;
use gambia_guide::summary::{create_summary_provider, SummaryProvider};
use gambia_guide::weather::{weather_icon, WeatherClient};

const DEFAULT_CONFIG: &str = "./config/tgta.toml";

/// The Gambia Travel Assistant.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the default file does not exist, built-in defaults are used.
#[derive(Parser)]
#[command(
    name = "tgta",
    about = "The Gambia Travel Assistant: answers visitor questions from a curated topic list with a Wikipedia fallback",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Defaults to `./config/tgta.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a free-text question.
    ///
    /// Tries the topic dictionary first; when nothing usable matches,
    /// looks up a Wikipedia summary.
    Ask {
        /// The question, e.g. "do I need a visa".
        query: String,
    },

    /// Show how a question resolves against the topic dictionary.
    Resolve { query: String },

    /// List the related topics declared for a topic id.
    Related { id: String },

    /// List all topics and their trigger phrases.
    Topics,

    /// Print the full guide text for a topic id (e.g. `visa`, `money`).
    Guide { id: String },

    /// Show the current weather in Banjul.
    Weather,

    /// Show Dalasi exchange rates for EUR, USD and GBP.
    Rates,

    /// Start the HTTP server on `[server].bind`.
    Serve,
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file. Built-in defaults are used only when `--config`
/// was not given and the default file is absent; an explicit `--config`
/// that cannot be read is an error.
fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return config::load_config(path);
    }

    let path = Path::new(DEFAULT_CONFIG);
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    config::load_config(path)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Serve => "info",
        _ => "warn",
    };
    init_logging(default_level);

    let cfg = load(cli.config.as_deref())?;

    match cli.command {
        Commands::Ask { query } => {
            let resolver = create_resolver(&cfg);
            let summaries: Arc<dyn SummaryProvider> =
                Arc::from(create_summary_provider(&cfg.summary)?);
            let assistant = Assistant::new(resolver, summaries, &cfg);
            print_answer(&assistant.answer(&query).await);
        }
        Commands::Resolve { query } => {
            let resolver = create_resolver(&cfg);
            let m = resolver.resolve(&query);
            println!("query:      {}", m.normalized_query);
            match m.topic_id {
                Some(id) => {
                    println!("topic:      {}", id);
                    println!("confidence: {:.2}", m.confidence);
                }
                None => println!("topic:      (no match)"),
            }
        }
        Commands::Related { id } => {
            let resolver = create_resolver(&cfg);
            let related = resolver.suggest_related(&id);
            if related.is_empty() {
                println!("No related topics.");
            }
            for r in related {
                println!("{}", r);
            }
        }
        Commands::Topics => {
            let resolver = create_resolver(&cfg);
            list_topics(resolver.as_ref());
        }
        Commands::Guide { id } => {
            let resolver = create_resolver(&cfg);
            match resolver.topic(&id) {
                Some(entry) => println!("{}", entry.answer),
                None => {
                    eprintln!("Error: topic not found: {}", id);
                    std::process::exit(1);
                }
            }
        }
        Commands::Weather => {
            let report = WeatherClient::new(&cfg.weather)?.current().await;
            println!(
                "{} {:.1}°C  humidity {:.0}%  wind {:.0} km/h",
                weather_icon(report.weather_code),
                report.temperature_c,
                report.humidity_pct,
                report.wind_speed_kmh
            );
            if report.stale {
                println!("(live data unavailable, showing last known values)");
            } else if !report.success {
                println!("(live data unavailable, showing typical values)");
            }
        }
        Commands::Rates => {
            let rates = ExchangeClient::new(&cfg.exchange)?.rates().await;
            for r in &rates.rates {
                println!("1 {} ({}) = {:.2} GMD", r.code, r.symbol, r.gmd);
            }
            if rates.stale {
                println!("(live rates unavailable, showing last known values)");
            } else if !rates.success {
                println!("(live rates unavailable, showing typical values)");
            }
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}

fn list_topics(resolver: &dyn QueryResolver) {
    let topics = resolver.topics();
    if topics.is_empty() {
        println!("No topics loaded.");
        return;
    }
    for t in topics {
        println!("{:<16} {}", t.id, t.triggers.join(", "));
    }
}

fn print_answer(answer: &Answer) {
    match answer {
        Answer::KnowledgeBase {
            title,
            answer,
            related,
            ..
        } => {
            println!("# {}\n", title);
            println!("{}", answer);
            if !related.is_empty() {
                println!("\nRelated questions:");
                for r in related {
                    println!("  - {} ({})", r.label, r.id);
                }
            }
        }
        Answer::Summary(s) => {
            println!("# {}\n", s.title);
            println!("{}", s.summary);
            println!("\nSource: {}", s.url);
        }
        Answer::NotFound { query, examples } => {
            println!("I couldn't find specific information about '{}'.", query);
            print_examples(examples);
        }
        Answer::Empty { examples } => {
            println!("Ask me anything about The Gambia.");
            print_examples(examples);
        }
    }
}

fn print_examples(examples: &[String]) {
    println!("\nTry asking about:");
    for e in examples {
        println!("  - {}", e);
    }
}
