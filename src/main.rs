//! University bot - Entry Point
//!
//! Modes:
//! - Default: Telegram bot (long polling)
//! - --check: validate configuration and knowledge files, then exit

use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use unibot::{Config, KnowledgeStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Parse args
    let args: Vec<String> = std::env::args().collect();
    let check_mode = args.iter().any(|a| a == "--check");
    let help_mode = args.iter().any(|a| a == "--help" || a == "-h");

    if help_mode {
        println!("University bot v{}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Usage: unibot [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --check      Validate configuration and knowledge files, then exit");
        println!("  --help, -h   Show this help");
        println!();
        println!("Environment variables:");
        println!("  TELEGRAM_BOT_TOKEN      Telegram bot token (or BOT_TOKEN)");
        println!("  GEMINI_API_KEY          Gemini API key");
        println!("  GEMINI_MODEL            Model name (default: gemini-2.0-flash-lite)");
        println!("  AI_TIMEOUT_SECS         Generator deadline (default: 60)");
        println!("  KNOWLEDGE_FILE          Knowledge corpus (default: system.txt)");
        println!("  TEMPLATES_FILE          Templates, .json or .toml (default: templates.json)");
        println!("  BOT_DEFAULT_LANGUAGE    kk, ru or en (default: kk)");
        println!("  SESSION_CACHE_CAPACITY  Bound the session store (default: unbounded)");
        println!("  SESSION_IDLE_SECS       Idle expiry for bounded sessions (default: 86400)");
        println!("  LOG_FORMAT              Set to 'json' for JSON logs on stderr");
        return Ok(());
    }

    // Setup logging
    let log_level = std::env::var("RUST_LOG")
        .map(|s| match s.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        })
        .unwrap_or(Level::INFO);

    let json_logs = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_ansi(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let config = Config::from_env()?;
    let knowledge = KnowledgeStore::load(&config.templates_file, &config.knowledge_file)?;

    if check_mode {
        println!("Configuration OK");
        println!("  model:            {}", config.gemini_model);
        println!("  timeout:          {:?}", config.ai_timeout);
        println!("  default language: {}", config.default_language);
        println!(
            "  templates:        {} ({} entries)",
            config.templates_file.path.display(),
            knowledge.entries().len()
        );
        println!(
            "  corpus:           {} ({} chars)",
            config.knowledge_file.path.display(),
            knowledge.corpus().map(|c| c.chars().count()).unwrap_or(0)
        );
        match config.session_cache {
            Some(cache) => println!(
                "  sessions:         bounded, {} max, idle {:?}",
                cache.capacity, cache.idle
            ),
            None => println!("  sessions:         in-memory"),
        }
        return Ok(());
    }

    info!("University bot v{}", env!("CARGO_PKG_VERSION"));
    unibot::telegram::run_telegram_bot(config, Arc::new(knowledge)).await?;

    Ok(())
}
