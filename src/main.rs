//! Chatmoji - emoji recognition and shortcode substitution for chat text
//!
//! ```text
//!   $ chatmoji replace "gg :+1:"
//!   gg 👍
//! ```

use chatmoji_config::ConfigManager;
use chatmoji_core::{Emojis, Fragment, LoadReport, Platform};
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Chatmoji - find emoji in text and expand :shortcodes:
#[derive(Parser, Debug)]
#[command(name = "chatmoji")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Emoji dataset (emoji.json) to load instead of the configured one
    #[arg(short = 'd', long)]
    dataset: Option<PathBuf>,

    /// Preferred image platform (apple, google, twitter, facebook)
    #[arg(short = 'p', long)]
    platform: Option<Platform>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split text into literal runs and emoji
    Scan {
        /// Text to scan; lines are read from stdin when omitted
        text: Vec<String>,
    },
    /// Replace :shortcodes: with emoji
    Replace {
        /// Text to rewrite; lines are read from stdin when omitted
        text: Vec<String>,
    },
    /// Show an emoji by alias or unified code
    Lookup { query: String },
    /// List aliases starting with a prefix
    Complete {
        prefix: String,
        /// Maximum number of results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Load the dataset and report what was kept and dropped
    Stats,
    /// Rewrite and scan stdin lines, following config file changes
    Watch,
}

impl Command {
    /// Commands that still make sense with no emoji loaded
    fn allows_pass_through(&self) -> bool {
        matches!(self, Command::Scan { .. } | Command::Replace { .. })
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                format!("chatmoji={0},chatmoji_core={0},chatmoji_config={0}", log_level)
            }),
        ))
        .init();

    chatmoji_core::init()?;

    let mut manager = match args.config {
        Some(ref path) => ConfigManager::with_path(path)?,
        None => ConfigManager::new()?,
    };
    if let Some(platform) = args.platform {
        manager.update(|config| config.emoji.platform = platform);
    }
    let config = manager.config();

    let emojis = Arc::new(Emojis::new(
        config.emoji.platform,
        config.assets.to_sources(),
    ));
    let dataset = args
        .dataset
        .clone()
        .unwrap_or_else(|| config.emoji.dataset_path());
    let report = load_dataset(&emojis, &dataset, args.command.allows_pass_through())?;

    match args.command {
        Command::Scan { text } => {
            for line in input_lines(text)? {
                print_fragments(&emojis.parse(&line));
            }
        }
        Command::Replace { text } => {
            for line in input_lines(text)? {
                println!("{}", emojis.replace_short_codes(&line));
            }
        }
        Command::Lookup { query } => {
            let state = emojis.snapshot();
            let index = state.index();
            let id = index
                .by_short_code(query.trim_matches(':'))
                .or_else(|| index.by_unified_code(&query));
            match id.and_then(|id| Some((index.get(id)?, state.handle(id)?))) {
                Some((record, handle)) => {
                    println!("{}", record.literal);
                    println!("aliases:  {}", record.short_codes.join(", "));
                    println!("unified:  {}", record.unified_code);
                    println!("image:    {} ({})", handle.url, handle.platform);
                }
                None => {
                    eprintln!("No emoji named {}", query);
                    std::process::exit(1);
                }
            }
        }
        Command::Complete { prefix, limit } => {
            let limit = limit.unwrap_or(config.emoji.completion_limit);
            let state = emojis.snapshot();
            for short_code in state.index().complete(prefix.trim_start_matches(':'), limit) {
                println!(":{}:", short_code);
            }
        }
        Command::Stats => {
            println!("entries:  {}", report.entries);
            println!("records:  {}", report.records);
            println!("variants: {}", report.variants);
            println!("dropped:  {}", report.dropped.len());
            for dropped in &report.dropped {
                println!(
                    "  {} {} - {}",
                    dropped.alias.as_deref().unwrap_or("?"),
                    dropped.code.as_deref().unwrap_or("?"),
                    dropped.reason
                );
            }
        }
        Command::Watch => {
            let changes = manager.enable_hot_reload()?;
            let watcher_emojis = Arc::clone(&emojis);
            let mut current = config.clone();
            std::thread::spawn(move || {
                for next in changes {
                    if current.handles_changed(&next) {
                        watcher_emojis
                            .reconfigure(next.emoji.platform, Some(next.assets.to_sources()));
                    }
                    current = next;
                }
            });

            for line in std::io::stdin().lock().lines() {
                let line = emojis.replace_short_codes(&line?);
                print_fragments(&emojis.parse(&line));
            }
        }
    }

    Ok(())
}

/// Load the dataset; with `pass_through` a failure leaves the engine empty
fn load_dataset(emojis: &Emojis, path: &Path, pass_through: bool) -> anyhow::Result<LoadReport> {
    match emojis.load_file(path) {
        Ok(report) => {
            tracing::debug!("Loaded {} emoji from {}", report.records, path.display());
            Ok(report)
        }
        Err(err) if pass_through => {
            tracing::warn!("Continuing without emoji from {}: {}", path.display(), err);
            Ok(LoadReport::default())
        }
        Err(err) => Err(err.into()),
    }
}

/// Text from the command line, or stdin lines when none was given
fn input_lines(text: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !text.is_empty() {
        return Ok(vec![text.join(" ")]);
    }
    let lines = std::io::stdin().lock().lines().collect::<Result<_, _>>()?;
    Ok(lines)
}

fn print_fragments(fragments: &[Fragment]) {
    for fragment in fragments {
        match fragment {
            Fragment::Text(text) => println!("text  {:?}", text),
            Fragment::Emoji(handle) => println!(
                "emoji {} {} {}",
                handle.name,
                handle.tooltip.trim_end_matches("<br/>Emoji"),
                handle.url
            ),
        }
    }
}
