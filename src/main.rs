use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use parsepal::config::AppConfig;
use parsepal::discovery::find_database_files;
use parsepal::logging::init_logging;
use parsepal::models::{AppKind, DirectionFilter, FilterSpec, Message};
use parsepal::session::{QueryResult, Session};
use parsepal::validation::InputValidator;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find database files under a directory
    Scan {
        /// Directory to search
        dir: PathBuf,

        /// File extension to look for (defaults to the configured one)
        #[arg(short, long)]
        extension: Option<String>,
    },
    /// List the contacts of a database
    Contacts {
        /// Database file
        db: PathBuf,

        /// Application preset (WhatsApp, Messenger, Telegram)
        #[arg(short, long)]
        app: Option<AppKind>,
    },
    /// Filter messages and show statistics and media
    Query {
        /// Database file
        db: PathBuf,

        /// Application preset (WhatsApp, Messenger, Telegram)
        #[arg(short, long)]
        app: Option<AppKind>,

        /// Case-insensitive text to search for in message bodies
        #[arg(short, long)]
        search: Option<String>,

        /// Message direction (all, sent, received)
        #[arg(short, long, default_value = "all")]
        direction: DirectionFilter,

        /// Start date for message range (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date for message range (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Contact to include; repeat for several
        #[arg(long = "contact")]
        contacts: Vec<String>,

        /// Keyword to count in the statistics
        #[arg(short, long)]
        keyword: Option<String>,

        /// Print one JSON document instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load_from(cli.config.as_deref())?;

    // Initialize logging
    let level = cli.log_level.clone().unwrap_or_else(|| config.get_log_level());
    let log_file = config.logging.file_path.as_deref().map(Path::new);
    let _guard = init_logging(Some(&level), log_file, &config.logging.format)?;

    info!("Starting parsepal");

    // Process command
    match cli.command {
        Commands::Scan { dir, extension } => {
            let extension = extension.unwrap_or_else(|| config.discovery.extension.clone());
            scan(&dir, &extension)
        },
        Commands::Contacts { db, app } => {
            let session = open_session(&config, &db, app)?;
            print_contacts(&session);
            Ok(())
        },
        Commands::Query {
            db,
            app,
            search,
            direction,
            from,
            to,
            contacts,
            keyword,
            json,
        } => {
            let session = open_session(&config, &db, app)?;
            let mut spec = FilterSpec::new().with_direction(direction).with_contacts(contacts);
            spec.search_text = search.map(|s| InputValidator::sanitize_text(&s));
            spec.date_from = from;
            spec.date_to = to;
            spec.keyword = keyword.filter(|k| !k.is_empty());

            let result = session.query(&spec);
            for warning in &result.warnings {
                warn!("{}", warning);
            }

            if json {
                print_json(&result)
            } else {
                print_report(&result);
                Ok(())
            }
        },
    }
}

/// Find database files and print one path per line
#[allow(clippy::print_stdout)]
fn scan(dir: &Path, extension: &str) -> Result<()> {
    InputValidator::validate_extension(extension)?;
    let files = find_database_files(dir, extension)?;
    info!("Found {} database files under {}", files.len(), dir.display());

    for file in files {
        println!("{}", file.display());
    }
    Ok(())
}

/// Open a database with the configured or requested application preset
fn open_session(config: &AppConfig, db: &Path, app: Option<AppKind>) -> Result<Session> {
    InputValidator::validate_database_path(db)?;
    let app = match app {
        Some(app) => app,
        None => config.extraction.app_kind()?,
    };

    Session::open(db, app, config.extraction.timestamp_units())
        .with_context(|| format!("Error parsing DB {}", db.display()))
}

#[allow(clippy::print_stdout)]
fn print_contacts(session: &Session) {
    for contact in session.contacts() {
        println!("{contact}");
    }
}

#[allow(clippy::print_stdout)]
fn print_json(result: &QueryResult) -> Result<()> {
    let document = serde_json::to_string_pretty(result).context("Failed to serialize query result")?;
    println!("{document}");
    Ok(())
}

fn format_message(message: &Message) -> String {
    format!(
        "{} | {} | {} | {}",
        message.contact.as_deref().unwrap_or("-"),
        message
            .timestamp
            .map_or_else(|| "-".to_string(), |ts| ts.format("%Y-%m-%d %H:%M:%S").to_string()),
        message.direction,
        message.body.as_deref().unwrap_or("")
    )
}

#[allow(clippy::print_stdout)]
fn print_report(result: &QueryResult) {
    println!("Messages ({})", result.messages.len());
    for message in &result.messages {
        println!("  {}", format_message(message));
    }

    let stats = &result.stats;
    println!();
    println!("Statistics Summary");
    println!("  Total Messages: {}", stats.total);
    println!("  Sent Messages: {}", stats.sent);
    println!("  Received Messages: {}", stats.received);
    if stats.unknown > 0 {
        println!("  Unknown Direction: {}", stats.unknown);
    }
    if let Some(keyword) = &stats.keyword {
        println!("  Occurrences of keyword '{}': {}", keyword, stats.keyword_occurrences);
    }
    println!("  Messages per Day:");
    for (date, count) in &stats.per_day {
        println!("    {date}: {count}");
    }

    println!();
    if result.media.entries.is_empty() {
        println!("No media found for current filter.");
        return;
    }
    println!("Media count per contact:");
    for (contact, count) in &result.media.counts_by_contact {
        println!("  {contact}: {count}");
    }
    println!("Media ({})", result.media.entries.len());
    for message in &result.media.entries {
        if let Some(media) = &message.media {
            println!(
                "  {} | {} | {} | {}",
                format_message(message),
                media.path,
                media.media_kind.as_deref().unwrap_or("-"),
                media.mime_type.as_deref().unwrap_or("-")
            );
        }
    }
}
