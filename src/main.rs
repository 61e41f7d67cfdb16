//! Playlist Scraper main entry point
//!
//! This is the command-line interface for scraping video playlists, either
//! once from the shell or as an HTTP service.

use anyhow::Context;
use clap::{Parser, Subcommand};
use playlist_scraper::config::{load_config_with_hash, validate, Config};
use playlist_scraper::crawler::scrape_playlist;
use playlist_scraper::output::{print_statistics, PlaylistStatistics};
use playlist_scraper::storage::SqliteStorage;
use playlist_scraper::url::validate_playlist_url;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Playlist Scraper: video metadata from every page of a playlist
///
/// Drives a headless browser through a WebDriver server, scrolls each
/// playlist page until it is fully loaded, and collects title, views and
/// thumbnail for every video.
#[derive(Parser, Debug)]
#[command(name = "playlist-scraper")]
#[command(version)]
#[command(about = "Scrapes video metadata from playlists", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape one playlist and print the result as JSON
    Scrape {
        /// Playlist URL (must carry a `list` parameter)
        url: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Print playlist statistics after the JSON output
        #[arg(long)]
        stats: bool,

        /// Validate config and URL without starting a browser
        #[arg(long)]
        dry_run: bool,
    },

    /// Serve the HTTP API
    Serve {
        /// Address to listen on, overriding the config file
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(cli.config.as_ref())?;

    match cli.command {
        Command::Scrape {
            url,
            pretty,
            stats,
            dry_run,
        } => {
            if dry_run {
                handle_dry_run(&config, &url)
            } else {
                handle_scrape(&config, &url, pretty, stats).await
            }
        }
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
                validate(&config).context("invalid --bind address")?;
            }
            handle_serve(config).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("playlist_scraper=info,warn"),
            1 => EnvFilter::new("playlist_scraper=debug,info"),
            2 => EnvFilter::new("playlist_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file, or the defaults when none is given
fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Ok(Config::default())
        }
    }
}

fn open_store(config: &Config) -> anyhow::Result<Arc<Mutex<SqliteStorage>>> {
    let storage = SqliteStorage::open(&config.storage.database_path)
        .with_context(|| format!("failed to open {}", config.storage.database_path))?;
    Ok(Arc::new(Mutex::new(storage)))
}

/// Handles --dry-run: shows what would be scraped
fn handle_dry_run(config: &Config, url: &str) -> anyhow::Result<()> {
    let request = validate_playlist_url(url)?;

    println!("=== Playlist Scraper Dry Run ===\n");

    println!("Playlist:");
    println!("  URL: {}", request.url);
    println!("  List id: {}", request.playlist_id);

    println!("\nCrawler:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Selector timeout: {}ms", config.crawler.selector_timeout_ms);
    println!(
        "  Scroll settle/budget: {}ms / {}ms ({} iterations max)",
        config.crawler.scroll_settle_ms,
        config.crawler.scroll_budget_ms,
        config.crawler.max_scroll_iterations()
    );
    match config.crawler.session_deadline_secs {
        Some(secs) => println!("  Session deadline: {}s", secs),
        None => println!("  Session deadline: none"),
    }

    println!("\nWebDriver:");
    println!("  Endpoint: {}", config.webdriver.endpoint);
    println!(
        "  Browser: {} (headless: {})",
        config.webdriver.browser, config.webdriver.headless
    );

    println!("\nSelectors:");
    println!("  Video item: {}", config.selectors.video_item);
    println!("  Title: {}", config.selectors.title);
    println!("  Views: {}", config.selectors.views);
    println!("  Thumbnail: {}", config.selectors.thumbnail);
    println!("  Next page: {}", config.selectors.next_page);

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape up to {} pages", config.crawler.max_pages);

    Ok(())
}

/// Handles the scrape subcommand
async fn handle_scrape(config: &Config, url: &str, pretty: bool, stats: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;

    let result = match scrape_playlist(config, store, url).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            return Err(e.into());
        }
    };

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);

    if stats {
        println!();
        print_statistics(&PlaylistStatistics::from_result(&result));
    }

    Ok(())
}

/// Handles the serve subcommand
async fn handle_serve(config: Config) -> anyhow::Result<()> {
    let store = open_store(&config)?;
    playlist_scraper::server::serve(config, store)
        .await
        .context("server failed")
}
