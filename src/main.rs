//! wordfreq - word frequency service
//!
//! Ranks the most frequent words of a block of text, either once from the
//! command line or continuously as the handler of the `word.frequency`
//! bus subject.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, I/O, bind failure, etc.)
//!   2 - The request was rejected (invalid --top-n)

mod analysis;
mod bus;
mod cli;
mod config;
mod error;
mod models;
mod report;

use anyhow::{Context, Result};
use bus::{BusServer, Router, WordFrequencyHandler};
use cli::{Args, InputSource, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::FrequencyRequest;
use std::io::Read;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("wordfreq v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let outcome = if args.serve {
        run_server(&args).await
    } else {
        run_once(&args)
    };

    match outcome {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("wordfreq failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .wordfreq.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("{} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so one-shot output on stdout stays clean.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        Config::load(config_path)?
    } else {
        match Config::load_default() {
            Ok(Some(config)) => {
                info!("Loaded default config from {}", CONFIG_FILE_NAME);
                config
            }
            Ok(None) => {
                debug!("No config file found, using defaults");
                Config::default()
            }
            Err(e) => {
                warn!("Failed to load config: {:#}", e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);
    Ok(config)
}

/// Run the bus listener until Ctrl+C or SIGTERM.
async fn run_server(args: &Args) -> Result<i32> {
    let config = load_config(args)?;

    let mut router = Router::new();
    router
        .subscribe(WordFrequencyHandler::new(config.bus.subject.clone()))
        .context("Failed to subscribe word frequency handler")?;

    let server = BusServer::bind(
        &config.bus.listen_addr,
        router,
        config.bus.max_message_bytes,
    )
    .await?
    .with_drain_timeout(Duration::from_secs(config.bus.shutdown_timeout_secs));

    server.run(shutdown_signal()).await?;

    info!("Bus listener stopped");
    Ok(0)
}

/// Analyze one block of text and print the ranking.
fn run_once(args: &Args) -> Result<i32> {
    let config = load_config(args)?;
    let top_n = config.analyzer.default_top_n;

    let request = FrequencyRequest::new(read_input(&args.input_source())?, top_n);
    let result = analysis::analyze_request(&request);

    let rendered = match args.format {
        OutputFormat::Json => report::generate_json_report(&result)?,
        OutputFormat::Markdown => report::generate_markdown_report(&result, top_n),
    };

    match args.output {
        Some(ref path) => {
            report::write_report(&rendered, path)?;
            info!("Report saved to: {}", path.display());
        }
        None => println!("{}", rendered),
    }

    if result.is_error() {
        warn!("Request rejected: {}", result.error.as_deref().unwrap_or_default());
        return Ok(2);
    }

    Ok(0)
}

/// Read the text to analyze.
fn read_input(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Text(text) => Ok(text.clone()),
        InputSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        InputSource::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read text from stdin")?;
            Ok(text)
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
