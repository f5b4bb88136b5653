mod cli;

use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use validator::Validate;

use cli::{CliArgs, CliError, Command, Dataset};
use pairplay::config::{LoggingSettings, Settings};
use pairplay::models::{DecisionResponse, ErrorResponse, FeedRequest};
use pairplay::{DiscoveryEngine, InMemoryLedger, InMemoryProfiles};

type Engine = DiscoveryEngine<InMemoryProfiles, Arc<InMemoryLedger>, Arc<InMemoryLedger>>;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    // Logs go to stderr so stdout stays machine-readable
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Apply scripted decisions, printing one JSON line per outcome
fn replay(engine: &Engine, dataset: &Dataset, echo: bool) -> Result<(), CliError> {
    for request in &dataset.decisions {
        let line = match engine.record_decision(&request.actor_id, &request.target_id, request.liked) {
            Ok(outcome) => serde_json::to_string(&DecisionResponse::from(outcome))?,
            Err(e) => {
                error!(
                    "Decision {} -> {} failed: {}",
                    request.actor_id, request.target_id, e
                );
                serde_json::to_string(&ErrorResponse::from(&e))?
            }
        };

        if echo {
            println!("{}", line);
        }
    }

    Ok(())
}

fn run(args: CliArgs, settings: Settings) -> Result<(), CliError> {
    let dataset = Dataset::load(&args.dataset)?;
    info!(
        "Loaded {} profiles and {} scripted decisions from {}",
        dataset.profiles.len(),
        dataset.decisions.len(),
        args.dataset.display()
    );

    let profiles = InMemoryProfiles::new(dataset.profiles.clone());
    let pool = match &args.command {
        Command::Rank(rank) => profiles.pool_for(&rank.user),
        _ => Vec::new(),
    };
    let ledger = Arc::new(InMemoryLedger::new());
    let engine: Engine = DiscoveryEngine::new(
        settings.matching_config()?,
        profiles,
        Arc::clone(&ledger),
        ledger,
    )?;

    match &args.command {
        Command::Rank(rank) => {
            let request = FeedRequest::from(rank);
            request.validate()?;

            replay(&engine, &dataset, false)?;

            let feed = engine.rank(&request.user_id, &pool, request.page, request.page_size)?;
            print_json(&feed)
        }
        Command::Score { user, candidate } => {
            let score = engine.score(user, candidate)?;
            print_json(&score)
        }
        Command::Replay => {
            replay(&engine, &dataset, true)?;
            info!("Replay finished with {} matches", engine.ledger().match_count()?);
            Ok(())
        }
    }
}

fn main() {
    // Load .env file if present
    dotenv::dotenv().ok();

    let args = CliArgs::parse();

    let settings = match args.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    init_logging(&settings.logging);
    info!("Starting PairPlay matching engine...");

    if let Err(e) = run(args, settings) {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
