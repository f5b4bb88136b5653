use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::Validate;

use pairplay::config::Settings;
use pairplay::models::{DecisionRequest, FeedRequest, UserProfile};
use pairplay::MatchError;

/// Explore discovery feeds and swipe outcomes over a JSON dataset.
#[derive(Parser, Debug)]
#[command(name = "pairplay", about = "PairPlay discovery and matching engine")]
pub struct CliArgs {
    /// Path to a config file (default: config/default.toml, config/local.toml)
    #[arg(long, env = "PAIRPLAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON dataset with `profiles` and optional scripted `decisions`
    #[arg(long)]
    pub dataset: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

impl CliArgs {
    /// Settings from `--config` (or `PAIRPLAY_CONFIG`), else the default file layering
    pub fn settings(&self) -> Result<Settings, CliError> {
        let settings = match &self.config {
            Some(path) => Settings::load_from(path)?,
            None => Settings::load()?,
        };
        Ok(settings)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one page of a user's feed, after applying scripted decisions
    Rank(RankArgs),
    /// Explain the compatibility score between two users
    Score {
        #[arg(long)]
        user: String,
        #[arg(long)]
        candidate: String,
    },
    /// Apply scripted decisions in order and print each outcome
    Replay,
}

#[derive(Args, Debug)]
pub struct RankArgs {
    #[arg(long)]
    pub user: String,
    #[arg(long, default_value = "1")]
    pub page: u32,
    /// Page size override (uses the configured size if not set)
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl From<&RankArgs> for FeedRequest {
    fn from(args: &RankArgs) -> Self {
        FeedRequest {
            user_id: args.user.clone(),
            page: args.page,
            page_size: args.page_size,
        }
    }
}

/// Profiles and decisions loaded from disk
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub profiles: Vec<UserProfile>,
    #[serde(default)]
    pub decisions: Vec<DecisionRequest>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path)?;
        let dataset: Dataset = serde_json::from_str(&raw)?;

        for decision in &dataset.decisions {
            decision.validate()?;
        }

        Ok(dataset)
    }
}

/// Errors that end the CLI
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Match(#[from] MatchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rank_command() {
        let args = CliArgs::parse_from([
            "pairplay", "--dataset", "data.json", "rank", "--user", "u1", "--page", "2",
        ]);

        let Command::Rank(rank) = &args.command else {
            panic!("expected rank command");
        };
        let request = FeedRequest::from(rank);
        assert_eq!(request.user_id, "u1");
        assert_eq!(request.page, 2);
        assert!(request.page_size.is_none());
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let args = CliArgs::parse_from([
            "pairplay",
            "--config",
            "does/not/exist.toml",
            "--dataset",
            "data.json",
            "replay",
        ]);

        assert!(matches!(args.settings(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_dataset_deserialize() {
        let json = r#"{
            "profiles": [{
                "userId": "u1",
                "sports": {"tennis": "beginner"},
                "latitude": 48.85,
                "longitude": 2.35,
                "searchRadiusKm": 15
            }],
            "decisions": [{"actorId": "u1", "targetId": "u2", "liked": true}]
        }"#;

        let dataset: Dataset = serde_json::from_str(json).unwrap();
        assert_eq!(dataset.profiles.len(), 1);
        assert_eq!(dataset.decisions[0].target_id, "u2");
    }
}
