mod activity_cmd;
mod config_cmd;
mod detect_cmd;
mod session_cmd;
mod suggest_cmd;
mod terminal_output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use petpal_config::defaults::{DEFAULT_LOG_DIR, DEFAULT_LOG_LEVEL};
use petpal_config::{config_dir, config_file_path, load_and_prepare};

#[derive(Parser)]
#[command(name = "petpal")]
#[command(about = "PetPal+, a virtual sidekick for looking after your pet")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.petpal/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the pet's mood from one image
    Detect {
        #[arg(long)]
        image: PathBuf,
    },
    /// Suggest one pet-care task
    Suggest {
        /// Mood label to suggest for (happy, sad, excited, calm, tired, hungry)
        #[arg(long)]
        mood: Option<String>,
        /// Confidence of that mood, 0..1
        #[arg(long, requires = "mood")]
        confidence: Option<f32>,
    },
    /// Ask for an activity idea
    Activity {
        #[arg(long)]
        mood: String,
        /// morning, afternoon, evening or night (default: from the clock)
        #[arg(long)]
        time_of_day: Option<String>,
        #[arg(long)]
        weather: Option<String>,
    },
    /// Run an interactive sidekick session
    Session {
        /// Directory of images to replay as the camera feed
        #[arg(long)]
        frames: Option<PathBuf>,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the resolved config with secrets redacted
    Show,
    /// Write a config file populated with defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));

    // Init must work even when the existing file does not load.
    if let Commands::Config {
        action: ConfigAction::Init { force },
    } = cli.command
    {
        return config_cmd::init(&path, force).await;
    }

    let config = load_and_prepare(&path).await?;
    let logging_cfg = config.logging();
    logging::init_logger(
        logging_cfg.dir.as_deref().unwrap_or(DEFAULT_LOG_DIR),
        logging_cfg.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL),
    );
    debug!(path = %path.display(), "Config loaded");

    match cli.command {
        Commands::Detect { image } => detect_cmd::run(&config, &image).await,
        Commands::Suggest { mood, confidence } => {
            suggest_cmd::run(&config, mood.as_deref(), confidence).await
        }
        Commands::Activity {
            mood,
            time_of_day,
            weather,
        } => activity_cmd::run(&config, &mood, time_of_day.as_deref(), weather.as_deref()).await,
        Commands::Session { frames } => session_cmd::run(&config, frames).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(&config),
            ConfigAction::Init { force } => config_cmd::init(&path, force).await,
        },
    }
}
