use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use garage_cli::commands::{self, Outcome};
use garage_cli::config;
use garage_core::codec::CarCodec;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "car-codec")]
#[command(version)]
#[command(about = "Validate, decode and update car records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a car object against the field rules
    Validate {
        /// Only check the fields that are present (update semantics)
        #[arg(long)]
        partial: bool,
        /// JSON file, or `-` for stdin
        file: PathBuf,
    },
    /// Create a record from a car object and print its canonical encoding
    Decode {
        /// JSON file, or `-` for stdin
        file: PathBuf,
    },
    /// Apply a partial update to an encoded record
    Update {
        /// Previously encoded record (must carry an `id`)
        record: PathBuf,
        /// Partial update body, or `-` for stdin
        patch: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "garage_cli=info,garage_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // --- Configuration ---
    let policy = config::policy_from_env()?;
    tracing::debug!(
        horse_powers_min = policy.horse_powers.min(),
        horse_powers_max = policy.horse_powers.max(),
        allow_null = policy.description.allow_null,
        allow_blank = policy.description.allow_blank,
        trim_whitespace = policy.trim_whitespace,
        "Loaded car policy"
    );
    let codec = CarCodec::new(policy);

    let outcome = match cli.command {
        Commands::Validate { partial, file } => {
            commands::validate(&codec, &commands::read_input(&file)?, partial)?
        }
        Commands::Decode { file } => commands::decode(&codec, &commands::read_input(&file)?)?,
        Commands::Update { record, patch } => commands::update(
            &codec,
            &commands::read_input(&record)?,
            &commands::read_input(&patch)?,
        )?,
    };

    match outcome {
        Outcome::Accepted(out) => {
            println!("{out}");
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Rejected(errors) => {
            println!("{errors}");
            Ok(ExitCode::FAILURE)
        }
    }
}
