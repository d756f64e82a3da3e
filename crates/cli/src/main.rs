//! doodle-guess CLI
//!
//! Command-line front end for the drawing-guess backend: run the server,
//! draw prompts from the word catalog, or classify a drawing on disk
//!
//! Copyright (c) 2025 Michael A Wright

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doodle_core::{default_catalog, WordSampler};
use doodle_server::ServerConfig;
use llm_bridge::{GeminiClient, GeminiConfig, VisionClassifier};
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[allow(dead_code)]
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("BUILT_GIT_COMMIT_HASH"),
    ", built ",
    env!("BUILT_TIME_UTC"),
    ")"
);

#[derive(Parser)]
#[command(name = "doodle-guess")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Drawing-guess game backend: word prompts and AI guesses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the game API and static page
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Address to bind
        #[arg(long, env = "HOST")]
        host: Option<String>,

        /// Directory of static files served at /
        #[arg(long, env = "STATIC_DIR")]
        static_dir: Option<PathBuf>,
    },

    /// Print drawing prompts from the built-in catalog
    Word {
        /// Number of words to draw
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Seed for a reproducible sequence
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Ask the vision model what a drawing shows
    Classify {
        /// Image file to classify
        input: PathBuf,

        /// Gemini model
        #[arg(short, long, env = "GEMINI_MODEL")]
        model: Option<String>,

        /// Seconds to wait for the model
        #[arg(long, env = "CLASSIFY_TIMEOUT_SECS", default_value_t = 30)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    tracing::debug!(
        version = built_info::PKG_VERSION,
        rustc = built_info::RUSTC_VERSION,
        target = built_info::TARGET,
        "Build info"
    );

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            let mut config = ServerConfig::from_env()?;
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(static_dir) = static_dir {
                config.static_dir = static_dir;
            }
            doodle_server::serve(config).await
        }
        Commands::Word { count, seed } => {
            let sampler = match seed {
                Some(seed) => {
                    WordSampler::with_rng(default_catalog(), StdRng::seed_from_u64(seed))?
                }
                None => WordSampler::with_default_catalog(),
            };
            for _ in 0..count {
                println!("{}", sampler.next_word());
            }
            Ok(())
        }
        Commands::Classify {
            input,
            model,
            timeout,
        } => {
            let image = image::open(&input)
                .with_context(|| format!("Failed to read image {}", input.display()))?;

            let mut config = GeminiConfig::from_env()?;
            if let Some(model) = model {
                config.model = model;
            }
            config.timeout_secs = timeout;

            let classifier = VisionClassifier::new(Arc::new(GeminiClient::new(config)?))
                .with_timeout(Duration::from_secs(timeout));
            let outcome = classifier.classify(image).await;
            tracing::debug!(?outcome, "Classification outcome");
            println!("{}", outcome.label());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_word_command() {
        let cli = Cli::try_parse_from(["doodle-guess", "word", "-n", "3", "--seed", "42"]).unwrap();
        match cli.command {
            Commands::Word { count, seed } => {
                assert_eq!(count, 3);
                assert_eq!(seed, Some(42));
            }
            _ => panic!("expected word command"),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "doodle-guess",
            "serve",
            "--port",
            "8080",
            "--static-dir",
            "web",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve {
                port, static_dir, ..
            } => {
                assert_eq!(port, Some(8080));
                assert_eq!(static_dir, Some(PathBuf::from("web")));
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_classify_requires_input() {
        assert!(Cli::try_parse_from(["doodle-guess", "classify"]).is_err());
    }
}
