//! crop-advisor CLI
//!
//! Commands:
//! - `crop-advisor serve` - Run the HTTP inference service (default)
//! - `crop-advisor predict` - Score one JSON payload from stdin or `--input`

pub mod predict;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use predict::{predict_once, render_outcome};

/// Crop recommendation inference service
#[derive(Parser, Debug)]
#[command(name = "crop-advisor")]
#[command(author, version, about = "Crop recommendation inference service")]
pub struct Cli {
    /// Directory holding default.toml and environment overlays
    #[arg(long, global = true, default_value = "config", env = "CROP_CONFIG_DIR")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP inference service
    Serve,

    /// Predict a crop for a single JSON payload
    Predict {
        /// JSON payload; read from stdin when omitted
        #[arg(short, long)]
        input: Option<String>,
    },
}

impl Cli {
    /// Subcommand to run, `serve` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::parse_from(["crop-advisor"]);
        assert_eq!(cli.command(), Commands::Serve);
    }

    #[test]
    fn test_predict_with_inline_input() {
        let cli = Cli::parse_from([
            "crop-advisor",
            "predict",
            "--input",
            r#"{"N": 1}"#,
            "--config-dir",
            "/etc/crop",
        ]);
        assert_eq!(
            cli.command(),
            Commands::Predict {
                input: Some(r#"{"N": 1}"#.to_string())
            }
        );
        assert_eq!(cli.config_dir, PathBuf::from("/etc/crop"));
    }
}
