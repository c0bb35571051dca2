use anyhow::{Context, Result};
use clap::Parser;
use crop_advisor::api::{self, AppState};
use crop_advisor::cli::{predict_once, render_outcome, Cli, Commands};
use crop_advisor::config::AppConfig;
use crop_advisor::error::CropError;
use crop_advisor::logging::{init_logging, init_logging_simple};
use crop_advisor::services::InferenceService;
use std::io::Read;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command() {
        Commands::Serve => {
            let config = load_config(&cli)?;
            init_logging(&config);
            if let Err(e) = run_server(config).await {
                error!("Startup failed: {:#}", e);
                return Err(e);
            }
        }
        Commands::Predict { input } => {
            init_logging_simple();
            let outcome = load_config(&cli).and_then(|config| run_predict(&config, input));
            let (line, code) = render_outcome(&outcome);
            println!("{line}");
            std::process::exit(code);
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let config = AppConfig::load_from(&cli.config_dir)
        .with_context(|| format!("loading config from {}", cli.config_dir.display()))?;
    config.validate().map_err(CropError::InvalidConfig)?;
    Ok(config)
}

async fn run_server(config: AppConfig) -> Result<()> {
    info!(
        model = %config.model.path.display(),
        port = config.server.port,
        "Loading model"
    );
    let inference =
        InferenceService::load(&config.model).context("loading model artifacts")?;
    info!(decoder = inference.has_decoder(), "Inference ready");

    api::serve(AppState::new(inference), &config, shutdown_signal())
        .await
        .context("serving API")
}

fn run_predict(config: &AppConfig, input: Option<String>) -> Result<String> {
    let raw = match input {
        Some(raw) => raw,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading payload from stdin")?;
            buf
        }
    };
    let inference =
        InferenceService::load(&config.model).context("loading model artifacts")?;
    Ok(predict_once(&inference, &raw)?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
