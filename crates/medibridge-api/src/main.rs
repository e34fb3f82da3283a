//! MediBridge CLI and REST API entry point.
//!
//! Binary name: `medib`
//!
//! Parses CLI arguments, initializes tracing, the database and engines, then
//! dispatches to the command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use std::time::Duration;

use clap::Parser;
use clap_complete::generate;

use medibridge_observe::tracing_setup::{init_tracing, shutdown_tracing, TracingOptions};
use medibridge_types::language::LanguageConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need logging or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "medib", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(&TracingOptions {
        filter: verbosity_filter(cli.verbose, cli.quiet).to_string(),
        json: cli.json,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

/// Log filter for the `-v` count. `-v` enables debug output for the binary
/// (`medib`) and the library crates (`medibridge_*`).
fn verbosity_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,medib=debug,medibridge_core=debug,medibridge_infra=debug",
        _ => "trace",
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init().await?;

    match cli.command {
        Commands::Chat {
            resume,
            doctor_lang,
            patient_lang,
        } => {
            let defaults = state.config.languages;
            let languages = LanguageConfig {
                doctor: doctor_lang.unwrap_or(defaults.doctor),
                patient: patient_lang.unwrap_or(defaults.patient),
            };
            cli::chat::loop_runner::run_chat_loop(&state, resume, languages).await?;
        }

        Commands::Conversations => {
            cli::conversation::list_conversations(&state, cli.json).await?;
        }

        Commands::Messages { id } => {
            cli::conversation::show_messages(&state, &id, cli.json).await?;
        }

        Commands::Summarize { id } => {
            cli::conversation::summarize(&state, &id, cli.json, cli.quiet).await?;
        }

        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} MediBridge API listening on {}",
                    console::style("+").green().bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                if state.summarizer.is_none() {
                    println!(
                        "  {}",
                        console::style("Summarization disabled (enable it in config.toml)").dim()
                    );
                }
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(%addr, "Server started");

            let sweeper = state
                .sessions
                .spawn_sweeper(Duration::from_secs(state.config.server.session_idle_secs));
            let router = http::router::build_router(state);
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            sweeper.abort();

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_filter_covers_binary_target() {
        let filter = verbosity_filter(1, false);
        assert!(filter.split(',').any(|directive| directive == "medib=debug"));
        assert!(filter.split(',').any(|directive| directive == "medibridge_core=debug"));
    }

    #[test]
    fn test_quiet_and_default_filters() {
        assert_eq!(verbosity_filter(0, true), "error");
        assert_eq!(verbosity_filter(0, false), "warn");
        assert_eq!(verbosity_filter(3, false), "trace");
    }
}
