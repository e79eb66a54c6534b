//! AI interviewer CLI and REST API entry point.
//!
//! Binary name: `interviewer`

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;

use interviewer_observe::{LogFormat, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn,interviewer=info",
        1 => "info,interviewer_core=debug,interviewer_infra=debug,interviewer=debug",
        _ => "trace",
    };
    let format = match cli.command {
        Commands::Serve { .. } => LogFormat::Json,
        _ => LogFormat::Pretty,
    };
    init_tracing(filter, format, cli.otel).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Check { ping } => cli::check::run_check(&cli.config, ping).await,

        Commands::Chat => {
            let state = AppState::init(&cli.config)
                .await
                .with_context(|| format!("cannot start interview with {}", cli.config.display()))?;
            cli::chat::loop_runner::run_chat_loop(&state).await
        }

        Commands::Serve { host, port } => {
            let state = AppState::init(&cli.config)
                .await
                .with_context(|| format!("cannot start server with {}", cli.config.display()))?;

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Interviewer API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let sweeper = state.spawn_session_sweeper();
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            sweeper.abort();

            println!("\n  Server stopped.");
            Ok(())
        }
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
