//! gemchat web chat server entry point.
//!
//! Binary name: `gemchat`
//!
//! Parses CLI arguments, loads configuration, wires the application state,
//! then serves the chat page and its API until Ctrl+C or SIGTERM.

mod cli;
mod http;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gemchat_infra::config::{default_config_path, load_config};
use gemchat_types::config::AppConfig;

use cli::Cli;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flags when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = match cli.config.clone().or_else(default_config_path) {
        Some(path) => load_config(&path).await,
        None => AppConfig::default(),
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let state = AppState::new(config)?;
    let env_fingerprint = state.configure_from_env().await?;

    let addr = state.config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if !cli.quiet {
        println!();
        println!(
            "  {} {} listening on {}",
            console::style("🤖").bold(),
            console::style(&state.config.page_title).bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!(
            "  {} model {}",
            console::style("·").dim(),
            console::style(&state.config.model).yellow()
        );
        match env_fingerprint {
            Some(fingerprint) => println!(
                "  {} API key from ${} (...{})",
                console::style("🔑").bold(),
                state.config.api_key_env,
                fingerprint
            ),
            None => println!(
                "  {} No API key set; enter one in the page",
                console::style("🔑").bold()
            ),
        }
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if !cli.quiet {
        println!("\n  Server stopped.");
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
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
                tracing::error!("failed to install SIGTERM handler: {e}");
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
