// crates/server/src/main.rs
//! aria-deck server binary.
//!
//! Binds the HTTP listener, starts the aria2c supervisor, and serves until an
//! interrupt has been turned into a clean worker exit.

use anyhow::{Context, Result};
use aria_deck_observability::init_tracing;
use aria_deck_rpc::AriaClient;
use aria_deck_server::{
    create_app, interrupt_signal, serve_until_stopped, AppState, Config, ShutdownCoordinator,
};
use aria_deck_supervisor::{Aria2cLauncher, Supervisor};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(config.log_format)?;

    eprintln!("\n\u{2b07} aria-deck v{}\n", env!("CARGO_PKG_VERSION"));

    let secret = config.resolve_secret();
    let aria = AriaClient::with_timeout(config.rpc_url(), &secret, config.rpc_timeout())?;

    // Bind before spawning aria2c so a port clash never leaves a worker behind.
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let supervisor = Supervisor::new(
        Aria2cLauncher::new(config.launch_config(&secret)),
        aria.clone(),
        config.supervisor_config(),
    )
    .spawn();

    let aria_url = aria.rpc_url().to_string();
    let app = create_app(AppState::new(aria, supervisor.subscribe()));
    let (coordinator, completion) = ShutdownCoordinator::new(supervisor);
    let coordinator = tokio::spawn(coordinator.run(interrupt_signal()));

    tracing::info!(%addr, rpc_url = %aria_url, "aria-deck listening");
    eprintln!("  \u{2192} http://{}\n", addr);

    serve_until_stopped(listener, app, completion)
        .await
        .context("HTTP server failed")?;

    match coordinator.await {
        Ok(Ok(report)) => {
            tracing::info!(launches = report.launches, killed = report.killed, "shutdown complete");
        }
        Ok(Err(e)) => tracing::error!(error = %e, "shutdown finished with supervisor error"),
        Err(e) => tracing::error!(error = %e, "shutdown coordinator panicked"),
    }

    Ok(())
}
