//! Nutrition Ledger
//!
//! An MCP server for macro and food diary tracking.

use std::path::PathBuf;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod build_info;
mod mcp;
mod models;
mod nutrition;
mod store;
mod tools;

use mcp::LedgerService;
use store::{Ledger, Snapshot};
use tokio::sync::broadcast::error::RecvError;

/// Get the snapshot path from environment or use default
fn get_snapshot_path() -> PathBuf {
    std::env::var("NUTRILEDGER_SNAPSHOT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("ledger.json");
            path
        })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutriledger=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let snapshot_path = get_snapshot_path();
    eprintln!("Snapshot path: {}", snapshot_path.display());

    if let Some(parent) = snapshot_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // The persistence layer hands us a snapshot at startup and takes it
    // back at shutdown; the ledger itself stays in memory.
    let ledger = if snapshot_path.exists() {
        let snapshot = Snapshot::load(&snapshot_path)?;
        info!(
            ingredients = snapshot.ingredients.len(),
            foods = snapshot.foods.len(),
            entries = snapshot.entries.len(),
            "loaded snapshot"
        );
        Ledger::from_snapshot(snapshot)
    } else {
        info!("no snapshot found, starting empty");
        Ledger::new()
    };

    // Log ledger changes as they happen
    let mut events = ledger.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => debug!(?event, "ledger change"),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Create the ledger service
    let service = LedgerService::new(ledger.clone(), Some(snapshot_path.clone()));

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    // Hand the state back for saving
    match ledger.snapshot().save(&snapshot_path) {
        Ok(()) => info!(path = %snapshot_path.display(), "snapshot saved"),
        Err(e) => warn!(error = %e, "failed to save snapshot"),
    }

    Ok(())
}
