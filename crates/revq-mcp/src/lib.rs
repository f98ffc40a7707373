// SPDX-License-Identifier: Apache-2.0

//! MCP server exposing revq-core functionality for PR review triage.
//!
//! Wraps the revq-core classification, triage, reply, and orchestration
//! operations as MCP (Model Context Protocol) tools using the RMCP SDK
//! with stdio transport.

mod auth;
mod error;
mod server;

pub use server::{HealthCheckResponse, RevqServer};

/// Run the MCP server over stdio transport.
///
/// Serves the MCP protocol over stdin/stdout.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the transport fails.
pub async fn run_stdio() -> anyhow::Result<()> {
    use rmcp::{ServiceExt, transport::stdio};

    tracing::info!("Starting revq MCP server (stdio)");

    let server = RevqServer::try_new()?;
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Server error: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}
