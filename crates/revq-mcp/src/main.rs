// SPDX-License-Identifier: Apache-2.0

//! Binary entry point for the revq MCP server.

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs must go to stderr - stdout carries the MCP protocol
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("revq=info")),
        )
        .init();

    revq_mcp::run_stdio().await
}
