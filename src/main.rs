mod beatgrid;
mod camelot;
mod chain;
mod cli;
mod compat;
mod ranking;
mod tools;
mod types;

use rmcp::ServiceExt;
use rmcp::transport::stdio;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Any CLI argument means batch mode; a bare invocation serves MCP.
    if std::env::args().len() > 1 {
        return cli::run();
    }

    let server = tools::MixsmithServer::new();
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
