//! nomad-run - CI step that keeps a Nomad job running.
//!
//! Inputs arrive as `INPUT_*` variables or flags; secrets only from the
//! environment.

use anyhow::Result;
use clap::Parser;

use nomad_run::commands::Cli;
use nomad_run::error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_tracing();
    let format = cli.output_format();

    if let Err(e) = cli.run().await {
        error::print_error(&e, format);
        std::process::exit(1);
    }

    Ok(())
}
