//! bendls: find, install and run the Bend language server

use bendls_cli::commands::{self, CliContext};
use bendls_cli::logging::setup_logging;
use bendls_cli::{Cli, Commands};
use bendls_core::supervisor::LaunchMode;
use clap::Parser;
use tokio_util::sync::CancellationToken;

/// Cancel `interrupt` on the first Ctrl-C; a second one exits at once
fn listen_for_interrupt(interrupt: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::info!("Interrupted; press Ctrl-C again to exit immediately");
        interrupt.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let interrupt = CancellationToken::new();
    listen_for_interrupt(interrupt.clone());

    let context = CliContext::new(&cli.global, interrupt.clone())?;

    match cli.command {
        Commands::Resolve => {
            commands::resolve::run(&context).await?;
        }
        Commands::Run { debug } => {
            let mode = if debug { LaunchMode::Debug } else { LaunchMode::Run };
            commands::run::run(&context, mode, &interrupt).await?;
        }
    }

    Ok(())
}
