use clap::Parser;
use tdec_client::ClientError;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod progress;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("tdec error: {error:#}");
        if needs_configure_hint(&error) {
            eprintln!("hint: run `tdec configure --url <server> --api-key <key>`");
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();

    if let cli::Commands::Schema(args) = &cli.command {
        init_tracing(flags.quiet, flags.verbose)?;
        ui::init(&flags);
        return commands::schema::handle(args, &flags);
    }

    let ctx = bootstrap::load_context(&flags)?;
    init_tracing(flags.quiet, flags.verbose || ctx.client.logging_enabled())?;
    ui::init(&flags);
    tracing::debug!(config = %ctx.config_path.display(), "settings loaded");

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, debug: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if debug {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("TDEC_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn needs_configure_hint(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<ClientError>()
        .is_some_and(ClientError::needs_reconfiguration)
}
