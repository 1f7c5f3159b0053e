use clap::Parser;
use partner_form::cli::commands::{cmd_submit, cmd_validate};
use partner_form::cli::config::{Cli, Commands, load_config, log_filter};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());

    let ok = match cli.command {
        Commands::Submit {
            page,
            set,
            origin,
            cookie,
            timeout_ms,
            trace,
        } => cmd_submit(
            &config,
            &page,
            &set,
            origin.as_deref(),
            cookie.as_deref(),
            timeout_ms,
            trace.as_deref(),
            cli.verbose,
        )?,
        Commands::Validate { page, set } => cmd_validate(&config, &page, &set)?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
