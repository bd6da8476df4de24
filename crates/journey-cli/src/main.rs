use clap::Parser;
use journey_core::errors::CoreError;
use journey_core::responses::ErrorResponse;

mod cli;
mod commands;
mod context;
mod output;

fn main() {
    if let Err(error) = run() {
        report(&error);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();

    if let cli::Commands::Schema { action } = &cli.command {
        return commands::schema::handle(action, &flags);
    }

    let config = journey_config::JourneyConfig::load_with_dotenv()?;
    let ctx = context::AppContext::init(config, &flags)?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags)
}

/// Model errors are printed as the API error body on stdout so scripts can
/// read the violations; anything else goes to stderr.
fn report(error: &anyhow::Error) {
    if let Some(core) = error.downcast_ref::<CoreError>() {
        let body = ErrorResponse::from_error(core);
        match serde_json::to_string_pretty(&body) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("journey error: {core}"),
        }
    } else {
        eprintln!("journey error: {error:#}");
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("JOURNEY_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
