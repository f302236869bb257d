use issuecorpus::cli::commands::{CliArgs, Commands};
use issuecorpus::cli::handlers::{handle_config, handle_fetch, handle_transform};
use issuecorpus::util::logging::{self, parse_level};
use issuecorpus::VERSION;

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("issuecorpus v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Fetch(fetch_args) => handle_fetch(fetch_args),
        Commands::Transform(transform_args) => handle_transform(transform_args),
        Commands::Config(config_args) => handle_config(config_args),
    };

    std::process::exit(exit_code);
}

/// `--log-level` wins, then `-v`/`-q`, then `ISSUECORPUS_LOG_LEVEL`
fn init_logging_from_args(args: &CliArgs) {
    let level_override = if let Some(level_str) = &args.log_level {
        Some(parse_level(level_str))
    } else if args.verbose {
        Some(Level::DEBUG)
    } else if args.quiet {
        Some(Level::ERROR)
    } else {
        None
    };

    logging::init_logging(logging::config_from_env(level_override));
}
