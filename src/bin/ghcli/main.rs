use anyhow::{Context, Result};
use tracing::Dispatch;

mod args;
mod cmd_api;
mod cmd_locate;
mod cmd_repos;
mod cmd_search;
mod cmd_whoami;
mod reportable;
mod util;

use args::{CommandLineArgs, GlobalArgs};
use ghcli::logging::LogConfig;

/// Set up the logging / tracing system for the application.
///
/// The returned dispatcher is also installed as the global default.
fn configure_tracing(global_args: &GlobalArgs) -> Result<Dispatch> {
    use tracing_log::{AsLog, LogTracer};
    use tracing_subscriber::filter::LevelFilter;

    // Set the tracing level according to the `-q`/`--quiet` and `-v`/`--verbose` options
    let level_filter = if global_args.quiet {
        LevelFilter::ERROR
    } else {
        match global_args.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    // Configure the bridge from the `log` crate to the `tracing` crate
    LogTracer::builder()
        .with_max_level(level_filter.as_log())
        .init()?;

    // Configure logging filters according to the `GHCLI_LOG` environment variable
    let dispatch = LogConfig::new(level_filter)
        .format(global_args.log_format.into())
        .ansi(global_args.use_color(std::io::stderr()))
        .env_var("GHCLI_LOG")
        .build_dispatch()?;

    tracing::dispatcher::set_global_default(dispatch.clone())?;

    Ok(dispatch)
}

/// Enable or disable colored output according to the global arguments.
fn configure_color(global_args: &GlobalArgs) {
    console::set_colors_enabled(global_args.use_color(std::io::stdout()));
    console::set_colors_enabled_stderr(global_args.use_color(std::io::stderr()));
}

fn try_main(args: &CommandLineArgs) -> Result<()> {
    let global_args = &args.global_args;

    configure_color(global_args);
    configure_tracing(global_args).context("Failed to initialize logging")?;

    match &args.command {
        args::Command::Search(args) => cmd_search::run(global_args, args),
        args::Command::Whoami => cmd_whoami::run(global_args),
        args::Command::Repos(args) => cmd_repos::run(global_args, args),
        args::Command::Api(args) => cmd_api::run(global_args, args),
        args::Command::Locate => cmd_locate::run(global_args),
    }
}

fn main() {
    let args = &CommandLineArgs::parse_args();
    if let Err(e) = try_main(args) {
        // Use the more verbose format that includes a backtrace when running with -vv or higher,
        // otherwise use a more compact one-line error format.
        if args.global_args.verbose > 1 {
            eprintln!("Error: {e:?}");
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(2);
    }
}
