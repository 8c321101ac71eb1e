use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use hsh::cli::Cli;
use hsh::config::Config;
use hsh::dispatch::{Dispatcher, RunStatus};
use hsh::hash::HashComputer;
use hsh::logging;
use hsh::output::{JsonReporter, TextReporter};

fn main() -> ExitCode {
    match run() {
        Ok(status) => ExitCode::from(status.code()),
        Err(err) => {
            eprintln!("hsh error: {:#}", err);
            ExitCode::from(RunStatus::Failure.code())
        }
    }
}

fn run() -> Result<RunStatus> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let config = Config::load().context("loading configuration")?;
    let default_algorithm = config.algorithm()?;

    let buffer_size = match cli.buffer_size {
        Some(bytes) => usize::try_from(bytes).context("--buffer-size is too large")?,
        None => config.buffer_size,
    };
    let computer = HashComputer::with_buffer_size(buffer_size);
    let parallel = cli.parallel || config.parallel;
    let dispatcher = Dispatcher::new(computer.with_progress(cli.progress && !parallel))
        .with_parallel(parallel)
        .with_fallback(default_algorithm);

    let json = cli.json;
    let color = config.color && !cli.no_color;
    let command = cli.into_command(default_algorithm);

    let status = if json {
        dispatcher.dispatch(command, &mut JsonReporter::stdout())?
    } else {
        dispatcher.dispatch(command, &mut TextReporter::stdio(color))?
    };

    Ok(status)
}
