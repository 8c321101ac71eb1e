// Command line parsing
// Turns raw arguments into a single ParsedCommand for the dispatcher

use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};

use crate::hash::hash::MAX_BUFFER_SIZE;
use crate::hash::{Algorithm, HashRegistry, HashUtilityError};

/// Primary command that forces checksum verification
pub const CHECK_COMMAND: &str = "check";

/// Compute file digests and verify checksums
#[derive(Parser, Debug, Default)]
#[command(
    name = "hsh",
    version,
    about = "Compute file digests and verify checksums",
    override_usage = "hsh <ALGORITHM> <FILE>...\n       hsh <FILE>\n       hsh <FILE|DIGEST> <FILE|DIGEST>\n       hsh check [ALGORITHM] <FILE|DIGEST> <FILE|DIGEST>",
    after_help = algorithm_help(),
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Algorithm, command, file paths or digests
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Print help
    #[arg(short = 'h', long, action = ArgAction::SetTrue)]
    pub help: bool,

    /// Print usage
    #[arg(long, action = ArgAction::SetTrue)]
    pub usage: bool,

    /// Print version
    #[arg(short = 'V', long, action = ArgAction::SetTrue)]
    pub version: bool,

    /// Emit results as JSON
    #[arg(long)]
    pub json: bool,

    /// Hash multiple files in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Show a progress bar for files over 1GB
    #[arg(long)]
    pub progress: bool,

    /// Disable colored verdicts
    #[arg(long)]
    pub no_color: bool,

    /// Read buffer size in bytes
    #[arg(
        long,
        value_name = "BYTES",
        value_parser = clap::value_parser!(u64).range(1..=MAX_BUFFER_SIZE as u64)
    )]
    pub buffer_size: Option<u64>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// What the user asked for, validated once
#[derive(Debug)]
pub enum ParsedCommand {
    DigestBatch {
        algorithm: Algorithm,
        files: Vec<PathBuf>,
    },
    Verify {
        token_a: String,
        token_b: String,
        algorithm: Option<Algorithm>,
    },
    Help,
    Usage,
    Version,
    Invalid(HashUtilityError),
}

impl Cli {
    /// Route the parsed flags and positionals to a command
    ///
    /// `default_algorithm` is used when a single file is given without one.
    pub fn into_command(self, default_algorithm: Algorithm) -> ParsedCommand {
        if self.help {
            return ParsedCommand::Help;
        }
        if self.usage {
            return ParsedCommand::Usage;
        }
        if self.version {
            return ParsedCommand::Version;
        }

        route(&self.args, default_algorithm)
    }
}

/// Map positional arguments onto a command
pub fn route(args: &[String], default_algorithm: Algorithm) -> ParsedCommand {
    let Some((primary, rest)) = args.split_first() else {
        return ParsedCommand::Invalid(HashUtilityError::MissingRequiredArgument {
            argument: "FILE".to_string(),
        });
    };

    if let Ok(algorithm) = HashRegistry::lookup(primary) {
        if rest.is_empty() {
            return ParsedCommand::Invalid(HashUtilityError::MissingRequiredArgument {
                argument: format!("FILE to hash with {}", algorithm),
            });
        }
        return ParsedCommand::DigestBatch {
            algorithm,
            files: rest.iter().map(PathBuf::from).collect(),
        };
    }

    if primary.eq_ignore_ascii_case(CHECK_COMMAND) {
        return route_check(rest);
    }

    match rest {
        [] => ParsedCommand::DigestBatch {
            algorithm: default_algorithm,
            files: vec![PathBuf::from(primary)],
        },
        [other] => ParsedCommand::Verify {
            token_a: primary.clone(),
            token_b: other.clone(),
            algorithm: None,
        },
        _ => ParsedCommand::Invalid(HashUtilityError::InvalidArguments {
            message: format!(
                "'{}' is not an algorithm or command, and {} arguments cannot be compared",
                primary,
                args.len()
            ),
        }),
    }
}

fn route_check(rest: &[String]) -> ParsedCommand {
    match rest {
        [a, b] => ParsedCommand::Verify {
            token_a: a.clone(),
            token_b: b.clone(),
            algorithm: None,
        },
        [name, a, b] => match HashRegistry::lookup(name) {
            Ok(algorithm) => ParsedCommand::Verify {
                token_a: a.clone(),
                token_b: b.clone(),
                algorithm: Some(algorithm),
            },
            Err(e) => ParsedCommand::Invalid(e),
        },
        _ => ParsedCommand::Invalid(HashUtilityError::InvalidArguments {
            message: format!(
                "'{}' takes two files or digests, optionally preceded by an algorithm",
                CHECK_COMMAND
            ),
        }),
    }
}

/// Algorithm table shown after the help text
pub fn algorithm_help() -> String {
    let rows: Vec<String> = HashRegistry::list_algorithms()
        .into_iter()
        .map(|info| {
            format!(
                "  {:<8}{} bits, {} hex characters",
                info.name.to_lowercase(),
                info.output_bits,
                info.hex_length
            )
        })
        .collect();
    format!("Algorithms (case-insensitive):\n{}", rows.join("\n"))
}

/// Long help text
pub fn help_text() -> String {
    Cli::command().render_long_help().to_string()
}

/// One-paragraph usage text
pub fn usage_text() -> String {
    Cli::command().render_usage().to_string()
}

/// `hsh <version>`
pub fn version_text() -> String {
    format!("hsh {}", env!("CARGO_PKG_VERSION"))
}
