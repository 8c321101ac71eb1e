// Output module
// Reporters that render dispatcher results as text lines or one JSON document

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::hash::{Algorithm, ComparisonOutcome, HashResult, HashUtilityError};

/// Sink for everything the dispatcher reports
pub trait Reporter {
    /// A successfully computed digest
    fn digest(&mut self, result: &HashResult) -> io::Result<()>;

    /// A file in a batch that could not be hashed
    fn file_error(&mut self, path: &Path, error: &HashUtilityError) -> io::Result<()>;

    /// The verdict of a verification
    fn comparison(&mut self, outcome: &ComparisonOutcome) -> io::Result<()>;

    /// A malformed command
    fn usage_error(&mut self, error: &HashUtilityError) -> io::Result<()>;

    /// Static text such as help or version output
    fn message(&mut self, text: &str) -> io::Result<()>;

    /// Called once after the command has been dispatched
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Line-oriented reporter: results to `out`, errors to `err`
pub struct TextReporter<W: Write, E: Write> {
    out: W,
    err: E,
    color_out: bool,
    color_err: bool,
}

impl TextReporter<io::Stdout, io::Stderr> {
    /// Reporter bound to the process streams; each stream is colored only on a terminal
    pub fn stdio(color: bool) -> Self {
        let out = io::stdout();
        let err = io::stderr();
        let color_out = color && out.is_terminal();
        let color_err = color && err.is_terminal();
        if color_out || color_err {
            // colored only checks stdout; the per-stream flags decide instead
            colored::control::set_override(true);
        }
        Self::new(out, err, false).with_stream_colors(color_out, color_err)
    }
}

impl<W: Write, E: Write> TextReporter<W, E> {
    pub fn new(out: W, err: E, color: bool) -> Self {
        Self {
            out,
            err,
            color_out: color,
            color_err: color,
        }
    }

    /// Color the result stream and the error stream independently
    pub fn with_stream_colors(mut self, color_out: bool, color_err: bool) -> Self {
        self.color_out = color_out;
        self.color_err = color_err;
        self
    }

    /// Give the underlying writers back
    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    fn verdict(label: &str, matched: bool, color: bool) -> String {
        if !color {
            label.to_string()
        } else if matched {
            label.green().bold().to_string()
        } else {
            label.red().bold().to_string()
        }
    }
}

impl<W: Write, E: Write> Reporter for TextReporter<W, E> {
    fn digest(&mut self, result: &HashResult) -> io::Result<()> {
        writeln!(self.out, "{} ({}) :", result.algorithm, result.file_path.display())?;
        writeln!(self.out, "{}", result.hash)
    }

    fn file_error(&mut self, _path: &Path, error: &HashUtilityError) -> io::Result<()> {
        writeln!(self.err, "{}", error)
    }

    fn comparison(&mut self, outcome: &ComparisonOutcome) -> io::Result<()> {
        match outcome {
            ComparisonOutcome::Match(detail) => {
                let label = Self::verdict("MATCH", true, self.color_out);
                writeln!(self.out, "{} ({})", label, detail.algorithm)?;
                writeln!(self.out, "{}", detail.left)
            }
            ComparisonOutcome::Mismatch(detail) => {
                let label = Self::verdict("MISMATCH", false, self.color_out);
                writeln!(self.out, "{} ({})", label, detail.algorithm)?;
                writeln!(self.out, "{}", detail.left)?;
                writeln!(self.out, "{}", detail.right)
            }
            ComparisonOutcome::Error { reason } => {
                let label = Self::verdict("ERROR", false, self.color_err);
                writeln!(self.err, "{}: {}", label, reason)
            }
        }
    }

    fn usage_error(&mut self, error: &HashUtilityError) -> io::Result<()> {
        writeln!(self.err, "{}", error)
    }

    fn message(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text.trim_end())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonRecord {
    Digest {
        algorithm: Algorithm,
        path: String,
        digest: String,
    },
    FileError {
        path: String,
        error: String,
    },
    Comparison(ComparisonOutcome),
    UsageError {
        error: String,
    },
    Message {
        text: String,
    },
}

/// Reporter that writes a single JSON array when finished
pub struct JsonReporter<W: Write> {
    out: W,
    records: Vec<JsonRecord>,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            records: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn digest(&mut self, result: &HashResult) -> io::Result<()> {
        self.records.push(JsonRecord::Digest {
            algorithm: result.algorithm,
            path: result.file_path.display().to_string(),
            digest: result.hash.clone(),
        });
        Ok(())
    }

    fn file_error(&mut self, path: &Path, error: &HashUtilityError) -> io::Result<()> {
        self.records.push(JsonRecord::FileError {
            path: path.display().to_string(),
            error: error.summary(),
        });
        Ok(())
    }

    fn comparison(&mut self, outcome: &ComparisonOutcome) -> io::Result<()> {
        self.records.push(JsonRecord::Comparison(outcome.clone()));
        Ok(())
    }

    fn usage_error(&mut self, error: &HashUtilityError) -> io::Result<()> {
        self.records.push(JsonRecord::UsageError {
            error: error.summary(),
        });
        Ok(())
    }

    fn message(&mut self, text: &str) -> io::Result<()> {
        self.records.push(JsonRecord::Message {
            text: text.trim_end().to_string(),
        });
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        let records = std::mem::take(&mut self.records);
        serde_json::to_writer_pretty(&mut self.out, &records)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
