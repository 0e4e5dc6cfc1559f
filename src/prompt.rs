//! Interactive prompting for startup inputs
//!
//! Used by the binary for any input not given on the command line. Each
//! question is asked in a loop until the answer validates; an invalid answer
//! prints the reason and asks again. End of input aborts with a validation
//! error so a closed stdin cannot spin forever.
//!
//! Folder answers are also checked against the other root when it is already
//! known, so overlapping folders are re-asked instead of failing startup.

use crate::config::{ensure_apart, parse_interval, validate_directory};
use crate::error::{Result, SyncError};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

const SOURCE_QUESTION: &str = "Provide source folder name: ";
const DESTINATION_QUESTION: &str = "Provide destination folder name: ";

/// Asks questions on `output` and reads answers from `input`
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Create a prompter over the given streams
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for the source folder
    ///
    /// When the destination is already known and exists, an answer that
    /// overlaps it is rejected.
    pub fn source(&mut self, destination: Option<&Path>) -> Result<PathBuf> {
        self.ask_until_valid(SOURCE_QUESTION, |line| {
            let source = validate_directory(line)?;
            if let Some(destination) = destination.filter(|d| d.is_dir()) {
                ensure_apart(&source, destination)?;
            }
            Ok(source)
        })
    }

    /// Ask for the destination folder; it must not overlap `source`
    pub fn destination(&mut self, source: &Path) -> Result<PathBuf> {
        self.ask_until_valid(DESTINATION_QUESTION, |line| {
            let destination = validate_directory(line)?;
            if source.is_dir() {
                ensure_apart(source, &destination)?;
            }
            Ok(destination)
        })
    }

    /// Ask for a positive interval in seconds
    pub fn interval(&mut self) -> Result<u64> {
        self.ask_until_valid(
            "Provide time interval for synchronisation in seconds: ",
            parse_interval,
        )
    }

    fn ask_until_valid<T>(&mut self, question: &str, validate: impl Fn(&str) -> Result<T>) -> Result<T> {
        loop {
            write!(self.output, "{}", question)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(SyncError::validation("input closed before a valid answer was given"));
            }

            match validate(&line) {
                Ok(value) => return Ok(value),
                Err(SyncError::Validation(reason)) => writeln!(self.output, "❌ {}", reason)?,
                Err(e) => return Err(e),
            }
        }
    }

    /// Give back the output stream
    pub fn into_output(self) -> W {
        self.output
    }
}
