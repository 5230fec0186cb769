use crate::core::binary::is_binary;
use crate::core::filter::{FilterDecision, evaluate};
use crate::domain::models::Config;
use crate::infra::file_system::read_file_bytes;
use crate::infra::logger::LogSink;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Missing,
    StatFailed,
    Ignored,
    Filtered(FilterDecision),
    ReadFailed,
    Binary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Processed(String),
    Skipped(SkipReason),
}

impl Outcome {
    pub fn segment(self) -> Option<String> {
        match self {
            Outcome::Processed(segment) => Some(segment),
            Outcome::Skipped(_) => None,
        }
    }
}

fn note(config: &Config, sink: &dyn LogSink, message: &str) {
    if config.verbose() {
        sink.verbose(message);
    }
}

/// Runs one candidate through existence, ignore, filter, read and binary
/// checks, then hands path and bytes to `formatter`.
///
/// Never fails: every problem turns into `Outcome::Skipped`.
pub fn process_file<F>(path: &Path, config: &Config, sink: &dyn LogSink, formatter: F) -> Outcome
where
    F: FnOnce(&Path, &[u8]) -> String,
{
    // Files can vanish between discovery and reading.
    match fs::metadata(path) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Outcome::Skipped(SkipReason::Missing);
        }
        Err(e) => {
            sink.warn(&format!("Cannot stat {}: {}", path.display(), e));
            return Outcome::Skipped(SkipReason::StatFailed);
        }
    }

    if config.vcs().is_ignored(path) {
        if !config.bypass_ignore() {
            note(config, sink, &format!("Skipping ignored file: {}", path.display()));
            return Outcome::Skipped(SkipReason::Ignored);
        }
        note(
            config,
            sink,
            &format!("Processing ignored file (ignore rules bypassed): {}", path.display()),
        );
    }

    match evaluate(path, config) {
        FilterDecision::Accept => {}
        FilterDecision::ExcludedName => {
            note(
                config,
                sink,
                &format!("Skipping file excluded by name: {}", path.display()),
            );
            return Outcome::Skipped(SkipReason::Filtered(FilterDecision::ExcludedName));
        }
        other => return Outcome::Skipped(SkipReason::Filtered(other)),
    }

    let content = match read_file_bytes(path) {
        Ok(content) => content,
        Err(e) => {
            sink.warn(&format!("Cannot read {}: {}", path.display(), e));
            return Outcome::Skipped(SkipReason::ReadFailed);
        }
    };

    if is_binary(&content) {
        note(config, sink, &format!("Skipping binary file: {}", path.display()));
        return Outcome::Skipped(SkipReason::Binary);
    }

    Outcome::Processed(formatter(path, &content))
}
