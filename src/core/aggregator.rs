use crate::core::discovery::discover;
use crate::core::processor::process_file;
use crate::domain::errors::AggregateError;
use crate::domain::models::{Aggregate, Config, RunStats};
use crate::infra::logger::LogSink;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

pub const DOCUMENT_OPEN: &str = "<file_contents>\n";
pub const DOCUMENT_CLOSE: &str = "</file_contents>\n";

fn count_tokens(content: &str) -> usize {
    content.split_whitespace().count()
}

fn count_lines(content: &str) -> usize {
    content.matches('\n').count() + 1
}

pub fn compute_stats(document: &str, files_processed: usize, files_total: usize) -> RunStats {
    RunStats {
        files_processed,
        files_total,
        char_count: document.chars().count(),
        line_count: count_lines(document),
        token_count: count_tokens(document),
    }
}

pub fn wrap_document(body: &str) -> String {
    let mut result = String::with_capacity(DOCUMENT_OPEN.len() + body.len() + DOCUMENT_CLOSE.len());
    result.push_str(DOCUMENT_OPEN);
    result.push_str(body);
    result.push_str(DOCUMENT_CLOSE);
    result
}

/// Expands every input into candidate files, walking each directory once.
///
/// Directories that cannot be listed are logged and contribute nothing.
pub fn collect_candidates<P: AsRef<Path>>(
    paths: &[P],
    config: &Config,
    sink: &dyn LogSink,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                sink.warn(&format!("Cannot access input {}: {}", path.display(), e));
                continue;
            }
        };

        if metadata.is_dir() {
            match discover(path, config) {
                Ok(files) => {
                    debug!("{} candidate(s) in {}", files.len(), path.display());
                    candidates.extend(files);
                }
                Err(e) => {
                    sink.error(&format!("Failed to list {}: {}", path.display(), e));
                }
            }
        } else {
            candidates.push(path.to_path_buf());
        }
    }

    candidates
}

/// Builds the aggregate document for `paths`.
///
/// Fails with `NoInputs` for an empty input list, and with
/// `NothingProcessed` when candidates existed but every one was skipped.
pub fn run<P: AsRef<Path>>(
    paths: &[P],
    config: &Config,
    sink: &dyn LogSink,
) -> Result<Aggregate, AggregateError> {
    if paths.is_empty() {
        return Err(AggregateError::NoInputs);
    }

    let candidates = collect_candidates(paths, config, sink);
    let files_total = candidates.len();
    sink.info(&format!("Found {} candidate file(s)", files_total));

    let mut body = String::new();
    let mut files_processed = 0;

    for candidate in &candidates {
        let outcome = process_file(candidate, config, sink, |path, content| {
            config.render(
                &path.display().to_string(),
                &String::from_utf8_lossy(content),
            )
        });

        if let Some(segment) = outcome.segment() {
            files_processed += 1;
            body.push_str(&segment);
        }
    }

    if files_total > 0 && files_processed == 0 {
        return Err(AggregateError::NothingProcessed { files_total });
    }

    let document = wrap_document(&body);
    let stats = compute_stats(&document, files_processed, files_total);
    sink.info(&format!(
        "Processed {} of {} file(s): {} chars, {} lines, ~{} tokens",
        stats.files_processed, stats.files_total, stats.char_count, stats.line_count, stats.token_count
    ));

    Ok(Aggregate { document, stats })
}
