use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("output template is empty")]
    EmptyTemplate,

    #[error("output template {template:?} has no {{content}} placeholder")]
    MissingContentPlaceholder { template: String },
}

/// Failures reported by a version-control adapter.
///
/// `NotARepository` is the only variant discovery treats as "fall back to a
/// plain walk"; every other variant is a hard error for that directory.
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("{} is not inside a git repository", .dir.display())]
    NotARepository { dir: PathBuf },

    #[error("version control is not available")]
    Unavailable,

    #[error("git exited with status {code:?} in {}: {stderr}", .dir.display())]
    CommandFailed {
        dir: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),
}

impl VcsError {
    pub fn is_not_a_repository(&self) -> bool {
        matches!(self, VcsError::NotARepository { .. })
    }
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Whole-run failures surfaced to the caller.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("no input paths were given")]
    NoInputs,

    #[error("found {files_total} candidate file(s) but none were processed; check your filters")]
    NothingProcessed { files_total: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_repository_is_distinguishable() {
        let err = VcsError::NotARepository {
            dir: PathBuf::from("/tmp/x"),
        };
        assert!(err.is_not_a_repository());

        let err = VcsError::CommandFailed {
            dir: PathBuf::from("/tmp/x"),
            code: Some(128),
            stderr: "fatal: bad object".to_string(),
        };
        assert!(!err.is_not_a_repository());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AggregateError::NothingProcessed { files_total: 3 }.to_string(),
            "found 3 candidate file(s) but none were processed; check your filters"
        );
        assert_eq!(
            ConfigError::MissingContentPlaceholder {
                template: "{path}".to_string()
            }
            .to_string(),
            "output template \"{path}\" has no {content} placeholder"
        );
    }
}
