use crate::domain::errors::DiscoveryError;
use crate::domain::models::Config;
use crate::infra::file_system::walk_visible_files;
use log::debug;
use std::path::{Path, PathBuf};

/// Lists candidate files under `dir`.
///
/// Uses the version-control listing when available. A "not a repository"
/// answer falls back to the plain walk; any other VCS failure is returned.
pub fn discover(dir: &Path, config: &Config) -> Result<Vec<PathBuf>, DiscoveryError> {
    let vcs = config.vcs();

    if vcs.is_available() {
        match vcs.list_files(dir) {
            Ok(files) => {
                debug!(
                    "Using version-control listing for {} ({} files)",
                    dir.display(),
                    files.len()
                );
                return Ok(files);
            }
            Err(e) if e.is_not_a_repository() => {
                debug!("{}; falling back to directory walk", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    walk_visible_files(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::VcsError;
    use crate::domain::models::{ConfigOption, DEFAULT_TEMPLATE};
    use crate::infra::vcs::{ScriptedVcs, VcsQuery};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn config(vcs: ScriptedVcs) -> Config {
        let vcs: Arc<dyn VcsQuery> = Arc::new(vcs);
        Config::new(DEFAULT_TEMPLATE, vcs, Vec::<ConfigOption>::new()).unwrap()
    }

    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.go"), "package a\n").unwrap();
        fs::write(temp_dir.path().join(".hidden"), "secret").unwrap();
        temp_dir
    }

    #[test]
    fn test_walk_when_vcs_unavailable() {
        let temp_dir = fixture();
        let files = discover(temp_dir.path(), &config(ScriptedVcs::unavailable())).unwrap();
        assert_eq!(files, vec![temp_dir.path().join("a.go")]);
    }

    #[test]
    fn test_vcs_listing_governs_dotfiles() {
        let temp_dir = fixture();
        let root = temp_dir.path();
        let vcs = ScriptedVcs::available()
            .with_listing(root, [root.join(".hidden"), root.join("a.go")]);

        let files = discover(root, &config(vcs)).unwrap();
        assert_eq!(files, vec![root.join(".hidden"), root.join("a.go")]);
    }

    #[test]
    fn test_not_a_repository_falls_back_to_walk() {
        let temp_dir = fixture();
        let files = discover(temp_dir.path(), &config(ScriptedVcs::available())).unwrap();
        assert_eq!(files, vec![temp_dir.path().join("a.go")]);
    }

    #[test]
    fn test_other_vcs_failure_is_hard_error() {
        let temp_dir = fixture();
        let root = temp_dir.path();
        let vcs = ScriptedVcs::available().with_listing_failure(root, Some(128), "fatal: bad index");

        match discover(root, &config(vcs)) {
            Err(DiscoveryError::Vcs(VcsError::CommandFailed { code, .. })) => {
                assert_eq!(code, Some(128));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
