//! Version-control queries used by discovery and the per-file ignore check.
//!
//! `GitCli` shells out to a real `git` binary; `ScriptedVcs` answers from a
//! pre-programmed table so tests never depend on the host having git.

use crate::domain::errors::VcsError;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub trait VcsQuery: Send + Sync {
    /// Whether version-control based listing can be attempted at all.
    fn is_available(&self) -> bool;

    /// Whether `path` is excluded by the tool's ignore rules.
    ///
    /// Never fails: when the tool cannot answer, hidden names count as ignored.
    fn is_ignored(&self, path: &Path) -> bool;

    /// Tracked plus untracked-but-not-ignored files below `dir`.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, VcsError>;
}

pub fn is_hidden_name(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Drops listed paths that are gone from disk; listings can be stale.
pub fn retain_existing(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths
        .into_iter()
        .filter(|path| {
            let exists = path.exists();
            if !exists {
                debug!("Dropping stale listing entry: {}", path.display());
            }
            exists
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct GitCli {
    executable: PathBuf,
    available: bool,
    envs: Vec<(OsString, OsString)>,
}

impl GitCli {
    pub fn detect() -> Self {
        Self::with_executable("git")
    }

    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        let executable = executable.into();
        let available = Command::new(&executable)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);

        debug!(
            "git executable {} available: {}",
            executable.display(),
            available
        );
        Self {
            executable,
            available,
            envs: Vec::new(),
        }
    }

    /// Extra environment passed to every git invocation.
    pub fn with_env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    fn command(&self, dir: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.envs(self.envs.iter().map(|(k, v)| (k, v)));
        // Stderr is matched against English text; gettext ignores LANGUAGE under C.
        cmd.env("LC_ALL", "C");
        cmd.arg("-C").arg(dir);
        cmd
    }
}

impl VcsQuery for GitCli {
    fn is_available(&self) -> bool {
        self.available
    }

    fn is_ignored(&self, path: &Path) -> bool {
        if !self.available {
            return is_hidden_name(path);
        }

        let Some(name) = path.file_name() else {
            return false;
        };
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let status = self
            .command(parent)
            .args(["check-ignore", "-q", "--"])
            .arg(name)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status.map(|s| s.code()) {
            Ok(Some(0)) => true,
            Ok(Some(1)) => false,
            Ok(code) => {
                debug!(
                    "git check-ignore gave {:?} for {}, using hidden-name rule",
                    code,
                    path.display()
                );
                is_hidden_name(path)
            }
            Err(e) => {
                debug!("git check-ignore failed to run: {}", e);
                is_hidden_name(path)
            }
        }
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, VcsError> {
        if !self.available {
            return Err(VcsError::Unavailable);
        }

        debug!("Listing git files in: {}", dir.display());
        let output = self
            .command(dir)
            .args([
                "ls-files",
                "--cached",
                "--others",
                "--exclude-standard",
                "-z",
            ])
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.to_lowercase().contains("not a git repository") {
                return Err(VcsError::NotARepository {
                    dir: dir.to_path_buf(),
                });
            }
            return Err(VcsError::CommandFailed {
                dir: dir.to_path_buf(),
                code: output.status.code(),
                stderr,
            });
        }

        let files = parse_listing(dir, &output.stdout);
        debug!("git listed {} files in {}", files.len(), dir.display());
        Ok(retain_existing(files))
    }
}

/// Joins the NUL-separated relative paths of `ls-files -z` onto `dir`.
fn parse_listing(dir: &Path, stdout: &[u8]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in stdout.split(|b| *b == 0) {
        if entry.is_empty() {
            continue;
        }
        match relative_path(entry) {
            Some(rel) => files.push(dir.join(rel)),
            None => warn!(
                "Skipping non UTF-8 path from git ls-files in {}",
                dir.display()
            ),
        }
    }
    files
}

#[cfg(unix)]
fn relative_path(raw: &[u8]) -> Option<PathBuf> {
    use std::os::unix::ffi::OsStrExt;
    Some(PathBuf::from(std::ffi::OsStr::from_bytes(raw)))
}

#[cfg(not(unix))]
fn relative_path(raw: &[u8]) -> Option<PathBuf> {
    std::str::from_utf8(raw).ok().map(PathBuf::from)
}

#[derive(Debug, Clone)]
enum ScriptedListing {
    Files(Vec<PathBuf>),
    Failure { code: Option<i32>, stderr: String },
}

/// Pre-programmed adapter for deterministic tests.
///
/// Directories without a scripted listing report `NotARepository`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedVcs {
    available: bool,
    listings: HashMap<PathBuf, ScriptedListing>,
    ignored: HashSet<PathBuf>,
}

impl ScriptedVcs {
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn available() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    pub fn with_listing<I, P>(mut self, dir: impl Into<PathBuf>, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let files = files.into_iter().map(Into::into).collect();
        self.listings
            .insert(dir.into(), ScriptedListing::Files(files));
        self
    }

    pub fn with_listing_failure(
        mut self,
        dir: impl Into<PathBuf>,
        code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        self.listings.insert(
            dir.into(),
            ScriptedListing::Failure {
                code,
                stderr: stderr.into(),
            },
        );
        self
    }

    pub fn with_ignored(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignored.insert(path.into());
        self
    }
}

impl VcsQuery for ScriptedVcs {
    fn is_available(&self) -> bool {
        self.available
    }

    fn is_ignored(&self, path: &Path) -> bool {
        if self.available {
            self.ignored.contains(path)
        } else {
            is_hidden_name(path)
        }
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, VcsError> {
        if !self.available {
            return Err(VcsError::Unavailable);
        }
        match self.listings.get(dir) {
            Some(ScriptedListing::Files(files)) => Ok(files.clone()),
            Some(ScriptedListing::Failure { code, stderr }) => Err(VcsError::CommandFailed {
                dir: dir.to_path_buf(),
                code: *code,
                stderr: stderr.clone(),
            }),
            None => Err(VcsError::NotARepository {
                dir: dir.to_path_buf(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_hidden_name_heuristic() {
        assert!(is_hidden_name(Path::new(".env")));
        assert!(is_hidden_name(Path::new("a/b/.gitignore")));
        assert!(!is_hidden_name(Path::new("a/.config/main.rs")));
        assert!(!is_hidden_name(Path::new("main.rs")));
    }

    #[test]
    fn test_retain_existing_drops_missing() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("present.txt");
        fs::write(&present, "x").unwrap();
        let missing = temp_dir.path().join("missing.txt");

        let kept = retain_existing(vec![present.clone(), missing]);
        assert_eq!(kept, vec![present]);
    }

    #[test]
    fn test_missing_executable_is_unavailable() {
        let git = GitCli::with_executable("/nonexistent/definitely-not-git");
        assert!(!git.is_available());
        assert!(git.is_ignored(Path::new("dir/.secret")));
        assert!(!git.is_ignored(Path::new("dir/visible.rs")));
        assert!(matches!(
            git.list_files(Path::new(".")),
            Err(VcsError::Unavailable)
        ));
    }

    #[test]
    fn test_scripted_unavailable() {
        let vcs = ScriptedVcs::unavailable().with_ignored("a.rs");
        assert!(!vcs.is_available());
        assert!(!vcs.is_ignored(Path::new("a.rs")));
        assert!(vcs.is_ignored(Path::new(".hidden")));
        assert!(matches!(
            vcs.list_files(Path::new("proj")),
            Err(VcsError::Unavailable)
        ));
    }

    #[test]
    fn test_scripted_available() {
        let vcs = ScriptedVcs::available()
            .with_listing("proj", ["proj/a.rs", "proj/.env"])
            .with_listing_failure("broken", Some(128), "fatal: index file corrupt")
            .with_ignored("proj/target.log");

        assert!(vcs.is_available());
        assert!(vcs.is_ignored(Path::new("proj/target.log")));
        assert!(!vcs.is_ignored(Path::new("proj/.env")));

        let files = vcs.list_files(Path::new("proj")).unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("proj/a.rs"), PathBuf::from("proj/.env")]
        );

        match vcs.list_files(Path::new("broken")) {
            Err(VcsError::CommandFailed { code, stderr, .. }) => {
                assert_eq!(code, Some(128));
                assert!(stderr.contains("corrupt"));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(
            vcs.list_files(Path::new("elsewhere"))
                .unwrap_err()
                .is_not_a_repository()
        );
    }

    #[test]
    fn test_git_cli_against_real_repository() {
        let git_cli = GitCli::detect();
        if !git_cli.is_available() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        if !git(root, &["init", "-q"]) {
            return;
        }

        fs::write(root.join(".gitignore"), "*.log\n").unwrap();
        fs::write(root.join("main.rs"), "fn main() {}\n").unwrap();
        fs::write(root.join("debug.log"), "noise\n").unwrap();
        fs::create_dir(root.join("src")).unwrap();
        fs::write(root.join("src/lib.rs"), "pub fn f() {}\n").unwrap();

        let mut files = git_cli.list_files(root).unwrap();
        files.sort();
        assert_eq!(
            files,
            vec![
                root.join(".gitignore"),
                root.join("main.rs"),
                root.join("src/lib.rs"),
            ]
        );

        assert!(git_cli.is_ignored(&root.join("debug.log")));
        assert!(!git_cli.is_ignored(&root.join("main.rs")));
    }

    #[test]
    fn test_git_cli_outside_repository() {
        let git_cli = GitCli::detect();
        if !git_cli.is_available() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        // Skip when the temp location itself sits inside a work tree.
        if git(temp_dir.path(), &["rev-parse", "--is-inside-work-tree"]) {
            return;
        }

        let dir = temp_dir.path();
        fs::write(dir.join("a.rs"), "fn a() {}\n").unwrap();
        fs::write(dir.join(".env"), "KEY=1\n").unwrap();

        let err = git_cli.list_files(dir).unwrap_err();
        assert!(err.is_not_a_repository(), "unexpected error: {}", err);

        // check-ignore exits with 128 here, so the hidden-name rule decides.
        assert!(git_cli.is_ignored(&dir.join(".env")));
        assert!(!git_cli.is_ignored(&dir.join("a.rs")));
    }

    #[test]
    fn test_git_cli_outside_repository_with_translated_messages() {
        let git_cli = GitCli::detect()
            .with_env("LANGUAGE", "de")
            .with_env("LANG", "de_DE.UTF-8");
        if !git_cli.is_available() {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        if git(temp_dir.path(), &["rev-parse", "--is-inside-work-tree"]) {
            return;
        }
        fs::write(temp_dir.path().join("a.go"), "package a\n").unwrap();

        let err = git_cli.list_files(temp_dir.path()).unwrap_err();
        assert!(err.is_not_a_repository(), "unexpected error: {}", err);
    }

    #[test]
    fn test_parse_listing() {
        let dir = Path::new("repo");
        let files = parse_listing(dir, b"src/main.rs\0.gitignore\0\0docs/a b.md\0");
        assert_eq!(
            files,
            vec![
                dir.join("src/main.rs"),
                dir.join(".gitignore"),
                dir.join("docs/a b.md"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_listing_keeps_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let dir = Path::new("repo");
        let files = parse_listing(dir, b"ok.rs\0caf\xe9.txt\0");
        assert_eq!(files.len(), 2);
        assert_eq!(
            files[1],
            dir.join(std::ffi::OsStr::from_bytes(b"caf\xe9.txt"))
        );
    }
}
