use crate::domain::errors::ConfigError;
use crate::infra::vcs::VcsQuery;
use indexmap::IndexSet;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_TEMPLATE: &str = "\nFile: {path}\n```\n{content}\n```\n";

pub const PATH_PLACEHOLDER: &str = "{path}";
pub const CONTENT_PLACEHOLDER: &str = "{content}";

/// A single configuration effect applied by [`Config::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOption {
    IncludeExtensions(Vec<String>),
    ExcludeExtensions(Vec<String>),
    ExcludeNames(Vec<String>),
    BypassIgnore(bool),
    Verbose(bool),
}

/// Immutable run configuration.
///
/// Extensions are stored lower-cased with a leading dot, so `"RS"`,
/// `"rs"` and `".rs"` all end up as `".rs"`.
#[derive(Clone)]
pub struct Config {
    template: String,
    include_extensions: IndexSet<String>,
    exclude_extensions: IndexSet<String>,
    exclude_names: IndexSet<String>,
    bypass_ignore: bool,
    verbose: bool,
    vcs: Arc<dyn VcsQuery>,
}

impl Config {
    pub fn new<I>(
        template: impl Into<String>,
        vcs: Arc<dyn VcsQuery>,
        options: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        let template = template.into();
        if template.is_empty() {
            return Err(ConfigError::EmptyTemplate);
        }
        if !template.contains(CONTENT_PLACEHOLDER) {
            return Err(ConfigError::MissingContentPlaceholder { template });
        }

        let mut config = Config {
            template,
            include_extensions: IndexSet::new(),
            exclude_extensions: IndexSet::new(),
            exclude_names: IndexSet::new(),
            bypass_ignore: false,
            verbose: false,
            vcs,
        };

        for option in options {
            match option {
                ConfigOption::IncludeExtensions(exts) => {
                    config.include_extensions = normalize_extensions(&exts);
                }
                ConfigOption::ExcludeExtensions(exts) => {
                    config.exclude_extensions = normalize_extensions(&exts);
                }
                ConfigOption::ExcludeNames(names) => {
                    config.exclude_names = names
                        .iter()
                        .map(|n| n.trim())
                        .filter(|n| !n.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                ConfigOption::BypassIgnore(flag) => config.bypass_ignore = flag,
                ConfigOption::Verbose(flag) => config.verbose = flag,
            }
        }

        Ok(config)
    }

    /// Splits a comma-separated command-line value into its entries.
    pub fn parse_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn include_extensions(&self) -> &IndexSet<String> {
        &self.include_extensions
    }

    pub fn exclude_extensions(&self) -> &IndexSet<String> {
        &self.exclude_extensions
    }

    pub fn exclude_names(&self) -> &IndexSet<String> {
        &self.exclude_names
    }

    pub fn bypass_ignore(&self) -> bool {
        self.bypass_ignore
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn vcs(&self) -> &dyn VcsQuery {
        self.vcs.as_ref()
    }

    /// Substitutes `{path}` and `{content}` into the template.
    pub fn render(&self, path: &str, content: &str) -> String {
        // Single pass: placeholder text inside a path or file body stays literal.
        let mut out = String::with_capacity(self.template.len() + path.len() + content.len());
        let mut rest = self.template.as_str();

        while let Some(idx) = rest.find('{') {
            out.push_str(&rest[..idx]);
            let tail = &rest[idx..];
            if let Some(after) = tail.strip_prefix(PATH_PLACEHOLDER) {
                out.push_str(path);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(CONTENT_PLACEHOLDER) {
                out.push_str(content);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("template", &self.template)
            .field("include_extensions", &self.include_extensions)
            .field("exclude_extensions", &self.exclude_extensions)
            .field("exclude_names", &self.exclude_names)
            .field("bypass_ignore", &self.bypass_ignore)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

pub fn normalize_extension(ext: &str) -> Option<String> {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

fn normalize_extensions(exts: &[String]) -> IndexSet<String> {
    exts.iter()
        .filter_map(|e| normalize_extension(e))
        .collect()
}

/// Counts over the wrapped document.
///
/// `char_count` is in Unicode scalar values, not bytes, so multi-byte text
/// counts once per character. `line_count` is newlines plus one and
/// `token_count` is the number of whitespace-separated runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub files_processed: usize,
    pub files_total: usize,
    pub char_count: usize,
    pub line_count: usize,
    pub token_count: usize,
}

/// The finished document together with the statistics computed over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub document: String,
    pub stats: RunStats,
}
