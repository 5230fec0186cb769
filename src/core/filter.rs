use crate::domain::models::Config;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Accept,
    ExcludedName,
    NotIncluded,
    ExcludedExtension,
}

/// Lower-cased text from the last dot of the file name, or `None` when there
/// is no dot or nothing follows it. A dotfile such as `.env` is its own
/// extension.
pub fn path_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let dot = name.rfind('.')?;
    let ext = &name[dot..];
    if ext.len() == 1 {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Applies the include/exclude rules in precedence order: excluded names,
/// then the include list, then excluded extensions. No I/O.
pub fn evaluate(path: &Path, config: &Config) -> FilterDecision {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    if config.exclude_names().contains(&*name) {
        return FilterDecision::ExcludedName;
    }

    let ext = path_extension(path);

    if !config.include_extensions().is_empty() {
        let included = ext
            .as_deref()
            .is_some_and(|e| config.include_extensions().contains(e));
        if !included {
            return FilterDecision::NotIncluded;
        }
    }

    // An extension in both lists ends up here and is rejected.
    if ext
        .as_deref()
        .is_some_and(|e| config.exclude_extensions().contains(e))
    {
        return FilterDecision::ExcludedExtension;
    }

    FilterDecision::Accept
}

pub fn should_process(path: &Path, config: &Config) -> bool {
    evaluate(path, config) == FilterDecision::Accept
}
