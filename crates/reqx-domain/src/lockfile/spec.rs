use std::path::{Component, Path, PathBuf};

use toml_edit::{InlineTable, Item, Value};

use crate::dependency::{Dependency, DependencyKind, VcsKind};

const ARCHIVE_SUFFIXES: &[&str] = &[".whl", ".zip", ".tar.gz", ".tgz", ".tar.bz2", ".tar"];

/// Parses one `name = <constraint>` entry from a dependency table. Array entries
/// (multiple-constraint dependencies) yield one requirement per element. Relative
/// `path` entries are resolved against `base`.
pub(crate) fn parse_dependency_entries(name: &str, item: &Item, base: &Path) -> Vec<Dependency> {
    if let Some(constraint) = item.as_str() {
        return vec![Dependency::new(name, constraint)];
    }
    if let Some(table) = item.as_inline_table() {
        return vec![dependency_from_table(name, table, base)];
    }
    if let Some(array) = item.as_array() {
        return array
            .iter()
            .filter_map(Value::as_inline_table)
            .map(|table| dependency_from_table(name, table, base))
            .collect();
    }
    if let Some(table) = item.as_table() {
        return vec![dependency_from_table(
            name,
            &table.clone().into_inline_table(),
            base,
        )];
    }
    if let Some(tables) = item.as_array_of_tables() {
        return tables
            .iter()
            .map(|table| dependency_from_table(name, &table.clone().into_inline_table(), base))
            .collect();
    }
    tracing::debug!(name, "ignoring dependency entry with unsupported shape");
    Vec::new()
}

fn dependency_from_table(name: &str, table: &InlineTable, base: &Path) -> Dependency {
    let get_str = |key: &str| table.get(key).and_then(Value::as_str).map(str::to_string);
    let get_bool = |key: &str| table.get(key).and_then(Value::as_bool).unwrap_or(false);

    let mut dependency = Dependency::new(name, get_str("version").unwrap_or_else(|| "*".into()));
    if let Some(marker) = get_str("markers") {
        dependency = dependency.with_marker(marker);
    }
    if let Some(extras) = table.get("extras").and_then(Value::as_array) {
        dependency = dependency.with_extras(extras.iter().filter_map(Value::as_str));
    }
    dependency.optional = get_bool("optional");
    dependency.kind = dependency_kind(&get_str, base);
    dependency
}

fn dependency_kind(get_str: &dyn Fn(&str) -> Option<String>, base: &Path) -> DependencyKind {
    for vcs in ["git", "hg", "svn", "bzr"] {
        if let Some(url) = get_str(vcs) {
            let reference = get_str("rev")
                .or_else(|| get_str("tag"))
                .or_else(|| get_str("branch"));
            return DependencyKind::Vcs {
                vcs: VcsKind::parse(vcs).unwrap_or(VcsKind::Git),
                url,
                reference,
                subdirectory: get_str("subdirectory"),
            };
        }
    }
    if let Some(url) = get_str("url") {
        return DependencyKind::Url { url };
    }
    if let Some(path) = get_str("path") {
        let path_buf = resolve_path(base, Path::new(&path));
        return if is_archive_path(&path) || path_buf.is_file() {
            DependencyKind::File { path: path_buf }
        } else {
            DependencyKind::Directory { path: path_buf }
        };
    }
    DependencyKind::Registry
}

/// Joins `path` onto `base` and folds `.`/`..` lexically. `..` that would climb
/// above a relative base is kept.
fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    let joined = base.join(path);
    let mut normalized = PathBuf::new();
    let mut depth = 0usize;
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::Normal(part) => {
                normalized.push(part);
                depth += 1;
            }
            Component::ParentDir => {
                if depth > 0 {
                    normalized.pop();
                    depth -= 1;
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
        }
    }
    normalized
}

fn is_archive_path(path: &str) -> bool {
    let lowered = path.to_ascii_lowercase();
    ARCHIVE_SUFFIXES
        .iter()
        .any(|suffix| lowered.ends_with(suffix))
}

/// Extracts the distribution name from a requirement such as `PySocks (>=1.5.6,!=1.5.7)`.
pub(crate) fn requirement_name(spec: &str) -> &str {
    let trimmed = spec.trim();
    let end = trimmed
        .find(|ch: char| {
            ch.is_ascii_whitespace() || matches!(ch, '(' | '[' | '<' | '>' | '=' | '!' | '~' | ';' | '@')
        })
        .unwrap_or(trimmed.len());
    &trimmed[..end]
}
