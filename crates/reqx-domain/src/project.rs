use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use toml_edit::{DocumentMut, Item, Table};

use crate::dependency::Dependency;
use crate::lockfile::{load_lockfile, Locker};
use crate::lockfile::spec::parse_dependency_entries;
use crate::pool::{PackageSourceIndex, Pool};

pub const MANIFEST_FILE: &str = "pyproject.toml";
pub const LOCK_FILE: &str = "poetry.lock";

/// The project being exported: its declared requirements.
#[derive(Clone, Debug, Default)]
pub struct RootPackage {
    pub requires: Vec<Dependency>,
    pub dev_requires: Vec<Dependency>,
}

impl RootPackage {
    pub fn all_requires(&self) -> Vec<Dependency> {
        self.requires
            .iter()
            .chain(self.dev_requires.iter())
            .cloned()
            .collect()
    }
}

pub struct Project {
    pub root_dir: PathBuf,
    pub package: RootPackage,
    pub locker: Box<dyn Locker>,
    pub pool: Pool,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("root_dir", &self.root_dir)
            .field("package", &self.package)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

/// Loads `pyproject.toml` and `poetry.lock` from `root`.
pub fn read_project(root: &Path) -> Result<Project> {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let manifest_path = root.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        return Err(anyhow!("{MANIFEST_FILE} not found in {}", root.display()));
    }
    let contents = fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    let doc: DocumentMut = contents
        .parse()
        .with_context(|| format!("failed to parse {}", manifest_path.display()))?;
    let (package, pool) = project_from_doc(&doc, &root)?;

    let lock_path = root.join(LOCK_FILE);
    if !lock_path.exists() {
        return Err(anyhow!(
            "{LOCK_FILE} not found in {}; lock the project before exporting",
            root.display()
        ));
    }
    let locker = load_lockfile(&lock_path)?;

    Ok(Project {
        root_dir: root,
        package,
        locker: Box::new(locker),
        pool,
    })
}

/// Reads the root requirements and package sources from a parsed manifest.
/// Relative path dependencies are resolved against `root`.
pub fn project_from_doc(doc: &DocumentMut, root: &Path) -> Result<(RootPackage, Pool)> {
    let poetry = doc
        .get("tool")
        .and_then(Item::as_table)
        .and_then(|tool| tool.get("poetry"))
        .and_then(Item::as_table)
        .ok_or_else(|| anyhow!("[tool.poetry] section not found in {MANIFEST_FILE}"))?;

    let requires = poetry
        .get("dependencies")
        .and_then(Item::as_table)
        .map(|table| dependency_table(table, root))
        .unwrap_or_default();

    let mut dev_requires = poetry
        .get("dev-dependencies")
        .and_then(Item::as_table)
        .map(|table| dependency_table(table, root))
        .unwrap_or_default();
    if let Some(groups) = poetry.get("group").and_then(Item::as_table) {
        for (_, group) in groups.iter() {
            if let Some(table) = group
                .as_table()
                .and_then(|group| group.get("dependencies"))
                .and_then(Item::as_table)
            {
                dev_requires.extend(dependency_table(table, root));
            }
        }
    }

    let sources = poetry
        .get("source")
        .and_then(Item::as_array_of_tables)
        .map(|tables| tables.iter().filter_map(source_index).collect())
        .unwrap_or_default();

    Ok((
        RootPackage {
            requires,
            dev_requires,
        },
        Pool::new(sources),
    ))
}

fn dependency_table(table: &Table, root: &Path) -> Vec<Dependency> {
    table
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("python"))
        .flat_map(|(name, item)| parse_dependency_entries(name, item, root))
        .collect()
}

fn source_index(table: &Table) -> Option<PackageSourceIndex> {
    let name = table.get("name").and_then(Item::as_str)?;
    let url = table.get("url").and_then(Item::as_str)?;
    let mut index = PackageSourceIndex::new(name, url);
    index.default = table.get("default").and_then(Item::as_bool).unwrap_or(false)
        || table.get("priority").and_then(Item::as_str) == Some("default");
    Some(index)
}
