use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::dependency::canonicalize_name;
use crate::package::Package;

/// Collects the canonical names of every locked package reachable from the
/// requested extras, following each package's locked requirements.
pub fn resolve_extra_package_names(
    packages: &[Package],
    extras: &BTreeMap<String, Vec<String>>,
    requested: &[String],
) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    if requested.is_empty() {
        return names;
    }

    let by_name: HashMap<String, &Package> = packages
        .iter()
        .map(|package| (package.canonical_name(), package))
        .collect();

    let mut pending = Vec::new();
    for extra in requested {
        match extras.get(extra) {
            Some(members) => pending.extend(members.iter().map(|name| canonicalize_name(name))),
            None => tracing::warn!(extra = %extra, "extra is not declared in the lock file"),
        }
    }

    while let Some(name) = pending.pop() {
        if names.contains(&name) {
            continue;
        }
        let Some(package) = by_name.get(&name) else {
            continue;
        };
        names.insert(name);
        pending.extend(package.requires.iter().map(|dep| dep.canonical_name()));
    }
    names
}
