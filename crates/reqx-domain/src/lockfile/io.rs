use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use toml_edit::{DocumentMut, Item, Table, Value};

use crate::dependency::canonicalize_name;
use crate::package::{Category, Package, PackageFile, PackageSource};

use super::spec::{parse_dependency_entries, requirement_name};
use super::LockFile;

pub fn load_lockfile(path: &Path) -> Result<LockFile> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let doc: DocumentMut = contents
        .parse()
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(parse_lock_document(&doc, base))
}

pub fn parse_lockfile(contents: &str) -> Result<LockFile> {
    let doc: DocumentMut = contents.parse().context("failed to parse lockfile")?;
    Ok(parse_lock_document(&doc, Path::new("")))
}

/// Relative `path` dependencies inside the lock are resolved against `base`.
pub(crate) fn parse_lock_document(doc: &DocumentMut, base: &Path) -> LockFile {
    let legacy_files = doc
        .get("metadata")
        .and_then(Item::as_table)
        .and_then(|metadata| metadata.get("files"))
        .and_then(Item::as_table)
        .map(parse_legacy_files)
        .unwrap_or_default();

    let packages = doc
        .get("package")
        .and_then(Item::as_array_of_tables)
        .map(|tables| {
            tables
                .iter()
                .filter_map(|table| parse_package(table, &legacy_files, base))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let extras = doc
        .get("extras")
        .and_then(Item::as_table)
        .map(|table| {
            table
                .iter()
                .map(|(extra, members)| (extra.to_string(), string_array(members)))
                .collect::<BTreeMap<_, _>>()
        })
        .unwrap_or_default();

    tracing::debug!(
        packages = packages.len(),
        extras = extras.len(),
        "parsed lock document"
    );
    LockFile::new(packages, extras)
}

fn parse_package(
    table: &Table,
    legacy_files: &HashMap<String, Vec<PackageFile>>,
    base: &Path,
) -> Option<Package> {
    let name = table.get("name").and_then(Item::as_str)?;
    let version = table.get("version").and_then(Item::as_str).unwrap_or_default();
    let mut package = Package::new(name, version);
    package.optional = table
        .get("optional")
        .and_then(Item::as_bool)
        .unwrap_or(false);
    package.develop = table
        .get("develop")
        .and_then(Item::as_bool)
        .unwrap_or(false);
    package.category = table
        .get("category")
        .and_then(Item::as_str)
        .map(Category::parse)
        .unwrap_or_default();
    package.source = table
        .get("source")
        .and_then(Item::as_table_like)
        .and_then(|source| {
            let kind = source.get("type").and_then(Item::as_str)?;
            let url = source.get("url").and_then(Item::as_str)?;
            Some(PackageSource {
                kind: kind.to_string(),
                url: url.to_string(),
            })
        });

    package.files = match table.get("files").and_then(Item::as_array) {
        Some(files) => files.iter().filter_map(file_record).collect(),
        None => legacy_files
            .get(&package.canonical_name())
            .cloned()
            .unwrap_or_default(),
    };

    let extra_members = package_extras(table);
    if let Some(dependencies) = table.get("dependencies").and_then(Item::as_table_like) {
        for (dep_name, item) in dependencies.iter() {
            for mut dependency in parse_dependency_entries(dep_name, item, base) {
                let canonical = dependency.canonical_name();
                dependency.in_extras = extra_members
                    .iter()
                    .filter(|(_, members)| members.contains(&canonical))
                    .map(|(extra, _)| extra.clone())
                    .collect();
                package.requires.push(dependency);
            }
        }
    }
    Some(package)
}

/// Maps each `[package.extras]` name to the canonical names it enables.
fn package_extras(table: &Table) -> Vec<(String, Vec<String>)> {
    table
        .get("extras")
        .and_then(Item::as_table_like)
        .map(|extras| {
            extras
                .iter()
                .map(|(extra, specs)| {
                    let members = string_array(specs)
                        .iter()
                        .map(|spec| canonicalize_name(requirement_name(spec)))
                        .collect();
                    (extra.to_string(), members)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_legacy_files(table: &Table) -> HashMap<String, Vec<PackageFile>> {
    table
        .iter()
        .map(|(name, files)| {
            let records = files
                .as_array()
                .map(|array| array.iter().filter_map(file_record).collect())
                .unwrap_or_default();
            (canonicalize_name(name), records)
        })
        .collect()
}

fn file_record(value: &Value) -> Option<PackageFile> {
    let table = value.as_inline_table()?;
    let hash = table.get("hash").and_then(Value::as_str)?;
    Some(PackageFile {
        file: table
            .get("file")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        hash: hash.to_string(),
    })
}

fn string_array(item: &Item) -> Vec<String> {
    item.as_array()
        .map(|array| {
            array
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
