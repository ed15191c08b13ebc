use std::str::FromStr;

use pep440_rs::Version;

use crate::constraint::constraint_allows;
use crate::dependency::{canonicalize_name, Dependency};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Category {
    #[default]
    Main,
    Dev,
}

impl Category {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "dev" => Self::Dev,
            _ => Self::Main,
        }
    }
}

/// A locked distribution file and its integrity hash (`algo:digest` or a bare sha256 digest).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackageFile {
    pub file: String,
    pub hash: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageSource {
    pub kind: String,
    pub url: String,
}

impl PackageSource {
    /// Only `legacy` sources are package indexes; vcs/url/file/directory sources are not.
    pub fn is_index(&self) -> bool {
        self.kind == "legacy"
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub optional: bool,
    pub develop: bool,
    pub category: Category,
    pub source: Option<PackageSource>,
    pub files: Vec<PackageFile>,
    pub requires: Vec<Dependency>,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            optional: false,
            develop: false,
            category: Category::Main,
            source: None,
            files: Vec::new(),
            requires: Vec::new(),
        }
    }

    pub fn canonical_name(&self) -> String {
        canonicalize_name(&self.name)
    }

    /// Index URL the package was locked from, if it came from a package index.
    pub fn source_url(&self) -> Option<&str> {
        self.source
            .as_ref()
            .filter(|source| source.is_index())
            .map(|source| source.url.as_str())
    }
}

#[derive(Clone, Debug, Default)]
pub struct LockedRepository {
    packages: Vec<Package>,
}

impl LockedRepository {
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn find_packages(&self, dependency: &Dependency) -> Vec<&Package> {
        let name = dependency.canonical_name();
        self.packages
            .iter()
            .filter(|package| package.canonical_name() == name)
            .collect()
    }

    /// Resolves a dependency to one locked package. Candidates are narrowed to
    /// versions the dependency's constraint allows; when that leaves nothing (or the
    /// constraint does not parse) every same-named package stays a candidate. Among
    /// several candidates the highest version wins; unparsable versions keep lock order.
    pub fn find_package(&self, dependency: &Dependency) -> Option<&Package> {
        let named = self.find_packages(dependency);
        let allowed: Vec<&Package> = named
            .iter()
            .copied()
            .filter(|package| {
                constraint_allows(&dependency.constraint, &package.version).unwrap_or(false)
            })
            .collect();
        let candidates = if allowed.is_empty() {
            if !named.is_empty() {
                tracing::debug!(
                    name = %dependency.name,
                    constraint = %dependency.constraint,
                    "no locked version satisfies constraint; matching by name"
                );
            }
            named
        } else {
            allowed
        };
        if candidates.len() > 1 {
            tracing::debug!(
                name = %dependency.name,
                candidates = candidates.len(),
                "multiple locked packages match dependency"
            );
        }
        let mut best: Option<(&Package, Option<Version>)> = None;
        for package in candidates {
            let version = Version::from_str(&package.version).ok();
            let replace = match &best {
                None => true,
                Some((_, Some(current))) => version.as_ref().is_some_and(|v| v > current),
                Some((_, None)) => false,
            };
            if replace {
                best = Some((package, version));
            }
        }
        best.map(|(package, _)| package)
    }
}
