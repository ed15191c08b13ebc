use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use crate::dependency::{canonicalize_name, Dependency};
use crate::package::{Category, LockedRepository, Package};

pub(crate) mod io;
pub(crate) mod spec;

pub use io::{load_lockfile, parse_lockfile};

/// Read access to a resolved lock, as consumed by exporters.
pub trait Locker {
    /// Locked packages for the main group, or main plus development when `dev` is set.
    fn locked_repository(&self, dev: bool) -> LockedRepository;

    /// Transitive closure of `requires`, one entry per distinct marker condition
    /// under which a name is reached. Without `with_nested` only the given
    /// requirements are returned (deduplicated).
    fn project_dependencies(&self, requires: &[Dependency], with_nested: bool) -> Vec<Dependency>;

    /// `[extras]` table of the lock: extra name to package names.
    fn extras_mapping(&self) -> &BTreeMap<String, Vec<String>>;
}

#[derive(Clone, Debug, Default)]
pub struct LockFile {
    packages: Vec<Package>,
    extras: BTreeMap<String, Vec<String>>,
}

impl LockFile {
    pub fn new(packages: Vec<Package>, extras: BTreeMap<String, Vec<String>>) -> Self {
        Self { packages, extras }
    }
}

impl Locker for LockFile {
    fn locked_repository(&self, dev: bool) -> LockedRepository {
        let packages = self
            .packages
            .iter()
            .filter(|package| dev || package.category == Category::Main)
            .cloned()
            .collect();
        LockedRepository::new(packages)
    }

    fn project_dependencies(&self, requires: &[Dependency], with_nested: bool) -> Vec<Dependency> {
        let repository = self.locked_repository(true);
        let mut reached: HashMap<String, Vec<MarkerClauses>> = HashMap::new();
        let mut queue: VecDeque<(Dependency, MarkerClauses)> = requires
            .iter()
            .map(|dependency| {
                let clauses = dependency.marker.iter().cloned().collect();
                (dependency.clone(), clauses)
            })
            .collect();
        let mut closure: Vec<(Dependency, MarkerClauses)> = Vec::new();

        while let Some((dependency, clauses)) = queue.pop_front() {
            let seen = reached.entry(dependency.canonical_name()).or_default();
            // An already reached path with fewer conditions covers this one.
            if seen.iter().any(|known| known.is_subset(&clauses)) {
                continue;
            }
            seen.push(clauses.clone());
            if with_nested {
                if let Some(package) = repository.find_package(&dependency) {
                    for child in &package.requires {
                        if child.optional && !requested_by(child, &dependency) {
                            continue;
                        }
                        let mut child_clauses = clauses.clone();
                        child_clauses.extend(child.marker.iter().cloned());
                        let mut child = child.clone();
                        child.marker = render_marker(&child_clauses);
                        queue.push_back((child, child_clauses));
                    }
                }
            }
            closure.push((dependency, clauses));
        }

        closure
            .into_iter()
            .filter(|(dependency, clauses)| {
                !reached[&dependency.canonical_name()]
                    .iter()
                    .any(|known| known != clauses && known.is_subset(clauses))
            })
            .map(|(dependency, _)| dependency)
            .collect()
    }

    fn extras_mapping(&self) -> &BTreeMap<String, Vec<String>> {
        &self.extras
    }
}

fn requested_by(child: &Dependency, parent: &Dependency) -> bool {
    child.in_extras.iter().any(|extra| {
        let extra = canonicalize_name(extra);
        parent
            .extras
            .iter()
            .any(|requested| canonicalize_name(requested) == extra)
    })
}

/// Marker clauses that must all hold on a path from the root to a dependency.
type MarkerClauses = BTreeSet<String>;

fn render_marker(clauses: &MarkerClauses) -> Option<String> {
    match clauses.len() {
        0 => None,
        1 => clauses.iter().next().cloned(),
        _ => Some(
            clauses
                .iter()
                .map(|clause| format!("({clause})"))
                .collect::<Vec<_>>()
                .join(" and "),
        ),
    }
}
