#![deny(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod constraint;
pub mod dependency;
pub mod extras;
pub mod lockfile;
pub mod package;
pub mod pool;
pub mod project;

pub use constraint::constraint_allows;
pub use dependency::{canonicalize_name, Dependency, DependencyKind, VcsKind};
pub use extras::resolve_extra_package_names;
pub use lockfile::{load_lockfile, parse_lockfile, LockFile, Locker};
pub use package::{Category, LockedRepository, Package, PackageFile, PackageSource};
pub use pool::{Credentials, PackageSourceIndex, Pool};
pub use project::{project_from_doc, read_project, Project, RootPackage, LOCK_FILE, MANIFEST_FILE};
