use std::path::{Path, PathBuf};

use url::Url;

/// Normalizes a distribution name so lookups ignore case and separator style.
pub fn canonicalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(['_', '.'], "-")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VcsKind {
    Git,
    Hg,
    Svn,
    Bzr,
}

impl VcsKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "git" => Some(Self::Git),
            "hg" => Some(Self::Hg),
            "svn" => Some(Self::Svn),
            "bzr" => Some(Self::Bzr),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Hg => "hg",
            Self::Svn => "svn",
            Self::Bzr => "bzr",
        }
    }
}

/// Where a requirement points: a registry version or a direct reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Registry,
    Vcs {
        vcs: VcsKind,
        url: String,
        reference: Option<String>,
        subdirectory: Option<String>,
    },
    Url {
        url: String,
    },
    File {
        path: PathBuf,
    },
    Directory {
        path: PathBuf,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub name: String,
    pub constraint: String,
    pub extras: Vec<String>,
    pub marker: Option<String>,
    pub optional: bool,
    /// Extras of the declaring package that pull this requirement in.
    pub in_extras: Vec<String>,
    pub kind: DependencyKind,
}

impl Dependency {
    pub fn new(name: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: constraint.into(),
            extras: Vec::new(),
            marker: None,
            optional: false,
            in_extras: Vec::new(),
            kind: DependencyKind::Registry,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: DependencyKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        let trimmed = marker.trim();
        self.marker = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    #[must_use]
    pub fn with_extras<I, S>(mut self, extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extras = extras.into_iter().map(Into::into).collect();
        self
    }

    pub fn canonical_name(&self) -> String {
        canonicalize_name(&self.name)
    }

    pub fn is_vcs(&self) -> bool {
        matches!(self.kind, DependencyKind::Vcs { .. })
    }

    pub fn is_url(&self) -> bool {
        matches!(self.kind, DependencyKind::Url { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, DependencyKind::File { .. })
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, DependencyKind::Directory { .. })
    }

    pub fn is_direct_reference(&self) -> bool {
        self.is_vcs() || self.is_url() || self.is_file() || self.is_directory()
    }

    /// Renders the requirement in PEP 508 form, e.g. `foo (>=1.0); python_version >= "3.8"`
    /// or `foo @ git+https://host/foo.git@v1`.
    pub fn to_requirement_string(&self, with_extras: bool) -> String {
        let mut requirement = self.name.clone();
        if with_extras && !self.extras.is_empty() {
            requirement.push('[');
            requirement.push_str(&self.extras.join(","));
            requirement.push(']');
        }
        match &self.kind {
            DependencyKind::Registry => {
                let constraint = self.constraint.trim();
                if !constraint.is_empty() && constraint != "*" {
                    requirement.push_str(" (");
                    requirement.push_str(constraint);
                    requirement.push(')');
                }
            }
            DependencyKind::Vcs {
                vcs,
                url,
                reference,
                subdirectory,
            } => {
                requirement.push_str(" @ ");
                requirement.push_str(vcs.as_str());
                requirement.push('+');
                requirement.push_str(url);
                if let Some(reference) = reference {
                    requirement.push('@');
                    requirement.push_str(reference);
                }
                if let Some(subdirectory) = subdirectory {
                    requirement.push_str("#subdirectory=");
                    requirement.push_str(subdirectory);
                }
            }
            DependencyKind::Url { url } => {
                requirement.push_str(" @ ");
                requirement.push_str(url);
            }
            DependencyKind::File { path } | DependencyKind::Directory { path } => {
                requirement.push_str(" @ ");
                requirement.push_str(&path_reference(path));
            }
        }
        if let Some(marker) = &self.marker {
            requirement.push_str("; ");
            requirement.push_str(marker);
        }
        requirement
    }
}

/// Absolute paths render as `file://` URLs; anything else is passed through as written.
fn path_reference(path: &Path) -> String {
    if path.is_absolute() {
        if let Ok(url) = Url::from_file_path(path) {
            return url.to_string();
        }
    }
    path.to_string_lossy().replace('\\', "/")
}
