use std::collections::HashMap;

use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

/// A configured package index (`[[tool.poetry.source]]`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageSourceIndex {
    pub name: String,
    url: String,
    pub default: bool,
    credentials: Option<Credentials>,
}

impl PackageSourceIndex {
    pub fn new(name: impl Into<String>, url: &str) -> Self {
        Self {
            name: name.into(),
            url: url.trim_end_matches('/').to_string(),
            default: false,
            credentials: None,
        }
    }

    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The index URL with `user[:password]@` embedded; equals [`Self::url`] without credentials.
    pub fn authenticated_url(&self) -> String {
        let Some(credentials) = &self.credentials else {
            return self.url.clone();
        };
        let Ok(mut parsed) = Url::parse(&self.url) else {
            tracing::warn!(url = %self.url, "cannot embed credentials into unparsable index url");
            return self.url.clone();
        };
        if parsed.set_username(&credentials.username).is_err()
            || parsed.set_password(credentials.password.as_deref()).is_err()
        {
            return self.url.clone();
        }
        parsed.to_string().trim_end_matches('/').to_string()
    }
}

/// Ordered package sources; a default index, when present, sits at position 0.
#[derive(Clone, Debug, Default)]
pub struct Pool {
    repositories: Vec<PackageSourceIndex>,
}

impl Pool {
    pub fn new(repositories: Vec<PackageSourceIndex>) -> Self {
        let mut pool = Self::default();
        for repository in repositories {
            pool.add_repository(repository);
        }
        pool
    }

    pub fn add_repository(&mut self, repository: PackageSourceIndex) {
        if repository.default {
            if self.has_default() {
                tracing::warn!(
                    name = %repository.name,
                    "only one default source is honored; treating as an extra index"
                );
                self.repositories.push(PackageSourceIndex {
                    default: false,
                    ..repository
                });
            } else {
                self.repositories.insert(0, repository);
            }
        } else {
            self.repositories.push(repository);
        }
    }

    pub fn repositories(&self) -> &[PackageSourceIndex] {
        &self.repositories
    }

    pub fn has_default(&self) -> bool {
        self.repositories.first().is_some_and(|repo| repo.default)
    }

    pub fn is_default(&self, repository: &PackageSourceIndex) -> bool {
        self.has_default() && self.repositories.first() == Some(repository)
    }

    pub fn find_by_url(&self, url: &str) -> Option<&PackageSourceIndex> {
        let wanted = url.trim_end_matches('/');
        self.repositories.iter().find(|repo| repo.url == wanted)
    }

    /// Attaches credentials keyed by source name; sources without an entry are untouched.
    pub fn apply_credentials(&mut self, credentials: &HashMap<String, Credentials>) {
        for repository in &mut self.repositories {
            if let Some(found) = credentials.get(&repository.name) {
                repository.credentials = Some(found.clone());
            }
        }
    }
}
