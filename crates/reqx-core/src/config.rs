use std::collections::HashMap;
use std::env;

use reqx_domain::{Credentials, Pool};

const CREDENTIAL_PREFIX: &str = "REQX_HTTP_BASIC_";

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

/// `REQX_HTTP_BASIC_<SOURCE>_USERNAME` key stem for a source name.
fn credential_key(source: &str) -> String {
    let mut key = String::from(CREDENTIAL_PREFIX);
    key.push_str(&source.to_ascii_uppercase().replace(['-', '.'], "_"));
    key
}

/// Reads HTTP basic credentials for every source in `pool` that has a username set.
pub(crate) fn source_credentials(snapshot: &EnvSnapshot, pool: &Pool) -> HashMap<String, Credentials> {
    let mut found = HashMap::new();
    for repository in pool.repositories() {
        let stem = credential_key(&repository.name);
        let Some(username) = snapshot.var(&format!("{stem}_USERNAME")) else {
            continue;
        };
        tracing::debug!(source = %repository.name, "using credentials from environment");
        found.insert(
            repository.name.clone(),
            Credentials {
                username: username.to_string(),
                password: snapshot
                    .var(&format!("{stem}_PASSWORD"))
                    .map(str::to_string),
            },
        );
    }
    found
}
