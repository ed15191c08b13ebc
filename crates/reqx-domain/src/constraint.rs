use std::str::FromStr;

use pep440_rs::{Version, VersionSpecifiers};

/// Checks `version` against a Poetry-style constraint (`^1.2`, `~1.2.3`, `>=1,<2`,
/// `1.2.*`, `a || b`). Returns `None` when either side does not parse.
pub fn constraint_allows(constraint: &str, version: &str) -> Option<bool> {
    let version = Version::from_str(version.trim()).ok()?;
    let mut allowed = false;
    for group in constraint.split("||") {
        allowed |= group_allows(group, &version)?;
    }
    Some(allowed)
}

fn group_allows(group: &str, version: &Version) -> Option<bool> {
    let clauses = pep440_clauses(&collapse_operator_spaces(group))?;
    if clauses.is_empty() {
        return Some(true);
    }
    let specifiers = VersionSpecifiers::from_str(&clauses.join(",")).ok()?;
    Some(specifiers.contains(version))
}

/// `>= 1.0` becomes `>=1.0` so whitespace can separate clauses.
fn collapse_operator_spaces(group: &str) -> String {
    let mut collapsed = String::with_capacity(group.len());
    let mut after_operator = false;
    for ch in group.chars() {
        if after_operator && ch.is_ascii_whitespace() {
            continue;
        }
        after_operator = matches!(ch, '<' | '>' | '=' | '!' | '~' | '^');
        collapsed.push(ch);
    }
    collapsed
}

fn pep440_clauses(group: &str) -> Option<Vec<String>> {
    let mut clauses = Vec::new();
    for atom in group
        .split(|ch: char| ch == ',' || ch.is_ascii_whitespace())
        .filter(|atom| !atom.is_empty())
    {
        if atom == "*" {
            continue;
        }
        if let Some(rest) = atom.strip_prefix('^') {
            clauses.extend(caret_bounds(rest)?);
        } else if atom.starts_with("~=") || atom.starts_with("===") {
            clauses.push(atom.to_string());
        } else if let Some(rest) = atom.strip_prefix('~') {
            clauses.extend(tilde_bounds(rest)?);
        } else if atom.starts_with(['<', '>', '!']) || atom.starts_with("==") {
            clauses.push(atom.to_string());
        } else if let Some(rest) = atom.strip_prefix('=') {
            clauses.push(format!("=={rest}"));
        } else {
            clauses.push(format!("=={atom}"));
        }
    }
    Some(clauses)
}

fn release_parts(version: &str) -> Option<Vec<u64>> {
    let parts = version
        .trim()
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}

fn join_release(parts: &[u64]) -> String {
    parts
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// `^1.2.3` is `>=1.2.3,<2.0.0`; `^0.2.3` is `>=0.2.3,<0.3.0`; `^0.0.3` is `>=0.0.3,<0.0.4`.
fn caret_bounds(version: &str) -> Option<Vec<String>> {
    let parts = release_parts(version)?;
    let bump = parts
        .iter()
        .position(|part| *part != 0)
        .unwrap_or(parts.len() - 1);
    let mut upper = parts[..=bump].to_vec();
    upper[bump] += 1;
    upper.resize(parts.len(), 0);
    Some(vec![
        format!(">={}", join_release(&parts)),
        format!("<{}", join_release(&upper)),
    ])
}

/// `~1.2.3` is `>=1.2.3,<1.3.0`; `~1` is `>=1,<2`.
fn tilde_bounds(version: &str) -> Option<Vec<String>> {
    let parts = release_parts(version)?;
    let bump = if parts.len() > 1 { 1 } else { 0 };
    let mut upper = parts[..=bump].to_vec();
    upper[bump] += 1;
    upper.resize(parts.len(), 0);
    Some(vec![
        format!(">={}", join_release(&parts)),
        format!("<{}", join_release(&upper)),
    ])
}
