//! Domain scope resolution
//!
//! Derives the candidate cookie scopes for the active tab's hostname: the
//! exact host, every strict parent domain, and the two-label root domain.

use crate::i18n;

/// How broadly a scope matches relative to the active hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeLevel {
    Current,
    Parent,
    Root,
}

/// One selectable cookie domain scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    pub level: ScopeLevel,
    pub value: String,
    pub label: String,
    pub description: String,
}

impl DomainScope {
    fn new(level: ScopeLevel, value: String) -> Self {
        let label = value.clone();
        let description = i18n::scope_description(level);
        Self {
            level,
            value,
            label,
            description,
        }
    }
}

/// Enumerate the candidate scopes for `hostname`, most specific first.
///
/// Parent and root values carry a leading `.` (host plus subdomains). The
/// root scope is skipped when a parent with the same value was already
/// emitted, so a three-label host yields a single `.example.com` entry.
pub fn resolve(hostname: &str) -> Vec<DomainScope> {
    let parts: Vec<&str> = hostname.split('.').collect();
    let mut scopes = vec![DomainScope::new(ScopeLevel::Current, hostname.to_string())];

    if parts.len() > 2 {
        for i in 1..=parts.len() - 2 {
            let value = format!(".{}", parts[i..].join("."));
            scopes.push(DomainScope::new(ScopeLevel::Parent, value));
        }
    }

    if parts.len() >= 2 {
        let root = format!(".{}", parts[parts.len() - 2..].join("."));
        // Dedup by value, not index: the last parent is the root whenever
        // the hostname has exactly three labels.
        if !scopes.iter().any(|scope| scope.value == root) {
            scopes.push(DomainScope::new(ScopeLevel::Root, root));
        }
    }

    scopes
}

/// The scope preselected after resolution: the first parent-level entry if
/// one exists, otherwise the bare hostname.
pub fn default_selection(scopes: &[DomainScope], hostname: &str) -> String {
    scopes
        .iter()
        .find(|scope| scope.level == ScopeLevel::Parent)
        .map(|scope| scope.value.clone())
        .unwrap_or_else(|| hostname.to_string())
}
