//! Column-name normalization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Table of `{normalized raw name -> canonical name}` renames applied after
/// the generic normalization step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnAliases(BTreeMap<String, String>);

impl Default for ColumnAliases {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert("plateform".to_string(), "platform".to_string());
        aliases.insert("media_type".to_string(), "mediaType".to_string());
        Self(aliases)
    }
}

impl ColumnAliases {
    /// An alias table with no renames at all.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, raw: impl Into<String>, canonical: impl Into<String>) {
        self.0.insert(raw.into(), canonical.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Map a normalized name to its canonical form, or return it unchanged.
    pub fn resolve<'a>(&'a self, normalized: &'a str) -> &'a str {
        self.0.get(normalized).map(String::as_str).unwrap_or(normalized)
    }

    /// Whether `name` is the target of some alias.
    pub fn is_canonical(&self, name: &str) -> bool {
        self.0.values().any(|v| v == name)
    }
}

/// Normalize one header: trim, lower-case, spaces to underscores, then apply
/// the alias table.
///
/// A header that already equals a canonical alias target is kept as-is, so
/// `mediaType` does not degrade to `mediatype` on a second pass.
pub fn normalize_column_name(name: &str, aliases: &ColumnAliases) -> String {
    let trimmed = name.trim();
    if aliases.is_canonical(trimmed) {
        return trimmed.to_string();
    }

    let generic = trimmed.to_lowercase().replace(' ', "_");
    aliases.resolve(&generic).to_string()
}

/// Normalize a full header row.
pub fn normalize_headers<S: AsRef<str>>(names: &[S], aliases: &ColumnAliases) -> Vec<String> {
    names
        .iter()
        .map(|name| normalize_column_name(name.as_ref(), aliases))
        .collect()
}
