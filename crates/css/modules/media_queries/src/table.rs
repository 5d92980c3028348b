//! Named breakpoint table.

use indexmap::{IndexMap, IndexSet};
use log::{trace, warn};

use crate::GENERAL;
use crate::rank::rank_media_query;

/// Built-in breakpoints in declaration order.
const BUILTIN_QUERIES: [(&str, &str); 10] = [
    ("min_width_1405", "@media only screen and ( min-width: 1405px )"),
    (
        "1100_1405",
        "@media only screen and ( min-width: 1100px ) and ( max-width: 1405px)",
    ),
    (
        "981_1405",
        "@media only screen and ( min-width: 981px ) and ( max-width: 1405px)",
    ),
    (
        "981_1100",
        "@media only screen and ( min-width: 981px ) and ( max-width: 1100px )",
    ),
    ("min_width_981", "@media only screen and ( min-width: 981px )"),
    ("max_width_980", "@media only screen and ( max-width: 980px )"),
    (
        "768_980",
        "@media only screen and ( min-width: 768px ) and ( max-width: 980px )",
    ),
    ("min_width_768", "@media only screen and ( min-width: 768px )"),
    ("max_width_767", "@media only screen and ( max-width: 767px )"),
    ("max_width_479", "@media only screen and ( max-width: 479px )"),
];

/// Alias names resolving to another breakpoint name.
const BUILTIN_ALIASES: [(&str, &str); 1] = [("mobile", "max_width_767")];

/// Ordered mapping from breakpoint name to its `@media` prelude.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaQueryTable {
    /// Breakpoint name to media query, in declaration order.
    queries: IndexMap<String, String>,
    /// Alias name to breakpoint name.
    aliases: IndexMap<String, String>,
}

impl Default for MediaQueryTable {
    #[inline]
    fn default() -> Self {
        Self::builtin()
    }
}

impl MediaQueryTable {
    /// The stock breakpoint table.
    pub fn builtin() -> Self {
        let queries = BUILTIN_QUERIES
            .iter()
            .map(|&(name, query)| (name.to_owned(), query.to_owned()))
            .collect();
        let aliases = BUILTIN_ALIASES
            .iter()
            .map(|&(alias, target)| (alias.to_owned(), target.to_owned()))
            .collect();
        Self { queries, aliases }
    }

    /// The stock table with `overrides` applied on top.
    ///
    /// Existing names keep their position and take the new query; unknown names are appended.
    /// An empty query removes the breakpoint.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::builtin();
        for (raw_name, raw_query) in overrides {
            let name = raw_name.into();
            let query = raw_query.into();
            if query.trim().is_empty() {
                trace!("media query table: removing breakpoint {name}");
                table.queries.shift_remove(&name);
            } else {
                table.queries.insert(name, query);
            }
        }
        table
    }

    /// Look up a breakpoint by name or alias.
    pub fn get(&self, name: &str) -> Option<&str> {
        let target = self.aliases.get(name).map_or(name, String::as_str);
        self.queries.get(target).map(String::as_str)
    }

    /// Resolve an `atRules` value into a bucket key.
    ///
    /// Empty values map to [`GENERAL`], breakpoint names and aliases map to their query, and
    /// `@`-prefixed values are taken as verbatim media queries. Unknown names fall back to
    /// [`GENERAL`], since they would not serialize as valid CSS.
    pub fn resolve<'table>(&'table self, at_rules: &'table str) -> &'table str {
        let trimmed = at_rules.trim();
        if trimmed.is_empty() || trimmed == GENERAL {
            return GENERAL;
        }
        if trimmed.starts_with('@') {
            return trimmed;
        }
        self.get(trimmed).unwrap_or_else(|| {
            warn!("unknown breakpoint {trimmed:?}, using the general bucket");
            GENERAL
        })
    }

    /// Breakpoints in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.queries
            .iter()
            .map(|(name, query)| (name.as_str(), query.as_str()))
    }

    /// Number of breakpoints (aliases excluded).
    #[inline]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether the table holds no breakpoints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Canonical bucket order used when serializing: [`GENERAL`] first, then every configured
    /// query once by cascade rank. Queries with equal rank keep table order, and a query
    /// shared by several names sits where its first name does.
    pub fn render_order(&self) -> Vec<&str> {
        let unique: IndexSet<&str> = self.queries.values().map(String::as_str).collect();
        let mut ordered: Vec<&str> = unique.into_iter().collect();
        ordered.sort_by_key(|query| rank_media_query(query));
        let mut out = Vec::with_capacity(ordered.len() + 1);
        out.push(GENERAL);
        out.extend(ordered);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_alias_resolves_to_767() {
        let table = MediaQueryTable::builtin();
        assert_eq!(table.get("mobile"), table.get("max_width_767"));
        assert_eq!(
            table.resolve("mobile"),
            "@media only screen and ( max-width: 767px )"
        );
    }

    #[test]
    fn resolve_keeps_verbatim_queries() {
        let table = MediaQueryTable::builtin();
        let custom = "@media print";
        assert_eq!(table.resolve(custom), custom);
        assert_eq!(table.resolve("  "), GENERAL);
    }

    #[test]
    fn unknown_names_fall_back_to_general() {
        let table = MediaQueryTable::with_overrides([("max_width_479", "")]);
        assert_eq!(table.resolve("max_width_479"), GENERAL);
        assert_eq!(table.resolve("tablet_only"), GENERAL);
    }

    #[test]
    fn empty_override_removes_breakpoint() {
        let table = MediaQueryTable::with_overrides([("max_width_479", "")]);
        assert!(table.get("max_width_479").is_none());
        assert_eq!(table.len(), BUILTIN_QUERIES.len() - 1);
    }
}
