//! The legacy field-alias table.

use indexmap::IndexMap;

/// Alias pairs of the stock SPIRES-style field set. Canonical names are
/// single words so that printed queries re-parse.
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("a", "author"),
    ("au", "author"),
    ("author", "author"),
    ("name", "author"),
    ("t", "title"),
    ("ti", "title"),
    ("title", "title"),
    ("d", "date"),
    ("date", "date"),
    ("af", "affiliation"),
    ("aff", "affiliation"),
    ("affil", "affiliation"),
    ("affiliation", "affiliation"),
    ("institution", "affiliation"),
    ("inst", "affiliation"),
    ("j", "journal"),
    ("journal", "journal"),
    ("exp", "experiment"),
    ("experiment", "experiment"),
    ("ft", "fulltext"),
    ("fulltext", "fulltext"),
    ("r", "report"),
    ("rn", "report"),
    ("rept", "report"),
    ("report", "report"),
    ("k", "keyword"),
    ("kw", "keyword"),
    ("keyword", "keyword"),
    ("keywords", "keyword"),
    ("doi", "doi"),
    ("topcite", "cited"),
    ("cited", "cited"),
    ("refersto", "refersto"),
    ("citedby", "citedby"),
    ("texkey", "texkey"),
    ("recid", "recid"),
    ("any", "anyfield"),
    ("anyfield", "anyfield"),
    ("ac", "authorcount"),
    ("authorcount", "authorcount"),
    ("cc", "country"),
    ("country", "country"),
    ("cn", "collaboration"),
    ("collaboration", "collaboration"),
    ("cnum", "confnumber"),
    ("confnumber", "confnumber"),
    ("eprint", "eprint"),
    ("fa", "firstauthor"),
    ("firstauthor", "firstauthor"),
    ("ea", "exactauthor"),
    ("exactauthor", "exactauthor"),
    ("jp", "journalpage"),
    ("journalpage", "journalpage"),
    ("jy", "journalyear"),
    ("journal-year", "journalyear"),
    ("subject", "subject"),
    ("field", "subject"),
    ("scl", "scl"),
    ("ps", "ps"),
    ("type", "type"),
    ("coden", "coden"),
];

/// Maps legacy field names to canonical index field names.
///
/// Lookup is case-insensitive. Unknown names pass through unchanged unless a
/// fallback field is configured, in which case they collapse onto it:
///
/// ```rust
/// use bibql_walkers::LegacyFieldMap;
///
/// let fields = LegacyFieldMap::default();
/// assert_eq!(fields.resolve("AU"), "author");
/// assert_eq!(fields.resolve("primarch"), "primarch");
///
/// let collapsing = LegacyFieldMap::default().with_fallback("anyfield");
/// assert_eq!(collapsing.resolve("primarch"), "anyfield");
/// ```
#[derive(Debug, Clone)]
pub struct LegacyFieldMap {
    aliases: IndexMap<String, String>,
    fallback: Option<String>,
}

impl Default for LegacyFieldMap {
    fn default() -> Self {
        let mut map = Self::empty();
        for (alias, canonical) in DEFAULT_ALIASES {
            map.insert(alias, canonical);
        }
        map
    }
}

impl LegacyFieldMap {
    /// A map with no aliases and no fallback; every name resolves to itself.
    pub fn empty() -> Self {
        Self {
            aliases: IndexMap::new(),
            fallback: None,
        }
    }

    /// Add or replace one alias.
    pub fn insert(&mut self, alias: &str, canonical: &str) {
        self.aliases
            .insert(alias.to_ascii_lowercase(), canonical.to_string());
    }

    /// Collapse unknown names onto `field` instead of passing them through.
    pub fn with_fallback(mut self, field: &str) -> Self {
        self.fallback = Some(field.to_string());
        self
    }

    /// Canonical field name for a legacy name.
    pub fn resolve(&self, name: &str) -> String {
        if let Some(canonical) = self.aliases.get(&name.to_ascii_lowercase()) {
            return canonical.clone();
        }
        match &self.fallback {
            Some(field) => field.clone(),
            None => name.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_aliases() {
        let fields = LegacyFieldMap::default();
        for alias in ["a", "au", "author", "name"] {
            assert_eq!(fields.resolve(alias), "author", "{alias}");
        }
        for alias in ["t", "ti", "title"] {
            assert_eq!(fields.resolve(alias), "title", "{alias}");
        }
        assert_eq!(fields.resolve("topcite"), "cited");
        assert_eq!(fields.resolve("jy"), "journalyear");
        assert!(fields.len() >= 60);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let fields = LegacyFieldMap::default();
        assert_eq!(fields.resolve("AUTHOR"), "author");
        assert_eq!(fields.resolve("Ti"), "title");
    }

    #[test]
    fn unknown_names_pass_through() {
        let fields = LegacyFieldMap::default();
        assert_eq!(fields.resolve("primarch"), "primarch");
    }

    #[test]
    fn fallback_collapses_unknowns() {
        let fields = LegacyFieldMap::default().with_fallback("anyfield");
        assert_eq!(fields.resolve("primarch"), "anyfield");
        // known aliases are unaffected
        assert_eq!(fields.resolve("a"), "author");
    }

    #[test]
    fn custom_aliases() {
        let mut fields = LegacyFieldMap::empty();
        fields.insert("y", "year");
        assert_eq!(fields.resolve("Y"), "year");
        assert_eq!(fields.resolve("a"), "a");
    }
}
