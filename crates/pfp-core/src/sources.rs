//! Display names for the registries that contribute person records.
//!
//! A source URI is matched against registered base URIs in registration
//! order; the first prefix it starts with supplies the label. URIs from
//! unknown registries are shown as-is.

use crate::config::SourceEntry;

/// Registries known to the PFP deployment.
pub const BUILTIN_SOURCES: &[(&str, &str)] = &[
    (
        "https://akademieprotokolle.acdh.oeaw.ac.at/",
        "Academy Protocols",
    ),
    ("https://amp.acdh.oeaw.ac.at/", "AMP"),
    ("https://gtrans.acdh.oeaw.ac.at/", "German Translations"),
    ("https://hanslick.acdh.oeaw.ac.at/", "Hanslick Project"),
    ("https://kaiserin-eleonora.oeaw.ac.at/", "Kaiserin Eleonora"),
    (
        "https://oebl-pfp.acdh-ch-dev.oeaw.ac.at/",
        "Austrian Biographical Lexicon",
    ),
    ("https://parlamint.acdh.oeaw.ac.at/", "ParlaMint"),
    ("https://pmb.acdh.oeaw.ac.at/", "PMB"),
    ("https://staribacher.acdh.oeaw.ac.at/", "Staribacher Diaries"),
    ("https://tillich.acdh.oeaw.ac.at/", "Tillich Correspondence"),
    ("https://wmp1.acdh.oeaw.ac.at/", "WMP1"),
];

/// Resolve a URI against the built-in registries only.
pub fn resolve_label(uri: &str) -> &str {
    BUILTIN_SOURCES
        .iter()
        .find(|(prefix, _)| uri.starts_with(prefix))
        .map(|(_, label)| *label)
        .unwrap_or(uri)
}

/// Ordered prefix table: built-ins first, then configured extras.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    entries: Vec<SourceEntry>,
}

impl SourceRegistry {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_SOURCES
                .iter()
                .map(|(prefix, label)| SourceEntry {
                    prefix: prefix.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    pub fn with_extra(extra: &[SourceEntry]) -> Self {
        let mut registry = Self::builtin();
        registry.entries.extend(extra.iter().cloned());
        registry
    }

    pub fn resolve<'a>(&'a self, uri: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|e| uri.starts_with(e.prefix.as_str()))
            .map(|e| e.label.as_str())
            .unwrap_or(uri)
    }

    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
