//! Catalog port - Read-only reference data and storage failures
//!
//! Catalogs are populated once from static definitions and never written at
//! runtime. [`EntityStorageError`] covers every lookup, definition and document
//! failure raised by the storage adapters.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::domain::error::EntityError;
use crate::domain::value_objects::Language;

/// The fixed set of catalog kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Attributes,
    Abilities,
    Advantages,
    Clans,
    Weaknesses,
    Generations,
    Roads,
    Natures,
    SpecialFeatures,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 9] = [
        CatalogKind::Attributes,
        CatalogKind::Abilities,
        CatalogKind::Advantages,
        CatalogKind::Clans,
        CatalogKind::Weaknesses,
        CatalogKind::Generations,
        CatalogKind::Roads,
        CatalogKind::Natures,
        CatalogKind::SpecialFeatures,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attributes => "attributes",
            Self::Abilities => "abilities",
            Self::Advantages => "advantages",
            Self::Clans => "clans",
            Self::Weaknesses => "weaknesses",
            Self::Generations => "generations",
            Self::Roads => "roads",
            Self::Natures => "natures",
            Self::SpecialFeatures => "special_features",
        }
    }

    /// Name of the definition document for this kind
    pub fn file_name(self) -> String {
        format!("{}.xml", self.as_str())
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("unknown catalog '{}'", s))
    }
}

/// Lookup, definition and document failures
#[derive(Debug, Error)]
pub enum EntityStorageError {
    #[error("catalog '{catalog}' has no entry '{key}'")]
    UnknownKey { catalog: CatalogKind, key: String },

    #[error("entry '{key}' in catalog '{catalog}' is not a {expected}")]
    WrongVariant {
        catalog: CatalogKind,
        key: String,
        expected: &'static str,
    },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML in {origin}: {message}")]
    Xml { origin: String, message: String },

    #[error("invalid definition in catalog '{catalog}': {source}")]
    Definition {
        catalog: CatalogKind,
        #[source]
        source: EntityError,
    },

    #[error("entry '{key}' of catalog '{catalog}' is invalid: {source}")]
    InvalidEntry {
        catalog: CatalogKind,
        key: String,
        #[source]
        source: EntityError,
    },

    #[error("catalog '{catalog}' defines '{key}' more than once")]
    DuplicateKey { catalog: CatalogKind, key: String },

    #[error("document has no valid character id: {0}")]
    MissingIdentity(String),

    #[error("document violates the character schema: {}", .violations.join("; "))]
    Schema { violations: Vec<String> },

    #[error("character could not be rebuilt: {source}")]
    Build {
        #[source]
        source: EntityError,
        /// Child resolution failures skipped on the way to the failed build
        suppressed: Vec<EntityStorageError>,
    },
}

impl EntityStorageError {
    pub fn unknown_key(catalog: CatalogKind, key: impl Into<String>) -> Self {
        Self::UnknownKey {
            catalog,
            key: key.into(),
        }
    }

    pub fn xml(origin: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Xml {
            origin: origin.into(),
            message: message.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Underlying failures attached to a failed build
    pub fn suppressed(&self) -> &[EntityStorageError] {
        match self {
            Self::Build { suppressed, .. } => suppressed,
            _ => &[],
        }
    }

    /// Full diagnostic: this error followed by every suppressed cause
    pub fn report(&self) -> String {
        let mut report = self.to_string();
        for cause in self.suppressed() {
            report.push_str("\n  suppressed: ");
            report.push_str(&cause.to_string());
        }
        report
    }
}

/// One catalog entry rendered for a given language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntryView {
    pub key: String,
    pub name: String,
    pub category: Option<String>,
}

/// Kind-agnostic read access to a catalog, used for generic listings
pub trait CatalogView {
    fn kind(&self) -> CatalogKind;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, key: &str) -> bool;

    /// Entries in definition order
    fn entries(&self, language: Language) -> Vec<CatalogEntryView>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_kind_parse() {
        assert_eq!("clans".parse::<CatalogKind>().unwrap(), CatalogKind::Clans);
        assert_eq!(
            "Special-Features".parse::<CatalogKind>().unwrap(),
            CatalogKind::SpecialFeatures
        );
        assert!("spells".parse::<CatalogKind>().is_err());
        assert_eq!(CatalogKind::SpecialFeatures.file_name(), "special_features.xml");
    }

    #[test]
    fn test_report_lists_suppressed_causes() {
        let err = EntityStorageError::Build {
            source: EntityError::wrong_count("Character", "attributes", "exactly 9", 8),
            suppressed: vec![EntityStorageError::unknown_key(CatalogKind::Attributes, "luck")],
        };
        let report = err.report();
        assert!(report.contains("8 attributes"));
        assert!(report.contains("suppressed: catalog 'attributes' has no entry 'luck'"));
        assert_eq!(err.suppressed().len(), 1);
    }
}
