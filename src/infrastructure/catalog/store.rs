//! In-memory catalog of one entity kind

use std::fmt;

use indexmap::IndexMap;

use crate::application::ports::outbound::{
    CatalogEntryView, CatalogKind, CatalogView, EntityStorageError,
};
use crate::domain::entities::{
    Ability, Advantage, Attribute, Clan, Generation, Keyed, Nature, Road, SpecialFeature,
    Translatable, Typed, Weakness,
};
use crate::domain::error::EntityError;
use crate::domain::value_objects::Language;
use crate::infrastructure::xml::XmlElement;

/// What a store does when a key is not in the catalog
pub enum LookupPolicy<T> {
    /// A miss is an [`EntityStorageError::UnknownKey`]
    Strict,
    /// A miss builds an ad-hoc entity from the raw key text
    Synthesize(fn(&str) -> Result<T, EntityError>),
}

impl<T> Clone for LookupPolicy<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for LookupPolicy<T> {}

impl<T> fmt::Debug for LookupPolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("Strict"),
            Self::Synthesize(_) => f.write_str("Synthesize"),
        }
    }
}

/// Key-ordered collection of catalog definitions
#[derive(Debug)]
pub struct CatalogStore<T> {
    kind: CatalogKind,
    policy: LookupPolicy<T>,
    entries: IndexMap<String, T>,
    initialized: bool,
}

impl<T: Keyed + Clone> CatalogStore<T> {
    pub fn new(kind: CatalogKind, policy: LookupPolicy<T>) -> Self {
        Self {
            kind,
            policy,
            entries: IndexMap::new(),
            initialized: false,
        }
    }

    /// Fill the store from a definition document
    ///
    /// Every child of `root` is one entry. Either all entries are accepted or
    /// the store stays empty. Calling this again on a filled store does nothing.
    pub fn init<F>(&mut self, root: &XmlElement, mut parse: F) -> Result<(), EntityStorageError>
    where
        F: FnMut(&XmlElement) -> Result<T, EntityStorageError>,
    {
        if self.initialized {
            return Ok(());
        }

        let mut entries = IndexMap::with_capacity(root.children.len());
        for element in &root.children {
            let entity = parse(element)?;
            let key = entity.key().to_string();
            if entries.contains_key(&key) {
                return Err(EntityStorageError::DuplicateKey {
                    catalog: self.kind,
                    key,
                });
            }
            entries.insert(key, entity);
        }

        tracing::debug!(catalog = %self.kind, entries = entries.len(), "Catalog initialized");
        self.entries = entries;
        self.initialized = true;
        Ok(())
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Copy of the entry for `key`, applying the store's lookup policy on a miss
    pub fn get(&self, key: &str) -> Result<T, EntityStorageError> {
        if let Some(entity) = self.entries.get(key) {
            return Ok(entity.clone());
        }
        match self.policy {
            LookupPolicy::Strict => Err(EntityStorageError::unknown_key(self.kind, key)),
            LookupPolicy::Synthesize(synthesize) => {
                let entity = synthesize(key)
                    .map_err(|_| EntityStorageError::unknown_key(self.kind, key))?;
                tracing::debug!(catalog = %self.kind, key, "Synthesized ad-hoc entry");
                Ok(entity)
            }
        }
    }

    pub fn get_all(&self) -> &IndexMap<String, T> {
        &self.entries
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<T: Keyed + Typed + Clone> CatalogStore<T> {
    /// Entries of one category keyed by their catalog key
    pub fn get_by_category(&self, category: T::Category) -> IndexMap<String, T> {
        self.entries
            .iter()
            .filter(|(_, entity)| entity.category() == category)
            .map(|(key, entity)| (key.clone(), entity.clone()))
            .collect()
    }

    /// Entries of one category in definition order
    pub fn list_by_category(&self, category: T::Category) -> Vec<&T> {
        self.entries
            .values()
            .filter(|entity| entity.category() == category)
            .collect()
    }
}

/// Display data for generic catalog listings
pub trait CatalogEntry {
    fn label(&self, language: Language) -> String;

    fn category_label(&self) -> Option<String>;
}

macro_rules! impl_typed_entry {
    ($($entity:ty),* $(,)?) => {
        $(
            impl CatalogEntry for $entity {
                fn label(&self, language: Language) -> String {
                    self.display_name(language)
                }

                fn category_label(&self) -> Option<String> {
                    Some(self.category().to_string())
                }
            }
        )*
    };
}

macro_rules! impl_plain_entry {
    ($($entity:ty),* $(,)?) => {
        $(
            impl CatalogEntry for $entity {
                fn label(&self, language: Language) -> String {
                    self.display_name(language)
                }

                fn category_label(&self) -> Option<String> {
                    None
                }
            }
        )*
    };
}

impl_typed_entry!(Attribute, Ability, Advantage, Clan);
impl_plain_entry!(Weakness, Road, Nature);

impl CatalogEntry for SpecialFeature {
    fn label(&self, language: Language) -> String {
        self.display_name(language)
    }

    fn category_label(&self) -> Option<String> {
        Some(format!("{} {}", self.category(), self.kind()))
    }
}

impl CatalogEntry for Generation {
    fn label(&self, language: Language) -> String {
        match language {
            Language::German => format!("{}. Generation", self.number()),
            Language::English => format!("Generation {}", self.number()),
        }
    }

    fn category_label(&self) -> Option<String> {
        None
    }
}

impl<T: Keyed + Clone + CatalogEntry> CatalogView for CatalogStore<T> {
    fn kind(&self) -> CatalogKind {
        self.kind
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn entries(&self, language: Language) -> Vec<CatalogEntryView> {
        self.entries
            .iter()
            .map(|(key, entity)| CatalogEntryView {
                key: key.clone(),
                name: entity.label(language),
                category: entity.category_label(),
            })
            .collect()
    }
}
