//! Capabilities shared by catalog entities
//!
//! Entities are assembled from small capabilities instead of a builder
//! hierarchy:
//! - [`Keyed`]: unique key inside a catalog
//! - [`Translatable`]: localized names resolved per call
//! - [`Typed`]: category tag used to partition a catalog
//! - [`Valued`]: a copied catalog definition plus character points
//!
//! [`CatalogCore`] carries the key and names every catalog entity embeds. Its
//! builder is validated before any subtype field, so a missing key is always
//! reported ahead of a missing category or value.

use std::fmt;

use crate::domain::error::EntityError;
use crate::domain::value_objects::{Language, TranslatedNames};

/// Entities addressable by a catalog key
pub trait Keyed {
    /// Entity name used in validation messages
    const ENTITY: &'static str;

    fn key(&self) -> &str;
}

/// Entities carrying localized names
pub trait Translatable: Keyed {
    fn names(&self) -> &TranslatedNames;

    fn resolve_name(&self, language: Language) -> Option<&str> {
        self.names().resolve(language)
    }

    fn display_name(&self, language: Language) -> String {
        self.names().display_name(language)
    }
}

/// Entities partitioned by a category tag
pub trait Typed {
    type Category: Copy + Eq + fmt::Display;

    fn category(&self) -> Self::Category;
}

/// Copy-with capability: a builder pre-filled with every field the entity owns
pub trait ToBuilder {
    type Builder;

    fn to_builder(&self) -> Self::Builder;
}

/// Key and names shared by every catalog entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCore {
    key: String,
    names: TranslatedNames,
}

impl CatalogCore {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn names(&self) -> &TranslatedNames {
        &self.names
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogCoreBuilder {
    key: Option<String>,
    names: TranslatedNames,
}

impl CatalogCoreBuilder {
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = Some(key.into());
    }

    pub fn set_name(&mut self, language: Language, name: impl Into<String>) {
        self.names.insert(language, name);
    }

    pub fn set_names(&mut self, names: TranslatedNames) {
        self.names = names;
    }

    /// Validates key, then names
    pub fn build(&self, entity: &'static str) -> Result<CatalogCore, EntityError> {
        let key = match self.key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Err(EntityError::missing(entity, "key")),
        };
        if !self.names.has_any() {
            return Err(EntityError::missing(entity, "names"));
        }
        Ok(CatalogCore {
            key,
            names: self.names.clone(),
        })
    }
}

impl From<&CatalogCore> for CatalogCoreBuilder {
    fn from(core: &CatalogCore) -> Self {
        Self {
            key: Some(core.key.clone()),
            names: core.names.clone(),
        }
    }
}

/// Implements [`Keyed`] and [`Translatable`] for a struct with a `core` field
macro_rules! impl_catalog_entity {
    ($entity:ty, $label:literal) => {
        impl $crate::domain::entities::base::Keyed for $entity {
            const ENTITY: &'static str = $label;

            fn key(&self) -> &str {
                self.core.key()
            }
        }

        impl $crate::domain::entities::base::Translatable for $entity {
            fn names(&self) -> &$crate::domain::value_objects::TranslatedNames {
                self.core.names()
            }
        }
    };
}

/// Chaining setters for builders with a `core: CatalogCoreBuilder` field
macro_rules! impl_core_setters {
    ($builder:ty) => {
        impl $builder {
            pub fn key(mut self, key: impl Into<String>) -> Self {
                self.core.set_key(key);
                self
            }

            pub fn name(
                mut self,
                language: $crate::domain::value_objects::Language,
                name: impl Into<String>,
            ) -> Self {
                self.core.set_name(language, name);
                self
            }

            pub fn names(mut self, names: $crate::domain::value_objects::TranslatedNames) -> Self {
                self.core.set_names(names);
                self
            }
        }
    };
}

pub(crate) use impl_catalog_entity;
pub(crate) use impl_core_setters;

/// A catalog definition paired with character-specific points
///
/// The definition is a copy; the catalog entry it came from is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Valued<T> {
    definition: T,
    value: i32,
}

impl<T> Valued<T> {
    pub fn definition(&self) -> &T {
        &self.definition
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl<T: Clone + Keyed> Valued<T> {
    /// Start a valued copy of a catalog definition
    pub fn builder(definition: &T) -> ValuedBuilder<T> {
        ValuedBuilder {
            definition: definition.clone(),
            value: None,
            max: None,
        }
    }

    /// Copy-with a new value, keeping the same domain checks
    pub fn with_value(&self, value: i32) -> Result<Self, EntityError> {
        Self::builder(&self.definition).value(value).build()
    }

    /// Copy-with a new value bounded by `max`
    pub fn with_bounded_value(&self, value: i32, max: i32) -> Result<Self, EntityError> {
        Self::builder(&self.definition).value(value).max(max).build()
    }
}

impl<T: Keyed> Keyed for Valued<T> {
    const ENTITY: &'static str = T::ENTITY;

    fn key(&self) -> &str {
        self.definition.key()
    }
}

impl<T: Translatable> Translatable for Valued<T> {
    fn names(&self) -> &TranslatedNames {
        self.definition.names()
    }
}

impl<T: Typed> Typed for Valued<T> {
    type Category = T::Category;

    fn category(&self) -> Self::Category {
        self.definition.category()
    }
}

impl<T: Clone + Keyed> ToBuilder for Valued<T> {
    type Builder = ValuedBuilder<T>;

    fn to_builder(&self) -> ValuedBuilder<T> {
        Valued::builder(&self.definition).value(self.value)
    }
}

#[derive(Debug, Clone)]
pub struct ValuedBuilder<T> {
    definition: T,
    value: Option<i32>,
    max: Option<i32>,
}

impl<T: Keyed> ValuedBuilder<T> {
    pub fn value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }

    /// Upper bound for the value; the lower bound is always 0
    pub fn max(mut self, max: i32) -> Self {
        self.max = Some(max);
        self
    }

    pub fn build(self) -> Result<Valued<T>, EntityError> {
        let value = self
            .value
            .ok_or(EntityError::missing(T::ENTITY, "value"))?;
        if value < 0 {
            return Err(EntityError::invalid(
                T::ENTITY,
                "value",
                format!("{} for '{}' must not be negative", value, self.definition.key()),
            ));
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(EntityError::invalid(
                    T::ENTITY,
                    "value",
                    format!(
                        "{} for '{}' exceeds the maximum of {}",
                        value,
                        self.definition.key(),
                        max
                    ),
                ));
            }
        }
        Ok(Valued {
            definition: self.definition,
            value,
        })
    }
}
