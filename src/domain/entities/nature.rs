//! Natures and demeanors (personality archetypes)

use crate::domain::entities::base::{
    impl_catalog_entity, impl_core_setters, CatalogCore, CatalogCoreBuilder, Keyed, ToBuilder,
};
use crate::domain::error::EntityError;
use crate::domain::value_objects::TranslatedNames;

/// Personality archetype used for both nature and demeanor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nature {
    core: CatalogCore,
    ad_hoc: bool,
}

impl Nature {
    pub fn builder() -> NatureBuilder {
        NatureBuilder::default()
    }

    /// Free-text nature not backed by the catalog; every language shows the raw text
    pub fn ad_hoc(text: &str) -> Result<Self, EntityError> {
        let core = Self::builder()
            .key(text)
            .names(TranslatedNames::uniform(text.trim()))
            .core
            .build(Self::ENTITY)?;
        Ok(Self { core, ad_hoc: true })
    }

    /// True when synthesized from free text rather than read from the catalog
    pub fn is_ad_hoc(&self) -> bool {
        self.ad_hoc
    }
}

impl_catalog_entity!(Nature, "Nature");

impl ToBuilder for Nature {
    type Builder = NatureBuilder;

    fn to_builder(&self) -> NatureBuilder {
        NatureBuilder {
            core: CatalogCoreBuilder::from(&self.core),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NatureBuilder {
    core: CatalogCoreBuilder,
}

impl_core_setters!(NatureBuilder);

impl NatureBuilder {
    pub fn build(self) -> Result<Nature, EntityError> {
        Ok(Nature {
            core: self.core.build(Nature::ENTITY)?,
            ad_hoc: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::base::Translatable;
    use crate::domain::value_objects::Language;

    #[test]
    fn test_ad_hoc_nature_uses_raw_text_everywhere() {
        let nature = Nature::ad_hoc("Brujah-ish").expect("free text is accepted");
        assert!(nature.is_ad_hoc());
        assert_eq!(nature.key(), "Brujah-ish");
        assert_eq!(nature.display_name(Language::German), "Brujah-ish");
        assert_eq!(nature.display_name(Language::English), "Brujah-ish");
    }

    #[test]
    fn test_ad_hoc_nature_still_rejects_blank_text() {
        assert_eq!(
            Nature::ad_hoc("   ").unwrap_err(),
            EntityError::missing("Nature", "key")
        );
    }
}
