//! Clan weakness definitions

use crate::domain::entities::base::{
    impl_catalog_entity, impl_core_setters, CatalogCore, CatalogCoreBuilder, Keyed, ToBuilder,
};
use crate::domain::error::EntityError;

/// A curse every member of a clan carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weakness {
    core: CatalogCore,
}

impl Weakness {
    pub fn builder() -> WeaknessBuilder {
        WeaknessBuilder::default()
    }
}

impl_catalog_entity!(Weakness, "Weakness");

impl ToBuilder for Weakness {
    type Builder = WeaknessBuilder;

    fn to_builder(&self) -> WeaknessBuilder {
        WeaknessBuilder {
            core: CatalogCoreBuilder::from(&self.core),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeaknessBuilder {
    core: CatalogCoreBuilder,
}

impl_core_setters!(WeaknessBuilder);

impl WeaknessBuilder {
    pub fn build(self) -> Result<Weakness, EntityError> {
        Ok(Weakness {
            core: self.core.build(Weakness::ENTITY)?,
        })
    }
}
