//! Roads (moral paths) and the character's valued road

use crate::domain::entities::base::{
    impl_catalog_entity, impl_core_setters, CatalogCore, CatalogCoreBuilder, Keyed, ToBuilder,
    Valued,
};
use crate::domain::error::EntityError;

/// Highest rating a character can hold on a road
pub const MAX_ROAD_VALUE: i32 = 10;

/// A moral path such as Humanity or the Road of Kings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Road {
    core: CatalogCore,
}

/// A road with the character's rating (0-10)
pub type CharacterRoad = Valued<Road>;

impl Road {
    pub fn builder() -> RoadBuilder {
        RoadBuilder::default()
    }

    /// Rated copy of this road
    pub fn valued(&self, value: i32) -> Result<CharacterRoad, EntityError> {
        Valued::builder(self).value(value).max(MAX_ROAD_VALUE).build()
    }
}

impl_catalog_entity!(Road, "Road");

impl ToBuilder for Road {
    type Builder = RoadBuilder;

    fn to_builder(&self) -> RoadBuilder {
        RoadBuilder {
            core: CatalogCoreBuilder::from(&self.core),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoadBuilder {
    core: CatalogCoreBuilder,
}

impl_core_setters!(RoadBuilder);

impl RoadBuilder {
    pub fn build(self) -> Result<Road, EntityError> {
        Ok(Road {
            core: self.core.build(Road::ENTITY)?,
        })
    }
}
