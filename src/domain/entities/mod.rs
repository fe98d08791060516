//! Domain entities - Catalog definitions and the character aggregate

pub mod base;
mod character;
mod character_traits;
mod clan;
mod generation;
mod nature;
mod road;
mod special_feature;
mod weakness;

pub use base::{CatalogCore, CatalogCoreBuilder, Keyed, ToBuilder, Translatable, Typed, Valued, ValuedBuilder};
pub use character::{
    Character, CharacterBuilder, ABILITIES_PER_CATEGORY, ABILITY_COUNT, ATTRIBUTES_PER_CATEGORY,
    ATTRIBUTE_COUNT, MIN_ADVANTAGE_COUNT,
};
pub use character_traits::{
    Ability, AbilityBuilder, Advantage, AdvantageBuilder, Attribute, AttributeBuilder,
};
pub use clan::{Clan, ClanBuilder};
pub use generation::{Generation, GenerationBuilder, UNBOUNDED};
pub use nature::{Nature, NatureBuilder};
pub use road::{CharacterRoad, Road, RoadBuilder, MAX_ROAD_VALUE};
pub use special_feature::{FeatureKind, Flaw, Merit, SpecialFeature, SpecialFeatureBuilder};
pub use weakness::{Weakness, WeaknessBuilder};
