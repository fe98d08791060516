//! Value objects - Immutable objects defined by their attributes

mod categories;
mod ids;
mod language;

pub use categories::{
    AbilityCategory, AdvantageCategory, AttributeCategory, ClanAffiliation, Sex,
    SpecialFeatureCategory,
};
pub use ids::*;
pub use language::{Language, TranslatedNames};
