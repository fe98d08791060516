//! Attribute, ability and advantage definitions
//!
//! The three share one shape: key, names and a category. Characters hold them
//! as [`Valued`] copies carrying their points.

use crate::domain::entities::base::{
    impl_catalog_entity, impl_core_setters, CatalogCore, CatalogCoreBuilder, Keyed, ToBuilder,
    Typed, Valued,
};
use crate::domain::error::EntityError;
use crate::domain::value_objects::{AbilityCategory, AdvantageCategory, AttributeCategory};

macro_rules! define_typed_entity {
    ($(#[$meta:meta])* $entity:ident, $builder:ident, $category:ty, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $entity {
            core: CatalogCore,
            category: $category,
        }

        impl $entity {
            pub fn builder() -> $builder {
                $builder::default()
            }

            /// Valued copy of this definition
            pub fn valued(&self, value: i32) -> Result<Valued<$entity>, EntityError> {
                Valued::builder(self).value(value).build()
            }
        }

        impl_catalog_entity!($entity, $label);

        impl Typed for $entity {
            type Category = $category;

            fn category(&self) -> $category {
                self.category
            }
        }

        impl ToBuilder for $entity {
            type Builder = $builder;

            fn to_builder(&self) -> $builder {
                $builder {
                    core: CatalogCoreBuilder::from(&self.core),
                    category: Some(self.category),
                }
            }
        }

        #[derive(Debug, Clone, Default)]
        pub struct $builder {
            core: CatalogCoreBuilder,
            category: Option<$category>,
        }

        impl_core_setters!($builder);

        impl $builder {
            pub fn category(mut self, category: $category) -> Self {
                self.category = Some(category);
                self
            }

            pub fn build(self) -> Result<$entity, EntityError> {
                let core = self.core.build(<$entity as Keyed>::ENTITY)?;
                let category = self
                    .category
                    .ok_or(EntityError::missing(<$entity as Keyed>::ENTITY, "type"))?;
                Ok($entity { core, category })
            }
        }
    };
}

define_typed_entity!(
    /// Innate capability (strength, charisma, wits, ...)
    Attribute,
    AttributeBuilder,
    AttributeCategory,
    "Attribute"
);

define_typed_entity!(
    /// Learned capability (talents, skills, knowledges)
    Ability,
    AbilityBuilder,
    AbilityCategory,
    "Ability"
);

define_typed_entity!(
    /// Discipline, background or virtue
    Advantage,
    AdvantageBuilder,
    AdvantageCategory,
    "Advantage"
);
