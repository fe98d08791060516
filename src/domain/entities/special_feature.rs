//! Merits and flaws
//!
//! Both share one validated shape; the builder decides which variant to
//! produce from the `kind` discriminator of the definition.

use std::fmt;
use std::str::FromStr;

use crate::domain::entities::base::{
    impl_core_setters, CatalogCore, CatalogCoreBuilder, Keyed, ToBuilder, Translatable, Typed,
};
use crate::domain::error::EntityError;
use crate::domain::value_objects::{SpecialFeatureCategory, TranslatedNames};

/// Discriminator between the two special feature variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Merit,
    Flaw,
}

impl FeatureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merit => "merit",
            Self::Flaw => "flaw",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "merit" => Ok(Self::Merit),
            "flaw" => Ok(Self::Flaw),
            other => Err(EntityError::invalid(
                "SpecialFeature",
                "kind",
                format!("expected 'merit' or 'flaw', got '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FeatureData {
    core: CatalogCore,
    cost: i32,
    category: SpecialFeatureCategory,
}

macro_rules! define_feature {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            data: FeatureData,
        }

        impl $name {
            /// Freebie points the feature costs (merits) or grants (flaws)
            pub fn cost(&self) -> i32 {
                self.data.cost
            }
        }

        impl Keyed for $name {
            const ENTITY: &'static str = stringify!($name);

            fn key(&self) -> &str {
                self.data.core.key()
            }
        }

        impl Translatable for $name {
            fn names(&self) -> &TranslatedNames {
                self.data.core.names()
            }
        }

        impl Typed for $name {
            type Category = SpecialFeatureCategory;

            fn category(&self) -> SpecialFeatureCategory {
                self.data.category
            }
        }
    };
}

define_feature!(
    /// Advantageous quirk bought with freebie points
    Merit
);

define_feature!(
    /// Drawback that grants freebie points
    Flaw
);

/// Either variant, as stored in the special feature catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialFeature {
    Merit(Merit),
    Flaw(Flaw),
}

impl SpecialFeature {
    pub fn builder() -> SpecialFeatureBuilder {
        SpecialFeatureBuilder::default()
    }

    pub fn kind(&self) -> FeatureKind {
        match self {
            Self::Merit(_) => FeatureKind::Merit,
            Self::Flaw(_) => FeatureKind::Flaw,
        }
    }

    pub fn cost(&self) -> i32 {
        self.data().cost
    }

    pub fn as_merit(&self) -> Option<&Merit> {
        match self {
            Self::Merit(merit) => Some(merit),
            Self::Flaw(_) => None,
        }
    }

    pub fn as_flaw(&self) -> Option<&Flaw> {
        match self {
            Self::Flaw(flaw) => Some(flaw),
            Self::Merit(_) => None,
        }
    }

    fn data(&self) -> &FeatureData {
        match self {
            Self::Merit(merit) => &merit.data,
            Self::Flaw(flaw) => &flaw.data,
        }
    }
}

impl Keyed for SpecialFeature {
    const ENTITY: &'static str = "SpecialFeature";

    fn key(&self) -> &str {
        self.data().core.key()
    }
}

impl Translatable for SpecialFeature {
    fn names(&self) -> &TranslatedNames {
        self.data().core.names()
    }
}

impl Typed for SpecialFeature {
    type Category = SpecialFeatureCategory;

    fn category(&self) -> SpecialFeatureCategory {
        self.data().category
    }
}

impl ToBuilder for SpecialFeature {
    type Builder = SpecialFeatureBuilder;

    fn to_builder(&self) -> SpecialFeatureBuilder {
        let data = self.data();
        SpecialFeatureBuilder {
            core: CatalogCoreBuilder::from(&data.core),
            cost: Some(data.cost),
            category: Some(data.category),
            kind: Some(self.kind()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpecialFeatureBuilder {
    core: CatalogCoreBuilder,
    cost: Option<i32>,
    category: Option<SpecialFeatureCategory>,
    kind: Option<FeatureKind>,
}

impl_core_setters!(SpecialFeatureBuilder);

impl SpecialFeatureBuilder {
    pub fn cost(mut self, cost: i32) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn category(mut self, category: SpecialFeatureCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn kind(mut self, kind: FeatureKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn build(self) -> Result<SpecialFeature, EntityError> {
        const ENTITY: &str = SpecialFeature::ENTITY;

        let core = self.core.build(ENTITY)?;
        let category = self.category.ok_or(EntityError::missing(ENTITY, "type"))?;
        let cost = self.cost.ok_or(EntityError::missing(ENTITY, "cost"))?;
        if cost <= 0 {
            return Err(EntityError::invalid(ENTITY, "cost", "must be greater than 0"));
        }
        let kind = self.kind.ok_or(EntityError::missing(ENTITY, "kind"))?;

        let data = FeatureData {
            core,
            cost,
            category,
        };
        Ok(match kind {
            FeatureKind::Merit => SpecialFeature::Merit(Merit { data }),
            FeatureKind::Flaw => SpecialFeature::Flaw(Flaw { data }),
        })
    }
}
