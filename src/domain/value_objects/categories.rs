//! Category tags partitioning typed catalogs

use serde::{Deserialize, Serialize};

use crate::domain::error::EntityError;

macro_rules! define_category {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $tag)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Tag used in definition documents
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = EntityError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($tag => Ok(Self::$variant),)+
                    other => Err(EntityError::invalid(
                        stringify!($name),
                        "type",
                        format!("unknown category '{}'", other),
                    )),
                }
            }
        }
    };
}

define_category!(
    /// Attribute groups; a character holds three of each
    AttributeCategory {
        Physical => "physical",
        Social => "social",
        Mental => "mental",
    }
);

define_category!(
    /// Ability groups; a character holds ten of each
    AbilityCategory {
        Talent => "talent",
        Skill => "skill",
        Knowledge => "knowledge",
    }
);

define_category!(
    AdvantageCategory {
        Discipline => "discipline",
        Background => "background",
        Virtue => "virtue",
    }
);

define_category!(
    SpecialFeatureCategory {
        Physical => "physical",
        Mental => "mental",
        Social => "social",
        Supernatural => "supernatural",
    }
);

define_category!(
    /// Sect a clan traditionally belongs to
    ClanAffiliation {
        Camarilla => "camarilla",
        Sabbat => "sabbat",
        Independent => "independent",
    }
);

define_category!(
    Sex {
        Male => "male",
        Female => "female",
        Diverse => "diverse",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("Physical".parse::<AttributeCategory>().unwrap(), AttributeCategory::Physical);
        assert_eq!(" knowledge ".parse::<AbilityCategory>().unwrap(), AbilityCategory::Knowledge);
    }

    #[test]
    fn test_unknown_category_names_the_type() {
        let err = "arcane".parse::<AdvantageCategory>().unwrap_err();
        assert!(err.to_string().contains("AdvantageCategory"));
        assert!(err.to_string().contains("arcane"));
    }

    #[test]
    fn test_all_lists_every_variant() {
        assert_eq!(AttributeCategory::ALL.len(), 3);
        assert_eq!(SpecialFeatureCategory::ALL.len(), 4);
        assert_eq!(ClanAffiliation::Sabbat.to_string(), "sabbat");
    }
}
