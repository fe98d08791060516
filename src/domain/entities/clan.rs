//! Clan definitions with their required disciplines and weaknesses

use crate::domain::entities::base::{
    impl_catalog_entity, impl_core_setters, CatalogCore, CatalogCoreBuilder, Keyed, ToBuilder,
    Typed,
};
use crate::domain::entities::character_traits::Advantage;
use crate::domain::entities::weakness::Weakness;
use crate::domain::error::EntityError;
use crate::domain::value_objects::{AdvantageCategory, ClanAffiliation};

/// A vampire bloodline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clan {
    core: CatalogCore,
    affiliation: ClanAffiliation,
    disciplines: Vec<Advantage>,
    weaknesses: Vec<Weakness>,
}

impl Clan {
    pub fn builder() -> ClanBuilder {
        ClanBuilder::default()
    }

    /// In-clan disciplines, in definition order
    pub fn disciplines(&self) -> &[Advantage] {
        &self.disciplines
    }

    pub fn weaknesses(&self) -> &[Weakness] {
        &self.weaknesses
    }

    pub fn has_discipline(&self, key: &str) -> bool {
        self.disciplines.iter().any(|d| d.key() == key)
    }
}

impl_catalog_entity!(Clan, "Clan");

impl Typed for Clan {
    type Category = ClanAffiliation;

    fn category(&self) -> ClanAffiliation {
        self.affiliation
    }
}

impl ToBuilder for Clan {
    type Builder = ClanBuilder;

    fn to_builder(&self) -> ClanBuilder {
        ClanBuilder {
            core: CatalogCoreBuilder::from(&self.core),
            affiliation: Some(self.affiliation),
            disciplines: self.disciplines.clone(),
            weaknesses: self.weaknesses.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClanBuilder {
    core: CatalogCoreBuilder,
    affiliation: Option<ClanAffiliation>,
    disciplines: Vec<Advantage>,
    weaknesses: Vec<Weakness>,
}

impl_core_setters!(ClanBuilder);

impl ClanBuilder {
    pub fn affiliation(mut self, affiliation: ClanAffiliation) -> Self {
        self.affiliation = Some(affiliation);
        self
    }

    pub fn discipline(mut self, discipline: Advantage) -> Self {
        self.disciplines.push(discipline);
        self
    }

    pub fn disciplines(mut self, disciplines: Vec<Advantage>) -> Self {
        self.disciplines = disciplines;
        self
    }

    pub fn weakness(mut self, weakness: Weakness) -> Self {
        self.weaknesses.push(weakness);
        self
    }

    pub fn weaknesses(mut self, weaknesses: Vec<Weakness>) -> Self {
        self.weaknesses = weaknesses;
        self
    }

    pub fn build(self) -> Result<Clan, EntityError> {
        let core = self.core.build(Clan::ENTITY)?;
        let affiliation = self
            .affiliation
            .ok_or(EntityError::missing(Clan::ENTITY, "type"))?;
        if self.disciplines.is_empty() {
            return Err(EntityError::missing(Clan::ENTITY, "disciplines"));
        }
        if let Some(other) = self
            .disciplines
            .iter()
            .find(|d| d.category() != AdvantageCategory::Discipline)
        {
            return Err(EntityError::invalid(
                Clan::ENTITY,
                "disciplines",
                format!("'{}' is a {}, not a discipline", other.key(), other.category()),
            ));
        }
        if self.weaknesses.is_empty() {
            return Err(EntityError::missing(Clan::ENTITY, "weaknesses"));
        }
        Ok(Clan {
            core,
            affiliation,
            disciplines: self.disciplines,
            weaknesses: self.weaknesses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Language;

    fn advantage(key: &str, category: AdvantageCategory) -> Advantage {
        Advantage::builder()
            .key(key)
            .name(Language::English, key)
            .category(category)
            .build()
            .unwrap()
    }

    fn hideous() -> Weakness {
        Weakness::builder()
            .key("nosferatu_hideous")
            .name(Language::English, "Hideous")
            .build()
            .unwrap()
    }

    fn nosferatu() -> ClanBuilder {
        Clan::builder()
            .key("nosferatu")
            .name(Language::English, "Nosferatu")
            .affiliation(ClanAffiliation::Camarilla)
    }

    #[test]
    fn test_clan_requires_disciplines_and_weaknesses() {
        let err = nosferatu().weakness(hideous()).build().unwrap_err();
        assert_eq!(err, EntityError::missing("Clan", "disciplines"));

        let err = nosferatu()
            .discipline(advantage("obfuscate", AdvantageCategory::Discipline))
            .build()
            .unwrap_err();
        assert_eq!(err, EntityError::missing("Clan", "weaknesses"));
    }

    #[test]
    fn test_clan_rejects_non_discipline_advantages() {
        let err = nosferatu()
            .discipline(advantage("resources", AdvantageCategory::Background))
            .weakness(hideous())
            .build()
            .unwrap_err();
        assert_eq!(err.field(), "disciplines");
    }

    #[test]
    fn test_clan_base_fields_checked_first() {
        let err = Clan::builder().build().unwrap_err();
        assert_eq!(err, EntityError::missing("Clan", "key"));
    }

    #[test]
    fn test_clan_keeps_discipline_order() {
        let clan = nosferatu()
            .discipline(advantage("animalism", AdvantageCategory::Discipline))
            .discipline(advantage("obfuscate", AdvantageCategory::Discipline))
            .discipline(advantage("potence", AdvantageCategory::Discipline))
            .weakness(hideous())
            .build()
            .unwrap();
        let keys: Vec<_> = clan.disciplines().iter().map(|d| d.key()).collect();
        assert_eq!(keys, ["animalism", "obfuscate", "potence"]);
        assert!(clan.has_discipline("obfuscate"));
        assert_eq!(clan.category(), ClanAffiliation::Camarilla);
    }
}
