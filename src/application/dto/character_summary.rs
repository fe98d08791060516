//! Display-ready view of a character in one language

use serde::Serialize;

use crate::domain::entities::{Character, Keyed, Translatable, Typed, Valued};
use crate::domain::value_objects::Language;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraitLineDto {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub value: i32,
}

impl TraitLineDto {
    fn from_valued<T>(valued: &Valued<T>, language: Language) -> Self
    where
        T: Translatable + Typed + Clone,
    {
        Self {
            key: valued.key().to_string(),
            name: valued.display_name(language),
            category: Some(valued.category().to_string()),
            value: valued.value(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterSummaryDto {
    pub id: String,
    pub language: Language,
    pub name: String,
    pub player: String,
    pub chronicle: String,
    pub concept: String,
    pub clan: String,
    pub clan_disciplines: Vec<String>,
    pub generation: i32,
    pub nature: String,
    pub demeanor: String,
    pub attributes: Vec<TraitLineDto>,
    pub abilities: Vec<TraitLineDto>,
    pub advantages: Vec<TraitLineDto>,
    pub merits: Vec<String>,
    pub flaws: Vec<String>,
    pub road: TraitLineDto,
    pub willpower: i32,
    pub used_willpower: i32,
    pub blood_pool: i32,
    /// `None` when the generation has no ceiling
    pub maximum_blood_pool: Option<i32>,
    /// Traits rated above the generation's limit
    pub over_limit: Vec<String>,
    pub day_of_birth: Option<String>,
    pub day_of_death: Option<String>,
    pub sex: String,
}

impl CharacterSummaryDto {
    pub fn from_character(character: &Character, language: Language) -> Self {
        let generation = character.generation();
        Self {
            id: character.id().to_string(),
            language,
            name: character.name().to_string(),
            player: character.player().to_string(),
            chronicle: character.chronicle().to_string(),
            concept: character.concept().to_string(),
            clan: character.clan().display_name(language),
            clan_disciplines: character
                .clan()
                .disciplines()
                .iter()
                .map(|d| d.display_name(language))
                .collect(),
            generation: generation.number(),
            nature: character.nature().display_name(language),
            demeanor: character.demeanor().display_name(language),
            attributes: character
                .attributes()
                .iter()
                .map(|t| TraitLineDto::from_valued(t, language))
                .collect(),
            abilities: character
                .abilities()
                .iter()
                .map(|t| TraitLineDto::from_valued(t, language))
                .collect(),
            advantages: character
                .advantages()
                .iter()
                .map(|t| TraitLineDto::from_valued(t, language))
                .collect(),
            merits: character.merits().iter().map(|m| m.display_name(language)).collect(),
            flaws: character.flaws().iter().map(|f| f.display_name(language)).collect(),
            road: TraitLineDto {
                key: character.road().key().to_string(),
                name: character.road().display_name(language),
                category: None,
                value: character.road().value(),
            },
            willpower: character.willpower(),
            used_willpower: character.used_willpower(),
            blood_pool: character.blood_pool(),
            maximum_blood_pool: (!generation.is_blood_pool_unbounded())
                .then(|| generation.maximum_blood_pool()),
            over_limit: character
                .traits_above_generation_limit()
                .into_iter()
                .map(str::to_string)
                .collect(),
            day_of_birth: character.day_of_birth().map(|d| d.to_string()),
            day_of_death: character.day_of_death().map(|d| d.to_string()),
            sex: character.sex().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ToBuilder;
    use crate::domain::value_objects::AttributeCategory;
    use crate::infrastructure::catalog::CatalogRegistry;
    use crate::infrastructure::persistence::fixtures;

    #[test]
    fn test_summary_resolves_names_in_requested_language() {
        let registry = CatalogRegistry::embedded();
        let character = fixtures::character(&registry);

        let german = CharacterSummaryDto::from_character(&character, Language::German);
        assert_eq!(german.clan, "Nosferatu");
        assert_eq!(german.road.name, "Menschlichkeit");
        assert_eq!(german.merits, vec!["Essen"]);
        assert!(german.clan_disciplines.contains(&"Verdunkelung".to_string()));
        let strength = german.attributes.iter().find(|t| t.key == "strength").unwrap();
        assert_eq!(strength.name, "Körperkraft");
        assert_eq!(strength.category.as_deref(), Some(AttributeCategory::Physical.as_str()));

        let english = CharacterSummaryDto::from_character(&character, Language::English);
        assert_eq!(english.road.name, "Humanity");
        assert_eq!(english.maximum_blood_pool, Some(10));
        assert!(english.over_limit.is_empty());
        assert_eq!(english.day_of_birth.as_deref(), Some("1890-05-01"));
        assert_eq!(english.day_of_death, None);
    }

    #[test]
    fn test_summary_flags_traits_over_generation_limit() {
        let registry = CatalogRegistry::embedded();
        let character = fixtures::character(&registry)
            .with_attribute_value("wits", 6)
            .unwrap();
        let summary = CharacterSummaryDto::from_character(&character, Language::English);
        assert_eq!(summary.over_limit, vec!["wits"]);

        let elder = character
            .to_builder()
            .generation(registry.generations().unwrap().get("3").unwrap())
            .build()
            .unwrap();
        let summary = CharacterSummaryDto::from_character(&elder, Language::English);
        assert_eq!(summary.maximum_blood_pool, None);
        assert!(summary.over_limit.is_empty());
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let registry = CatalogRegistry::embedded();
        let character = fixtures::character(&registry);
        let json = serde_json::to_value(CharacterSummaryDto::from_character(
            &character,
            Language::German,
        ))
        .unwrap();
        assert_eq!(json["language"], "de");
        assert_eq!(json["road"]["value"], 7);
        assert!(json["road"].get("category").is_none());
    }
}
