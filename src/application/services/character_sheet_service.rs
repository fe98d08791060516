//! Character Sheet Service - Application service for character documents
//!
//! Opens and saves character documents, renders them in a display language,
//! lists catalogs and assembles new characters from catalog defaults.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::application::dto::CharacterSummaryDto;
use crate::application::ports::outbound::{
    CatalogEntryView, CatalogKind, CharacterDocumentPort, EntityStorageError, LoadOutcome,
};
use crate::domain::entities::{Character, Keyed};
use crate::domain::value_objects::{Language, Sex};
use crate::infrastructure::catalog::CatalogRegistry;

/// Virtues every new character starts with, at one dot each
pub const STARTING_VIRTUES: [&str; 3] = ["conscience", "self_control", "courage"];

/// Road assigned when a new character names none
pub const DEFAULT_ROAD: &str = "humanity";

/// Request to create a new character from catalog defaults
#[derive(Debug, Clone)]
pub struct NewCharacterRequest {
    pub name: String,
    pub concept: String,
    pub clan: String,
    pub generation: i32,
    pub nature: String,
    pub demeanor: String,
    pub road: Option<String>,
    pub player: Option<String>,
    pub chronicle: Option<String>,
    pub sex: Sex,
    pub day_of_birth: Option<NaiveDate>,
}

/// Character sheet use cases over a document port
pub struct CharacterSheetService<D> {
    documents: D,
    catalogs: Arc<CatalogRegistry>,
}

impl<D: CharacterDocumentPort> CharacterSheetService<D> {
    pub fn new(documents: D, catalogs: Arc<CatalogRegistry>) -> Self {
        Self {
            documents,
            catalogs,
        }
    }

    /// Load a character document, logging every entry that had to be skipped
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn open(&self, path: &Path) -> Result<LoadOutcome> {
        let outcome = self
            .documents
            .load_detailed(path)
            .map_err(|e| {
                for cause in e.suppressed() {
                    warn!(cause = %cause, "Suppressed while loading");
                }
                e
            })
            .with_context(|| format!("Failed to load character from {}", path.display()))?;

        for skipped in &outcome.skipped {
            warn!(reason = %skipped, "Entry dropped from character");
        }
        info!(
            character_id = %outcome.character.id(),
            skipped = outcome.skipped.len(),
            "Opened character: {}",
            outcome.character.name()
        );
        Ok(outcome)
    }

    #[instrument(skip(self, character), fields(character_id = %character.id(), path = %path.display()))]
    pub fn save(&self, character: &Character, path: &Path) -> Result<()> {
        self.documents
            .save(character, path)
            .with_context(|| format!("Failed to save character to {}", path.display()))
    }

    pub fn summary(&self, character: &Character, language: Language) -> CharacterSummaryDto {
        CharacterSummaryDto::from_character(character, language)
    }

    /// Entries of one catalog, optionally restricted to a category tag
    ///
    /// Special features match either their category or their kind
    /// (`mental`, `merit`, ...).
    #[instrument(skip(self))]
    pub fn catalog_listing(
        &self,
        kind: CatalogKind,
        category: Option<&str>,
        language: Language,
    ) -> Result<Vec<CatalogEntryView>> {
        let view = self
            .catalogs
            .get(kind)
            .context("Failed to load catalogs")?;
        let entries = view.entries(language);

        let Some(filter) = category.map(str::trim).filter(|c| !c.is_empty()) else {
            return Ok(entries);
        };
        if entries.iter().all(|e| e.category.is_none()) {
            anyhow::bail!("Catalog '{}' has no categories", kind);
        }
        let filtered: Vec<_> = entries
            .into_iter()
            .filter(|entry| {
                entry
                    .category
                    .as_deref()
                    .is_some_and(|c| c.split(' ').any(|part| part.eq_ignore_ascii_case(filter)))
            })
            .collect();
        debug!(kind = %kind, filter, matched = filtered.len(), "Filtered catalog");
        Ok(filtered)
    }

    /// Assemble a buildable character from catalog defaults
    ///
    /// Attributes start at one dot, abilities at zero, clan disciplines at
    /// zero and the starting virtues at one. Willpower follows courage and the
    /// road rating follows conscience plus self-control.
    #[instrument(skip(self), fields(name = %request.name, clan = %request.clan))]
    pub fn new_character(&self, request: NewCharacterRequest) -> Result<Character> {
        Self::validate_new_request(&request)?;
        let catalogs = self.catalogs.catalogs().context("Failed to load catalogs")?;

        let clan = catalogs.clans.get(&request.clan)?;
        let generation = catalogs.generations.get(&request.generation.to_string())?;
        let road_key = request.road.as_deref().unwrap_or(DEFAULT_ROAD);

        let mut advantages = clan
            .disciplines()
            .iter()
            .map(|d| d.valued(0))
            .collect::<Result<Vec<_>, _>>()?;
        for key in STARTING_VIRTUES {
            advantages.push(catalogs.advantages.get(key)?.valued(1)?);
        }
        let virtue = |key: &str| {
            advantages
                .iter()
                .find(|a| a.key() == key)
                .map(|a| a.value())
                .unwrap_or_default()
        };
        let willpower = virtue("courage");
        let road_value = virtue("conscience") + virtue("self_control");
        let road = catalogs.roads.get(road_key)?.valued(road_value)?;

        let character = Character::builder()
            .name(request.name)
            .concept(request.concept)
            .player(request.player.unwrap_or_default())
            .chronicle(request.chronicle.unwrap_or_default())
            .nature(catalogs.natures.get(&request.nature)?)
            .demeanor(catalogs.natures.get(&request.demeanor)?)
            .blood_pool(generation.maximum_blood_pool().min(10))
            .clan(clan)
            .generation(generation)
            .attributes(
                catalogs
                    .attributes
                    .get_all()
                    .values()
                    .map(|a| a.valued(1))
                    .collect::<Result<_, _>>()?,
            )
            .abilities(
                catalogs
                    .abilities
                    .get_all()
                    .values()
                    .map(|a| a.valued(0))
                    .collect::<Result<_, _>>()?,
            )
            .advantages(advantages)
            .road(road)
            .willpower(willpower)
            .sex(request.sex)
            .day_of_birth(request.day_of_birth)
            .build()
            .context("New character is invalid")?;

        info!(character_id = %character.id(), "Created character: {}", character.name());
        Ok(character)
    }

    /// Copy-with edit of one rated trait; roads ignore the key
    #[instrument(skip(self, character), fields(character_id = %character.id()))]
    pub fn set_trait(
        &self,
        character: &Character,
        kind: CatalogKind,
        key: &str,
        value: i32,
    ) -> Result<Character> {
        let edited = match kind {
            CatalogKind::Attributes => character.with_attribute_value(key, value),
            CatalogKind::Abilities => character.with_ability_value(key, value),
            CatalogKind::Advantages => character.with_advantage_value(key, value),
            CatalogKind::Roads => character.with_road_value(value),
            other => anyhow::bail!("Catalog '{}' holds no rated traits", other),
        };
        edited.with_context(|| format!("Cannot set {} '{}' to {}", kind, key, value))
    }

    fn validate_new_request(request: &NewCharacterRequest) -> Result<()> {
        if request.name.trim().is_empty() {
            anyhow::bail!("Character name cannot be empty");
        }
        if request.concept.trim().is_empty() {
            anyhow::bail!("Character concept cannot be empty");
        }
        if request.generation <= 0 {
            anyhow::bail!("Generation must be a positive number");
        }
        Ok(())
    }
}

/// Storage failure behind an `anyhow` error, if any
pub fn storage_error(error: &anyhow::Error) -> Option<&EntityStorageError> {
    error.chain().find_map(|cause| cause.downcast_ref::<EntityStorageError>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Translatable;
    use crate::infrastructure::persistence::XmlCharacterDocumentStore;

    fn service() -> CharacterSheetService<XmlCharacterDocumentStore> {
        let catalogs = Arc::new(CatalogRegistry::embedded());
        CharacterSheetService::new(XmlCharacterDocumentStore::new(catalogs.clone()), catalogs)
    }

    fn request() -> NewCharacterRequest {
        NewCharacterRequest {
            name: "Ezra Blackwood".to_string(),
            concept: "Information broker".to_string(),
            clan: "nosferatu".to_string(),
            generation: 13,
            nature: "architect".to_string(),
            demeanor: "Brujah-ish".to_string(),
            road: None,
            player: Some("Sam".to_string()),
            chronicle: None,
            sex: Sex::Male,
            day_of_birth: NaiveDate::from_ymd_opt(1890, 5, 1),
        }
    }

    #[test]
    fn test_new_request_validation() {
        let mut invalid = request();
        invalid.name = "  ".to_string();
        assert!(CharacterSheetService::<XmlCharacterDocumentStore>::validate_new_request(&invalid).is_err());

        let mut invalid = request();
        invalid.generation = 0;
        assert!(CharacterSheetService::<XmlCharacterDocumentStore>::validate_new_request(&invalid).is_err());

        assert!(CharacterSheetService::<XmlCharacterDocumentStore>::validate_new_request(&request()).is_ok());
    }

    #[test]
    fn test_new_character_uses_catalog_defaults() {
        let character = service().new_character(request()).unwrap();

        assert_eq!(character.attributes().len(), 9);
        assert!(character.attributes().iter().all(|a| a.value() == 1));
        assert_eq!(character.abilities().len(), 30);
        assert_eq!(character.advantages().len(), 6);
        assert_eq!(character.road().key(), DEFAULT_ROAD);
        assert_eq!(character.road().value(), 2);
        assert_eq!(character.willpower(), 1);
        assert_eq!(character.blood_pool(), 10);
        assert!(character.demeanor().is_ad_hoc());
        assert_eq!(character.player(), "Sam");
    }

    #[test]
    fn test_new_character_with_unknown_clan_fails() {
        let mut unknown = request();
        unknown.clan = "baali".to_string();
        let err = service().new_character(unknown).unwrap_err();
        assert!(matches!(
            storage_error(&err),
            Some(EntityStorageError::UnknownKey { catalog: CatalogKind::Clans, .. })
        ));
    }

    #[test]
    fn test_new_character_round_trips_through_a_file() {
        let service = service();
        let character = service.new_character(request()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ezra.xml");

        service.save(&character, &path).unwrap();
        let outcome = service.open(&path).unwrap();
        assert_eq!(outcome.character, character);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_set_trait_keeps_identity() {
        let service = service();
        let character = service.new_character(request()).unwrap();

        let edited = service
            .set_trait(&character, CatalogKind::Abilities, "stealth", 3)
            .unwrap();
        assert_eq!(edited.id(), character.id());
        assert_eq!(
            edited.abilities().iter().find(|a| a.key() == "stealth").map(|a| a.value()),
            Some(3)
        );

        let edited = service.set_trait(&edited, CatalogKind::Roads, "", 8).unwrap();
        assert_eq!(edited.road().value(), 8);

        assert!(service.set_trait(&edited, CatalogKind::Roads, "", 11).is_err());
        assert!(service.set_trait(&edited, CatalogKind::Attributes, "luck", 2).is_err());
        assert!(service.set_trait(&edited, CatalogKind::Clans, "brujah", 1).is_err());
    }

    #[test]
    fn test_catalog_listing_filters_by_category() {
        let service = service();

        let talents = service
            .catalog_listing(CatalogKind::Abilities, Some("talent"), Language::English)
            .unwrap();
        assert_eq!(talents.len(), 10);

        let flaws = service
            .catalog_listing(CatalogKind::SpecialFeatures, Some("flaw"), Language::German)
            .unwrap();
        assert!(!flaws.is_empty());
        assert!(flaws.iter().all(|f| f.category.as_deref().is_some_and(|c| c.ends_with("flaw"))));

        let clans = service
            .catalog_listing(CatalogKind::Clans, None, Language::German)
            .unwrap();
        assert!(clans.iter().any(|c| c.name == "Malkavianer"));

        assert!(service
            .catalog_listing(CatalogKind::Roads, Some("virtue"), Language::English)
            .is_err());
    }

    #[test]
    fn test_open_reports_suppressed_failures() {
        let service = service();
        let character = service.new_character(request()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xml");
        service.save(&character, &path).unwrap();

        let document = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, document.replace("key=\"wits\"", "key=\"cunning\"")).unwrap();

        let err = service.open(&path).unwrap_err();
        let storage = storage_error(&err).unwrap();
        assert_eq!(storage.suppressed().len(), 1);
        assert!(format!("{:#}", err).contains("Failed to load character"));
    }

    #[test]
    fn test_generation_names_render_per_language() {
        let service = service();
        let generations = service
            .catalog_listing(CatalogKind::Generations, None, Language::German)
            .unwrap();
        assert!(generations.iter().any(|g| g.name == "13. Generation"));

        let character = service.new_character(request()).unwrap();
        assert_eq!(character.clan().display_name(Language::German), "Nosferatu");
    }
}
