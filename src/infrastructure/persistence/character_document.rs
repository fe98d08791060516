//! XML character document adapter
//!
//! Loading runs parse, identity check and schema validation before the
//! catalogs are touched. Children whose keys no longer resolve are skipped
//! and reported; the character builder then decides whether what remains is
//! still a valid character.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::ports::outbound::{
    CatalogKind, CharacterDocumentPort, EntityStorageError, LoadOutcome,
};
use crate::domain::entities::{Character, CharacterRoad, Keyed, SpecialFeature, Valued};
use crate::domain::value_objects::Sex;
use crate::infrastructure::catalog::{CatalogRegistry, CatalogStore, Catalogs};
use crate::infrastructure::persistence::document_schema::{
    self, DATE_FORMAT, ENTRY, ROOT, XSI_NAMESPACE,
};
use crate::infrastructure::xml::{self, XmlElement};

/// Reads and writes character documents, resolving keys through the registry
#[derive(Debug, Clone)]
pub struct XmlCharacterDocumentStore {
    catalogs: Arc<CatalogRegistry>,
}

impl XmlCharacterDocumentStore {
    pub fn new(catalogs: Arc<CatalogRegistry>) -> Self {
        Self { catalogs }
    }

    /// Rebuild a character from document text
    pub fn from_xml(&self, document: &str, origin: &str) -> Result<LoadOutcome, EntityStorageError> {
        let root = xml::parse(document).map_err(|e| EntityStorageError::xml(origin, e))?;
        let id = document_schema::identity(&root)?;
        document_schema::validate(&root)?;

        let catalogs = self.catalogs.catalogs()?;
        let mut skipped = Vec::new();
        let reader = DocumentReader { root: &root };

        let mut builder = Character::builder()
            .id(id)
            .name(reader.text("name"))
            .chronicle(reader.text("chronicle"))
            .experience(reader.integer("experience"))
            .hideout(reader.text("hideout"))
            .player(reader.text("player"))
            .concept(reader.text("concept"))
            .sire(reader.text("sire"))
            .sect(reader.text("sect"))
            .willpower(reader.integer("willpower"))
            .used_willpower(reader.integer("usedWillpower"))
            .blood_pool(reader.integer("bloodPool"))
            .age(reader.integer("age"))
            .apparent_age(reader.integer("apparentAge"))
            .day_of_birth(reader.date("dayOfBirth"))
            .day_of_death(reader.date("dayOfDeath"))
            .hair_color(reader.text("hairColor"))
            .eye_color(reader.text("eyeColor"))
            .skin_color(reader.text("skinColor"))
            .nationality(reader.text("nationality"))
            .height(reader.integer("height"))
            .weight(reader.integer("weight"))
            .story(reader.text("story"))
            .description(reader.text("description"));

        if let Ok(sex) = reader.key("sex").parse::<Sex>() {
            builder = builder.sex(sex);
        }
        if let Some(clan) = keep(catalogs.clans.get(reader.key("clan")), &mut skipped) {
            builder = builder.clan(clan);
        }
        let generation_key = reader.integer("generation").to_string();
        if let Some(generation) = keep(catalogs.generations.get(&generation_key), &mut skipped) {
            builder = builder.generation(generation);
        }
        if let Some(nature) = keep(catalogs.natures.get(reader.key("nature")), &mut skipped) {
            builder = builder.nature(nature);
        }
        if let Some(demeanor) = keep(catalogs.natures.get(reader.key("demeanor")), &mut skipped) {
            builder = builder.demeanor(demeanor);
        }

        builder = builder
            .attributes(valued_entries(reader.block("attributes"), &catalogs.attributes, &mut skipped))
            .abilities(valued_entries(reader.block("abilities"), &catalogs.abilities, &mut skipped))
            .advantages(valued_entries(reader.block("advantages"), &catalogs.advantages, &mut skipped))
            .merits(special_features(reader.block("merits"), catalogs, &mut skipped, |f| {
                f.as_merit().cloned().ok_or("merit")
            }))
            .flaws(special_features(reader.block("flaws"), catalogs, &mut skipped, |f| {
                f.as_flaw().cloned().ok_or("flaw")
            }));

        if let Some(road) = keep(resolve_road(reader.element("road"), catalogs), &mut skipped) {
            builder = builder.road(road);
        }

        match builder.build() {
            Ok(character) => {
                tracing::debug!(
                    character_id = %character.id(),
                    skipped = skipped.len(),
                    "Character document loaded"
                );
                Ok(LoadOutcome { character, skipped })
            }
            Err(source) => Err(EntityStorageError::Build {
                source,
                suppressed: skipped,
            }),
        }
    }

    /// Flatten a character into document text
    pub fn to_xml(&self, character: &Character) -> Result<String, EntityStorageError> {
        let root = XmlElement::new(ROOT)
            .with_attribute("id", character.id().to_string())
            .with_attribute("xmlns:xsi", XSI_NAMESPACE)
            .with_child(text("name", character.name()))
            .with_child(text("clan", character.clan().key()))
            .with_child(text("generation", character.generation().number().to_string()))
            .with_child(text("chronicle", character.chronicle()))
            .with_child(text("experience", character.experience().to_string()))
            .with_child(text("nature", character.nature().key()))
            .with_child(text("hideout", character.hideout()))
            .with_child(text("player", character.player()))
            .with_child(text("demeanor", character.demeanor().key()))
            .with_child(text("concept", character.concept()))
            .with_child(text("sire", character.sire()))
            .with_child(text("sect", character.sect()))
            .with_child(valued_block("attributes", character.attributes()))
            .with_child(valued_block("abilities", character.abilities()))
            .with_child(valued_block("advantages", character.advantages()))
            .with_child(key_block("merits", character.merits()))
            .with_child(key_block("flaws", character.flaws()))
            .with_child(
                XmlElement::new("road")
                    .with_attribute("key", character.road().key())
                    .with_text(character.road().value().to_string()),
            )
            .with_child(text("willpower", character.willpower().to_string()))
            .with_child(text("usedWillpower", character.used_willpower().to_string()))
            .with_child(text("bloodPool", character.blood_pool().to_string()))
            .with_child(text("age", character.age().to_string()))
            .with_child(text("apparentAge", character.apparent_age().to_string()))
            .with_child(date("dayOfBirth", character.day_of_birth()))
            .with_child(date("dayOfDeath", character.day_of_death()))
            .with_child(text("hairColor", character.hair_color()))
            .with_child(text("eyeColor", character.eye_color()))
            .with_child(text("skinColor", character.skin_color()))
            .with_child(text("nationality", character.nationality()))
            .with_child(text("height", character.height().to_string()))
            .with_child(text("weight", character.weight().to_string()))
            .with_child(text("sex", character.sex().as_str()))
            .with_child(text("story", character.story()))
            .with_child(text("description", character.description()));

        xml::write(&root).map_err(|e| EntityStorageError::xml("character document", e))
    }
}

impl CharacterDocumentPort for XmlCharacterDocumentStore {
    fn load_detailed(&self, path: &Path) -> Result<LoadOutcome, EntityStorageError> {
        let document = fs::read_to_string(path).map_err(|e| EntityStorageError::io(path, e))?;
        let outcome = self.from_xml(&document, &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            character_id = %outcome.character.id(),
            "Loaded character"
        );
        Ok(outcome)
    }

    fn save(&self, character: &Character, path: &Path) -> Result<(), EntityStorageError> {
        let document = self.to_xml(character)?;
        fs::write(path, document).map_err(|e| EntityStorageError::io(path, e))?;
        tracing::info!(path = %path.display(), character_id = %character.id(), "Saved character");
        Ok(())
    }
}

/// Field access on a schema-valid document
struct DocumentReader<'a> {
    root: &'a XmlElement,
}

impl<'a> DocumentReader<'a> {
    fn element(&self, name: &str) -> Option<&'a XmlElement> {
        self.root.child(name)
    }

    fn block(&self, name: &str) -> impl Iterator<Item = &'a XmlElement> {
        self.root
            .child(name)
            .into_iter()
            .flat_map(|block| block.children.iter())
            .filter(|entry| entry.name == ENTRY)
    }

    /// Free text as written
    fn text(&self, name: &str) -> &'a str {
        self.element(name).map(XmlElement::raw_text).unwrap_or_default()
    }

    fn key(&self, name: &str) -> &'a str {
        self.element(name).map(XmlElement::text).unwrap_or_default()
    }

    fn integer(&self, name: &str) -> i32 {
        self.key(name).parse().unwrap_or_default()
    }

    fn date(&self, name: &str) -> Option<NaiveDate> {
        let element = self.element(name)?;
        if element.is_nil() {
            return None;
        }
        NaiveDate::parse_from_str(element.text(), DATE_FORMAT).ok()
    }
}

/// Record a failed child resolution and carry on without it
fn keep<T>(result: Result<T, EntityStorageError>, skipped: &mut Vec<EntityStorageError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping unresolvable document entry");
            skipped.push(e);
            None
        }
    }
}

fn entry_key(entry: &XmlElement) -> &str {
    entry.attribute("key").unwrap_or_default().trim()
}

fn valued_entries<'a, T>(
    entries: impl Iterator<Item = &'a XmlElement>,
    store: &CatalogStore<T>,
    skipped: &mut Vec<EntityStorageError>,
) -> Vec<Valued<T>>
where
    T: Keyed + Clone,
{
    entries
        .filter_map(|entry| {
            let key = entry_key(entry);
            let value = entry.text().parse().unwrap_or_default();
            let resolved = store.get(key).and_then(|definition| {
                Valued::builder(&definition)
                    .value(value)
                    .build()
                    .map_err(|source| EntityStorageError::InvalidEntry {
                        catalog: store.kind(),
                        key: key.to_string(),
                        source,
                    })
            });
            keep(resolved, skipped)
        })
        .collect()
}

fn special_features<'a, T, F>(
    entries: impl Iterator<Item = &'a XmlElement>,
    catalogs: &Catalogs,
    skipped: &mut Vec<EntityStorageError>,
    variant: F,
) -> Vec<T>
where
    F: Fn(&SpecialFeature) -> Result<T, &'static str>,
{
    entries
        .filter_map(|entry| {
            let key = entry_key(entry);
            let resolved = catalogs.special_features.get(key).and_then(|feature| {
                variant(&feature).map_err(|expected| EntityStorageError::WrongVariant {
                    catalog: CatalogKind::SpecialFeatures,
                    key: key.to_string(),
                    expected,
                })
            });
            keep(resolved, skipped)
        })
        .collect()
}

fn resolve_road(
    element: Option<&XmlElement>,
    catalogs: &Catalogs,
) -> Result<CharacterRoad, EntityStorageError> {
    let element = element.ok_or_else(|| EntityStorageError::unknown_key(CatalogKind::Roads, ""))?;
    let key = entry_key(element);
    let value = element.text().parse().unwrap_or_default();
    catalogs
        .roads
        .get(key)?
        .valued(value)
        .map_err(|source| EntityStorageError::InvalidEntry {
            catalog: CatalogKind::Roads,
            key: key.to_string(),
            source,
        })
}

fn text(name: &str, value: impl Into<String>) -> XmlElement {
    XmlElement::new(name).with_text(value)
}

fn date(name: &str, value: Option<NaiveDate>) -> XmlElement {
    match value {
        Some(date) => text(name, date.format(DATE_FORMAT).to_string()),
        None => XmlElement::new(name).with_attribute("xsi:nil", "true"),
    }
}

fn valued_block<T: Keyed>(name: &str, traits: &[Valued<T>]) -> XmlElement {
    traits.iter().fold(XmlElement::new(name), |block, t| {
        block.with_child(
            XmlElement::new(ENTRY)
                .with_attribute("key", t.key())
                .with_text(t.value().to_string()),
        )
    })
}

fn key_block<T: Keyed>(name: &str, features: &[T]) -> XmlElement {
    features.iter().fold(XmlElement::new(name), |block, f| {
        block.with_child(XmlElement::new(ENTRY).with_attribute("key", f.key()))
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ToBuilder, Translatable};
    use crate::domain::error::EntityError;
    use crate::domain::value_objects::Language;

    fn store() -> XmlCharacterDocumentStore {
        XmlCharacterDocumentStore::new(Arc::new(CatalogRegistry::embedded()))
    }

    fn saved(store: &XmlCharacterDocumentStore) -> (Character, String) {
        let character = fixtures::character(&store.catalogs);
        let document = store.to_xml(&character).unwrap();
        (character, document)
    }

    #[test]
    fn test_round_trip_keeps_keys_and_values() {
        let store = store();
        let (character, document) = saved(&store);

        let outcome = store.from_xml(&document, "memory").unwrap();
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.character, character);
        assert_eq!(store.to_xml(&outcome.character).unwrap(), document);
    }

    #[test]
    fn test_document_layout() {
        let store = store();
        let (character, document) = saved(&store);

        assert!(document.contains(&format!("<character id=\"{}\"", character.id())));
        assert!(document.contains("<entry key=\"strength\">2</entry>"));
        assert!(document.contains("<entry key=\"eat_food\"/>"));
        assert!(document.contains("<road key=\"humanity\">7</road>"));
        assert!(document.contains("<dayOfBirth>1890-05-01</dayOfBirth>"));
        assert!(document.contains("<dayOfDeath xsi:nil=\"true\"/>"));
        assert!(document.contains("<sire>Unknown &amp; unnamed</sire>"));

        let name = document.find("<name>").unwrap();
        let clan = document.find("<clan>").unwrap();
        let description = document.find("<description").unwrap();
        assert!(name < clan && clan < description);
    }

    #[test]
    fn test_padded_free_text_survives_round_trip() {
        let store = store();
        let character = fixtures::character(&store.catalogs)
            .to_builder()
            .story("  Indented first line\n  second line  ")
            .sire(" ")
            .build()
            .unwrap();

        let document = store.to_xml(&character).unwrap();
        let loaded = store.from_xml(&document, "memory").unwrap().character;
        assert_eq!(loaded.story(), "  Indented first line\n  second line  ");
        assert_eq!(loaded, character);
    }

    #[test]
    fn test_padded_entry_keys_resolve() {
        let store = store();
        let (character, document) = saved(&store);
        let document = document
            .replace("<entry key=\"strength\">", "<entry key=\" strength \">")
            .replace("<entry key=\"eat_food\"/>", "<entry key=\"eat_food \"/>");

        let outcome = store.from_xml(&document, "memory").unwrap();
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.character, character);
    }

    #[test]
    fn test_nil_dates_load_as_absent() {
        let store = store();
        let (_, document) = saved(&store);

        let loaded = store.from_xml(&document, "memory").unwrap().character;
        assert_eq!(loaded.day_of_birth(), NaiveDate::from_ymd_opt(1890, 5, 1));
        assert_eq!(loaded.day_of_death(), None);
    }

    #[test]
    fn test_free_text_demeanor_survives_reload() {
        let store = store();
        let (_, document) = saved(&store);

        let loaded = store.from_xml(&document, "memory").unwrap().character;
        assert!(loaded.demeanor().is_ad_hoc());
        assert_eq!(loaded.demeanor().display_name(Language::German), "Brujah-ish");
        assert!(!loaded.nature().is_ad_hoc());
    }

    #[test]
    fn test_removed_attribute_fails_build_with_suppressed_cause() {
        let store = store();
        let (_, document) = saved(&store);
        let document = document.replace("<entry key=\"strength\">", "<entry key=\"luck\">");

        let err = store.from_xml(&document, "memory").unwrap_err();
        match &err {
            EntityStorageError::Build { source, suppressed } => {
                assert_eq!(source.field(), "attributes");
                assert!(matches!(source, EntityError::WrongCount { found: 8, .. }));
                assert_eq!(suppressed.len(), 1);
                assert!(matches!(
                    &suppressed[0],
                    EntityStorageError::UnknownKey { catalog: CatalogKind::Attributes, key } if key == "luck"
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.report().contains("suppressed"));
    }

    #[test]
    fn test_vanished_merit_is_skipped_and_reported() {
        let store = store();
        let (_, document) = saved(&store);
        let document = document.replace("<entry key=\"eat_food\"/>", "<entry key=\"retired_merit\"/>");

        let outcome = store.from_xml(&document, "memory").unwrap();
        assert!(outcome.character.merits().is_empty());
        assert_eq!(outcome.skipped.len(), 1);
    }

    #[test]
    fn test_flaw_listed_as_merit_is_wrong_variant() {
        let store = store();
        let (_, document) = saved(&store);
        let document = document.replace("<entry key=\"eat_food\"/>", "<entry key=\"nightmares\"/>");

        let outcome = store.from_xml(&document, "memory").unwrap();
        assert!(matches!(
            outcome.skipped.as_slice(),
            [EntityStorageError::WrongVariant { expected: "merit", .. }]
        ));
    }

    #[test]
    fn test_out_of_range_road_value_is_skipped_then_build_fails() {
        let store = store();
        let (_, document) = saved(&store);
        let document = document.replace("<road key=\"humanity\">7</road>", "<road key=\"humanity\">11</road>");

        let err = store.from_xml(&document, "memory").unwrap_err();
        assert!(matches!(
            err.suppressed(),
            [EntityStorageError::InvalidEntry { catalog: CatalogKind::Roads, .. }]
        ));
    }

    #[test]
    fn test_schema_violation_fails_before_catalog_access() {
        let registry = Arc::new(CatalogRegistry::embedded());
        let store = XmlCharacterDocumentStore::new(registry.clone());

        let err = store
            .from_xml("<character><name>Nobody</name></character>", "memory")
            .unwrap_err();
        assert!(matches!(err, EntityStorageError::MissingIdentity(_)));

        let document = format!(
            r#"<character id="{}"><name>Nobody</name></character>"#,
            crate::domain::value_objects::CharacterId::new()
        );
        let err = store.from_xml(&document, "memory").unwrap_err();
        assert!(matches!(err, EntityStorageError::Schema { .. }));

        assert!(!registry.is_warm());
    }

    #[test]
    fn test_malformed_xml() {
        let err = store().from_xml("<character id=", "broken.xml").unwrap_err();
        assert!(matches!(err, EntityStorageError::Xml { origin, .. } if origin == "broken.xml"));
    }

    #[test]
    fn test_file_save_and_load() {
        let store = store();
        let character = fixtures::character(&store.catalogs);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ezra.xml");

        store.save(&character, &path).unwrap();
        let loaded = store.load(&path).unwrap();
        assert_eq!(loaded.id(), character.id());
        assert_eq!(loaded.clan().key(), "nosferatu");

        let err = store.load(&dir.path().join("missing.xml")).unwrap_err();
        assert!(matches!(err, EntityStorageError::Io { .. }));
    }
}
