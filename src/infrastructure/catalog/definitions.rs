//! Definition document parsers, one per catalog kind
//!
//! Every entry goes through its entity builder, so a malformed definition
//! fails warm-up instead of producing a half-valid catalog entry.

use std::str::FromStr;

use crate::application::ports::outbound::{CatalogKind, EntityStorageError};
use crate::domain::entities::{
    Ability, Advantage, Attribute, Clan, FeatureKind, Generation, Nature, Road, SpecialFeature,
    Weakness,
};
use crate::domain::error::EntityError;
use crate::domain::value_objects::{Language, TranslatedNames};
use crate::infrastructure::catalog::store::CatalogStore;
use crate::infrastructure::xml::XmlElement;

fn definition_error(catalog: CatalogKind) -> impl Fn(EntityError) -> EntityStorageError {
    move |source| EntityStorageError::Definition { catalog, source }
}

/// Key attribute; blank when absent so the builder reports it
fn key(element: &XmlElement) -> &str {
    element.attribute("key").unwrap_or_default()
}

/// `<name><en>..</en><de>..</de></name>`
fn names(element: &XmlElement, catalog: CatalogKind) -> Result<TranslatedNames, EntityStorageError> {
    let mut names = TranslatedNames::new();
    if let Some(block) = element.child("name") {
        for localized in &block.children {
            let language =
                Language::from_str(&localized.name).map_err(definition_error(catalog))?;
            names.insert(language, localized.text());
        }
    }
    Ok(names)
}

/// Optional `<type>`; absence is left to the builder
fn category<C>(element: &XmlElement, catalog: CatalogKind) -> Result<Option<C>, EntityStorageError>
where
    C: FromStr<Err = EntityError>,
{
    element
        .child("type")
        .map(|node| node.text().parse::<C>())
        .transpose()
        .map_err(definition_error(catalog))
}

fn integer(
    element: &XmlElement,
    field: &'static str,
    entity: &'static str,
    catalog: CatalogKind,
) -> Result<Option<i32>, EntityStorageError> {
    element
        .child(field)
        .map(|node| {
            node.text().parse::<i32>().map_err(|_| {
                EntityError::invalid(entity, field, format!("'{}' is not a number", node.text()))
            })
        })
        .transpose()
        .map_err(definition_error(catalog))
}

fn references<'a>(element: &'a XmlElement, list: &'a str) -> impl Iterator<Item = &'a str> {
    element
        .children_named(list)
        .flat_map(|block| block.children_named("ref"))
        .filter_map(|node| node.attribute("key"))
}

macro_rules! typed_parser {
    ($(#[$meta:meta])* $fn_name:ident, $entity:ident, $kind:expr) => {
        $(#[$meta])*
        pub fn $fn_name(element: &XmlElement) -> Result<$entity, EntityStorageError> {
            let mut builder = $entity::builder()
                .key(key(element))
                .names(names(element, $kind)?);
            if let Some(category) = category(element, $kind)? {
                builder = builder.category(category);
            }
            builder.build().map_err(definition_error($kind))
        }
    };
}

macro_rules! plain_parser {
    ($fn_name:ident, $entity:ident, $kind:expr) => {
        pub fn $fn_name(element: &XmlElement) -> Result<$entity, EntityStorageError> {
            $entity::builder()
                .key(key(element))
                .names(names(element, $kind)?)
                .build()
                .map_err(definition_error($kind))
        }
    };
}

typed_parser!(parse_attribute, Attribute, CatalogKind::Attributes);
typed_parser!(parse_ability, Ability, CatalogKind::Abilities);
typed_parser!(
    /// Disciplines, backgrounds and virtues share one document
    parse_advantage,
    Advantage,
    CatalogKind::Advantages
);

plain_parser!(parse_weakness, Weakness, CatalogKind::Weaknesses);
plain_parser!(parse_road, Road, CatalogKind::Roads);
plain_parser!(parse_nature, Nature, CatalogKind::Natures);

/// `<generation key="13">` with the numeric limits as child elements
pub fn parse_generation(element: &XmlElement) -> Result<Generation, EntityStorageError> {
    const KIND: CatalogKind = CatalogKind::Generations;
    const ENTITY: &str = "Generation";

    let mut builder = Generation::builder();
    if let Some(raw) = element.attribute("key") {
        let number = raw.trim().parse::<i32>().map_err(|_| EntityStorageError::Definition {
            catalog: KIND,
            source: EntityError::invalid(ENTITY, "generation", format!("'{}' is not a number", raw)),
        })?;
        builder = builder.generation(number);
    }
    if let Some(points) = integer(element, "maximumAttributePoints", ENTITY, KIND)? {
        builder = builder.maximum_attribute_points(points);
    }
    if let Some(pool) = integer(element, "maximumBloodPool", ENTITY, KIND)? {
        builder = builder.maximum_blood_pool(pool);
    }
    if let Some(blood) = integer(element, "bloodPerRound", ENTITY, KIND)? {
        builder = builder.blood_per_round(blood);
    }
    builder.build().map_err(definition_error(KIND))
}

/// Merit or flaw, chosen by the `kind` attribute
pub fn parse_special_feature(element: &XmlElement) -> Result<SpecialFeature, EntityStorageError> {
    const KIND: CatalogKind = CatalogKind::SpecialFeatures;

    let mut builder = SpecialFeature::builder()
        .key(key(element))
        .names(names(element, KIND)?);
    if let Some(category) = category(element, KIND)? {
        builder = builder.category(category);
    }
    if let Some(cost) = integer(element, "cost", "SpecialFeature", KIND)? {
        builder = builder.cost(cost);
    }
    if let Some(kind) = element.attribute("kind") {
        builder = builder.kind(FeatureKind::from_str(kind).map_err(definition_error(KIND))?);
    }
    builder.build().map_err(definition_error(KIND))
}

/// Clan with its discipline and weakness references resolved
pub fn parse_clan(
    element: &XmlElement,
    advantages: &CatalogStore<Advantage>,
    weaknesses: &CatalogStore<Weakness>,
) -> Result<Clan, EntityStorageError> {
    const KIND: CatalogKind = CatalogKind::Clans;

    let mut builder = Clan::builder()
        .key(key(element))
        .names(names(element, KIND)?);
    if let Some(affiliation) = category(element, KIND)? {
        builder = builder.affiliation(affiliation);
    }
    for reference in references(element, "disciplines") {
        builder = builder.discipline(advantages.get(reference)?);
    }
    for reference in references(element, "weaknesses") {
        builder = builder.weakness(weaknesses.get(reference)?);
    }
    builder.build().map_err(definition_error(KIND))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Keyed, Translatable, Typed};
    use crate::domain::value_objects::{AdvantageCategory, ClanAffiliation, SpecialFeatureCategory};
    use crate::infrastructure::catalog::store::LookupPolicy;
    use crate::infrastructure::xml;

    fn element(text: &str) -> XmlElement {
        xml::parse(text).unwrap()
    }

    #[test]
    fn test_parse_advantage_with_both_languages() {
        let advantage = parse_advantage(&element(
            r#"<advantage key="fortitude">
                <name><en>Fortitude</en><de>Seelenstärke</de></name>
                <type>discipline</type>
            </advantage>"#,
        ))
        .unwrap();
        assert_eq!(advantage.key(), "fortitude");
        assert_eq!(advantage.category(), AdvantageCategory::Discipline);
        assert_eq!(advantage.display_name(Language::German), "Seelenstärke");
    }

    #[test]
    fn test_unknown_language_tag_fails() {
        let err = parse_weakness(&element(
            r#"<weakness key="sunlight"><name><fr>Soleil</fr></name></weakness>"#,
        ))
        .unwrap_err();
        assert!(matches!(err, EntityStorageError::Definition { catalog: CatalogKind::Weaknesses, .. }));
    }

    #[test]
    fn test_missing_key_reported_before_missing_type() {
        let err = parse_attribute(&element("<attribute><name><en>Wits</en></name></attribute>"))
            .unwrap_err();
        match err {
            EntityStorageError::Definition { source, .. } => assert_eq!(source.field(), "key"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_generation_keeps_sentinel() {
        let generation = parse_generation(&element(
            r#"<generation key="3">
                <maximumAttributePoints>10</maximumAttributePoints>
                <maximumBloodPool>-1</maximumBloodPool>
                <bloodPerRound>-1</bloodPerRound>
            </generation>"#,
        ))
        .unwrap();
        assert_eq!(generation.key(), "3");
        assert!(generation.is_blood_pool_unbounded());
        assert_eq!(generation.maximum_blood_pool(), i32::MAX);

        let err = parse_generation(&element(r#"<generation key="third"/>"#)).unwrap_err();
        assert!(err.to_string().contains("generation"));
    }

    #[test]
    fn test_parse_special_feature_picks_variant() {
        let feature = parse_special_feature(&element(
            r#"<feature key="eat_food" kind="merit">
                <name><en>Eat Food</en></name>
                <type>supernatural</type>
                <cost>1</cost>
            </feature>"#,
        ))
        .unwrap();
        assert_eq!(feature.kind(), FeatureKind::Merit);
        assert_eq!(feature.category(), SpecialFeatureCategory::Supernatural);
        assert_eq!(feature.cost(), 1);

        let err = parse_special_feature(&element(
            r#"<feature key="x" kind="boon"><name><en>X</en></name><type>social</type><cost>1</cost></feature>"#,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("kind"));
    }

    #[test]
    fn test_parse_clan_resolves_references() {
        let mut advantages = CatalogStore::new(CatalogKind::Advantages, LookupPolicy::Strict);
        advantages
            .init(
                &element(
                    r#"<advantages>
                        <advantage key="obfuscate"><name><en>Obfuscate</en></name><type>discipline</type></advantage>
                    </advantages>"#,
                ),
                parse_advantage,
            )
            .unwrap();
        let mut weaknesses = CatalogStore::new(CatalogKind::Weaknesses, LookupPolicy::Strict);
        weaknesses
            .init(
                &element(
                    r#"<weaknesses>
                        <weakness key="hideous"><name><en>Hideous</en></name></weakness>
                    </weaknesses>"#,
                ),
                parse_weakness,
            )
            .unwrap();

        let clan = parse_clan(
            &element(
                r#"<clan key="nosferatu">
                    <name><en>Nosferatu</en></name>
                    <type>camarilla</type>
                    <disciplines><ref key="obfuscate"/></disciplines>
                    <weaknesses><ref key="hideous"/></weaknesses>
                </clan>"#,
            ),
            &advantages,
            &weaknesses,
        )
        .unwrap();
        assert_eq!(clan.category(), ClanAffiliation::Camarilla);
        assert!(clan.has_discipline("obfuscate"));
        assert_eq!(clan.weaknesses().len(), 1);

        let err = parse_clan(
            &element(
                r#"<clan key="ravnos">
                    <name><en>Ravnos</en></name>
                    <type>independent</type>
                    <disciplines><ref key="chimerstry"/></disciplines>
                    <weaknesses><ref key="hideous"/></weaknesses>
                </clan>"#,
            ),
            &advantages,
            &weaknesses,
        )
        .unwrap_err();
        assert!(matches!(err, EntityStorageError::UnknownKey { .. }));
    }
}
