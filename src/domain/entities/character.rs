//! Player character aggregate
//!
//! A character is only ever created through [`CharacterBuilder`], either by the
//! new-character flow or when a document is reconstructed. Edits are copy-with
//! rebuilds: take [`Character::to_builder`], change fields, build again.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::domain::entities::base::{Keyed, ToBuilder, Typed, Valued};
use crate::domain::entities::character_traits::{Ability, Advantage, Attribute};
use crate::domain::entities::clan::Clan;
use crate::domain::entities::generation::Generation;
use crate::domain::entities::nature::Nature;
use crate::domain::entities::road::{CharacterRoad, MAX_ROAD_VALUE};
use crate::domain::entities::special_feature::{Flaw, Merit};
use crate::domain::error::{require, require_text, EntityError};
use crate::domain::value_objects::{AbilityCategory, AttributeCategory, CharacterId, Sex};

pub const ATTRIBUTE_COUNT: usize = 9;
pub const ATTRIBUTES_PER_CATEGORY: usize = 3;
pub const ABILITY_COUNT: usize = 30;
pub const ABILITIES_PER_CATEGORY: usize = 10;
pub const MIN_ADVANTAGE_COUNT: usize = 6;

const ENTITY: &str = "Character";

/// A vampire player character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    id: CharacterId,
    name: String,
    player: String,
    chronicle: String,
    concept: String,
    sire: String,
    sect: String,
    hideout: String,
    clan: Clan,
    generation: Generation,
    nature: Nature,
    demeanor: Nature,
    experience: i32,

    attributes: Vec<Valued<Attribute>>,
    abilities: Vec<Valued<Ability>>,
    advantages: Vec<Valued<Advantage>>,
    merits: Vec<Merit>,
    flaws: Vec<Flaw>,
    road: CharacterRoad,

    willpower: i32,
    used_willpower: i32,
    blood_pool: i32,

    age: i32,
    apparent_age: i32,
    day_of_birth: Option<NaiveDate>,
    day_of_death: Option<NaiveDate>,
    hair_color: String,
    eye_color: String,
    skin_color: String,
    nationality: String,
    height: i32,
    weight: i32,
    sex: Sex,
    story: String,
    description: String,
}

impl Character {
    pub fn builder() -> CharacterBuilder {
        CharacterBuilder::default()
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn chronicle(&self) -> &str {
        &self.chronicle
    }

    pub fn concept(&self) -> &str {
        &self.concept
    }

    pub fn sire(&self) -> &str {
        &self.sire
    }

    pub fn sect(&self) -> &str {
        &self.sect
    }

    pub fn hideout(&self) -> &str {
        &self.hideout
    }

    pub fn clan(&self) -> &Clan {
        &self.clan
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    pub fn nature(&self) -> &Nature {
        &self.nature
    }

    pub fn demeanor(&self) -> &Nature {
        &self.demeanor
    }

    pub fn experience(&self) -> i32 {
        self.experience
    }

    pub fn attributes(&self) -> &[Valued<Attribute>] {
        &self.attributes
    }

    pub fn abilities(&self) -> &[Valued<Ability>] {
        &self.abilities
    }

    pub fn advantages(&self) -> &[Valued<Advantage>] {
        &self.advantages
    }

    pub fn merits(&self) -> &[Merit] {
        &self.merits
    }

    pub fn flaws(&self) -> &[Flaw] {
        &self.flaws
    }

    pub fn road(&self) -> &CharacterRoad {
        &self.road
    }

    pub fn willpower(&self) -> i32 {
        self.willpower
    }

    pub fn used_willpower(&self) -> i32 {
        self.used_willpower
    }

    pub fn blood_pool(&self) -> i32 {
        self.blood_pool
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn apparent_age(&self) -> i32 {
        self.apparent_age
    }

    pub fn day_of_birth(&self) -> Option<NaiveDate> {
        self.day_of_birth
    }

    pub fn day_of_death(&self) -> Option<NaiveDate> {
        self.day_of_death
    }

    pub fn hair_color(&self) -> &str {
        &self.hair_color
    }

    pub fn eye_color(&self) -> &str {
        &self.eye_color
    }

    pub fn skin_color(&self) -> &str {
        &self.skin_color
    }

    pub fn nationality(&self) -> &str {
        &self.nationality
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn story(&self) -> &str {
        &self.story
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn attributes_in(
        &self,
        category: AttributeCategory,
    ) -> impl Iterator<Item = &Valued<Attribute>> {
        self.attributes.iter().filter(move |a| a.category() == category)
    }

    pub fn abilities_in(&self, category: AbilityCategory) -> impl Iterator<Item = &Valued<Ability>> {
        self.abilities.iter().filter(move |a| a.category() == category)
    }

    /// Blood pool ceiling granted by the character's generation
    pub fn maximum_blood_pool(&self) -> i32 {
        self.generation.maximum_blood_pool()
    }

    /// Keys of traits rated above what the generation allows
    pub fn traits_above_generation_limit(&self) -> Vec<&str> {
        let limit = self.generation.maximum_attribute_points();
        let attributes = self.attributes.iter().filter(|t| t.value() > limit).map(|t| t.key());
        let abilities = self.abilities.iter().filter(|t| t.value() > limit).map(|t| t.key());
        let advantages = self.advantages.iter().filter(|t| t.value() > limit).map(|t| t.key());
        attributes.chain(abilities).chain(advantages).collect()
    }

    /// Copy-with a new rating for one attribute
    pub fn with_attribute_value(&self, key: &str, value: i32) -> Result<Character, EntityError> {
        let attributes = revalue(&self.attributes, key, value, "attributes")?;
        self.to_builder().attributes(attributes).build()
    }

    /// Copy-with a new rating for one ability
    pub fn with_ability_value(&self, key: &str, value: i32) -> Result<Character, EntityError> {
        let abilities = revalue(&self.abilities, key, value, "abilities")?;
        self.to_builder().abilities(abilities).build()
    }

    /// Copy-with a new rating for one advantage
    pub fn with_advantage_value(&self, key: &str, value: i32) -> Result<Character, EntityError> {
        let advantages = revalue(&self.advantages, key, value, "advantages")?;
        self.to_builder().advantages(advantages).build()
    }

    pub fn with_road_value(&self, value: i32) -> Result<Character, EntityError> {
        let road = self.road.with_bounded_value(value, MAX_ROAD_VALUE)?;
        self.to_builder().road(road).build()
    }
}

fn revalue<T: Clone + Keyed>(
    traits: &[Valued<T>],
    key: &str,
    value: i32,
    field: &'static str,
) -> Result<Vec<Valued<T>>, EntityError> {
    if !traits.iter().any(|t| t.key() == key) {
        return Err(EntityError::invalid(
            ENTITY,
            field,
            format!("character has no {} '{}'", T::ENTITY.to_lowercase(), key),
        ));
    }
    traits
        .iter()
        .map(|t| if t.key() == key { t.with_value(value) } else { Ok(t.clone()) })
        .collect()
}

impl ToBuilder for Character {
    type Builder = CharacterBuilder;

    fn to_builder(&self) -> CharacterBuilder {
        CharacterBuilder {
            id: Some(self.id),
            name: Some(self.name.clone()),
            player: self.player.clone(),
            chronicle: self.chronicle.clone(),
            concept: Some(self.concept.clone()),
            sire: self.sire.clone(),
            sect: self.sect.clone(),
            hideout: self.hideout.clone(),
            clan: Some(self.clan.clone()),
            generation: Some(self.generation.clone()),
            nature: Some(self.nature.clone()),
            demeanor: Some(self.demeanor.clone()),
            experience: self.experience,
            attributes: self.attributes.clone(),
            abilities: self.abilities.clone(),
            advantages: self.advantages.clone(),
            merits: self.merits.clone(),
            flaws: self.flaws.clone(),
            road: Some(self.road.clone()),
            willpower: self.willpower,
            used_willpower: self.used_willpower,
            blood_pool: self.blood_pool,
            age: self.age,
            apparent_age: self.apparent_age,
            day_of_birth: self.day_of_birth,
            day_of_death: self.day_of_death,
            hair_color: self.hair_color.clone(),
            eye_color: self.eye_color.clone(),
            skin_color: self.skin_color.clone(),
            nationality: self.nationality.clone(),
            height: self.height,
            weight: self.weight,
            sex: Some(self.sex),
            story: self.story.clone(),
            description: self.description.clone(),
        }
    }
}

/// Staging area for a [`Character`]; nothing is checked until [`build`](Self::build)
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    id: Option<CharacterId>,
    name: Option<String>,
    player: String,
    chronicle: String,
    concept: Option<String>,
    sire: String,
    sect: String,
    hideout: String,
    clan: Option<Clan>,
    generation: Option<Generation>,
    nature: Option<Nature>,
    demeanor: Option<Nature>,
    experience: i32,
    attributes: Vec<Valued<Attribute>>,
    abilities: Vec<Valued<Ability>>,
    advantages: Vec<Valued<Advantage>>,
    merits: Vec<Merit>,
    flaws: Vec<Flaw>,
    road: Option<CharacterRoad>,
    willpower: i32,
    used_willpower: i32,
    blood_pool: i32,
    age: i32,
    apparent_age: i32,
    day_of_birth: Option<NaiveDate>,
    day_of_death: Option<NaiveDate>,
    hair_color: String,
    eye_color: String,
    skin_color: String,
    nationality: String,
    height: i32,
    weight: i32,
    sex: Option<Sex>,
    story: String,
    description: String,
}

macro_rules! text_setters {
    ($($field:ident),+ $(,)?) => {
        $(
            pub fn $field(mut self, value: impl Into<String>) -> Self {
                self.$field = value.into();
                self
            }
        )+
    };
}

macro_rules! number_setters {
    ($($field:ident),+ $(,)?) => {
        $(
            pub fn $field(mut self, value: i32) -> Self {
                self.$field = value;
                self
            }
        )+
    };
}

impl CharacterBuilder {
    /// Keep an existing identity; without one `build` generates a new id
    pub fn id(mut self, id: CharacterId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }

    text_setters!(
        player,
        chronicle,
        sire,
        sect,
        hideout,
        hair_color,
        eye_color,
        skin_color,
        nationality,
        story,
        description,
    );

    number_setters!(
        experience,
        willpower,
        used_willpower,
        blood_pool,
        age,
        apparent_age,
        height,
        weight,
    );

    pub fn clan(mut self, clan: Clan) -> Self {
        self.clan = Some(clan);
        self
    }

    pub fn generation(mut self, generation: Generation) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn nature(mut self, nature: Nature) -> Self {
        self.nature = Some(nature);
        self
    }

    pub fn demeanor(mut self, demeanor: Nature) -> Self {
        self.demeanor = Some(demeanor);
        self
    }

    pub fn attribute(mut self, attribute: Valued<Attribute>) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attributes(mut self, attributes: Vec<Valued<Attribute>>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn ability(mut self, ability: Valued<Ability>) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn abilities(mut self, abilities: Vec<Valued<Ability>>) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn advantage(mut self, advantage: Valued<Advantage>) -> Self {
        self.advantages.push(advantage);
        self
    }

    pub fn advantages(mut self, advantages: Vec<Valued<Advantage>>) -> Self {
        self.advantages = advantages;
        self
    }

    pub fn merit(mut self, merit: Merit) -> Self {
        self.merits.push(merit);
        self
    }

    pub fn merits(mut self, merits: Vec<Merit>) -> Self {
        self.merits = merits;
        self
    }

    pub fn flaw(mut self, flaw: Flaw) -> Self {
        self.flaws.push(flaw);
        self
    }

    pub fn flaws(mut self, flaws: Vec<Flaw>) -> Self {
        self.flaws = flaws;
        self
    }

    pub fn road(mut self, road: CharacterRoad) -> Self {
        self.road = Some(road);
        self
    }

    pub fn day_of_birth(mut self, date: Option<NaiveDate>) -> Self {
        self.day_of_birth = date;
        self
    }

    pub fn day_of_death(mut self, date: Option<NaiveDate>) -> Self {
        self.day_of_death = date;
        self
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn build(self) -> Result<Character, EntityError> {
        let name = require_text(&self.name, ENTITY, "name")?.trim().to_string();
        let clan = require(&self.clan, ENTITY, "clan")?.clone();
        let generation = require(&self.generation, ENTITY, "generation")?.clone();
        let nature = require(&self.nature, ENTITY, "nature")?.clone();
        let demeanor = require(&self.demeanor, ENTITY, "demeanor")?.clone();
        let concept = require_text(&self.concept, ENTITY, "concept")?.trim().to_string();

        check_exact(&self.attributes, "attributes", ATTRIBUTE_COUNT)?;
        check_per_category(&self.attributes, "attributes", AttributeCategory::ALL, ATTRIBUTES_PER_CATEGORY)?;
        check_exact(&self.abilities, "abilities", ABILITY_COUNT)?;
        check_per_category(&self.abilities, "abilities", AbilityCategory::ALL, ABILITIES_PER_CATEGORY)?;
        if self.advantages.len() < MIN_ADVANTAGE_COUNT {
            return Err(EntityError::wrong_count(
                ENTITY,
                "advantages",
                format!("at least {}", MIN_ADVANTAGE_COUNT),
                self.advantages.len(),
            ));
        }
        check_unique(self.attributes.iter().map(|t| t.key()), "attributes")?;
        check_unique(self.abilities.iter().map(|t| t.key()), "abilities")?;
        check_unique(self.advantages.iter().map(|t| t.key()), "advantages")?;
        check_unique(self.merits.iter().map(|t| t.key()), "merits")?;
        check_unique(self.flaws.iter().map(|t| t.key()), "flaws")?;

        let road = require(&self.road, ENTITY, "road")?.clone();
        if !(0..=MAX_ROAD_VALUE).contains(&road.value()) {
            return Err(EntityError::invalid(
                ENTITY,
                "road",
                format!(
                    "{} for '{}' lies outside 0..={}",
                    road.value(),
                    road.key(),
                    MAX_ROAD_VALUE
                ),
            ));
        }

        for (field, value) in [
            ("experience", self.experience),
            ("willpower", self.willpower),
            ("usedWillpower", self.used_willpower),
            ("bloodPool", self.blood_pool),
            ("age", self.age),
            ("apparentAge", self.apparent_age),
            ("height", self.height),
            ("weight", self.weight),
        ] {
            if value < 0 {
                return Err(EntityError::invalid(ENTITY, field, format!("{} is negative", value)));
            }
        }
        if self.used_willpower > self.willpower {
            return Err(EntityError::invalid(
                ENTITY,
                "usedWillpower",
                format!(
                    "{} spent exceeds the willpower rating of {}",
                    self.used_willpower, self.willpower
                ),
            ));
        }
        if let (Some(birth), Some(death)) = (self.day_of_birth, self.day_of_death) {
            if death < birth {
                return Err(EntityError::invalid(
                    ENTITY,
                    "dayOfDeath",
                    format!("{} lies before the day of birth {}", death, birth),
                ));
            }
        }
        let sex = *require(&self.sex, ENTITY, "sex")?;

        Ok(Character {
            id: self.id.unwrap_or_default(),
            name,
            player: self.player,
            chronicle: self.chronicle,
            concept,
            sire: self.sire,
            sect: self.sect,
            hideout: self.hideout,
            clan,
            generation,
            nature,
            demeanor,
            experience: self.experience,
            attributes: self.attributes,
            abilities: self.abilities,
            advantages: self.advantages,
            merits: self.merits,
            flaws: self.flaws,
            road,
            willpower: self.willpower,
            used_willpower: self.used_willpower,
            blood_pool: self.blood_pool,
            age: self.age,
            apparent_age: self.apparent_age,
            day_of_birth: self.day_of_birth,
            day_of_death: self.day_of_death,
            hair_color: self.hair_color,
            eye_color: self.eye_color,
            skin_color: self.skin_color,
            nationality: self.nationality,
            height: self.height,
            weight: self.weight,
            sex,
            story: self.story,
            description: self.description,
        })
    }
}

fn check_exact<T>(items: &[T], field: &'static str, expected: usize) -> Result<(), EntityError> {
    if items.len() == expected {
        Ok(())
    } else {
        Err(EntityError::wrong_count(
            ENTITY,
            field,
            format!("exactly {}", expected),
            items.len(),
        ))
    }
}

fn check_per_category<T>(
    items: &[T],
    field: &'static str,
    categories: &[T::Category],
    expected: usize,
) -> Result<(), EntityError>
where
    T: Typed,
{
    for category in categories {
        let found = items.iter().filter(|t| t.category() == *category).count();
        if found != expected {
            return Err(EntityError::wrong_count(
                ENTITY,
                field,
                format!("exactly {} {}", expected, category),
                found,
            ));
        }
    }
    Ok(())
}

fn check_unique<'a>(
    keys: impl Iterator<Item = &'a str>,
    field: &'static str,
) -> Result<(), EntityError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(EntityError::invalid(
                ENTITY,
                field,
                format!("'{}' appears more than once", key),
            ));
        }
    }
    Ok(())
}
