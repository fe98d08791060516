//! Generation tiers (distance from Caine)

use crate::domain::entities::base::{Keyed, ToBuilder};
use crate::domain::error::{require, EntityError};

/// Stored value meaning "no upper bound"
pub const UNBOUNDED: i32 = -1;

/// Limits that depend on how far a vampire stands from the first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    key: String,
    generation: i32,
    maximum_attribute_points: i32,
    maximum_blood_pool: i32,
    blood_per_round: i32,
}

impl Generation {
    pub fn builder() -> GenerationBuilder {
        GenerationBuilder::default()
    }

    pub fn number(&self) -> i32 {
        self.generation
    }

    /// Highest rating any single trait may reach
    pub fn maximum_attribute_points(&self) -> i32 {
        self.maximum_attribute_points
    }

    /// Blood pool ceiling; unbounded generations report `i32::MAX`
    pub fn maximum_blood_pool(&self) -> i32 {
        resolve_unbounded(self.maximum_blood_pool)
    }

    /// Blood points spendable per turn; unbounded generations report `i32::MAX`
    pub fn blood_per_round(&self) -> i32 {
        resolve_unbounded(self.blood_per_round)
    }

    pub fn is_blood_pool_unbounded(&self) -> bool {
        self.maximum_blood_pool == UNBOUNDED
    }
}

fn resolve_unbounded(value: i32) -> i32 {
    if value == UNBOUNDED {
        i32::MAX
    } else {
        value
    }
}

impl Keyed for Generation {
    const ENTITY: &'static str = "Generation";

    fn key(&self) -> &str {
        &self.key
    }
}

impl ToBuilder for Generation {
    type Builder = GenerationBuilder;

    fn to_builder(&self) -> GenerationBuilder {
        GenerationBuilder {
            generation: Some(self.generation),
            maximum_attribute_points: Some(self.maximum_attribute_points),
            maximum_blood_pool: Some(self.maximum_blood_pool),
            blood_per_round: Some(self.blood_per_round),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerationBuilder {
    generation: Option<i32>,
    maximum_attribute_points: Option<i32>,
    maximum_blood_pool: Option<i32>,
    blood_per_round: Option<i32>,
}

impl GenerationBuilder {
    pub fn generation(mut self, generation: i32) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn maximum_attribute_points(mut self, points: i32) -> Self {
        self.maximum_attribute_points = Some(points);
        self
    }

    /// Use [`UNBOUNDED`] for no ceiling
    pub fn maximum_blood_pool(mut self, pool: i32) -> Self {
        self.maximum_blood_pool = Some(pool);
        self
    }

    /// Use [`UNBOUNDED`] for no ceiling
    pub fn blood_per_round(mut self, blood: i32) -> Self {
        self.blood_per_round = Some(blood);
        self
    }

    pub fn build(self) -> Result<Generation, EntityError> {
        const ENTITY: &str = Generation::ENTITY;

        let generation = *require(&self.generation, ENTITY, "generation")?;
        if generation <= 0 {
            return Err(EntityError::invalid(ENTITY, "generation", "must be greater than 0"));
        }
        let maximum_attribute_points =
            *require(&self.maximum_attribute_points, ENTITY, "maximumAttributePoints")?;
        if maximum_attribute_points <= 0 {
            return Err(EntityError::invalid(
                ENTITY,
                "maximumAttributePoints",
                "must be greater than 0",
            ));
        }
        let maximum_blood_pool =
            check_bound(*require(&self.maximum_blood_pool, ENTITY, "maximumBloodPool")?, "maximumBloodPool")?;
        let blood_per_round =
            check_bound(*require(&self.blood_per_round, ENTITY, "bloodPerRound")?, "bloodPerRound")?;

        Ok(Generation {
            key: generation.to_string(),
            generation,
            maximum_attribute_points,
            maximum_blood_pool,
            blood_per_round,
        })
    }
}

fn check_bound(value: i32, field: &'static str) -> Result<i32, EntityError> {
    if value == UNBOUNDED || value > 0 {
        Ok(value)
    } else {
        Err(EntityError::invalid(
            Generation::ENTITY,
            field,
            format!("{} must be {} (unbounded) or greater than 0", value, UNBOUNDED),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thirteenth() -> GenerationBuilder {
        Generation::builder()
            .generation(13)
            .maximum_attribute_points(5)
            .maximum_blood_pool(10)
            .blood_per_round(1)
    }

    #[test]
    fn test_generation_is_keyed_by_number() {
        let generation = thirteenth().build().unwrap();
        assert_eq!(generation.key(), "13");
        assert_eq!(generation.number(), 13);
        assert_eq!(generation.maximum_blood_pool(), 10);
        assert!(!generation.is_blood_pool_unbounded());
    }

    #[test]
    fn test_unbounded_sentinel_resolves_to_numeric_max() {
        let generation = Generation::builder()
            .generation(3)
            .maximum_attribute_points(10)
            .maximum_blood_pool(UNBOUNDED)
            .blood_per_round(UNBOUNDED)
            .build()
            .unwrap();
        assert_eq!(generation.maximum_blood_pool(), i32::MAX);
        assert_eq!(generation.blood_per_round(), i32::MAX);
        assert!(generation.is_blood_pool_unbounded());
    }

    #[test]
    fn test_generation_domain_checks() {
        let err = thirteenth().generation(0).build().unwrap_err();
        assert_eq!(err.field(), "generation");

        let err = thirteenth().maximum_attribute_points(0).build().unwrap_err();
        assert_eq!(err.field(), "maximumAttributePoints");

        let err = thirteenth().maximum_blood_pool(0).build().unwrap_err();
        assert_eq!(err.field(), "maximumBloodPool");

        let err = thirteenth().blood_per_round(-2).build().unwrap_err();
        assert_eq!(err.field(), "bloodPerRound");

        let err = Generation::builder().build().unwrap_err();
        assert_eq!(err, EntityError::missing("Generation", "generation"));
    }
}
