//! Catalog registry - Read-only reference data warmed up on first use
//!
//! The registry is an explicit context object created once at startup and
//! shared through an `Arc`. The first access to any catalog loads every kind
//! in dependency order; afterwards all catalogs are read-only.

mod definitions;
mod source;
mod store;

pub use source::DefinitionSource;
pub use store::{CatalogEntry, CatalogStore, LookupPolicy};

use once_cell::sync::OnceCell;

use crate::application::ports::outbound::{CatalogKind, CatalogView, EntityStorageError};
use crate::domain::entities::{
    Ability, Advantage, Attribute, Clan, Generation, Nature, Road, SpecialFeature, Weakness,
};
use crate::infrastructure::xml::{self, XmlElement};

/// Every catalog, fully initialized
#[derive(Debug)]
pub struct Catalogs {
    pub attributes: CatalogStore<Attribute>,
    pub abilities: CatalogStore<Ability>,
    pub advantages: CatalogStore<Advantage>,
    pub clans: CatalogStore<Clan>,
    pub weaknesses: CatalogStore<Weakness>,
    pub generations: CatalogStore<Generation>,
    pub roads: CatalogStore<Road>,
    pub natures: CatalogStore<Nature>,
    pub special_features: CatalogStore<SpecialFeature>,
}

impl Catalogs {
    fn empty() -> Self {
        use LookupPolicy::Strict;

        Self {
            attributes: CatalogStore::new(CatalogKind::Attributes, Strict),
            abilities: CatalogStore::new(CatalogKind::Abilities, Strict),
            advantages: CatalogStore::new(CatalogKind::Advantages, Strict),
            clans: CatalogStore::new(CatalogKind::Clans, Strict),
            weaknesses: CatalogStore::new(CatalogKind::Weaknesses, Strict),
            generations: CatalogStore::new(CatalogKind::Generations, Strict),
            roads: CatalogStore::new(CatalogKind::Roads, Strict),
            // free-text natures from older documents stay loadable
            natures: CatalogStore::new(
                CatalogKind::Natures,
                LookupPolicy::Synthesize(Nature::ad_hoc),
            ),
            special_features: CatalogStore::new(CatalogKind::SpecialFeatures, Strict),
        }
    }

    /// Load every kind; clans go after the advantages and weaknesses they reference
    fn warm_up(source: &DefinitionSource) -> Result<Self, EntityStorageError> {
        let mut catalogs = Self::empty();

        let root = load_root(source, CatalogKind::Weaknesses)?;
        catalogs.weaknesses.init(&root, definitions::parse_weakness)?;
        let root = load_root(source, CatalogKind::Advantages)?;
        catalogs.advantages.init(&root, definitions::parse_advantage)?;

        let root = load_root(source, CatalogKind::Clans)?;
        let (advantages, weaknesses) = (&catalogs.advantages, &catalogs.weaknesses);
        catalogs
            .clans
            .init(&root, |element| definitions::parse_clan(element, advantages, weaknesses))?;

        let root = load_root(source, CatalogKind::Attributes)?;
        catalogs.attributes.init(&root, definitions::parse_attribute)?;
        let root = load_root(source, CatalogKind::Abilities)?;
        catalogs.abilities.init(&root, definitions::parse_ability)?;
        let root = load_root(source, CatalogKind::Generations)?;
        catalogs.generations.init(&root, definitions::parse_generation)?;
        let root = load_root(source, CatalogKind::Roads)?;
        catalogs.roads.init(&root, definitions::parse_road)?;
        let root = load_root(source, CatalogKind::Natures)?;
        catalogs.natures.init(&root, definitions::parse_nature)?;
        let root = load_root(source, CatalogKind::SpecialFeatures)?;
        catalogs
            .special_features
            .init(&root, definitions::parse_special_feature)?;

        Ok(catalogs)
    }

    pub fn view(&self, kind: CatalogKind) -> &dyn CatalogView {
        match kind {
            CatalogKind::Attributes => &self.attributes,
            CatalogKind::Abilities => &self.abilities,
            CatalogKind::Advantages => &self.advantages,
            CatalogKind::Clans => &self.clans,
            CatalogKind::Weaknesses => &self.weaknesses,
            CatalogKind::Generations => &self.generations,
            CatalogKind::Roads => &self.roads,
            CatalogKind::Natures => &self.natures,
            CatalogKind::SpecialFeatures => &self.special_features,
        }
    }
}

fn load_root(source: &DefinitionSource, kind: CatalogKind) -> Result<XmlElement, EntityStorageError> {
    let text = source.read(kind)?;
    xml::parse(&text).map_err(|e| EntityStorageError::xml(source.origin(kind), e))
}

/// Lazily warmed set of catalogs
#[derive(Debug, Default)]
pub struct CatalogRegistry {
    source: DefinitionSource,
    catalogs: OnceCell<Catalogs>,
}

impl CatalogRegistry {
    pub fn new(source: DefinitionSource) -> Self {
        Self {
            source,
            catalogs: OnceCell::new(),
        }
    }

    /// Registry over the definitions compiled into the binary
    pub fn embedded() -> Self {
        Self::new(DefinitionSource::Embedded)
    }

    pub fn source(&self) -> &DefinitionSource {
        &self.source
    }

    /// True once warm-up has completed
    pub fn is_warm(&self) -> bool {
        self.catalogs.get().is_some()
    }

    /// All catalogs, warming them up on first call
    ///
    /// A failed warm-up is returned to the caller and leaves the registry cold,
    /// so the next call retries.
    pub fn catalogs(&self) -> Result<&Catalogs, EntityStorageError> {
        self.catalogs.get_or_try_init(|| {
            tracing::info!(source = ?self.source, "Warming up catalogs");
            let catalogs = Catalogs::warm_up(&self.source)?;
            tracing::info!(
                clans = catalogs.clans.len(),
                advantages = catalogs.advantages.len(),
                natures = catalogs.natures.len(),
                "Catalogs ready"
            );
            Ok(catalogs)
        })
    }

    /// Kind-agnostic view of one catalog
    pub fn get(&self, kind: CatalogKind) -> Result<&dyn CatalogView, EntityStorageError> {
        Ok(self.catalogs()?.view(kind))
    }

    pub fn attributes(&self) -> Result<&CatalogStore<Attribute>, EntityStorageError> {
        Ok(&self.catalogs()?.attributes)
    }

    pub fn abilities(&self) -> Result<&CatalogStore<Ability>, EntityStorageError> {
        Ok(&self.catalogs()?.abilities)
    }

    pub fn advantages(&self) -> Result<&CatalogStore<Advantage>, EntityStorageError> {
        Ok(&self.catalogs()?.advantages)
    }

    pub fn clans(&self) -> Result<&CatalogStore<Clan>, EntityStorageError> {
        Ok(&self.catalogs()?.clans)
    }

    pub fn weaknesses(&self) -> Result<&CatalogStore<Weakness>, EntityStorageError> {
        Ok(&self.catalogs()?.weaknesses)
    }

    pub fn generations(&self) -> Result<&CatalogStore<Generation>, EntityStorageError> {
        Ok(&self.catalogs()?.generations)
    }

    pub fn roads(&self) -> Result<&CatalogStore<Road>, EntityStorageError> {
        Ok(&self.catalogs()?.roads)
    }

    pub fn natures(&self) -> Result<&CatalogStore<Nature>, EntityStorageError> {
        Ok(&self.catalogs()?.natures)
    }

    pub fn special_features(&self) -> Result<&CatalogStore<SpecialFeature>, EntityStorageError> {
        Ok(&self.catalogs()?.special_features)
    }
}
