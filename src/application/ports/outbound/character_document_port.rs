//! Character document port - Persistence of the character aggregate

use std::path::Path;

use crate::application::ports::outbound::EntityStorageError;
use crate::domain::entities::Character;

/// A reconstructed character plus the children that had to be skipped
#[derive(Debug)]
pub struct LoadOutcome {
    pub character: Character,
    /// Entries whose keys no longer resolve; the character was built without them
    pub skipped: Vec<EntityStorageError>,
}

/// Repository port for character documents
pub trait CharacterDocumentPort {
    /// Load a character, reporting skipped children alongside it
    fn load_detailed(&self, path: &Path) -> Result<LoadOutcome, EntityStorageError>;

    /// Write a character, replacing any existing file
    fn save(&self, character: &Character, path: &Path) -> Result<(), EntityStorageError>;

    fn load(&self, path: &Path) -> Result<Character, EntityStorageError> {
        self.load_detailed(path).map(|outcome| outcome.character)
    }
}
