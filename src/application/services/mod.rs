//! Application services - Use case implementations
//!
//! Services accept their port dependencies and return domain entities or DTOs.

pub mod character_sheet_service;

pub use character_sheet_service::{
    storage_error, CharacterSheetService, NewCharacterRequest, DEFAULT_ROAD, STARTING_VIRTUES,
};
