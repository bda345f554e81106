//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Has a unique identity
//! - Owns all its constituent parts (enforced by Rust ownership)
//! - Exposes behavior through methods, not public fields
//! - Returns domain events from mutations

pub mod character;
pub mod snapshot;

pub use character::{class_levels, Character, CharacterKind};
pub use snapshot::{CharacterProfile, CharacterSnapshot, ImportedCharacter, ItemDiagnostic};
