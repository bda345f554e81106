//! Character sheet use cases.
//!
//! Import stored snapshots, build the sheet view, and apply validated item
//! field edits.

mod error;
mod import_character;
mod prepare_sheet;
mod update_item_field;

pub use error::CharacterSheetError;
pub use import_character::{ImportCharacter, ImportResult};
pub use prepare_sheet::PrepareSheet;
pub use update_item_field::UpdateItemField;

use std::sync::Arc;

use crate::infrastructure::ports::CharacterRepo;

use super::Ruleset;

/// Container for character sheet use cases.
pub struct CharacterSheetUseCases {
    pub import: ImportCharacter,
    pub prepare: PrepareSheet,
    pub update_item_field: UpdateItemField,
}

impl CharacterSheetUseCases {
    pub fn new(character_repo: Arc<dyn CharacterRepo>, ruleset: Arc<Ruleset>) -> Self {
        Self {
            import: ImportCharacter::new(character_repo.clone(), ruleset.clone()),
            prepare: PrepareSheet::new(character_repo.clone(), ruleset.clone()),
            update_item_field: UpdateItemField::new(character_repo, ruleset),
        }
    }
}
