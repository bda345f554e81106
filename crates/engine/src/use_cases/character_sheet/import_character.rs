//! Import character use case.
//!
//! Migrates a stored snapshot of any vintage and stores the resulting character.

use std::sync::Arc;

use sheetbldr_domain::{CharacterId, CharacterSnapshot, ItemDiagnostic};

use crate::infrastructure::ports::CharacterRepo;
use crate::use_cases::Ruleset;

use super::error::CharacterSheetError;

/// What an import produced besides the stored character.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub character_id: CharacterId,
    pub items_imported: usize,
    /// Values replaced during migration
    pub diagnostics: Vec<ItemDiagnostic>,
    /// Items that were skipped, and why
    pub warnings: Vec<String>,
}

pub struct ImportCharacter {
    character_repo: Arc<dyn CharacterRepo>,
    ruleset: Arc<Ruleset>,
}

impl ImportCharacter {
    pub fn new(character_repo: Arc<dyn CharacterRepo>, ruleset: Arc<Ruleset>) -> Self {
        Self {
            character_repo,
            ruleset,
        }
    }

    pub async fn execute(
        &self,
        snapshot: CharacterSnapshot,
    ) -> Result<ImportResult, CharacterSheetError> {
        let item_count = snapshot.items.len();
        let imported = snapshot.import(self.ruleset.registry(), self.ruleset.rules())?;
        let character = imported.character;

        for diagnostic in &imported.diagnostics {
            tracing::debug!(
                character_id = %character.id(),
                item_id = %diagnostic.item_id,
                field = %diagnostic.diagnostic.field,
                "{}",
                diagnostic.diagnostic.message
            );
        }
        for warning in &imported.warnings {
            tracing::warn!(character_id = %character.id(), "{}", warning);
        }

        self.character_repo.save(&character).await?;
        tracing::info!(
            character_id = %character.id(),
            items = character.items().len(),
            skipped = item_count - character.items().len(),
            "Imported character"
        );

        Ok(ImportResult {
            character_id: character.id(),
            items_imported: character.items().len(),
            diagnostics: imported.diagnostics,
            warnings: imported.warnings,
        })
    }
}
