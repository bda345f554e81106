//! Update item field use case.
//!
//! Applies one strictly validated edit to an owned item. Fields owned by a
//! linked resource are refused; the edit has to go through the resource.

use std::sync::Arc;

use serde_json::Value;
use sheetbldr_domain::{CharacterId, ItemFieldChange, ItemId};

use crate::infrastructure::ports::CharacterRepo;
use crate::use_cases::Ruleset;

use super::error::CharacterSheetError;

pub struct UpdateItemField {
    character_repo: Arc<dyn CharacterRepo>,
    ruleset: Arc<Ruleset>,
}

impl UpdateItemField {
    pub fn new(character_repo: Arc<dyn CharacterRepo>, ruleset: Arc<Ruleset>) -> Self {
        Self {
            character_repo,
            ruleset,
        }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
        field: &str,
        value: Value,
    ) -> Result<ItemFieldChange, CharacterSheetError> {
        let mut character = self
            .character_repo
            .get(character_id)
            .await?
            .ok_or(CharacterSheetError::CharacterNotFound(character_id))?;

        let change = character.update_item_field(
            item_id,
            field,
            &value,
            self.ruleset.registry(),
            self.ruleset.rules(),
        )?;

        if let ItemFieldChange::Changed { from, to, .. } = &change {
            self.character_repo.save(&character).await?;
            tracing::info!(
                character_id = %character_id,
                item_id = %item_id,
                field = %field,
                from = ?from,
                to = %to,
                "Updated item field"
            );
        }
        Ok(change)
    }
}
