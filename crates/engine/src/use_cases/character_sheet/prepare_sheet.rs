//! Prepare sheet use case.
//!
//! Builds the display view of a stored character.

use std::sync::Arc;

use sheetbldr_domain::{prepare, CharacterId, CharacterSheetView, FilterSet};

use crate::infrastructure::ports::CharacterRepo;
use crate::use_cases::Ruleset;

use super::error::CharacterSheetError;

pub struct PrepareSheet {
    character_repo: Arc<dyn CharacterRepo>,
    ruleset: Arc<Ruleset>,
}

impl PrepareSheet {
    pub fn new(character_repo: Arc<dyn CharacterRepo>, ruleset: Arc<Ruleset>) -> Self {
        Self {
            character_repo,
            ruleset,
        }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
        filters: &FilterSet,
    ) -> Result<CharacterSheetView, CharacterSheetError> {
        let character = self
            .character_repo
            .get(character_id)
            .await?
            .ok_or(CharacterSheetError::CharacterNotFound(character_id))?;

        let view = prepare(&character, self.ruleset.resolver(), filters);
        for warning in &view.warnings {
            tracing::warn!(character_id = %character_id, "{}", warning);
        }
        tracing::debug!(
            character_id = %character_id,
            level = view.labels.level,
            items = view.all_items().count(),
            "Prepared character sheet"
        );
        Ok(view)
    }
}
