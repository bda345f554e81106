//! Class advancement use case.
//!
//! A level change is proposed first. When the advancement workflow reports
//! build-choice steps, or the change is a level-down, the workflow runs and the
//! change applies only if it is confirmed. The character is re-read after the
//! workflow returns so a concurrent edit is caught instead of overwritten.

mod error;

pub use error::AdvancementError;

use std::sync::Arc;

use sheetbldr_domain::{CharacterId, ItemId, LevelChange, LevelChangeProposal};

use crate::infrastructure::ports::{AdvancementWorkflow, CharacterRepo, WorkflowOutcome};

use super::Ruleset;

/// How a requested level change ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassLevelOutcome {
    Applied(LevelChange),
    /// The workflow was cancelled; nothing changed
    Cancelled(LevelChangeProposal),
}

pub struct ChangeClassLevel {
    character_repo: Arc<dyn CharacterRepo>,
    workflow: Arc<dyn AdvancementWorkflow>,
    ruleset: Arc<Ruleset>,
}

impl ChangeClassLevel {
    pub fn new(
        character_repo: Arc<dyn CharacterRepo>,
        workflow: Arc<dyn AdvancementWorkflow>,
        ruleset: Arc<Ruleset>,
    ) -> Self {
        Self {
            character_repo,
            workflow,
            ruleset,
        }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
        class_id: ItemId,
        target_level: u8,
    ) -> Result<ClassLevelOutcome, AdvancementError> {
        let rules = self.ruleset.rules();
        let character = self
            .character_repo
            .get(character_id)
            .await?
            .ok_or(AdvancementError::CharacterNotFound(character_id))?;
        let proposal = character.propose_class_level(class_id, target_level, rules)?;

        let needs_workflow =
            proposal.is_level_down() || self.workflow.steps_required(&proposal).await?;
        if needs_workflow {
            tracing::debug!(
                character_id = %character_id,
                item_id = %class_id,
                delta = proposal.delta(),
                "Running advancement workflow"
            );
            if self.workflow.run(&proposal).await? == WorkflowOutcome::Cancelled {
                tracing::info!(character_id = %character_id, item_id = %class_id, "Level change cancelled");
                return Ok(ClassLevelOutcome::Cancelled(proposal));
            }
        }

        let mut character = self
            .character_repo
            .get(character_id)
            .await?
            .ok_or(AdvancementError::CharacterNotFound(character_id))?;
        let change = character.apply_level_change(&proposal, rules)?;
        self.character_repo.save(&character).await?;
        tracing::info!(
            character_id = %character_id,
            item_id = %class_id,
            from = proposal.from,
            to = proposal.to,
            "Class level changed"
        );
        Ok(ClassLevelOutcome::Applied(change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryCharacterRepo;
    use crate::infrastructure::ports::{MockAdvancementWorkflow, MockCharacterRepo};
    use crate::use_cases::test_support::{character, give, ruleset};
    use serde_json::json;
    use sheetbldr_domain::aggregates::class_levels;
    use sheetbldr_domain::{DomainError, ItemKind};

    async fn stored_fighter(levels: u8) -> (Arc<InMemoryCharacterRepo>, CharacterId, ItemId, Arc<Ruleset>) {
        let ruleset = ruleset();
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let mut vistra = character();
        let fighter = give(&mut vistra, &ruleset, ItemKind::Class, "Fighter", json!({"levels": levels}));
        repo.save(&vistra).await.unwrap();
        (repo, vistra.id(), fighter, ruleset)
    }

    async fn levels(repo: &InMemoryCharacterRepo, id: CharacterId, class: ItemId) -> u8 {
        let character = repo.get(id).await.unwrap().unwrap();
        class_levels(character.item(class).unwrap())
    }

    #[tokio::test]
    async fn level_up_without_steps_applies_directly() {
        let (repo, id, fighter, ruleset) = stored_fighter(3).await;
        let mut workflow = MockAdvancementWorkflow::new();
        workflow.expect_steps_required().returning(|_| Ok(false));
        workflow.expect_run().never();

        let outcome = ChangeClassLevel::new(repo.clone(), Arc::new(workflow), ruleset)
            .execute(id, fighter, 4)
            .await
            .unwrap();
        assert!(matches!(outcome, ClassLevelOutcome::Applied(_)));
        assert_eq!(levels(&repo, id, fighter).await, 4);
    }

    #[tokio::test]
    async fn cancelled_workflow_leaves_character_untouched() {
        let (repo, id, fighter, ruleset) = stored_fighter(5).await;
        let before = repo.get(id).await.unwrap();
        let mut workflow = MockAdvancementWorkflow::new();
        workflow
            .expect_run()
            .withf(|proposal| proposal.is_level_down() && proposal.delta() == -3)
            .times(1)
            .returning(|_| Ok(WorkflowOutcome::Cancelled));

        let outcome = ChangeClassLevel::new(repo.clone(), Arc::new(workflow), ruleset)
            .execute(id, fighter, 2)
            .await
            .unwrap();
        assert!(matches!(outcome, ClassLevelOutcome::Cancelled(p) if p.to == 2));
        assert_eq!(repo.get(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn confirmed_workflow_applies_change() {
        let (repo, id, fighter, ruleset) = stored_fighter(2).await;
        let mut workflow = MockAdvancementWorkflow::new();
        workflow.expect_steps_required().returning(|_| Ok(true));
        workflow.expect_run().returning(|_| Ok(WorkflowOutcome::Confirmed));

        ChangeClassLevel::new(repo.clone(), Arc::new(workflow), ruleset)
            .execute(id, fighter, 3)
            .await
            .unwrap();
        assert_eq!(levels(&repo, id, fighter).await, 3);
    }

    #[tokio::test]
    async fn exceeding_max_level_is_rejected_before_the_workflow() {
        let (repo, id, fighter, ruleset) = stored_fighter(19).await;
        let mut workflow = MockAdvancementWorkflow::new();
        workflow.expect_steps_required().never();
        workflow.expect_run().never();

        let err = ChangeClassLevel::new(repo, Arc::new(workflow), ruleset)
            .execute(id, fighter, 21)
            .await
            .unwrap_err();
        assert!(matches!(err, AdvancementError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn workflow_failure_is_reported() {
        let ruleset = ruleset();
        let mut vistra = character();
        let fighter = give(&mut vistra, &ruleset, ItemKind::Class, "Fighter", json!({"levels": 1}));
        let id = vistra.id();
        let mut repo = MockCharacterRepo::new();
        repo.expect_get().returning(move |_| Ok(Some(vistra.clone())));
        repo.expect_save().never();
        let mut workflow = MockAdvancementWorkflow::new();
        workflow
            .expect_steps_required()
            .returning(|_| Err(crate::infrastructure::ports::WorkflowError::Unavailable("offline".into())));

        let err = ChangeClassLevel::new(Arc::new(repo), Arc::new(workflow), ruleset)
            .execute(id, fighter, 2)
            .await
            .unwrap_err();
        assert!(matches!(err, AdvancementError::Workflow(_)));
    }
}
