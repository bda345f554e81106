//! Currency conversion use case.
//!
//! Rolls loose coins up into the largest denominations after the user confirms.

mod error;

pub use error::CurrencyError;

use std::sync::Arc;

use sheetbldr_domain::{CharacterId, CurrencyChange, CurrencyConversionProposal};

use crate::infrastructure::ports::{CharacterRepo, ConfirmationPort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyOutcome {
    Converted(CurrencyChange),
    /// Coins were already consolidated
    NothingToConvert,
    Cancelled(CurrencyConversionProposal),
}

pub struct ConvertCurrency {
    character_repo: Arc<dyn CharacterRepo>,
    confirmation: Arc<dyn ConfirmationPort>,
}

impl ConvertCurrency {
    pub fn new(
        character_repo: Arc<dyn CharacterRepo>,
        confirmation: Arc<dyn ConfirmationPort>,
    ) -> Self {
        Self {
            character_repo,
            confirmation,
        }
    }

    pub async fn execute(&self, character_id: CharacterId) -> Result<CurrencyOutcome, CurrencyError> {
        let character = self
            .character_repo
            .get(character_id)
            .await?
            .ok_or(CurrencyError::CharacterNotFound(character_id))?;
        let Some(proposal) = character.propose_currency_conversion() else {
            return Ok(CurrencyOutcome::NothingToConvert);
        };

        if !self.confirmation.confirm_conversion(&proposal).await?.is_confirmed() {
            tracing::info!(character_id = %character_id, "Currency conversion cancelled");
            return Ok(CurrencyOutcome::Cancelled(proposal));
        }

        // Re-read: the proposal is checked against what is stored now.
        let mut character = self
            .character_repo
            .get(character_id)
            .await?
            .ok_or(CurrencyError::CharacterNotFound(character_id))?;
        let change = character.apply_currency_conversion(&proposal)?;
        self.character_repo.save(&character).await?;
        tracing::info!(
            character_id = %character_id,
            total_cp = proposal.to.total_copper(),
            "Currency converted"
        );
        Ok(CurrencyOutcome::Converted(change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryCharacterRepo;
    use crate::infrastructure::ports::{MockConfirmationPort, MockCharacterRepo, WorkflowOutcome};
    use crate::use_cases::test_support::character;
    use sheetbldr_domain::{Currency, DomainError};

    fn purse() -> Currency {
        Currency {
            cp: 1234,
            ..Currency::default()
        }
    }

    #[tokio::test]
    async fn confirmed_conversion_consolidates_coins() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let vistra = character().with_currency(purse());
        let id = vistra.id();
        repo.save(&vistra).await.unwrap();
        let mut confirmation = MockConfirmationPort::new();
        confirmation
            .expect_confirm_conversion()
            .withf(|proposal| proposal.to.pp == 1 && proposal.to.cp == 4)
            .times(1)
            .returning(|_| Ok(WorkflowOutcome::Confirmed));

        let outcome = ConvertCurrency::new(repo.clone(), Arc::new(confirmation))
            .execute(id)
            .await
            .unwrap();
        assert!(matches!(outcome, CurrencyOutcome::Converted(CurrencyChange::Converted { .. })));
        let stored = repo.get(id).await.unwrap().unwrap();
        let coins = stored.currency();
        assert_eq!((coins.pp, coins.gp, coins.ep, coins.sp, coins.cp), (1, 2, 0, 3, 4));
    }

    #[tokio::test]
    async fn cancelled_conversion_saves_nothing() {
        let vistra = character().with_currency(purse());
        let id = vistra.id();
        let mut repo = MockCharacterRepo::new();
        repo.expect_get().returning(move |_| Ok(Some(vistra.clone())));
        repo.expect_save().never();
        let mut confirmation = MockConfirmationPort::new();
        confirmation
            .expect_confirm_conversion()
            .returning(|_| Ok(WorkflowOutcome::Cancelled));

        let outcome = ConvertCurrency::new(Arc::new(repo), Arc::new(confirmation))
            .execute(id)
            .await
            .unwrap();
        assert!(matches!(outcome, CurrencyOutcome::Cancelled(p) if p.from == purse()));
    }

    #[tokio::test]
    async fn consolidated_purse_skips_confirmation() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let vistra = character();
        let id = vistra.id();
        repo.save(&vistra).await.unwrap();
        let mut confirmation = MockConfirmationPort::new();
        confirmation.expect_confirm_conversion().never();

        let outcome = ConvertCurrency::new(repo, Arc::new(confirmation))
            .execute(id)
            .await
            .unwrap();
        assert_eq!(outcome, CurrencyOutcome::NothingToConvert);
    }

    /// Confirms, but only after another edit has replaced the stored purse.
    struct RacingConfirmation {
        repo: Arc<InMemoryCharacterRepo>,
        racing: sheetbldr_domain::Character,
    }

    #[async_trait::async_trait]
    impl ConfirmationPort for RacingConfirmation {
        async fn confirm_conversion(
            &self,
            _proposal: &CurrencyConversionProposal,
        ) -> Result<WorkflowOutcome, crate::infrastructure::ports::WorkflowError> {
            self.repo.save(&self.racing).await.unwrap();
            Ok(WorkflowOutcome::Confirmed)
        }
    }

    #[tokio::test]
    async fn purse_changed_during_confirmation_is_rejected() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let vistra = character().with_currency(purse());
        let id = vistra.id();
        repo.save(&vistra).await.unwrap();
        let confirmation = RacingConfirmation {
            repo: repo.clone(),
            racing: vistra.clone().with_currency(Currency {
                cp: 7,
                ..Currency::default()
            }),
        };

        let err = ConvertCurrency::new(repo.clone(), Arc::new(confirmation))
            .execute(id)
            .await
            .unwrap_err();
        assert!(matches!(err, CurrencyError::Domain(DomainError::Constraint(_))));
        assert_eq!(repo.get(id).await.unwrap().unwrap().currency().cp, 7);
    }
}
