//! Workflow adapter for runs with nobody to ask.
//!
//! Level changes that need build choices and anything that needs a
//! confirmation are cancelled, which leaves the character as it was.

use async_trait::async_trait;
use sheetbldr_domain::{CurrencyConversionProposal, LevelChangeProposal};

use super::ports::{AdvancementWorkflow, ConfirmationPort, WorkflowError, WorkflowOutcome};

#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessWorkflow;

#[async_trait]
impl AdvancementWorkflow for HeadlessWorkflow {
    async fn steps_required(&self, _proposal: &LevelChangeProposal) -> Result<bool, WorkflowError> {
        Ok(false)
    }

    async fn run(&self, proposal: &LevelChangeProposal) -> Result<WorkflowOutcome, WorkflowError> {
        tracing::debug!(item_id = %proposal.item_id, "No interactive advancement; cancelling");
        Ok(WorkflowOutcome::Cancelled)
    }
}

#[async_trait]
impl ConfirmationPort for HeadlessWorkflow {
    async fn confirm_conversion(
        &self,
        _proposal: &CurrencyConversionProposal,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        Ok(WorkflowOutcome::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetbldr_domain::{Currency, ItemId};

    #[tokio::test]
    async fn cancels_everything_it_is_asked() {
        let level = LevelChangeProposal {
            item_id: ItemId::new(),
            from: 5,
            to: 4,
        };
        assert!(!HeadlessWorkflow.steps_required(&level).await.unwrap());
        assert_eq!(HeadlessWorkflow.run(&level).await.unwrap(), WorkflowOutcome::Cancelled);

        let coins = CurrencyConversionProposal {
            from: Currency::default(),
            to: Currency::default(),
        };
        assert_eq!(
            HeadlessWorkflow.confirm_conversion(&coins).await.unwrap(),
            WorkflowOutcome::Cancelled
        );
    }
}
