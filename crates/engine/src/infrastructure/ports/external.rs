//! External workflow ports.
//!
//! The core proposes a change and hands it to one of these. Whatever the
//! workflow reports, a cancellation leaves the character exactly as it was.

use async_trait::async_trait;
use sheetbldr_domain::{CurrencyConversionProposal, LevelChangeProposal};

use super::error::WorkflowError;

/// How an external workflow finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Confirmed,
    Cancelled,
}

impl WorkflowOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

// =============================================================================
// Advancement Port
// =============================================================================

/// Resolves the build choices a class-level change brings with it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdvancementWorkflow: Send + Sync {
    /// Whether the change needs any build-choice steps before it can apply.
    async fn steps_required(&self, proposal: &LevelChangeProposal) -> Result<bool, WorkflowError>;

    /// Walk the user through the steps.
    async fn run(&self, proposal: &LevelChangeProposal) -> Result<WorkflowOutcome, WorkflowError>;
}

// =============================================================================
// Confirmation Port
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    async fn confirm_conversion(
        &self,
        proposal: &CurrencyConversionProposal,
    ) -> Result<WorkflowOutcome, WorkflowError>;
}
