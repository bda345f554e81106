//! Class advancement errors.

use crate::infrastructure::ports::{RepoError, WorkflowError};
use sheetbldr_domain::{CharacterId, DomainError};

/// Errors that can occur while changing class levels.
#[derive(Debug, thiserror::Error)]
pub enum AdvancementError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("Advancement workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
