//! Currency conversion errors.

use crate::infrastructure::ports::{RepoError, WorkflowError};
use sheetbldr_domain::{CharacterId, DomainError};

#[derive(Debug, thiserror::Error)]
pub enum CurrencyError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("Confirmation error: {0}")]
    Confirmation(#[from] WorkflowError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
