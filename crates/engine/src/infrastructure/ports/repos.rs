//! Repository port traits.

use async_trait::async_trait;
use sheetbldr_domain::{Character, CharacterId};

use super::error::RepoError;

// =============================================================================
// Character Port
// =============================================================================

/// Commits accepted character changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
}
