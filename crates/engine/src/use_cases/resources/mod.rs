//! Resource use cases.
//!
//! Add, remove, edit, and link a character's named pools. Every operation
//! loads the character, applies one aggregate mutation, and saves only when
//! something changed.

mod error;

pub use error::ResourceError;

use std::sync::Arc;

use sheetbldr_domain::{Character, CharacterId, ItemId, Resource, ResourceChange, ResourcePatch};

use crate::infrastructure::ports::CharacterRepo;

use super::Ruleset;

// =============================================================================
// Shared Helpers
// =============================================================================

async fn load(repo: &dyn CharacterRepo, id: CharacterId) -> Result<Character, ResourceError> {
    repo.get(id)
        .await?
        .ok_or(ResourceError::CharacterNotFound(id))
}

async fn commit(
    repo: &dyn CharacterRepo,
    character: &Character,
    change: &ResourceChange,
) -> Result<(), ResourceError> {
    if matches!(change, ResourceChange::Unchanged { .. }) {
        return Ok(());
    }
    repo.save(character).await?;
    tracing::info!(character_id = %character.id(), change = ?change, "Resource changed");
    Ok(())
}

// =============================================================================
// Use Cases
// =============================================================================

pub struct AddResource {
    character_repo: Arc<dyn CharacterRepo>,
}

impl AddResource {
    pub fn new(character_repo: Arc<dyn CharacterRepo>) -> Self {
        Self { character_repo }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
        resource: Resource,
    ) -> Result<ResourceChange, ResourceError> {
        let mut character = load(self.character_repo.as_ref(), character_id).await?;
        let change = character.add_resource(resource)?;
        commit(self.character_repo.as_ref(), &character, &change).await?;
        Ok(change)
    }
}

/// Remove a user-created resource; built-in resources are refused.
pub struct RemoveResource {
    character_repo: Arc<dyn CharacterRepo>,
}

impl RemoveResource {
    pub fn new(character_repo: Arc<dyn CharacterRepo>) -> Self {
        Self { character_repo }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
        resource_id: &str,
    ) -> Result<ResourceChange, ResourceError> {
        let mut character = load(self.character_repo.as_ref(), character_id).await?;
        let change = character.remove_resource(resource_id)?;
        commit(self.character_repo.as_ref(), &character, &change).await?;
        Ok(change)
    }
}

/// Partial edit; a linked resource accepts value edits only and writes them
/// through to its item.
pub struct UpdateResource {
    character_repo: Arc<dyn CharacterRepo>,
    ruleset: Arc<Ruleset>,
}

impl UpdateResource {
    pub fn new(character_repo: Arc<dyn CharacterRepo>, ruleset: Arc<Ruleset>) -> Self {
        Self {
            character_repo,
            ruleset,
        }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
        resource_id: &str,
        patch: ResourcePatch,
    ) -> Result<ResourceChange, ResourceError> {
        let mut character = load(self.character_repo.as_ref(), character_id).await?;
        let change = character.update_resource(resource_id, patch, self.ruleset.registry())?;
        commit(self.character_repo.as_ref(), &character, &change).await?;
        Ok(change)
    }
}

/// Link a resource to an owned item, or unlink it with `None`.
pub struct LinkResource {
    character_repo: Arc<dyn CharacterRepo>,
}

impl LinkResource {
    pub fn new(character_repo: Arc<dyn CharacterRepo>) -> Self {
        Self { character_repo }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
        resource_id: &str,
        item_id: Option<ItemId>,
    ) -> Result<ResourceChange, ResourceError> {
        let mut character = load(self.character_repo.as_ref(), character_id).await?;
        let change = match item_id {
            Some(item_id) => character.link_resource(resource_id, item_id)?,
            None => character.unlink_resource(resource_id)?,
        };
        commit(self.character_repo.as_ref(), &character, &change).await?;
        Ok(change)
    }
}

/// Container for resource use cases.
pub struct ResourceUseCases {
    pub add: AddResource,
    pub remove: RemoveResource,
    pub update: UpdateResource,
    pub link: LinkResource,
}

impl ResourceUseCases {
    pub fn new(character_repo: Arc<dyn CharacterRepo>, ruleset: Arc<Ruleset>) -> Self {
        Self {
            add: AddResource::new(character_repo.clone()),
            remove: RemoveResource::new(character_repo.clone()),
            update: UpdateResource::new(character_repo.clone(), ruleset),
            link: LinkResource::new(character_repo),
        }
    }
}
