//! In-memory character store.

use std::collections::HashMap;

use async_trait::async_trait;
use sheetbldr_domain::{Character, CharacterId};
use tokio::sync::RwLock;

use super::ports::{CharacterRepo, RepoError};

/// Process-local [`CharacterRepo`]; contents are lost on exit.
#[derive(Default)]
pub struct InMemoryCharacterRepo {
    characters: RwLock<HashMap<CharacterId, Character>>,
}

impl InMemoryCharacterRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.characters.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.characters.read().await.is_empty()
    }
}

#[async_trait]
impl CharacterRepo for InMemoryCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.characters.read().await.get(&id).cloned())
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.characters
            .write()
            .await
            .insert(character.id(), character.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetbldr_domain::{CharacterKind, CharacterName};

    fn character(name: &str) -> Character {
        Character::new(CharacterName::new(name).unwrap(), CharacterKind::Player)
    }

    #[tokio::test]
    async fn save_then_get() {
        let repo = InMemoryCharacterRepo::new();
        let vistra = character("Vistra");
        repo.save(&vistra).await.unwrap();
        assert_eq!(repo.get(vistra.id()).await.unwrap(), Some(vistra));
    }

    #[tokio::test]
    async fn get_returns_none_for_missing() {
        let repo = InMemoryCharacterRepo::new();
        assert!(repo.is_empty().await);
        assert_eq!(repo.get(CharacterId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_replaces_existing() {
        let repo = InMemoryCharacterRepo::new();
        let vistra = character("Vistra");
        repo.save(&vistra).await.unwrap();
        let updated = vistra.clone().with_experience(900);
        repo.save(&updated).await.unwrap();
        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.get(vistra.id()).await.unwrap().unwrap().experience(), 900);
    }
}
