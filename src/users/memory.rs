use async_trait::async_trait;
use tokio::sync::RwLock;

use super::repo::{StoreError, UserStore};
use super::repo_types::{User, UserPatch};

/// Process-local store kept in insertion order.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "duplicate user id {}",
                user.id
            )));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update_fields(&self, id: &str, patch: &UserPatch) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        user.apply(patch.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let idx = users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        users.remove(idx);
        Ok(())
    }
}
