use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use gerbang_models::{AccountStatus, ParseEnumError, User};
use uuid::Uuid;

/// Error type for user directory operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt user record: {0}")]
    Corrupt(#[from] ParseEnumError),
}

/// Source of truth for accounts.
///
/// Authentication reads through it on every request, so a status change is
/// picked up by the very next request of that user.
#[async_trait]
pub trait UserDirectory: Debug + Send + Sync + 'static {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryError>;

    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError>;

    /// All accounts ordered by name.
    async fn list(&self) -> Result<Vec<User>, DirectoryError>;

    /// Change an account's status. Returns the updated account, or `None`
    /// when no account has that id.
    async fn set_status(
        &self,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<Option<User>, DirectoryError>;
}

/// Accounts kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserDirectory {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an account.
    pub fn insert(&self, user: User) {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user.id, user);
    }

    /// Delete an account, returning it if it existed.
    pub fn remove(&self, id: Uuid) -> Option<User> {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryError> {
        Ok(self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DirectoryError> {
        let mut users: Vec<User> = self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.email.cmp(&b.email)));
        Ok(users)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<Option<User>, DirectoryError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        Ok(users.get_mut(&id).map(|user| {
            user.status = status;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gerbang_models::UserRole;

    fn user(name: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::User,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_find_by_email_ignores_case() {
        let directory = MemoryUserDirectory::new();
        let budi = user("Budi", "budi@example.com");
        directory.insert(budi.clone());

        let found = directory.find_by_email("BUDI@example.com").await.unwrap();
        assert_eq!(found, Some(budi));
        assert!(directory.find_by_email("siti@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() {
        let directory = MemoryUserDirectory::new();
        directory.insert(user("Siti", "siti@example.com"));
        directory.insert(user("Agus", "agus@example.com"));

        let names: Vec<String> = directory
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Agus", "Siti"]);
    }

    #[tokio::test]
    async fn test_set_status() {
        let directory = MemoryUserDirectory::new();
        let budi = user("Budi", "budi@example.com");
        directory.insert(budi.clone());

        let updated = directory
            .set_status(budi.id, AccountStatus::Suspended)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, AccountStatus::Suspended);

        let stored = directory.find_by_id(budi.id).await.unwrap().unwrap();
        assert_eq!(stored.status, AccountStatus::Suspended);

        assert!(directory
            .set_status(Uuid::new_v4(), AccountStatus::Active)
            .await
            .unwrap()
            .is_none());
    }
}
