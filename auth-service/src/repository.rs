//! Credential store
//!
//! Lookup-by-username access to user records.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use error::RepositoryError;

use crate::models::User;

/// Read access to user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by username
    async fn find_user(&self, username: &str) -> Result<Option<User>, RepositoryError>;
}

/// In-memory repository for development and testing
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list of users. Usernames must be unique.
    pub fn from_users(users: impl IntoIterator<Item = User>) -> Result<Self, RepositoryError> {
        let mut map = HashMap::new();
        for user in users {
            if map.contains_key(&user.username) {
                return Err(RepositoryError::DuplicateUser(user.username));
            }
            map.insert(user.username.clone(), user);
        }
        Ok(Self {
            users: RwLock::new(map),
        })
    }

    /// Load users from a JSON array of `{username, password, roles}` objects.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RepositoryError::Load(format!("{}: {}", path.display(), e)))?;
        let users: Vec<User> = serde_json::from_str(&contents)
            .map_err(|e| RepositoryError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_users(users)
    }

    /// Insert or replace a user
    pub fn insert(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        users.insert(user.username.clone(), user);
        Ok(())
    }

    /// Remove a user, returning the removed record
    pub fn remove(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        Ok(users.remove(username))
    }

    pub fn len(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_user(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(username).cloned())
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("user table lock poisoned".to_string())
}
