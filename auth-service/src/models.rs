//! User records served by the credential store.

use serde::{Deserialize, Serialize};

/// A stored user: unique username, opaque password and role labels.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_json_without_roles() {
        let user: User = serde_json::from_str(r#"{"username":"carol","password":"pw"}"#).unwrap();
        assert_eq!(user.username, "carol");
        assert!(user.roles.is_empty());
    }

    #[test]
    fn test_debug_hides_password() {
        let user = User::new("alice", "wonderland", ["admin"]);
        assert!(!format!("{:?}", user).contains("wonderland"));
    }
}
