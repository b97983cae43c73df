//! Name -> credential lookup for the surrounding service layer.
//!
//! Issues an opaque bearer string on a credential match. Tokens are never
//! verified, and the detection engine never sees them.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::DefenseError;
use crate::core::hash::{credential_digest, digest_eq};

pub const DEFAULT_ROLE: &str = "Analyst";
const LOGIN_FAILED: &str = "Incorrect username or password";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSeed {
    pub username: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

#[derive(Debug, Clone)]
struct UserRecord {
    digest: String,
    role: String,
    email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub role: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub user_profile: UserProfile,
}

pub struct IdentityStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl IdentityStore {
    pub fn new(seeds: &[UserSeed]) -> Self {
        let users = seeds
            .iter()
            .map(|s| {
                (
                    s.username.clone(),
                    UserRecord {
                        digest: credential_digest(&s.username, &s.password),
                        role: s.role.clone(),
                        email: None,
                    },
                )
            })
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<Session, DefenseError> {
        let users = self.users.read();
        let user = users
            .get(username)
            .ok_or_else(|| DefenseError::Auth(LOGIN_FAILED.to_string()))?;
        if !digest_eq(&user.digest, &credential_digest(username, password)) {
            return Err(DefenseError::Auth(LOGIN_FAILED.to_string()));
        }
        tracing::debug!(username, "login accepted");
        Ok(Session {
            access_token: format!("cd-{}", Uuid::new_v4().simple()),
            token_type: "bearer".to_string(),
            user_profile: UserProfile {
                name: username.to_uppercase(),
                role: user.role.clone(),
                avatar: String::new(),
            },
        })
    }

    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<(), DefenseError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(DefenseError::Validation(
                "username and password are required".to_string(),
            ));
        }
        let mut users = self.users.write();
        if users.contains_key(username) {
            return Err(DefenseError::UserExists(username.to_string()));
        }
        users.insert(
            username.to_string(),
            UserRecord {
                digest: credential_digest(username, password),
                role: role.unwrap_or(DEFAULT_ROLE).to_string(),
                email: Some(email.to_string()),
            },
        );
        Ok(())
    }

    pub fn email_of(&self, username: &str) -> Option<String> {
        self.users.read().get(username).and_then(|u| u.email.clone())
    }
}

pub fn default_users() -> Vec<UserSeed> {
    vec![
        UserSeed {
            username: "admin".to_string(),
            password: "password123".to_string(),
            role: "Senior Architect".to_string(),
        },
        UserSeed {
            username: "analyst".to_string(),
            password: "securepass".to_string(),
            role: "SecOps Analyst".to_string(),
        },
    ]
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_admin_can_log_in() {
        let store = IdentityStore::new(&default_users());
        let session = store.login("admin", "password123").unwrap();
        assert_eq!(session.token_type, "bearer");
        assert_eq!(session.user_profile.name, "ADMIN");
        assert_eq!(session.user_profile.role, "Senior Architect");
        assert!(!session.access_token.is_empty());
    }

    #[test]
    fn wrong_password_and_unknown_user_look_the_same() {
        let store = IdentityStore::new(&default_users());
        let a = store.login("admin", "nope").unwrap_err().to_string();
        let b = store.login("ghost", "nope").unwrap_err().to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn register_rejects_duplicates_and_defaults_role() {
        let store = IdentityStore::new(&default_users());
        assert!(matches!(
            store.register("admin", "a@x.io", "pw", None),
            Err(DefenseError::UserExists(_))
        ));
        store.register("carol", "carol@x.io", "pw", None).unwrap();
        let session = store.login("carol", "pw").unwrap();
        assert_eq!(session.user_profile.role, "Analyst");
        assert_eq!(store.email_of("carol").as_deref(), Some("carol@x.io"));
    }
}
