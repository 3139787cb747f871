//! User records and the store contract

use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: '{other}'")),
        }
    }
}

/// Stored user record
///
/// `password` holds a salted digest, never the clear text. It is `None`
/// for accounts provisioned through a federated provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Copy without the password digest, for handing to callers
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            password: None,
            ..self.clone()
        }
    }
}

/// Lookup key for an email: trimmed and lowercased
#[must_use]
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User persistence used by the auth flows
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by email, compared case-insensitively
    async fn find_one_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert a new user
    ///
    /// # Errors
    /// `StoreError::DuplicateEmail` when the email is already taken.
    async fn create(&self, user: User) -> Result<User, StoreError>;
}

/// Process-local store keyed by normalized email
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<String, User>,
}

impl InMemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_one_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&email_key(email)).map(|u| u.value().clone()))
    }

    async fn create(&self, mut user: User) -> Result<User, StoreError> {
        user.email = user.email.trim().to_string();
        match self.users.entry(email_key(&user.email)) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail(user.email)),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                tracing::debug!(email = %user.email, role = %user.role, "user created");
                Ok(user)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User {
            email: email.into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            password: Some("digest".into()),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn emails_are_case_insensitive() {
        let store = InMemoryUserStore::new();
        store.create(user("Ada@Example.com")).await.unwrap();

        let found = store.find_one_by_email(" ada@example.COM ").await.unwrap();
        assert_eq!(found.map(|u| u.email), Some("Ada@Example.com".to_string()));

        let err = store.create(user("ADA@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_user_is_none() {
        let store = InMemoryUserStore::new();
        assert!(store.find_one_by_email("nobody@x.io").await.unwrap().is_none());
    }

    #[test]
    fn serializes_camel_case_without_password() {
        let json = serde_json::to_value(user("a@b.c").redacted()).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["role"], "user");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn role_defaults_to_user() {
        let parsed: User = serde_json::from_str(
            r#"{"email":"a@b.c","firstName":"A","lastName":"B"}"#,
        )
        .unwrap();
        assert_eq!(parsed.role, Role::User);
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
    }
}
