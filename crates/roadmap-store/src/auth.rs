//! Credential and federated sign-in

use crate::error::{AuthError, StoreError};
use crate::user::{Role, User, UserStore};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::fmt;
use std::sync::Arc;

const SALT_BYTES: usize = 16;

/// Credential sign-in request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Registration request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: Role,
}

/// Identity asserted by an external provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedProfile {
    pub provider: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Signs users in against a [`UserStore`]
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn UserStore>,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}

impl Authenticator {
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Create a password account
    ///
    /// # Errors
    /// `InvalidInput` for a malformed email or empty password;
    /// `Store(DuplicateEmail)` when the email is taken.
    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        let email = registration.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidInput("email"));
        }
        if registration.password.is_empty() {
            return Err(AuthError::InvalidInput("password"));
        }

        let user = User {
            email: email.to_string(),
            first_name: registration.first_name,
            last_name: registration.last_name,
            password: Some(hash_password(&registration.password)?),
            role: registration.role,
        };
        let created = self.store.create(user).await?;
        tracing::info!(email = %created.email, role = %created.role, "user registered");
        Ok(created.redacted())
    }

    /// Sign in with email, password and the role the user signs in as
    ///
    /// # Errors
    /// `InvalidCredentials` for every mismatch, without saying which.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let Some(user) = self.store.find_one_by_email(&credentials.email).await? else {
            tracing::debug!("sign-in for unknown email");
            return Err(AuthError::InvalidCredentials);
        };
        let Some(stored) = user.password.as_deref() else {
            tracing::debug!(email = %user.email, "password sign-in for federated account");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(&credentials.password, stored)
            .ok_or_else(|| AuthError::CorruptDigest(user.email.clone()))?
        {
            tracing::debug!(email = %user.email, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }
        if user.role != credentials.role {
            tracing::debug!(email = %user.email, "role mismatch");
            return Err(AuthError::InvalidCredentials);
        }
        tracing::info!(email = %user.email, "signed in");
        Ok(user.redacted())
    }

    /// Sign in through an external provider, provisioning on first login
    ///
    /// First-time users are created with `role = user` and no password.
    ///
    /// # Errors
    /// Store failures other than a lost creation race.
    pub async fn sign_in_federated(&self, profile: FederatedProfile) -> Result<User, AuthError> {
        if let Some(user) = self.store.find_one_by_email(&profile.email).await? {
            return Ok(user.redacted());
        }

        let user = User {
            email: profile.email.trim().to_string(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            password: None,
            role: Role::User,
        };
        match self.store.create(user).await {
            Ok(created) => {
                tracing::info!(
                    email = %created.email,
                    provider = %profile.provider,
                    "provisioned federated user"
                );
                Ok(created.redacted())
            }
            Err(StoreError::DuplicateEmail(_)) => self
                .store
                .find_one_by_email(&profile.email)
                .await?
                .map(|u| u.redacted())
                .ok_or(AuthError::InvalidCredentials),
            Err(err) => Err(err.into()),
        }
    }
}

/// Argon2id hash of `password` as a PHC string (`$argon2id$v=19$...`)
///
/// # Errors
/// `Hashing` when the hasher rejects its input.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt: [u8; SALT_BYTES] = rand::random();
    let salt = SaltString::encode_b64(&salt).map_err(|err| AuthError::Hashing(err.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hashing(err.to_string()))
}

/// Check `password` against a stored PHC string; `None` when it does not parse
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> Option<bool> {
    let parsed = PasswordHash::new(stored).ok()?;
    Some(
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::InMemoryUserStore;
    use pretty_assertions::assert_eq;

    fn auth() -> (Arc<InMemoryUserStore>, Authenticator) {
        let store = Arc::new(InMemoryUserStore::new());
        let auth = Authenticator::new(store.clone());
        (store, auth)
    }

    fn registration(email: &str, role: Role) -> Registration {
        Registration {
            email: email.into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            password: "cobol-1959".into(),
            role,
        }
    }

    fn credentials(email: &str, password: &str, role: Role) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
            role,
        }
    }

    #[test]
    fn hashes_are_salted_argon2id() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"), "{a}");
        assert_eq!(verify_password("secret", &a), Some(true));
        assert_eq!(verify_password("Secret", &a), Some(false));
        assert_eq!(verify_password("secret", &b), Some(true));
    }

    #[test]
    fn unparseable_hashes_are_reported() {
        assert_eq!(verify_password("secret", "md5$00$00"), None);
        assert_eq!(verify_password("secret", "sha256$zz$00"), None);
        assert_eq!(verify_password("secret", ""), None);
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_not_a_credential_mismatch() {
        let (store, auth) = auth();
        store
            .create(User {
                email: "ada@engine.org".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                password: Some("not a phc string".into()),
                role: Role::User,
            })
            .await
            .unwrap();

        let err = auth
            .sign_in(&credentials("ada@engine.org", "anything", Role::User))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::CorruptDigest("ada@engine.org".into()));
    }

    #[tokio::test]
    async fn register_then_sign_in() {
        let (store, auth) = auth();
        let user = auth
            .register(registration("grace@navy.mil", Role::Admin))
            .await
            .unwrap();
        assert!(user.password.is_none());

        let stored = store.find_one_by_email("grace@navy.mil").await.unwrap().unwrap();
        assert_ne!(stored.password.as_deref(), Some("cobol-1959"));

        let signed_in = auth
            .sign_in(&credentials("GRACE@navy.mil", "cobol-1959", Role::Admin))
            .await
            .unwrap();
        assert_eq!(signed_in.email, "grace@navy.mil");
        assert_eq!(signed_in.role, Role::Admin);
    }

    #[tokio::test]
    async fn mismatches_are_indistinguishable() {
        let (_, auth) = auth();
        auth.register(registration("grace@navy.mil", Role::User))
            .await
            .unwrap();

        for creds in [
            credentials("grace@navy.mil", "wrong", Role::User),
            credentials("grace@navy.mil", "cobol-1959", Role::Admin),
            credentials("nobody@navy.mil", "cobol-1959", Role::User),
        ] {
            assert_eq!(auth.sign_in(&creds).await, Err(AuthError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn register_rejects_bad_input() {
        let (_, auth) = auth();
        let mut bad_email = registration("not-an-email", Role::User);
        assert_eq!(
            auth.register(bad_email.clone()).await,
            Err(AuthError::InvalidInput("email"))
        );
        bad_email.email = "ok@x.io".into();
        bad_email.password.clear();
        assert_eq!(
            auth.register(bad_email).await,
            Err(AuthError::InvalidInput("password"))
        );
    }

    #[tokio::test]
    async fn duplicate_registration_fails() {
        let (_, auth) = auth();
        auth.register(registration("a@x.io", Role::User)).await.unwrap();
        let err = auth
            .register(registration("A@X.io", Role::User))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Store(StoreError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn federated_first_login_provisions_user_role() {
        let (store, auth) = auth();
        let profile = FederatedProfile {
            provider: "github".into(),
            email: "linus@kernel.org".into(),
            first_name: "Linus".into(),
            last_name: "Torvalds".into(),
        };

        let first = auth.sign_in_federated(profile.clone()).await.unwrap();
        assert_eq!(first.role, Role::User);
        let again = auth.sign_in_federated(profile).await.unwrap();
        assert_eq!(first, again);
        assert_eq!(store.len(), 1);

        let err = auth
            .sign_in(&credentials("linus@kernel.org", "", Role::User))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }
}
