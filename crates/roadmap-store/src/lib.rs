//! Roadmap Store
//!
//! The persistence side of the roadmap service.
//!
//! # Core Pieces
//!
//! - **Users**: `User` records behind the `UserStore` contract
//! - **Connections**: `ConnectionCache` memoizes one handle per store URI
//! - **Auth**: `Authenticator` for credential and federated sign-in
//!
//! # Example
//!
//! ```rust,ignore
//! use roadmap_store::{Authenticator, Credentials, InMemoryUserStore, Role};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = Authenticator::new(Arc::new(InMemoryUserStore::new()));
//! let user = auth
//!     .sign_in(&Credentials {
//!         email: "ada@example.com".into(),
//!         password: "secret".into(),
//!         role: Role::User,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod auth;
pub mod cache;
pub mod error;
pub mod user;

pub use auth::{Authenticator, Credentials, FederatedProfile, Registration};
pub use cache::{Connect, ConnectionCache};
pub use error::{AuthError, StoreError};
pub use user::{InMemoryUserStore, Role, User, UserStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for store and auth
    pub use crate::{
        AuthError, Authenticator, Connect, ConnectionCache, InMemoryUserStore, Role, StoreError,
        User, UserStore,
    };
}
