//! `realty-auth`: accounts, tokens and role gates.
//!
//! This crate is intentionally decoupled from HTTP. Storage is reached only
//! through the [`AccountRepository`] port.

pub mod account;
pub mod authorize;
pub mod claims;
#[cfg(feature = "dummy-login")]
pub mod dummy;
pub mod login;
pub mod password;
pub mod roles;
pub mod token;

pub use account::{Account, AccountRepository, CredentialError, CredentialStore, NewAccount};
pub use authorize::{AccessDenied, AuthOnly, ModerationOnly, RoleChecker, authorize};
pub use claims::{Claims, TokenError, validate_claims};
#[cfg(feature = "dummy-login")]
pub use dummy::{DUMMY_SUBJECT, DummyLogin};
pub use login::{Login, LoginError};
pub use roles::{InvalidRole, Role};
pub use token::{Hs256TokenService, TokenIssuer, TokenVerifier};
