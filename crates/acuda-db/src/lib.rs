//! Acuda Database Layer
//!
//! Account storage behind the [`CredentialStore`] seam: a Postgres repository for production
//! and an in-memory store for tests and local runs.

pub mod db;
pub mod password;

pub use db::{CredentialStore, InMemoryCredentialStore, UserRepository};
pub use password::PasswordHasher;
