//! Account repositories
//!
//! [`CredentialStore`] is the seam the HTTP layer talks to. `UserRepository` backs it with the
//! `users` table; `InMemoryCredentialStore` keeps accounts in process memory.

mod memory;
mod user;

use acuda_core::models::User;
use acuda_core::AppError;

pub use memory::InMemoryCredentialStore;
pub use user::UserRepository;

/// Account storage and credential checks.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_name(&self, nombre: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    /// Create an account. Fails with `AppError::Conflict` when `nombre` is taken.
    async fn create(
        &self,
        nombre: &str,
        ruta: &str,
        apellidos: &str,
        password: &str,
    ) -> Result<User, AppError>;

    /// Returns the account when the name exists and the password matches its hash.
    async fn verify_password(&self, nombre: &str, password: &str)
        -> Result<Option<User>, AppError>;
}

pub(crate) const USER_EXISTS: &str = "El usuario ya existe";
