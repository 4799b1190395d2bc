use acuda_core::models::{User, UserRecord};
use acuda_core::AppError;
use tokio::sync::RwLock;

use super::{CredentialStore, USER_EXISTS};
use crate::password::PasswordHasher;

/// Accounts kept in process memory. Ids are assigned sequentially from 1.
pub struct InMemoryCredentialStore {
    users: RwLock<Vec<UserRecord>>,
    hasher: PasswordHasher,
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new(PasswordHasher::default())
    }
}

impl InMemoryCredentialStore {
    pub fn new(hasher: PasswordHasher) -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            hasher,
        }
    }

    /// Remove an account, as if it had been deleted out of band.
    pub async fn remove(&self, id: i32) -> bool {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        users.len() != before
    }
}

#[async_trait::async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_name(&self, nombre: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.nombre == nombre)
            .cloned()
            .map(User::from))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned().map(User::from))
    }

    async fn create(
        &self,
        nombre: &str,
        ruta: &str,
        apellidos: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let password_hash = self.hasher.hash(password).await?;

        let mut users = self.users.write().await;
        if users.iter().any(|u| u.nombre == nombre) {
            return Err(AppError::Conflict(USER_EXISTS.to_string()));
        }

        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let record = UserRecord {
            id,
            nombre: nombre.to_string(),
            ruta: ruta.to_string(),
            apellidos: apellidos.to_string(),
            password_hash,
        };
        users.push(record.clone());

        tracing::info!(user_id = id, nombre = %nombre, "User created");

        Ok(record.into())
    }

    async fn verify_password(
        &self,
        nombre: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let record = {
            let users = self.users.read().await;
            users.iter().find(|u| u.nombre == nombre).cloned()
        };

        let Some(record) = record else {
            return Ok(None);
        };

        if self.hasher.verify(password, &record.password_hash).await? {
            Ok(Some(record.into()))
        } else {
            Ok(None)
        }
    }
}
