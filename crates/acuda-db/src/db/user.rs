use acuda_core::models::{NewUser, User, UserRecord};
use acuda_core::AppError;
use sqlx::{PgPool, Postgres};

use super::{CredentialStore, USER_EXISTS};
use crate::password::PasswordHasher;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
    hasher: PasswordHasher,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            hasher: PasswordHasher::default(),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn get_record_by_name(&self, nombre: &str) -> Result<Option<UserRecord>, AppError> {
        sqlx::query_as::<Postgres, UserRecord>(
            r#"
            SELECT id, nombre, ruta, apellidos, "contraseña"
            FROM users
            WHERE nombre = $1
            "#,
        )
        .bind(nombre)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to get user by name");
            AppError::Database(e)
        })
    }

    #[tracing::instrument(skip(self, new_user), fields(db.table = "users", db.operation = "insert", nombre = %new_user.nombre))]
    async fn insert(&self, new_user: &NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<Postgres, User>(
            r#"
            INSERT INTO users (nombre, ruta, "contraseña", apellidos)
            VALUES ($1, $2, $3, $4)
            RETURNING id, nombre, ruta, apellidos
            "#,
        )
        .bind(&new_user.nombre)
        .bind(&new_user.ruta)
        .bind(&new_user.password_hash)
        .bind(&new_user.apellidos)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let is_duplicate = e
                .as_database_error()
                .and_then(|db| db.code())
                .is_some_and(|code| code == UNIQUE_VIOLATION);
            if is_duplicate {
                AppError::Conflict(USER_EXISTS.to_string())
            } else {
                tracing::error!(error = %e, "Failed to create user");
                AppError::Database(e)
            }
        })?;

        tracing::info!(user_id = user.id, nombre = %user.nombre, "User created");

        Ok(user)
    }
}

#[async_trait::async_trait]
impl CredentialStore for UserRepository {
    async fn find_by_name(&self, nombre: &str) -> Result<Option<User>, AppError> {
        Ok(self.get_record_by_name(nombre).await?.map(User::from))
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        sqlx::query_as::<Postgres, User>(
            r#"
            SELECT id, nombre, ruta, apellidos
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to get user by id");
            AppError::Database(e)
        })
    }

    async fn create(
        &self,
        nombre: &str,
        ruta: &str,
        apellidos: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let password_hash = self.hasher.hash(password).await?;
        self.insert(&NewUser {
            nombre: nombre.to_string(),
            ruta: ruta.to_string(),
            apellidos: apellidos.to_string(),
            password_hash,
        })
        .await
    }

    async fn verify_password(
        &self,
        nombre: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let Some(record) = self.get_record_by_name(nombre).await? else {
            return Ok(None);
        };

        if self.hasher.verify(password, &record.password_hash).await? {
            Ok(Some(record.into()))
        } else {
            Ok(None)
        }
    }
}
