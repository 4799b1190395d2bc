use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public view of an account. This is also what the session token carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i32,
    pub nombre: String,
    pub ruta: String,
    pub apellidos: String,
}

/// Stored account row, including the bcrypt hash.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserRecord {
    pub id: i32,
    pub nombre: String,
    pub ruta: String,
    pub apellidos: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "contraseña"))]
    pub password_hash: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            nombre: record.nombre,
            ruta: record.ruta,
            apellidos: record.apellidos,
        }
    }
}

/// Account to be created; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nombre: String,
    pub ruta: String,
    pub apellidos: String,
    pub password_hash: String,
}
