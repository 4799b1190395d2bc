use super::jwt::INVALID_TOKEN;
use crate::error::HttpAppError;
use crate::state::AuthState;
use acuda_core::models::User;
use acuda_core::AppError;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Session token payload: the public account fields plus timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub nombre: String,
    pub ruta: String,
    pub apellidos: String,
    pub iat: i64,
    pub exp: i64,
}

impl From<Claims> for User {
    fn from(claims: Claims) -> Self {
        User {
            id: claims.id,
            nombre: claims.nombre,
            ruta: claims.ruta,
            apellidos: claims.apellidos,
        }
    }
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub nombre: String,
    #[serde(default, rename = "contraseña")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub nombre: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub ruta: String,
    #[serde(default, rename = "contraseña")]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub apellidos: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VerifyResponse {
    pub message: String,
    pub user: User,
}

/// Caller identity, taken from `Authorization: Bearer <token>`.
///
/// Every way the header can be wrong (absent, not bearer, bad signature, expired) is the same
/// 401. Usable alongside `Multipart` since it only reads request parts.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn user_id(&self) -> i32 {
        self.0.id
    }

    pub fn ruta(&self) -> &str {
        &self.0.ruta
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized(INVALID_TOKEN.to_string()))?;
        let auth = AuthState::from_ref(state);
        let claims = auth.jwt.verify(token)?;
        Ok(AuthenticatedUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header_value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/documentos/lista");
        if let Some(v) = header_value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts_with(Some("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts_with(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(Some("abc"))), None);
        assert_eq!(bearer_token(&parts_with(None)), None);
    }

    #[test]
    fn test_password_field_name() {
        let login: LoginRequest =
            serde_json::from_str(r#"{"nombre": "ana", "contraseña": "secret123"}"#).unwrap();
        assert_eq!(login.password, "secret123");

        let empty: LoginRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.nombre.is_empty() && empty.password.is_empty());
    }
}
