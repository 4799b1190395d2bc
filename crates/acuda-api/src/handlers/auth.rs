use crate::auth::models::{AuthResponse, LoginRequest, RegisterRequest, VerifyResponse};
use crate::auth::AuthenticatedUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AuthState;
use acuda_core::models::User;
use acuda_core::AppError;
use acuda_storage::is_safe_relative;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

fn authenticated(message: &str, state: &AuthState, user: User) -> Result<AuthResponse, AppError> {
    let token = state.jwt.issue(&user)?;
    Ok(AuthResponse {
        message: message.to_string(),
        token,
        user,
    })
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Missing name or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(nombre = %request.nombre))]
pub async fn login(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if request.nombre.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::InvalidInput("Nombre y contraseña son requeridos".to_string()).into());
    }

    let user = state
        .credentials
        .verify_password(&request.nombre, &request.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(authenticated("Login exitoso", &state, user)?))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(nombre = %request.nombre))]
pub async fn register(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if request.nombre.trim().is_empty()
        || request.ruta.trim().is_empty()
        || request.password.is_empty()
        || request.apellidos.trim().is_empty()
    {
        return Err(AppError::InvalidInput("Todos los campos son requeridos".to_string()).into());
    }

    request
        .validate()
        .map_err(|e| AppError::InvalidInput(format!("Datos de registro inválidos: {}", e)))?;

    if !is_safe_relative(&request.ruta) {
        return Err(AppError::InvalidInput(
            "La ruta debe ser relativa y no puede contener '..'".to_string(),
        )
        .into());
    }

    let user = state
        .credentials
        .create(
            request.nombre.trim(),
            request.ruta.trim(),
            request.apellidos.trim(),
            &request.password,
        )
        .await?;

    tracing::info!(user_id = user.id, ruta = %user.ruta, "User registered");
    let body = authenticated("Usuario registrado exitosamente", &state, user)?;
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    get,
    path = "/auth/verify",
    tag = "auth",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Invalid token or unknown user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, identity), fields(user_id = identity.user_id()))]
pub async fn verify(
    State(state): State<AuthState>,
    identity: AuthenticatedUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = state
        .credentials
        .find_by_id(identity.user_id())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    Ok(Json(VerifyResponse {
        message: "Token válido".to_string(),
        user,
    }))
}
