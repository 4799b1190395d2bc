use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiStatus {
    pub msg: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "status",
    responses(
        (status = 200, description = "Service is up", body = ApiStatus)
    )
)]
pub async fn api_working() -> Json<ApiStatus> {
    Json(ApiStatus {
        msg: "API Working".to_string(),
    })
}
