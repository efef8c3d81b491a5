use actix_web::{HttpResponse, get, web};
use serde_json::json;

use crate::AppState;
use crate::error::ApiError;

/// Connectivity probe: checks out a pool connection and round-trips a query.
#[get("/health")]
pub async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let client = app_state.pg_pool.get().await?;
    client.query_one("SELECT 1", &[]).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "ok"
    })))
}
