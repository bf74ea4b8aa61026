use actix_web::{HttpRequest, HttpResponse, web};

use crate::models::{ApiResponse, AppStartTime, system::responses::HealthResponse};
use crate::services::Outcome;

pub fn health(request: &HttpRequest) -> Outcome {
    let now = chrono::Utc::now();
    let started_at = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|t| t.start_datetime)
        .unwrap_or(now);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at,
            uptime_seconds: (now - started_at).num_seconds(),
        },
        "Service is healthy",
    )))
}
