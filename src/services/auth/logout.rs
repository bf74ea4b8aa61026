use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use crate::models::ApiResponse;
use crate::services::{Outcome, current_user, forget_cached_user};
use crate::utils::jwt::JwtUtils;

pub async fn handle_logout(request: &HttpRequest) -> Outcome {
    let user = current_user(request)?;
    forget_cached_user(request, user.id).await;
    info!("User {} logged out", user.username);

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logged out")))
}
