use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::{error, info};

use super::UserService;
use crate::errors::LmsError;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    users::requests::{CreateUserRequest, NewUser},
};
use crate::services::auth::register::ensure_unique;
use crate::services::{Outcome, conflict, error_response, storage_error};
use crate::utils::password::hash_password;

pub async fn create_user(
    service: &UserService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> Outcome {
    if let Err(errors) = user_data.validate() {
        return Err(ApiResponse::<ValidationErrors>::validation_failed(errors));
    }

    let storage = service.get_storage(request)?;
    ensure_unique(&storage, &user_data.username, &user_data.email).await?;

    let password_hash = hash_password(&user_data.password).map_err(|e| {
        error!("Password hashing failed: {}", e);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "User creation failed",
        )
    })?;

    let new_user = NewUser {
        username: user_data.username,
        email: user_data.email,
        password_hash,
        role: user_data.role,
        full_name: user_data.full_name,
        avatar_url: user_data.avatar_url,
    };

    match storage.create_user(new_user).await {
        Ok(user) => {
            info!("User {} created with role {}", user.username, user.role);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "User created")))
        }
        Err(LmsError::Conflict(_)) => Err(conflict(
            ErrorCode::UserNameAlreadyExists,
            "Username or email already exists",
        )),
        Err(e) => Err(storage_error("User creation failed")(e)),
    }
}
