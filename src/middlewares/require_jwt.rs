/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>` 中的 access token，
 * 加载对应用户（先查缓存，再查存储），拒绝非 active 用户，
 * 并把 `User` 写入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/classes")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_classes))
 * ```
 *
 * 处理函数中通过 `RequireJWT::extract_user_claims(&req)` 取出当前用户。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserStatus};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";

/// 用户缓存键；用户被修改或删除时按此键失效
pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败的原因
enum AuthFailure {
    Unauthorized(&'static str),
    Disabled,
    Internal,
}

impl AuthFailure {
    fn into_response(self) -> HttpResponse {
        match self {
            AuthFailure::Unauthorized(msg) => create_error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                &format!("Unauthorized: {msg}"),
            ),
            AuthFailure::Disabled => create_error_response(
                StatusCode::FORBIDDEN,
                ErrorCode::AccountDisabled,
                "Account is not active",
            ),
            AuthFailure::Internal => create_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Authentication backend unavailable",
            ),
        }
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

async fn authenticate(req: &ServiceRequest) -> Result<User, AuthFailure> {
    let token = bearer_token(req).ok_or(AuthFailure::Unauthorized(
        "missing or invalid Authorization header",
    ))?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthFailure::Unauthorized("invalid token")
    })?;
    let user_id = claims
        .user_id()
        .ok_or(AuthFailure::Unauthorized("invalid subject"))?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone());

    let cached = match &cache {
        Some(cache) => match cache.get_json::<User>(&user_cache_key(user_id)).await {
            CacheResult::Found(user) => Some(user),
            _ => None,
        },
        None => None,
    };

    let user = match cached {
        Some(user) => user,
        None => {
            let storage = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|s| s.get_ref().clone())
                .ok_or_else(|| {
                    error!("Storage not found in app data");
                    AuthFailure::Internal
                })?;

            let user = storage
                .get_user_by_id(user_id)
                .await
                .map_err(|e| {
                    error!("Failed to load user {}: {}", user_id, e);
                    AuthFailure::Internal
                })?
                .ok_or(AuthFailure::Unauthorized("user not found"))?;

            if let Some(cache) = &cache {
                cache
                    .insert_json(
                        user_cache_key(user_id),
                        &user,
                        AppConfig::get().cache.default_ttl,
                    )
                    .await;
            }
            user
        }
    };

    if user.status != UserStatus::Active {
        info!("Rejecting request from inactive user {}", user.id);
        return Err(AuthFailure::Disabled);
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行给 CORS 处理
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(HttpResponse::NoContent().finish().map_into_right_body()));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(failure) => {
                    info!("JWT authentication failed for request to {}", req.path());
                    Ok(req.into_response(failure.into_response().map_into_right_body()))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中取出当前用户（需先经过 RequireJWT）
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    async fn whoami(req: actix_web::HttpRequest) -> HttpResponse {
        match RequireJWT::extract_user_id(&req) {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(RequireJWT)
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/me").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/me")
                .insert_header(("Authorization", "Bearer not-a-jwt"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
