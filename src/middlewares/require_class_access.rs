/*!
 * 班级访问中间件
 *
 * 必须在 RequireJWT 之后使用，路径中需包含 `{class_id}`。
 * 加载班级（不存在返回 404），判定当前用户与班级的关系，
 * 并把 `ClassContext` 写入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/classes/{class_id}/enrollments")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list).wrap(RequireClassAccess::new_any(ClassAccess::managers())))
 *     .route("/request", web::post().to(request).wrap(RequireClassAccess::resolve()))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error};

pub use crate::services::access::ClassAccess;
use crate::{
    models::{ErrorCode, classes::entities::Class, users::entities::User},
    services::access::load_class_access,
    storage::Storage,
};

use super::create_error_response;

/// 已加载的班级和当前用户的关系
#[derive(Debug, Clone)]
pub struct ClassContext {
    pub class: Class,
    pub access: ClassAccess,
}

#[derive(Clone)]
pub struct RequireClassAccess {
    /// 为空表示只做解析，不限制
    allowed: Vec<ClassAccess>,
}

impl RequireClassAccess {
    /// 只解析关系，由处理函数自行判断
    pub fn resolve() -> Self {
        Self {
            allowed: Vec::new(),
        }
    }

    /// 关系不在列表中时返回 403
    pub fn new_any(allowed: &[ClassAccess]) -> Self {
        Self {
            allowed: allowed.to_vec(),
        }
    }

    fn permits(&self, access: ClassAccess) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&access)
    }

    /// 从请求扩展中取出班级上下文
    pub fn extract_class_context(req: &actix_web::HttpRequest) -> Option<ClassContext> {
        req.extensions().get::<ClassContext>().cloned()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireClassAccess
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireClassAccessMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireClassAccessMiddleware {
            service: Rc::new(service),
            policy: self.clone(),
        }))
    }
}

pub struct RequireClassAccessMiddleware<S> {
    service: Rc<S>,
    policy: RequireClassAccess,
}

impl<S, B> Service<ServiceRequest> for RequireClassAccessMiddleware<S>
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
        let policy = self.policy.clone();

        Box::pin(async move {
            macro_rules! reject {
                ($status:expr, $code:expr, $msg:expr) => {
                    return Ok(req.into_response(
                        create_error_response($status, $code, $msg).map_into_right_body(),
                    ))
                };
            }

            // 1. 当前用户
            let user = req.extensions().get::<User>().cloned();
            let Some(user) = user else {
                reject!(
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthorized,
                    "Authentication required"
                );
            };

            // 2. class_id
            let class_id = req
                .match_info()
                .get("class_id")
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|id| *id > 0);
            let Some(class_id) = class_id else {
                reject!(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::BadRequest,
                    "Missing or invalid class_id"
                );
            };

            let storage = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|s| s.get_ref().clone());
            let Some(storage) = storage else {
                error!("Storage not found in app data");
                reject!(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalServerError,
                    "Storage unavailable"
                );
            };

            // 3. 加载班级并判定关系
            let (class, access) = match load_class_access(&storage, &user, class_id).await {
                Ok(Some(found)) => found,
                Ok(None) => reject!(
                    StatusCode::NOT_FOUND,
                    ErrorCode::ClassNotFound,
                    "Class not found"
                ),
                Err(e) => {
                    error!("Failed to resolve access to class {}: {}", class_id, e);
                    reject!(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Failed to load class"
                    );
                }
            };

            if !policy.permits(access) {
                debug!("User {} ({:?}) denied on class {}", user.id, access, class_id);
                reject!(
                    StatusCode::FORBIDDEN,
                    ErrorCode::ClassPermissionDenied,
                    "No permission for this class"
                );
            }

            req.extensions_mut().insert(ClassContext { class, access });
            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy() {
        let any = RequireClassAccess::resolve();
        assert!(any.permits(ClassAccess::Outsider));

        let managers = RequireClassAccess::new_any(ClassAccess::managers());
        assert!(managers.permits(ClassAccess::Owner));
        assert!(!managers.permits(ClassAccess::ActiveStudent));
    }
}
