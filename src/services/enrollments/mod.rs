//! 选课
//!
//! 所有路由都挂在 `/classes/{class_id}/enrollments` 下，
//! 由 RequireClassAccess 预先加载班级并判定调用者的关系。

pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::LmsError;
use crate::models::{
    ErrorCode,
    enrollments::requests::{EnrollStudentRequest, EnrollmentListParams, UpdateEnrollmentRequest},
};
use crate::storage::Storage;

use super::{conflict, finish, not_found, storage_error, storage_from_request};

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(
        &self,
        request: &HttpRequest,
    ) -> Result<Arc<dyn Storage>, HttpResponse> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn list_enrollments(
        &self,
        request: &HttpRequest,
        query: EnrollmentListParams,
    ) -> ActixResult<HttpResponse> {
        finish(list::list_enrollments(self, request, query).await)
    }

    // 教师或管理员直接添加
    pub async fn enroll_student(
        &self,
        request: &HttpRequest,
        body: EnrollStudentRequest,
    ) -> ActixResult<HttpResponse> {
        finish(create::enroll_student(self, request, body).await)
    }

    // 学生申请加入
    pub async fn request_enrollment(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        finish(create::request_enrollment(self, request).await)
    }

    // 审批申请
    pub async fn update_enrollment(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
        body: UpdateEnrollmentRequest,
    ) -> ActixResult<HttpResponse> {
        finish(update::approve_enrollment(self, request, enrollment_id, body).await)
    }

    pub async fn delete_enrollment(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
    ) -> ActixResult<HttpResponse> {
        finish(delete::delete_enrollment(self, request, enrollment_id).await)
    }
}

/// 选课写入失败的映射：重复、满员、班级已删除
pub(crate) fn enrollment_error(err: LmsError) -> HttpResponse {
    match err {
        LmsError::Conflict(_) => conflict(
            ErrorCode::AlreadyEnrolled,
            "Student is already enrolled or has a pending request",
        ),
        LmsError::CapacityExceeded(_) => conflict(ErrorCode::ClassFull, "Class is full"),
        LmsError::NotFound(_) => not_found(ErrorCode::ClassNotFound, "Class not found"),
        other => storage_error("Enrollment failed")(other),
    }
}
