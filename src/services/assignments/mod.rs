pub mod create;
pub mod delete;
pub mod files;
pub mod get;
pub mod list;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ErrorCode,
    assignments::{
        entities::Assignment,
        requests::{AssignmentListParams, AssignmentRequest},
    },
    users::entities::User,
};
use crate::services::access::{ClassAccess, load_class_access};
use crate::storage::Storage;

use super::{finish, not_found, storage_error, storage_from_request};

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
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

    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        query: AssignmentListParams,
    ) -> ActixResult<HttpResponse> {
        finish(list::list_assignments(self, request, query).await)
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        body: AssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        finish(create::create_assignment(self, request, body).await)
    }

    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        finish(get::get_assignment(self, request, assignment_id).await)
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        body: AssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        finish(update::update_assignment(self, request, assignment_id, body).await)
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        finish(delete::delete_assignment(self, request, assignment_id).await)
    }

    pub async fn upload_file(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        finish(files::upload_file(self, request, assignment_id, payload).await)
    }

    pub async fn list_files(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        finish(files::list_files(self, request, assignment_id).await)
    }

    pub async fn delete_file(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        file_id: i64,
    ) -> ActixResult<HttpResponse> {
        finish(files::delete_file(self, request, assignment_id, file_id).await)
    }
}

/// 加载作业并判定当前用户与其所属班级的关系
pub(crate) async fn load_assignment_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    assignment_id: i64,
) -> Result<(Assignment, ClassAccess), HttpResponse> {
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await
        .map_err(storage_error("Failed to load assignment"))?
        .ok_or_else(|| not_found(ErrorCode::AssignmentNotFound, "Assignment not found"))?;
    let (_, access) = load_class_access(storage, user, assignment.class_id)
        .await
        .map_err(storage_error("Failed to load class"))?
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;
    Ok((assignment, access))
}

/// 只有管理员或班级教师可以发布到该班级
pub(crate) async fn require_managed_class(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
) -> Result<i64, HttpResponse> {
    let (class, access) = load_class_access(storage, user, class_id)
        .await
        .map_err(storage_error("Failed to load class"))?
        .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class not found"))?;
    if !access.can_manage() {
        return Err(super::forbidden(
            ErrorCode::ClassPermissionDenied,
            "You do not manage this class",
        ));
    }
    Ok(class.teacher_id)
}
