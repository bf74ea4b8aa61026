pub mod files;
pub mod get;
pub mod grade;
pub mod list;
pub mod submit;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ErrorCode,
    submissions::{
        entities::Submission,
        requests::{GradeSubmissionRequest, SubmissionListParams, SubmitAssignmentRequest},
    },
    users::entities::User,
};
use crate::services::access::ClassAccess;
use crate::services::assignments::load_assignment_access;
use crate::storage::Storage;

use super::{finish, not_found, storage_error, storage_from_request};

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
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

    pub async fn submit(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        body: SubmitAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        finish(submit::submit(self, request, assignment_id, body).await)
    }

    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        query: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        finish(list::list_submissions(self, request, assignment_id, query).await)
    }

    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        finish(get::get_submission(self, request, submission_id).await)
    }

    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        body: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        finish(grade::grade_submission(self, request, submission_id, body).await)
    }

    pub async fn upload_file(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        finish(files::upload_file(self, request, submission_id, payload).await)
    }

    pub async fn list_files(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        finish(files::list_files(self, request, submission_id).await)
    }

    pub async fn delete_file(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        file_id: i64,
    ) -> ActixResult<HttpResponse> {
        finish(files::delete_file(self, request, submission_id, file_id).await)
    }
}

/// 加载提交以及当前用户在其班级中的关系
pub(crate) async fn load_submission_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    submission_id: i64,
) -> Result<(Submission, ClassAccess), HttpResponse> {
    let submission = storage
        .get_submission_by_id(submission_id)
        .await
        .map_err(storage_error("Failed to load submission"))?
        .ok_or_else(|| not_found(ErrorCode::SubmissionNotFound, "Submission not found"))?;
    let (_, access) = load_assignment_access(storage, user, submission.assignment_id).await?;
    Ok((submission, access))
}
