use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{AssignmentInput, AssignmentListQuery},
        responses::AssignmentListResponse,
    },
    classes::{
        entities::{Class, ClassDetail},
        requests::{ClassListQuery, NewClass, UpdateClassRequest},
        responses::ClassListResponse,
    },
    dashboard::responses::{AdminDashboard, StudentDashboard, TeacherDashboard},
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::EnrollmentListQuery,
        responses::EnrollmentListResponse,
    },
    files::entities::{AssignmentFile, NewFileRecord, StoredFileRef, SubmissionFile},
    meetings::{
        entities::Meeting,
        requests::{MeetingListQuery, NewMeeting, UpdateMeetingRequest},
        responses::MeetingListResponse,
    },
    notification_preferences::{
        entities::NotificationPreferences, requests::UpdateNotificationPreferencesRequest,
    },
    submissions::{
        entities::{Submission, SubmissionDetail},
        requests::{GradeInput, SubmissionListQuery},
        responses::SubmissionListResponse,
    },
    users::{
        entities::User,
        requests::{NewUser, UserListQuery, UserUpdate},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 删除记录后需要从磁盘清理的存储键
pub type OrphanedKeys = Vec<String>;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户，用户名或邮箱重复时返回 Conflict
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 登录时按用户名或邮箱查找
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>>;
    // 删除用户及其级联数据，返回需要清理的文件
    async fn delete_user(&self, id: i64) -> Result<Option<OrphanedKeys>>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;

    /// 通知偏好
    async fn get_notification_preferences(&self, user_id: i64)
    -> Result<NotificationPreferences>;
    async fn update_notification_preferences(
        &self,
        user_id: i64,
        update: UpdateNotificationPreferencesRequest,
    ) -> Result<NotificationPreferences>;

    /// 班级管理方法
    async fn create_class(&self, class: NewClass) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 班级详情（教师摘要 + 有效选课人数）
    async fn get_class_detail(&self, class_id: i64) -> Result<Option<ClassDetail>>;
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;
    // 容量低于当前有效人数时返回 CapacityExceeded
    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    // 删除班级及其选课、作业、提交和会议
    async fn delete_class(&self, class_id: i64) -> Result<Option<OrphanedKeys>>;
    async fn count_active_enrollments(&self, class_id: i64) -> Result<u64>;

    /// 选课管理方法
    // 唯一的选课写入路径：重复返回 Conflict，满员返回 CapacityExceeded
    async fn enroll_student(
        &self,
        class_id: i64,
        student_id: i64,
        status: EnrollmentStatus,
    ) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, enrollment_id: i64) -> Result<Option<Enrollment>>;
    async fn get_enrollment(&self, class_id: i64, student_id: i64) -> Result<Option<Enrollment>>;
    async fn list_enrollments_with_pagination(
        &self,
        class_id: i64,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse>;
    // 审批待定申请，与容量检查在同一事务中
    async fn approve_enrollment(&self, enrollment_id: i64) -> Result<Enrollment>;
    async fn delete_enrollment(&self, enrollment_id: i64) -> Result<bool>;

    /// 作业管理方法
    async fn create_assignment(&self, teacher_id: i64, input: AssignmentInput)
    -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    // 整体替换作业字段
    async fn update_assignment(
        &self,
        assignment_id: i64,
        teacher_id: i64,
        input: AssignmentInput,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, assignment_id: i64) -> Result<Option<OrphanedKeys>>;

    /// 作业附件
    async fn create_assignment_file(
        &self,
        assignment_id: i64,
        uploaded_by: i64,
        file: NewFileRecord,
    ) -> Result<AssignmentFile>;
    async fn list_assignment_files(&self, assignment_id: i64) -> Result<Vec<AssignmentFile>>;
    async fn get_assignment_file(
        &self,
        assignment_id: i64,
        file_id: i64,
    ) -> Result<Option<AssignmentFile>>;
    async fn delete_assignment_file(&self, file_id: i64) -> Result<bool>;

    /// 提交管理方法
    // 提交或在评分前重新提交；已评分返回 Conflict
    async fn submit_assignment(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: Option<String>,
        due_date: DateTime<Utc>,
    ) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    async fn get_submission_detail(&self, submission_id: i64)
    -> Result<Option<SubmissionDetail>>;
    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse>;
    async fn grade_submission(
        &self,
        submission_id: i64,
        grade: GradeInput,
    ) -> Result<Option<Submission>>;

    /// 提交附件
    async fn create_submission_file(
        &self,
        submission_id: i64,
        file: NewFileRecord,
    ) -> Result<SubmissionFile>;
    async fn list_submission_files(&self, submission_id: i64) -> Result<Vec<SubmissionFile>>;
    async fn get_submission_file(
        &self,
        submission_id: i64,
        file_id: i64,
    ) -> Result<Option<SubmissionFile>>;
    async fn delete_submission_file(&self, file_id: i64) -> Result<bool>;

    /// 文件下载：按存储键查找归属
    async fn find_file_by_storage_key(&self, storage_key: &str) -> Result<Option<StoredFileRef>>;

    /// 会议管理方法
    async fn create_meeting(&self, meeting: NewMeeting) -> Result<Meeting>;
    async fn get_meeting_by_id(&self, meeting_id: i64) -> Result<Option<Meeting>>;
    async fn list_meetings_with_pagination(
        &self,
        query: MeetingListQuery,
    ) -> Result<MeetingListResponse>;
    async fn update_meeting(
        &self,
        meeting_id: i64,
        update: UpdateMeetingRequest,
    ) -> Result<Option<Meeting>>;
    async fn delete_meeting(&self, meeting_id: i64) -> Result<bool>;

    /// 首页统计
    async fn admin_dashboard(&self, now: DateTime<Utc>) -> Result<AdminDashboard>;
    async fn teacher_dashboard(&self, teacher_id: i64, now: DateTime<Utc>)
    -> Result<TeacherDashboard>;
    async fn student_dashboard(&self, student_id: i64, now: DateTime<Utc>)
    -> Result<StudentDashboard>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
