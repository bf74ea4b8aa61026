//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignment_files;
mod assignments;
mod classes;
mod dashboard;
mod enrollments;
mod files;
mod meetings;
mod notification_preferences;
mod submission_files;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::models::PaginationInfo;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Paginator,
    SelectorTrait,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

/// 附带上下文的数据库错误；唯一约束冲突保持为 Conflict
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(DbErr) -> LmsError {
    move |e| match LmsError::from(e) {
        LmsError::Conflict(msg) => LmsError::conflict(format!("{context}: {msg}")),
        other => LmsError::database_operation(format!("{context}: {}", other.message())),
    }
}

/// 读取一页数据并生成分页信息
pub(crate) async fn fetch_page<'db, C, S>(
    paginator: Paginator<'db, C, S>,
    page: u64,
    size: u64,
    context: &'static str,
) -> Result<(Vec<S::Item>, PaginationInfo)>
where
    C: ConnectionTrait,
    S: SelectorTrait + 'db,
{
    let total = paginator.num_items().await.map_err(db_error(context))?;
    let items = paginator
        .fetch_page(page - 1)
        .await
        .map_err(db_error(context))?;
    let pages = total.div_ceil(size);
    Ok((items, PaginationInfo::new(page, size, total, pages)))
}

impl SeaOrmStorage {
    /// 连接数据库并执行迁移
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("Migration failed: {e}")))?;

        info!("Storage initialized, database: {}", redact_url(&db_url));

        Ok(Self { db })
    }

    /// 单连接内存 SQLite，测试专用
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Self {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .expect("in-memory sqlite should connect");
        Migrator::up(&db, None)
            .await
            .expect("migrations should apply");
        Self { db }
    }

    /// SQLite 专用连接（WAL，外键开启）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite connection failed: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("Database connection failed: {e}")))
    }

    /// 从 URL 推断数据库类型
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "Cannot infer database type from URL: {url}. Supported: sqlite://, postgres://, mysql://, or a .db/.sqlite path"
            )))
        }
    }
}

/// 日志中隐藏连接串里的密码
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &url[scheme_end + 3..at];
            match credentials.split_once(':') {
                Some((user, _)) => format!("{}{user}:***{}", &url[..scheme_end + 3], &url[at..]),
                None => url.to_string(),
            }
        }
        _ => url.to_string(),
    }
}

// Storage trait 实现
use super::{OrphanedKeys, Storage};
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
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<Option<OrphanedKeys>> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 通知偏好
    async fn get_notification_preferences(
        &self,
        user_id: i64,
    ) -> Result<NotificationPreferences> {
        self.get_notification_preferences_impl(user_id).await
    }

    async fn update_notification_preferences(
        &self,
        user_id: i64,
        update: UpdateNotificationPreferencesRequest,
    ) -> Result<NotificationPreferences> {
        self.update_notification_preferences_impl(user_id, update)
            .await
    }

    // 班级模块
    async fn create_class(&self, class: NewClass) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_detail(&self, class_id: i64) -> Result<Option<ClassDetail>> {
        self.get_class_detail_impl(class_id).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<Option<OrphanedKeys>> {
        self.delete_class_impl(class_id).await
    }

    async fn count_active_enrollments(&self, class_id: i64) -> Result<u64> {
        self.count_active_enrollments_impl(class_id).await
    }

    // 选课模块
    async fn enroll_student(
        &self,
        class_id: i64,
        student_id: i64,
        status: EnrollmentStatus,
    ) -> Result<Enrollment> {
        self.enroll_student_impl(class_id, student_id, status).await
    }

    async fn get_enrollment_by_id(&self, enrollment_id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(enrollment_id).await
    }

    async fn get_enrollment(&self, class_id: i64, student_id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(class_id, student_id).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        class_id: i64,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        self.list_enrollments_with_pagination_impl(class_id, query)
            .await
    }

    async fn approve_enrollment(&self, enrollment_id: i64) -> Result<Enrollment> {
        self.approve_enrollment_impl(enrollment_id).await
    }

    async fn delete_enrollment(&self, enrollment_id: i64) -> Result<bool> {
        self.delete_enrollment_impl(enrollment_id).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        teacher_id: i64,
        input: AssignmentInput,
    ) -> Result<Assignment> {
        self.create_assignment_impl(teacher_id, input).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn update_assignment(
        &self,
        assignment_id: i64,
        teacher_id: i64,
        input: AssignmentInput,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(assignment_id, teacher_id, input)
            .await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<Option<OrphanedKeys>> {
        self.delete_assignment_impl(assignment_id).await
    }

    // 作业附件
    async fn create_assignment_file(
        &self,
        assignment_id: i64,
        uploaded_by: i64,
        file: NewFileRecord,
    ) -> Result<AssignmentFile> {
        self.create_assignment_file_impl(assignment_id, uploaded_by, file)
            .await
    }

    async fn list_assignment_files(&self, assignment_id: i64) -> Result<Vec<AssignmentFile>> {
        self.list_assignment_files_impl(assignment_id).await
    }

    async fn get_assignment_file(
        &self,
        assignment_id: i64,
        file_id: i64,
    ) -> Result<Option<AssignmentFile>> {
        self.get_assignment_file_impl(assignment_id, file_id).await
    }

    async fn delete_assignment_file(&self, file_id: i64) -> Result<bool> {
        self.delete_assignment_file_impl(file_id).await
    }

    // 提交模块
    async fn submit_assignment(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: Option<String>,
        due_date: DateTime<Utc>,
    ) -> Result<Submission> {
        self.submit_assignment_impl(assignment_id, student_id, content, due_date)
            .await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn get_submission_detail(
        &self,
        submission_id: i64,
    ) -> Result<Option<SubmissionDetail>> {
        self.get_submission_detail_impl(submission_id).await
    }

    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_assignment_and_student_impl(assignment_id, student_id)
            .await
    }

    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        self.list_submissions_with_pagination_impl(query).await
    }

    async fn grade_submission(
        &self,
        submission_id: i64,
        grade: GradeInput,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(submission_id, grade).await
    }

    // 提交附件
    async fn create_submission_file(
        &self,
        submission_id: i64,
        file: NewFileRecord,
    ) -> Result<SubmissionFile> {
        self.create_submission_file_impl(submission_id, file).await
    }

    async fn list_submission_files(&self, submission_id: i64) -> Result<Vec<SubmissionFile>> {
        self.list_submission_files_impl(submission_id).await
    }

    async fn get_submission_file(
        &self,
        submission_id: i64,
        file_id: i64,
    ) -> Result<Option<SubmissionFile>> {
        self.get_submission_file_impl(submission_id, file_id).await
    }

    async fn delete_submission_file(&self, file_id: i64) -> Result<bool> {
        self.delete_submission_file_impl(file_id).await
    }

    // 文件
    async fn find_file_by_storage_key(&self, storage_key: &str) -> Result<Option<StoredFileRef>> {
        self.find_file_by_storage_key_impl(storage_key).await
    }

    // 会议模块
    async fn create_meeting(&self, meeting: NewMeeting) -> Result<Meeting> {
        self.create_meeting_impl(meeting).await
    }

    async fn get_meeting_by_id(&self, meeting_id: i64) -> Result<Option<Meeting>> {
        self.get_meeting_by_id_impl(meeting_id).await
    }

    async fn list_meetings_with_pagination(
        &self,
        query: MeetingListQuery,
    ) -> Result<MeetingListResponse> {
        self.list_meetings_with_pagination_impl(query).await
    }

    async fn update_meeting(
        &self,
        meeting_id: i64,
        update: UpdateMeetingRequest,
    ) -> Result<Option<Meeting>> {
        self.update_meeting_impl(meeting_id, update).await
    }

    async fn delete_meeting(&self, meeting_id: i64) -> Result<bool> {
        self.delete_meeting_impl(meeting_id).await
    }

    // 首页统计
    async fn admin_dashboard(&self, now: DateTime<Utc>) -> Result<AdminDashboard> {
        self.admin_dashboard_impl(now).await
    }

    async fn teacher_dashboard(
        &self,
        teacher_id: i64,
        now: DateTime<Utc>,
    ) -> Result<TeacherDashboard> {
        self.teacher_dashboard_impl(teacher_id, now).await
    }

    async fn student_dashboard(
        &self,
        student_id: i64,
        now: DateTime<Utc>,
    ) -> Result<StudentDashboard> {
        self.student_dashboard_impl(student_id, now).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! 存储层测试共用的数据准备

    use super::SeaOrmStorage;
    use crate::models::classes::{entities::Class, requests::NewClass};
    use crate::models::users::{
        entities::{User, UserRole},
        requests::NewUser,
    };

    pub async fn user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
        storage
            .create_user_impl(NewUser {
                username: username.to_string(),
                email: format!("{username}@school.test"),
                password_hash: "hash".to_string(),
                role,
                full_name: None,
                avatar_url: None,
            })
            .await
            .expect("create user")
    }

    pub async fn class(storage: &SeaOrmStorage, teacher_id: i64, capacity: Option<i32>) -> Class {
        storage
            .create_class_impl(NewClass {
                teacher_id,
                name: "Chemistry".to_string(),
                description: None,
                subject: Some("Science".to_string()),
                capacity,
            })
            .await
            .expect("create class")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("lms.db").ok(),
            Some("sqlite://lms.db?mode=rwc".to_string())
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u:p@h/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("oracle://x").is_err());
    }

    #[test]
    fn test_redact_url() {
        assert_eq!(
            redact_url("postgres://lms:secret@db:5432/lms"),
            "postgres://lms:***@db:5432/lms"
        );
        assert_eq!(redact_url("sqlite://lms.db"), "sqlite://lms.db");
    }

    #[tokio::test]
    async fn test_in_memory_storage_migrates() {
        let storage = SeaOrmStorage::new_in_memory().await;
        assert_eq!(storage.count_users_impl().await.expect("count"), 0);
    }
}
