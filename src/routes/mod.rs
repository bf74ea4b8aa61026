pub mod assignments;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod enrollments;
pub mod files;
pub mod frontend;
pub mod meetings;
pub mod notification_preferences;
pub mod submissions;
pub mod system;
pub mod users;

pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use dashboard::configure_dashboard_routes;
pub use enrollments::configure_enrollment_routes;
pub use files::configure_file_routes;
pub use frontend::configure_frontend_routes;
pub use meetings::configure_meeting_routes;
pub use notification_preferences::configure_notification_preference_routes;
pub use submissions::configure_submission_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 完整路由表
///
/// 选课路由的前缀包含在班级路由中，必须先注册；前端兜底路由放在最后。
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_notification_preference_routes)
        .configure(configure_enrollment_routes)
        .configure(configure_classes_routes)
        .configure(configure_assignment_routes)
        .configure(configure_submission_routes)
        .configure(configure_file_routes)
        .configure(configure_meeting_routes)
        .configure(configure_dashboard_routes)
        .configure(configure_system_routes)
        .configure(configure_frontend_routes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use chrono::{Duration, Utc};

    use crate::cache::{ObjectCache, object_cache::moka::MokaCacheWrapper};
    use crate::models::AppStartTime;
    use crate::models::assignments::{entities::AssignmentType, requests::AssignmentInput};
    use crate::models::enrollments::entities::EnrollmentStatus;
    use crate::models::users::entities::{User, UserRole};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};
    use crate::utils::jwt::JwtUtils;

    fn bearer(user: &User) -> (&'static str, String) {
        let token = JwtUtils::generate_access_token(user.id, user.role.as_str()).expect("token");
        ("Authorization", format!("Bearer {token}"))
    }

    struct Fixture {
        storage: Arc<dyn Storage>,
        admin: User,
        teacher: User,
        alice: User,
        bob: User,
        class_id: i64,
        assignment_id: i64,
        alice_submission_id: i64,
    }

    async fn fixture() -> Fixture {
        let db = SeaOrmStorage::new_in_memory().await;
        let admin = test_support::user(&db, "root", UserRole::Admin).await;
        let teacher = test_support::user(&db, "mrs_lee", UserRole::Teacher).await;
        let alice = test_support::user(&db, "alice", UserRole::Student).await;
        let bob = test_support::user(&db, "bob", UserRole::Student).await;
        let class = test_support::class(&db, teacher.id, None).await;

        let storage: Arc<dyn Storage> = Arc::new(db);
        for student in [&alice, &bob] {
            storage
                .enroll_student(class.id, student.id, EnrollmentStatus::Active)
                .await
                .expect("enroll");
        }
        let assignment = storage
            .create_assignment(
                teacher.id,
                AssignmentInput {
                    class_id: class.id,
                    title: "Titration lab".to_string(),
                    description: "Write up the titration results".to_string(),
                    due_date: Utc::now() + Duration::days(7),
                    points: 20,
                    assignment_type: AssignmentType::Homework,
                },
            )
            .await
            .expect("assignment");
        let submission = storage
            .submit_assignment(
                assignment.id,
                alice.id,
                Some("results attached".to_string()),
                assignment.due_date,
            )
            .await
            .expect("submission");

        Fixture {
            storage,
            admin,
            teacher,
            alice,
            bob,
            class_id: class.id,
            assignment_id: assignment.id,
            alice_submission_id: submission.id,
        }
    }

    macro_rules! app {
        ($storage:expr) => {{
            let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::new().expect("cache"));
            test::init_service(
                App::new()
                    .app_data(actix_web::web::Data::new($storage.clone()))
                    .app_data(actix_web::web::Data::new(cache))
                    .app_data(actix_web::web::Data::new(AppStartTime {
                        start_datetime: Utc::now(),
                    }))
                    .configure(configure_routes),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_only_admin_deletes_assignments_and_users() {
        let f = fixture().await;
        let app = app!(f.storage);

        let uri = format!("/api/v1/assignments/{}", f.assignment_id);
        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&uri)
                .insert_header(bearer(&f.teacher))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/users/{}", f.bob.id))
                .insert_header(bearer(&f.teacher))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&uri)
                .insert_header(bearer(&f.admin))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(
            f.storage
                .get_assignment_by_id(f.assignment_id)
                .await
                .expect("query")
                .is_none()
        );
    }

    #[actix_web::test]
    async fn test_upload_to_foreign_submission_is_forbidden() {
        let f = fixture().await;
        let app = app!(f.storage);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!(
                    "/api/v1/submissions/{}/files",
                    f.alice_submission_id
                ))
                .insert_header(bearer(&f.bob))
                .insert_header(("Content-Type", "multipart/form-data; boundary=lms-test"))
                .set_payload("--lms-test--\r\n")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // 教师同样不能替学生上传
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!(
                    "/api/v1/submissions/{}/files",
                    f.alice_submission_id
                ))
                .insert_header(bearer(&f.teacher))
                .insert_header(("Content-Type", "multipart/form-data; boundary=lms-test"))
                .set_payload("--lms-test--\r\n")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_duplicate_enrollment_is_conflict() {
        let f = fixture().await;
        let app = app!(f.storage);
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/classes/{}/enrollments", f.class_id))
                .insert_header(bearer(&f.teacher))
                .set_json(serde_json::json!({ "student_id": f.alice.id }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_mistyped_points_reported_as_field_error() {
        let f = fixture().await;
        let app = app!(f.storage);

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/assignments/{}", f.assignment_id))
                .insert_header(bearer(&f.teacher))
                .set_json(serde_json::json!({
                    "title": "Titration lab",
                    "description": "Write up the titration results",
                    "class_id": f.class_id,
                    "due_date": "2030-05-01",
                    "points": "ten",
                    "type": "homework",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let errors = body["data"]["errors"].as_array().expect("field errors");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["field"], "points");
    }

    #[actix_web::test]
    async fn test_withdrawn_student_cannot_upload_to_own_submission() {
        let f = fixture().await;
        let enrollment = f
            .storage
            .get_enrollment(f.class_id, f.alice.id)
            .await
            .expect("query")
            .expect("enrolled");
        assert!(
            f.storage
                .delete_enrollment(enrollment.id)
                .await
                .expect("withdraw")
        );
        let app = app!(f.storage);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!(
                    "/api/v1/submissions/{}/files",
                    f.alice_submission_id
                ))
                .insert_header(bearer(&f.alice))
                .insert_header(("Content-Type", "multipart/form-data; boundary=lms-test"))
                .set_payload("--lms-test--\r\n")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_class_capacity_null_removes_limit() {
        let f = fixture().await;
        let app = app!(f.storage);
        let uri = format!("/api/v1/classes/{}", f.class_id);

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&uri)
                .insert_header(bearer(&f.teacher))
                .set_json(serde_json::json!({ "capacity": 5 }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&uri)
                .insert_header(bearer(&f.teacher))
                .set_json(serde_json::json!({ "capacity": null }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let class = f
            .storage
            .get_class_by_id(f.class_id)
            .await
            .expect("query")
            .expect("exists");
        assert_eq!(class.capacity, None);
    }

    #[actix_web::test]
    async fn test_health_is_public_and_unknown_api_is_json_404() {
        let f = fixture().await;
        let app = app!(f.storage);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/system/health").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/nope").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }
}
