use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode, ValidationErrors,
    classes::requests::{CreateClassRequest, NewClass},
    users::entities::{User, UserRole},
};
use crate::services::{
    Outcome, bad_request, current_user, forbidden, not_found, storage_error,
};
use crate::storage::Storage;

/// 确定班级所属教师
///
/// 教师只能为自己创建；管理员必须指定一个已存在的教师。
async fn resolve_teacher(
    storage: &dyn Storage,
    creator: &User,
    requested: Option<i64>,
) -> Result<i64, HttpResponse> {
    match creator.role {
        UserRole::Teacher => match requested {
            None => Ok(creator.id),
            Some(id) if id == creator.id => Ok(creator.id),
            Some(_) => Err(forbidden(
                ErrorCode::ClassPermissionDenied,
                "Teachers can only create classes for themselves",
            )),
        },
        UserRole::Admin => {
            let Some(teacher_id) = requested else {
                let mut errors = ValidationErrors::new();
                errors.missing("teacher_id");
                return Err(ApiResponse::<ValidationErrors>::validation_failed(errors));
            };
            let teacher = storage
                .get_user_by_id(teacher_id)
                .await
                .map_err(storage_error("Class creation failed"))?
                .ok_or_else(|| not_found(ErrorCode::UserNotFound, "Teacher not found"))?;
            if teacher.role != UserRole::Teacher {
                return Err(bad_request(
                    ErrorCode::UserRoleInvalid,
                    "The specified user is not a teacher",
                ));
            }
            Ok(teacher.id)
        }
        UserRole::Student => Err(forbidden(
            ErrorCode::PermissionDenied,
            "Students cannot create classes",
        )),
    }
}

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> Outcome {
    let user = current_user(request)?;
    if let Err(errors) = class_data.validate() {
        return Err(ApiResponse::<ValidationErrors>::validation_failed(errors));
    }

    let storage = service.get_storage(request)?;
    let teacher_id = resolve_teacher(storage.as_ref(), &user, class_data.teacher_id).await?;

    let class = storage
        .create_class(NewClass {
            teacher_id,
            name: class_data.name.trim().to_string(),
            description: class_data.description,
            subject: class_data.subject,
            capacity: class_data.capacity,
        })
        .await
        .map_err(storage_error("Class creation failed"))?;

    info!("Class {} created by {}", class.id, user.username);
    Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_teacher_resolution_rules() {
        let storage = SeaOrmStorage::new_in_memory().await;
        let admin = test_support::user(&storage, "admin1", UserRole::Admin).await;
        let teacher = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let student = test_support::user(&storage, "student1", UserRole::Student).await;

        // 教师默认归属自己，指定他人为 403
        assert_eq!(resolve_teacher(&storage, &teacher, None).await.ok(), Some(teacher.id));
        let denied = resolve_teacher(&storage, &teacher, Some(admin.id)).await;
        assert_eq!(denied.err().map(|r| r.status()), Some(StatusCode::FORBIDDEN));

        // 管理员：不存在的用户 404，非教师 400，缺省 400
        let missing = resolve_teacher(&storage, &admin, Some(9999)).await;
        assert_eq!(missing.err().map(|r| r.status()), Some(StatusCode::NOT_FOUND));
        let not_teacher = resolve_teacher(&storage, &admin, Some(student.id)).await;
        assert_eq!(not_teacher.err().map(|r| r.status()), Some(StatusCode::BAD_REQUEST));
        let absent = resolve_teacher(&storage, &admin, None).await;
        assert_eq!(absent.err().map(|r| r.status()), Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            resolve_teacher(&storage, &admin, Some(teacher.id)).await.ok(),
            Some(teacher.id)
        );
    }
}
