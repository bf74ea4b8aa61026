//! 资源访问规则
//!
//! 所有“谁能看、谁能改”的判断集中在这里，路由和服务只调用这些函数。

use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    classes::entities::Class,
    enrollments::entities::{Enrollment, EnrollmentStatus},
    meetings::entities::Meeting,
    submissions::entities::Submission,
    users::entities::{User, UserRole},
};
use crate::storage::Storage;

/// 当前用户与某个班级的关系
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassAccess {
    Admin,
    /// 班级所属教师
    Owner,
    ActiveStudent,
    PendingStudent,
    Outsider,
}

impl ClassAccess {
    /// 已知选课记录时的判定
    pub fn resolve(user: &User, class: &Class, enrollment: Option<&Enrollment>) -> Self {
        if user.role == UserRole::Admin {
            return ClassAccess::Admin;
        }
        if class.teacher_id == user.id {
            return ClassAccess::Owner;
        }
        match enrollment {
            Some(e) if e.student_id == user.id && e.class_id == class.id => match e.status {
                EnrollmentStatus::Active => ClassAccess::ActiveStudent,
                EnrollmentStatus::Pending => ClassAccess::PendingStudent,
            },
            _ => ClassAccess::Outsider,
        }
    }

    pub fn managers() -> &'static [ClassAccess] {
        &[ClassAccess::Admin, ClassAccess::Owner]
    }

    /// 管理员或班级教师
    pub fn can_manage(self) -> bool {
        Self::managers().contains(&self)
    }

    /// 能查看班级内容（作业、会议等）
    pub fn can_view(self) -> bool {
        self.can_manage() || self == ClassAccess::ActiveStudent
    }
}

/// 查询用户在班级中的关系，只有需要时才查选课表
pub async fn class_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    class: &Class,
) -> Result<ClassAccess> {
    let quick = ClassAccess::resolve(user, class, None);
    if quick != ClassAccess::Outsider || user.role != UserRole::Student {
        return Ok(quick);
    }
    let enrollment = storage.get_enrollment(class.id, user.id).await?;
    Ok(ClassAccess::resolve(user, class, enrollment.as_ref()))
}

/// 加载班级并判定关系；班级不存在时返回 None
pub async fn load_class_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
) -> Result<Option<(Class, ClassAccess)>> {
    let Some(class) = storage.get_class_by_id(class_id).await? else {
        return Ok(None);
    };
    let access = class_access(storage, user, &class).await?;
    Ok(Some((class, access)))
}

/// 提交的学生本人或班级管理者可查看
pub fn can_view_submission(access: ClassAccess, user: &User, submission: &Submission) -> bool {
    submission.student_id == user.id || access.can_manage()
}

/// 提交附件只能由仍在班级中的提交者本人上传或删除，与重新提交的要求一致
pub fn can_modify_submission_files(
    access: ClassAccess,
    user: &User,
    submission: &Submission,
) -> bool {
    access == ClassAccess::ActiveStudent && submission.student_id == user.id
}

/// 会议主持人也可管理会议
pub fn can_manage_meeting(access: ClassAccess, user: &User, meeting: &Meeting) -> bool {
    access.can_manage() || meeting.host_id == user.id
}

pub fn can_view_meeting(access: ClassAccess, user: &User, meeting: &Meeting) -> bool {
    can_manage_meeting(access, user, meeting) || access.can_view()
}

/// 管理者可移除任何学生，学生可退出自己的选课
pub fn can_delete_enrollment(access: ClassAccess, user: &User, enrollment: &Enrollment) -> bool {
    access.can_manage() || enrollment.student_id == user.id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::models::users::entities::UserStatus;
    use chrono::Utc;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@school.test"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            full_name: None,
            avatar_url: None,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn class(id: i64, teacher_id: i64) -> Class {
        Class {
            id,
            teacher_id,
            name: "Physics".into(),
            description: None,
            subject: None,
            capacity: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn enrollment(class_id: i64, student_id: i64, status: EnrollmentStatus) -> Enrollment {
        Enrollment {
            id: 1,
            class_id,
            student_id,
            status,
            enrolled_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn submission(student_id: i64) -> Submission {
        Submission {
            id: 9,
            assignment_id: 3,
            student_id,
            content: None,
            status: SubmissionStatus::Submitted,
            grade: None,
            feedback: None,
            graded_by: None,
            submitted_at: Utc::now(),
            graded_at: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolve_class_access() {
        let c = class(1, 10);
        assert_eq!(
            ClassAccess::resolve(&user(99, UserRole::Admin), &c, None),
            ClassAccess::Admin
        );
        assert_eq!(
            ClassAccess::resolve(&user(10, UserRole::Teacher), &c, None),
            ClassAccess::Owner
        );
        assert_eq!(
            ClassAccess::resolve(&user(11, UserRole::Teacher), &c, None),
            ClassAccess::Outsider
        );

        let student = user(20, UserRole::Student);
        let active = enrollment(1, 20, EnrollmentStatus::Active);
        let pending = enrollment(1, 20, EnrollmentStatus::Pending);
        let elsewhere = enrollment(2, 20, EnrollmentStatus::Active);
        assert_eq!(
            ClassAccess::resolve(&student, &c, Some(&active)),
            ClassAccess::ActiveStudent
        );
        assert_eq!(
            ClassAccess::resolve(&student, &c, Some(&pending)),
            ClassAccess::PendingStudent
        );
        assert_eq!(
            ClassAccess::resolve(&student, &c, Some(&elsewhere)),
            ClassAccess::Outsider
        );

        assert!(ClassAccess::ActiveStudent.can_view());
        assert!(!ClassAccess::PendingStudent.can_view());
        assert!(!ClassAccess::ActiveStudent.can_manage());
    }

    #[test]
    fn test_only_submitter_modifies_submission_files() {
        let sub = submission(20);
        let active = ClassAccess::ActiveStudent;
        assert!(can_modify_submission_files(active, &user(20, UserRole::Student), &sub));
        assert!(!can_modify_submission_files(active, &user(21, UserRole::Student), &sub));
        assert!(!can_modify_submission_files(
            ClassAccess::Owner,
            &user(10, UserRole::Teacher),
            &sub
        ));
        assert!(!can_modify_submission_files(
            ClassAccess::Admin,
            &user(1, UserRole::Admin),
            &sub
        ));

        // 退课或待审批的学生不能再改附件
        for access in [ClassAccess::Outsider, ClassAccess::PendingStudent] {
            assert!(!can_modify_submission_files(
                access,
                &user(20, UserRole::Student),
                &sub
            ));
        }

        // 教师可以查看但不能上传
        assert!(can_view_submission(ClassAccess::Owner, &user(10, UserRole::Teacher), &sub));
        assert!(!can_view_submission(
            ClassAccess::ActiveStudent,
            &user(21, UserRole::Student),
            &sub
        ));
    }

    #[test]
    fn test_enrollment_withdrawal() {
        let e = enrollment(1, 20, EnrollmentStatus::Active);
        assert!(can_delete_enrollment(
            ClassAccess::ActiveStudent,
            &user(20, UserRole::Student),
            &e
        ));
        assert!(!can_delete_enrollment(
            ClassAccess::ActiveStudent,
            &user(21, UserRole::Student),
            &e
        ));
        assert!(can_delete_enrollment(ClassAccess::Owner, &user(10, UserRole::Teacher), &e));
    }

    #[tokio::test]
    async fn test_class_access_looks_up_enrollment() {
        use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

        let sea = SeaOrmStorage::new_in_memory().await;
        let teacher = test_support::user(&sea, "teacher1", UserRole::Teacher).await;
        let student = test_support::user(&sea, "student1", UserRole::Student).await;
        let c = test_support::class(&sea, teacher.id, None).await;
        sea.enroll_student_impl(c.id, student.id, EnrollmentStatus::Pending)
            .await
            .expect("request");
        let storage: Arc<dyn Storage> = Arc::new(sea);

        let (_, access) = load_class_access(&storage, &student, c.id)
            .await
            .expect("load")
            .expect("class exists");
        assert_eq!(access, ClassAccess::PendingStudent);
        assert!(load_class_access(&storage, &student, c.id + 100).await.expect("load").is_none());
    }
}
