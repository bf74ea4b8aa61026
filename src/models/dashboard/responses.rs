use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct AdminDashboard {
    pub total_users: i64,
    pub students: i64,
    pub teachers: i64,
    pub admins: i64,
    pub classes: i64,
    pub assignments: i64,
    pub upcoming_meetings: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct TeacherDashboard {
    pub classes: i64,
    pub assignments: i64,
    /// 已提交但未评分
    pub submissions_to_grade: i64,
    pub pending_enrollments: i64,
    pub upcoming_meetings: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentDashboard {
    pub classes: i64,
    /// 7 天内到期且尚未提交
    pub assignments_due_soon: i64,
    pub graded_submissions: i64,
    pub upcoming_meetings: i64,
}

/// 按角色区分的首页统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub enum DashboardResponse {
    Admin(AdminDashboard),
    Teacher(TeacherDashboard),
    Student(StudentDashboard),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_tag() {
        let json = serde_json::to_value(DashboardResponse::Teacher(TeacherDashboard {
            classes: 2,
            ..Default::default()
        }))
        .expect("serialize");
        assert_eq!(json["role"], "TEACHER");
        assert_eq!(json["classes"], 2);
    }
}
