//! Pure authorization predicates over a user and a resource. Handlers consult
//! these before exposing or mutating anything and map a `false` to a 403,
//! never to an empty result.

use crate::db::models::{Assignment, User};
use crate::db::types::UserRole;

/// Admins see everything; teachers see their own assignments; students see
/// assignments addressed to their group.
pub(crate) fn can_view(user: &User, assignment: &Assignment) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Teacher => assignment.teacher_id == user.id,
        UserRole::Student => {
            user.group_name.as_deref() == Some(assignment.group_name.as_str())
        }
    }
}

/// Grading is reserved for the teacher who owns the assignment; not even an
/// admin may grade on their behalf.
pub(crate) fn can_grade(user: &User, assignment: &Assignment) -> bool {
    assignment.teacher_id == user.id
}

pub(crate) fn can_submit(user: &User, assignment: &Assignment) -> bool {
    user.role == UserRole::Student
        && user.group_name.as_deref() == Some(assignment.group_name.as_str())
}

/// Who may manage (delete) an assignment: the owning teacher or an admin.
pub(crate) fn can_manage(user: &User, assignment: &Assignment) -> bool {
    user.role == UserRole::Admin || assignment.teacher_id == user.id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use crate::db::types::AssignmentStatus;

    fn user(id: &str, role: UserRole, group: Option<&str>) -> User {
        let now = primitive_now_utc();
        User {
            id: id.to_string(),
            username: format!("user-{id}"),
            email: format!("{id}@example.com"),
            hashed_password: String::new(),
            full_name: "Test User".to_string(),
            role,
            group_name: group.map(str::to_string),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn assignment(teacher_id: &str, group: &str) -> Assignment {
        let now = primitive_now_utc();
        Assignment {
            id: "a1".to_string(),
            subject_id: "subj1".to_string(),
            teacher_id: teacher_id.to_string(),
            group_name: group.to_string(),
            title: "Title".to_string(),
            description: None,
            deadline: now,
            max_score: 100,
            status: AssignmentStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn admin_can_view_anything() {
        let admin = user("u1", UserRole::Admin, None);
        assert!(can_view(&admin, &assignment("t9", "G-101")));
    }

    #[test]
    fn teacher_views_only_own_assignments() {
        let teacher = user("t1", UserRole::Teacher, None);
        assert!(can_view(&teacher, &assignment("t1", "G-101")));
        assert!(!can_view(&teacher, &assignment("t2", "G-101")));
    }

    #[test]
    fn student_views_only_group_assignments() {
        let student = user("s1", UserRole::Student, Some("G-101"));
        assert!(can_view(&student, &assignment("t1", "G-101")));
        assert!(!can_view(&student, &assignment("t1", "G-202")));
    }

    #[test]
    fn student_without_group_views_nothing() {
        let student = user("s1", UserRole::Student, None);
        assert!(!can_view(&student, &assignment("t1", "G-101")));
    }

    #[test]
    fn only_owning_teacher_can_grade() {
        let owner = user("t1", UserRole::Teacher, None);
        let other = user("t2", UserRole::Teacher, None);
        let admin = user("u1", UserRole::Admin, None);
        let target = assignment("t1", "G-101");

        assert!(can_grade(&owner, &target));
        assert!(!can_grade(&other, &target));
        assert!(!can_grade(&admin, &target));
    }

    #[test]
    fn only_group_students_can_submit() {
        let in_group = user("s1", UserRole::Student, Some("G-101"));
        let out_of_group = user("s2", UserRole::Student, Some("G-202"));
        let no_group = user("s3", UserRole::Student, None);
        let teacher = user("t1", UserRole::Teacher, Some("G-101"));
        let target = assignment("t1", "G-101");

        assert!(can_submit(&in_group, &target));
        assert!(!can_submit(&out_of_group, &target));
        assert!(!can_submit(&no_group, &target));
        assert!(!can_submit(&teacher, &target));
    }

    #[test]
    fn owner_or_admin_can_manage() {
        let owner = user("t1", UserRole::Teacher, None);
        let other = user("t2", UserRole::Teacher, None);
        let admin = user("u1", UserRole::Admin, None);
        let target = assignment("t1", "G-101");

        assert!(can_manage(&owner, &target));
        assert!(!can_manage(&other, &target));
        assert!(can_manage(&admin, &target));
    }
}
