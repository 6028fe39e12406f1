use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::repositories::submissions::SubmissionRow;
use crate::schemas::assignment::AttachmentUpload;

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionCreate {
    #[serde(default)]
    #[serde(alias = "solutionText")]
    pub(crate) solution_text: Option<String>,
    #[serde(default)]
    pub(crate) file: Option<AttachmentUpload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GradeRequest {
    pub(crate) score: i32,
    #[serde(default)]
    pub(crate) feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: String,
    pub(crate) assignment_id: String,
    pub(crate) assignment_title: String,
    pub(crate) assignment_deadline: String,
    pub(crate) subject_name: String,
    pub(crate) group_name: String,
    pub(crate) max_score: i32,
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) file_path: Option<String>,
    pub(crate) solution_text: Option<String>,
    pub(crate) submitted_at: String,
    pub(crate) is_late: bool,
    pub(crate) score: Option<i32>,
    pub(crate) feedback: Option<String>,
    pub(crate) graded_at: Option<String>,
}

impl SubmissionResponse {
    pub(crate) fn from_row(row: SubmissionRow) -> Self {
        Self {
            id: row.id,
            assignment_id: row.assignment_id,
            assignment_title: row.assignment_title,
            assignment_deadline: format_primitive(row.assignment_deadline),
            subject_name: row.subject_name,
            group_name: row.group_name,
            max_score: row.max_score,
            student_id: row.student_id,
            student_name: row.student_name,
            file_path: row.file_path,
            solution_text: row.solution_text,
            submitted_at: format_primitive(row.submitted_at),
            is_late: row.is_late,
            score: row.score,
            feedback: row.feedback,
            graded_at: row.graded_at.map(format_primitive),
        }
    }
}
