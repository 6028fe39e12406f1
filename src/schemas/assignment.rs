use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::AssignmentFile;
use crate::db::types::AssignmentStatus;
use crate::repositories::assignments::AssignmentRow;
use crate::schemas::submission::SubmissionResponse;
use crate::services::statistics::SubmissionStatistics;

#[derive(Debug, Deserialize)]
pub(crate) struct AttachmentUpload {
    pub(crate) filename: String,
    #[serde(alias = "contentBase64")]
    pub(crate) content_base64: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentCreate {
    #[serde(alias = "subjectId")]
    pub(crate) subject_id: String,
    #[serde(alias = "groupName")]
    pub(crate) group_name: String,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    pub(crate) deadline: String,
    #[serde(alias = "maxScore")]
    pub(crate) max_score: i32,
    #[serde(default)]
    pub(crate) attachments: Vec<AttachmentUpload>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentResponse {
    pub(crate) id: String,
    pub(crate) subject_id: String,
    pub(crate) subject_name: String,
    pub(crate) teacher_id: String,
    pub(crate) teacher_name: String,
    pub(crate) group_name: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) deadline: String,
    pub(crate) max_score: i32,
    pub(crate) status: AssignmentStatus,
    pub(crate) created_at: String,
}

impl AssignmentResponse {
    pub(crate) fn from_row(row: AssignmentRow) -> Self {
        Self {
            id: row.id,
            subject_id: row.subject_id,
            subject_name: row.subject_name,
            teacher_id: row.teacher_id,
            teacher_name: row.teacher_name,
            group_name: row.group_name,
            title: row.title,
            description: row.description,
            deadline: format_primitive(row.deadline),
            max_score: row.max_score,
            status: row.status,
            created_at: format_primitive(row.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentFileResponse {
    pub(crate) id: String,
    pub(crate) file_name: String,
    pub(crate) file_path: String,
    pub(crate) created_at: String,
}

impl AssignmentFileResponse {
    pub(crate) fn from_db(file: AssignmentFile) -> Self {
        Self {
            id: file.id,
            file_name: file.file_name,
            file_path: file.file_path,
            created_at: format_primitive(file.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentDetailResponse {
    #[serde(flatten)]
    pub(crate) assignment: AssignmentResponse,
    pub(crate) files: Vec<AssignmentFileResponse>,
    pub(crate) submissions: Vec<SubmissionResponse>,
    pub(crate) statistics: SubmissionStatistics,
}
