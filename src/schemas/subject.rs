use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Subject;

#[derive(Debug, Deserialize)]
pub(crate) struct SubjectCreate {
    pub(crate) name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) created_at: String,
}

impl SubjectResponse {
    pub(crate) fn from_db(subject: Subject) -> Self {
        Self {
            id: subject.id,
            name: subject.name,
            created_at: format_primitive(subject.created_at),
        }
    }
}
