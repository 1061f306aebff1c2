use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::content::ResumeContent;

/// A saved resume. `owner_id` is fixed at creation; no update path touches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub template_id: i32,
    pub content: ResumeContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResume {
    pub name: String,
    pub owner_id: Uuid,
    pub template_id: i32,
    pub content: ResumeContent,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePatch {
    pub name: Option<String>,
    pub template_id: Option<i32>,
    pub content: Option<ResumeContent>,
}
