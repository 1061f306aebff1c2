use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeTemplate {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub thumbnail: String,
    /// Logic-less template source, stored verbatim.
    pub html_template: String,
    pub created_at: DateTime<Utc>,
}

/// A template to seed. Ids are fixed so seeding is idempotent.
#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub thumbnail: String,
    pub html_template: String,
}
