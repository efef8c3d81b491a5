use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

/// Review left after a completed transaction. Only looked up here to tell
/// the post owner whether their completed post already has one.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub post_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub created_at: Option<NaiveDateTime>,
}
