//! Closed Day Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// A day the venue does not take bookings (闭店日)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedDay {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// "YYYY-MM-DD", unique
    pub date: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}
