//! Booking Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Booking ID type
pub type BookingId = RecordId;

/// Booking entity (预订)
///
/// Wire/storage format uses camelCase field names (`partySize`,
/// `specialRequests`) for compatibility with the dashboard frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<BookingId>,
    /// Guest name
    pub name: String,
    /// Guest contact email (confirmation goes here)
    pub email: String,
    /// Calendar day, "YYYY-MM-DD"
    pub date: String,
    /// Starting slot label, "HH:MM"
    pub time: String,
    pub party_size: u32,
    #[serde(default)]
    pub special_requests: Option<String>,
    /// Whether the party has shown up (toggled by staff)
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub arrived: bool,
    /// Short confirmation code quoted in the email
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub created_at: i64,
}

impl Booking {
    /// Record key as string ("booking:xxx"), empty if unsaved
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }
}
