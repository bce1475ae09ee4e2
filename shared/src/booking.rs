//! Booking and closed-day DTOs shared between server and client
//!
//! Wire format note: booking payloads use camelCase field names
//! (`partySize`, `specialRequests`) to stay compatible with the existing
//! dashboard frontend. Dates travel as "YYYY-MM-DD" strings, times as
//! "HH:MM" slot labels; both are validated server-side.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Customer booking request (public endpoint)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreate {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    /// Calendar day, "YYYY-MM-DD"
    pub date: String,
    /// Slot label, "HH:MM"; must be on the service-day grid
    pub time: String,
    #[validate(range(min = 1, message = "party size must be at least 1"))]
    pub party_size: u32,
    #[validate(length(max = 500, message = "special requests too long"))]
    pub special_requests: Option<String>,
}

/// Partial booking update (admin endpoint)
///
/// Absent fields are left unchanged, mirroring the dashboard's PUT behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub party_size: Option<u32>,
    pub special_requests: Option<String>,
    pub arrived: Option<bool>,
}

/// Arrival status update; `None` toggles the current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArrivedUpdate {
    pub arrived: Option<bool>,
}

/// Mark a day as closed (admin endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedDayCreate {
    /// "YYYY-MM-DD"
    pub date: String,
    pub note: Option<String>,
}

/// Closed day as returned by the public listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedDayView {
    pub date: String,
    pub note: Option<String>,
}

/// Date-bounded query for the closed-day listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClosedDayQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_create_accepts_valid_payload() {
        let req = BookingCreate {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            date: "2025-10-03".into(),
            time: "12:00".into(),
            party_size: 4,
            special_requests: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_booking_create_rejects_bad_email_and_zero_party() {
        let req = BookingCreate {
            name: "Ada".into(),
            email: "not-an-email".into(),
            date: "2025-10-03".into(),
            time: "12:00".into(),
            party_size: 0,
            special_requests: None,
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("email"));
        assert!(err.field_errors().contains_key("party_size"));
    }

    #[test]
    fn test_booking_create_wire_format_is_camel_case() {
        let json = r#"{
            "name": "Ada",
            "email": "ada@example.com",
            "date": "2025-10-03",
            "time": "12:00",
            "partySize": 4,
            "specialRequests": "window seat"
        }"#;
        let req: BookingCreate = serde_json::from_str(json).unwrap();
        assert_eq!(req.party_size, 4);
        assert_eq!(req.special_requests.as_deref(), Some("window seat"));

        let out = serde_json::to_string(&req).unwrap();
        assert!(out.contains("\"partySize\":4"));
    }
}
