//! Booking Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::capacity::BookingFootprint;
use crate::db::models::Booking;
use crate::utils::time;
use shared::booking::{BookingCreate, BookingUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "booking";

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all bookings, newest service day first
    pub async fn find_all(&self) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking ORDER BY date DESC, time ASC")
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Find all bookings made under a guest email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE email = $email ORDER BY date DESC, time ASC")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Find every booking on a service day (ordering irrelevant to the
    /// admission check)
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE date = $date")
            .bind(("date", date.to_string()))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Same-day bookings projected to what the capacity checker needs
    pub async fn find_footprints_by_date(&self, date: &str) -> RepoResult<Vec<BookingFootprint>> {
        let bookings = self.find_by_date(date).await?;
        Ok(bookings
            .into_iter()
            .map(|b| BookingFootprint {
                id: b.id.as_ref().map(|t| t.to_string()),
                time: b.time,
                party_size: b.party_size,
            })
            .collect())
    }

    /// Find booking by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let booking: Option<Booking> = self.base.db().select(thing).await?;
        Ok(booking)
    }

    /// Create a new booking
    pub async fn create(&self, data: BookingCreate) -> RepoResult<Booking> {
        let booking = Booking {
            id: None,
            name: data.name,
            email: data.email,
            date: data.date,
            time: data.time,
            party_size: data.party_size,
            special_requests: data.special_requests,
            arrived: false,
            reference: new_reference(),
            created_at: time::now_millis(),
        };

        let created: Option<Booking> = self.base.db().create(TABLE).content(booking).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    /// Partial update; absent fields keep their current values
    pub async fn update(&self, id: &str, data: BookingUpdate) -> RepoResult<Booking> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))?;

        let name = data.name.unwrap_or(existing.name);
        let email = data.email.unwrap_or(existing.email);
        let date = data.date.unwrap_or(existing.date);
        let slot = data.time.unwrap_or(existing.time);
        let party_size = data.party_size.unwrap_or(existing.party_size);
        let special_requests = data.special_requests.or(existing.special_requests);
        let arrived = data.arrived.unwrap_or(existing.arrived);

        self.base
            .db()
            .query(
                "UPDATE $thing SET name = $name, email = $email, date = $date, time = $slot, \
                 partySize = $party_size, specialRequests = $special_requests, arrived = $arrived",
            )
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("email", email))
            .bind(("date", date))
            .bind(("slot", slot))
            .bind(("party_size", party_size))
            .bind(("special_requests", special_requests))
            .bind(("arrived", arrived))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }

    /// Set the arrival flag; `None` toggles the current value
    pub async fn set_arrived(&self, id: &str, arrived: Option<bool>) -> RepoResult<Booking> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))?;

        let new_value = arrived.unwrap_or(!existing.arrived);

        self.base
            .db()
            .query("UPDATE $thing SET arrived = $arrived")
            .bind(("thing", thing))
            .bind(("arrived", new_value))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }

    /// Hard delete a booking
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if self.find_by_id(id).await?.is_none() {
            return Ok(false);
        }
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}

/// Short human-quotable confirmation code ("BK-3FA9C12B")
fn new_reference() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("BK-{}", id[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_shape() {
        let a = new_reference();
        let b = new_reference();
        assert!(a.starts_with("BK-"));
        assert_eq!(a.len(), 11);
        assert_ne!(a, b);
    }
}
