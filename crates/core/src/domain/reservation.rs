use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::customer::CustomerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReservationId(pub i64);

impl std::fmt::Display for ReservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A table booking for one customer. Follows the same transient/persisted
/// lifecycle as [`super::customer::Customer`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Option<ReservationId>,
    pub customer_id: CustomerId,
    pub num_guests: i64,
    pub start_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

impl Reservation {
    pub fn new(customer_id: CustomerId, num_guests: i64, start_at: DateTime<Utc>) -> Self {
        Self { id: None, customer_id, num_guests, start_at, notes: String::new() }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}
