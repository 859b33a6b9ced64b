use async_trait::async_trait;
use thiserror::Error;

use tably_core::domain::customer::{Customer, CustomerId};
use tably_core::domain::reservation::Reservation;

pub mod customer;
pub mod reservation;

pub use customer::SqlCustomerRepository;
pub use reservation::SqlReservationRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No row matched the requested id. Routing layers conventionally render
    /// this as a 404.
    #[error("no such {entity}: {id}")]
    NotFound { entity: &'static str, id: i64 },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl RepositoryError {
    pub fn customer_not_found(id: CustomerId) -> Self {
        Self::NotFound { entity: "customer", id: id.0 }
    }

    pub fn reservation_not_found(id: i64) -> Self {
        Self::NotFound { entity: "reservation", id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status the calling layer should map this error to.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidRecord(_) => 422,
            Self::Database(_) | Self::Decode(_) => 500,
        }
    }
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Every customer, ordered by `(last_name, first_name)` ascending.
    async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// The customer with the given id, or [`RepositoryError::NotFound`].
    async fn find_by_id(&self, id: CustomerId) -> Result<Customer, RepositoryError>;

    /// Customers whose full name contains `query` as a case-insensitive
    /// substring, ordered like [`Self::list_all`]. Wildcard characters in
    /// `query` match themselves literally.
    async fn search(&self, query: &str) -> Result<Vec<Customer>, RepositoryError>;

    /// Up to `limit` customers with at least one reservation, most
    /// reservations first. Ties are broken by `(last_name, first_name)`;
    /// the aggregate itself does not promise any particular order among
    /// equal counts.
    async fn top_by_reservation_count(&self, limit: u32)
        -> Result<Vec<Customer>, RepositoryError>;

    /// Reservations for the customer, delegated to the reservation store.
    /// A transient customer has no stored reservations.
    async fn reservations_for(
        &self,
        customer: &Customer,
    ) -> Result<Vec<Reservation>, RepositoryError>;

    /// Insert a transient customer (writing the generated id back) or
    /// update all mutable fields of a persisted one. An update whose id no
    /// longer exists fails with [`RepositoryError::NotFound`].
    async fn save(&self, customer: &mut Customer) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Reservations for one customer, earliest `start_at` first.
    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Reservation>, RepositoryError>;

    /// Same insert-or-update contract as [`CustomerRepository::save`].
    async fn save(&self, reservation: &mut Reservation) -> Result<(), RepositoryError>;
}
