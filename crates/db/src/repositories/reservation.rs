use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use tably_core::chrono::{DateTime, Utc};
use tably_core::domain::customer::CustomerId;
use tably_core::domain::reservation::{Reservation, ReservationId};

use super::{RepositoryError, ReservationRepository};
use crate::DbPool;

pub struct SqlReservationRepository {
    pool: DbPool,
}

impl SqlReservationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for SqlReservationRepository {
    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, num_guests, start_at, notes
            FROM reservations
            WHERE customer_id = ?
            ORDER BY start_at
            "#,
        )
        .bind(customer_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(reservation_from_row).collect()
    }

    async fn save(&self, reservation: &mut Reservation) -> Result<(), RepositoryError> {
        if reservation.num_guests < 1 {
            return Err(RepositoryError::InvalidRecord(
                "num_guests must be at least 1".to_string(),
            ));
        }

        match reservation.id {
            None => {
                let row = sqlx::query(
                    r#"
                    INSERT INTO reservations (customer_id, num_guests, start_at, notes)
                    VALUES (?, ?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(reservation.customer_id.0)
                .bind(reservation.num_guests)
                .bind(reservation.start_at.to_rfc3339())
                .bind(&reservation.notes)
                .fetch_one(&self.pool)
                .await?;

                let id: i64 = row.try_get("id")?;
                reservation.id = Some(ReservationId(id));
                tracing::debug!(reservation_id = id, "inserted reservation");
            }
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE reservations
                    SET customer_id = ?, num_guests = ?, start_at = ?, notes = ?
                    WHERE id = ?
                    "#,
                )
                .bind(reservation.customer_id.0)
                .bind(reservation.num_guests)
                .bind(reservation.start_at.to_rfc3339())
                .bind(&reservation.notes)
                .bind(id.0)
                .execute(&self.pool)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(RepositoryError::reservation_not_found(id.0));
                }
                tracing::debug!(reservation_id = id.0, "updated reservation");
            }
        }

        Ok(())
    }
}

fn reservation_from_row(row: &SqliteRow) -> Result<Reservation, RepositoryError> {
    Ok(Reservation {
        id: Some(ReservationId(row.try_get("id")?)),
        customer_id: CustomerId(row.try_get("customer_id")?),
        num_guests: row.try_get("num_guests")?,
        start_at: parse_rfc3339("reservation start_at", &row.try_get::<String, _>("start_at")?)?,
        notes: row.try_get("notes")?,
    })
}

fn parse_rfc3339(field: &str, raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| RepositoryError::Decode(format!("invalid {field}: {err}")))
}
