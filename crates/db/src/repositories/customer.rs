use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use tably_core::domain::customer::{Customer, CustomerId};
use tably_core::domain::reservation::Reservation;

use super::{CustomerRepository, RepositoryError, ReservationRepository};
use crate::DbPool;

/// Default row cap for [`CustomerRepository::top_by_reservation_count`].
pub const DEFAULT_TOP_LIMIT: u32 = 10;

pub struct SqlCustomerRepository {
    pool: DbPool,
    reservations: Arc<dyn ReservationRepository>,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool, reservations: Arc<dyn ReservationRepository>) -> Self {
        Self { pool, reservations }
    }
}

#[async_trait]
impl CustomerRepository for SqlCustomerRepository {
    async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, first_name, last_name, phone, notes
            FROM customers
            ORDER BY last_name, first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(customer_from_row).collect()
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Customer, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, phone, notes
            FROM customers
            WHERE id = ?
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => customer_from_row(&row),
            None => Err(RepositoryError::customer_not_found(id)),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<Customer>, RepositoryError> {
        // LIKE is case-insensitive under SQLite's default NOCASE folding.
        // The pattern is always a bound parameter, with user-supplied
        // wildcard characters escaped so they only match themselves.
        let rows = sqlx::query(
            r#"
            SELECT id, first_name, last_name, phone, notes
            FROM customers
            WHERE (first_name || ' ' || last_name) LIKE ? ESCAPE '\'
            ORDER BY last_name, first_name
            "#,
        )
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(customer_from_row).collect()
    }

    async fn top_by_reservation_count(
        &self,
        limit: u32,
    ) -> Result<Vec<Customer>, RepositoryError> {
        // Inner join: customers without reservations never appear. Equal
        // counts fall back to name order so the result is deterministic.
        let rows = sqlx::query(
            r#"
            SELECT customers.id, first_name, last_name, phone, customers.notes,
                   COUNT(reservations.id) AS reservation_count
            FROM customers
            JOIN reservations ON reservations.customer_id = customers.id
            GROUP BY customers.id, first_name, last_name, phone, customers.notes
            ORDER BY reservation_count DESC, last_name, first_name
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(customer_from_row).collect()
    }

    async fn reservations_for(
        &self,
        customer: &Customer,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        match customer.id {
            Some(id) => self.reservations.list_for_customer(id).await,
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, customer: &mut Customer) -> Result<(), RepositoryError> {
        validate_customer(customer)?;

        match customer.id {
            None => {
                let row = sqlx::query(
                    r#"
                    INSERT INTO customers (first_name, last_name, phone, notes)
                    VALUES (?, ?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(&customer.first_name)
                .bind(&customer.last_name)
                .bind(&customer.phone)
                .bind(&customer.notes)
                .fetch_one(&self.pool)
                .await?;

                let id: i64 = row.try_get("id")?;
                customer.id = Some(CustomerId(id));
                tracing::debug!(customer_id = id, "inserted customer");
            }
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE customers
                    SET first_name = ?, last_name = ?, phone = ?, notes = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&customer.first_name)
                .bind(&customer.last_name)
                .bind(&customer.phone)
                .bind(&customer.notes)
                .bind(id.0)
                .execute(&self.pool)
                .await?;

                // The row may have been deleted out from under us; surface
                // that instead of reporting a write that went nowhere.
                if result.rows_affected() == 0 {
                    return Err(RepositoryError::customer_not_found(id));
                }
                tracing::debug!(customer_id = id.0, "updated customer");
            }
        }

        Ok(())
    }
}

fn validate_customer(customer: &Customer) -> Result<(), RepositoryError> {
    if customer.first_name.trim().is_empty() {
        return Err(RepositoryError::InvalidRecord("first_name must not be blank".to_string()));
    }
    if customer.last_name.trim().is_empty() {
        return Err(RepositoryError::InvalidRecord("last_name must not be blank".to_string()));
    }
    Ok(())
}

fn customer_from_row(row: &SqliteRow) -> Result<Customer, RepositoryError> {
    Ok(Customer {
        id: Some(CustomerId(row.try_get("id")?)),
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        phone: row.try_get("phone")?,
        notes: row.try_get("notes")?,
    })
}

/// Wrap `query` in `%...%`, escaping LIKE metacharacters so they match
/// literally. Pairs with the `ESCAPE '\'` clause above.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
