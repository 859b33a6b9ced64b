use sqlx::{Executor, Row};

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const SEED_CUSTOMER_COUNT: i64 = 4;
const SEED_RESERVATION_COUNT: i64 = 6;

/// Customers that appear in the top-by-reservation-count aggregate, in
/// expected order: customer 4 has no reservations and never appears.
const SEED_TOP_CUSTOMER_IDS: &[i64] = &[1, 2, 3];

/// Deterministic demo dataset for local development and integration tests.
pub struct DemoSeedDataset;

impl DemoSeedDataset {
    /// SQL fixture content for the demo dataset.
    pub const SQL: &str = include_str!("../../../config/fixtures/demo_seed_data.sql");

    /// Load the demo dataset. All-or-nothing: runs inside one transaction.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        tracing::info!(
            customers = SEED_CUSTOMER_COUNT,
            reservations = SEED_RESERVATION_COUNT,
            "demo seed dataset loaded"
        );
        Ok(SeedResult {
            customers_seeded: SEED_CUSTOMER_COUNT,
            reservations_seeded: SEED_RESERVATION_COUNT,
        })
    }

    /// Verify the seeded rows match the compiled-in contract.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let customer_count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM customers")
            .fetch_one(pool)
            .await?
            .try_get("count")?;
        checks.push(SeedCheck {
            name: "customer row count",
            passed: customer_count == SEED_CUSTOMER_COUNT,
            detail: format!("expected {SEED_CUSTOMER_COUNT}, found {customer_count}"),
        });

        let reservation_count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM reservations")
            .fetch_one(pool)
            .await?
            .try_get("count")?;
        checks.push(SeedCheck {
            name: "reservation row count",
            passed: reservation_count == SEED_RESERVATION_COUNT,
            detail: format!("expected {SEED_RESERVATION_COUNT}, found {reservation_count}"),
        });

        let orphan_count: i64 = sqlx::query(
            "SELECT COUNT(*) AS count
             FROM reservations
             LEFT JOIN customers ON customers.id = reservations.customer_id
             WHERE customers.id IS NULL",
        )
        .fetch_one(pool)
        .await?
        .try_get("count")?;
        checks.push(SeedCheck {
            name: "no orphaned reservations",
            passed: orphan_count == 0,
            detail: format!("found {orphan_count} reservations without a customer"),
        });

        let top_ids: Vec<i64> = sqlx::query(
            "SELECT customers.id AS id
             FROM customers
             JOIN reservations ON reservations.customer_id = customers.id
             GROUP BY customers.id
             ORDER BY COUNT(reservations.id) DESC, last_name, first_name",
        )
        .fetch_all(pool)
        .await?
        .iter()
        .map(|row| row.try_get("id"))
        .collect::<Result<_, _>>()?;
        checks.push(SeedCheck {
            name: "top customer ordering",
            passed: top_ids == SEED_TOP_CUSTOMER_IDS,
            detail: format!("expected {SEED_TOP_CUSTOMER_IDS:?}, found {top_ids:?}"),
        });

        let passed = checks.iter().all(|check| check.passed);
        Ok(VerificationResult { passed, checks })
    }
}

#[derive(Debug)]
pub struct SeedResult {
    pub customers_seeded: i64,
    pub reservations_seeded: i64,
}

#[derive(Debug)]
pub struct SeedCheck {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub passed: bool,
    pub checks: Vec<SeedCheck>,
}
