//! Delivery ledger — durable append-only store of delivery attempts.
//!
//! The ledger is a passive store: the orchestrator exclusively owns row
//! creation, and every append completes before the retry loop moves on,
//! so a crash mid-loop leaves a consistent partial history. Reading the
//! ledger (compliance queries, pagination) belongs to the audit
//! collaborator, not to this service.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use laudo_common::error::AppError;
use laudo_common::types::DeliveryAttempt;

/// Append-only sink for delivery attempts.
#[async_trait]
pub trait DeliveryLedger: Send + Sync {
    /// Durably record one attempt. Must not batch or defer: the row is
    /// on disk when this returns. A failed append is fatal for the run —
    /// without the audit row the delivery must not proceed.
    async fn append(&self, attempt: &DeliveryAttempt) -> Result<(), AppError>;
}

/// PostgreSQL-backed ledger writing to `delivery_attempts`.
pub struct PgDeliveryLedger {
    pool: PgPool,
}

impl PgDeliveryLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeliveryLedger for PgDeliveryLedger {
    async fn append(&self, attempt: &DeliveryAttempt) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO delivery_attempts
                (id, exam_id, channel, recipient, attempt, status, message_id, error_message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&attempt.exam_id)
        .bind(attempt.channel.to_string())
        .bind(&attempt.recipient)
        .bind(attempt.attempt)
        .bind(attempt.status.to_string())
        .bind(&attempt.message_id)
        .bind(&attempt.error_message)
        .bind(attempt.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
