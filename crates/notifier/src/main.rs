use std::sync::Arc;
use std::time::Duration;

use laudo_common::config::AppConfig;
use laudo_common::db;
use laudo_common::redis_pool::create_redis_pool;
use laudo_engine::escalator::{DeadLetterEscalator, FailureEscalator, TracingEscalator};
use laudo_engine::ledger::PgDeliveryLedger;
use laudo_engine::orchestrator::DeliveryOrchestrator;
use laudo_notifier::intake::EventIntake;
use laudo_providers::ProviderRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "laudo_notifier=info,laudo_engine=info".into()),
        )
        .json()
        .init();

    tracing::info!("LaudoRelay notifier starting...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Connect to database
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;

    // Run migrations
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    // Connect to Redis (event queue + dead-letter list)
    let redis = create_redis_pool(&config.redis_url).await?;

    // Resolve provider adapters once from configuration
    let registry = Arc::new(ProviderRegistry::from_config(&config)?);

    let ledger = Arc::new(PgDeliveryLedger::new(pool));
    // An empty dead-letter key disables the Redis sink; failures still
    // page through the structured log stream.
    let escalator: Arc<dyn FailureEscalator> = if config.dead_letter_key.is_empty() {
        Arc::new(TracingEscalator)
    } else {
        Arc::new(DeadLetterEscalator::new(
            redis.clone(),
            config.dead_letter_key.clone(),
        ))
    };

    let orchestrator = Arc::new(DeliveryOrchestrator::new(
        registry,
        ledger,
        escalator,
        config.max_delivery_attempts,
        Duration::from_secs(config.retry_backoff_seconds),
    ));

    let mut intake = EventIntake::new(redis, config.event_queue_key.clone(), orchestrator);

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        result = intake.run() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Event intake exited with error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("LaudoRelay notifier stopped.");
    Ok(())
}
