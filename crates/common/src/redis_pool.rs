use redis::Client;
use redis::aio::ConnectionManager;

/// Create the shared Redis connection manager.
///
/// One manager serves both the intake queue and the dead-letter list;
/// it reconnects transparently and clones cheaply across tasks.
pub async fn create_redis_pool(redis_url: &str) -> anyhow::Result<ConnectionManager> {
    let client = Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;

    tracing::info!("Connected to Redis");
    Ok(manager)
}
