use crate::settings::SurrealSettings;
use std::time::Duration;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;

/// Default number of connection retry attempts
const DEFAULT_RETRY_ATTEMPTS: u32 = 5;
/// Default delay between retry attempts in seconds
const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

pub async fn surreal_connect(settings: &SurrealSettings) -> anyhow::Result<Surreal<Any>> {
    surreal_connect_with_retries(settings, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_SECS).await
}

/// Connect to SurrealDB with configurable retries.
///
/// Retries cover servers that are still starting up. The embedded `mem://`
/// engine is connected once without authentication.
pub async fn surreal_connect_with_retries(
    settings: &SurrealSettings,
    max_retries: u32,
    retry_delay_secs: u64,
) -> anyhow::Result<Surreal<Any>> {
    // Convert http:// to ws:// for WebSocket connection
    let endpoint = settings
        .url
        .replace("http://", "ws://")
        .replace("https://", "wss://");

    tracing::debug!(
        "Connecting to SurrealDB at {} (namespace: {}, database: {})",
        endpoint,
        settings.namespace,
        settings.database
    );

    let attempts = if settings.is_embedded() {
        1
    } else {
        max_retries.max(1)
    };
    let mut last_error = anyhow::anyhow!("no connection attempt made");

    for attempt in 1..=attempts {
        match try_connect(&endpoint, settings).await {
            Ok(surreal) => {
                if attempt > 1 {
                    tracing::info!(
                        "Successfully connected to SurrealDB after {} attempts",
                        attempt
                    );
                }
                return Ok(surreal);
            }
            Err(e) => {
                if attempt < attempts {
                    tracing::warn!(
                        "Failed to connect to SurrealDB at '{}' (attempt {}/{}): {}. Retrying in {}s...",
                        endpoint,
                        attempt,
                        attempts,
                        e,
                        retry_delay_secs
                    );
                    tokio::time::sleep(Duration::from_secs(retry_delay_secs)).await;
                }
                last_error = e;
            }
        }
    }

    Err(anyhow::anyhow!(
        "Failed to connect to SurrealDB at '{}' after {} attempts. Last error: {}",
        endpoint,
        attempts,
        last_error
    ))
}

/// Attempt a single connection to SurrealDB.
async fn try_connect(endpoint: &str, settings: &SurrealSettings) -> anyhow::Result<Surreal<Any>> {
    let surreal = surrealdb::engine::any::connect(endpoint)
        .await
        .map_err(|e| anyhow::anyhow!("SurrealDB connection to '{endpoint}' failed: {e}"))?;

    if !settings.is_embedded() {
        let username = &settings.user;
        surreal
            .signin(surrealdb::opt::auth::Root {
                username,
                password: &settings.password,
            })
            .await
            .map_err(|e| {
                anyhow::anyhow!("SurrealDB authentication failed (user: '{username}'): {e}")
            })?;
    }

    let (ns, db) = (&settings.namespace, &settings.database);
    surreal.use_ns(ns).use_db(db).await.map_err(|e| {
        anyhow::anyhow!("SurrealDB failed to select namespace '{ns}' / database '{db}': {e}")
    })?;

    Ok(surreal)
}
