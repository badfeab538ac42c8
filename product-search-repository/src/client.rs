//! Search client manager.
//!
//! Owns the single, lazily established connection to the search engine.
//! Application code shares one `ClientManager` (usually behind an `Arc`) and
//! asks it for the engine handle.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, instrument, warn};

use crate::config::EngineConfig;
use crate::errors::SearchError;
use crate::interfaces::{EngineConnector, SearchEngine};

/// Manages the lifecycle of the search engine connection.
///
/// The first successful [`acquire`](Self::acquire) opens and health-checks the
/// connection; every later call returns the same handle. Concurrent first
/// callers are serialized on `init` so only one connect sequence runs.
/// The retry loop runs outside `handle`, so readers never wait on it.
pub struct ClientManager {
    connector: Arc<dyn EngineConnector>,
    config: EngineConfig,
    handle: RwLock<Option<Arc<dyn SearchEngine>>>,
    init: Mutex<()>,
}

impl ClientManager {
    /// Create a manager. No connection is opened until [`acquire`](Self::acquire).
    ///
    /// # Arguments
    ///
    /// * `connector` - Builds engine handles for the configured endpoint
    /// * `config` - Endpoint, request timeout and retry loop bounds
    pub fn new(connector: Arc<dyn EngineConnector>, config: EngineConfig) -> Self {
        Self {
            connector,
            config,
            handle: RwLock::new(None),
            init: Mutex::new(()),
        }
    }

    /// Return the connected engine, connecting and probing it first if needed.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<dyn SearchEngine>)` - The shared, live engine handle
    /// * `Err(SearchError::EngineUnavailable)` - The engine never answered the
    ///   health check; nothing is cached and a later call tries again
    pub async fn acquire(&self) -> Result<Arc<dyn SearchEngine>, SearchError> {
        if let Some(engine) = self.current().await {
            return Ok(engine);
        }

        let _init = self.init.lock().await;
        // Another caller may have connected while we waited for the init guard.
        if let Some(engine) = self.current().await {
            return Ok(engine);
        }

        let engine = self.connect().await?;
        *self.handle.write().await = Some(Arc::clone(&engine));
        Ok(engine)
    }

    /// Return the engine if a connection is already established.
    ///
    /// Never connects; request paths use this so they cannot block on the
    /// retry loop.
    pub async fn current(&self) -> Option<Arc<dyn SearchEngine>> {
        self.handle.read().await.clone()
    }

    /// Whether a connection is currently established.
    pub async fn is_connected(&self) -> bool {
        self.handle.read().await.is_some()
    }

    /// Drop the connection. Safe to call when not connected.
    pub async fn release(&self) {
        if self.handle.write().await.take().is_some() {
            info!(url = %self.config.url, "Released search engine connection");
        }
    }

    #[instrument(skip(self), fields(url = %self.config.url))]
    async fn connect(&self) -> Result<Arc<dyn SearchEngine>, SearchError> {
        let engine = self.connector.connect(&self.config).await?;
        let attempts = self.config.connect_attempts;

        for attempt in 1..=attempts {
            info!(attempt, attempts, "Pinging search engine");

            match engine.ping().await {
                Ok(true) => {
                    info!(attempt, "Connected to search engine");
                    return Ok(engine);
                }
                Ok(false) => warn!(attempt, attempts, "Search engine ping was not acknowledged"),
                Err(e) => warn!(attempt, attempts, error = %e, "Search engine ping failed"),
            }

            if attempt < attempts {
                tokio::time::sleep(self.config.connect_delay).await;
            }
        }

        error!(attempts, "Search engine unavailable, giving up");
        Err(SearchError::engine_unavailable(format!(
            "No response from {} after {} attempts",
            self.config.url, attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryConnector, MemoryEngine};
    use std::time::Duration;

    fn manager(engine: Arc<MemoryEngine>) -> (ClientManager, Arc<MemoryConnector>) {
        let connector = Arc::new(MemoryConnector::new(engine));
        let manager = ClientManager::new(connector.clone(), EngineConfig::default());
        (manager, connector)
    }

    #[tokio::test]
    async fn test_acquire_connects_once() {
        let engine = Arc::new(MemoryEngine::new());
        let (manager, connector) = manager(engine.clone());

        assert!(!manager.is_connected().await);
        manager.acquire().await.unwrap();
        manager.acquire().await.unwrap();

        assert!(manager.is_connected().await);
        assert_eq!(connector.connect_calls(), 1);
        assert_eq!(engine.ping_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_retries_until_ping_succeeds() {
        let engine = Arc::new(MemoryEngine::new());
        engine.fail_pings(3);
        let (manager, _) = manager(engine.clone());

        let started = tokio::time::Instant::now();
        manager.acquire().await.unwrap();

        assert_eq!(engine.ping_calls(), 4);
        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_gives_up_after_all_attempts() {
        let engine = Arc::new(MemoryEngine::new());
        engine.set_reachable(false);
        let (manager, _) = manager(engine.clone());

        let started = tokio::time::Instant::now();
        let err = match manager.acquire().await {
            Err(e) => e,
            Ok(_) => panic!("expected acquisition to fail"),
        };

        assert!(matches!(err, SearchError::EngineUnavailable(_)));
        assert_eq!(engine.ping_calls(), 10);
        // Nine sleeps between ten attempts.
        assert_eq!(started.elapsed(), Duration::from_secs(45));
        assert!(!manager.is_connected().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_acquire_is_not_cached() {
        let engine = Arc::new(MemoryEngine::new());
        engine.set_reachable(false);
        let (manager, connector) = manager(engine.clone());

        assert!(manager.acquire().await.is_err());

        engine.set_reachable(true);
        assert!(manager.acquire().await.is_ok());
        assert_eq!(connector.connect_calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_acquire_shares_one_connection() {
        let engine = Arc::new(MemoryEngine::new());
        let (manager, connector) = manager(engine);
        let manager = Arc::new(manager);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                tokio::spawn(async move { manager.acquire().await.is_ok() })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap());
        }
        assert_eq!(connector.connect_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_readers_do_not_wait_for_connection_attempts() {
        let engine = Arc::new(MemoryEngine::new());
        engine.set_reachable(false);
        let (manager, _) = manager(engine.clone());
        let manager = Arc::new(manager);

        let pending = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.acquire().await.is_ok() })
        };
        tokio::time::sleep(Duration::from_secs(12)).await;

        let asked = tokio::time::Instant::now();
        assert!(manager.current().await.is_none());
        assert!(!manager.is_connected().await);
        assert_eq!(asked.elapsed(), Duration::ZERO);

        engine.set_reachable(true);
        assert!(pending.await.unwrap());
        assert!(manager.current().await.is_some());
    }

    #[tokio::test]
    async fn test_current_never_connects() {
        let engine = Arc::new(MemoryEngine::new());
        let (manager, connector) = manager(engine);

        assert!(manager.current().await.is_none());
        assert_eq!(connector.connect_calls(), 0);

        manager.acquire().await.unwrap();
        assert!(manager.current().await.is_some());
    }

    #[tokio::test]
    async fn test_release_is_idempotent_and_allows_reconnect() {
        let engine = Arc::new(MemoryEngine::new());
        let (manager, connector) = manager(engine);

        manager.acquire().await.unwrap();
        manager.release().await;
        manager.release().await;
        assert!(!manager.is_connected().await);

        manager.acquire().await.unwrap();
        assert!(manager.is_connected().await);
        assert_eq!(connector.connect_calls(), 2);
    }
}
