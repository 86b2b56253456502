//! Checker loop scheduler
//!
//! One spawned task per signal checker. Each loop sleeps for its checker's
//! interval, runs one check, and repeats until shutdown; interval pacing is
//! "sleep then run", so a slow check delays only its own next tick and no
//! loop's timing depends on another's.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::alerts::AlertDispatcher;
use crate::checks::SignalChecker;

/// Runs each signal checker on its own independent interval loop.
pub struct Scheduler {
    dispatcher: Arc<AlertDispatcher>,
    handles: Vec<JoinHandle<()>>,
    shutdown_txs: Vec<mpsc::Sender<()>>,
}

impl Scheduler {
    /// Create a scheduler whose loops share one dispatch path.
    pub fn new(dispatcher: Arc<AlertDispatcher>) -> Self {
        Self {
            dispatcher,
            handles: Vec::new(),
            shutdown_txs: Vec::new(),
        }
    }

    /// Spawn one checker loop.
    ///
    /// Errors inside a check are handled by the checker itself; nothing a
    /// checker does can end its loop or touch a sibling's.
    pub fn spawn(&mut self, mut checker: Box<dyn SignalChecker>) {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        self.shutdown_txs.push(shutdown_tx);
        let dispatcher = Arc::clone(&self.dispatcher);

        let handle = tokio::spawn(async move {
            tracing::info!(
                checker = checker.name(),
                interval = ?checker.interval(),
                "Checker loop started"
            );

            loop {
                tokio::select! {
                    _ = sleep(checker.interval()) => {
                        if let Some(event) = checker.sample_and_evaluate().await {
                            let outcome = dispatcher.submit(event).await;
                            tracing::debug!(
                                checker = checker.name(),
                                ?outcome,
                                "Breach submitted"
                            );
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::info!(checker = checker.name(), "Checker loop stopped");
                        break;
                    }
                }
            }
        });
        self.handles.push(handle);
    }

    /// Number of running checker loops.
    pub fn running_loops(&self) -> usize {
        self.handles.len()
    }

    /// Signal every loop to stop and wait for them to finish. A loop that is
    /// mid-check completes that check first.
    pub async fn shutdown(self) {
        for tx in &self.shutdown_txs {
            let _ = tx.send(()).await;
        }
        futures::future::join_all(self.handles).await;
        tracing::info!("Scheduler shut down");
    }
}
