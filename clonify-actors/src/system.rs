//! Task tracking and shutdown signalling shared by every actor in a process.
//!
//! Actors subscribe to one broadcast channel for cooperative shutdown; a
//! `JoinSet` holds their tasks so teardown can wait for each to finish and
//! surface the first error.
use anyhow::Result;
use tokio::{sync::broadcast, task::JoinSet};

/// Cloneable trigger for a process-wide shutdown.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: broadcast::Sender<()>,
}

impl ShutdownHandle {
    pub fn signal(&self) {
        let _ = self.tx.send(());
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}

pub struct ActorSystem {
    joinset: JoinSet<Result<()>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Default for ActorSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorSystem {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);
        Self {
            joinset: JoinSet::new(),
            shutdown_tx,
        }
    }

    pub fn shutdown_notifier(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    pub fn track(&mut self, fut: impl std::future::Future<Output = Result<()>> + Send + 'static) {
        self.joinset.spawn(fut);
    }

    pub fn tracked(&self) -> usize {
        self.joinset.len()
    }

    /// Signal shutdown and wait for every tracked task.
    pub async fn graceful_shutdown(mut self) -> Result<()> {
        let _ = self.shutdown_tx.send(());
        while let Some(res) = self.joinset.join_next().await {
            res??;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_waits_for_subscribers() {
        let mut sys = ActorSystem::new();
        let mut rx = sys.shutdown_notifier();
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        sys.track(async move {
            let _ = rx.recv().await;
            let _ = done_tx.send(());
            Ok(())
        });
        assert_eq!(sys.tracked(), 1);
        sys.graceful_shutdown().await.unwrap();
        done_rx.await.unwrap();
    }

    #[tokio::test]
    async fn task_error_surfaces_on_shutdown() {
        let mut sys = ActorSystem::new();
        sys.track(async { anyhow::bail!("render failed") });
        let err = sys.graceful_shutdown().await.unwrap_err();
        assert!(err.to_string().contains("render failed"));
    }

    #[tokio::test]
    async fn handle_reaches_every_subscriber() {
        let sys = ActorSystem::new();
        let handle = sys.shutdown_handle();
        let mut a = handle.subscribe();
        let mut b = sys.shutdown_notifier();
        handle.signal();
        a.recv().await.unwrap();
        b.recv().await.unwrap();
    }
}
