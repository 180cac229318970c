//! Shutdown coordination for the registry server.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Long-running tasks subscribe and await [`Shutdown::signalled`] on their receiver.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Wake every subscriber. Idempotent.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Resolve when `rx` observes a trigger or every sender is gone.
    pub async fn signalled(mut rx: broadcast::Receiver<()>) {
        // Lagged still means a trigger happened.
        let _ = rx.recv().await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_wakes_subscribers() {
        let shutdown = Shutdown::new();
        let a = tokio::spawn(Shutdown::signalled(shutdown.subscribe()));
        let b = tokio::spawn(Shutdown::signalled(shutdown.subscribe()));

        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(1), async {
            a.await.unwrap();
            b.await.unwrap();
        })
        .await
        .expect("subscribers did not wake");
    }

    #[tokio::test]
    async fn test_dropping_coordinator_releases_subscribers() {
        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();
        drop(shutdown);
        tokio::time::timeout(Duration::from_secs(1), Shutdown::signalled(rx))
            .await
            .expect("receiver should close");
    }
}
