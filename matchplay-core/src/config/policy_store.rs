use super::MatchPolicy;
use std::sync::Arc;
use tokio::sync::watch;

/// Shared, swappable [`MatchPolicy`].
///
/// Request handlers take a copy with [`current`](PolicyStore::current);
/// long-running tasks hold a receiver from [`subscribe`](PolicyStore::subscribe)
/// and react as soon as a reload lands.
#[derive(Debug, Clone)]
pub struct PolicyStore {
    tx: Arc<watch::Sender<MatchPolicy>>,
}

impl PolicyStore {
    pub fn new(initial: MatchPolicy) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> MatchPolicy {
        *self.tx.borrow()
    }

    /// Replace the policy and wake every subscriber.
    pub fn update(&self, policy: MatchPolicy) {
        self.tx.send_replace(policy);
    }

    pub fn subscribe(&self) -> watch::Receiver<MatchPolicy> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_notifies_subscribers() {
        let store = PolicyStore::new(MatchPolicy::default());
        let mut rx = store.subscribe();

        store.update(MatchPolicy {
            k_factor: 16.0,
            ..MatchPolicy::default()
        });

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().k_factor, 16.0);
        assert_eq!(store.current().k_factor, 16.0);
    }
}
