//! One-shot registration gate.

use tokio::sync::watch;

/// How the gate was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The server confirmed registration.
    Registered,
    /// The connection ended (or was given up on) before registration.
    Aborted(String),
}

/// Released exactly once per client; the first outcome wins and later
/// release or abort calls are no-ops. Waiters never miss a release that
/// happened before they started waiting.
#[derive(Debug)]
pub struct ConnectionGate {
    tx: watch::Sender<Option<GateOutcome>>,
}

impl Default for ConnectionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionGate {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Mark registration complete. True only for the call that settled the
    /// gate.
    pub fn release(&self) -> bool {
        self.settle(GateOutcome::Registered)
    }

    /// Settle the gate as failed. True only for the call that settled it.
    pub fn abort(&self, reason: impl Into<String>) -> bool {
        self.settle(GateOutcome::Aborted(reason.into()))
    }

    fn settle(&self, outcome: GateOutcome) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(outcome);
            true
        })
    }

    /// Settled either way.
    pub fn is_settled(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn is_registered(&self) -> bool {
        matches!(*self.tx.borrow(), Some(GateOutcome::Registered))
    }

    pub fn outcome(&self) -> Option<GateOutcome> {
        self.tx.borrow().clone()
    }

    /// Suspend until the gate is settled.
    pub async fn wait(&self) -> GateOutcome {
        let mut rx = self.tx.subscribe();
        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(settled) => (*settled).clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => None,
        };
        outcome.unwrap_or_else(|| GateOutcome::Aborted("gate closed".to_string()))
    }
}
