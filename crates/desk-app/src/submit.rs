//! Sell-order submission with a single-flight gate.
//!
//! The gate enforces an `idle -> submitting -> idle` state
//! machine: at most one submission in flight, a second attempt while one
//! is pending is a no-op, and both outcomes return the gate to idle. A
//! failure pushes exactly one notification with the daemon's error text.
//! The submission task is detached, so tearing down the session while
//! one is in flight just discards the result.

use crate::notify::NotificationQueue;
use desk_client::{ClientResult, DaemonClient};
use desk_core::SellOrderRequest;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Boundary to whatever accepts sell orders. Lets tests inject outcomes
/// without a daemon.
pub trait OrderGateway: Send + Sync + 'static {
    fn submit_sell_order(&self, order: SellOrderRequest) -> BoxFuture<'_, ClientResult<()>>;
}

impl OrderGateway for DaemonClient {
    fn submit_sell_order(&self, order: SellOrderRequest) -> BoxFuture<'_, ClientResult<()>> {
        Box::pin(async move { DaemonClient::submit_sell_order(self, &order).await })
    }
}

/// Outcome of asking the gate to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Submission started; the gate is now closed until it resolves.
    Started,
    /// A submission is already in flight; this attempt was dropped.
    Busy,
}

/// Single-flight sell-order submitter.
pub struct Submitter {
    gateway: Arc<dyn OrderGateway>,
    notifications: Arc<NotificationQueue>,
    in_flight: Arc<AtomicBool>,
}

impl Submitter {
    pub fn new(gateway: Arc<dyn OrderGateway>, notifications: Arc<NotificationQueue>) -> Self {
        Self {
            gateway,
            notifications,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a submission is currently in flight.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Try to submit. Returns `Busy` without side effects if a
    /// submission is already pending.
    pub fn submit(&self, order: SellOrderRequest) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SubmitOutcome::Busy;
        }

        let gateway = self.gateway.clone();
        let notifications = self.notifications.clone();
        let in_flight = self.in_flight.clone();

        tokio::spawn(async move {
            match gateway.submit_sell_order(order).await {
                Ok(()) => info!("Sell order submitted"),
                Err(e) => {
                    warn!(error = %e, "Sell order submission failed");
                    notifications.push(e.detail());
                }
            }
            // Gate reopens on both outcomes.
            in_flight.store(false, Ordering::SeqCst);
        });

        SubmitOutcome::Started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desk_client::ClientError;
    use desk_core::{Price, Qty};
    use parking_lot::Mutex;
    use rust_decimal_macros::dec;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn order() -> SellOrderRequest {
        SellOrderRequest::new(
            Price::new(dec!(42000)),
            Qty::new(dec!(100)),
            Qty::new(dec!(1000)),
        )
        .unwrap()
    }

    /// Gateway whose completion is held until the test releases it.
    struct HeldGateway {
        release: Arc<Notify>,
        result: Mutex<Option<ClientResult<()>>>,
    }

    impl HeldGateway {
        fn new(result: ClientResult<()>) -> Self {
            Self {
                release: Arc::new(Notify::new()),
                result: Mutex::new(Some(result)),
            }
        }
    }

    impl OrderGateway for HeldGateway {
        fn submit_sell_order(&self, _order: SellOrderRequest) -> BoxFuture<'_, ClientResult<()>> {
            Box::pin(async move {
                self.release.notified().await;
                self.result.lock().take().expect("gateway called twice")
            })
        }
    }

    /// Gateway that resolves immediately with the given result.
    struct InstantGateway {
        result: Mutex<Option<ClientResult<()>>>,
    }

    impl InstantGateway {
        fn new(result: ClientResult<()>) -> Self {
            Self {
                result: Mutex::new(Some(result)),
            }
        }
    }

    impl OrderGateway for InstantGateway {
        fn submit_sell_order(&self, _order: SellOrderRequest) -> BoxFuture<'_, ClientResult<()>> {
            Box::pin(async move { self.result.lock().take().expect("gateway called twice") })
        }
    }

    async fn wait_until_idle(submitter: &Submitter) {
        for _ in 0..100 {
            if !submitter.is_submitting() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("submitter never returned to idle");
    }

    #[tokio::test]
    async fn test_success_returns_gate_to_idle() {
        let notifications = Arc::new(NotificationQueue::new(5_000));
        let submitter = Submitter::new(
            Arc::new(InstantGateway::new(Ok(()))),
            notifications.clone(),
        );

        assert_eq!(submitter.submit(order()), SubmitOutcome::Started);
        wait_until_idle(&submitter).await;
        assert!(notifications.active().is_empty());
    }

    #[tokio::test]
    async fn test_failure_notifies_and_returns_gate_to_idle() {
        let notifications = Arc::new(NotificationQueue::new(5_000));
        let submitter = Submitter::new(
            Arc::new(InstantGateway::new(Err(ClientError::Rejected {
                status: 400,
                detail: "insufficient funds".to_string(),
            }))),
            notifications.clone(),
        );

        assert_eq!(submitter.submit(order()), SubmitOutcome::Started);
        wait_until_idle(&submitter).await;

        let active = notifications.active();
        assert_eq!(active.len(), 1);
        assert!(active[0].text.contains("insufficient funds"));
        assert!(!submitter.is_submitting());
    }

    #[tokio::test]
    async fn test_second_submission_is_noop_while_first_pending() {
        let notifications = Arc::new(NotificationQueue::new(5_000));
        let gateway = Arc::new(HeldGateway::new(Ok(())));
        let submitter = Submitter::new(gateway.clone(), notifications.clone());

        assert_eq!(submitter.submit(order()), SubmitOutcome::Started);
        assert!(submitter.is_submitting());

        // Back-to-back attempt while the first is pending.
        assert_eq!(submitter.submit(order()), SubmitOutcome::Busy);

        gateway.release.notify_one();
        wait_until_idle(&submitter).await;

        // After the first resolves, the gate accepts again.
        // (HeldGateway would panic if its single result were consumed twice,
        // proving the Busy attempt never reached it.)
        assert!(!submitter.is_submitting());
    }

    #[tokio::test]
    async fn test_result_after_teardown_is_discarded() {
        let notifications = Arc::new(NotificationQueue::new(5_000));
        let gateway = Arc::new(HeldGateway::new(Ok(())));
        let release = gateway.release.clone();

        {
            let submitter = Submitter::new(gateway, notifications.clone());
            assert_eq!(submitter.submit(order()), SubmitOutcome::Started);
            // Submitter dropped here, task still in flight.
        }

        release.notify_one();
        tokio::time::sleep(Duration::from_millis(20)).await;
        // No panic, no notification: the late result was simply discarded.
        assert!(notifications.active().is_empty());
    }
}
