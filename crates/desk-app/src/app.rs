//! Main application orchestration.
//!
//! Wires the daemon client into a session and renders state changes as
//! structured log lines. The visual widget tree is someone else's
//! problem; this binary is the headless rendering surface.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::session::Session;
use desk_client::{Credentials, DaemonClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How often expired notifications are swept.
const NOTIFICATION_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Per-channel seqs the renderer has already reported.
#[derive(Debug, Default, Clone, Copy)]
struct SeenSeqs {
    cfds: u64,
    order: u64,
    wallet: u64,
    quote: u64,
}

/// Main application.
pub struct Application {
    config: AppConfig,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run until interrupted.
    pub async fn run(self) -> AppResult<()> {
        let password = self.config.password()?;
        let client = DaemonClient::new(
            &self.config.daemon_url,
            Credentials {
                username: self.config.username.clone(),
                password,
            },
        )
        .map_err(AppError::Client)?;

        let client = Arc::new(client);
        let session = Session::new(client.clone(), client, &self.config);

        info!(daemon = %self.config.daemon_url, "Desk session mounted");

        let mut revision = session.state().subscribe();
        let mut seen = SeenSeqs::default();
        let mut sweep = tokio::time::interval(NOTIFICATION_SWEEP_INTERVAL);

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, unmounting session");
                    break;
                }
                changed = revision.changed() => {
                    if changed.is_err() {
                        // Store dropped; session is gone.
                        break;
                    }
                    self.render(&session, &mut seen);
                }
                _ = sweep.tick() => {
                    // Dropping expired notifications is a side effect of
                    // listing the active ones.
                    let _ = session.notifications().active();
                }
            }
        }

        Ok(())
    }

    /// Report every slot whose version moved since the last pass.
    fn render(&self, session: &Session, seen: &mut SeenSeqs) {
        let state = session.state();

        let cfds_seq = state.cfds_seq();
        if cfds_seq != seen.cfds {
            seen.cfds = cfds_seq;
            let buckets = session.buckets();
            info!(
                seq = cfds_seq,
                running = buckets.running.len(),
                open = buckets.open.len(),
                closed = buckets.closed.len(),
                unsorted = buckets.unsorted.len(),
                "Positions updated"
            );
            if !buckets.is_fully_sorted() {
                let states: Vec<_> = buckets
                    .unsorted
                    .iter()
                    .map(|c| c.state.to_string())
                    .collect();
                warn!(?states, "Positions with unhandled lifecycle states");
            }
        }

        let order_seq = state.order_seq();
        if order_seq != seen.order {
            seen.order = order_seq;
            match state.order() {
                Some(order) => info!(
                    id = %order.id,
                    price = %order.price,
                    min = %order.min_quantity,
                    max = %order.max_quantity,
                    "Outstanding order updated"
                ),
                None => info!("No outstanding order"),
            }
        }

        let wallet_seq = state.wallet_seq();
        if wallet_seq != seen.wallet {
            seen.wallet = wallet_seq;
            if let Some(wallet) = state.wallet() {
                info!(balance = %wallet.balance, "Wallet updated");
            }
        }

        let quote_seq = state.quote_seq();
        if quote_seq != seen.quote {
            seen.quote = quote_seq;
            if let Some(quote) = state.quote() {
                info!(bid = %quote.bid, ask = %quote.ask, "Quote updated");
            }
        }
    }
}
