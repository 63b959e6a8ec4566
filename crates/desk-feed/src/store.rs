//! Latest-value store: one slot per feed channel.
//!
//! Each slot holds only the most recently applied payload plus a
//! monotonically increasing sequence number. The seq is the change
//! signal: every apply bumps it by exactly one, so dependents detect
//! updates by version instead of deep equality and no event is ever
//! coalesced away. Slots are independently owned; an apply replaces one
//! slot wholesale and touches nothing else.

use crate::event::{Channel, FeedEvent};
use desk_core::{Cfd, Order, PriceInfo, WalletInfo};
use parking_lot::RwLock;
use tokio::sync::watch;

/// One slot: the latest payload (if any) and its version.
#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    seq: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: None,
            seq: 0,
        }
    }
}

impl<T> Slot<T> {
    fn replace(&mut self, value: T) -> u64 {
        self.value = Some(value);
        self.seq += 1;
        self.seq
    }
}

/// Result of applying one event: which slot changed and its new version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelUpdate {
    pub channel: Channel,
    pub seq: u64,
}

/// Per-channel latest-value store.
pub struct FeedState {
    cfds: RwLock<Slot<Vec<Cfd>>>,
    order: RwLock<Slot<Option<Order>>>,
    wallet: RwLock<Slot<WalletInfo>>,
    quote: RwLock<Slot<PriceInfo>>,
    /// Store-wide revision, bumped after every apply. A doorbell for
    /// dependents; per-slot seqs carry the actual versions.
    revision_tx: watch::Sender<u64>,
}

impl FeedState {
    pub fn new() -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            cfds: RwLock::new(Slot::default()),
            order: RwLock::new(Slot::default()),
            wallet: RwLock::new(Slot::default()),
            quote: RwLock::new(Slot::default()),
            revision_tx,
        }
    }

    /// Apply one event, replacing its channel's slot.
    pub fn apply(&self, event: FeedEvent) -> ChannelUpdate {
        let update = match event {
            FeedEvent::Cfds(cfds) => ChannelUpdate {
                channel: Channel::Cfds,
                seq: self.cfds.write().replace(cfds),
            },
            FeedEvent::Order(order) => ChannelUpdate {
                channel: Channel::Order,
                seq: self.order.write().replace(order),
            },
            FeedEvent::Wallet(wallet) => ChannelUpdate {
                channel: Channel::Wallet,
                seq: self.wallet.write().replace(wallet),
            },
            FeedEvent::Quote(quote) => ChannelUpdate {
                channel: Channel::Quote,
                seq: self.quote.write().replace(quote),
            },
        };

        self.revision_tx.send_modify(|rev| *rev += 1);
        update
    }

    /// Subscribe to the store-wide revision doorbell.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    /// Latest position snapshot, or `None` before the first `cfds` event.
    pub fn cfds(&self) -> Option<Vec<Cfd>> {
        self.cfds.read().value.clone()
    }

    /// Version of the `cfds` slot (0 before the first event).
    pub fn cfds_seq(&self) -> u64 {
        self.cfds.read().seq
    }

    /// Latest outstanding order. `None` both before the first `order`
    /// event and when the daemon last pushed an explicit absence.
    pub fn order(&self) -> Option<Order> {
        self.order.read().value.clone().flatten()
    }

    pub fn order_seq(&self) -> u64 {
        self.order.read().seq
    }

    /// Latest wallet snapshot.
    pub fn wallet(&self) -> Option<WalletInfo> {
        self.wallet.read().value.clone()
    }

    pub fn wallet_seq(&self) -> u64 {
        self.wallet.read().seq
    }

    /// Latest market quote.
    pub fn quote(&self) -> Option<PriceInfo> {
        self.quote.read().value.clone()
    }

    pub fn quote_seq(&self) -> u64 {
        self.quote.read().seq
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}
