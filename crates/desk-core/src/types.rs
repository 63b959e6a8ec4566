//! Auxiliary display snapshots pushed by the daemon.
//!
//! Both types are opaque to the client: each `wallet` or `quote` event
//! replaces the previous snapshot wholesale.

use crate::decimal::Price;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Wallet snapshot from the `wallet` channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletInfo {
    /// Confirmed balance in BTC.
    pub balance: Decimal,
    /// Receive address.
    pub address: String,
    /// When the daemon last synced the wallet.
    pub last_updated_at: DateTime<Utc>,
}

/// Market quote snapshot from the `quote` channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceInfo {
    pub bid: Price,
    pub ask: Price,
    pub last_updated_at: DateTime<Utc>,
}

impl PriceInfo {
    /// Mid price: (bid + ask) / 2. None if either side is missing.
    pub fn mid(&self) -> Option<Price> {
        if !self.bid.is_positive() || !self.ask.is_positive() {
            return None;
        }
        Some(Price::new(
            (self.bid.inner() + self.ask.inner()) / Decimal::TWO,
        ))
    }
}
