//! Core domain types for the cfd-desk client.
//!
//! This crate provides the fundamental types shared across the workspace:
//! - `Price`, `Qty`: precision-safe numeric types
//! - `Cfd`, `CfdState`, `StateGroup`: position records and their lifecycle
//! - `Order`, `SellOrderRequest`: the maker's outstanding order and the
//!   locally constructed sell-order payload
//! - `WalletInfo`, `PriceInfo`: display snapshots pushed by the daemon

pub mod cfd;
pub mod decimal;
pub mod error;
pub mod order;
pub mod types;

pub use cfd::{Cfd, CfdState, StateGroup};
pub use decimal::{Price, Qty};
pub use error::{CoreError, Result};
pub use order::{Order, OrderId, OrderSide, SellOrderRequest};
pub use types::{PriceInfo, WalletInfo};
