//! Position classifier.
//!
//! Partitions a `cfds` snapshot into four disjoint, order-preserving
//! buckets by lifecycle state. Pure and total: every record lands in
//! exactly one bucket, and an unrecognized state goes to `unsorted`
//! instead of raising. A non-empty `unsorted` bucket means the daemon
//! speaks a state this desk does not know: a bug report, not a crash.

use desk_core::{Cfd, StateGroup};

/// The four display buckets for a position snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CfdBuckets {
    /// Accepted / Contract Setup / Pending Open.
    pub running: Vec<Cfd>,
    /// Requested.
    pub open: Vec<Cfd>,
    /// Rejected / Closed.
    pub closed: Vec<Cfd>,
    /// Everything else. Empty in a correct deployment.
    pub unsorted: Vec<Cfd>,
}

impl CfdBuckets {
    /// Total number of records across all buckets.
    pub fn total(&self) -> usize {
        self.running.len() + self.open.len() + self.closed.len() + self.unsorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// True if every record was recognized.
    pub fn is_fully_sorted(&self) -> bool {
        self.unsorted.is_empty()
    }
}

/// Classify a snapshot into buckets. Single pass, input order preserved
/// within each bucket.
pub fn classify(cfds: &[Cfd]) -> CfdBuckets {
    let mut buckets = CfdBuckets::default();

    for cfd in cfds {
        match cfd.group() {
            StateGroup::Running => buckets.running.push(cfd.clone()),
            StateGroup::Open => buckets.open.push(cfd.clone()),
            StateGroup::Closed => buckets.closed.push(cfd.clone()),
            StateGroup::Unsorted => buckets.unsorted.push(cfd.clone()),
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use desk_core::{CfdState, OrderId, OrderSide, Price, Qty};
    use rust_decimal_macros::dec;

    fn cfd(state: CfdState) -> Cfd {
        Cfd {
            order_id: OrderId::new(),
            trading_pair: "BTC/USD".to_string(),
            position: OrderSide::Sell,
            initial_price: Price::new(dec!(42000)),
            quantity_usd: Qty::new(dec!(100)),
            leverage: 2,
            liquidation_price: Price::new(dec!(21000)),
            profit_usd: None,
            state,
            state_transition_timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_scenario_from_mixed_snapshot() {
        let snapshot = vec![
            cfd(CfdState::Requested),
            cfd(CfdState::Accepted),
            cfd(CfdState::Closed),
            cfd(CfdState::Unknown("Bogus".to_string())),
        ];

        let buckets = classify(&snapshot);
        assert_eq!(buckets.running.len(), 1);
        assert_eq!(buckets.running[0].state, CfdState::Accepted);
        assert_eq!(buckets.open.len(), 1);
        assert_eq!(buckets.open[0].state, CfdState::Requested);
        assert_eq!(buckets.closed.len(), 1);
        assert_eq!(buckets.closed[0].state, CfdState::Closed);
        assert_eq!(buckets.unsorted.len(), 1);
        assert!(!buckets.is_fully_sorted());
    }

    #[test]
    fn test_empty_snapshot() {
        let buckets = classify(&[]);
        assert!(buckets.is_empty());
        assert!(buckets.is_fully_sorted());
    }

    #[test]
    fn test_buckets_partition_input_exactly() {
        let snapshot = vec![
            cfd(CfdState::Accepted),
            cfd(CfdState::ContractSetup),
            cfd(CfdState::PendingOpen),
            cfd(CfdState::Requested),
            cfd(CfdState::Rejected),
            cfd(CfdState::Closed),
            cfd(CfdState::Unknown("New".to_string())),
        ];

        let buckets = classify(&snapshot);
        assert_eq!(buckets.total(), snapshot.len());

        // Concatenation is a permutation of the input: every order_id
        // appears exactly once across the buckets.
        let mut seen: Vec<_> = buckets
            .running
            .iter()
            .chain(&buckets.open)
            .chain(&buckets.closed)
            .chain(&buckets.unsorted)
            .map(|c| c.order_id)
            .collect();
        seen.sort_by_key(|id| id.to_string());

        let mut expected: Vec<_> = snapshot.iter().map(|c| c.order_id).collect();
        expected.sort_by_key(|id| id.to_string());

        assert_eq!(seen, expected);
    }

    #[test]
    fn test_relative_order_preserved_within_buckets() {
        let first = cfd(CfdState::Accepted);
        let second = cfd(CfdState::PendingOpen);
        let third = cfd(CfdState::ContractSetup);
        let snapshot = vec![first.clone(), second.clone(), third.clone()];

        let buckets = classify(&snapshot);
        let ids: Vec<_> = buckets.running.iter().map(|c| c.order_id).collect();
        assert_eq!(ids, vec![first.order_id, second.order_id, third.order_id]);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let snapshot = vec![
            cfd(CfdState::Requested),
            cfd(CfdState::Closed),
            cfd(CfdState::Unknown("X".to_string())),
        ];

        assert_eq!(classify(&snapshot), classify(&snapshot));
    }

    #[test]
    fn test_unknown_state_lands_only_in_unsorted() {
        let snapshot = vec![cfd(CfdState::Unknown("Whatever".to_string()))];
        let buckets = classify(&snapshot);

        assert!(buckets.running.is_empty());
        assert!(buckets.open.is_empty());
        assert!(buckets.closed.is_empty());
        assert_eq!(buckets.unsorted.len(), 1);
    }
}
