use std::collections::VecDeque;

use crate::models::Opportunity;

/// Bounded, insertion-ordered history of past opportunities. Oldest first,
/// newest last; recording beyond capacity evicts from the head (FIFO).
///
/// Created empty at session start and owned by a single scan loop; one
/// evaluation cycle writes at a time.
#[derive(Debug)]
pub struct HistoryLedger {
    entries: VecDeque<Opportunity>,
    capacity: usize,
}

impl HistoryLedger {
    /// A ledger holding the most recent `capacity` opportunities.
    /// A capacity of 0 is bumped to 1 so `record` always retains something.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append at the tail, evicting from the head while over capacity.
    pub fn record(&mut self, opportunity: Opportunity) {
        self.entries.push_back(opportunity);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Defensive copy of the current window, oldest first.
    pub fn snapshot(&self) -> Vec<Opportunity> {
        self.entries.iter().cloned().collect()
    }

    /// The most recently recorded entry.
    pub fn latest(&self) -> Option<&Opportunity> {
        self.entries.back()
    }

    /// The entry `k` scans before the latest; `previous(0)` is `latest()`,
    /// `previous(1)` the scan before it. Backs the "last N-1 scans" display.
    pub fn previous(&self, k: usize) -> Option<&Opportunity> {
        self.entries
            .len()
            .checked_sub(k + 1)
            .and_then(|idx| self.entries.get(idx))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn opportunity(tag: &str) -> Opportunity {
        Opportunity {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            pair: "BTC/USDT".to_string(),
            buy_venue: tag.to_string(),
            sell_venue: "kraken".to_string(),
            buy_price: dec!(100),
            sell_price: dec!(103),
            buy_fee_rate: dec!(0.001),
            sell_fee_rate: dec!(0.0026),
            profit_pct: dec!(3),
            profit_amount: dec!(30),
            meets_threshold: true,
            same_venue: false,
        }
    }

    #[test]
    fn empty_ledger_has_no_latest() {
        let ledger = HistoryLedger::new(3);
        assert!(ledger.is_empty());
        assert!(ledger.latest().is_none());
        assert!(ledger.previous(0).is_none());
        assert!(ledger.snapshot().is_empty());
    }

    #[test]
    fn latest_returns_the_single_recorded_entry() {
        let mut ledger = HistoryLedger::new(3);
        let opp = opportunity("binance");
        let id = opp.id;
        ledger.record(opp);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.latest().map(|o| o.id), Some(id));
    }

    #[test]
    fn capacity_overflow_evicts_oldest_first() {
        let mut ledger = HistoryLedger::new(3);
        for tag in ["a", "b", "c", "d", "e"] {
            ledger.record(opportunity(tag));
        }

        let window = ledger.snapshot();
        assert_eq!(window.len(), 3);
        let tags: Vec<&str> = window.iter().map(|o| o.buy_venue.as_str()).collect();
        assert_eq!(tags, ["c", "d", "e"]);
    }

    #[test]
    fn previous_walks_back_from_the_latest() {
        let mut ledger = HistoryLedger::new(5);
        for tag in ["a", "b", "c"] {
            ledger.record(opportunity(tag));
        }

        assert_eq!(ledger.previous(0).map(|o| o.buy_venue.as_str()), Some("c"));
        assert_eq!(ledger.previous(1).map(|o| o.buy_venue.as_str()), Some("b"));
        assert_eq!(ledger.previous(2).map(|o| o.buy_venue.as_str()), Some("a"));
        assert!(ledger.previous(3).is_none());
    }

    #[test]
    fn snapshot_is_a_defensive_copy() {
        let mut ledger = HistoryLedger::new(3);
        ledger.record(opportunity("a"));

        let mut window = ledger.snapshot();
        window.clear();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut ledger = HistoryLedger::new(0);
        assert_eq!(ledger.capacity(), 1);
        ledger.record(opportunity("a"));
        ledger.record(opportunity("b"));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.latest().map(|o| o.buy_venue.as_str()), Some("b"));
    }
}
