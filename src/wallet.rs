use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::models::Opportunity;

/// How many executed trades the wallet retains for display.
const TRADE_HISTORY_LIMIT: usize = 5;

/// One simulated fill of an opportunity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: DateTime<Utc>,
    pub buy_venue: String,
    pub sell_venue: String,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub investment: Decimal,
    pub net_profit: Decimal,
}

/// Paper-trading wallet: an in-memory balance that "executes" opportunities
/// with both venues' fees applied, keeping the most recent fills for a
/// "last trades" display. No orders are placed anywhere.
#[derive(Debug)]
pub struct Wallet {
    balance: Decimal,
    trades: VecDeque<TradeRecord>,
}

impl Wallet {
    pub fn new(balance: Decimal) -> Self {
        Self {
            balance,
            trades: VecDeque::with_capacity(TRADE_HISTORY_LIMIT),
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// The last executed trades, oldest first, at most
    /// [`TRADE_HISTORY_LIMIT`] of them.
    pub fn trades(&self) -> Vec<TradeRecord> {
        self.trades.iter().cloned().collect()
    }

    /// Simulate buying `investment` worth at the buy venue and selling the
    /// proceeds at the sell venue. Returns `None` when the balance cannot
    /// cover the fee-inclusive cost; the balance is left untouched then.
    pub fn execute(&mut self, opp: &Opportunity, investment: Decimal) -> Option<TradeRecord> {
        let total_cost = investment * (Decimal::ONE + opp.buy_fee_rate);
        if self.balance < total_cost {
            return None;
        }

        let total_gain =
            investment * (opp.sell_price / opp.buy_price) * (Decimal::ONE - opp.sell_fee_rate);

        self.balance = self.balance - total_cost + total_gain;

        let record = TradeRecord {
            timestamp: opp.timestamp,
            buy_venue: opp.buy_venue.clone(),
            sell_venue: opp.sell_venue.clone(),
            buy_price: opp.buy_price,
            sell_price: opp.sell_price,
            investment,
            net_profit: total_gain - total_cost,
        };

        self.trades.push_back(record.clone());
        while self.trades.len() > TRADE_HISTORY_LIMIT {
            self.trades.pop_front();
        }

        Some(record)
    }
}
