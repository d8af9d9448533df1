use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A trading pair such as BTC/USDT. Venue-specific symbol spellings
/// (BTCUSDT, XBTUSDT, ...) are derived by each quote source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingPair {
    pub base: String,
    pub quote: String,
    pub symbol: String,
}

impl TradingPair {
    /// Parse a "BASE/QUOTE" symbol, e.g. "BTC/USDT".
    pub fn parse(symbol: &str) -> anyhow::Result<Self> {
        let (base, quote) = symbol
            .split_once('/')
            .ok_or_else(|| anyhow::anyhow!("Trading pair must be BASE/QUOTE, got '{}'", symbol))?;
        if base.is_empty() || quote.is_empty() {
            anyhow::bail!("Trading pair must be BASE/QUOTE, got '{}'", symbol);
        }
        Ok(Self {
            base: base.to_string(),
            quote: quote.to_string(),
            symbol: symbol.to_string(),
        })
    }
}

/// One venue's tradable prices at a point in time, normalized to the
/// scanner's display currency. The venue id lives in the evaluation map's
/// key, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Cost to acquire one unit of the base asset, fee already folded in.
    pub buy_price: Decimal,
    /// Proceeds from disposing one unit of the base asset, fee folded in.
    pub sell_price: Decimal,
    /// Taker fee fraction, informational; carried through to the
    /// opportunity record for the paper wallet.
    pub fee_rate: Decimal,
}

impl Quote {
    pub fn new(buy_price: Decimal, sell_price: Decimal, fee_rate: Decimal) -> Self {
        Self {
            buy_price,
            sell_price,
            fee_rate,
        }
    }
}

/// Outcome of one evaluation cycle. Immutable once created; owned by the
/// history ledger after recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub pair: String,
    pub buy_venue: String,
    pub sell_venue: String,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub buy_fee_rate: Decimal,
    pub sell_fee_rate: Decimal,
    /// (sell - buy) / buy * 100, signed; full precision, rounded only
    /// for display.
    pub profit_pct: Decimal,
    /// investment * profit_pct / 100, in the investment's currency.
    pub profit_amount: Decimal,
    pub meets_threshold: bool,
    /// The single best venue was simultaneously cheapest to buy and
    /// richest to sell; no genuine cross-venue opportunity.
    pub same_venue: bool,
}
