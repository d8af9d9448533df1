use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;

use super::QuoteSource;
use crate::models::{Quote, TradingPair};

/// Centre of the simulated random walk, in AUD.
const BASE_PRICE_AUD: f64 = 112_000.0;

/// Per-venue spread factors, assigned by name so distinct simulated venues
/// quote distinct buy sides.
const SPREAD_FACTORS: [f64; 5] = [1.002, 1.003, 1.004, 1.005, 1.006];

/// Simulated venue for offline runs and tests: a random walk around a base
/// price with a per-name spread factor. Configured with `sim-*` venue names
/// so fabricated prices never answer under a real venue's name.
pub struct SimulatedSource {
    venue: String,
    spread_factor: f64,
}

impl SimulatedSource {
    pub fn new(venue: &str) -> Self {
        let seed: usize = venue.bytes().map(usize::from).sum();
        Self {
            venue: venue.to_string(),
            spread_factor: SPREAD_FACTORS[seed % SPREAD_FACTORS.len()],
        }
    }
}

#[async_trait]
impl QuoteSource for SimulatedSource {
    fn venue(&self) -> &str {
        &self.venue
    }

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote> {
        // ±1.5% walk around the base, sell side just under the mid.
        let mid = BASE_PRICE_AUD * (0.985 + fastrand::f64() * 0.03);
        let buy = mid * self.spread_factor;
        let sell = mid * (0.998 + fastrand::f64() * 0.001);

        let quote = Quote::new(
            Decimal::try_from(buy).context("Simulated buy price out of range")?,
            Decimal::try_from(sell).context("Simulated sell price out of range")?,
            Decimal::new(1, 3),
        );
        log::debug!("{} simulated quote for {}: buy {} sell {}", self.venue, pair.symbol, quote.buy_price, quote.sell_price);
        Ok(quote)
    }
}
