use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{QuoteSource, decimal_field};
use crate::models::{Quote, TradingPair};

/// Instant buy/sell fee, 1%.
fn taker_fee() -> Decimal {
    Decimal::new(1, 2)
}

/// AUD-native venue; no currency conversion needed.
pub struct CoinSpotSource {
    client: reqwest::Client,
}

impl CoinSpotSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuoteSource for CoinSpotSource {
    fn venue(&self) -> &str {
        "coinspot"
    }

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote> {
        let body: Value = self
            .client
            .get("https://www.coinspot.com.au/pubapi/v2/latest")
            .send()
            .await
            .context("CoinSpot latest-prices request failed")?
            .json()
            .await
            .context("CoinSpot latest-prices returned non-JSON body")?;

        let quote = parse_latest(&body, &pair.base)?;
        log::debug!("coinspot quote for {}: buy {} sell {}", pair.symbol, quote.buy_price, quote.sell_price);
        Ok(quote)
    }
}

/// The latest-prices feed covers every listed coin keyed by lowercase code.
fn parse_latest(body: &Value, base: &str) -> Result<Quote> {
    let coin = &body["prices"][base.to_ascii_lowercase()];
    let ask = decimal_field(&coin["ask"], "ask")
        .with_context(|| format!("CoinSpot has no prices for '{}'", base))?;
    let bid = decimal_field(&coin["bid"], "bid")?;
    Ok(Quote::new(ask, bid, taker_fee()))
}
