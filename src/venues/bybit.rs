use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{QuoteSource, decimal_field};
use crate::models::{Quote, TradingPair};

/// Spot taker fee, 0.1%.
fn taker_fee() -> Decimal {
    Decimal::new(1, 3)
}

pub struct BybitSource {
    client: reqwest::Client,
    usd_to_aud: Decimal,
}

impl BybitSource {
    pub fn new(client: reqwest::Client, usd_to_aud: Decimal) -> Self {
        Self { client, usd_to_aud }
    }

    fn ticker_url(pair: &TradingPair) -> String {
        format!(
            "https://api.bybit.com/v2/public/tickers?symbol={}{}",
            pair.base, pair.quote
        )
    }
}

#[async_trait]
impl QuoteSource for BybitSource {
    fn venue(&self) -> &str {
        "bybit"
    }

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote> {
        let body: Value = self
            .client
            .get(Self::ticker_url(pair))
            .send()
            .await
            .context("Bybit tickers request failed")?
            .json()
            .await
            .context("Bybit tickers returned non-JSON body")?;

        let quote = parse_tickers(&body, self.usd_to_aud)?;
        log::debug!("bybit quote for {}: buy {} sell {}", pair.symbol, quote.buy_price, quote.sell_price);
        Ok(quote)
    }
}

/// Single-element `result` array with `bid_price`/`ask_price`, USDT-quoted.
fn parse_tickers(body: &Value, usd_to_aud: Decimal) -> Result<Quote> {
    let item = &body["result"][0];
    let ask = decimal_field(&item["ask_price"], "result[0].ask_price")?;
    let bid = decimal_field(&item["bid_price"], "result[0].bid_price")?;
    Ok(Quote::new(ask * usd_to_aud, bid * usd_to_aud, taker_fee()))
}
