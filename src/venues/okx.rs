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

pub struct OkxSource {
    client: reqwest::Client,
    usd_to_aud: Decimal,
}

impl OkxSource {
    pub fn new(client: reqwest::Client, usd_to_aud: Decimal) -> Self {
        Self { client, usd_to_aud }
    }

    fn ticker_url(pair: &TradingPair) -> String {
        format!(
            "https://www.okx.com/api/v5/market/ticker?instId={}-{}",
            pair.base, pair.quote
        )
    }
}

#[async_trait]
impl QuoteSource for OkxSource {
    fn venue(&self) -> &str {
        "okx"
    }

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote> {
        let body: Value = self
            .client
            .get(Self::ticker_url(pair))
            .send()
            .await
            .context("OKX ticker request failed")?
            .json()
            .await
            .context("OKX ticker returned non-JSON body")?;

        let quote = parse_ticker(&body, self.usd_to_aud)?;
        log::debug!("okx quote for {}: buy {} sell {}", pair.symbol, quote.buy_price, quote.sell_price);
        Ok(quote)
    }
}

/// Single-element `data` array with `bidPx`/`askPx`, USDT-quoted.
fn parse_ticker(body: &Value, usd_to_aud: Decimal) -> Result<Quote> {
    let item = &body["data"][0];
    let ask = decimal_field(&item["askPx"], "data[0].askPx")?;
    let bid = decimal_field(&item["bidPx"], "data[0].bidPx")?;
    Ok(Quote::new(ask * usd_to_aud, bid * usd_to_aud, taker_fee()))
}
