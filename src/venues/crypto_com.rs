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

pub struct CryptoComSource {
    client: reqwest::Client,
    usd_to_aud: Decimal,
}

impl CryptoComSource {
    pub fn new(client: reqwest::Client, usd_to_aud: Decimal) -> Self {
        Self { client, usd_to_aud }
    }

    fn ticker_url(pair: &TradingPair) -> String {
        format!(
            "https://api.crypto.com/v2/public/get-ticker?instrument_name={}_{}",
            pair.base, pair.quote
        )
    }
}

#[async_trait]
impl QuoteSource for CryptoComSource {
    fn venue(&self) -> &str {
        "crypto_com"
    }

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote> {
        let body: Value = self
            .client
            .get(Self::ticker_url(pair))
            .send()
            .await
            .context("Crypto.com ticker request failed")?
            .json()
            .await
            .context("Crypto.com ticker returned non-JSON body")?;

        let quote = parse_ticker(&body, self.usd_to_aud)?;
        log::debug!("crypto_com quote for {}: buy {} sell {}", pair.symbol, quote.buy_price, quote.sell_price);
        Ok(quote)
    }
}

/// Ticker under `result.data`: `b` is the best bid and `k` the best ask,
/// USDT-quoted.
fn parse_ticker(body: &Value, usd_to_aud: Decimal) -> Result<Quote> {
    let ticker = &body["result"]["data"];
    let ask = decimal_field(&ticker["k"], "result.data.k")?;
    let bid = decimal_field(&ticker["b"], "result.data.b")?;
    Ok(Quote::new(ask * usd_to_aud, bid * usd_to_aud, taker_fee()))
}
