use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{QuoteSource, decimal_field};
use crate::models::{Quote, TradingPair};

/// Spot taker fee, 0.26%.
fn taker_fee() -> Decimal {
    Decimal::new(26, 4)
}

pub struct KrakenSource {
    client: reqwest::Client,
    usd_to_aud: Decimal,
}

impl KrakenSource {
    pub fn new(client: reqwest::Client, usd_to_aud: Decimal) -> Self {
        Self { client, usd_to_aud }
    }

    /// Kraken spells bitcoin XBT.
    fn ticker_url(pair: &TradingPair) -> String {
        let base = if pair.base == "BTC" { "XBT" } else { pair.base.as_str() };
        format!("https://api.kraken.com/0/public/Ticker?pair={}{}", base, pair.quote)
    }
}

#[async_trait]
impl QuoteSource for KrakenSource {
    fn venue(&self) -> &str {
        "kraken"
    }

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote> {
        let body: Value = self
            .client
            .get(Self::ticker_url(pair))
            .send()
            .await
            .context("Kraken ticker request failed")?
            .json()
            .await
            .context("Kraken ticker returned non-JSON body")?;

        let quote = parse_ticker(&body, self.usd_to_aud)?;
        log::debug!("kraken quote for {}: buy {} sell {}", pair.symbol, quote.buy_price, quote.sell_price);
        Ok(quote)
    }
}

/// Kraken keys the result by its own asset-pair spelling, so take the
/// single entry rather than guessing the key. `a`/`b` are
/// [price, whole lot volume, lot volume] arrays.
fn parse_ticker(body: &Value, usd_to_aud: Decimal) -> Result<Quote> {
    if let Some(errors) = body["error"].as_array() {
        if !errors.is_empty() {
            bail!("Kraken ticker error: {:?}", errors);
        }
    }

    let result = body["result"]
        .as_object()
        .ok_or_else(|| anyhow!("Kraken ticker missing 'result' object"))?;
    let (_, ticker) = result
        .iter()
        .next()
        .ok_or_else(|| anyhow!("Kraken ticker result is empty"))?;

    let ask = decimal_field(&ticker["a"][0], "a[0]")?;
    let bid = decimal_field(&ticker["b"][0], "b[0]")?;
    Ok(Quote::new(ask * usd_to_aud, bid * usd_to_aud, taker_fee()))
}
