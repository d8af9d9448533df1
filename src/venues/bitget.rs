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

pub struct BitgetSource {
    client: reqwest::Client,
    usd_to_aud: Decimal,
}

impl BitgetSource {
    pub fn new(client: reqwest::Client, usd_to_aud: Decimal) -> Self {
        Self { client, usd_to_aud }
    }

    fn ticker_url(pair: &TradingPair) -> String {
        format!(
            "https://api.bitget.com/api/v2/spot/market/ticker?symbol={}{}",
            pair.base, pair.quote
        )
    }
}

#[async_trait]
impl QuoteSource for BitgetSource {
    fn venue(&self) -> &str {
        "bitget"
    }

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote> {
        let body: Value = self
            .client
            .get(Self::ticker_url(pair))
            .send()
            .await
            .context("Bitget ticker request failed")?
            .json()
            .await
            .context("Bitget ticker returned non-JSON body")?;

        let quote = parse_ticker(&body, self.usd_to_aud)?;
        log::debug!("bitget quote for {}: buy {} sell {}", pair.symbol, quote.buy_price, quote.sell_price);
        Ok(quote)
    }
}

/// `data.sellPri` is the best offer and `data.buyPri` the best bid,
/// USDT-quoted.
fn parse_ticker(body: &Value, usd_to_aud: Decimal) -> Result<Quote> {
    let data = &body["data"];
    let ask = decimal_field(&data["sellPri"], "data.sellPri")?;
    let bid = decimal_field(&data["buyPri"], "data.buyPri")?;
    Ok(Quote::new(ask * usd_to_aud, bid * usd_to_aud, taker_fee()))
}
