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

pub struct KuCoinSource {
    client: reqwest::Client,
    usd_to_aud: Decimal,
}

impl KuCoinSource {
    pub fn new(client: reqwest::Client, usd_to_aud: Decimal) -> Self {
        Self { client, usd_to_aud }
    }

    fn ticker_url(pair: &TradingPair) -> String {
        format!(
            "https://api.kucoin.com/api/v1/market/orderbook/level1?symbol={}-{}",
            pair.base, pair.quote
        )
    }
}

#[async_trait]
impl QuoteSource for KuCoinSource {
    fn venue(&self) -> &str {
        "kucoin"
    }

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote> {
        let body: Value = self
            .client
            .get(Self::ticker_url(pair))
            .send()
            .await
            .context("KuCoin level1 request failed")?
            .json()
            .await
            .context("KuCoin level1 returned non-JSON body")?;

        let quote = parse_level1(&body, self.usd_to_aud)?;
        log::debug!("kucoin quote for {}: buy {} sell {}", pair.symbol, quote.buy_price, quote.sell_price);
        Ok(quote)
    }
}

/// Level-1 order book under `data`, USDT-quoted, converted to AUD.
fn parse_level1(body: &Value, usd_to_aud: Decimal) -> Result<Quote> {
    let data = &body["data"];
    let ask = decimal_field(&data["bestAsk"], "data.bestAsk")?;
    let bid = decimal_field(&data["bestBid"], "data.bestBid")?;
    Ok(Quote::new(ask * usd_to_aud, bid * usd_to_aud, taker_fee()))
}
