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

pub struct BinanceSource {
    client: reqwest::Client,
    usd_to_aud: Decimal,
}

impl BinanceSource {
    pub fn new(client: reqwest::Client, usd_to_aud: Decimal) -> Self {
        Self { client, usd_to_aud }
    }

    fn ticker_url(pair: &TradingPair) -> String {
        format!(
            "https://api.binance.com/api/v3/ticker/bookTicker?symbol={}{}",
            pair.base, pair.quote
        )
    }
}

#[async_trait]
impl QuoteSource for BinanceSource {
    fn venue(&self) -> &str {
        "binance"
    }

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote> {
        let body: Value = self
            .client
            .get(Self::ticker_url(pair))
            .send()
            .await
            .context("Binance ticker request failed")?
            .json()
            .await
            .context("Binance ticker returned non-JSON body")?;

        let quote = parse_book_ticker(&body, self.usd_to_aud)?;
        log::debug!("binance quote for {}: buy {} sell {}", pair.symbol, quote.buy_price, quote.sell_price);
        Ok(quote)
    }
}

/// USDT-quoted book ticker, converted to AUD.
fn parse_book_ticker(body: &Value, usd_to_aud: Decimal) -> Result<Quote> {
    let ask = decimal_field(&body["askPrice"], "askPrice")?;
    let bid = decimal_field(&body["bidPrice"], "bidPrice")?;
    Ok(Quote::new(ask * usd_to_aud, bid * usd_to_aud, taker_fee()))
}
