use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{QuoteSource, decimal_field};
use crate::models::{Quote, TradingPair};

/// Taker fee, 0.5%.
fn taker_fee() -> Decimal {
    Decimal::new(5, 3)
}

/// AUD-native venue; no currency conversion needed.
pub struct IndependentReserveSource {
    client: reqwest::Client,
}

impl IndependentReserveSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Independent Reserve spells bitcoin Xbt and uses title-case codes.
    fn summary_url(pair: &TradingPair) -> String {
        let primary = match pair.base.as_str() {
            "BTC" => "Xbt".to_string(),
            other => title_case(other),
        };
        format!(
            "https://api.independentreserve.com/Public/GetMarketSummary?primaryCurrencyCode={}&secondaryCurrencyCode=Aud",
            primary
        )
    }
}

fn title_case(code: &str) -> String {
    let mut chars = code.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

#[async_trait]
impl QuoteSource for IndependentReserveSource {
    fn venue(&self) -> &str {
        "independent_reserve"
    }

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote> {
        let body: Value = self
            .client
            .get(Self::summary_url(pair))
            .send()
            .await
            .context("Independent Reserve market summary request failed")?
            .json()
            .await
            .context("Independent Reserve market summary returned non-JSON body")?;

        let quote = parse_market_summary(&body)?;
        log::debug!(
            "independent_reserve quote for {}: buy {} sell {}",
            pair.symbol,
            quote.buy_price,
            quote.sell_price
        );
        Ok(quote)
    }
}

/// Buying costs the lowest offer; selling earns the highest bid.
fn parse_market_summary(body: &Value) -> Result<Quote> {
    let ask = decimal_field(&body["CurrentLowestOfferPrice"], "CurrentLowestOfferPrice")?;
    let bid = decimal_field(&body["CurrentHighestBidPrice"], "CurrentHighestBidPrice")?;
    Ok(Quote::new(ask, bid, taker_fee()))
}
