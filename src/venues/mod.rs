use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::time::Duration;

use crate::config::Config;
use crate::models::{Quote, TradingPair};

pub mod binance;
pub mod bitget;
pub mod bybit;
pub mod coinspot;
pub mod crypto_com;
pub mod independent_reserve;
pub mod kraken;
pub mod kucoin;
pub mod mock;
pub mod okx;

/// One venue's quote normalizer: fetches the public ticker and produces a
/// normalized AUD [`Quote`]. Fetch and parse failures surface as errors to
/// the scanner, which demotes them to "no quote for this venue".
#[async_trait]
pub trait QuoteSource: Send + Sync {
    fn venue(&self) -> &str;

    async fn fetch_quote(&self, pair: &TradingPair) -> Result<Quote>;
}

impl std::fmt::Debug for dyn QuoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteSource").field("venue", &self.venue()).finish()
    }
}

/// Boxed sources for the configured venue names, in config order. Venue
/// names prefixed `sim-` get the offline simulated source; every real venue
/// name gets its live public-ticker source. Unknown names are a startup
/// error rather than a silent skip.
pub fn build_sources(config: &Config) -> Result<Vec<Box<dyn QuoteSource>>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_seconds))
        .build()?;

    let mut sources: Vec<Box<dyn QuoteSource>> = Vec::with_capacity(config.venues.len());
    for name in &config.venues {
        let source: Box<dyn QuoteSource> = match name.as_str() {
            "binance" => Box::new(binance::BinanceSource::new(client.clone(), config.usd_to_aud)),
            "kraken" => Box::new(kraken::KrakenSource::new(client.clone(), config.usd_to_aud)),
            "coinspot" => Box::new(coinspot::CoinSpotSource::new(client.clone())),
            "independent_reserve" => {
                Box::new(independent_reserve::IndependentReserveSource::new(client.clone()))
            }
            "kucoin" => Box::new(kucoin::KuCoinSource::new(client.clone(), config.usd_to_aud)),
            "okx" => Box::new(okx::OkxSource::new(client.clone(), config.usd_to_aud)),
            "bybit" => Box::new(bybit::BybitSource::new(client.clone(), config.usd_to_aud)),
            "bitget" => Box::new(bitget::BitgetSource::new(client.clone(), config.usd_to_aud)),
            "crypto_com" => {
                Box::new(crypto_com::CryptoComSource::new(client.clone(), config.usd_to_aud))
            }
            sim if sim.starts_with("sim-") => Box::new(mock::SimulatedSource::new(sim)),
            other => bail!("Unknown venue '{}' in VENUES", other),
        };
        sources.push(source);
    }
    Ok(sources)
}

/// Ticker fields arrive as JSON strings on some venues and numbers on
/// others; accept both.
pub(crate) fn decimal_field(value: &serde_json::Value, field: &str) -> Result<Decimal> {
    if let Some(text) = value.as_str() {
        return text
            .parse()
            .map_err(|e| anyhow!("Field '{}': cannot parse '{}' as decimal: {}", field, text, e));
    }
    if let Some(number) = value.as_f64() {
        return Decimal::try_from(number)
            .map_err(|e| anyhow!("Field '{}': cannot convert {} to decimal: {}", field, number, e));
    }
    bail!("Field '{}' is neither a string nor a number: {}", field, value)
}
