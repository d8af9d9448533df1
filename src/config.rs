use anyhow::{Context, Result, ensure};
use rust_decimal::Decimal;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Pairs scanned each cycle, each evaluated and reported independently.
    pub trading_pairs: Vec<String>,
    /// Minimum profit percent for an opportunity to be actionable, 0..=100.
    pub min_profit_pct: Decimal,
    /// Notional invested per opportunity, in the display currency.
    pub investment_amount: Decimal,
    /// How many past scans the history ledger retains.
    pub history_capacity: usize,
    /// Venue ids to scan; must be known to the registry.
    pub venues: Vec<String>,
    pub scan_interval_seconds: u64,
    /// Bounded timeout per venue fetch, so one dead venue cannot stall a cycle.
    pub fetch_timeout_seconds: u64,
    /// Conversion applied to USD-quoted venues (CoinSpot and Independent
    /// Reserve quote AUD natively).
    pub usd_to_aud: Decimal,
    /// Starting balance of the paper wallet.
    pub wallet_balance: Decimal,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Config {
            trading_pairs: env::var("TRADING_PAIRS")
                .unwrap_or_else(|_| "BTC/USDT".to_string())
                .split(',')
                .map(|symbol| symbol.trim().to_ascii_uppercase())
                .filter(|symbol| !symbol.is_empty())
                .collect(),
            min_profit_pct: env::var("MIN_PROFIT_PCT")
                .unwrap_or_else(|_| "2.0".to_string())
                .parse()
                .context("Invalid MIN_PROFIT_PCT")?,
            investment_amount: env::var("INVESTMENT_AMOUNT")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("Invalid INVESTMENT_AMOUNT")?,
            history_capacity: env::var("HISTORY_CAPACITY")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid HISTORY_CAPACITY")?,
            venues: env::var("VENUES")
                .unwrap_or_else(|_| "binance,coinspot,independent_reserve,kraken".to_string())
                .split(',')
                .map(|name| name.trim().to_ascii_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
            scan_interval_seconds: env::var("SCAN_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid SCAN_INTERVAL_SECONDS")?,
            fetch_timeout_seconds: env::var("FETCH_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid FETCH_TIMEOUT_SECONDS")?,
            usd_to_aud: env::var("USD_TO_AUD")
                .unwrap_or_else(|_| "1.52".to_string())
                .parse()
                .context("Invalid USD_TO_AUD")?,
            wallet_balance: env::var("WALLET_BALANCE")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .context("Invalid WALLET_BALANCE")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.min_profit_pct >= Decimal::ZERO && self.min_profit_pct <= Decimal::from(100),
            "MIN_PROFIT_PCT must be between 0 and 100, got {}",
            self.min_profit_pct
        );
        ensure!(
            self.investment_amount > Decimal::ZERO,
            "INVESTMENT_AMOUNT must be positive, got {}",
            self.investment_amount
        );
        ensure!(self.history_capacity > 0, "HISTORY_CAPACITY must be at least 1");
        ensure!(!self.venues.is_empty(), "VENUES must name at least one venue");
        ensure!(
            !self.trading_pairs.is_empty(),
            "TRADING_PAIRS must name at least one pair"
        );
        ensure!(
            self.usd_to_aud > Decimal::ZERO,
            "USD_TO_AUD must be positive, got {}",
            self.usd_to_aud
        );
        Ok(())
    }
}
