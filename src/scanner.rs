use anyhow::Result;
use chrono::Utc;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::Config;
use crate::display;
use crate::engine::{self, EngineError};
use crate::ledger::HistoryLedger;
use crate::models::{Quote, TradingPair};
use crate::venues::QuoteSource;
use crate::wallet::Wallet;

/// Periodic scan driver: fetch all venues, evaluate, record, paper-trade.
/// Owns the history ledger and the wallet; exactly one cycle writes at a
/// time.
pub struct Scanner {
    config: Config,
    pairs: Vec<TradingPair>,
    sources: Vec<Box<dyn QuoteSource>>,
    ledger: HistoryLedger,
    wallet: Wallet,
}

impl Scanner {
    pub fn new(config: Config, sources: Vec<Box<dyn QuoteSource>>) -> Result<Self> {
        let pairs = config
            .trading_pairs
            .iter()
            .map(|symbol| TradingPair::parse(symbol))
            .collect::<Result<Vec<_>>>()?;
        let ledger = HistoryLedger::new(config.history_capacity);
        let wallet = Wallet::new(config.wallet_balance);
        Ok(Self {
            config,
            pairs,
            sources,
            ledger,
            wallet,
        })
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub async fn run(&mut self) -> Result<()> {
        log::info!(
            "Starting arbitrage scanner: [{}] across [{}], every {}s",
            self.config.trading_pairs.join(", "),
            self.config.venues.join(", "),
            self.config.scan_interval_seconds
        );

        loop {
            self.scan_once().await;
            sleep(Duration::from_secs(self.config.scan_interval_seconds)).await;
        }
    }

    /// One scan cycle: every configured pair evaluated and reported
    /// independently.
    pub async fn scan_once(&mut self) {
        let pairs = self.pairs.clone();
        for pair in &pairs {
            self.scan_pair(pair).await;
        }
    }

    /// Evaluate one pair. Every successful evaluation is recorded; the
    /// paper wallet only trades genuine cross-venue opportunities above the
    /// threshold.
    async fn scan_pair(&mut self, pair: &TradingPair) {
        let quotes = self.collect_quotes(pair).await;

        let result = engine::evaluate(
            &quotes,
            self.config.investment_amount,
            self.config.min_profit_pct,
            &pair.symbol,
            Utc::now(),
        );

        match result {
            Ok(opportunity) => {
                if opportunity.meets_threshold && !opportunity.same_venue {
                    log::info!("Opportunity found! {}", display::format_opportunity(&opportunity));
                    match self.wallet.execute(&opportunity, self.config.investment_amount) {
                        Some(trade) => log::info!(
                            "{} | balance {}",
                            display::format_trade(&trade),
                            display::format_money(self.wallet.balance(), "AUD")
                        ),
                        None => log::warn!(
                            "Balance {} cannot cover the trade",
                            display::format_money(self.wallet.balance(), "AUD")
                        ),
                    }
                } else if opportunity.same_venue {
                    log::info!(
                        "No cross-venue edge: {}",
                        display::format_opportunity(&opportunity)
                    );
                } else {
                    log::info!(
                        "No opportunity above {}: {}",
                        display::format_pct(self.config.min_profit_pct),
                        display::format_opportunity(&opportunity)
                    );
                }

                self.ledger.record(opportunity);
                self.log_history();
            }
            Err(e @ EngineError::InsufficientData { .. }) => {
                // Neutral state, not a scan failure; nothing is recorded.
                log::warn!("Not enough data for {} this cycle: {}", pair.symbol, e);
            }
            Err(e @ EngineError::InvalidQuote { .. }) => {
                log::error!("Rejected quote snapshot for {}: {}", pair.symbol, e);
            }
        }
    }

    /// Best-effort snapshot: all sources fetched concurrently, each under a
    /// bounded timeout; a failed or slow venue yields no quote rather than
    /// failing the cycle.
    async fn collect_quotes(&self, pair: &TradingPair) -> BTreeMap<String, Quote> {
        let timeout = Duration::from_secs(self.config.fetch_timeout_seconds);
        let fetches = self.sources.iter().map(|source| async move {
            let outcome = tokio::time::timeout(timeout, source.fetch_quote(pair)).await;
            (source.venue().to_string(), outcome)
        });

        let mut quotes = BTreeMap::new();
        for (venue, outcome) in join_all(fetches).await {
            match outcome {
                Ok(Ok(quote)) => {
                    quotes.insert(venue, quote);
                }
                Ok(Err(e)) => log::warn!("No quote from {}: {:#}", venue, e),
                Err(_) => log::warn!("No quote from {}: timed out after {:?}", venue, timeout),
            }
        }
        quotes
    }

    fn log_history(&self) {
        // The dashboards' "last N-1 scans" block, newest first.
        for k in 1..self.ledger.len() {
            if let Some(entry) = self.ledger.previous(k) {
                log::info!("  past scan: {}", display::format_history_entry(entry));
            }
        }
    }
}
