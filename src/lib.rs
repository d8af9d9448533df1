//! Cross-exchange arbitrage scanner: polls venue price feeds, ranks the
//! best buy/sell pairing, and keeps a bounded history of past scans.

pub mod config;
pub mod display;
pub mod engine;
pub mod ledger;
pub mod models;
pub mod scanner;
pub mod venues;
pub mod wallet;

pub use config::Config;
pub use engine::{EngineError, evaluate};
pub use ledger::HistoryLedger;
pub use models::{Opportunity, Quote, TradingPair};
pub use scanner::Scanner;
pub use wallet::Wallet;
