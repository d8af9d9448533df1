use anyhow::Result;

use arb_scanner::config::Config;
use arb_scanner::scanner::Scanner;
use arb_scanner::venues::build_sources;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    let sources = build_sources(&config)?;

    let mut scanner = Scanner::new(config, sources)?;
    scanner.run().await
}
