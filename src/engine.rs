use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Opportunity, Quote};

/// Failure modes of [`evaluate`]. Both are local, recoverable conditions;
/// the engine performs no I/O and cannot fail partway.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("need at least 2 venue quotes to rank, have {have}")]
    InsufficientData { have: usize },

    #[error("venue '{venue}' quoted a non-positive price {price}")]
    InvalidQuote { venue: String, price: Decimal },
}

/// Rank a snapshot of per-venue quotes into a single cross-venue
/// opportunity: buy at the venue with the lowest buy price, sell at the
/// venue with the highest sell price.
///
/// The quote map is keyed by venue id; `BTreeMap` iteration order plus
/// strict-inequality selection makes ties resolve to the lexicographically
/// first venue regardless of how the caller assembled the map.
///
/// The result is returned whether or not it clears `min_profit_pct` —
/// thresholding is the caller's policy, exposed via
/// [`Opportunity::meets_threshold`]. When one venue wins both sides the
/// result is still reported, flagged [`Opportunity::same_venue`].
pub fn evaluate(
    quotes: &BTreeMap<String, Quote>,
    investment: Decimal,
    min_profit_pct: Decimal,
    pair: &str,
    now: DateTime<Utc>,
) -> Result<Opportunity, EngineError> {
    if quotes.len() < 2 {
        return Err(EngineError::InsufficientData { have: quotes.len() });
    }

    // Reject non-positive prices before ranking; a zero buy price would
    // divide by zero in the profit formula.
    for (venue, quote) in quotes {
        for price in [quote.buy_price, quote.sell_price] {
            if price <= Decimal::ZERO {
                return Err(EngineError::InvalidQuote {
                    venue: venue.clone(),
                    price,
                });
            }
        }
    }

    let (buy_venue, buy_quote) =
        select(quotes, |candidate, best| candidate.buy_price < best.buy_price)?;
    let (sell_venue, sell_quote) =
        select(quotes, |candidate, best| candidate.sell_price > best.sell_price)?;

    let buy_price = buy_quote.buy_price;
    let sell_price = sell_quote.sell_price;

    // Full precision throughout; rounding happens only at display time.
    let profit_pct = (sell_price - buy_price) / buy_price * Decimal::from(100);
    let profit_amount = investment * profit_pct / Decimal::from(100);

    Ok(Opportunity {
        id: Uuid::new_v4(),
        timestamp: now,
        pair: pair.to_string(),
        buy_venue: buy_venue.clone(),
        sell_venue: sell_venue.clone(),
        buy_price,
        sell_price,
        buy_fee_rate: buy_quote.fee_rate,
        sell_fee_rate: sell_quote.fee_rate,
        profit_pct,
        profit_amount,
        meets_threshold: profit_pct >= min_profit_pct,
        same_venue: buy_venue == sell_venue,
    })
}

/// First entry (in key order) for which no later entry is strictly better.
fn select<'a, F>(
    quotes: &'a BTreeMap<String, Quote>,
    better: F,
) -> Result<(&'a String, &'a Quote), EngineError>
where
    F: Fn(&Quote, &Quote) -> bool,
{
    let mut best: Option<(&String, &Quote)> = None;
    for (venue, quote) in quotes {
        match best {
            Some((_, current)) if !better(quote, current) => {}
            _ => best = Some((venue, quote)),
        }
    }
    best.ok_or(EngineError::InsufficientData { have: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote(buy: Decimal, sell: Decimal) -> Quote {
        Quote::new(buy, sell, dec!(0.001))
    }

    fn quotes(entries: &[(&str, Decimal, Decimal)]) -> BTreeMap<String, Quote> {
        entries
            .iter()
            .map(|(venue, buy, sell)| (venue.to_string(), quote(*buy, *sell)))
            .collect()
    }

    #[test]
    fn picks_cheapest_buy_and_richest_sell() {
        let map = quotes(&[
            ("binance", dec!(100), dec!(99)),
            ("kraken", dec!(102), dec!(103)),
        ]);
        let opp = evaluate(&map, dec!(1000), dec!(1.0), "BTC/USDT", Utc::now()).unwrap();

        assert_eq!(opp.buy_venue, "binance");
        assert_eq!(opp.sell_venue, "kraken");
        assert_eq!(opp.buy_price, dec!(100));
        assert_eq!(opp.sell_price, dec!(103));
        assert_eq!(opp.profit_pct, dec!(3));
        assert_eq!(opp.profit_amount, dec!(30));
        assert!(opp.meets_threshold);
        assert!(!opp.same_venue);
    }

    #[test]
    fn profit_formula_round_trips() {
        let map = quotes(&[("a", dec!(100), dec!(90)), ("b", dec!(120), dec!(105))]);
        let opp = evaluate(&map, dec!(1000), dec!(10.0), "BTC/USDT", Utc::now()).unwrap();

        assert_eq!(opp.buy_price, dec!(100));
        assert_eq!(opp.sell_price, dec!(105));
        assert_eq!(opp.profit_pct, dec!(5));
        assert_eq!(opp.profit_amount, dec!(50));
        assert!(!opp.meets_threshold);
    }

    #[test]
    fn fewer_than_two_quotes_is_insufficient() {
        let empty = BTreeMap::new();
        assert_eq!(
            evaluate(&empty, dec!(1000), dec!(1.0), "BTC/USDT", Utc::now()),
            Err(EngineError::InsufficientData { have: 0 })
        );

        let one = quotes(&[("binance", dec!(100), dec!(99))]);
        assert_eq!(
            evaluate(&one, dec!(1000), dec!(1.0), "BTC/USDT", Utc::now()),
            Err(EngineError::InsufficientData { have: 1 })
        );
    }

    #[test]
    fn non_positive_price_is_rejected_before_ranking() {
        let map = quotes(&[("binance", dec!(0), dec!(99)), ("kraken", dec!(102), dec!(103))]);
        assert_eq!(
            evaluate(&map, dec!(1000), dec!(1.0), "BTC/USDT", Utc::now()),
            Err(EngineError::InvalidQuote {
                venue: "binance".to_string(),
                price: dec!(0),
            })
        );

        let map = quotes(&[("binance", dec!(100), dec!(-1)), ("kraken", dec!(102), dec!(103))]);
        assert!(matches!(
            evaluate(&map, dec!(1000), dec!(1.0), "BTC/USDT", Utc::now()),
            Err(EngineError::InvalidQuote { .. })
        ));
    }

    #[test]
    fn ties_resolve_to_lexicographically_first_venue() {
        // Same minimal buy price on two venues; same maximal sell price on
        // two venues. Insert order must not matter.
        for entries in [
            [
                ("bybit", dec!(100), dec!(104)),
                ("ava", dec!(100), dec!(104)),
                ("zeta", dec!(101), dec!(104)),
            ],
            [
                ("zeta", dec!(101), dec!(104)),
                ("ava", dec!(100), dec!(104)),
                ("bybit", dec!(100), dec!(104)),
            ],
        ] {
            let map = quotes(&entries);
            let opp = evaluate(&map, dec!(1000), dec!(1.0), "BTC/USDT", Utc::now()).unwrap();
            assert_eq!(opp.buy_venue, "ava");
            assert_eq!(opp.sell_venue, "ava");
        }
    }

    #[test]
    fn deterministic_apart_from_id_and_timestamp() {
        let map = quotes(&[
            ("binance", dec!(74000), dec!(73900)),
            ("kraken", dec!(74150), dec!(74100)),
            ("coinspot", dec!(74500), dec!(74420)),
        ]);
        let a = evaluate(&map, dec!(1000), dec!(0.5), "BTC/AUD", Utc::now()).unwrap();
        let b = evaluate(&map, dec!(1000), dec!(0.5), "BTC/AUD", Utc::now()).unwrap();

        assert_eq!(a.buy_venue, b.buy_venue);
        assert_eq!(a.sell_venue, b.sell_venue);
        assert_eq!(a.profit_pct, b.profit_pct);
        assert_eq!(a.profit_amount, b.profit_amount);
        assert_eq!(a.meets_threshold, b.meets_threshold);
        assert_eq!(a.same_venue, b.same_venue);
    }

    #[test]
    fn same_venue_winner_is_reported_with_flag() {
        // "x" is both the cheapest buy and the richest sell; profit comes
        // from its own (inverted) spread.
        let map = quotes(&[("x", dec!(100), dec!(105)), ("y", dec!(110), dec!(104))]);
        let opp = evaluate(&map, dec!(1000), dec!(1.0), "BTC/USDT", Utc::now()).unwrap();

        assert!(opp.same_venue);
        assert_eq!(opp.buy_venue, "x");
        assert_eq!(opp.sell_venue, "x");
        assert_eq!(opp.profit_pct, dec!(5));
    }

    #[test]
    fn negative_spread_still_returns_an_opportunity() {
        let map = quotes(&[("a", dec!(100), dec!(95)), ("b", dec!(101), dec!(96))]);
        let opp = evaluate(&map, dec!(1000), dec!(1.0), "BTC/USDT", Utc::now()).unwrap();

        assert_eq!(opp.profit_pct, dec!(-4));
        assert_eq!(opp.profit_amount, dec!(-40));
        assert!(!opp.meets_threshold);
    }

    #[test]
    fn fee_rates_are_carried_from_the_winning_quotes() {
        let mut map = BTreeMap::new();
        map.insert("cheap".to_string(), Quote::new(dec!(100), dec!(99), dec!(0.001)));
        map.insert("rich".to_string(), Quote::new(dec!(104), dec!(103), dec!(0.0026)));
        let opp = evaluate(&map, dec!(1000), dec!(1.0), "BTC/USDT", Utc::now()).unwrap();

        assert_eq!(opp.buy_fee_rate, dec!(0.001));
        assert_eq!(opp.sell_fee_rate, dec!(0.0026));
    }
}
