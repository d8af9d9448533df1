use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Opportunity;
use crate::wallet::TradeRecord;

/// "AUD $74,312.50" — two decimals, thousands separators. The 2-dp rounding
/// happens here and nowhere else; engine arithmetic stays full precision.
/// The sign comes from the rounded value, so an amount that rounds to zero
/// prints unsigned.
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{} ${}{}", currency, sign, grouped_two_dp(rounded))
}

/// "+3.00%" / "-0.41%" — signed, two decimals.
pub fn format_pct(pct: Decimal) -> String {
    let rounded = pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "+" };
    format!("{}{}%", sign, two_dp(rounded.abs()))
}

/// One-line rendering of a scan result, the dashboards' "latest
/// opportunity" card.
pub fn format_opportunity(opp: &Opportunity) -> String {
    let cross = if opp.same_venue { " [same venue]" } else { "" };
    format!(
        "{} {} | buy {} @ {} -> sell {} @ {} | profit {} ({}){}",
        opp.timestamp.format("%H:%M:%S"),
        opp.pair,
        opp.buy_venue,
        format_money(opp.buy_price, "AUD"),
        opp.sell_venue,
        format_money(opp.sell_price, "AUD"),
        format_pct(opp.profit_pct),
        format_money(opp.profit_amount, "AUD"),
        cross,
    )
}

/// Compact rendering for the "last N scans" history block.
pub fn format_history_entry(opp: &Opportunity) -> String {
    format!(
        "{} buy {} ({}), sell {} ({}), profit {}",
        opp.timestamp.format("%H:%M:%S"),
        opp.buy_venue,
        format_money(opp.buy_price, "AUD"),
        opp.sell_venue,
        format_money(opp.sell_price, "AUD"),
        format_pct(opp.profit_pct),
    )
}

pub fn format_trade(trade: &TradeRecord) -> String {
    format!(
        "paper trade: {} -> {} on {} invested, net {}",
        trade.buy_venue,
        trade.sell_venue,
        format_money(trade.investment, "AUD"),
        format_money(trade.net_profit, "AUD"),
    )
}

fn grouped_two_dp(amount: Decimal) -> String {
    let text = two_dp(amount.abs());
    match text.split_once('.') {
        Some((int_part, frac_part)) => format!("{}.{}", group_thousands(int_part), frac_part),
        None => group_thousands(&text),
    }
}

fn two_dp(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = rounded.to_string();
    match text.split_once('.') {
        Some((int_part, frac_part)) if frac_part.len() >= 2 => {
            format!("{}.{}", int_part, &frac_part[..2])
        }
        Some((int_part, frac_part)) => format!("{}.{}0", int_part, frac_part),
        None => format!("{}.00", text),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 3 == offset % 3 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn money_gets_two_decimals_and_separators() {
        assert_eq!(format_money(dec!(74312.5), "AUD"), "AUD $74,312.50");
        assert_eq!(format_money(dec!(1000), "AUD"), "AUD $1,000.00");
        assert_eq!(format_money(dec!(999.999), "AUD"), "AUD $1,000.00");
        assert_eq!(format_money(dec!(12.3), "AUD"), "AUD $12.30");
        assert_eq!(format_money(dec!(-50.255), "AUD"), "AUD -$50.26");
        assert_eq!(format_money(dec!(1234567.89), "AUD"), "AUD $1,234,567.89");
    }

    #[test]
    fn amount_rounding_to_zero_prints_unsigned() {
        assert_eq!(format_money(dec!(-0.001), "AUD"), "AUD $0.00");
        assert_eq!(format_money(dec!(-0.004), "AUD"), "AUD $0.00");
        assert_eq!(format_money(dec!(-0.005), "AUD"), "AUD -$0.01");
    }

    #[test]
    fn percent_is_signed_with_two_decimals() {
        assert_eq!(format_pct(dec!(5)), "+5.00%");
        assert_eq!(format_pct(dec!(3.004)), "+3.00%");
        assert_eq!(format_pct(dec!(-0.405)), "-0.41%");
        assert_eq!(format_pct(dec!(0)), "+0.00%");
    }

    #[test]
    fn opportunity_renders_as_one_line() {
        let opp = Opportunity {
            id: Uuid::new_v4(),
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 15).unwrap(),
            pair: "BTC/USDT".to_string(),
            buy_venue: "binance".to_string(),
            sell_venue: "kraken".to_string(),
            buy_price: dec!(100),
            sell_price: dec!(105),
            buy_fee_rate: dec!(0.001),
            sell_fee_rate: dec!(0.0026),
            profit_pct: dec!(5),
            profit_amount: dec!(50),
            meets_threshold: true,
            same_venue: false,
        };

        assert_eq!(
            format_opportunity(&opp),
            "09:30:15 BTC/USDT | buy binance @ AUD $100.00 -> sell kraken @ AUD $105.00 \
             | profit +5.00% (AUD $50.00)"
        );
    }

    #[test]
    fn same_venue_result_is_marked() {
        let mut opp = Opportunity {
            id: Uuid::new_v4(),
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 15).unwrap(),
            pair: "BTC/USDT".to_string(),
            buy_venue: "x".to_string(),
            sell_venue: "x".to_string(),
            buy_price: dec!(100),
            sell_price: dec!(105),
            buy_fee_rate: dec!(0.001),
            sell_fee_rate: dec!(0.001),
            profit_pct: dec!(5),
            profit_amount: dec!(50),
            meets_threshold: true,
            same_venue: true,
        };
        assert!(format_opportunity(&opp).ends_with("[same venue]"));

        opp.same_venue = false;
        assert!(!format_opportunity(&opp).contains("[same venue]"));
    }
}
