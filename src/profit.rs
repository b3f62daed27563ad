//! Cost-adjusted profitability screening.
//!
//! The projector's margin is a rate per unit of notional and ignores
//! execution costs. This module converts it to expected dollars by walking
//! live order-book depth: each leg of the trade vector pays the slippage of
//! its volume-weighted fill relative to the top of book, and the whole
//! position pays a flat fee on notional.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::DetectorConfig;
use crate::domain::{Opportunity, OrderBook, Side, MIN_TRADE_SIZE};

/// Volume-weighted average fill price for a trade of `size` shares.
///
/// Walks the asks for buys and the bids for sells, tightest level first,
/// filling `min(remaining, level.size)` at each level. Returns the average
/// price over what filled, or zero when nothing filled.
#[must_use]
pub fn vwap(book: &OrderBook, side: Side, size: Decimal) -> Decimal {
    let levels = match side {
        Side::Buy => book.asks(),
        Side::Sell => book.bids(),
    };

    if levels.is_empty() {
        return Decimal::ZERO;
    }

    let mut remaining = size;
    let mut total_cost = Decimal::ZERO;
    let mut total_filled = Decimal::ZERO;

    for level in levels {
        let fill = remaining.min(level.size());
        total_cost += fill * level.price();
        total_filled += fill;
        remaining -= fill;

        if remaining <= Decimal::ZERO {
            break;
        }
    }

    if total_filled.is_zero() {
        Decimal::ZERO
    } else {
        total_cost / total_filled
    }
}

/// Relative deviation of the fill price from the top of book.
///
/// Returns 1 (worst case) when the relevant side quotes zero, which also
/// covers sells into an empty bid side. Buys into an empty ask side price
/// against the default ask of 1 and likewise come back as full slippage.
#[must_use]
pub fn slippage(book: &OrderBook, side: Side, size: Decimal) -> Decimal {
    let fill = vwap(book, side, size);
    let best = match side {
        Side::Buy => book.best_ask(),
        Side::Sell => book.best_bid(),
    };

    if best.is_zero() {
        return Decimal::ONE;
    }

    (fill - best).abs() / best
}

/// Converts margin rates into expected net dollars after costs.
#[derive(Debug, Clone)]
pub struct ProfitEstimator {
    fee_rate: Decimal,
    trade_notional_usd: Decimal,
    min_profit_usd: Decimal,
}

impl ProfitEstimator {
    /// Create an estimator with explicit cost parameters.
    #[must_use]
    pub fn new(fee_rate: Decimal, trade_notional_usd: Decimal, min_profit_usd: Decimal) -> Self {
        Self {
            fee_rate,
            trade_notional_usd,
            min_profit_usd,
        }
    }

    /// Create an estimator from the detector configuration.
    #[must_use]
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(
            config.fee_rate,
            config.trade_notional_usd,
            config.min_profit_usd,
        )
    }

    /// Expected net dollars from deploying the configured notional.
    ///
    /// `books[k]` must be the book for `opportunity.market_indices()[k]`.
    /// Legs whose trade-vector entry is dust are skipped; a missing book
    /// contributes worst-case slippage for its leg.
    #[must_use]
    pub fn net_usd(&self, opportunity: &Opportunity, books: &[OrderBook]) -> Decimal {
        let notional = self.trade_notional_usd;
        let gross = to_decimal(opportunity.expected_profit()) * notional;

        let mut weighted_slippage = Decimal::ZERO;
        for (k, &idx) in opportunity.market_indices().iter().enumerate() {
            let t = opportunity.trade_vector().get(idx).copied().unwrap_or(0.0);
            if t.abs() < MIN_TRADE_SIZE {
                continue;
            }

            let side = if t > 0.0 { Side::Buy } else { Side::Sell };
            let weight = to_decimal(t.abs());

            let leg_slippage = match books.get(k) {
                Some(book) => slippage(book, side, weight * notional),
                None => Decimal::ONE,
            };
            weighted_slippage += leg_slippage * weight;
        }

        let fees = notional * self.fee_rate;
        let slippage_cost = weighted_slippage * notional;
        let net = gross - fees - slippage_cost;

        debug!(%gross, %fees, %slippage_cost, %net, "cost screen");

        net
    }

    /// True when the expected net clears the configured profit floor.
    #[must_use]
    pub fn is_profitable(&self, opportunity: &Opportunity, books: &[OrderBook]) -> bool {
        self.net_usd(opportunity, books) >= self.min_profit_usd
    }
}

fn to_decimal(x: f64) -> Decimal {
    Decimal::try_from(x).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PriceLevel, TokenId};
    use crate::polytope::FeasibilityResult;
    use crate::projection::Projection;
    use rust_decimal_macros::dec;

    fn ask_book(levels: &[(Decimal, Decimal)]) -> OrderBook {
        OrderBook::with_levels(
            TokenId::from("tok"),
            vec![],
            levels
                .iter()
                .map(|&(price, size)| PriceLevel::new(price, size))
                .collect(),
        )
    }

    fn bid_book(levels: &[(Decimal, Decimal)]) -> OrderBook {
        OrderBook::with_levels(
            TokenId::from("tok"),
            levels
                .iter()
                .map(|&(price, size)| PriceLevel::new(price, size))
                .collect(),
            vec![],
        )
    }

    fn opportunity(prices: &[f64], optimal: &[f64], profit: f64) -> Opportunity {
        let trade_vector: Vec<f64> = optimal
            .iter()
            .zip(prices.iter())
            .map(|(q, p)| q - p)
            .collect();
        let projection = Projection {
            optimal: optimal.to_vec(),
            trade_vector,
            profit,
            iterations: 1,
            converged: true,
            oracle_failed: false,
            elapsed_ms: 0.1,
        };
        let feasibility = FeasibilityResult {
            feasible: false,
            violation: 0.1,
            dual: vec![0.1],
        };
        Opportunity::from_projection(prices, &projection, &feasibility).unwrap()
    }

    #[test]
    fn vwap_within_top_level_is_best_price() {
        let book = ask_book(&[(dec!(0.60), dec!(10))]);

        assert_eq!(vwap(&book, Side::Buy, dec!(5)), dec!(0.60));
        assert_eq!(slippage(&book, Side::Buy, dec!(5)), Decimal::ZERO);
    }

    #[test]
    fn vwap_caps_at_available_depth() {
        // Only 10 shares on the book; a 100-share request fills what exists.
        let book = ask_book(&[(dec!(0.60), dec!(10))]);

        assert_eq!(vwap(&book, Side::Buy, dec!(100)), dec!(0.60));
        assert_eq!(slippage(&book, Side::Buy, dec!(100)), Decimal::ZERO);
    }

    #[test]
    fn vwap_blends_across_levels() {
        let book = ask_book(&[(dec!(0.60), dec!(10)), (dec!(0.65), dec!(100))]);

        // 10 at 0.60 plus 10 at 0.65 averages 0.625.
        assert_eq!(vwap(&book, Side::Buy, dec!(20)), dec!(0.625));

        let slip = slippage(&book, Side::Buy, dec!(20));
        assert!((slip - dec!(0.0417)).abs() < dec!(0.0001), "slip = {}", slip);
    }

    #[test]
    fn vwap_is_monotone_in_size() {
        let buy = ask_book(&[
            (dec!(0.50), dec!(10)),
            (dec!(0.55), dec!(10)),
            (dec!(0.70), dec!(50)),
        ]);
        let sizes = [dec!(5), dec!(10), dec!(15), dec!(30), dec!(60)];

        let mut previous = Decimal::ZERO;
        for size in sizes {
            let fill = vwap(&buy, Side::Buy, size);
            assert!(fill >= previous, "buy vwap decreased at size {}", size);
            previous = fill;
        }

        let sell = bid_book(&[
            (dec!(0.55), dec!(100)),
            (dec!(0.50), dec!(200)),
            (dec!(0.40), dec!(500)),
        ]);
        let mut previous = Decimal::ONE;
        for size in sizes {
            let fill = vwap(&sell, Side::Sell, size);
            assert!(fill <= previous, "sell vwap increased at size {}", size);
            previous = fill;
        }
    }

    #[test]
    fn sell_side_walks_bids() {
        let book = bid_book(&[(dec!(0.55), dec!(100)), (dec!(0.50), dec!(200))]);

        let fill = vwap(&book, Side::Sell, dec!(150));
        let expected = (dec!(100) * dec!(0.55) + dec!(50) * dec!(0.50)) / dec!(150);
        assert_eq!(fill, expected);
    }

    #[test]
    fn empty_book_is_worst_case() {
        let empty = OrderBook::new(TokenId::from("tok"));

        assert_eq!(vwap(&empty, Side::Buy, dec!(10)), Decimal::ZERO);
        assert_eq!(vwap(&empty, Side::Sell, dec!(10)), Decimal::ZERO);
        assert_eq!(slippage(&empty, Side::Buy, dec!(10)), Decimal::ONE);
        assert_eq!(slippage(&empty, Side::Sell, dec!(10)), Decimal::ONE);
    }

    #[test]
    fn net_usd_subtracts_fees_from_gross() {
        let estimator = ProfitEstimator::new(dec!(0.02), dec!(100), dec!(0.50));

        // Selling both legs into deep bids: no slippage.
        let opp = opportunity(&[0.7, 0.6], &[0.55, 0.45], 0.05);
        let books = vec![
            bid_book(&[(dec!(0.69), dec!(100000))]),
            bid_book(&[(dec!(0.59), dec!(100000))]),
        ];

        // gross 5.00 minus fees 2.00.
        assert_eq!(estimator.net_usd(&opp, &books), dec!(3.00));
        assert!(estimator.is_profitable(&opp, &books));
    }

    #[test]
    fn thin_books_charge_slippage() {
        let estimator = ProfitEstimator::new(dec!(0.02), dec!(100), dec!(0.50));

        let opp = opportunity(&[0.7, 0.6], &[0.55, 0.45], 0.05);
        let deep = vec![
            bid_book(&[(dec!(0.69), dec!(100000))]),
            bid_book(&[(dec!(0.59), dec!(100000))]),
        ];
        let thin = vec![
            bid_book(&[(dec!(0.69), dec!(5)), (dec!(0.50), dec!(100000))]),
            bid_book(&[(dec!(0.59), dec!(100000))]),
        ];

        assert!(estimator.net_usd(&opp, &thin) < estimator.net_usd(&opp, &deep));
    }

    #[test]
    fn missing_book_charges_full_slippage() {
        let estimator = ProfitEstimator::new(dec!(0.02), dec!(100), dec!(0.50));

        let opp = opportunity(&[0.7, 0.6], &[0.55, 0.45], 0.05);

        // gross 5.00, fees 2.00, slippage 0.15 * 100 * 2 = 30.00.
        let net = estimator.net_usd(&opp, &[]);
        assert!(net < Decimal::ZERO);
        assert!(!estimator.is_profitable(&opp, &[]));
    }

    #[test]
    fn floor_is_inclusive() {
        // Zero fees, deep books: net equals gross.
        let estimator = ProfitEstimator::new(Decimal::ZERO, dec!(100), dec!(0.50));

        let opp = opportunity(&[0.7, 0.6], &[0.55, 0.45], 0.005);
        let books = vec![
            bid_book(&[(dec!(0.69), dec!(100000))]),
            bid_book(&[(dec!(0.59), dec!(100000))]),
        ];

        assert_eq!(estimator.net_usd(&opp, &books), dec!(0.50));
        assert!(estimator.is_profitable(&opp, &books));
    }
}
