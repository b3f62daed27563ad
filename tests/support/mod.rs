//! Shared fixtures for integration tests.

#![allow(dead_code)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use edgewise::domain::{OrderBook, PriceLevel, TokenId};

/// Book with a single deep bid level, for selling without slippage.
pub fn deep_bid_book(token_id: &str, price: Decimal) -> OrderBook {
    OrderBook::with_levels(
        TokenId::from(token_id),
        vec![PriceLevel::new(price, dec!(100000))],
        vec![],
    )
}

/// Book with a single deep ask level, for buying without slippage.
pub fn deep_ask_book(token_id: &str, price: Decimal) -> OrderBook {
    OrderBook::with_levels(
        TokenId::from(token_id),
        vec![],
        vec![PriceLevel::new(price, dec!(100000))],
    )
}

/// Book with explicit bid and ask ladders.
pub fn book(
    token_id: &str,
    bids: &[(Decimal, Decimal)],
    asks: &[(Decimal, Decimal)],
) -> OrderBook {
    OrderBook::with_levels(
        TokenId::from(token_id),
        bids.iter()
            .map(|&(price, size)| PriceLevel::new(price, size))
            .collect(),
        asks.iter()
            .map(|&(price, size)| PriceLevel::new(price, size))
            .collect(),
    )
}
