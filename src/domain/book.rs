//! Order book types and thread-safe cache.
//!
//! An order book has two sides:
//! - **Bids**: buy orders, sorted by price descending (best bid first)
//! - **Asks**: sell orders, sorted by price ascending (best ask first)
//!
//! The derived accessors use the conventions of a `[0, 1]` outcome share:
//! an empty bid side quotes 0 and an empty ask side quotes 1.
//!
//! # Examples
//!
//! ```
//! use edgewise::domain::{OrderBook, PriceLevel, TokenId};
//! use rust_decimal_macros::dec;
//!
//! let book = OrderBook::with_levels(
//!     TokenId::from("yes-token"),
//!     vec![PriceLevel::new(dec!(0.45), dec!(100))],
//!     vec![PriceLevel::new(dec!(0.46), dec!(150))],
//! );
//!
//! assert_eq!(book.best_bid(), dec!(0.45));
//! assert_eq!(book.best_ask(), dec!(0.46));
//! assert_eq!(book.spread(), dec!(0.01));
//! ```

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Volume represented as a Decimal for precision.
pub type Volume = Decimal;

/// Unique identifier for a tradeable token (outcome share).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(String);

impl TokenId {
    /// Creates a new token identifier from a string value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the token ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TokenId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for TokenId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Which side of the book a trade hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Lift asks.
    Buy,
    /// Hit bids.
    Sell,
}

/// A single price level in the order book.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    size: Volume,
}

impl PriceLevel {
    /// Create a new price level.
    #[must_use]
    pub fn new(price: Price, size: Volume) -> Self {
        Self { price, size }
    }

    /// Get the price.
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Get the size/volume.
    #[must_use]
    pub fn size(&self) -> Volume {
        self.size
    }
}

/// Order book for a single token.
#[derive(Debug, Clone)]
pub struct OrderBook {
    token_id: TokenId,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
}

impl OrderBook {
    /// Create a new empty order book.
    #[must_use]
    pub fn new(token_id: TokenId) -> Self {
        Self {
            token_id,
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    /// Create an order book with initial levels.
    #[must_use]
    pub fn with_levels(token_id: TokenId, bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self {
            token_id,
            bids,
            asks,
        }
    }

    /// Get the token ID.
    #[must_use]
    pub fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    /// Get all bid levels.
    #[must_use]
    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    /// Get all ask levels.
    #[must_use]
    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    /// Best bid, or 0 if the bid side is empty.
    #[must_use]
    pub fn best_bid(&self) -> Price {
        self.bids.first().map_or(Decimal::ZERO, PriceLevel::price)
    }

    /// Best ask, or 1 if the ask side is empty.
    #[must_use]
    pub fn best_ask(&self) -> Price {
        self.asks.first().map_or(Decimal::ONE, PriceLevel::price)
    }

    /// Midpoint between best bid and best ask.
    #[must_use]
    pub fn midpoint(&self) -> Price {
        (self.best_bid() + self.best_ask()) / Decimal::TWO
    }

    /// Spread between best ask and best bid.
    #[must_use]
    pub fn spread(&self) -> Price {
        self.best_ask() - self.best_bid()
    }
}

/// Thread-safe cache of order books, keyed by token.
///
/// The hand-off point between an exchange feed writing snapshots and the
/// profit estimator reading them.
pub struct BookCache {
    books: RwLock<HashMap<TokenId, OrderBook>>,
}

impl BookCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            books: RwLock::new(HashMap::new()),
        }
    }

    /// Update an order book in the cache.
    pub fn update(&self, book: OrderBook) {
        let token_id = book.token_id().clone();
        self.books.write().insert(token_id, book);
    }

    /// Get a snapshot of an order book.
    pub fn get(&self, token_id: &TokenId) -> Option<OrderBook> {
        self.books.read().get(token_id).cloned()
    }

    /// Number of books in the cache.
    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BookCache {
    fn default() -> Self {
        Self::new()
    }
}
