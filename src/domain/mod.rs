//! Exchange-agnostic domain types.

mod book;
mod dependency;
mod opportunity;

pub use book::{BookCache, OrderBook, Price, PriceLevel, Side, TokenId, Volume};
pub use dependency::{Dependency, Relation};
pub use opportunity::{Opportunity, MIN_TRADE_SIZE};
