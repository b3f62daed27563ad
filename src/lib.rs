//! Edgewise - Combinatorial arbitrage detection for binary prediction markets.
//!
//! When quoted prices violate the logical constraints among related events
//! (implications, mutual exclusions, exhaustive partitions), a near-risk-free
//! combination of trades exists. This crate finds the closest consistent
//! price vector, derives the trade vector that closes the gap, and screens it
//! against fees and order-book depth.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── domain/       # Value types: dependencies, order books, opportunities
//! ├── polytope      # Marginal polytope builder + feasibility tester
//! ├── solver/       # LP oracle abstraction (HiGHS via good_lp)
//! ├── projection/   # Frank-Wolfe I-projection under reverse KL
//! ├── profit        # VWAP, slippage, cost-adjusted profit screen
//! └── detector      # Per-tick pipeline gluing the above
//! ```
//!
//! # Pipeline
//!
//! A dependency set is compiled once into a [`polytope::MarginalPolytope`].
//! Each scan tick, the current price vector is tested for feasibility; if it
//! lies outside the polytope, [`projection::FrankWolfe`] projects it back
//! using the LP oracle, and the resulting trade vector is priced against
//! live order books by [`profit::ProfitEstimator`]. Opportunities clearing
//! the profit floor are emitted to the caller's executor.

pub mod config;
pub mod detector;
pub mod domain;
pub mod error;
pub mod polytope;
pub mod profit;
pub mod projection;
pub mod solver;

pub use config::{Config, DetectorConfig};
pub use detector::Detector;
pub use domain::{Dependency, Opportunity, OrderBook, PriceLevel, Relation, Side, TokenId};
pub use error::{Error, Result};
pub use polytope::{FeasibilityResult, MarginalPolytope};
pub use projection::{FrankWolfe, FrankWolfeConfig, Projection};
