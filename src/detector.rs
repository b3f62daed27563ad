//! Per-tick arbitrage detection pipeline.
//!
//! Wires the polytope, projector, and profit screen into a single scan-tick
//! entry point:
//!
//! ```text
//! prices -> feasibility check
//!   feasible      -> None
//!   infeasible    -> Frank-Wolfe projection
//!     oracle fail -> None
//!     otherwise   -> assemble opportunity -> cost screen
//!       below floor -> None
//!       above floor -> Some(opportunity)
//! ```
//!
//! No state survives between ticks; the detector only holds the immutable
//! polytope and its collaborators and may be shared across threads scanning
//! independent price snapshots.

use tracing::{debug, info};

use crate::config::DetectorConfig;
use crate::domain::{Dependency, Opportunity, OrderBook};
use crate::error::{Error, Result};
use crate::polytope::MarginalPolytope;
use crate::profit::ProfitEstimator;
use crate::projection::{FrankWolfe, FrankWolfeConfig};
use crate::solver::{HighsOracle, LpOracle};

/// Detects combinatorial arbitrage across a fixed set of related markets.
pub struct Detector<S = HighsOracle> {
    polytope: MarginalPolytope,
    oracle: S,
    frank_wolfe: FrankWolfe,
    estimator: ProfitEstimator,
}

impl Detector<HighsOracle> {
    /// Build a detector for `num_markets` markets under the given
    /// dependencies, using the HiGHS oracle.
    #[must_use]
    pub fn new(num_markets: usize, deps: &[Dependency], config: &DetectorConfig) -> Self {
        Self::with_oracle(num_markets, deps, config, HighsOracle::new())
    }
}

impl<S: LpOracle> Detector<S> {
    /// Build a detector with a caller-supplied LP oracle.
    #[must_use]
    pub fn with_oracle(
        num_markets: usize,
        deps: &[Dependency],
        config: &DetectorConfig,
        oracle: S,
    ) -> Self {
        let polytope = MarginalPolytope::build(num_markets, deps);
        let frank_wolfe = FrankWolfe::new(FrankWolfeConfig {
            max_iterations: config.fw_max_iters,
            tolerance: config.fw_tolerance,
        });
        let estimator = ProfitEstimator::from_config(config);

        Self {
            polytope,
            oracle,
            frank_wolfe,
            estimator,
        }
    }

    /// The compiled constraint set this detector scans against.
    #[must_use]
    pub fn polytope(&self) -> &MarginalPolytope {
        &self.polytope
    }

    /// Run one scan tick over a price snapshot.
    ///
    /// `books[k]` must be the order book for the k-th entry of the emitted
    /// opportunity's market list; callers fetch books after a projection
    /// produced trades, so ticks that end early never touch them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] when the price vector length
    /// does not match the polytope.
    pub fn scan_tick(&self, prices: &[f64], books: &[OrderBook]) -> Result<Option<Opportunity>> {
        if prices.len() != self.polytope.num_variables() {
            return Err(Error::DimensionMismatch {
                expected: self.polytope.num_variables(),
                actual: prices.len(),
            });
        }

        let feasibility = self.polytope.check_feasibility(prices);
        if feasibility.feasible {
            return Ok(None);
        }

        debug!(
            violation = feasibility.violation,
            "prices outside the polytope"
        );

        let projection = self
            .frank_wolfe
            .project(prices, &self.polytope, &self.oracle);
        if projection.oracle_failed {
            return Ok(None);
        }

        let Some(opportunity) = Opportunity::from_projection(prices, &projection, &feasibility)
        else {
            return Ok(None);
        };

        if !self.estimator.is_profitable(&opportunity, books) {
            debug!("not profitable after fees and slippage");
            return Ok(None);
        }

        info!(
            markets = opportunity.market_indices().len(),
            margin = opportunity.expected_profit(),
            mispricing = opportunity.mispricing(),
            iterations = projection.iterations,
            elapsed_ms = projection.elapsed_ms,
            "arbitrage opportunity"
        );

        Ok(Some(opportunity))
    }
}
