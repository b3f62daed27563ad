//! Opportunity types for arbitrage detection.
//!
//! An [`Opportunity`] packages one detected mispricing: the observed prices,
//! the closest consistent prices, and the trade vector that closes the gap.
//! `expected_profit` is a dimensionless margin rate per unit of notional;
//! converting it to dollars is the profit estimator's job.

use std::time::Instant;

use crate::polytope::FeasibilityResult;
use crate::projection::Projection;

/// Trade-vector entries at or below this magnitude are treated as dust and
/// excluded from the opportunity's market list.
pub const MIN_TRADE_SIZE: f64 = 1e-6;

/// A detected arbitrage opportunity across a set of related markets.
#[derive(Debug, Clone)]
pub struct Opportunity {
    market_indices: Vec<usize>,
    current_prices: Vec<f64>,
    optimal_prices: Vec<f64>,
    trade_vector: Vec<f64>,
    expected_profit: f64,
    mispricing: f64,
    detected_at: Instant,
}

impl Opportunity {
    /// Assembles an opportunity from a completed projection.
    ///
    /// Returns `None` when the projection found no positive margin, when the
    /// margin is not finite, or when every trade-vector entry is dust.
    /// `market_indices` lists the non-dust entries in ascending order.
    ///
    /// Pure apart from the timestamp: no books or fees are consulted here.
    #[must_use]
    pub fn from_projection(
        prices: &[f64],
        projection: &Projection,
        feasibility: &FeasibilityResult,
    ) -> Option<Self> {
        if !projection.profit.is_finite() || projection.profit <= 0.0 {
            return None;
        }

        let market_indices: Vec<usize> = projection
            .trade_vector
            .iter()
            .enumerate()
            .filter(|(_, t)| t.abs() > MIN_TRADE_SIZE)
            .map(|(i, _)| i)
            .collect();

        if market_indices.is_empty() {
            return None;
        }

        Some(Self {
            market_indices,
            current_prices: prices.to_vec(),
            optimal_prices: projection.optimal.clone(),
            trade_vector: projection.trade_vector.clone(),
            expected_profit: projection.profit,
            mispricing: feasibility.violation,
            detected_at: Instant::now(),
        })
    }

    /// Indices of markets with a non-dust trade, ascending.
    #[must_use]
    pub fn market_indices(&self) -> &[usize] {
        &self.market_indices
    }

    /// Observed prices at detection time.
    #[must_use]
    pub fn current_prices(&self) -> &[f64] {
        &self.current_prices
    }

    /// Projected arbitrage-free prices.
    #[must_use]
    pub fn optimal_prices(&self) -> &[f64] {
        &self.optimal_prices
    }

    /// Position changes to move the market onto the consistent prices.
    /// Positive entries are buys, negative entries are sells.
    #[must_use]
    pub fn trade_vector(&self) -> &[f64] {
        &self.trade_vector
    }

    /// Expected margin rate per unit of notional deployed.
    #[must_use]
    pub fn expected_profit(&self) -> f64 {
        self.expected_profit
    }

    /// Magnitude of the worst constraint violation at detection time.
    #[must_use]
    pub fn mispricing(&self) -> f64 {
        self.mispricing
    }

    /// Monotonic reading taken when the opportunity was assembled.
    #[must_use]
    pub fn detected_at(&self) -> Instant {
        self.detected_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(optimal: Vec<f64>, trade_vector: Vec<f64>, profit: f64) -> Projection {
        Projection {
            optimal,
            trade_vector,
            profit,
            iterations: 5,
            converged: true,
            oracle_failed: false,
            elapsed_ms: 0.1,
        }
    }

    fn violated(violation: f64) -> FeasibilityResult {
        FeasibilityResult {
            feasible: false,
            violation,
            dual: vec![violation],
        }
    }

    #[test]
    fn assembles_non_dust_indices_ascending() {
        let prices = vec![0.7, 0.5, 0.6];
        let proj = projection(
            vec![0.55, 0.5, 0.45],
            vec![-0.15, 0.0, -0.15],
            0.15,
        );

        let opp = Opportunity::from_projection(&prices, &proj, &violated(0.3)).unwrap();

        assert_eq!(opp.market_indices(), &[0, 2]);
        assert_eq!(opp.trade_vector(), &[-0.15, 0.0, -0.15]);
        assert_eq!(opp.expected_profit(), 0.15);
        assert_eq!(opp.mispricing(), 0.3);
    }

    #[test]
    fn rejects_zero_profit() {
        let proj = projection(vec![0.5, 0.5], vec![-0.1, 0.1], 0.0);
        assert!(Opportunity::from_projection(&[0.6, 0.4], &proj, &violated(0.1)).is_none());
    }

    #[test]
    fn rejects_nan_profit() {
        let proj = projection(vec![0.5, 0.5], vec![-0.1, 0.1], f64::NAN);
        assert!(Opportunity::from_projection(&[0.6, 0.4], &proj, &violated(0.1)).is_none());
    }

    #[test]
    fn rejects_all_dust_trades() {
        let proj = projection(vec![0.5, 0.5], vec![1e-9, -1e-9], 0.05);
        assert!(Opportunity::from_projection(&[0.5, 0.5], &proj, &violated(0.1)).is_none());
    }

    #[test]
    fn dust_threshold_is_strict() {
        let proj = projection(vec![0.5, 0.5], vec![MIN_TRADE_SIZE, 2e-6], 0.05);
        let opp =
            Opportunity::from_projection(&[0.5, 0.5], &proj, &violated(0.1)).unwrap();

        // Entry exactly at the threshold is dust, the larger one is kept.
        assert_eq!(opp.market_indices(), &[1]);
    }
}
