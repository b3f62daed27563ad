//! Frank-Wolfe conditional-gradient projection.

use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::polytope::MarginalPolytope;
use crate::solver::LpOracle;

use super::kl::{clamp_unit, kl_divergence, kl_gradient};

/// Ternary-bisection steps of the exact line search.
const LINE_SEARCH_STEPS: usize = 30;

/// Configuration for the Frank-Wolfe projector.
#[derive(Debug, Clone, Deserialize)]
pub struct FrankWolfeConfig {
    /// Maximum outer iterations per projection.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Duality-gap threshold below which the iterate counts as converged.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_max_iterations() -> usize {
    150
}

fn default_tolerance() -> f64 {
    1e-8
}

impl Default for FrankWolfeConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

/// Result of one projection run.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Projected point `q*`, inside the polytope up to tolerance.
    pub optimal: Vec<f64>,
    /// `q* - p`: positive entries are buys, negative entries are sells.
    pub trade_vector: Vec<f64>,
    /// Margin rate: `max(D_KL(p || q*), l1(trade_vector) / 2)`.
    pub profit: f64,
    /// Completed outer iterations.
    pub iterations: usize,
    /// True when the duality gap dropped below the configured tolerance.
    pub converged: bool,
    /// True when the LP oracle failed mid-run; the caller should discard
    /// the tick.
    pub oracle_failed: bool,
    /// Wall time of the projection in milliseconds.
    pub elapsed_ms: f64,
}

impl Projection {
    /// Check whether the margin clears a threshold.
    #[must_use]
    pub fn has_arbitrage(&self, threshold: f64) -> bool {
        self.profit > threshold
    }
}

/// Frank-Wolfe I-projection onto the marginal polytope.
///
/// Per iteration: linearize the reverse KL objective at the current iterate,
/// let the LP oracle pick the minimizing vertex, stop once the duality gap
/// `g . (q - v)` is small, otherwise move along the segment toward the
/// vertex by an exact line search.
pub struct FrankWolfe {
    config: FrankWolfeConfig,
}

impl FrankWolfe {
    /// Create a projector with the given configuration.
    #[must_use]
    pub fn new(config: FrankWolfeConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &FrankWolfeConfig {
        &self.config
    }

    /// Project `prices` onto the polytope.
    ///
    /// Starts from the hypercube centre rather than from the prices
    /// themselves: the centre is interior (so the first gradient is well
    /// behaved) and the first LP step lands on the polytope even when the
    /// centre itself is outside it, as with an exactly-one partition.
    ///
    /// A polytope without constraints short-circuits: the centre is
    /// returned untouched and the oracle is never called.
    pub fn project<S: LpOracle>(
        &self,
        prices: &[f64],
        polytope: &MarginalPolytope,
        oracle: &S,
    ) -> Projection {
        let start = Instant::now();
        let n = prices.len();

        let p: Vec<f64> = prices.iter().map(|&x| clamp_unit(x)).collect();
        let mut q = vec![0.5; n];

        let mut iterations = 0;
        let mut converged = false;
        let mut oracle_failed = false;

        if polytope.num_constraints() == 0 {
            converged = true;
        } else {
            for k in 0..self.config.max_iterations {
                iterations = k + 1;

                let grad = kl_gradient(&p, &q);

                let Some(v) = oracle.minimize(polytope, &grad) else {
                    warn!(iteration = k, "LP oracle failed during projection");
                    oracle_failed = true;
                    break;
                };

                let gap: f64 = grad
                    .iter()
                    .zip(q.iter())
                    .zip(v.iter())
                    .map(|((g, qi), vi)| g * (qi - vi))
                    .sum();

                if gap < self.config.tolerance {
                    converged = true;
                    debug!(iteration = k, gap, "projection converged");
                    break;
                }

                let gamma = line_search(&p, &q, &v);

                for i in 0..n {
                    q[i] = clamp_unit((1.0 - gamma) * q[i] + gamma * v[i]);
                }
            }
        }

        let kl = kl_divergence(&p, &q);
        let trade_vector: Vec<f64> = q.iter().zip(prices.iter()).map(|(qi, pi)| qi - pi).collect();
        let l1_half = trade_vector.iter().map(|t| t.abs()).sum::<f64>() * 0.5;

        // The KL term is the information gap, the L1 term the net position
        // change; the larger of the two is the conservative margin rate.
        let profit = kl.max(l1_half);

        Projection {
            optimal: q,
            trade_vector,
            profit,
            iterations,
            converged,
            oracle_failed,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

/// Exact line search: minimize `D_KL(p || (1-gamma) q + gamma v)` over
/// `gamma in [0, 1]`.
///
/// The objective is convex in `gamma`, so ternary bisection homes in on the
/// unique minimum; the midpoint of the final interval is returned.
fn line_search(p: &[f64], q: &[f64], v: &[f64]) -> f64 {
    let kl_at = |gamma: f64| -> f64 {
        p.iter()
            .zip(q.iter())
            .zip(v.iter())
            .map(|((&pi, &qi), &vi)| {
                let blend = clamp_unit((1.0 - gamma) * qi + gamma * vi);
                pi * (pi / blend).ln() + (1.0 - pi) * ((1.0 - pi) / (1.0 - blend)).ln()
            })
            .sum()
    };

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    for _ in 0..LINE_SEARCH_STEPS {
        let g1 = lo + (hi - lo) / 3.0;
        let g2 = lo + 2.0 * (hi - lo) / 3.0;

        if kl_at(g1) < kl_at(g2) {
            hi = g2;
        } else {
            lo = g1;
        }
    }

    (lo + hi) / 2.0
}
