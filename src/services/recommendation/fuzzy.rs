use serde::Serialize;

use super::settings::{Axis, FuzzyConfig};
use crate::models::{Dish, Preferences};

/// Degree of membership of `x` in the triangle with knee points `a <= b <= c`.
///
/// Zero outside `[a, c]`, one at the peak. A shoulder where `a == b` or
/// `b == c` is full membership at that shoulder.
pub fn triangular(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x < a || x > c {
        return 0.0;
    }
    if x == b {
        return 1.0;
    }

    if x < b {
        (x - a) / (b - a)
    } else {
        (c - x) / (c - b)
    }
}

/// Fuzzy Jaccard similarity of two membership vectors, in `[0, 1]`.
///
/// Two all-zero vectors share nothing, so they score 0.
pub fn agreement(lhs: &[f64; 3], rhs: &[f64; 3]) -> f64 {
    let (intersection, union) = lhs
        .iter()
        .zip(rhs)
        .fold((0.0, 0.0), |(min, max), (l, r)| (min + l.min(*r), max + l.max(*r)));

    if union <= 0.0 {
        0.0
    } else {
        intersection / union
    }
}

/// Per-axis breakdown of a dish's base compatibility
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuzzyScore {
    /// Budget axis score after the overage penalty
    pub budget: f64,
    pub spiciness: f64,
    /// Weighted combination of the two axes
    pub base: f64,
}

/// Scores how well a dish's price and heat fit the user's budget and tolerance
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    config: FuzzyConfig,
}

impl FuzzyMatcher {
    pub fn new(config: FuzzyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FuzzyConfig {
        &self.config
    }

    fn axis_score(&self, axis: &Axis, preferred: f64, actual: f64) -> f64 {
        let score = agreement(&axis.memberships(preferred), &axis.memberships(actual));
        score * self.config.max_score()
    }

    /// Budget axis score, penalized linearly for every unit the price exceeds the budget
    pub fn budget_score(&self, budget: f64, price: f64) -> f64 {
        let axis = self.axis_score(self.config.budget(), budget, price);
        let overage = (price - budget).max(0.0);

        (axis - overage * self.config.budget_penalty_per_unit()).max(0.0)
    }

    pub fn spiciness_score(&self, tolerance: i32, spiciness: u8) -> f64 {
        self.axis_score(
            self.config.spiciness(),
            f64::from(tolerance),
            f64::from(spiciness),
        )
    }

    /// Base compatibility of `dish`, in `[0, max_score]`.
    ///
    /// Expects preferences that have already been clamped.
    pub fn score(&self, preferences: &Preferences, dish: &Dish) -> FuzzyScore {
        let budget = self.budget_score(preferences.budget, dish.price);
        let spiciness = self.spiciness_score(preferences.spiciness, dish.spiciness);
        let weights = self.config.weights();

        let base = (weights.budget * budget + weights.spiciness * spiciness)
            .clamp(0.0, self.config.max_score());

        FuzzyScore {
            budget,
            spiciness,
            base,
        }
    }
}
