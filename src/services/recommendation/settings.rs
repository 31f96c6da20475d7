use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

use super::fuzzy::triangular;

const BUILTIN_FUZZY_CONFIG: &str = include_str!("../../../config/fuzzy.json");

/// Errors raised while loading or validating engine configuration.
///
/// All of these are fatal at startup.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read fuzzy configuration {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed fuzzy configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {axis} axis: {detail}")]
    Axis { axis: &'static str, detail: String },

    #[error("invalid setting {name}: {detail}")]
    Setting { name: &'static str, detail: String },
}

fn setting_error(name: &'static str, detail: impl Into<String>) -> ConfigError {
    ConfigError::Setting {
        name,
        detail: detail.into(),
    }
}

// ============================================================================
// Fuzzy membership configuration
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFuzzyConfig {
    max_score: f64,
    budget_penalty_per_unit: f64,
    weights: RawWeights,
    budget: RawAxis,
    spiciness: RawAxis,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWeights {
    budget: f64,
    spiciness: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAxis {
    universe_range: [f64; 2],
    terms: BTreeMap<String, [f64; 3]>,
}

/// A triangular linguistic term with knee points `a <= b <= c`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipTerm {
    pub name: String,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl MembershipTerm {
    pub fn degree(&self, x: f64) -> f64 {
        triangular(x, self.a, self.b, self.c)
    }
}

/// One preference axis partitioned into three terms, ordered by peak
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    universe: (f64, f64),
    terms: [MembershipTerm; 3],
}

impl Axis {
    fn parse(axis: &'static str, raw: RawAxis) -> Result<Self, ConfigError> {
        let fail = |detail: String| ConfigError::Axis { axis, detail };

        let [lo, hi] = raw.universe_range;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(fail(format!("universe [{lo}, {hi}] is empty or not finite")));
        }

        let mut terms = raw
            .terms
            .into_iter()
            .map(|(name, [a, b, c])| {
                if ![a, b, c].iter().all(|v| v.is_finite()) {
                    return Err(fail(format!("term {name} has non-finite knee points")));
                }
                if !(a <= b && b <= c) {
                    return Err(fail(format!("term {name} knee points must satisfy a <= b <= c")));
                }
                if a >= c {
                    return Err(fail(format!("term {name} has zero width")));
                }
                if a < lo || c > hi {
                    return Err(fail(format!("term {name} lies outside the universe")));
                }
                Ok(MembershipTerm { name, a, b, c })
            })
            .collect::<Result<Vec<_>, _>>()?;

        terms.sort_by(|x, y| x.b.total_cmp(&y.b).then(x.a.total_cmp(&y.a)));

        let count = terms.len();
        let terms: [MembershipTerm; 3] = terms
            .try_into()
            .map_err(|_| fail(format!("expected exactly 3 terms, found {count}")))?;

        Ok(Self {
            universe: (lo, hi),
            terms,
        })
    }

    pub fn universe(&self) -> (f64, f64) {
        self.universe
    }

    pub fn terms(&self) -> &[MembershipTerm; 3] {
        &self.terms
    }

    /// Membership degree of `x` in each term, after clamping into the universe
    pub fn memberships(&self, x: f64) -> [f64; 3] {
        let x = x.clamp(self.universe.0, self.universe.1);
        [
            self.terms[0].degree(x),
            self.terms[1].degree(x),
            self.terms[2].degree(x),
        ]
    }
}

/// Relative importance of each axis in the base score, normalized to sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisWeights {
    pub budget: f64,
    pub spiciness: f64,
}

impl AxisWeights {
    fn normalize(raw: RawWeights) -> Result<Self, ConfigError> {
        for (name, weight) in [("weights.budget", raw.budget), ("weights.spiciness", raw.spiciness)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(setting_error(name, "must be a finite, non-negative number"));
            }
        }

        let total = raw.budget + raw.spiciness;
        if total <= 0.0 {
            return Err(setting_error("weights", "at least one weight must be positive"));
        }

        Ok(Self {
            budget: raw.budget / total,
            spiciness: raw.spiciness / total,
        })
    }
}

/// Membership curves and scoring scale used by the fuzzy matcher
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyConfig {
    max_score: f64,
    budget_penalty_per_unit: f64,
    weights: AxisWeights,
    budget: Axis,
    spiciness: Axis,
}

impl FuzzyConfig {
    /// Parses and validates a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawFuzzyConfig = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Reads and validates the configuration file at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "Loaded fuzzy configuration");

        Ok(config)
    }

    /// The configuration shipped in `config/fuzzy.json`
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_FUZZY_CONFIG)
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    pub fn budget_penalty_per_unit(&self) -> f64 {
        self.budget_penalty_per_unit
    }

    pub fn weights(&self) -> AxisWeights {
        self.weights
    }

    pub fn budget(&self) -> &Axis {
        &self.budget
    }

    pub fn spiciness(&self) -> &Axis {
        &self.spiciness
    }
}

impl TryFrom<RawFuzzyConfig> for FuzzyConfig {
    type Error = ConfigError;

    fn try_from(raw: RawFuzzyConfig) -> Result<Self, Self::Error> {
        if !raw.max_score.is_finite() || raw.max_score <= 0.0 {
            return Err(setting_error("max_score", "must be a finite, positive number"));
        }
        if !raw.budget_penalty_per_unit.is_finite() || raw.budget_penalty_per_unit < 0.0 {
            return Err(setting_error(
                "budget_penalty_per_unit",
                "must be a finite, non-negative number",
            ));
        }

        Ok(Self {
            max_score: raw.max_score,
            budget_penalty_per_unit: raw.budget_penalty_per_unit,
            weights: AxisWeights::normalize(raw.weights)?,
            budget: Axis::parse("budget", raw.budget)?,
            spiciness: Axis::parse("spiciness", raw.spiciness)?,
        })
    }
}

// ============================================================================
// Rule and ranking configuration
// ============================================================================

/// Bonus amounts and the budget ceiling used by the rule engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuleConfig {
    pub cuisine_bonus: f64,
    pub halal_bonus: f64,
    pub vegetarian_bonus: f64,
    pub meal_type_bonus: f64,
    /// Dishes priced above `budget * over_budget_tolerance` are excluded
    pub over_budget_tolerance: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            cuisine_bonus: 1.0,
            halal_bonus: 2.0,
            vegetarian_bonus: 2.0,
            meal_type_bonus: 5.0,
            over_budget_tolerance: 1.0,
        }
    }
}

impl RuleConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let bonuses = [
            ("cuisine_bonus", self.cuisine_bonus),
            ("halal_bonus", self.halal_bonus),
            ("vegetarian_bonus", self.vegetarian_bonus),
            ("meal_type_bonus", self.meal_type_bonus),
        ];

        for (name, bonus) in bonuses {
            if !bonus.is_finite() || bonus < 0.0 {
                return Err(setting_error(name, "must be a finite, non-negative number"));
            }
        }

        if !self.over_budget_tolerance.is_finite() || self.over_budget_tolerance < 1.0 {
            return Err(setting_error(
                "over_budget_tolerance",
                "must be a finite number of at least 1.0",
            ));
        }

        Ok(())
    }
}

/// Inclusion threshold and result size used by the ranker
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankingConfig {
    pub top_n: usize,
    /// Dishes must score strictly above this to be recommended
    pub min_score: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: 3,
            min_score: 0.0,
        }
    }
}

impl RankingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(setting_error("top_n", "must be at least 1"));
        }
        if !self.min_score.is_finite() {
            return Err(setting_error("min_score", "must be finite"));
        }

        Ok(())
    }
}

/// Complete, validated configuration of the recommendation engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    fuzzy: FuzzyConfig,
    rules: RuleConfig,
    ranking: RankingConfig,
}

impl EngineConfig {
    pub fn new(
        fuzzy: FuzzyConfig,
        rules: RuleConfig,
        ranking: RankingConfig,
    ) -> Result<Self, ConfigError> {
        rules.validate()?;
        ranking.validate()?;

        Ok(Self {
            fuzzy,
            rules,
            ranking,
        })
    }

    pub fn fuzzy(&self) -> &FuzzyConfig {
        &self.fuzzy
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn ranking(&self) -> &RankingConfig {
        &self.ranking
    }
}
