use serde::Serialize;

use super::Dish;

/// A ranked dish with its score and the reasons it was picked
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation<'a> {
    pub dish: &'a Dish,
    /// Base score plus every bonus that fired
    pub score: f64,
    /// Fuzzy compatibility before rule bonuses
    pub base_score: f64,
    pub reasons: Vec<String>,
}

/// Why a recommendation call produced nothing to rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoResultsCause {
    CatalogEmpty,
    NoHalalDishes,
    NoVegetarianDishes,
    OverBudget,
    NoMatchingDishes,
    BelowThreshold,
}

impl NoResultsCause {
    pub fn reason(&self) -> &'static str {
        match self {
            NoResultsCause::CatalogEmpty => "The dish catalog is empty",
            NoResultsCause::NoHalalDishes => "No halal dishes available",
            NoResultsCause::NoVegetarianDishes => "No vegetarian dishes available",
            NoResultsCause::OverBudget => "All dishes exceeded your budget",
            NoResultsCause::NoMatchingDishes => {
                "No dishes satisfy your dietary and budget constraints"
            }
            NoResultsCause::BelowThreshold => "No dishes scored high enough to recommend",
        }
    }
}

/// Explanation returned instead of an empty list
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NoResults {
    pub cause: NoResultsCause,
    pub reason: String,
    pub suggestion: Option<String>,
}

/// Number of dishes removed by each hard filter
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ExclusionCounts {
    pub not_halal: usize,
    pub not_vegetarian: usize,
    pub over_budget: usize,
}

impl ExclusionCounts {
    pub fn total(&self) -> usize {
        self.not_halal + self.not_vegetarian + self.over_budget
    }
}

/// Candidate counts reported alongside every outcome
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct FilterSummary {
    pub total_candidates: usize,
    pub eligible_candidates: usize,
    pub excluded: ExclusionCounts,
}

/// Either a ranked list or a structured explanation of why there is none
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<'a> {
    #[serde(rename = "ok")]
    Ranked {
        recommendations: Vec<Recommendation<'a>>,
    },
    NoResults(NoResults),
}

impl<'a> Outcome<'a> {
    pub fn recommendations(&self) -> &[Recommendation<'a>] {
        match self {
            Outcome::Ranked { recommendations } => recommendations,
            Outcome::NoResults(_) => &[],
        }
    }

    pub fn no_results(&self) -> Option<&NoResults> {
        match self {
            Outcome::Ranked { .. } => None,
            Outcome::NoResults(no_results) => Some(no_results),
        }
    }
}

/// Full result of a recommendation call
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationReport<'a> {
    #[serde(flatten)]
    pub outcome: Outcome<'a>,
    pub summary: FilterSummary,
}
