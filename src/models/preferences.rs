use serde::{Deserialize, Serialize};
use std::{fmt::Display, ops::RangeInclusive, str::FromStr};

use super::{Cuisine, MealType, ParseEnumError};

/// Budget range accepted by the engine, in SGD
pub const BUDGET_RANGE: RangeInclusive<f64> = 5.0..=50.0;

/// Spiciness tolerance range accepted by the engine
pub const SPICINESS_RANGE: RangeInclusive<i32> = 0..=10;

/// Cuisine requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CuisinePreference {
    #[default]
    Any,
    Only(Cuisine),
}

impl CuisinePreference {
    /// Returns true when a specific cuisine was requested and the dish has it
    pub fn matches(&self, cuisine: Cuisine) -> bool {
        matches!(self, CuisinePreference::Only(wanted) if *wanted == cuisine)
    }
}

impl Display for CuisinePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CuisinePreference::Any => f.write_str("any"),
            CuisinePreference::Only(cuisine) => write!(f, "{}", cuisine),
        }
    }
}

impl FromStr for CuisinePreference {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("any") {
            return Ok(CuisinePreference::Any);
        }

        value.parse().map(CuisinePreference::Only)
    }
}

impl TryFrom<String> for CuisinePreference {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CuisinePreference> for String {
    fn from(value: CuisinePreference) -> Self {
        value.to_string()
    }
}

/// Preferences for a single recommendation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Maximum spend in SGD
    pub budget: f64,
    pub cuisine: CuisinePreference,
    /// Spiciness tolerance from 0 to 10
    pub spiciness: i32,
    /// Only halal dishes are acceptable
    pub is_halal: bool,
    /// Only vegetarian dishes are acceptable
    pub is_vegetarian: bool,
    #[serde(default)]
    pub meal_type: Option<MealType>,
}

impl Preferences {
    /// Returns a copy with numeric values clamped into their valid domains.
    ///
    /// A NaN budget falls back to the lowest accepted budget.
    pub fn clamped(&self) -> Self {
        let budget = if self.budget.is_nan() {
            *BUDGET_RANGE.start()
        } else {
            self.budget.clamp(*BUDGET_RANGE.start(), *BUDGET_RANGE.end())
        };

        Self {
            budget,
            spiciness: self
                .spiciness
                .clamp(*SPICINESS_RANGE.start(), *SPICINESS_RANGE.end()),
            ..self.clone()
        }
    }
}
