mod dish;
mod preferences;
mod recommendation;

pub use dish::{Course, Cuisine, Dish, MealType, ParseEnumError};
pub use preferences::{CuisinePreference, Preferences, BUDGET_RANGE, SPICINESS_RANGE};
pub use recommendation::{
    ExclusionCounts, FilterSummary, NoResults, NoResultsCause, Outcome, Recommendation,
    RecommendationReport,
};
