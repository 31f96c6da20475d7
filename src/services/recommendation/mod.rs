//! Dish recommendation engine
//!
//! A pure function from preferences and a catalog snapshot to either a ranked
//! list or an explanation of why nothing could be recommended:
//!
//! 1. preferences are clamped into their valid ranges
//! 2. hard filters remove dishes that break a dietary or budget constraint
//! 3. the fuzzy matcher scores budget and spiciness fit of each survivor
//! 4. bonus rules add fixed amounts for cuisine, diet and meal-type matches
//! 5. the ranker thresholds, sorts and truncates

pub mod fuzzy;
pub mod ranker;
pub mod rules;
pub mod settings;

use tracing::instrument;

use crate::{
    models::{
        ExclusionCounts, FilterSummary, NoResults, NoResultsCause, Outcome, Preferences,
        RecommendationReport,
    },
    services::catalog::Catalog,
};
use fuzzy::FuzzyMatcher;
use ranker::{Ranker, ScoredDish};
use rules::{RuleEngine, Screening};

pub use settings::{ConfigError, EngineConfig, FuzzyConfig, RankingConfig, RuleConfig};

/// Stateless recommender holding only immutable configuration
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    config: EngineConfig,
    matcher: FuzzyMatcher,
    rules: RuleEngine,
    ranker: Ranker,
}

impl RecommendationEngine {
    pub fn new(config: EngineConfig) -> Self {
        let matcher = FuzzyMatcher::new(config.fuzzy().clone());
        let rules = RuleEngine::new(config.rules());
        let ranker = Ranker::new(*config.ranking(), config.fuzzy().max_score());

        Self {
            config,
            matcher,
            rules,
            ranker,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    /// Recommends dishes from `catalog`. Never fails: degenerate inputs
    /// produce a no-results outcome instead.
    #[instrument(skip_all, fields(catalog_size = catalog.len()))]
    pub fn recommend<'a>(
        &self,
        preferences: &Preferences,
        catalog: &'a Catalog,
    ) -> RecommendationReport<'a> {
        let preferences = preferences.clamped();
        let screening = self.rules.screen(&preferences, catalog.dishes());

        let summary = FilterSummary {
            total_candidates: catalog.len(),
            eligible_candidates: screening.eligible.len(),
            excluded: screening.excluded,
        };

        let outcome = if catalog.is_empty() {
            no_results(NoResultsCause::CatalogEmpty, None)
        } else if screening.eligible.is_empty() {
            self.all_excluded(&screening)
        } else {
            let scored = screening
                .eligible
                .iter()
                .map(|&dish| {
                    let fuzzy = self.matcher.score(&preferences, dish);
                    let bonuses = self.rules.bonuses(&preferences, dish);
                    tracing::debug!(
                        dish_id = dish.id,
                        base = fuzzy.base,
                        bonuses = bonuses.len(),
                        "Scored dish"
                    );

                    ScoredDish {
                        dish,
                        fuzzy,
                        bonuses,
                    }
                })
                .collect();

            let recommendations = self.ranker.rank(scored);
            if recommendations.is_empty() {
                no_results(
                    NoResultsCause::BelowThreshold,
                    Some(
                        "To find more options, try adjusting your spiciness tolerance or budget."
                            .to_string(),
                    ),
                )
            } else {
                Outcome::Ranked { recommendations }
            }
        };

        match &outcome {
            Outcome::Ranked { recommendations } => tracing::info!(
                eligible = summary.eligible_candidates,
                returned = recommendations.len(),
                "Ranked recommendations"
            ),
            Outcome::NoResults(explanation) => tracing::info!(
                eligible = summary.eligible_candidates,
                excluded = summary.excluded.total(),
                cause = ?explanation.cause,
                "No recommendations"
            ),
        }

        RecommendationReport { outcome, summary }
    }

    fn all_excluded(&self, screening: &Screening<'_>) -> Outcome<'static> {
        let ExclusionCounts {
            not_halal,
            not_vegetarian,
            over_budget,
        } = screening.excluded;

        let cause = match (not_halal > 0, not_vegetarian > 0, over_budget > 0) {
            (true, false, false) => NoResultsCause::NoHalalDishes,
            (false, true, false) => NoResultsCause::NoVegetarianDishes,
            (false, false, true) => NoResultsCause::OverBudget,
            _ => NoResultsCause::NoMatchingDishes,
        };

        let mut options = Vec::new();
        if not_halal > 0 {
            options.push("disable the halal filter if acceptable".to_string());
        }
        if not_vegetarian > 0 {
            options.push("consider non-vegetarian options".to_string());
        }
        if let Some(cheapest) = screening.cheapest_over_budget {
            let needed = cheapest / self.rules.over_budget_tolerance();
            options.push(format!("try raising your budget to at least ${needed:.2}"));
        }

        let suggestion =
            (!options.is_empty()).then(|| format!("To find more options, {}.", options.join(" or ")));

        no_results(cause, suggestion)
    }
}

fn no_results(cause: NoResultsCause, suggestion: Option<String>) -> Outcome<'static> {
    Outcome::NoResults(NoResults {
        cause,
        reason: cause.reason().to_string(),
        suggestion,
    })
}
