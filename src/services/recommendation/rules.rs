use serde::Serialize;

use super::settings::RuleConfig;
use crate::models::{Dish, ExclusionCounts, Preferences};

/// Hard filter that removed a dish from consideration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
    NotHalal,
    NotVegetarian,
    OverBudget,
}

/// A named bonus awarded when its predicate holds for a preference/dish pair
#[derive(Debug, Clone, Serialize)]
pub struct BonusRule {
    pub name: &'static str,
    #[serde(skip)]
    applies: fn(&Preferences, &Dish) -> bool,
    pub bonus: f64,
    pub reason: &'static str,
}

impl BonusRule {
    pub fn applies(&self, preferences: &Preferences, dish: &Dish) -> bool {
        (self.applies)(preferences, dish)
    }
}

/// A bonus that fired for a particular dish
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AppliedBonus {
    pub rule: &'static str,
    pub bonus: f64,
    pub reason: &'static str,
}

/// Dishes that survived the hard filters, plus what the filters removed
#[derive(Debug, Clone, Default)]
pub struct Screening<'a> {
    pub eligible: Vec<&'a Dish>,
    pub excluded: ExclusionCounts,
    /// Cheapest price among dishes removed only for exceeding the budget
    pub cheapest_over_budget: Option<f64>,
}

/// Hard dietary and budget filters followed by an ordered list of bonus rules
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<BonusRule>,
    over_budget_tolerance: f64,
}

impl RuleEngine {
    pub fn new(config: &RuleConfig) -> Self {
        let rules = vec![
            BonusRule {
                name: "cuisine_match",
                applies: |prefs, dish| prefs.cuisine.matches(dish.cuisine),
                bonus: config.cuisine_bonus,
                reason: "Matches your preferred cuisine",
            },
            BonusRule {
                name: "halal_match",
                applies: |prefs, dish| prefs.is_halal && dish.is_halal,
                bonus: config.halal_bonus,
                reason: "Halal-certified",
            },
            BonusRule {
                name: "vegetarian_match",
                applies: |prefs, dish| prefs.is_vegetarian && dish.is_vegetarian,
                bonus: config.vegetarian_bonus,
                reason: "Vegetarian-friendly",
            },
            BonusRule {
                name: "meal_type_match",
                applies: |prefs, dish| prefs.meal_type == Some(dish.meal_type),
                bonus: config.meal_type_bonus,
                reason: "Perfect for your meal time",
            },
        ];

        Self {
            rules,
            over_budget_tolerance: config.over_budget_tolerance,
        }
    }

    pub fn rules(&self) -> &[BonusRule] {
        &self.rules
    }

    pub fn over_budget_tolerance(&self) -> f64 {
        self.over_budget_tolerance
    }

    /// Highest price a dish may have and still be considered
    pub fn budget_ceiling(&self, preferences: &Preferences) -> f64 {
        preferences.budget * self.over_budget_tolerance
    }

    /// First hard filter the dish fails, checked halal, vegetarian, then budget
    pub fn exclusion(&self, preferences: &Preferences, dish: &Dish) -> Option<Exclusion> {
        if preferences.is_halal && !dish.is_halal {
            Some(Exclusion::NotHalal)
        } else if preferences.is_vegetarian && !dish.is_vegetarian {
            Some(Exclusion::NotVegetarian)
        } else if dish.price > self.budget_ceiling(preferences) {
            Some(Exclusion::OverBudget)
        } else {
            None
        }
    }

    /// Runs every dish through the hard filters, keeping catalog order
    pub fn screen<'a>(&self, preferences: &Preferences, dishes: &'a [Dish]) -> Screening<'a> {
        let mut screening = Screening::default();

        for dish in dishes {
            match self.exclusion(preferences, dish) {
                None => screening.eligible.push(dish),
                Some(exclusion) => {
                    tracing::debug!(dish_id = dish.id, reason = ?exclusion, "Excluded dish");

                    match exclusion {
                        Exclusion::NotHalal => screening.excluded.not_halal += 1,
                        Exclusion::NotVegetarian => screening.excluded.not_vegetarian += 1,
                        Exclusion::OverBudget => {
                            screening.excluded.over_budget += 1;
                            screening.cheapest_over_budget = Some(
                                screening
                                    .cheapest_over_budget
                                    .map_or(dish.price, |cheapest| cheapest.min(dish.price)),
                            );
                        }
                    }
                }
            }
        }

        screening
    }

    /// Bonuses that fire for `dish`, in rule order
    pub fn bonuses(&self, preferences: &Preferences, dish: &Dish) -> Vec<AppliedBonus> {
        self.rules
            .iter()
            .filter(|rule| rule.applies(preferences, dish))
            .map(|rule| AppliedBonus {
                rule: rule.name,
                bonus: rule.bonus,
                reason: rule.reason,
            })
            .collect()
    }
}
