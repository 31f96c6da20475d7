use super::{fuzzy::FuzzyScore, rules::AppliedBonus, settings::RankingConfig};
use crate::models::{Dish, Recommendation};

/// A dish that passed the hard filters, with its base score and fired bonuses
#[derive(Debug, Clone)]
pub struct ScoredDish<'a> {
    pub dish: &'a Dish,
    pub fuzzy: FuzzyScore,
    pub bonuses: Vec<AppliedBonus>,
}

impl ScoredDish<'_> {
    pub fn total(&self) -> f64 {
        self.fuzzy.base + self.bonuses.iter().map(|b| b.bonus).sum::<f64>()
    }
}

/// Applies the inclusion threshold, orders by score and keeps the top entries
#[derive(Debug, Clone)]
pub struct Ranker {
    config: RankingConfig,
    max_score: f64,
}

impl Ranker {
    pub fn new(config: RankingConfig, max_score: f64) -> Self {
        Self { config, max_score }
    }

    fn reasons(&self, scored: &ScoredDish<'_>) -> Vec<String> {
        std::iter::once(format!(
            "Base compatibility score {:.1}/{}",
            scored.fuzzy.base, self.max_score
        ))
        .chain(scored.bonuses.iter().map(|b| b.reason.to_string()))
        .collect()
    }

    /// Ranks scored dishes. An empty result means nothing beat the threshold.
    pub fn rank<'a>(&self, scored: Vec<ScoredDish<'a>>) -> Vec<Recommendation<'a>> {
        let mut ranked: Vec<_> = scored
            .into_iter()
            .filter_map(|candidate| {
                let score = candidate.total();
                if score <= self.config.min_score {
                    tracing::debug!(
                        dish_id = candidate.dish.id,
                        score,
                        "Dish below inclusion threshold"
                    );
                    return None;
                }

                Some(Recommendation {
                    dish: candidate.dish,
                    score,
                    base_score: candidate.fuzzy.base,
                    reasons: self.reasons(&candidate),
                })
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.dish.id.cmp(&b.dish.id)));
        ranked.truncate(self.config.top_n);

        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Cuisine, MealType};

    fn dish(id: i64) -> Dish {
        Dish {
            id,
            name: format!("Dish {id}"),
            description: String::new(),
            price: 8.0,
            cuisine: Cuisine::Chinese,
            spiciness: 2,
            is_halal: false,
            is_vegetarian: false,
            meal_type: MealType::Any,
            meal_times: vec![],
            course: Course::MainCourse,
            attributes: vec![],
        }
    }

    fn scored<'a>(dish: &'a Dish, base: f64, bonuses: &[f64]) -> ScoredDish<'a> {
        ScoredDish {
            dish,
            fuzzy: FuzzyScore {
                budget: base,
                spiciness: base,
                base,
            },
            bonuses: bonuses
                .iter()
                .map(|&bonus| AppliedBonus {
                    rule: "test",
                    bonus,
                    reason: "Test bonus",
                })
                .collect(),
        }
    }

    fn ranker(top_n: usize, min_score: f64) -> Ranker {
        Ranker::new(RankingConfig { top_n, min_score }, 10.0)
    }

    #[test]
    fn test_sorted_descending_with_id_tie_break() {
        let dishes: Vec<_> = (1..=4).map(dish).collect();
        let ranked = ranker(10, 0.0).rank(vec![
            scored(&dishes[3], 6.0, &[]),
            scored(&dishes[1], 4.0, &[2.0]),
            scored(&dishes[0], 6.0, &[]),
            scored(&dishes[2], 7.5, &[]),
        ]);

        let ids: Vec<_> = ranked.iter().map(|r| r.dish.id).collect();
        assert_eq!(ids, [3, 1, 2, 4]);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let dishes: Vec<_> = (1..=5).map(dish).collect();
        let candidates = dishes.iter().map(|d| scored(d, d.id as f64, &[])).collect();

        let ranked = ranker(3, 0.0).rank(candidates);

        let ids: Vec<_> = ranked.iter().map(|r| r.dish.id).collect();
        assert_eq!(ids, [5, 4, 3]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let dishes: Vec<_> = (1..=3).map(dish).collect();
        let ranked = ranker(3, 2.0).rank(vec![
            scored(&dishes[0], 2.0, &[]),
            scored(&dishes[1], 1.0, &[1.5]),
            scored(&dishes[2], 0.0, &[]),
        ]);

        let ids: Vec<_> = ranked.iter().map(|r| r.dish.id).collect();
        assert_eq!(ids, [2]);
    }

    #[test]
    fn test_zero_score_dropped_at_default_threshold() {
        let dish = dish(1);
        assert!(ranker(3, 0.0).rank(vec![scored(&dish, 0.0, &[])]).is_empty());
    }

    #[test]
    fn test_reasons_start_with_base_score() {
        let dish = dish(1);
        let ranked = ranker(3, 0.0).rank(vec![scored(&dish, 7.5, &[2.0])]);

        assert_eq!(
            ranked[0].reasons,
            ["Base compatibility score 7.5/10", "Test bonus"]
        );
        assert_eq!(ranked[0].score, 9.5);
        assert_eq!(ranked[0].base_score, 7.5);
    }
}
