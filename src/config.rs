use serde::Deserialize;

use crate::services::recommendation::{
    ConfigError, EngineConfig, FuzzyConfig, RankingConfig, RuleConfig,
};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite database URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,

    /// Insert the bundled dishes into an empty database at startup
    #[serde(default = "default_true")]
    pub seed_catalog: bool,

    /// Path to the fuzzy membership configuration
    #[serde(default = "default_fuzzy_config_path")]
    pub fuzzy_config_path: String,

    /// Maximum number of dishes returned per request
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Dishes must score strictly above this to be recommended
    #[serde(default)]
    pub min_score: f64,

    #[serde(default = "default_over_budget_tolerance")]
    pub over_budget_tolerance: f64,

    #[serde(default = "default_cuisine_bonus")]
    pub cuisine_bonus: f64,

    #[serde(default = "default_halal_bonus")]
    pub halal_bonus: f64,

    #[serde(default = "default_vegetarian_bonus")]
    pub vegetarian_bonus: f64,

    #[serde(default = "default_meal_type_bonus")]
    pub meal_type_bonus: f64,

    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_database_url() -> String {
    "sqlite://makan.db".to_string()
}

fn default_database_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_fuzzy_config_path() -> String {
    "config/fuzzy.json".to_string()
}

fn default_max_recommendations() -> usize {
    RankingConfig::default().top_n
}

fn default_over_budget_tolerance() -> f64 {
    RuleConfig::default().over_budget_tolerance
}

fn default_cuisine_bonus() -> f64 {
    RuleConfig::default().cuisine_bonus
}

fn default_halal_bonus() -> f64 {
    RuleConfig::default().halal_bonus
}

fn default_vegetarian_bonus() -> f64 {
    RuleConfig::default().vegetarian_bonus
}

fn default_meal_type_bonus() -> f64 {
    RuleConfig::default().meal_type_bonus
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn rule_config(&self) -> RuleConfig {
        RuleConfig {
            cuisine_bonus: self.cuisine_bonus,
            halal_bonus: self.halal_bonus,
            vegetarian_bonus: self.vegetarian_bonus,
            meal_type_bonus: self.meal_type_bonus,
            over_budget_tolerance: self.over_budget_tolerance,
        }
    }

    pub fn ranking_config(&self) -> RankingConfig {
        RankingConfig {
            top_n: self.max_recommendations,
            min_score: self.min_score,
        }
    }

    /// Reads the fuzzy configuration file and validates the complete engine setup
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let fuzzy = FuzzyConfig::from_path(&self.fuzzy_config_path)?;
        EngineConfig::new(fuzzy, self.rule_config(), self.ranking_config())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        envy::from_iter::<_, Config>(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]);

        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.database_url, "sqlite://makan.db");
        assert!(config.seed_catalog);
        assert!(config.enable_cors);
        assert_eq!(config.rule_config(), RuleConfig::default());
        assert_eq!(config.ranking_config(), RankingConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("PORT", "9090"),
            ("MAX_RECOMMENDATIONS", "5"),
            ("MEAL_TYPE_BONUS", "3.5"),
            ("OVER_BUDGET_TOLERANCE", "1.1"),
            ("SEED_CATALOG", "false"),
        ]);

        assert_eq!(config.port, 9090);
        assert_eq!(config.ranking_config().top_n, 5);
        assert_eq!(config.rule_config().meal_type_bonus, 3.5);
        assert_eq!(config.rule_config().over_budget_tolerance, 1.1);
        assert!(!config.seed_catalog);
    }

    #[test]
    fn test_engine_config_from_bundled_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/fuzzy.json");
        let config = from_pairs(&[("FUZZY_CONFIG_PATH", path)]);

        let engine = config.engine_config().unwrap();
        assert_eq!(engine.ranking().top_n, 3);
    }

    #[test]
    fn test_engine_config_rejects_low_tolerance() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/fuzzy.json");
        let config = from_pairs(&[("FUZZY_CONFIG_PATH", path), ("OVER_BUDGET_TOLERANCE", "0.8")]);

        assert!(matches!(
            config.engine_config(),
            Err(ConfigError::Setting { name: "over_budget_tolerance", .. })
        ));
    }
}
