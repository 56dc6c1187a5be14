use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use meal_planning::ScoringWeights;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Scoring coefficients for the overlap scorer. Fixed per run, never
    /// derived at runtime.
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunConfig {
    /// Soft wall-clock deadline for one optimization run. On expiry the
    /// run returns the best-effort plan assembled so far.
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            deadline_ms: default_deadline_ms(),
        }
    }
}

fn default_deadline_ms() -> u64 {
    10_000
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (MEALSYNC__SCORING__ALPHA, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional; defaults cover everything
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MEALSYNC")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let w = &self.scoring;
        for (name, value) in [
            ("scoring.alpha", w.alpha),
            ("scoring.beta", w.beta),
            ("scoring.gamma", w.gamma),
            ("scoring.preference_weight", w.preference_weight),
            ("scoring.dislike_weight", w.dislike_weight),
            ("scoring.over_budget_penalty", w.over_budget_penalty),
        ] {
            if value < 0.0 {
                return Err(format!("{name} must not be negative"));
            }
        }
        if w.alpha + w.beta + w.gamma <= 0.0 {
            return Err("at least one of scoring.alpha/beta/gamma must be positive".to_string());
        }
        if w.overlap_weight_floor <= 0.0 {
            return Err("scoring.overlap_weight_floor must be positive".to_string());
        }
        if w.min_cost <= 0.0 {
            return Err("scoring.min_cost must be positive".to_string());
        }
        if self.run.deadline_ms == 0 {
            return Err("run.deadline_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringWeights::default(),
            run: RunConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}
