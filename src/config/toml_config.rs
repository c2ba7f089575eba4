use crate::core::bracket::PrecutPolicy;
use crate::utils::error::{EngineError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub groups: GroupsConfig,
    pub knockout: KnockoutConfig,
    pub results: ResultsConfig,
    pub rating: RatingConfig,
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupsConfig {
    pub min_size: usize,
    pub max_size: usize,
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            min_size: 4,
            max_size: 7,
        }
    }
}

impl GroupsConfig {
    pub fn bounds(&self) -> RangeInclusive<usize> {
        self.min_size..=self.max_size
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnockoutConfig {
    pub precut_threshold: usize,
    pub precut_fraction: f64,
    pub seeding: SeedingPolicy,
}

impl Default for KnockoutConfig {
    fn default() -> Self {
        Self {
            precut_threshold: 32,
            precut_fraction: 0.2,
            seeding: SeedingPolicy::Rating,
        }
    }
}

impl KnockoutConfig {
    pub fn precut(&self) -> PrecutPolicy {
        PrecutPolicy {
            threshold: self.precut_threshold,
            fraction: self.precut_fraction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingPolicy {
    /// Rank key descending.
    #[default]
    Rating,
    /// Wins, then score differential, then rank key.
    GroupRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Equal scores are refused when recorded.
    #[default]
    Reject,
    /// The entrant with the better rank key takes the match.
    HigherSeed,
    /// The first-listed entrant takes the match.
    Home,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    pub tie_break: TieBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Elo,
    Flat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub strategy: StrategyKind,
    pub k_factor: f64,
    pub flat_points: i32,
    pub elite_threshold: i32,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Elo,
            k_factor: 32.0,
            flat_points: 16,
            elite_threshold: 2400,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub require_champion: bool,
}

impl EngineConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EngineError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EngineError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ELITE_THRESHOLD})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EngineError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number("groups.min_size", self.groups.min_size, 2)?;
        if self.groups.max_size < self.groups.min_size {
            return Err(EngineError::InvalidConfigValueError {
                field: "groups.max_size".to_string(),
                value: self.groups.max_size.to_string(),
                reason: format!("Must not be below groups.min_size ({})", self.groups.min_size),
            });
        }

        validate_positive_number("knockout.precut_threshold", self.knockout.precut_threshold, 2)?;
        validate_range(
            "knockout.precut_fraction",
            self.knockout.precut_fraction,
            0.0,
            0.9,
        )?;

        if !(self.rating.k_factor > 0.0) {
            return Err(EngineError::InvalidConfigValueError {
                field: "rating.k_factor".to_string(),
                value: self.rating.k_factor.to_string(),
                reason: "K-factor must be positive".to_string(),
            });
        }
        validate_range("rating.flat_points", self.rating.flat_points, 0, 1000)?;

        Ok(())
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
