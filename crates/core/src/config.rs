use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::insights::money::RoundingPolicy;
use crate::insights::ranking::PopularityRank;

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub insights: InsightsConfig,
    pub ranking: RankingConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct InsightsConfig {
    pub currency_code: String,
    pub rounding: RoundingPolicy,
}

#[derive(Clone, Debug, Default)]
pub struct RankingConfig {
    pub mode: RankingMode,
    pub seed: Option<u64>,
    pub fixed_value: Option<u8>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    #[default]
    Random,
    Seeded,
    Fixed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub currency_code: Option<String>,
    pub rounding: Option<RoundingPolicy>,
    pub ranking_mode: Option<RankingMode>,
    pub ranking_seed: Option<u64>,
    pub ranking_fixed_value: Option<u8>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl ConfigOverrides {
    /// Whether this override set supplies the value at `key_path` (e.g. `ranking.seed`).
    pub fn sets(&self, key_path: &str) -> bool {
        match key_path {
            "insights.currency_code" => self.currency_code.is_some(),
            "insights.rounding" => self.rounding.is_some(),
            "ranking.mode" => self.ranking_mode.is_some(),
            "ranking.seed" => self.ranking_seed.is_some(),
            "ranking.fixed_value" => self.ranking_fixed_value.is_some(),
            "logging.level" => self.log_level.is_some(),
            "logging.format" => self.log_format.is_some(),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self { currency_code: "USD".to_string(), rounding: RoundingPolicy::HalfAwayFromZero }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

impl std::str::FromStr for RankingMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "seeded" => Ok(Self::Seeded),
            "fixed" => Ok(Self::Fixed),
            other => Err(ConfigError::Validation(format!(
                "unsupported ranking mode `{other}` (expected random|seeded|fixed)"
            ))),
        }
    }
}

impl std::str::FromStr for RoundingPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "half_away_from_zero" => Ok(Self::HalfAwayFromZero),
            "half_even" => Ok(Self::HalfEven),
            other => Err(ConfigError::Validation(format!(
                "unsupported rounding `{other}` (expected half_away_from_zero|half_even)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("minishop.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(insights) = patch.insights {
            if let Some(currency_code) = insights.currency_code {
                self.insights.currency_code = currency_code;
            }
            if let Some(rounding) = insights.rounding {
                self.insights.rounding = rounding;
            }
        }

        if let Some(ranking) = patch.ranking {
            if let Some(mode) = ranking.mode {
                self.ranking.mode = mode;
            }
            if let Some(seed) = ranking.seed {
                self.ranking.seed = Some(seed);
            }
            if let Some(fixed_value) = ranking.fixed_value {
                self.ranking.fixed_value = Some(fixed_value);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some((_, value)) = env_override("insights.currency_code") {
            self.insights.currency_code = value;
        }
        if let Some((_, value)) = env_override("insights.rounding") {
            self.insights.rounding = value.parse()?;
        }

        if let Some((_, value)) = env_override("ranking.mode") {
            self.ranking.mode = value.parse()?;
        }
        if let Some((key, value)) = env_override("ranking.seed") {
            self.ranking.seed = Some(parse_u64(key, &value)?);
        }
        if let Some((key, value)) = env_override("ranking.fixed_value") {
            self.ranking.fixed_value = Some(parse_u8(key, &value)?);
        }

        if let Some((_, value)) = env_override("logging.level") {
            self.logging.level = value;
        }
        if let Some((_, value)) = env_override("logging.format") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(currency_code) = overrides.currency_code {
            self.insights.currency_code = currency_code;
        }
        if let Some(rounding) = overrides.rounding {
            self.insights.rounding = rounding;
        }
        if let Some(mode) = overrides.ranking_mode {
            self.ranking.mode = mode;
        }
        if let Some(seed) = overrides.ranking_seed {
            self.ranking.seed = Some(seed);
        }
        if let Some(fixed_value) = overrides.ranking_fixed_value {
            self.ranking.fixed_value = Some(fixed_value);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_insights(&self.insights)?;
        validate_ranking(&self.ranking)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("minishop.toml"), PathBuf::from("config/minishop.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_insights(insights: &InsightsConfig) -> Result<(), ConfigError> {
    let code = insights.currency_code.trim();
    if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(ConfigError::Validation(format!(
            "insights.currency_code must be a three-letter ISO 4217 code, got `{code}`"
        )));
    }

    Ok(())
}

fn validate_ranking(ranking: &RankingConfig) -> Result<(), ConfigError> {
    match ranking.mode {
        RankingMode::Random => Ok(()),
        RankingMode::Seeded => {
            if ranking.seed.is_none() {
                return Err(ConfigError::Validation(
                    "ranking.seed is required when ranking.mode is `seeded`".to_string(),
                ));
            }
            Ok(())
        }
        RankingMode::Fixed => match ranking.fixed_value {
            None => Err(ConfigError::Validation(
                "ranking.fixed_value is required when ranking.mode is `fixed`".to_string(),
            )),
            Some(value) => PopularityRank::new(value).map(|_| ()).map_err(|_| {
                ConfigError::Validation("ranking.fixed_value must be in range 1..=100".to_string())
            }),
        },
    }
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

/// Environment variables consulted for a config key, in lookup order.
pub fn env_keys(key_path: &str) -> &'static [&'static str] {
    match key_path {
        "insights.currency_code" => &["MINISHOP_CURRENCY_CODE"],
        "insights.rounding" => &["MINISHOP_ROUNDING"],
        "ranking.mode" => &["MINISHOP_RANKING_MODE"],
        "ranking.seed" => &["MINISHOP_RANKING_SEED"],
        "ranking.fixed_value" => &["MINISHOP_RANKING_FIXED_VALUE"],
        "logging.level" => &["MINISHOP_LOGGING_LEVEL", "MINISHOP_LOG_LEVEL"],
        "logging.format" => &["MINISHOP_LOGGING_FORMAT", "MINISHOP_LOG_FORMAT"],
        _ => &[],
    }
}

/// The environment variable that `AppConfig::load` takes `key_path` from, if any.
pub fn env_source(key_path: &str) -> Option<&'static str> {
    env_override(key_path).map(|(key, _)| key)
}

fn env_override(key_path: &str) -> Option<(&'static str, String)> {
    env_keys(key_path).iter().find_map(|key| read_env(key).map(|value| (*key, value)))
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u8(key: &str, value: &str) -> Result<u8, ConfigError> {
    value.trim().parse::<u8>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    insights: Option<InsightsPatch>,
    ranking: Option<RankingPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InsightsPatch {
    currency_code: Option<String>,
    rounding: Option<RoundingPolicy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RankingPatch {
    mode: Option<RankingMode>,
    seed: Option<u64>,
    fixed_value: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
