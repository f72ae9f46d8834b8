use std::{env, fmt, str::FromStr, time::Duration};

use walk::{CoverageTolerance, WalkConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "invalid value {:?} for {}", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub width: usize,
    pub height: usize,
    /// First seed; run `i` uses `seed + i`. Random seeds when unset.
    pub seed: Option<u64>,
    pub runs: u64,
    pub walk: WalkConfig,
    /// Pause between animated steps. Zero turns the animation off.
    pub step_delay: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            seed: None,
            runs: 1,
            walk: WalkConfig {
                split_avoidance: true,
                ..WalkConfig::default()
            },
            step_delay: Duration::ZERO,
        }
    }
}

impl RunnerConfig {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unset and blank keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let width = dimension(&lookup, "GRID_WIDTH")?.unwrap_or(defaults.width);
        let height = dimension(&lookup, "GRID_HEIGHT")?.unwrap_or(defaults.height);
        let seed = parse(&lookup, "SEED")?;
        let runs = parse(&lookup, "RUNS")?.unwrap_or(defaults.runs);

        let walk = WalkConfig {
            split_avoidance: flag(&lookup, "SPLIT_AVOIDANCE")?
                .unwrap_or(defaults.walk.split_avoidance),
            max_steps: parse(&lookup, "MAX_STEPS")?,
            coverage_tolerance: parse::<CoverageTolerance>(&lookup, "COVERAGE_TOLERANCE")?
                .unwrap_or_default(),
            close_last_gap: flag(&lookup, "CLOSE_LAST_GAP")?
                .unwrap_or(defaults.walk.close_last_gap),
        };

        let step_delay = parse(&lookup, "STEP_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.step_delay);

        Ok(Self {
            width,
            height,
            seed,
            runs,
            walk,
            step_delay,
        })
    }
}

fn value(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match value(lookup, key) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

/// A grid side: at least 1 and no more than `i32::MAX`.
fn dimension(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<usize>, ConfigError> {
    match value(lookup, key) {
        None => Ok(None),
        Some(value) => match value.parse::<usize>() {
            Ok(n) if n > 0 && i32::try_from(n).is_ok() => Ok(Some(n)),
            _ => Err(ConfigError::Invalid { key, value }),
        },
    }
}

fn flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<bool>, ConfigError> {
    match value(lookup, key) {
        None => Ok(None),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::Invalid { key, value }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = RunnerConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, RunnerConfig::default());
        assert!(config.walk.split_avoidance);
        assert_eq!(config.walk.max_steps, None);
    }

    #[test]
    fn every_key_is_read() {
        let config = RunnerConfig::from_lookup(lookup(&[
            ("GRID_WIDTH", "5"),
            ("GRID_HEIGHT", " 3 "),
            ("SEED", "42"),
            ("RUNS", "7"),
            ("SPLIT_AVOIDANCE", "false"),
            ("MAX_STEPS", "1000"),
            ("COVERAGE_TOLERANCE", "one_gap"),
            ("CLOSE_LAST_GAP", "yes"),
            ("STEP_DELAY_MS", "25"),
        ]))
        .unwrap();

        assert_eq!(config.width, 5);
        assert_eq!(config.height, 3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.runs, 7);
        assert!(!config.walk.split_avoidance);
        assert_eq!(config.walk.max_steps, Some(1000));
        assert_eq!(config.walk.coverage_tolerance, CoverageTolerance::OneGap);
        assert!(config.walk.close_last_gap);
        assert_eq!(config.step_delay, Duration::from_millis(25));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = RunnerConfig::from_lookup(lookup(&[("SEED", ""), ("GRID_WIDTH", "  ")])).unwrap();

        assert_eq!(config.seed, None);
        assert_eq!(config.width, 8);
    }

    #[test]
    fn bad_values_name_the_key() {
        let cases = [
            ("GRID_WIDTH", "0"),
            ("GRID_HEIGHT", "-2"),
            ("GRID_WIDTH", "2147483648"),
            ("SEED", "abc"),
            ("SPLIT_AVOIDANCE", "maybe"),
            ("COVERAGE_TOLERANCE", "two_gaps"),
        ];

        for (key, value) in cases {
            let error = RunnerConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert_eq!(
                error,
                ConfigError::Invalid {
                    key,
                    value: value.to_string()
                }
            );
            assert!(error.to_string().contains(key));
        }
    }
}
