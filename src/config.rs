//! Run configuration.
//!
//! Every field has a default matching the reference tournament, so a config
//! file only needs the values it changes:
//! ```json
//! {
//!   "input_dir": "reports/2026",
//!   "saturday": { "name": "Saturday", "prefix": "s", "divisions": ["red", "tan"] },
//!   "require_both_days": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{RankerError, Result};
use crate::standings::division::DEFAULT_LOCATOR;
use crate::standings::types::{
    DEFAULT_AVERAGE_PRECISION, DuplicatePolicy, MAX_AVERAGE_PRECISION, MergeOptions,
};

/// One competition day: its file prefix and divisions in union order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayConfig {
    pub name: String,
    pub prefix: String,
    pub divisions: Vec<String>,
}

impl DayConfig {
    pub fn new(name: &str, prefix: &str, divisions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
            divisions: divisions.iter().map(|d| d.to_string()).collect(),
        }
    }

    pub fn friday() -> Self {
        Self::new("Friday", "f", &["blue", "green", "lavender", "pink", "yellow"])
    }

    pub fn saturday() -> Self {
        Self::new(
            "Saturday",
            "s",
            &["blue", "green", "lavender", "orange", "pink", "silver", "tan", "yellow"],
        )
    }

    /// Report name for one of this day's divisions, e.g. `f-blue`.
    pub fn report_name(&self, division: &str) -> String {
        format!("{}-{}", self.prefix, division)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    pub input_dir: PathBuf,
    pub extension: String,
    pub output: PathBuf,
    /// Text that identifies the results tables inside a report.
    pub locator: String,
    pub friday: DayConfig,
    pub saturday: DayConfig,
    pub average_precision: u32,
    pub require_both_days: bool,
    pub duplicates: DuplicatePolicy,
    /// Append placement and round columns to the report.
    pub detailed: bool,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("files"),
            extension: "html".to_string(),
            output: PathBuf::from("files/final_results.csv"),
            locator: DEFAULT_LOCATOR.to_string(),
            friday: DayConfig::friday(),
            saturday: DayConfig::saturday(),
            average_precision: DEFAULT_AVERAGE_PRECISION,
            require_both_days: false,
            duplicates: DuplicatePolicy::LastWriteWins,
            detailed: false,
        }
    }
}

impl RankerConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let config_error = |reason: String| RankerError::Config {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| config_error(e.to_string()))?;
        config.validate().map_err(config_error)?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        for day in [&self.friday, &self.saturday] {
            if day.divisions.is_empty() {
                return Err(format!("{} has no divisions", day.name));
            }
            let mut seen = HashSet::new();
            if let Some(repeated) = day.divisions.iter().find(|d| !seen.insert(d.as_str())) {
                return Err(format!("{} lists division `{repeated}` twice", day.name));
            }
        }
        if self.friday.prefix == self.saturday.prefix {
            return Err(format!(
                "Friday and Saturday share the file prefix `{}`",
                self.friday.prefix
            ));
        }
        if self.average_precision > MAX_AVERAGE_PRECISION {
            return Err(format!(
                "average_precision {} exceeds the maximum of {MAX_AVERAGE_PRECISION}",
                self.average_precision
            ));
        }
        if self.locator.is_empty() {
            return Err("locator must not be empty".to_string());
        }
        Ok(())
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            average_precision: self.average_precision,
            require_both_days: self.require_both_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_default_matches_reference_deployment() {
        let config = RankerConfig::default();
        assert_eq!(config.friday.divisions.len(), 5);
        assert_eq!(config.saturday.divisions.len(), 8);
        assert_eq!(config.friday.report_name("blue"), "f-blue");
        assert_eq!(config.saturday.report_name("tan"), "s-tan");
        assert_eq!(config.locator, "- Total -");
        assert_eq!(config.average_precision, 3);
        assert!(!config.require_both_days);
        assert_eq!(config.duplicates, DuplicatePolicy::LastWriteWins);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let path = temp_path("quiz_season_ranker_test_partial.json");
        fs::write(
            &path,
            r#"{ "input_dir": "reports", "average_precision": 1, "duplicates": "reject" }"#,
        )
        .unwrap();

        let config = RankerConfig::load(&path).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("reports"));
        assert_eq!(config.average_precision, 1);
        assert_eq!(config.duplicates, DuplicatePolicy::Reject);
        assert_eq!(config.friday, DayConfig::friday());
        assert_eq!(config.merge_options().average_precision, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = RankerConfig::load(&temp_path("quiz_season_ranker_no_such.json")).unwrap_err();
        assert!(matches!(err, RankerError::Config { .. }));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let path = temp_path("quiz_season_ranker_test_invalid.json");
        fs::write(&path, "{ not json").unwrap();

        let err = RankerConfig::load(&path).unwrap_err();
        assert!(matches!(err, RankerError::Config { .. }));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_validate_rejects_shared_prefix() {
        let config = RankerConfig {
            saturday: DayConfig::new("Saturday", "f", &["tan"]),
            ..RankerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_repeated_division() {
        let config = RankerConfig {
            saturday: DayConfig::new("Saturday", "s", &["tan", "orange", "tan"]),
            ..RankerConfig::default()
        };
        let reason = config.validate().unwrap_err();
        assert!(reason.contains("Saturday"));
        assert!(reason.contains("`tan`"));
    }

    #[test]
    fn test_validate_bounds_precision() {
        let at_limit = RankerConfig {
            average_precision: MAX_AVERAGE_PRECISION,
            ..RankerConfig::default()
        };
        assert!(at_limit.validate().is_ok());

        let too_high = RankerConfig {
            average_precision: 400,
            ..RankerConfig::default()
        };
        assert!(too_high.validate().unwrap_err().contains("average_precision"));
    }

    #[test]
    fn test_load_rejects_oversized_precision() {
        let path = temp_path("quiz_season_ranker_test_precision.json");
        fs::write(&path, r#"{ "average_precision": 400 }"#).unwrap();

        let err = RankerConfig::load(&path).unwrap_err();
        assert!(matches!(err, RankerError::Config { .. }));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_validate_rejects_empty_day() {
        let config = RankerConfig {
            friday: DayConfig::new("Friday", "f", &[]),
            ..RankerConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("Friday"));
    }
}
