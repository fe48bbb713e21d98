//! Option records accepted when a filter chain is assembled.
//!
//! Filters are configured from flat string arguments (as found in analyzer
//! definitions) or from JSON. Validation happens here, once, so a chain with a
//! bad option never gets built.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use cjk_analysis::config::{Direction, TransformConfig};
//!
//! let mut args = HashMap::new();
//! args.insert("id".to_string(), "Katakana-Hiragana".to_string());
//! args.insert("direction".to_string(), "reverse".to_string());
//!
//! let config = TransformConfig::from_args(args).unwrap();
//! assert_eq!(config.id, "Katakana-Hiragana");
//! assert_eq!(config.direction, Direction::Reverse);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CjkAnalysisError, Result};

/// Which way a transliteration rule set is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

impl FromStr for Direction {
    type Err = CjkAnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "forward" => Ok(Direction::Forward),
            "reverse" => Ok(Direction::Reverse),
            other => Err(CjkAnalysisError::configuration(format!(
                "invalid direction '{other}', expected 'forward' or 'reverse'"
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a transliteration char filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// A built-in transform id, or the id of a rule resource.
    pub id: String,

    /// Direction the rules are applied in (default: forward).
    #[serde(default)]
    pub direction: Direction,
}

impl TransformConfig {
    /// Create a forward transform configuration.
    pub fn new<S: Into<String>>(id: S) -> Self {
        TransformConfig {
            id: id.into(),
            direction: Direction::Forward,
        }
    }

    /// Set the direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Build from flat filter arguments.
    ///
    /// Recognized keys are `id` (required) and `direction` (optional). Any other
    /// key is rejected.
    pub fn from_args(mut args: HashMap<String, String>) -> Result<Self> {
        let id = args
            .remove("id")
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CjkAnalysisError::configuration("missing required parameter 'id'"))?;

        let direction = match args.remove("direction") {
            Some(direction) => direction.parse()?,
            None => Direction::Forward,
        };

        reject_unknown(args)?;

        Ok(TransformConfig { id, direction })
    }

    /// Parse a JSON configuration record.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TransformConfig = serde_json::from_str(json)?;
        if config.id.trim().is_empty() {
            return Err(CjkAnalysisError::configuration("transform id must not be empty"));
        }
        Ok(config)
    }
}

/// Options for the CJK folding token filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldingConfig {
    /// Resource id of a variant table. `None` selects the built-in table.
    #[serde(default)]
    pub resource: Option<String>,
}

impl FoldingConfig {
    /// Build from flat filter arguments. The only recognized key is `resource`.
    pub fn from_args(mut args: HashMap<String, String>) -> Result<Self> {
        let resource = args
            .remove("resource")
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        reject_unknown(args)?;

        Ok(FoldingConfig { resource })
    }
}

fn reject_unknown(args: HashMap<String, String>) -> Result<()> {
    if args.is_empty() {
        return Ok(());
    }
    let mut keys: Vec<_> = args.into_keys().collect();
    keys.sort();
    Err(CjkAnalysisError::configuration(format!(
        "unknown parameters: {}",
        keys.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_transform_config_defaults_to_forward() {
        let config = TransformConfig::from_args(args(&[("id", " cjk.txt ")])).unwrap();
        assert_eq!(config.id, "cjk.txt");
        assert_eq!(config.direction, Direction::Forward);
    }

    #[test]
    fn test_transform_config_requires_id() {
        let err = TransformConfig::from_args(args(&[("direction", "forward")])).unwrap_err();
        assert!(err.is_configuration());

        let err = TransformConfig::from_args(args(&[("id", "  ")])).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_transform_config_rejects_bad_direction() {
        let err =
            TransformConfig::from_args(args(&[("id", "Null"), ("direction", "sideways")]))
                .unwrap_err();
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn test_transform_config_rejects_unknown_parameters() {
        let err = TransformConfig::from_args(args(&[("id", "Null"), ("rules", "x"), ("b", "y")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown parameters: b, rules"
        );
    }

    #[test]
    fn test_transform_config_from_json() {
        let config =
            TransformConfig::from_json(r#"{"id": "Katakana-Hiragana", "direction": "reverse"}"#)
                .unwrap();
        assert_eq!(config.direction, Direction::Reverse);

        let config = TransformConfig::from_json(r#"{"id": "Null"}"#).unwrap();
        assert_eq!(config.direction, Direction::Forward);

        assert!(TransformConfig::from_json(r#"{"id": "Null", "direction": "up"}"#).is_err());
    }

    #[test]
    fn test_folding_config() {
        assert_eq!(FoldingConfig::from_args(args(&[])).unwrap().resource, None);
        assert_eq!(
            FoldingConfig::from_args(args(&[("resource", "variants.tsv")]))
                .unwrap()
                .resource
                .as_deref(),
            Some("variants.tsv")
        );
        assert!(FoldingConfig::from_args(args(&[("id", "x")])).is_err());
    }
}
