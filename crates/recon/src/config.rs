use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// Weight of the name similarity in the blended category score.
pub const CATEGORY_NAME_WEIGHT: f64 = 0.7;
/// Weight of the path similarity in the blended category score.
pub const CATEGORY_PATH_WEIGHT: f64 = 0.3;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

// ---------------------------------------------------------------------------
// Match config
// ---------------------------------------------------------------------------

/// The single tunable of the engine.
///
/// Built through [`MatchConfig::new`] or deserialized and then checked with
/// [`MatchConfig::validate`]; the threshold cannot be changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum score a candidate needs at every stage.
    #[serde(default = "default_threshold")]
    similarity_threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl MatchConfig {
    pub fn new(similarity_threshold: f64) -> Result<Self, ReconError> {
        let config = Self { similarity_threshold };
        config.validate()?;
        Ok(config)
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let t = self.similarity_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(ReconError::InvalidThreshold(t));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Run file
// ---------------------------------------------------------------------------

/// A `*.match.toml` run file: which two catalogs to align and where to write.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    /// Source catalog JSON, relative to the run file's directory.
    pub source: String,
    /// Target catalog JSON, relative to the run file's directory.
    pub target: String,
    #[serde(flatten)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
    #[serde(default)]
    pub report: Option<String>,
}

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }
        if self.source.trim().is_empty() {
            return Err(ReconError::ConfigValidation("source path must not be empty".into()));
        }
        if self.target.trim().is_empty() {
            return Err(ReconError::ConfigValidation("target path must not be empty".into()));
        }
        self.matching.validate()
    }

    pub fn threshold(&self) -> f64 {
        self.matching.similarity_threshold()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Amazon vs Flipkart"
source = "amazon.json"
target = "flipkart.json"
similarity_threshold = 0.75

[output]
json = "out/matches.json"
report = "out/report.txt"
"#;

    #[test]
    fn parse_valid() {
        let config = ReconConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "Amazon vs Flipkart");
        assert_eq!(config.source, "amazon.json");
        assert_eq!(config.target, "flipkart.json");
        assert_eq!(config.threshold(), 0.75);
        assert_eq!(config.output.json.as_deref(), Some("out/matches.json"));
        assert_eq!(config.output.report.as_deref(), Some("out/report.txt"));
    }

    #[test]
    fn threshold_and_output_default() {
        let input = r#"
name = "Minimal"
source = "a.json"
target = "b.json"
"#;
        let config = ReconConfig::from_toml(input).unwrap();
        assert_eq!(config.threshold(), DEFAULT_SIMILARITY_THRESHOLD);
        assert!(config.output.json.is_none());
        assert!(config.output.report.is_none());
    }

    #[test]
    fn reject_threshold_out_of_range() {
        let input = r#"
name = "Bad"
source = "a.json"
target = "b.json"
similarity_threshold = 1.2
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert_eq!(err, ReconError::InvalidThreshold(1.2));
    }

    #[test]
    fn reject_empty_source() {
        let input = r#"
name = "Bad"
source = ""
target = "b.json"
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("source path"));
    }

    #[test]
    fn reject_missing_target() {
        let input = r#"
name = "Bad"
source = "a.json"
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn match_config_bounds() {
        assert!(MatchConfig::new(0.0).is_ok());
        assert!(MatchConfig::new(1.0).is_ok());
        assert!(MatchConfig::new(-0.01).is_err());
        assert!(MatchConfig::new(f64::NAN).is_err());
        assert_eq!(MatchConfig::default().similarity_threshold(), 0.6);
    }

    #[test]
    fn deserialized_config_needs_validate() {
        let config: MatchConfig = serde_json::from_str(r#"{"similarity_threshold": 2.0}"#).unwrap();
        assert_eq!(config.similarity_threshold(), 2.0);
        assert_eq!(config.validate(), Err(ReconError::InvalidThreshold(2.0)));

        let config: MatchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MatchConfig::default());
    }
}
