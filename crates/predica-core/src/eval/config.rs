use crate::error::{ConfigError, PredicateError};
use serde::{Deserialize, Serialize};

///
/// CombineMode
///
/// How AND/OR nodes visit their children.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineMode {
    /// Fold over every child even after the result is settled, so each
    /// child's test function runs exactly once per evaluation.
    #[default]
    Exhaustive,

    /// Stop at the first child that settles the result.
    ShortCircuit,
}

///
/// EvalConfig
///
/// Evaluation policy handed to an [`Evaluator`](crate::eval::Evaluator).
/// Both modes produce the same result for side-effect-free test functions;
/// they only differ in which test functions get called.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    pub combine: CombineMode,
}

impl EvalConfig {
    #[must_use]
    pub const fn exhaustive() -> Self {
        Self {
            combine: CombineMode::Exhaustive,
        }
    }

    #[must_use]
    pub const fn short_circuit() -> Self {
        Self {
            combine: CombineMode::ShortCircuit,
        }
    }

    /// Parse a config from a TOML document such as `combine = "short_circuit"`.
    /// Missing keys fall back to defaults; unknown keys are rejected.
    pub fn from_toml_str(source: &str) -> Result<Self, PredicateError> {
        let config = toml::from_str(source).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })?;

        Ok(config)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    #[test]
    fn default_config_is_exhaustive() {
        assert_eq!(EvalConfig::default(), EvalConfig::exhaustive());
        assert_eq!(EvalConfig::default().combine, CombineMode::Exhaustive);
    }

    #[test]
    fn empty_toml_yields_default_config() {
        let config = EvalConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config, EvalConfig::default());
    }

    #[test]
    fn toml_selects_short_circuit_mode() {
        let config = EvalConfig::from_toml_str("combine = \"short_circuit\"\n")
            .expect("short_circuit config should parse");

        assert_eq!(config, EvalConfig::short_circuit());
    }

    #[test]
    fn toml_rejects_unknown_mode() {
        let err = EvalConfig::from_toml_str("combine = \"lazy\"\n")
            .expect_err("unknown mode should be rejected");

        assert!(matches!(
            err,
            PredicateError::Config(ConfigError::Parse { .. })
        ));
        assert_eq!(err.class(), ErrorClass::InvalidConfig);
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let err = EvalConfig::from_toml_str("max_depth = 3\n")
            .expect_err("unknown key should be rejected");

        assert!(!err.is_unsupported());
        assert!(err.to_string().starts_with("invalid evaluation config:"));
        assert!(
            err.display_with_class()
                .starts_with("invalid_config: invalid evaluation config:")
        );
    }
}
