use crate::obs::sink::{self, MetricsEvent};
use std::fmt;
use thiserror::Error as ThisError;

///
/// PredicateError
///
/// Recoverable failures surfaced by the predicate runtime.
///
/// Contract violations (for example a NOT compound built with the wrong
/// number of children) are panics and never show up here. Failures raised by
/// caller-supplied test functions propagate untouched and never show up here
/// either.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PredicateError {
    #[error("{0}")]
    Unsupported(UnsupportedFeature),

    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl PredicateError {
    /// Build an unsupported-feature error and record it on the metrics sink.
    pub(crate) fn unsupported(feature: UnsupportedFeature) -> Self {
        sink::record(MetricsEvent::Unsupported { feature });

        Self::Unsupported(feature)
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Unsupported(_) => ErrorClass::Unsupported,
            Self::Config(_) => ErrorClass::InvalidConfig,
        }
    }

    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    /// The unsupported feature, if this error is an unsupported signal.
    #[must_use]
    pub const fn unsupported_feature(&self) -> Option<UnsupportedFeature> {
        match self {
            Self::Unsupported(feature) => Some(*feature),
            Self::Config(_) => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// UnsupportedFeature
///
/// Host-integration surfaces the predicate runtime deliberately does not
/// implement. Each one is reported through an explicit error so a caller can
/// never mistake it for a `false` result.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, ThisError)]
pub enum UnsupportedFeature {
    #[error("substitution variables are not supported during evaluation")]
    SubstitutionVariables,

    #[error("predicate format strings are not supported")]
    FormatString,

    #[error("metadata query strings are not supported")]
    MetadataQuery,

    #[error("predicate archiving is not supported")]
    Archiving,

    #[error("secure decoding is not supported")]
    SecureDecoding,
}

impl UnsupportedFeature {
    /// Stable label used as a metrics key.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SubstitutionVariables => "substitution_variables",
            Self::FormatString => "format_string",
            Self::MetadataQuery => "metadata_query",
            Self::Archiving => "archiving",
            Self::SecureDecoding => "secure_decoding",
        }
    }
}

///
/// ConfigError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("invalid evaluation config: {message}")]
    Parse { message: String },
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Unsupported,
    InvalidConfig,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unsupported => "unsupported",
            Self::InvalidConfig => "invalid_config",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
