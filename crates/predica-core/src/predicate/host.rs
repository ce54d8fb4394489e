use crate::{
    error::{PredicateError, UnsupportedFeature},
    predicate::Predicate,
    value::{Bindings, Value},
};

///
/// Host-integration surface
///
/// Format-string parsing, metadata queries, variable substitution and
/// archiving belong to a host layer this crate does not implement. These
/// entry points exist so callers get an explicit `Unsupported` error instead
/// of a silently wrong predicate or boolean.
///

impl<T: ?Sized> Predicate<T> {
    /// Parse a predicate format string such as `"age > 21 AND name == $NAME"`.
    pub fn from_format(_format: &str, _arguments: &[Value]) -> Result<Self, PredicateError> {
        unsupported(UnsupportedFeature::FormatString)
    }

    /// Parse a metadata query string.
    pub fn from_metadata_query(_query: &str) -> Result<Self, PredicateError> {
        unsupported(UnsupportedFeature::MetadataQuery)
    }

    /// Render this predicate back to its format string.
    pub fn predicate_format(&self) -> Result<String, PredicateError> {
        unsupported(UnsupportedFeature::FormatString)
    }

    /// Produce a copy with `variables` substituted for variable expressions.
    pub fn with_substitution_variables(
        &self,
        _variables: &Bindings,
    ) -> Result<Self, PredicateError> {
        unsupported(UnsupportedFeature::SubstitutionVariables)
    }

    /// Archive this predicate tree.
    pub fn encode(&self) -> Result<Vec<u8>, PredicateError> {
        unsupported(UnsupportedFeature::Archiving)
    }

    /// Rebuild a predicate tree from an archive.
    pub fn decode(_bytes: &[u8]) -> Result<Self, PredicateError> {
        unsupported(UnsupportedFeature::Archiving)
    }

    /// Allow evaluation of a predicate that was decoded in secure mode.
    pub fn allow_evaluation(&self) -> Result<(), PredicateError> {
        unsupported(UnsupportedFeature::SecureDecoding)
    }
}

fn unsupported<R>(feature: UnsupportedFeature) -> Result<R, PredicateError> {
    Err(PredicateError::unsupported(feature))
}
