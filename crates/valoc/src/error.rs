//! Validation report: the queryable field → rule → message aggregate.

use serde::ser::SerializeMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Failure of the validation call itself, as opposed to a rule violation.
///
/// A report carrying one of these means the engine never produced a usable
/// set of violation records; callers must check for it before treating the
/// absence of validation errors as "valid".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
    /// A rule expression referenced a rule that was never registered.
    #[error("unknown validation rule '{0}'")]
    UnknownRule(String),

    /// A rule expression could not be parsed.
    #[error("malformed rule expression '{0}'")]
    MalformedExpression(String),

    /// The value could not be converted into a form the engine validates.
    #[error("value is not validatable: {0}")]
    InvalidValue(String),

    /// Any other engine failure.
    #[error("{0}")]
    Engine(String),
}

/// Aggregated outcome of one validation call.
///
/// Maps each failed field to its failed rules and their localized messages,
/// and optionally carries an [`InternalError`]. A given (field, rule) pair
/// holds exactly one message; a later [`add_error`](Self::add_error) for the
/// same pair overwrites the earlier one.
///
/// Serializes as a JSON object keyed by field name:
///
/// ```json
/// {
///   "email": {"required": "email is required"},
///   "age": {"min": "age must be at least 18"}
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    internal: Option<InternalError>,
    failures: BTreeMap<String, BTreeMap<String, String>>,
}

impl ValidationReport {
    /// Create an empty report (no failures, no internal error).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a report carrying only an internal error.
    pub fn from_internal(error: InternalError) -> Self {
        Self {
            internal: Some(error),
            failures: BTreeMap::new(),
        }
    }

    /// Record a message for a (field, rule) pair, replacing any previous one.
    pub fn add_error(
        &mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.failures
            .entry(field.into())
            .or_default()
            .insert(rule.into(), message.into());
    }

    /// True if the report carries validation errors or an internal error.
    pub fn has_error(&self) -> bool {
        self.internal.is_some() || !self.failures.is_empty()
    }

    /// True if the validation call itself failed.
    pub fn has_internal_error(&self) -> bool {
        self.internal.is_some()
    }

    /// True if any field failed any rule.
    pub fn has_validation_errors(&self) -> bool {
        !self.failures.is_empty()
    }

    /// True if the given field failed at least one rule.
    pub fn is_failed(&self, field: &str) -> bool {
        self.failures.contains_key(field)
    }

    /// True if the given field failed the given rule.
    pub fn is_failed_on(&self, field: &str, rule: &str) -> bool {
        self.failures
            .get(field)
            .is_some_and(|rules| rules.contains_key(rule))
    }

    /// The internal error, if the validation call itself failed.
    pub fn internal_error(&self) -> Option<&InternalError> {
        self.internal.as_ref()
    }

    /// The full field → rule → message structure.
    pub fn errors(&self) -> &BTreeMap<String, BTreeMap<String, String>> {
        &self.failures
    }

    /// Per-field message lists.
    pub fn messages(&self) -> BTreeMap<String, Vec<String>> {
        self.failures
            .iter()
            .map(|(field, rules)| (field.clone(), rules.values().cloned().collect()))
            .collect()
    }

    /// Per-field failed-rule lists.
    pub fn rules(&self) -> BTreeMap<String, Vec<String>> {
        self.failures
            .iter()
            .map(|(field, rules)| (field.clone(), rules.keys().cloned().collect()))
            .collect()
    }
}

impl Serialize for ValidationReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Only the field failures are part of the wire format; the internal
        // error is a local concern.
        let mut map = serializer.serialize_map(Some(self.failures.len()))?;
        for (field, rules) in &self.failures {
            map.serialize_entry(field, rules)?;
        }
        map.end()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, rules) in &self.failures {
            writeln!(f, "{field}:")?;
            for (rule, message) in rules {
                writeln!(f, "    {rule}: {message}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_has_no_errors() {
        let report = ValidationReport::new();
        assert!(!report.has_error());
        assert!(!report.has_internal_error());
        assert!(!report.has_validation_errors());
    }

    #[test]
    fn internal_error_only() {
        let report = ValidationReport::from_internal(InternalError::Engine("boom".into()));
        assert!(report.has_error());
        assert!(report.has_internal_error());
        assert!(!report.has_validation_errors());
        assert_eq!(
            report.internal_error(),
            Some(&InternalError::Engine("boom".into()))
        );
    }

    #[test]
    fn field_and_rule_queries() {
        let mut report = ValidationReport::new();
        report.add_error("email", "required", "email is required");

        assert!(report.has_error());
        assert!(report.has_validation_errors());
        assert!(report.is_failed("email"));
        assert!(report.is_failed_on("email", "required"));
        assert!(!report.is_failed("name"));
        assert!(!report.is_failed_on("email", "min"));
    }

    #[test]
    fn same_pair_overwrites() {
        let mut report = ValidationReport::new();
        report.add_error("email", "required", "first");
        report.add_error("email", "required", "second");

        assert_eq!(report.errors()["email"]["required"], "second");
        assert_eq!(report.errors()["email"].len(), 1);
    }

    #[test]
    fn derived_views() {
        let mut report = ValidationReport::new();
        report.add_error("email", "required", "email is required");
        report.add_error("email", "email", "bad format");
        report.add_error("age", "min", "too small");

        let rules = report.rules();
        assert_eq!(rules["email"], vec!["email", "required"]);
        assert_eq!(rules["age"], vec!["min"]);

        let messages = report.messages();
        assert_eq!(messages["age"], vec!["too small"]);
        assert_eq!(messages["email"].len(), 2);
    }

    #[test]
    fn json_shape() {
        let mut report = ValidationReport::new();
        report.add_error("email", "required", "email is required");
        report.add_error("age", "min", "too small");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["email"]["required"], "email is required");
        assert_eq!(json["age"]["min"], "too small");
    }

    #[test]
    fn internal_error_not_serialized() {
        let report = ValidationReport::from_internal(InternalError::Engine("boom".into()));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn display_groups_by_field() {
        let mut report = ValidationReport::new();
        report.add_error("email", "required", "email is required");

        let text = report.to_string();
        assert!(text.contains("email:\n"));
        assert!(text.contains("    required: email is required"));
    }
}
