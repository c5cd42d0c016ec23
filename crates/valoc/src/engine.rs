//! Validation engine boundary.
//!
//! The adapter core never evaluates rules itself; it hands values to an
//! [`Engine`] and post-processes whatever comes back. [`RuleEngine`] in
//! [`crate::rules`] is the shipped implementation; anything that can
//! produce [`Violation`] records can stand in for it.

use crate::error::InternalError;
use serde_json::Value;

/// One failed rule, as reported by the engine.
///
/// `field` is the display name, `struct_field` the declared field
/// identifier (equal for plain values), and `message` the engine's own
/// default wording — the last-resort text when no translation exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub struct_field: String,
    pub rule: String,
    pub param: String,
    pub message: String,
}

/// Outcome of an engine call that did not pass cleanly.
#[derive(Debug)]
pub enum EngineError {
    /// Rule failures, one record per failed (field, rule) pair, in
    /// engine-defined order.
    Violations(Vec<Violation>),
    /// The engine call itself failed; no violation records exist.
    Internal(InternalError),
}

/// A named field extracted from a struct for validation.
#[derive(Debug, Clone)]
pub struct Field {
    /// Display name, reported back to callers (e.g. the wire/JSON name).
    pub name: String,
    /// Declared field identifier, used by except/partial filtering and the
    /// per-value translation hooks.
    pub struct_name: String,
    pub value: Value,
    pub rules: String,
}

impl Field {
    /// A field whose display name and identifier are the same.
    pub fn new(name: impl Into<String>, value: impl Into<Value>, rules: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            struct_name: name.clone(),
            name,
            value: value.into(),
            rules: rules.into(),
        }
    }

    /// Override the display name, keeping the identifier.
    pub fn display_as(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// How struct-shaped values expose their fields to the engine.
///
/// There is no runtime reflection to lean on, so a validatable struct
/// states its fields, values, and rule expressions explicitly:
///
/// ```
/// use valoc::{Field, Validatable};
///
/// struct Signup {
///     email: String,
///     age: u8,
/// }
///
/// impl Validatable for Signup {
///     fn fields(&self) -> Vec<Field> {
///         vec![
///             Field::new("email", self.email.as_str(), "required,email"),
///             Field::new("age", self.age, "min=18"),
///         ]
///     }
/// }
/// ```
pub trait Validatable {
    fn fields(&self) -> Vec<Field>;
}

/// Everything a rule predicate sees about the value under check.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The field (or variable) value.
    pub value: &'a Value,
    /// The raw rule parameter from the expression (`"3"` in `min=3`),
    /// empty when the rule has none.
    pub param: &'a str,
    /// The comparison value, present only for cross-value validation.
    pub other: Option<&'a Value>,
}

impl RuleContext<'_> {
    /// The value as a string slice, when it is one.
    pub fn str_value(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// The value as a float, accepting numeric strings.
    pub fn numeric_value(&self) -> Option<f64> {
        match self.value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

/// A named validation predicate: true when the value passes.
pub type RuleFn = Box<dyn Fn(&RuleContext) -> bool + Send + Sync>;

/// The validation engine the adapter delegates to.
///
/// Struct-shaped entry points receive the value through [`Validatable`];
/// plain values arrive as [`serde_json::Value`] with a rule expression.
/// `Ok(())` means every rule passed.
pub trait Engine {
    /// Register (or replace) a named rule.
    fn register(&mut self, rule: &str, check: RuleFn);

    /// Validate every field of a struct.
    fn validate_struct(&self, value: &dyn Validatable) -> Result<(), EngineError>;

    /// Validate a struct, skipping the named fields.
    fn validate_struct_except(
        &self,
        value: &dyn Validatable,
        fields: &[&str],
    ) -> Result<(), EngineError>;

    /// Validate only the named fields of a struct.
    fn validate_struct_partial(
        &self,
        value: &dyn Validatable,
        fields: &[&str],
    ) -> Result<(), EngineError>;

    /// Validate a single value against a rule expression.
    fn validate_value(&self, value: &Value, rules: &str) -> Result<(), EngineError>;

    /// Validate a value against a rule expression, with a second value
    /// available for cross-value rules.
    fn validate_value_with(
        &self,
        value: &Value,
        other: &Value,
        rules: &str,
    ) -> Result<(), EngineError>;
}
