//! Reference rule engine.
//!
//! A registry of named predicates evaluated against comma-separated rule
//! expressions (`"required,min=3"`). Ships the common builtins; callers add
//! their own through [`Engine::register`]. Unknown rule names and malformed
//! expressions abort the call with an internal error rather than a panic.

use crate::engine::{Engine, EngineError, Field, RuleContext, RuleFn, Validatable, Violation};
use crate::error::InternalError;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

fn url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap())
}

/// Named-predicate validation engine.
pub struct RuleEngine {
    rules: HashMap<String, RuleFn>,
}

impl RuleEngine {
    /// An engine preloaded with the builtin rules: `required`, `min`,
    /// `max`, `len`, `email`, `url`, `numeric`, `eq`, `ne`, `eqfield`,
    /// `nefield`.
    pub fn new() -> Self {
        let mut engine = Self {
            rules: HashMap::new(),
        };
        engine.register("required", Box::new(check_required));
        engine.register("min", Box::new(check_min));
        engine.register("max", Box::new(check_max));
        engine.register("len", Box::new(check_len));
        engine.register("email", Box::new(check_email));
        engine.register("url", Box::new(check_url));
        engine.register("numeric", Box::new(check_numeric));
        engine.register("eq", Box::new(check_eq));
        engine.register("ne", Box::new(|ctx| !check_eq(ctx)));
        engine.register("eqfield", Box::new(check_eqfield));
        engine.register("nefield", Box::new(check_nefield));
        engine
    }

    fn check_expression(
        &self,
        field_name: &str,
        struct_name: &str,
        value: &Value,
        other: Option<&Value>,
        expression: &str,
        violations: &mut Vec<Violation>,
    ) -> Result<(), InternalError> {
        for part in expression.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (rule, param) = match part.split_once('=') {
                Some((name, param)) => (name.trim(), param.trim()),
                None => (part, ""),
            };
            if rule.is_empty() {
                return Err(InternalError::MalformedExpression(expression.to_string()));
            }

            let check = self
                .rules
                .get(rule)
                .ok_or_else(|| InternalError::UnknownRule(rule.to_string()))?;

            let ctx = RuleContext {
                value,
                param,
                other,
            };
            if !check(&ctx) {
                violations.push(Violation {
                    field: field_name.to_string(),
                    struct_field: struct_name.to_string(),
                    rule: rule.to_string(),
                    param: param.to_string(),
                    message: default_message(field_name, rule),
                });
            }
        }
        Ok(())
    }

    fn check_fields<F>(&self, value: &dyn Validatable, keep: F) -> Result<(), EngineError>
    where
        F: Fn(&Field) -> bool,
    {
        let mut violations = Vec::new();
        for field in value.fields() {
            if !keep(&field) {
                continue;
            }
            if let Err(fault) = self.check_expression(
                &field.name,
                &field.struct_name,
                &field.value,
                None,
                &field.rules,
                &mut violations,
            ) {
                return Err(EngineError::Internal(fault));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Violations(violations))
        }
    }

    fn check_value(
        &self,
        value: &Value,
        other: Option<&Value>,
        rules: &str,
    ) -> Result<(), EngineError> {
        let mut violations = Vec::new();
        if let Err(fault) = self.check_expression("", "", value, other, rules, &mut violations) {
            return Err(EngineError::Internal(fault));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Violations(violations))
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for RuleEngine {
    fn register(&mut self, rule: &str, check: RuleFn) {
        self.rules.insert(rule.to_string(), check);
    }

    fn validate_struct(&self, value: &dyn Validatable) -> Result<(), EngineError> {
        self.check_fields(value, |_| true)
    }

    fn validate_struct_except(
        &self,
        value: &dyn Validatable,
        fields: &[&str],
    ) -> Result<(), EngineError> {
        self.check_fields(value, |field| !fields.contains(&field.struct_name.as_str()))
    }

    fn validate_struct_partial(
        &self,
        value: &dyn Validatable,
        fields: &[&str],
    ) -> Result<(), EngineError> {
        self.check_fields(value, |field| fields.contains(&field.struct_name.as_str()))
    }

    fn validate_value(&self, value: &Value, rules: &str) -> Result<(), EngineError> {
        self.check_value(value, None, rules)
    }

    fn validate_value_with(
        &self,
        value: &Value,
        other: &Value,
        rules: &str,
    ) -> Result<(), EngineError> {
        self.check_value(value, Some(other), rules)
    }
}

fn default_message(field: &str, rule: &str) -> String {
    if field.is_empty() {
        format!("validation failed on rule '{rule}'")
    } else {
        format!("validation failed for field '{field}' on rule '{rule}'")
    }
}

fn check_required(ctx: &RuleContext) -> bool {
    match ctx.value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
        _ => true,
    }
}

// min/max bound string and array length, and numeric magnitude.
fn check_min(ctx: &RuleContext) -> bool {
    let Ok(min) = ctx.param.parse::<f64>() else {
        return false;
    };
    match ctx.value {
        Value::String(s) => s.chars().count() as f64 >= min,
        Value::Array(items) => items.len() as f64 >= min,
        Value::Number(n) => n.as_f64().is_some_and(|v| v >= min),
        _ => false,
    }
}

fn check_max(ctx: &RuleContext) -> bool {
    let Ok(max) = ctx.param.parse::<f64>() else {
        return false;
    };
    match ctx.value {
        Value::String(s) => s.chars().count() as f64 <= max,
        Value::Array(items) => items.len() as f64 <= max,
        Value::Number(n) => n.as_f64().is_some_and(|v| v <= max),
        _ => false,
    }
}

fn check_len(ctx: &RuleContext) -> bool {
    let Ok(expected) = ctx.param.parse::<usize>() else {
        return false;
    };
    match ctx.value {
        Value::String(s) => s.chars().count() == expected,
        Value::Array(items) => items.len() == expected,
        _ => false,
    }
}

fn check_email(ctx: &RuleContext) -> bool {
    ctx.str_value().is_some_and(|s| email_regex().is_match(s))
}

fn check_url(ctx: &RuleContext) -> bool {
    ctx.str_value().is_some_and(|s| url_regex().is_match(s))
}

fn check_numeric(ctx: &RuleContext) -> bool {
    ctx.numeric_value().is_some()
}

fn check_eq(ctx: &RuleContext) -> bool {
    match ctx.value {
        Value::String(s) => s == ctx.param,
        Value::Number(n) => ctx
            .param
            .parse::<f64>()
            .ok()
            .zip(n.as_f64())
            .is_some_and(|(p, v)| p == v),
        Value::Bool(b) => ctx.param.parse::<bool>().ok() == Some(*b),
        _ => false,
    }
}

fn check_eqfield(ctx: &RuleContext) -> bool {
    ctx.other.is_some_and(|other| other == ctx.value)
}

fn check_nefield(ctx: &RuleContext) -> bool {
    ctx.other.is_some_and(|other| other != ctx.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Form {
        email: String,
        age: u8,
    }

    impl Validatable for Form {
        fn fields(&self) -> Vec<Field> {
            vec![
                Field::new("email", self.email.as_str(), "required,email"),
                Field::new("age", self.age, "min=18"),
            ]
        }
    }

    fn violations(result: Result<(), EngineError>) -> Vec<Violation> {
        match result {
            Err(EngineError::Violations(v)) => v,
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn valid_struct_passes() {
        let engine = RuleEngine::new();
        let form = Form {
            email: "a@b.co".into(),
            age: 20,
        };
        assert!(engine.validate_struct(&form).is_ok());
    }

    #[test]
    fn violations_carry_field_rule_and_param() {
        let engine = RuleEngine::new();
        let form = Form {
            email: String::new(),
            age: 15,
        };

        let found = violations(engine.validate_struct(&form));
        assert_eq!(found.len(), 3); // required, email, min

        let min = found.iter().find(|v| v.rule == "min").unwrap();
        assert_eq!(min.field, "age");
        assert_eq!(min.param, "18");
        assert!(min.message.contains("age"));
    }

    #[test]
    fn except_skips_fields() {
        let engine = RuleEngine::new();
        let form = Form {
            email: String::new(),
            age: 20,
        };
        assert!(engine.validate_struct_except(&form, &["email"]).is_ok());
    }

    #[test]
    fn partial_selects_fields() {
        let engine = RuleEngine::new();
        let form = Form {
            email: String::new(),
            age: 15,
        };

        let found = violations(engine.validate_struct_partial(&form, &["age"]));
        assert!(found.iter().all(|v| v.struct_field == "age"));
    }

    #[test]
    fn unknown_rule_is_internal() {
        let engine = RuleEngine::new();
        let result = engine.validate_value(&json!("x"), "required,never_registered");
        match result {
            Err(EngineError::Internal(InternalError::UnknownRule(rule))) => {
                assert_eq!(rule, "never_registered");
            }
            other => panic!("expected unknown-rule fault, got {other:?}"),
        }
    }

    #[test]
    fn dangling_equals_is_malformed() {
        let engine = RuleEngine::new();
        let result = engine.validate_value(&json!("x"), "=5");
        assert!(matches!(
            result,
            Err(EngineError::Internal(InternalError::MalformedExpression(_)))
        ));
    }

    #[test]
    fn empty_expression_passes() {
        let engine = RuleEngine::new();
        assert!(engine.validate_value(&json!("x"), "").is_ok());
        assert!(engine.validate_value(&json!("x"), " , ").is_ok());
    }

    #[test]
    fn registered_rule_replaces_builtin() {
        let mut engine = RuleEngine::new();
        engine.register("required", Box::new(|_| true));
        assert!(engine.validate_value(&json!(""), "required").is_ok());
    }

    #[test]
    fn required_builtin() {
        let ctx = |v: &Value| check_required(&RuleContext { value: v, param: "", other: None });
        assert!(!ctx(&Value::Null));
        assert!(!ctx(&json!("")));
        assert!(!ctx(&json!("   ")));
        assert!(!ctx(&json!([])));
        assert!(ctx(&json!("x")));
        assert!(ctx(&json!(0)));
        assert!(ctx(&json!(false)));
    }

    #[test]
    fn min_and_max_builtins() {
        let engine = RuleEngine::new();
        assert!(engine.validate_value(&json!("abc"), "min=3,max=5").is_ok());
        assert!(engine.validate_value(&json!("ab"), "min=3").is_err());
        assert!(engine.validate_value(&json!(18), "min=18").is_ok());
        assert!(engine.validate_value(&json!(17.5), "min=18").is_err());
        assert!(engine.validate_value(&json!([1, 2, 3]), "max=2").is_err());
    }

    #[test]
    fn len_builtin_counts_chars() {
        let engine = RuleEngine::new();
        assert!(engine.validate_value(&json!("سلام"), "len=4").is_ok());
        assert!(engine.validate_value(&json!("abc"), "len=4").is_err());
    }

    #[test]
    fn email_and_url_builtins() {
        let engine = RuleEngine::new();
        assert!(engine.validate_value(&json!("user@example.com"), "email").is_ok());
        assert!(engine.validate_value(&json!("not-an-email"), "email").is_err());
        assert!(engine.validate_value(&json!("https://example.com"), "url").is_ok());
        assert!(engine.validate_value(&json!("example.com"), "url").is_err());
    }

    #[test]
    fn eq_and_ne_builtins() {
        let engine = RuleEngine::new();
        assert!(engine.validate_value(&json!("yes"), "eq=yes").is_ok());
        assert!(engine.validate_value(&json!("no"), "eq=yes").is_err());
        assert!(engine.validate_value(&json!(5), "eq=5").is_ok());
        assert!(engine.validate_value(&json!("no"), "ne=yes").is_ok());
    }

    #[test]
    fn cross_value_builtins() {
        let engine = RuleEngine::new();
        assert!(engine
            .validate_value_with(&json!("a"), &json!("a"), "eqfield")
            .is_ok());
        assert!(engine
            .validate_value_with(&json!("a"), &json!("b"), "eqfield")
            .is_err());
        assert!(engine
            .validate_value_with(&json!("a"), &json!("b"), "nefield")
            .is_ok());

        // No comparison value available at all: the rule cannot pass.
        assert!(engine.validate_value(&json!("a"), "eqfield").is_err());
    }
}
