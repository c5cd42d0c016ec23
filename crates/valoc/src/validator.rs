//! The localization-aware validator: public entry points and the
//! error-translation pipeline.

use crate::engine::{Engine, EngineError, RuleContext, Validatable};
use crate::error::{InternalError, ValidationReport};
use crate::numeric;
use crate::rules::RuleEngine;
use crate::translatable::Translatable;
use crate::translate::{PluralForm, TemplateArgs, Translator};
use serde::Serialize;
use serde_json::Value;

/// Validates structs and single values through an [`Engine`], translating
/// every failure into a localized [`ValidationReport`].
///
/// All configuration — rules, translations, the rule-key prefix — lives on
/// the instance; there is no global state. Configure once, then share
/// across calls (the validator is `Send + Sync` when its engine is).
///
/// ```
/// use valoc::{I18nValidator, MessageCatalog};
///
/// let mut v = I18nValidator::new().with_translator(MessageCatalog::new("en"), "");
/// v.add_validation("is_valid", |ctx| ctx.str_value() == Some("valid"));
/// v.add_translation("en", "is_valid", "{field} must be valid");
///
/// let report = v.validate_var("en", "token", &"invalid", "is_valid");
/// assert!(report.has_validation_errors());
/// ```
pub struct I18nValidator<E: Engine = RuleEngine> {
    engine: E,
    translator: Option<Box<dyn Translator>>,
    prefix: String,
}

impl I18nValidator<RuleEngine> {
    /// A validator backed by the builtin [`RuleEngine`].
    pub fn new() -> Self {
        Self::with_engine(RuleEngine::new())
    }
}

impl Default for I18nValidator<RuleEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Engine> I18nValidator<E> {
    /// A validator backed by a custom engine.
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            translator: None,
            prefix: String::new(),
        }
    }

    /// Install the translator and the rule-key prefix.
    ///
    /// The prefix (trimmed) is joined to every rule name with a `.` both
    /// when registering translations and when looking them up, so a
    /// prefixed validator reads from its own namespace of the catalog.
    pub fn with_translator(mut self, translator: impl Translator + 'static, prefix: &str) -> Self {
        self.translator = Some(Box::new(translator));
        self.prefix = prefix.trim().to_string();
        self
    }

    /// Register a named rule with the engine. Empty names are ignored.
    pub fn add_validation<F>(&mut self, rule: &str, check: F)
    where
        F: Fn(&RuleContext) -> bool + Send + Sync + 'static,
    {
        let rule = rule.trim();
        if rule.is_empty() {
            return;
        }
        self.engine.register(rule, Box::new(check));
    }

    /// Register a translation for a rule in a locale. A no-op without a
    /// translator or with an empty rule name.
    pub fn add_translation(&mut self, locale: &str, rule: &str, template: &str) {
        self.add_translation_plural(locale, rule, template, Vec::new());
    }

    /// Register a translation with plural forms selected by the derived
    /// rule-parameter count.
    pub fn add_translation_plural(
        &mut self,
        locale: &str,
        rule: &str,
        template: &str,
        plurals: Vec<PluralForm>,
    ) {
        let rule = rule.trim();
        if rule.is_empty() {
            return;
        }
        let key = self.prefixed(rule);
        if let Some(translator) = self.translator.as_mut() {
            translator.add_message(locale, &key, template, plurals);
        }
    }

    /// Validate every field of a struct.
    pub fn validate_struct<T>(&self, locale: &str, value: &T) -> ValidationReport
    where
        T: Validatable + Translatable,
    {
        self.struct_report(locale, value, self.engine.validate_struct(value))
    }

    /// Validate a struct, skipping the named fields.
    pub fn validate_struct_except<T>(
        &self,
        locale: &str,
        value: &T,
        fields: &[&str],
    ) -> ValidationReport
    where
        T: Validatable + Translatable,
    {
        self.struct_report(locale, value, self.engine.validate_struct_except(value, fields))
    }

    /// Validate only the named fields of a struct.
    pub fn validate_struct_partial<T>(
        &self,
        locale: &str,
        value: &T,
        fields: &[&str],
    ) -> ValidationReport
    where
        T: Validatable + Translatable,
    {
        self.struct_report(locale, value, self.engine.validate_struct_partial(value, fields))
    }

    /// Validate a single named value against a rule expression. The name
    /// identifies the value in the report and in translated messages.
    pub fn validate_var<V>(&self, locale: &str, name: &str, value: &V, rules: &str) -> ValidationReport
    where
        V: Serialize + Translatable,
    {
        let json = match to_engine_value(value) {
            Ok(json) => json,
            Err(report) => return report,
        };
        self.var_report(locale, name, value, self.engine.validate_value(&json, rules))
    }

    /// Validate a named value against a rule expression, with a second
    /// value available for cross-value rules such as `eqfield`.
    pub fn validate_var_with<V, O>(
        &self,
        locale: &str,
        name: &str,
        value: &V,
        other: &O,
        rules: &str,
    ) -> ValidationReport
    where
        V: Serialize + Translatable,
        O: Serialize,
    {
        let json = match to_engine_value(value) {
            Ok(json) => json,
            Err(report) => return report,
        };
        let other = match to_engine_value(other) {
            Ok(other) => other,
            Err(report) => return report,
        };
        self.var_report(
            locale,
            name,
            value,
            self.engine.validate_value_with(&json, &other, rules),
        )
    }

    fn prefixed(&self, rule: &str) -> String {
        if self.prefix.is_empty() {
            rule.to_string()
        } else {
            format!("{}.{}", self.prefix, rule)
        }
    }

    /// Struct-shaped pipeline: violation identity comes from the engine.
    fn struct_report(
        &self,
        locale: &str,
        value: &dyn Translatable,
        outcome: Result<(), EngineError>,
    ) -> ValidationReport {
        self.build_report(locale, value, outcome, None)
    }

    /// Variable-shaped pipeline: the caller-supplied name is both the
    /// display name and the field identity.
    fn var_report(
        &self,
        locale: &str,
        name: &str,
        value: &dyn Translatable,
        outcome: Result<(), EngineError>,
    ) -> ValidationReport {
        self.build_report(locale, value, outcome, Some(name))
    }

    fn build_report(
        &self,
        locale: &str,
        value: &dyn Translatable,
        outcome: Result<(), EngineError>,
        var_name: Option<&str>,
    ) -> ValidationReport {
        let error = match outcome {
            Ok(()) => return ValidationReport::new(),
            Err(error) => error,
        };

        let violations = match error {
            EngineError::Internal(fault) => {
                tracing::debug!(error = %fault, "validation aborted by engine fault");
                return ValidationReport::from_internal(fault);
            }
            EngineError::Violations(violations) => violations,
        };

        let mut report = ValidationReport::new();
        for violation in violations {
            let (field, struct_field) = match var_name {
                Some(name) => (name, name),
                None => (violation.field.as_str(), violation.struct_field.as_str()),
            };

            let (param, count) = coerce_param(&violation.param);
            let message = match self.translate(
                locale,
                field,
                &violation.rule,
                struct_field,
                param,
                value,
                count,
            ) {
                Some(message) => message,
                None => {
                    tracing::trace!(
                        rule = %violation.rule,
                        field = %field,
                        "no translation found, keeping engine message"
                    );
                    violation.message.clone()
                }
            };
            report.add_error(field, &violation.rule, message);
        }
        report
    }

    /// Resolve the localized message for one violation.
    ///
    /// Order: per-value error hook, then the global translator under the
    /// prefixed rule key, with the per-value title hook supplying the
    /// field's display name. `None` when no translator is configured or
    /// the catalog has no entry.
    #[allow(clippy::too_many_arguments)]
    fn translate(
        &self,
        locale: &str,
        name: &str,
        rule: &str,
        field: &str,
        param: Value,
        value: &dyn Translatable,
        count: i64,
    ) -> Option<String> {
        let translator = self.translator.as_deref()?;

        if let Some(message) = value
            .translate_error(locale, rule, field)
            .filter(|m| !m.is_empty())
        {
            return Some(message);
        }

        let key = self.prefixed(rule);

        let title = value
            .translate_title(locale, field)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| name.to_string());

        let mut args = TemplateArgs::new();
        args.insert("field".to_string(), Value::from(title));
        args.insert("param".to_string(), param);

        translator.plural(locale, &key, count, &args)
    }
}

fn to_engine_value<V: Serialize>(value: &V) -> Result<Value, ValidationReport> {
    serde_json::to_value(value).map_err(|err| {
        ValidationReport::from_internal(InternalError::InvalidValue(err.to_string()))
    })
}

/// Coerce a raw rule parameter for substitution and derive the plural
/// count: integers count as themselves, floats truncate toward zero,
/// anything else stays a string with count 0.
fn coerce_param(raw: &str) -> (Value, i64) {
    match numeric::parse_numeric(raw) {
        Some(numeric) => (numeric.to_value(), numeric.count()),
        None => (Value::from(raw), 0),
    }
}
