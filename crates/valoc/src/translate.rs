//! Translator boundary and the built-in message catalog.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Substitution values handed to the translator, keyed by placeholder name.
///
/// The pipeline always supplies `field` (display name) and `param` (the
/// coerced rule parameter). Ordered so interpolation is deterministic.
pub type TemplateArgs = BTreeMap<String, Value>;

/// Locale-keyed, pluralized message source.
///
/// `plural` returns `None` when there is no entry for the key — the caller
/// decides the fallback (the pipeline uses the engine's default message).
pub trait Translator: Send + Sync {
    /// Format the message registered under `key` for `locale`, selecting a
    /// plural form by `count` and substituting `args` placeholders.
    fn plural(&self, locale: &str, key: &str, count: i64, args: &TemplateArgs) -> Option<String>;

    /// Register a message template with optional plural forms.
    fn add_message(&mut self, locale: &str, key: &str, template: &str, plurals: Vec<PluralForm>);
}

/// A template that applies to a range of counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralForm {
    min: i64,
    max: Option<i64>,
    template: String,
}

impl PluralForm {
    /// Form used for exactly `count`.
    pub fn exact(count: i64, template: impl Into<String>) -> Self {
        Self {
            min: count,
            max: Some(count),
            template: template.into(),
        }
    }

    /// Form used for counts in `min..=max`.
    pub fn between(min: i64, max: i64, template: impl Into<String>) -> Self {
        Self {
            min,
            max: Some(max),
            template: template.into(),
        }
    }

    /// Form used for any count of at least `min`.
    pub fn at_least(min: i64, template: impl Into<String>) -> Self {
        Self {
            min,
            max: None,
            template: template.into(),
        }
    }

    fn matches(&self, count: i64) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

#[derive(Debug, Clone)]
struct Message {
    template: String,
    plurals: Vec<PluralForm>,
}

impl Message {
    fn select(&self, count: i64) -> &str {
        self.plurals
            .iter()
            .find(|form| form.matches(count))
            .map(|form| form.template.as_str())
            .unwrap_or(&self.template)
    }
}

/// In-memory [`Translator`]: locale → key → message.
///
/// Lookups fall back to the catalog's fallback locale when the requested
/// locale has no entry for the key; a key missing from both yields `None`.
/// Registering under an empty locale targets the fallback locale.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    fallback: String,
    messages: HashMap<String, HashMap<String, Message>>,
}

impl MessageCatalog {
    /// Create a catalog whose fallback locale is `fallback`.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
            messages: HashMap::new(),
        }
    }

    /// Chainable registration, for building catalogs up front.
    pub fn with_message(mut self, locale: &str, key: &str, template: &str) -> Self {
        self.add_message(locale, key, template, Vec::new());
        self
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&Message> {
        self.messages
            .get(locale)
            .and_then(|keys| keys.get(key))
            .or_else(|| self.messages.get(&self.fallback)?.get(key))
    }
}

impl Translator for MessageCatalog {
    fn plural(&self, locale: &str, key: &str, count: i64, args: &TemplateArgs) -> Option<String> {
        let message = self.lookup(locale, key)?;
        Some(render(message.select(count), args))
    }

    fn add_message(&mut self, locale: &str, key: &str, template: &str, plurals: Vec<PluralForm>) {
        let locale = if locale.is_empty() {
            self.fallback.clone()
        } else {
            locale.to_string()
        };
        self.messages.entry(locale).or_default().insert(
            key.to_string(),
            Message {
                template: template.to_string(),
                plurals,
            },
        );
    }
}

/// Replace `{name}` placeholders with their substitution values. Strings
/// are inserted bare; other values use their JSON rendering.
fn render(template: &str, args: &TemplateArgs) -> String {
    let mut result = template.to_string();
    for (key, value) in args {
        let placeholder = format!("{{{key}}}");
        let replacement = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => other.to_string(),
        };
        result = result.replace(&placeholder, &replacement);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(field: &str, param: Value) -> TemplateArgs {
        let mut args = TemplateArgs::new();
        args.insert("field".to_string(), Value::from(field));
        args.insert("param".to_string(), param);
        args
    }

    #[test]
    fn lookup_and_interpolation() {
        let catalog = MessageCatalog::new("en").with_message("en", "min", "{field} needs {param}");
        let message = catalog.plural("en", "min", 3, &args("age", json!(3)));
        assert_eq!(message.as_deref(), Some("age needs 3"));
    }

    #[test]
    fn missing_key_is_none() {
        let catalog = MessageCatalog::new("en");
        assert_eq!(catalog.plural("en", "min", 1, &TemplateArgs::new()), None);
    }

    #[test]
    fn unknown_locale_falls_back() {
        let catalog = MessageCatalog::new("en").with_message("en", "required", "{field} required");
        let message = catalog.plural("fa", "required", 0, &args("name", json!("")));
        assert_eq!(message.as_deref(), Some("name required"));
    }

    #[test]
    fn locale_entry_wins_over_fallback() {
        let catalog = MessageCatalog::new("en")
            .with_message("en", "required", "{field} required")
            .with_message("fa", "required", "{field} الزامی است");
        let message = catalog.plural("fa", "required", 0, &args("name", json!("")));
        assert_eq!(message.as_deref(), Some("name الزامی است"));
    }

    #[test]
    fn empty_locale_registers_under_fallback() {
        let mut catalog = MessageCatalog::new("en");
        catalog.add_message("", "required", "{field} required", Vec::new());
        assert!(catalog.plural("en", "required", 0, &args("f", json!(""))).is_some());
    }

    #[test]
    fn plural_form_selection() {
        let mut catalog = MessageCatalog::new("en");
        catalog.add_message(
            "en",
            "min",
            "{field} must be at least {param} characters",
            vec![
                PluralForm::exact(1, "{field} must not be empty"),
                PluralForm::at_least(100, "{field} is bounded by {param}"),
            ],
        );

        let one = catalog.plural("en", "min", 1, &args("bio", json!(1)));
        assert_eq!(one.as_deref(), Some("bio must not be empty"));

        let five = catalog.plural("en", "min", 5, &args("bio", json!(5)));
        assert_eq!(five.as_deref(), Some("bio must be at least 5 characters"));

        let large = catalog.plural("en", "min", 200, &args("bio", json!(200)));
        assert_eq!(large.as_deref(), Some("bio is bounded by 200"));
    }

    #[test]
    fn between_form_is_inclusive() {
        let form = PluralForm::between(2, 4, "few");
        assert!(form.matches(2));
        assert!(form.matches(4));
        assert!(!form.matches(1));
        assert!(!form.matches(5));
    }

    #[test]
    fn float_and_string_params_render() {
        let catalog = MessageCatalog::new("en").with_message("en", "max", "limit {param}");
        let float = catalog.plural("en", "max", 5, &args("f", json!(5.5)));
        assert_eq!(float.as_deref(), Some("limit 5.5"));

        let text = catalog.plural("en", "max", 0, &args("f", json!("abc")));
        assert_eq!(text.as_deref(), Some("limit abc"));
    }
}
