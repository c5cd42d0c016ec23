//! # Valoc
//!
//! Localization-aware validation. Rule evaluation is delegated to a
//! pluggable [`Engine`]; this crate's job is turning the engine's raw
//! per-field, per-rule failures into localized, queryable
//! [`ValidationReport`]s.
//!
//! ## Example
//!
//! ```
//! use valoc::{Field, I18nValidator, MessageCatalog, Validatable, Translatable};
//!
//! struct Signup {
//!     name: String,
//!     age: u8,
//! }
//!
//! impl Validatable for Signup {
//!     fn fields(&self) -> Vec<Field> {
//!         vec![
//!             Field::new("name", self.name.as_str(), "required,min=3"),
//!             Field::new("age", self.age, "min=18"),
//!         ]
//!     }
//! }
//!
//! impl Translatable for Signup {}
//!
//! let mut v = I18nValidator::new().with_translator(MessageCatalog::new("en"), "");
//! v.add_translation("en", "min", "{field} must be at least {param}");
//!
//! let report = v.validate_struct("en", &Signup { name: "ab".into(), age: 16 });
//! assert!(report.is_failed_on("age", "min"));
//! assert_eq!(report.errors()["age"]["min"], "age must be at least 18");
//! ```
//!
//! ## Error format
//!
//! A report serializes as a JSON object keyed by field name, each value an
//! object keyed by rule name:
//!
//! ```json
//! {
//!   "name": {"min": "name must be at least 3"},
//!   "age": {"min": "age must be at least 18"}
//! }
//! ```
//!
//! Internal failures (an unknown rule, a value that cannot be validated)
//! never surface as panics or bare `Err`s from the entry points; they ride
//! along on the report and are checked with
//! [`ValidationReport::has_internal_error`].
//!
//! Domain rules for usernames, Iranian phone/postal/national-id numbers,
//! bank cards, and IBANs live in [`valoc_funcs`] and are installed with the
//! `with_*_rule` methods.

mod engine;
mod error;
mod numeric;
mod options;
mod rules;
mod translatable;
mod translate;
mod validator;

pub use engine::{Engine, EngineError, Field, RuleContext, RuleFn, Validatable, Violation};
pub use error::{InternalError, ValidationReport};
pub use options::LocalizedMessages;
pub use rules::RuleEngine;
pub use translatable::Translatable;
pub use translate::{MessageCatalog, PluralForm, TemplateArgs, Translator};
pub use validator::I18nValidator;

/// Prelude module for the common surface.
pub mod prelude {
    pub use crate::engine::{Engine, Field, RuleContext, Validatable};
    pub use crate::error::{InternalError, ValidationReport};
    pub use crate::translatable::Translatable;
    pub use crate::translate::{MessageCatalog, PluralForm, Translator};
    pub use crate::validator::I18nValidator;
}
