//! Per-value translation hooks.
//!
//! A validated value can override how its own failures are worded, or how
//! its field names are displayed, without touching the shared message
//! catalog. Both hooks default to `None`, which means "no opinion, use the
//! shared catalog" — implementing the trait with an empty body opts a type
//! in with no behavior change.

/// Optional, per-value overrides consulted by the translation resolver
/// before the global translator.
///
/// ```
/// use valoc::Translatable;
///
/// struct SignupForm {
///     email: String,
/// }
///
/// impl Translatable for SignupForm {
///     fn translate_title(&self, locale: &str, field: &str) -> Option<String> {
///         match (locale, field) {
///             ("de", "email") => Some("E-Mail-Adresse".to_string()),
///             _ => None,
///         }
///     }
/// }
/// # let _ = SignupForm { email: String::new() };
/// ```
pub trait Translatable {
    /// Localized message for a (rule, field) failure. Return `None` (or an
    /// empty string) to fall through to the global translator.
    fn translate_error(&self, locale: &str, rule: &str, field: &str) -> Option<String> {
        let _ = (locale, rule, field);
        None
    }

    /// Localized display name for a field. Return `None` (or an empty
    /// string) to keep the engine-reported name.
    fn translate_title(&self, locale: &str, field: &str) -> Option<String> {
        let _ = (locale, field);
        None
    }
}

impl<T: Translatable + ?Sized> Translatable for &T {
    fn translate_error(&self, locale: &str, rule: &str, field: &str) -> Option<String> {
        (**self).translate_error(locale, rule, field)
    }

    fn translate_title(&self, locale: &str, field: &str) -> Option<String> {
        (**self).translate_title(locale, field)
    }
}

impl<T: Translatable> Translatable for Option<T> {
    fn translate_error(&self, locale: &str, rule: &str, field: &str) -> Option<String> {
        self.as_ref()
            .and_then(|v| v.translate_error(locale, rule, field))
    }

    fn translate_title(&self, locale: &str, field: &str) -> Option<String> {
        self.as_ref().and_then(|v| v.translate_title(locale, field))
    }
}

// Plain variable values carry no overrides.
macro_rules! passthrough_translatable {
    ($($ty:ty),* $(,)?) => {
        $(impl Translatable for $ty {})*
    };
}

passthrough_translatable!(
    str, String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32,
    f64,
);
