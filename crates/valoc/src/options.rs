//! Ready-made domain rules.
//!
//! Each installer registers a format-checker predicate from
//! [`valoc_funcs`] under its conventional tag and adds per-locale
//! messages for it. With an empty message list, an English default is
//! registered under the translator's fallback locale.

use crate::engine::{Engine, RuleContext};
use crate::validator::I18nValidator;

/// Per-locale message templates: `(locale, template)` pairs.
pub type LocalizedMessages<'a> = &'a [(&'a str, &'a str)];

impl<E: Engine> I18nValidator<E> {
    /// Register a rule together with its translations in one step.
    ///
    /// `default` is registered under the fallback locale when `messages`
    /// is empty.
    pub fn with_rule<F>(
        mut self,
        rule: &str,
        check: F,
        default: &str,
        messages: LocalizedMessages<'_>,
    ) -> Self
    where
        F: Fn(&RuleContext) -> bool + Send + Sync + 'static,
    {
        self.add_validation(rule, check);
        if messages.is_empty() {
            self.add_translation("", rule, default);
        } else {
            for (locale, template) in messages {
                self.add_translation(locale, rule, template);
            }
        }
        self
    }

    /// `username`: letters, digits, and underscores only.
    pub fn with_username_rule(self, messages: LocalizedMessages<'_>) -> Self {
        self.with_rule(
            "username",
            |ctx| ctx.str_value().is_some_and(valoc_funcs::is_valid_username),
            "Only letters, numbers, and underscores are allowed",
            messages,
        )
    }

    /// `alnum`: ASCII letters and digits; the rule parameter lists extra
    /// allowed characters (`alnum=_-`).
    pub fn with_alpha_numeric_rule(self, messages: LocalizedMessages<'_>) -> Self {
        self.with_rule(
            "alnum",
            |ctx| {
                let extra: Vec<char> = ctx.param.chars().collect();
                ctx.str_value()
                    .is_some_and(|s| valoc_funcs::is_alpha_numeric(s, &extra))
            },
            "Only english letters and numbers are allowed",
            messages,
        )
    }

    /// `alnum_fa`: like `alnum`, also accepting Persian letters and digits.
    pub fn with_alpha_numeric_persian_rule(self, messages: LocalizedMessages<'_>) -> Self {
        self.with_rule(
            "alnum_fa",
            |ctx| {
                let extra: Vec<char> = ctx.param.chars().collect();
                ctx.str_value()
                    .is_some_and(|s| valoc_funcs::is_alpha_numeric_persian(s, &extra))
            },
            "Only english letters, persian letters, and numbers are allowed",
            messages,
        )
    }

    /// `phone`: 11-digit Iranian landline number.
    pub fn with_phone_rule(self, messages: LocalizedMessages<'_>) -> Self {
        self.with_rule(
            "phone",
            |ctx| {
                ctx.str_value()
                    .is_some_and(valoc_funcs::is_valid_iranian_phone)
            },
            "Must be a valid 11-digit iranian phone number",
            messages,
        )
    }

    /// `mobile`: 11-digit Iranian mobile number.
    pub fn with_mobile_rule(self, messages: LocalizedMessages<'_>) -> Self {
        self.with_rule(
            "mobile",
            |ctx| {
                ctx.str_value()
                    .is_some_and(valoc_funcs::is_valid_iranian_mobile)
            },
            "Must be a valid 11-digit iranian mobile number",
            messages,
        )
    }

    /// `postal_code`: 10-digit Iranian postal code.
    pub fn with_postal_code_rule(self, messages: LocalizedMessages<'_>) -> Self {
        self.with_rule(
            "postal_code",
            |ctx| {
                ctx.str_value()
                    .is_some_and(valoc_funcs::is_valid_iranian_postal_code)
            },
            "Must be a valid 10-digit iranian postal code",
            messages,
        )
    }

    /// `id_number`: Iranian birth-certificate number.
    pub fn with_id_number_rule(self, messages: LocalizedMessages<'_>) -> Self {
        self.with_rule(
            "id_number",
            |ctx| {
                ctx.str_value()
                    .is_some_and(valoc_funcs::is_valid_iranian_id_number)
            },
            "Must be a valid iranian birth certificate number",
            messages,
        )
    }

    /// `national_code`: 10-digit Iranian national code with its mod-11
    /// check digit.
    pub fn with_national_code_rule(self, messages: LocalizedMessages<'_>) -> Self {
        self.with_rule(
            "national_code",
            |ctx| {
                ctx.str_value()
                    .is_some_and(valoc_funcs::is_valid_iranian_national_code)
            },
            "Must be a valid 10 digit iranian national id number",
            messages,
        )
    }

    /// `credit_number`: 16-digit bank card number (Luhn).
    pub fn with_credit_number_rule(self, messages: LocalizedMessages<'_>) -> Self {
        self.with_rule(
            "credit_number",
            |ctx| {
                ctx.str_value()
                    .is_some_and(valoc_funcs::is_valid_iranian_bank_card)
            },
            "Must be a valid 16 digit iranian credit card number",
            messages,
        )
    }

    /// `iban`: 24-digit Iranian IBAN (MOD-97), with or without the `IR`
    /// prefix.
    pub fn with_iban_rule(self, messages: LocalizedMessages<'_>) -> Self {
        self.with_rule(
            "iban",
            |ctx| {
                ctx.str_value()
                    .is_some_and(valoc_funcs::is_valid_iranian_iban)
            },
            "Must be a valid 24 digit iranian IBAN number",
            messages,
        )
    }

    /// `ip`: IPv4 or IPv6 address.
    pub fn with_ip_rule(self, messages: LocalizedMessages<'_>) -> Self {
        self.with_rule(
            "ip",
            |ctx| ctx.str_value().is_some_and(valoc_funcs::is_valid_ip),
            "Must be a valid IP address",
            messages,
        )
    }

    /// `ip_port`: IPv4 address and port pair.
    pub fn with_ip_port_rule(self, messages: LocalizedMessages<'_>) -> Self {
        self.with_rule(
            "ip_port",
            |ctx| ctx.str_value().is_some_and(valoc_funcs::is_valid_ip_port),
            "Must be a valid IP:Port address",
            messages,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::MessageCatalog;

    fn validator() -> I18nValidator {
        I18nValidator::new()
            .with_translator(MessageCatalog::new("en"), "")
            .with_username_rule(&[])
            .with_mobile_rule(&[("en", "{field} is not a mobile number")])
            .with_national_code_rule(&[])
            .with_credit_number_rule(&[])
            .with_iban_rule(&[])
            .with_alpha_numeric_rule(&[])
    }

    #[test]
    fn username_rule_with_default_message() {
        let v = validator();
        let report = v.validate_var("en", "login", &"bad name!", "username");
        assert!(report.is_failed_on("login", "username"));
        assert_eq!(
            report.errors()["login"]["username"],
            "Only letters, numbers, and underscores are allowed"
        );
    }

    #[test]
    fn mobile_rule_with_custom_message() {
        let v = validator();
        let report = v.validate_var("en", "contact", &"12345", "mobile");
        assert_eq!(
            report.errors()["contact"]["mobile"],
            "contact is not a mobile number"
        );
        assert!(!v.validate_var("en", "contact", &"09123456789", "mobile").has_error());
    }

    #[test]
    fn checksum_rules_end_to_end() {
        let v = validator();
        assert!(!v
            .validate_var("en", "code", &"0499370899", "national_code")
            .has_error());
        assert!(v
            .validate_var("en", "code", &"0499370898", "national_code")
            .has_validation_errors());

        assert!(!v
            .validate_var("en", "card", &"6274129005473742", "credit_number")
            .has_error());
        assert!(!v
            .validate_var("en", "account", &"IR062960000000100324200092", "iban")
            .has_error());
    }

    #[test]
    fn alnum_rule_reads_extra_chars_from_param() {
        let v = validator();
        assert!(v.validate_var("en", "slug", &"a_b", "alnum").has_validation_errors());
        assert!(!v.validate_var("en", "slug", &"a_b", "alnum=_").has_error());
    }
}
