//! # Valoc format checkers
//!
//! Leaf predicates used by `valoc`'s domain validation rules. Each function
//! is a pure check over a string slice with no shared state, so they can
//! also be used standalone or wired into any other rule registry.
//!
//! The checksum-based checkers (`is_valid_iranian_national_code`,
//! `is_valid_iranian_bank_card`, `is_valid_iranian_iban`) implement the
//! official algorithms; the rest are format checks.

use regex::Regex;
use std::sync::OnceLock;

// Pre-compiled patterns
static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
static MOBILE_REGEX: OnceLock<Regex> = OnceLock::new();
static POSTAL_CODE_REGEX: OnceLock<Regex> = OnceLock::new();
static ID_NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
static IBAN_REGEX: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").unwrap())
}

fn phone_regex() -> &'static Regex {
    PHONE_REGEX.get_or_init(|| Regex::new(r"^0[1-9][0-9]{9}$").unwrap())
}

fn mobile_regex() -> &'static Regex {
    MOBILE_REGEX.get_or_init(|| Regex::new(r"^09[0-9]{9}$").unwrap())
}

fn postal_code_regex() -> &'static Regex {
    POSTAL_CODE_REGEX.get_or_init(|| Regex::new(r"^[0-9]{10}$").unwrap())
}

fn id_number_regex() -> &'static Regex {
    ID_NUMBER_REGEX.get_or_init(|| Regex::new(r"^[0-9]{1,10}$").unwrap())
}

fn iban_regex() -> &'static Regex {
    IBAN_REGEX.get_or_init(|| Regex::new(r"^IR[0-9]{24}$").unwrap())
}

/// Checks that a username contains only ASCII letters, digits, and underscores.
pub fn is_valid_username(username: &str) -> bool {
    username_regex().is_match(username)
}

/// Checks that a string contains only ASCII letters and digits, plus any of
/// the explicitly allowed extra characters.
pub fn is_alpha_numeric(value: &str, extra: &[char]) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || extra.contains(&c))
}

/// Like [`is_alpha_numeric`], but also accepts Persian letters and digits
/// (the Arabic Unicode block) and the zero-width non-joiner used between
/// Persian word parts.
pub fn is_alpha_numeric_persian(value: &str, extra: &[char]) -> bool {
    !value.is_empty()
        && value.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || ('\u{0600}'..='\u{06FF}').contains(&c)
                || c == '\u{200C}'
                || extra.contains(&c)
        })
}

/// Checks an 11-digit Iranian landline phone number (area code + number).
pub fn is_valid_iranian_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

/// Checks an 11-digit Iranian mobile number (starts with `09`).
pub fn is_valid_iranian_mobile(mobile: &str) -> bool {
    mobile_regex().is_match(mobile)
}

/// Checks a 10-digit Iranian postal code.
pub fn is_valid_iranian_postal_code(postal_code: &str) -> bool {
    postal_code_regex().is_match(postal_code)
}

/// Checks an Iranian birth-certificate (ID) number: 1 to 10 digits.
pub fn is_valid_iranian_id_number(id: &str) -> bool {
    id_number_regex().is_match(id)
}

/// Checks a 10-digit Iranian national code using the official mod-11
/// check-digit algorithm.
pub fn is_valid_iranian_national_code(national_code: &str) -> bool {
    if national_code.len() != 10 || !national_code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = national_code
        .bytes()
        .map(|b| u32::from(b - b'0'))
        .collect();

    // The first nine digits are weighted 10 down to 2; the tenth is the
    // check digit.
    let sum: u32 = digits[..9]
        .iter()
        .enumerate()
        .map(|(i, d)| d * (10 - i as u32))
        .sum();

    let remainder = sum % 11;
    let check = digits[9];

    if remainder < 2 {
        check == remainder
    } else {
        check == 11 - remainder
    }
}

/// Checks a 16-digit Iranian bank card number with the Luhn algorithm.
pub fn is_valid_iranian_bank_card(card_number: &str) -> bool {
    if card_number.len() != 16 || !card_number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let mut sum = 0u32;
    let mut alternate = false;
    for b in card_number.bytes().rev() {
        let mut n = u32::from(b - b'0');
        if alternate {
            n *= 2;
            if n > 9 {
                n -= 9;
            }
        }
        sum += n;
        alternate = !alternate;
    }

    sum % 10 == 0
}

/// Checks an Iranian IBAN (24 digits, with or without the leading `IR`)
/// using the MOD-97 remainder test.
pub fn is_valid_iranian_iban(iban: &str) -> bool {
    let iban = if iban.starts_with("IR") {
        iban.to_string()
    } else {
        format!("IR{iban}")
    };

    if !iban_regex().is_match(&iban) {
        return false;
    }

    // Replace the country prefix with its numeric form (I=18, R=27) and
    // reduce digit by digit; a full big-integer division is not needed for
    // a running remainder.
    let mut remainder = 0u64;
    for b in iban[2..].bytes().chain("1827".bytes()) {
        remainder = (remainder * 10 + u64::from(b - b'0')) % 97;
    }

    remainder == 1
}

/// Checks that a string parses as an IPv4 or IPv6 address.
pub fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<std::net::IpAddr>().is_ok()
}

/// Checks an `ip:port` pair: a parseable IPv4 address and a port in
/// `1..=65535`.
pub fn is_valid_ip_port(ip_port: &str) -> bool {
    let Some((ip, port)) = ip_port.rsplit_once(':') else {
        return false;
    };
    if ip.parse::<std::net::Ipv4Addr>().is_err() {
        return false;
    }
    matches!(port.parse::<u32>(), Ok(p) if (1..=65535).contains(&p))
}
