//! Kazakhstan mobile number normalization.

use thiserror::Error;

/// Operator prefixes accepted after the `+7` country code.
pub const KZ_MOBILE_CODES: [&str; 7] = ["700", "701", "702", "705", "706", "775", "778"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("phone number must start with +7")]
    MissingCountryCode,

    #[error("phone number must contain 11 digits in the form +7XXXXXXXXXX (got {digits})")]
    WrongLength { digits: usize },

    #[error("not a Kazakhstan mobile number; allowed operator codes: {}", KZ_MOBILE_CODES.join(", "))]
    UnknownOperator { code: String },
}

/// Normalizes user input to `+7XXXXXXXXXX`.
///
/// Spaces, brackets and dashes are dropped, as is every other non-digit
/// except a leading `+`.
///
/// # Errors
///
/// Returns [`PhoneError`] when the number lacks the `+7` prefix, does not
/// have exactly 11 digits, or uses an operator code outside
/// [`KZ_MOBILE_CODES`].
pub fn normalize_kz_phone(input: &str) -> Result<String, PhoneError> {
    let trimmed = input.trim();
    let mut cleaned = String::with_capacity(trimmed.len());
    for (idx, ch) in trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '-'))
        .enumerate()
    {
        if ch.is_ascii_digit() || (idx == 0 && ch == '+') {
            cleaned.push(ch);
        }
    }

    if !cleaned.starts_with("+7") {
        return Err(PhoneError::MissingCountryCode);
    }

    let digits: String = cleaned.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 11 {
        return Err(PhoneError::WrongLength {
            digits: digits.len(),
        });
    }

    let code = &digits[1..4];
    if !KZ_MOBILE_CODES.contains(&code) {
        return Err(PhoneError::UnknownOperator {
            code: code.to_string(),
        });
    }

    Ok(format!("+7{}", &digits[1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_formatting_characters() {
        assert_eq!(
            normalize_kz_phone("+7 (701) 123-45-67").unwrap(),
            "+77011234567"
        );
    }

    #[test]
    fn accepts_already_normalized_number() {
        assert_eq!(normalize_kz_phone("+77751234567").unwrap(), "+77751234567");
    }

    #[test]
    fn rejects_missing_plus_seven() {
        assert_eq!(
            normalize_kz_phone("87011234567"),
            Err(PhoneError::MissingCountryCode)
        );
    }

    #[test]
    fn rejects_short_number() {
        assert_eq!(
            normalize_kz_phone("+7701123"),
            Err(PhoneError::WrongLength { digits: 7 })
        );
    }

    #[test]
    fn rejects_landline_operator_code() {
        assert_eq!(
            normalize_kz_phone("+7 727 123 45 67"),
            Err(PhoneError::UnknownOperator {
                code: "727".to_string()
            })
        );
    }

    #[test]
    fn unknown_operator_message_lists_allowed_codes() {
        let err = normalize_kz_phone("+79161234567").unwrap_err();
        assert!(err.to_string().contains("700, 701, 702"));
    }

    #[test]
    fn drops_stray_letters_and_inner_plus() {
        assert_eq!(
            normalize_kz_phone("+7 701 123 45 67 ext").unwrap(),
            "+77011234567"
        );
        assert_eq!(
            normalize_kz_phone("+7701+1234567").unwrap(),
            "+77011234567"
        );
    }
}
