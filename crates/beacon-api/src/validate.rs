//! Request-boundary validation for registration input. The messages are the
//! exact client-facing strings, so they must not drift.

use crate::error::ApiError;

/// Absent and empty-string fields are both treated as missing.
pub(crate) fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

pub fn name(name: &str) -> Result<(), ApiError> {
    let len = name.chars().count();
    if !(2..=30).contains(&len) {
        return Err(ApiError::validation(
            "Name must be between 2 and 30 characters",
        ));
    }
    Ok(())
}

pub fn email(email: &str) -> Result<(), ApiError> {
    if !is_valid_email(email) {
        return Err(ApiError::validation("Invalid email format"));
    }
    // Matches the column constraint
    if email.chars().count() > 60 {
        return Err(ApiError::validation("Email must not exceed 60 characters"));
    }
    Ok(())
}

pub fn password(password: &str) -> Result<(), ApiError> {
    if !is_valid_password(password) {
        return Err(ApiError::validation(
            "Password must be at least 8 characters long and contain at least one uppercase letter, one lowercase letter, and one number",
        ));
    }
    Ok(())
}

/// Structural address check: one `@`, a non-empty local part, and a domain
/// with a non-empty label on each side of its last dot. No whitespace
/// anywhere.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// At least 8 characters with one uppercase letter, one lowercase letter
/// and one digit.
fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_bounds() {
        assert!(name("Al").is_ok());
        assert!(name(&"a".repeat(30)).is_ok());
        assert!(name("A").is_err());
        assert!(name(&"a".repeat(31)).is_err());
    }

    #[test]
    fn email_accepts_plain_addresses() {
        assert!(email("ada@example.com").is_ok());
        assert!(email("a.b+c@mail.example.co").is_ok());
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for bad in [
            "",
            "ada",
            "ada@",
            "@example.com",
            "ada@example",
            "ada@.com",
            "ada@example.",
            "ada@@example.com",
            "ada @example.com",
        ] {
            assert!(email(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn email_length_cap_is_60() {
        // 64-character address with a valid shape
        let local = "a".repeat(52);
        let long = format!("{local}@example.com");
        assert_eq!(long.chars().count(), 64);
        let err = email(&long).unwrap_err();
        assert_eq!(err.to_string(), "Email must not exceed 60 characters");
    }

    #[test]
    fn password_policy_vectors() {
        assert!(password("Abcdefg1").is_ok());
        assert!(password("abcdefg1").is_err(), "no uppercase");
        assert!(password("ABCDEFG1").is_err(), "no lowercase");
        assert!(password("Abcdefgh").is_err(), "no digit");
        assert!(password("Ab1").is_err(), "too short");
    }

    #[test]
    fn required_drops_empty_strings() {
        assert_eq!(required(Some("x".into())), Some("x".to_owned()));
        assert_eq!(required(Some(String::new())), None);
        assert_eq!(required(None), None);
    }
}
