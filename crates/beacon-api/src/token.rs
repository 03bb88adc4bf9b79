use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use beacon_types::Claims;

/// Bearer tokens live for seven days from issuance. There is no revocation:
/// logout is advisory bookkeeping and an issued token stays valid until it
/// expires.
const TOKEN_TTL_DAYS: i64 = 7;

pub fn issue(secret: &str, user_id: i64) -> Result<String> {
    let claims = Claims {
        user_id,
        exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Signature and expiry check. Every failure subtype collapses into one
/// error; callers only learn that the token did not verify, the cause is
/// logged at the gateway.
pub fn verify(secret: &str, token: &str) -> Result<i64, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(data.claims.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issue_then_verify_round_trips_the_user_id() {
        let token = issue(SECRET, 42).unwrap();
        assert_eq!(verify(SECRET, &token).unwrap(), 42);
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            user_id: 42,
            exp: (chrono::Utc::now() - chrono::Duration::days(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify(SECRET, &token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue(SECRET, 42).unwrap();
        assert!(verify("other-secret", &token).is_err());
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert!(verify(SECRET, "not.a.token").is_err());
    }
}
