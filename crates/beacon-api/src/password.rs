use anyhow::Result;

/// Fixed bcrypt work factor.
pub const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password with a random salt. The plaintext is never
/// logged or stored anywhere.
pub fn hash(plaintext: &str) -> Result<String> {
    Ok(bcrypt::hash(plaintext, BCRYPT_COST)?)
}

/// Verify plaintext against a stored digest. A malformed digest verifies as
/// false rather than erroring.
pub fn verify(plaintext: &str, digest: &str) -> bool {
    bcrypt::verify(plaintext, digest).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let digest = hash("Abcdefg1").unwrap();
        assert!(verify("Abcdefg1", &digest));
        assert!(!verify("Abcdefg2", &digest));
    }

    #[test]
    fn digests_are_salted() {
        let a = hash("Abcdefg1").unwrap();
        let b = hash("Abcdefg1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_digest_verifies_false() {
        assert!(!verify("Abcdefg1", "not-a-bcrypt-digest"));
        assert!(!verify("Abcdefg1", ""));
    }
}
