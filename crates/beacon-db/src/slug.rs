use nid::Nanoid;

/// Backlink slugs are 10-character nanoids over the URL-safe default
/// alphabet.
pub const SLUG_LEN: usize = 10;

pub fn generate() -> String {
    Nanoid::<SLUG_LEN>::new().as_str().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_has_fixed_length() {
        assert_eq!(generate().len(), SLUG_LEN);
    }

    #[test]
    fn slug_uses_url_safe_alphabet() {
        let slug = generate();
        assert!(
            slug.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "unexpected character in slug {slug:?}"
        );
    }

    #[test]
    fn slugs_do_not_repeat() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
    }
}
