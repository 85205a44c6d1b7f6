use uuid::Uuid;

const SLUG_LEN: usize = 12;

/// A short, unguessable slug for a public resume link.
pub fn generate_slug() -> String {
    Uuid::new_v4().simple().to_string()[..SLUG_LEN].to_string()
}

/// Public URL the web app serves a shared resume on.
pub fn share_url(public_base_url: &str, slug: &str) -> String {
    format!("{}/r/{slug}", public_base_url.trim_end_matches('/'))
}

/// Slugs are lowercase hex of a fixed length; anything else cannot exist.
pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() == SLUG_LEN && slug.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_slugs_are_valid_and_distinct() {
        let a = generate_slug();
        let b = generate_slug();
        assert!(is_valid_slug(&a));
        assert!(is_valid_slug(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_share_url_trims_trailing_slash() {
        assert_eq!(
            share_url("https://resumes.example.com/", "abc123def456"),
            "https://resumes.example.com/r/abc123def456"
        );
    }

    #[test]
    fn test_invalid_slugs_rejected() {
        assert!(!is_valid_slug("short"));
        assert!(!is_valid_slug("ABC123DEF456"));
        assert!(!is_valid_slug("zzzzzzzzzzzz"));
    }
}
