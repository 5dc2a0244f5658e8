//! URL-safe identifiers derived from resource names.

/// Derive a slug: lowercase, whitespace runs become `-`, anything outside
/// `[a-z0-9-]` is dropped.
///
/// `"Amazing Dev Tool"` → `"amazing-dev-tool"`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            slug.push(ch);
        }
    }

    slug
}

/// True when `slug` is non-empty and made only of `[a-z0-9-]`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Amazing Dev Tool"), "amazing-dev-tool");
        assert_eq!(slugify("GitHub"), "github");
    }

    #[test]
    fn test_slugify_collapses_whitespace_and_strips_symbols() {
        assert_eq!(slugify("Notion  (beta)\tv2!"), "notion-beta-v2");
        assert_eq!(slugify("C++ & Rust"), "c--rust");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Café Tools"), "caf-tools");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        for name in ["Amazing Dev Tool", "Notion (beta)", "already-a-slug", "  padded  "] {
            let once = slugify(name);
            assert_eq!(slugify(&once), once);
            assert!(once.is_empty() || is_valid_slug(&once));
        }
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("figma"));
        assert!(is_valid_slug("dev-tool-2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Figma"));
        assert!(!is_valid_slug("a b"));
    }
}
