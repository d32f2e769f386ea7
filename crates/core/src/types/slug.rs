//! URL slug derivation.

/// Derive a URL slug from a display name.
///
/// Lowercases, keeps ASCII alphanumerics, and collapses every run of other
/// characters into a single hyphen. Leading/trailing hyphens are trimmed.
///
/// # Examples
///
/// ```
/// use animart_core::slugify;
///
/// assert_eq!(slugify("Attack on Titan"), "attack-on-titan");
/// assert_eq!(slugify("  Luffy's Straw Hat -- Replica!  "), "luffy-s-straw-hat-replica");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // suppress leading hyphen

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(slugify("Demon Slayer"), "demon-slayer");
    }

    #[test]
    fn test_punctuation_collapses() {
        assert_eq!(slugify("Gundam: Wing (1/144)"), "gundam-wing-1-144");
    }

    #[test]
    fn test_trims_edges() {
        assert_eq!(slugify("  spaced out  "), "spaced-out");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_non_ascii_dropped() {
        assert_eq!(slugify("ポスター poster"), "poster");
    }

    #[test]
    fn test_empty() {
        assert_eq!(slugify(""), "");
    }
}
