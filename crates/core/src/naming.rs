//! Slug generation for catalog entries.

/// Lowercase, ASCII-alphanumeric slug with single hyphens between words.
///
/// # Examples
///
/// ```
/// use arcana_core::naming::slugify;
///
/// assert_eq!(slugify("Brené Brown: The power of vulnerability"), "bren-brown-the-power-of-vulnerability");
/// assert_eq!(slugify("  The Fool  "), "the-fool");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' || ch == ':' {
            pending_hyphen = true;
        }
    }

    slug
}

/// Slug for a new talk, built from speaker and title.
pub fn talk_slug(speaker_name: &str, title: &str) -> String {
    slugify(&format!("{speaker_name} {title}"))
}

/// Disambiguate a slug that already exists by appending a base-36 suffix.
pub fn with_collision_suffix(slug: &str, discriminator: u64) -> String {
    format!("{slug}-{}", to_base36(discriminator))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_collapses_to_single_hyphen() {
        assert_eq!(slugify("Why we do what we do -- really?"), "why-we-do-what-we-do-really");
        assert_eq!(slugify("Ken Robinson: Do schools kill creativity?"), "ken-robinson-do-schools-kill-creativity");
    }

    #[test]
    fn talk_slug_joins_speaker_and_title() {
        assert_eq!(talk_slug("Simon Sinek", "Start with why"), "simon-sinek-start-with-why");
    }

    #[test]
    fn collision_suffix_is_base36() {
        assert_eq!(with_collision_suffix("a", 0), "a-0");
        assert_eq!(with_collision_suffix("a", 35), "a-z");
        assert_eq!(with_collision_suffix("a", 36), "a-10");
    }
}
