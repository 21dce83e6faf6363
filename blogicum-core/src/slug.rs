use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("Failed to compile slug regex"));

/// Generate a URL-friendly slug from a title
pub fn slugify(title: &str) -> String {
    let mut slug = title.trim().to_lowercase();

    // Replace non-alphanumeric runs with single hyphens
    slug = NON_ALNUM.replace_all(&slug, "-").to_string();
    slug = slug.trim_matches('-').to_string();

    if slug.is_empty() {
        slug = "untitled".to_string();
    }

    // Cap at 100 chars to keep URLs reasonable
    if slug.len() > 100 {
        slug = slug
            .chars()
            .take(100)
            .collect::<String>()
            .trim_end_matches('-')
            .to_string();
    }

    slug
}
