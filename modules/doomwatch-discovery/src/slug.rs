use chrono::{DateTime, Utc};

/// Cap on the derived portion of a slug, before any date suffix.
const MAX_SLUG_LEN: usize = 80;

/// Derive a URL-safe slug from claim text. Lowercases, maps runs of
/// non-alphanumeric characters to single hyphens, trims, and caps the
/// length. Never returns an empty string: text with no retainable
/// characters falls back to `claim-<YYYYMMDD>` when a date is supplied,
/// `claim-<unix-timestamp>` otherwise. A supplied date is appended to a
/// non-empty slug to reduce collisions between unrelated identical claims.
pub fn generate_slug(text: &str, date: Option<DateTime<Utc>>) -> String {
    let mut slug = String::with_capacity(text.len().min(MAX_SLUG_LEN));
    for ch in text.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    // slug is pure ASCII here, so byte truncation is char-safe
    slug.truncate(MAX_SLUG_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        return match date {
            Some(d) => format!("claim-{}", d.format("%Y%m%d")),
            None => format!("claim-{}", Utc::now().timestamp()),
        };
    }

    if let Some(d) = date {
        slug.push_str(&format!("-{}", d.format("%Y%m%d")));
    }
    slug
}
