//! Slug derivation for listings and their versions.

use agentmart_core::AppError;

/// Maximum length of a slug derived from a title.
pub const MAX_SLUG_LEN: usize = 64;

/// Derive a URL-safe slug from a title.
///
/// Lower-cases ASCII alphanumerics, collapses every other run of characters
/// into a single `-`, and trims separators from both ends. Slugs shaped like
/// a version slug (`-v<n>-draft`, `-v<n>-archived`) are refused so a title
/// can never occupy a slug that a promotion or update request will need.
pub fn slugify(title: &str) -> Result<String, AppError> {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }

    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        return Err(AppError::validation(format!(
            "Title '{title}' does not contain any URL-safe characters"
        )));
    }
    if is_version_slug(&slug) {
        return Err(AppError::validation(format!(
            "Title '{title}' produces the reserved slug '{slug}'"
        )));
    }
    Ok(slug)
}

/// Whether `slug` has the shape of a draft or archived version slug.
pub fn is_version_slug(slug: &str) -> bool {
    let Some(rest) = slug
        .strip_suffix("-draft")
        .or_else(|| slug.strip_suffix("-archived"))
    else {
        return false;
    };
    match rest.rsplit_once("-v") {
        Some((base, digits)) => {
            !base.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Slug carried by a pending update until it is promoted.
pub fn draft_slug(canonical: &str, version: i32) -> String {
    format!("{canonical}-v{version}-draft")
}

/// Slug given to a superseded version when its update is promoted.
pub fn archived_slug(canonical: &str, version: i32) -> String {
    format!("{canonical}-v{version}-archived")
}
