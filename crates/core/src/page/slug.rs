//! Slug normalization and validation for page routes.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::templates;
use crate::error::{CmsError, CmsResult};

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug pattern is valid"));

/// Slugs that would shadow application routes, API prefixes or static assets.
pub const RESERVED_SLUGS: &[&str] = &[
    "admin",
    "api",
    "auth",
    "login",
    "logout",
    "signin",
    "signup",
    "dashboard",
    "account",
    "preview",
    "search",
    "services",
    "therapists",
    "contact",
    "book",
    "static",
    "assets",
    "images",
    "img",
    "fonts",
    "uploads",
    "public",
    "next",
    "favicon",
    "robots",
    "sitemap",
    "manifest",
    "404",
    "500",
];

/// Lowercase `input`, strip diacritics, fold the remaining Latin letters to
/// ASCII and collapse every other character run into a single hyphen.
pub fn normalize_slug(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    // Decompose first so accents become separate combining marks.
    for ch in input.nfd().flat_map(char::to_lowercase).nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        let folded = if ch.is_ascii_alphanumeric() {
            None
        } else {
            match fold_char(ch) {
                Some(ascii) => Some(ascii),
                None => {
                    pending_hyphen = true;
                    continue;
                }
            }
        };
        if pending_hyphen && !slug.is_empty() {
            slug.push('-');
        }
        pending_hyphen = false;
        match folded {
            Some(ascii) => slug.push_str(ascii),
            None => slug.push(ch),
        }
    }

    slug
}

fn fold_char(ch: char) -> Option<&'static str> {
    let ascii = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ł' | 'ľ' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' | 'ş' => "s",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        '&' => "and",
        _ => return None,
    };
    Some(ascii)
}

/// Whether `slug` is already in canonical form.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_PATTERN.is_match(slug)
}

/// Pick the slug for a new page: the explicit slug when one is given,
/// otherwise one derived from the title.
pub fn resolve_create_slug(title: &str, explicit_slug: Option<&str>) -> CmsResult<String> {
    let source = match explicit_slug.map(str::trim) {
        Some(explicit) if !explicit.is_empty() => explicit,
        _ => title,
    };
    let slug = normalize_slug(source);
    if slug.is_empty() || !is_valid_slug(&slug) {
        return Err(CmsError::InvalidSlug(format!(
            "could not derive a slug from {source:?}"
        )));
    }
    Ok(slug)
}

/// Check a slug for a custom page: canonical form, not reserved, and not
/// claimed by a system page.
pub fn validate_custom_slug(slug: &str) -> CmsResult<()> {
    if !is_valid_slug(slug) {
        return Err(CmsError::InvalidSlug(format!(
            "{slug:?} must contain only lowercase letters, digits and single hyphens"
        )));
    }
    if RESERVED_SLUGS.contains(&slug) || templates::is_system_slug(slug) {
        return Err(CmsError::ReservedSlug(slug.to_string()));
    }
    Ok(())
}

pub fn build_path_from_slug(slug: &str) -> String {
    format!("/{slug}")
}
