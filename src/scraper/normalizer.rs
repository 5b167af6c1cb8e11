// src/scraper/normalizer.rs
//
// Canonical forms for the two field types that have one: Finnish phone
// numbers go to +358 international form, emails go to lowercase.

/// Strips formatting, keeping only digits and a leading `+`.
fn compact_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// A candidate is a phone number iff its compacted form matches the Finnish
/// national (`0` + 8-9 digits) or international (`+358` + 8-9 digits) shape.
pub fn is_valid_phone(raw: &str) -> bool {
    let compact = compact_phone(raw);
    if let Some(rest) = compact.strip_prefix("+358") {
        return (8..=9).contains(&rest.len()) && rest.chars().all(|c| c.is_ascii_digit());
    }
    if let Some(rest) = compact.strip_prefix('0') {
        return (8..=9).contains(&rest.len()) && rest.chars().all(|c| c.is_ascii_digit());
    }
    false
}

/// Normalizes a matched phone number to `+358…` form.
///
/// National numbers swap the leading `0` for `+358`; numbers already in
/// international form pass through compacted (so normalization is
/// idempotent). Anything that fails validation is returned as matched
/// rather than discarded — a number we cannot canonicalize is still a
/// number somebody can dial.
pub fn normalize_phone(raw: &str) -> String {
    if !is_valid_phone(raw) {
        return raw.to_string();
    }
    let compact = compact_phone(raw);
    if compact.starts_with("+358") {
        compact
    } else if let Some(rest) = compact.strip_prefix('0') {
        format!("+358{}", rest)
    } else {
        raw.to_string()
    }
}

/// Standard single-at, dot-containing-domain check. Invalid matches are
/// discarded by callers, not flagged.
pub fn is_valid_email(raw: &str) -> bool {
    let mut parts = raw.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".-".contains(c))
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
