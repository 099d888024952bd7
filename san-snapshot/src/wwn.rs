//! World Wide Name helpers.

/// Normalize a WWN into lowercase colon-separated form.
///
/// Accepts 16 hex digits with or without `:`/`-` separators. Values that are
/// not WWN-shaped (alias names, for example) are returned trimmed and
/// otherwise untouched.
pub fn normalize_wwn(value: &str) -> String {
    let trimmed = value.trim();
    match wwn_digits(trimmed) {
        Some(digits) => digits
            .chunks(2)
            .map(|pair| pair.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(":"),
        None => trimmed.to_string(),
    }
}

fn wwn_digits(value: &str) -> Option<Vec<char>> {
    let digits = value
        .chars()
        .filter(|c| *c != ':' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect::<Vec<_>>();
    if digits.len() != 16 || !digits.iter().all(char::is_ascii_hexdigit) {
        return None;
    }
    let separators = value.len() - digits.len();
    if separators != 0 && separators != 7 {
        return None;
    }
    Some(digits)
}
