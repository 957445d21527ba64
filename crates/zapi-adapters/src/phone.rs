//! Phone number normalization.
//!
//! The gateway expects bare digit strings (`5511999999999`).  Users paste
//! numbers in every imaginable format, so every phone-typed parameter goes
//! through [`normalize`] before it reaches a request body or path.

/// Strip every non-digit character, then drop every leading zero.
///
/// This deliberately differs from removing a single trunk-prefix `0`:
/// `"00551199"` becomes `"551199"`, not `"0551199"`, so the result never
/// starts with `0`.  No country-code validation happens here; the gateway
/// rejects malformed numbers on its own.
pub fn normalize(raw: &str) -> String {
    digits(raw).trim_start_matches('0').to_string()
}

/// Split a comma-separated phone list and normalize each entry.
pub fn normalize_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|p| normalize(p.trim())).collect()
}

/// Keep only the ASCII digits of `raw`.
///
/// Used by the webhook phone filter, which matches on digits but does not
/// strip a leading zero.
pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
