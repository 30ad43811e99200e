use crate::process::utils::clean_str;

/// Wrapper characters peeled off both ends of an address.
const WRAPPERS: &[char] = &[' ', '<', '>', '"', '\''];

/// Lowercase and strip wrappers such as `<jane@x.org>` or quotes.
pub fn standardize_email(raw: &str) -> String {
    clean_str(raw).to_lowercase().trim_matches(WRAPPERS).to_string()
}

/// True iff the standardized address has exactly one `@`, non-empty local and
/// domain parts, a `.` in the domain, and no whitespace anywhere.
pub fn is_valid_email(raw: &str) -> bool {
    let e = standardize_email(raw);
    if e.is_empty() || e.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = e.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && domain.contains('.')
        }
        _ => false,
    }
}
