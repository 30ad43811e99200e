use crate::process::utils::clean_str;

/// Map a free-text honorific onto `Mr.`, `Mrs.`, `Ms.`, `Dr.`, or "".
/// Compound or unrecognised values ("Mr. and Mrs.", "Rev") become "".
pub fn normalize_salutation(raw: &str) -> &'static str {
    let key = clean_str(raw).replace('.', "").trim().to_lowercase();
    match key.as_str() {
        "mr" => "Mr.",
        "mrs" => "Mrs.",
        "ms" => "Ms.",
        "dr" => "Dr.",
        _ => "",
    }
}
