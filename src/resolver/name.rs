//! Filtering and correction of names read from the target

/// Suffix some descriptors report when the object really holds the plain descriptor
pub const ARRAY_SUFFIX: &str = "-Array";

/// Replacement for [`ARRAY_SUFFIX`]
pub const TYPE_INFO_SUFFIX: &str = "-TypeInfo";

/// Printable ASCII or printable Latin-1, excluding the soft hyphen.
pub fn is_printable(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A1}'..='\u{FF}') && c != '\u{AD}'
}

/// Accept a candidate only if it is non-empty and starts with a printable character
pub fn accept_name(name: String) -> Option<String> {
    match name.chars().next() {
        Some(first) if is_printable(first) => Some(name),
        _ => None,
    }
}

/// Replace a trailing `-Array` with `-TypeInfo`; anything else passes through
pub fn correct_array_suffix(name: &str) -> String {
    match name.strip_suffix(ARRAY_SUFFIX) {
        Some(stem) => format!("{}{}", stem, TYPE_INFO_SUFFIX),
        None => name.to_string(),
    }
}
