// src/normalize.rs
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Separator between the municipality and UF halves of a table key.
pub const KEY_SEPARATOR: char = '_';

/// Turn free text into a lowercase ASCII identifier fragment:
/// lowercase, decompose (NFD) and drop combining marks, then keep only `[a-z0-9_]`.
///
/// `normalize("São Paulo") == "saopaulo"`
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
        .collect();

    stripped.trim().to_string()
}

/// `normalize(municipality) + "_" + normalize(uf)`
pub fn composite_key(municipality: &str, uf: &str) -> String {
    let mut key = normalize(municipality);
    key.push(KEY_SEPARATOR);
    key.push_str(&normalize(uf));
    key
}
