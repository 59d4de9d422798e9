//! String distance helpers used for fuzzy name matching.

/// Classic Levenshtein distance over UTF-16 code units.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<u16> = a.encode_utf16().collect();
    let b: Vec<u16> = b.encode_utf16().collect();
    strsim::generic_levenshtein(&a, &b)
}

/// Normalised similarity in `[0, 1]`: `1 - distance / longest length`.
///
/// Two empty strings are identical. Callers fold case before comparing.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.encode_utf16().count().max(b.encode_utf16().count());
    if longest == 0 {
        return 1.0;
    }

    1.0 - edit_distance(a, b) as f64 / longest as f64
}
