//! Token normalisation ahead of table lookup.
//!
//! Pure and total: any string normalises to some string, and only the
//! subsequent lookup can fail.

/// Fold full-width ASCII (U+FF01..U+FF5E) and the ideographic space to
/// their half-width forms.
fn fold_width(c: char) -> char {
    match c {
        '\u{3000}' => ' ',
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        _ => c,
    }
}

/// Normalise a regional handicap token.
///
/// - full-width digits and punctuation fold to half-width (`１．８` → `1.8`)
/// - surrounding whitespace is trimmed
/// - the zero-prefixed shorthand `0d` expands to `0.d` (`02` → `0.2`)
pub fn normalize_token(raw: &str) -> String {
    let folded: String = raw.chars().map(fold_width).collect();
    let trimmed = folded.trim();

    let bytes = trimmed.as_bytes();
    if bytes.len() == 2 && bytes[0] == b'0' && bytes[1].is_ascii_digit() {
        return format!("0.{}", bytes[1] as char);
    }
    trimmed.to_string()
}
