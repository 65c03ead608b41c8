//! Arabic diacritic (tashkil) removal.
//!
//! The bare form is what the grammar classifier and downstream matching see.

/// Whether `c` is an Arabic combining mark.
///
/// Covers the Quranic annotation signs (U+0610..U+061A), the harakat block
/// (U+064B..U+065F) and the superscript alef (U+0670).
#[inline]
pub fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{0610}'..='\u{061A}' | '\u{064B}'..='\u{065F}' | '\u{0670}')
}

/// Remove all Arabic combining marks from `text`.
pub fn strip_diacritics(text: &str) -> String {
    text.chars().filter(|&c| !is_diacritic(c)).collect()
}
