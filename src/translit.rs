//! Arabic to ASCII transliteration for identifier slugs.
//!
//! The transducer walks the diacritized text left to right, remembering
//! only the last short vowel it emitted. That single piece of state is
//! enough to absorb long vowels (fatha + alif, kasra + ya, damma + waw)
//! into the preceding short vowel. A final pass collapses repeated
//! characters, which covers gemination without looking at the shadda.
//!
//! The mapping is lossy and one-directional.

use crate::diacritics::is_diacritic;

const FATHA: char = '\u{064E}';
const DAMMA: char = '\u{064F}';
const KASRA: char = '\u{0650}';
const SHADDA: char = '\u{0651}';
const SUKUN: char = '\u{0652}';
const FATHATAN: char = '\u{064B}';
const DAMMATAN: char = '\u{064C}';
const KASRATAN: char = '\u{064D}';

/// Last short vowel written to the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastVowel {
    #[default]
    None,
    A,
    I,
    U,
}

/// ASCII rendering of an Arabic consonant.
///
/// Hamza carriers map to the empty string: they are consumed (and still
/// clear the vowel state) but contribute nothing.
pub fn consonant(c: char) -> Option<&'static str> {
    let ascii = match c {
        'ب' => "b",
        'ت' => "t",
        'ث' => "th",
        'ج' => "j",
        'ح' => "h",
        'خ' => "kh",
        'د' => "d",
        'ذ' => "dh",
        'ر' => "r",
        'ز' => "z",
        'س' => "s",
        'ش' => "sh",
        'ص' => "s",
        'ض' => "d",
        'ط' => "t",
        'ظ' => "z",
        'ع' => "a",
        'غ' => "gh",
        'ف' => "f",
        'ق' => "q",
        'ك' => "k",
        'ل' => "l",
        'م' => "m",
        'ن' => "n",
        'ه' => "h",
        'ة' => "a", // ta marbuta
        'ء' | 'ئ' | 'ؤ' => "",
        _ => return None,
    };
    Some(ascii)
}

/// Consume one character, appending to `out`, and return the new vowel state.
pub fn step(c: char, vowel: LastVowel, out: &mut String) -> LastVowel {
    match c {
        // Harakat
        FATHA => {
            out.push('a');
            LastVowel::A
        }
        KASRA => {
            out.push('i');
            LastVowel::I
        }
        DAMMA => {
            out.push('u');
            LastVowel::U
        }
        SUKUN => LastVowel::None,
        SHADDA => vowel,
        FATHATAN => {
            out.push_str("an");
            LastVowel::None
        }
        DAMMATAN => {
            out.push_str("un");
            LastVowel::None
        }
        KASRATAN => {
            out.push_str("in");
            LastVowel::None
        }
        c if is_diacritic(c) => vowel,

        // Long-vowel letters
        'إ' => {
            out.push('i');
            LastVowel::I
        }
        'ا' | 'آ' | 'أ' | 'ى' => {
            if vowel != LastVowel::A {
                out.push('a');
            }
            LastVowel::A
        }
        'و' => {
            if vowel == LastVowel::U {
                vowel
            } else {
                out.push('w');
                LastVowel::None
            }
        }
        'ي' => {
            if vowel == LastVowel::I {
                vowel
            } else {
                out.push('y');
                LastVowel::None
            }
        }

        c => {
            if let Some(ascii) = consonant(c) {
                out.push_str(ascii);
                LastVowel::None
            } else if c.is_ascii_lowercase() {
                out.push(c);
                LastVowel::None
            } else {
                // Whitespace, digits, punctuation, other scripts
                vowel
            }
        }
    }
}

/// Collapse every run of identical consecutive characters to one.
pub fn collapse_runs(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last: Option<char> = None;

    for c in s.chars() {
        if last != Some(c) {
            result.push(c);
            last = Some(c);
        }
    }

    result
}

/// Transliterate diacritized Arabic into a lowercase ASCII slug.
///
/// Returns an empty string when nothing in the input is mappable; callers
/// decide on a fallback.
pub fn transliterate(arabic: &str) -> String {
    let (raw, _) = arabic
        .chars()
        .fold((String::with_capacity(arabic.len()), LastVowel::None), |(mut out, vowel), c| {
            let next = step(c, vowel, &mut out);
            (out, next)
        });

    collapse_runs(&raw)
}
