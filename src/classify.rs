//! Grammar-term detection.
//!
//! Some cards are tagged `vocab` in the source deck even though the word is
//! a grammatical term (اسم, فعل, مرفوع, ...). These are promoted to terms by
//! looking up the bare Arabic in a small lexicon.

use crate::models::{CardType, ItemType};
use std::collections::HashSet;

/// Bare words recognized as grammar terms out of the box
pub const DEFAULT_GRAMMAR_TERMS: &[&str] = &[
    "مرفوع", "منصوب", "مجرور", "مجزوم", // case/mood labels
    "اسم", "فعل", "حرف", // parts of speech
];

/// Marker introducing a plural form in deck entries (e.g. "اسم ج أسماء")
pub const PLURAL_MARKER: char = 'ج';

/// Closed set of bare grammar-term words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarLexicon {
    terms: HashSet<String>,
}

impl GrammarLexicon {
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.terms.contains(word)
    }

    /// Whether any whitespace-separated token of `arabic_bare`, or its
    /// singular base, is a known grammar term.
    pub fn matches(&self, arabic_bare: &str) -> bool {
        arabic_bare
            .split_whitespace()
            .any(|token| self.contains(token) || self.contains(plural_base(token)))
    }
}

impl Default for GrammarLexicon {
    fn default() -> Self {
        Self::from_terms(DEFAULT_GRAMMAR_TERMS.iter().copied())
    }
}

/// Token with everything from the first plural marker onwards removed.
pub fn plural_base(token: &str) -> &str {
    match token.find(PLURAL_MARKER) {
        Some(idx) => token[..idx].trim(),
        None => token,
    }
}

/// Effective item type of a card.
///
/// `grammar` cards are always terms; `vocab` cards become terms only when
/// the lexicon recognizes their bare Arabic.
pub fn effective_item_type(
    card_type: CardType,
    arabic_bare: &str,
    lexicon: &GrammarLexicon,
) -> ItemType {
    match card_type {
        CardType::Grammar => ItemType::Term,
        CardType::Vocab if lexicon.matches(arabic_bare) => ItemType::Term,
        CardType::Vocab => ItemType::Vocab,
    }
}
