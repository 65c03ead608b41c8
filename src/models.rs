//! Data structures for the flashcard canonicalization pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::classify::GrammarLexicon;

/// Card type as tagged in the source deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Grammar,
    Vocab,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Grammar => "grammar",
            CardType::Vocab => "vocab",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grammar" => Ok(CardType::Grammar),
            "vocab" => Ok(CardType::Vocab),
            other => Err(format!("unknown card type: {:?}", other)),
        }
    }
}

/// Effective classification after canonicalization.
///
/// A card tagged `vocab` can still end up as a `Term` when its Arabic
/// matches the grammar lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Term,
    Vocab,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Term => "term",
            ItemType::Vocab => "vocab",
        }
    }

    /// Namespace component used inside identifiers (`fstu1.term`, `fstu1.lex`)
    pub fn id_kind(&self) -> &'static str {
        match self {
            ItemType::Term => "term",
            ItemType::Vocab => "lex",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flashcard as stored in the source deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub section: String,
    pub part: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub english: String,
    pub arabic: String,
}

/// A flashcard with its canonical fields attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    // Input fields, preserved verbatim and emitted first
    #[serde(flatten)]
    pub raw: RawRecord,

    pub id: String,
    pub book: String,
    pub item_type: ItemType,
    pub segment_id: String,
    pub intro_order: u32,
    pub arabic_diacritics: String,
    pub arabic_bare: String,

    // Placeholders for later enrichment
    pub clusters: Vec<String>,
    pub pos_primary: Option<String>,
    pub notes_short: Option<String>,
    pub answer_variants: Vec<String>,
    pub status: String,
}

/// Canonicalization parameters
#[derive(Debug, Clone)]
pub struct CanonParams {
    /// Collection tag, used verbatim in segment IDs and the `book` field
    pub book: String,
    /// Leading component of every identifier, e.g. `fstu1` in `fstu1.lex.kitab`
    pub id_namespace: String,
    /// Initial `status` of every canonical record
    pub status: String,
    /// Bare Arabic words that promote a `vocab` card to a term
    pub grammar_terms: GrammarLexicon,
}

impl CanonParams {
    /// Identifier prefix for an item type, e.g. `fstu1.term`
    pub fn id_prefix(&self, item_type: ItemType) -> String {
        format!("{}.{}", self.id_namespace, item_type.id_kind())
    }
}

impl Default for CanonParams {
    fn default() -> Self {
        Self {
            book: "FSTU1".to_string(),
            id_namespace: "fstu1".to_string(),
            status: "active".to_string(),
            grammar_terms: GrammarLexicon::default(),
        }
    }
}

/// An identifier that occurs more than once in a canonical set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateId {
    pub id: String,
    pub count: usize,
}

/// Counts reported after a canonicalization run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonSummary {
    pub input_count: usize,
    pub output_count: usize,
    pub unique_ids: usize,
    pub term_count: usize,
    pub vocab_count: usize,
    pub promoted_count: usize,    // vocab-tagged cards reclassified as terms
    pub fallback_slug_count: usize,
    pub section_count: usize,
}

/// Full canonicalization result
#[derive(Debug)]
pub struct CanonResult {
    pub records: Vec<CanonicalRecord>,
    pub summary: CanonSummary,
}

// ============================================================================
// Deck structure types
// ============================================================================

/// One part of a section, with its cards in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartNode {
    pub name: String,
    pub cards: Vec<RawRecord>,
    pub grammar_count: usize,
    pub vocab_count: usize,
}

/// One section of the deck with its parts in first-appearance order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionNode {
    pub name: String,
    pub parts: Vec<PartNode>,
}

impl SectionNode {
    pub fn card_count(&self) -> usize {
        self.parts.iter().map(|p| p.cards.len()).sum()
    }
}

/// Criteria for selecting cards; `None` matches everything
#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    pub section: Option<String>,
    pub part: Option<String>,
    pub card_type: Option<CardType>,
}

/// Deck statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeckStats {
    pub total_cards: usize,
    pub grammar_cards: usize,
    pub vocab_cards: usize,
    pub sections: usize,
    pub parts: usize,
}
