//! FSTU Flashcard Canonicalization Library
//!
//! Turns a flat Arabic vocabulary deck into canonical flashcards: each card
//! receives a stable transliterated identifier, an effective type (grammar
//! term or vocabulary), a segment ID locating it in the book, an intro order
//! within its part and a diacritic-free Arabic form.
//!
//! # Example
//!
//! ```no_run
//! use fstu_canon::prelude::*;
//! use std::path::Path;
//!
//! let path = Path::new("src/data/flashcards.json");
//! let records = load_records(path).unwrap();
//!
//! let result = canonicalize(&records, &CanonParams::default(), false).unwrap();
//! print_summary(&result.summary);
//!
//! write_json_file(&result.records, path).unwrap();
//! ```
//!
//! # Transliteration Example
//!
//! ```
//! use fstu_canon::prelude::*;
//!
//! assert_eq!(transliterate("كِتَاب"), "kitab");
//! assert_eq!(strip_diacritics("كِتَاب"), "كتاب");
//! ```

pub mod canon;
pub mod classify;
pub mod db;
pub mod deck;
pub mod diacritics;
pub mod ids;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod segment;
pub mod translit;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::canon::{
        canonicalize, find_duplicate_ids, plan_segments, verify_unique_ids, CanonError, Placement,
        SegmentPlan,
    };
    pub use crate::classify::{
        effective_item_type, plural_base, GrammarLexicon, DEFAULT_GRAMMAR_TERMS,
    };
    pub use crate::db::{
        load_lexicon, load_records, load_records_json, load_records_xlsx, parse_records_json,
        write_records_sqlite, DbError,
    };
    pub use crate::deck::{
        available_parts, build_section_tree, card_matches, deck_stats, filter_cards, shuffle_cards,
        shuffle_cards_with,
    };
    pub use crate::diacritics::{is_diacritic, strip_diacritics};
    pub use crate::ids::{IdAllocator, FALLBACK_SLUG};
    pub use crate::models::{
        CanonParams, CanonResult, CanonSummary, CanonicalRecord, CardFilter, CardType, DeckStats,
        DuplicateId, ItemType, PartNode, RawRecord, SectionNode,
    };
    pub use crate::output::{
        format_record, print_duplicates, print_records, print_stats, print_summary, print_tree,
        write_csv, write_csv_file, write_json, write_json_file, OutputError, OutputFormat,
    };
    pub use crate::pipeline::{default_output_path, run, RunError, RunOptions, RunOutcome};
    pub use crate::segment::{
        format_segment_id, parse_section, IntroOrderCounter, PartTable, SectionNumber, SegmentError,
    };
    pub use crate::translit::{collapse_runs, transliterate, LastVowel};
}

// Re-export commonly used types at the crate root
pub use models::{CanonParams, CanonResult, CanonicalRecord, ItemType, RawRecord};
