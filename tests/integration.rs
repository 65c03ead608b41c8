//! Integration tests for fstu-canon.
//!
//! These tests run the whole load → canonicalize → write → reload cycle.

use fstu_canon::canon::{canonicalize, CanonError};
use fstu_canon::db::{load_lexicon, load_records, write_records_sqlite};
use fstu_canon::deck::build_section_tree;
use fstu_canon::models::{CanonParams, CanonicalRecord, CardType, ItemType, RawRecord};
use fstu_canon::output::{write_json_file, OutputFormat};
use fstu_canon::pipeline::{run, RunError, RunOptions};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

fn card(section: &str, part: &str, card_type: CardType, english: &str, arabic: &str) -> RawRecord {
    RawRecord {
        section: section.to_string(),
        part: part.to_string(),
        card_type,
        english: english.to_string(),
        arabic: arabic.to_string(),
    }
}

/// A small deck resembling the real one, with interleaved parts and repeats.
fn sample_deck() -> Vec<RawRecord> {
    vec![
        card("Unit 1", "Part 1: Nouns", CardType::Grammar, "nominative", "مَرْفُوْع"),
        card("Unit 1", "Part 1: Nouns", CardType::Vocab, "book", "كِتَاب"),
        card("Unit 1", "Part 2: Verbs", CardType::Grammar, "past tense", "مَاضِي"),
        card("Unit 1", "Part 1: Nouns", CardType::Vocab, "noun", "اِسْم ج أَسْمَاء"),
        card("Unit 2", "Introduction", CardType::Grammar, "verb", "فِعْل"),
        card("Unit 2", "Part 1: Particles", CardType::Vocab, "in", "فِي"),
        card("Unit 2 Section 1", "Part 1: Nouns", CardType::Vocab, "books", "كُتُب"),
        card("Unit 2 Section 1", "Part 1: Nouns", CardType::Vocab, "book (again)", "كِتَاب"),
        card("Unit 2 Section 1", "Part 1: Nouns", CardType::Vocab, "?", "…"),
    ]
}

fn write_deck(path: &Path, records: &[RawRecord]) {
    fs::write(path, serde_json::to_string_pretty(records).unwrap()).unwrap();
}

#[test]
fn test_end_to_end_scenario() {
    let records = vec![card(
        "Unit 3 Section 2",
        "Part 1: Nouns",
        CardType::Grammar,
        "nominative",
        "مَرْفُوْع",
    )];

    let result = canonicalize(&records, &CanonParams::default(), false).unwrap();
    assert_eq!(result.records.len(), 1);

    let rec = &result.records[0];
    assert_eq!(rec.segment_id, "FSTU1-U03-S02-P01");
    assert_eq!(rec.intro_order, 1);
    assert_eq!(rec.item_type, ItemType::Term);
    assert!(rec.id.starts_with("fstu1.term."));
    assert_eq!(rec.arabic_bare, "مرفوع");
}

#[test]
fn test_output_preserves_input() {
    let deck = sample_deck();
    let result = canonicalize(&deck, &CanonParams::default(), false).unwrap();

    assert_eq!(result.records.len(), deck.len());
    for (input, output) in deck.iter().zip(&result.records) {
        assert_eq!(&output.raw, input);
        assert_eq!(output.arabic_diacritics, input.arabic);
    }
}

#[test]
fn test_ids_unique_and_suffixed_in_order() {
    let deck = sample_deck();
    let result = canonicalize(&deck, &CanonParams::default(), false).unwrap();

    let ids: HashSet<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids.len(), deck.len());
    assert_eq!(result.summary.unique_ids, deck.len());

    // "book" appears twice; the second one gets _2
    assert_eq!(result.records[1].id, "fstu1.lex.kitab");
    assert_eq!(result.records[7].id, "fstu1.lex.kitab_2");
    // Nothing transliterable: fallback slug
    assert_eq!(result.records[8].id, "fstu1.lex.unknown");
}

#[test]
fn test_intro_order_contiguous_per_group() {
    let deck = sample_deck();
    let result = canonicalize(&deck, &CanonParams::default(), false).unwrap();

    let mut groups: HashMap<(&str, &str), Vec<u32>> = HashMap::new();
    for rec in &result.records {
        groups
            .entry((rec.raw.section.as_str(), rec.raw.part.as_str()))
            .or_default()
            .push(rec.intro_order);
    }

    for orders in groups.values() {
        let expected: Vec<u32> = (1..=orders.len() as u32).collect();
        assert_eq!(orders, &expected);
    }
}

#[test]
fn test_segment_numbering_matches_section_tree() {
    let deck = sample_deck();
    let result = canonicalize(&deck, &CanonParams::default(), false).unwrap();
    let tree = build_section_tree(&deck);

    // Part numbers in segment IDs follow the tree's first-appearance order
    for section in &tree {
        for (i, part) in section.parts.iter().enumerate() {
            let suffix = format!("-P{:02}", i + 1);
            for rec in result
                .records
                .iter()
                .filter(|r| r.raw.section == section.name && r.raw.part == part.name)
            {
                assert!(rec.segment_id.ends_with(&suffix), "{}", rec.segment_id);
            }
        }
    }

    assert_eq!(result.records[2].segment_id, "FSTU1-U01-S00-P02");
    assert_eq!(result.records[6].segment_id, "FSTU1-U02-S01-P01");
}

#[test]
fn test_classifier_promotion() {
    let deck = sample_deck();
    let result = canonicalize(&deck, &CanonParams::default(), false).unwrap();

    // "اسم ج أسماء" tagged vocab becomes a term
    assert_eq!(result.records[3].item_type, ItemType::Term);
    assert!(result.records[3].id.starts_with("fstu1.term."));
    // Plain vocabulary stays vocabulary
    assert_eq!(result.records[1].item_type, ItemType::Vocab);
    // Grammar cards are always terms
    assert_eq!(result.records[2].item_type, ItemType::Term);
    assert_eq!(result.summary.promoted_count, 1);
}

#[test]
fn test_json_round_trip_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flashcards.json");
    write_deck(&path, &sample_deck());

    let records = load_records(&path).unwrap();
    let first = canonicalize(&records, &CanonParams::default(), false).unwrap();
    write_json_file(&first.records, &path).unwrap();

    // The canonical file loads as raw cards again and re-canonicalizes identically
    let reloaded = load_records(&path).unwrap();
    assert_eq!(reloaded, sample_deck());
    let second = canonicalize(&reloaded, &CanonParams::default(), false).unwrap();
    assert_eq!(second.records, first.records);

    let text = fs::read_to_string(&path).unwrap();
    let parsed: Vec<CanonicalRecord> = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, first.records);
}

#[test]
fn test_failed_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flashcards.json");
    let mut deck = sample_deck();
    deck.push(card("Appendix A", "Extras", CardType::Vocab, "pen", "قَلَم"));
    write_deck(&path, &deck);
    let before = fs::read(&path).unwrap();

    // Default target: the input itself
    let err = run(&RunOptions::new(&path), &CanonParams::default()).unwrap_err();
    assert!(err.to_string().contains("Appendix A"));
    match err {
        RunError::Canon(CanonError::Section { index, .. }) => assert_eq!(index, 9),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read(&path).unwrap(), before);

    // Explicit targets in other formats are not created either
    for (name, format) in [("out.csv", OutputFormat::Csv), ("out.db", OutputFormat::Sqlite)] {
        let target = dir.path().join(name);
        let options = RunOptions {
            output: Some(target.clone()),
            format,
            ..RunOptions::new(&path)
        };
        assert!(run(&options, &CanonParams::default()).is_err());
        assert!(!target.exists());
    }
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flashcards.json");
    write_deck(&path, &sample_deck());
    let before = fs::read(&path).unwrap();

    let csv_target = dir.path().join("out.csv");
    let targets = [
        (None, OutputFormat::Json),
        (Some(csv_target.clone()), OutputFormat::Csv),
    ];
    for (output, format) in targets {
        let options = RunOptions {
            output,
            format,
            dry_run: true,
            ..RunOptions::new(&path)
        };
        let outcome = run(&options, &CanonParams::default()).unwrap();
        assert!(outcome.written.is_none());
        assert_eq!(outcome.summary.output_count, sample_deck().len());
    }

    assert_eq!(fs::read(&path).unwrap(), before);
    assert!(!csv_target.exists());
}

#[test]
fn test_run_replaces_input_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flashcards.json");
    write_deck(&path, &sample_deck());

    let outcome = run(&RunOptions::new(&path), &CanonParams::default()).unwrap();
    assert_eq!(outcome.written.as_deref(), Some(path.as_path()));
    assert_eq!(outcome.summary.unique_ids, sample_deck().len());

    let text = fs::read_to_string(&path).unwrap();
    let parsed: Vec<CanonicalRecord> = serde_json::from_str(&text).unwrap();
    let expected = canonicalize(&sample_deck(), &CanonParams::default(), false).unwrap();
    assert_eq!(parsed, expected.records);
}

#[test]
fn test_custom_lexicon_file() {
    let dir = tempfile::tempdir().unwrap();
    let lexicon_path = dir.path().join("lexicon.json");
    fs::write(&lexicon_path, r#"["كِتَاب"]"#).unwrap();

    let params = CanonParams {
        grammar_terms: load_lexicon(&lexicon_path).unwrap(),
        ..Default::default()
    };
    let result = canonicalize(&sample_deck(), &params, false).unwrap();

    // With the replaced lexicon, "book" is a term and "noun" is not
    assert_eq!(result.records[1].item_type, ItemType::Term);
    assert_eq!(result.records[3].item_type, ItemType::Vocab);
}

#[test]
fn test_sqlite_export() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("flashcards.db");

    let result = canonicalize(&sample_deck(), &CanonParams::default(), false).unwrap();
    let written = write_records_sqlite(&result.records, &db_path).unwrap();
    assert_eq!(written, result.records.len());

    // Exporting twice replaces the table instead of appending
    write_records_sqlite(&result.records, &db_path).unwrap();

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count as usize, result.records.len());

    let (id, segment, order): (String, String, u32) = conn
        .query_row(
            "SELECT id, segment_id, intro_order FROM cards WHERE position = 0",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(id, result.records[0].id);
    assert_eq!(segment, "FSTU1-U01-S00-P01");
    assert_eq!(order, 1);
}
