//! Output formatting for canonical decks (JSON, CSV, console reports).

use clap::ValueEnum;
use crate::models::{CanonSummary, CanonicalRecord, DeckStats, DuplicateId, SectionNode};
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Output format for the canonical deck
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON array, same shape as the input plus canonical fields
    Json,
    /// CSV file
    Csv,
    /// SQLite database with a `cards` table
    Sqlite,
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not replace output file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Write canonical records as a pretty-printed JSON array with a trailing newline.
pub fn write_json<W: Write>(records: &[CanonicalRecord], writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(records)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Write canonical records as JSON, replacing `path` atomically.
///
/// The data goes to a temporary file next to `path` first and is renamed
/// over it only once fully written, so readers never see a partial file.
pub fn write_json_file(records: &[CanonicalRecord], path: &Path) -> Result<(), OutputError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    write_json(records, &mut tmp)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

/// Quote a CSV field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write canonical records as CSV.
pub fn write_csv<W: Write>(records: &[CanonicalRecord], writer: &mut W) -> Result<(), OutputError> {
    writeln!(
        writer,
        "id,section,part,type,english,arabic,book,itemType,segmentId,introOrder,\
         arabicDiacritics,arabicBare,status"
    )?;

    for record in records {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{},{},{}",
            csv_field(&record.id),
            csv_field(&record.raw.section),
            csv_field(&record.raw.part),
            record.raw.card_type,
            csv_field(&record.raw.english),
            csv_field(&record.raw.arabic),
            csv_field(&record.book),
            record.item_type,
            csv_field(&record.segment_id),
            record.intro_order,
            csv_field(&record.arabic_diacritics),
            csv_field(&record.arabic_bare),
            csv_field(&record.status)
        )?;
    }

    Ok(())
}

/// Write canonical records as CSV to a file, replacing it atomically.
pub fn write_csv_file(records: &[CanonicalRecord], path: &Path) -> Result<(), OutputError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    write_csv(records, &mut tmp)?;
    tmp.persist(path)?;
    Ok(())
}

/// Print the run summary to stdout.
pub fn print_summary(summary: &CanonSummary) {
    println!("Input cards:  {}", summary.input_count);
    println!("Output cards: {}", summary.output_count);
    println!("Unique IDs:   {}", summary.unique_ids);
    println!();
    println!("  Sections:          {}", summary.section_count);
    println!("  Terms:             {}", summary.term_count);
    println!("  Vocab:             {}", summary.vocab_count);
    println!("  Promoted to term:  {}", summary.promoted_count);
    println!("  Fallback slugs:    {}", summary.fallback_slug_count);
}

/// Report duplicate identifiers to stderr.
pub fn print_duplicates(duplicates: &[DuplicateId]) {
    eprintln!("ERROR: Duplicate IDs found!");
    for dup in duplicates {
        eprintln!("  {} appears {} times", dup.id, dup.count);
    }
}

/// Format a canonical record as a one-line description.
pub fn format_record(record: &CanonicalRecord) -> String {
    format!(
        "{} [{}#{}] {} = {} ({})",
        record.id,
        record.segment_id,
        record.intro_order,
        record.raw.english,
        record.arabic_bare,
        record.item_type
    )
}

/// Print canonical records to stdout, optionally limited.
pub fn print_records(records: &[CanonicalRecord], limit: Option<usize>) {
    let limit = limit.unwrap_or(records.len());
    for record in records.iter().take(limit) {
        println!("{}", format_record(record));
    }
    if records.len() > limit {
        println!("... and {} more", records.len() - limit);
    }
}

/// Print the section → part tree with per-part counts.
pub fn print_tree(tree: &[SectionNode]) {
    for section in tree {
        println!("{} ({} cards)", section.name, section.card_count());
        for part in &section.parts {
            println!(
                "  {}: {} grammar, {} vocab",
                part.name, part.grammar_count, part.vocab_count
            );
        }
    }
}

/// Print deck statistics.
pub fn print_stats(stats: &DeckStats) {
    println!("=== Deck Statistics ===");
    println!("Total cards: {}", stats.total_cards);
    println!("Grammar cards: {}", stats.grammar_cards);
    println!("Vocab cards: {}", stats.vocab_cards);
    println!("Sections: {}", stats.sections);
    println!("Parts: {}", stats.parts);
}
