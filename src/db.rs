//! Deck storage: loading raw cards (JSON, XLSX) and SQLite export.

use crate::classify::GrammarLexicon;
use crate::diacritics::strip_diacritics;
use crate::models::{CanonicalRecord, CardType, RawRecord};
use calamine::{open_workbook, Reader, Xlsx};
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Excel XLSX error: {0}")]
    ExcelXlsx(#[from] calamine::XlsxError),
    #[error("Workbook has no worksheets")]
    EmptyWorkbook,
    #[error("Missing column in header row: {0}")]
    MissingColumn(&'static str),
    #[error("Row {row}: invalid card type {value:?}")]
    InvalidCardType { row: usize, value: String },
}

/// Load raw cards, choosing the reader by file extension.
///
/// `.xlsx`/`.xlsm` go through the spreadsheet reader, anything else is
/// treated as a JSON array.
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>, DbError> {
    let is_workbook = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "xlsx" | "xlsm"))
        .unwrap_or(false);

    if is_workbook {
        load_records_xlsx(path)
    } else {
        load_records_json(path)
    }
}

/// Load raw cards from a JSON array.
///
/// Extra fields are ignored, so an already canonicalized file loads fine.
pub fn load_records_json(path: &Path) -> Result<Vec<RawRecord>, DbError> {
    let raw = fs::read_to_string(path)?;
    parse_records_json(&raw)
}

/// Parse raw cards from JSON text.
pub fn parse_records_json(json: &str) -> Result<Vec<RawRecord>, DbError> {
    Ok(serde_json::from_str(json)?)
}

/// Load raw cards from the first worksheet of an Excel workbook.
///
/// The header row must name `section`, `part`, `type`, `english` and
/// `arabic` (any order, any case). Rows with neither English nor Arabic
/// are skipped as blank.
pub fn load_records_xlsx(path: &Path) -> Result<Vec<RawRecord>, DbError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(DbError::EmptyWorkbook)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let header = match rows.next() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };
    let cols = find_column_indices(header)?;

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        let english = get_string_cell(row, cols.english).unwrap_or_default();
        let arabic = get_string_cell(row, cols.arabic).unwrap_or_default();
        if english.trim().is_empty() && arabic.trim().is_empty() {
            continue;
        }

        // Spreadsheet rows are 1-based and the header takes row 1
        let row_number = i + 2;
        let type_value = get_string_cell(row, cols.card_type).unwrap_or_default();
        let card_type: CardType = type_value.parse().map_err(|_| DbError::InvalidCardType {
            row: row_number,
            value: type_value.clone(),
        })?;

        records.push(RawRecord {
            section: get_string_cell(row, cols.section).unwrap_or_default(),
            part: get_string_cell(row, cols.part).unwrap_or_default(),
            card_type,
            english,
            arabic,
        });
    }

    Ok(records)
}

/// Column indices for the deck worksheet
#[derive(Debug, PartialEq, Eq)]
struct ColumnIndices {
    section: usize,
    part: usize,
    card_type: usize,
    english: usize,
    arabic: usize,
}

fn find_column_indices(header: &[calamine::Data]) -> Result<ColumnIndices, DbError> {
    let mut section = None;
    let mut part = None;
    let mut card_type = None;
    let mut english = None;
    let mut arabic = None;

    for (i, cell) in header.iter().enumerate() {
        if let calamine::Data::String(s) = cell {
            match s.trim().to_lowercase().as_str() {
                "section" => section = Some(i),
                "part" => part = Some(i),
                "type" => card_type = Some(i),
                "english" => english = Some(i),
                "arabic" => arabic = Some(i),
                _ => {}
            }
        }
    }

    Ok(ColumnIndices {
        section: section.ok_or(DbError::MissingColumn("section"))?,
        part: part.ok_or(DbError::MissingColumn("part"))?,
        card_type: card_type.ok_or(DbError::MissingColumn("type"))?,
        english: english.ok_or(DbError::MissingColumn("english"))?,
        arabic: arabic.ok_or(DbError::MissingColumn("arabic"))?,
    })
}

fn get_string_cell(row: &[calamine::Data], col: usize) -> Option<String> {
    row.get(col).and_then(|cell| match cell {
        calamine::Data::String(s) => Some(s.clone()),
        calamine::Data::Int(n) => Some(n.to_string()),
        calamine::Data::Float(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Load a grammar lexicon from a JSON array of words.
///
/// Entries are stripped of diacritics, since matching runs on bare text.
pub fn load_lexicon(path: &Path) -> Result<GrammarLexicon, DbError> {
    let raw = fs::read_to_string(path)?;
    let words: Vec<String> = serde_json::from_str(&raw)?;
    Ok(GrammarLexicon::from_terms(
        words
            .iter()
            .map(|w| strip_diacritics(w.trim()))
            .filter(|w| !w.is_empty()),
    ))
}

/// Write canonical cards to a `cards` table, replacing any previous one.
///
/// Runs in a single transaction, so a failure leaves the database as it was.
/// Returns the number of rows written.
pub fn write_records_sqlite(records: &[CanonicalRecord], db_path: &Path) -> Result<usize, DbError> {
    let mut conn = Connection::open(db_path)?;
    let tx = conn.transaction()?;

    tx.execute_batch(
        "DROP TABLE IF EXISTS cards;
         CREATE TABLE cards (
             id TEXT PRIMARY KEY,
             position INTEGER NOT NULL,
             section TEXT NOT NULL,
             part TEXT NOT NULL,
             type TEXT NOT NULL,
             english TEXT NOT NULL,
             arabic TEXT NOT NULL,
             book TEXT NOT NULL,
             item_type TEXT NOT NULL,
             segment_id TEXT NOT NULL,
             intro_order INTEGER NOT NULL,
             arabic_diacritics TEXT NOT NULL,
             arabic_bare TEXT NOT NULL,
             clusters TEXT NOT NULL,
             pos_primary TEXT,
             notes_short TEXT,
             answer_variants TEXT NOT NULL,
             status TEXT NOT NULL
         );
         CREATE INDEX idx_cards_segment ON cards (segment_id, intro_order);",
    )?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO cards (
                 id, position, section, part, type, english, arabic, book, item_type,
                 segment_id, intro_order, arabic_diacritics, arabic_bare, clusters,
                 pos_primary, notes_short, answer_variants, status
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        )?;

        for (position, record) in records.iter().enumerate() {
            stmt.execute(params![
                record.id,
                position as i64,
                record.raw.section,
                record.raw.part,
                record.raw.card_type.as_str(),
                record.raw.english,
                record.raw.arabic,
                record.book,
                record.item_type.as_str(),
                record.segment_id,
                record.intro_order,
                record.arabic_diacritics,
                record.arabic_bare,
                serde_json::to_string(&record.clusters)?,
                record.pos_primary,
                record.notes_short,
                serde_json::to_string(&record.answer_variants)?,
                record.status,
            ])?;
        }
    }

    tx.commit()?;
    Ok(records.len())
}
