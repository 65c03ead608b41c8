//! Segment identifiers: where a card sits in the book.
//!
//! A segment ID looks like `FSTU1-U03-S02-P01`. The unit and section come
//! from the human-readable section label ("Unit 3 Section 2"); the part
//! number is assigned by the order in which each part label first appears
//! inside its section.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

lazy_static! {
    static ref SECTION_LABEL: Regex =
        Regex::new(r"(?i)unit\s+([0-9]+)(?:\s+section\s+([0-9]+))?").unwrap();
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentError {
    #[error("Cannot parse section: {0:?}")]
    UnparsableSection(String),
    #[error("Unit or section number out of range in {0:?}")]
    NumberOutOfRange(String),
}

/// Unit and section numbers parsed from a section label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionNumber {
    pub unit: u32,
    pub section: u32, // 0 when the label has no "Section" clause
}

/// Parse "Unit N" or "Unit N Section M".
pub fn parse_section(label: &str) -> Result<SectionNumber, SegmentError> {
    let caps = SECTION_LABEL
        .captures(label)
        .ok_or_else(|| SegmentError::UnparsableSection(label.to_string()))?;

    let parse_num = |s: &str| {
        s.parse::<u32>()
            .map_err(|_| SegmentError::NumberOutOfRange(label.to_string()))
    };

    let unit = parse_num(&caps[1])?;
    let section = match caps.get(2) {
        Some(m) => parse_num(m.as_str())?,
        None => 0,
    };

    Ok(SectionNumber { unit, section })
}

/// Render `<BOOK>-U<unit>-S<section>-P<part>` with two-digit padding.
pub fn format_segment_id(book: &str, number: SectionNumber, part: u32) -> String {
    format!(
        "{}-U{:02}-S{:02}-P{:02}",
        book, number.unit, number.section, part
    )
}

/// Per-section part numbering in first-appearance order.
#[derive(Debug, Default)]
pub struct PartTable {
    sections: HashMap<String, HashMap<String, u32>>,
    section_order: Vec<String>,
}

impl PartTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a (section, part) pair, returning its part number.
    ///
    /// The first unseen part of a section gets 1, the next one 2, and so on.
    /// Registering a known pair again returns the existing number.
    pub fn register(&mut self, section: &str, part: &str) -> u32 {
        if !self.sections.contains_key(section) {
            self.section_order.push(section.to_string());
        }
        let parts = self.sections.entry(section.to_string()).or_default();
        let next = parts.len() as u32 + 1;
        *parts.entry(part.to_string()).or_insert(next)
    }

    pub fn part_number(&self, section: &str, part: &str) -> Option<u32> {
        self.sections.get(section)?.get(part).copied()
    }

    pub fn section_count(&self) -> usize {
        self.section_order.len()
    }

    pub fn part_count(&self, section: &str) -> usize {
        self.sections.get(section).map_or(0, |p| p.len())
    }

    /// Section labels in first-appearance order
    pub fn sections(&self) -> &[String] {
        &self.section_order
    }
}

/// Running 1-based counter per (section, part) group.
#[derive(Debug, Default)]
pub struct IntroOrderCounter {
    counts: HashMap<(String, String), u32>,
}

impl IntroOrderCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next intro order for the group.
    pub fn next(&mut self, section: &str, part: &str) -> u32 {
        let count = self
            .counts
            .entry((section.to_string(), part.to_string()))
            .or_insert(0);
        *count += 1;
        *count
    }
}
