//! Canonicalization orchestration.
//!
//! Runs the whole deck through two passes:
//! 1. section labels are parsed and every (section, part) pair is numbered
//!    in order of first appearance;
//! 2. each card, in input order, gets its bare form, effective type, slug,
//!    identifier, segment ID and intro order.
//!
//! Identifier uniqueness is then checked over the complete output. Any
//! failure aborts the run before anything is written.

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::classify::{effective_item_type, GrammarLexicon};
use crate::diacritics::strip_diacritics;
use crate::ids::IdAllocator;
use crate::models::*;
use crate::segment::{
    format_segment_id, parse_section, IntroOrderCounter, PartTable, SectionNumber, SegmentError,
};
use crate::translit::transliterate;

#[derive(Error, Debug)]
pub enum CanonError {
    #[error("record {index}: {source}")]
    Section {
        index: usize,
        #[source]
        source: SegmentError,
    },
    #[error("duplicate IDs found: {}", format_duplicates(.duplicates))]
    DuplicateIds {
        duplicates: Vec<DuplicateId>,
        /// Counts of the rejected run, so they can still be reported
        summary: CanonSummary,
    },
}

fn format_duplicates(duplicates: &[DuplicateId]) -> String {
    duplicates
        .iter()
        .map(|d| format!("{} x{}", d.id, d.count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where a record lands in the book, resolved during pass 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub number: SectionNumber,
    pub part: u32,
}

/// Output of pass 1: the completed part table and one placement per record
#[derive(Debug)]
pub struct SegmentPlan {
    pub parts: PartTable,
    pub placements: Vec<Placement>,
}

/// Pass 1: parse every section label and number every part.
///
/// Stops at the first label that cannot be parsed.
pub fn plan_segments(records: &[RawRecord]) -> Result<SegmentPlan, CanonError> {
    let mut parts = PartTable::new();
    let mut numbers: HashMap<&str, SectionNumber> = HashMap::new();
    let mut placements = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let number = match numbers.get(record.section.as_str()).copied() {
            Some(number) => number,
            None => {
                let number = parse_section(&record.section)
                    .map_err(|source| CanonError::Section { index, source })?;
                numbers.insert(record.section.as_str(), number);
                number
            }
        };
        let part = parts.register(&record.section, &record.part);
        placements.push(Placement { number, part });
    }

    Ok(SegmentPlan { parts, placements })
}

/// Order-independent, per-record derived values
#[derive(Debug, Clone)]
struct Derived {
    arabic_bare: String,
    item_type: ItemType,
    slug: String,
}

fn derive(record: &RawRecord, lexicon: &GrammarLexicon) -> Derived {
    let arabic_bare = strip_diacritics(&record.arabic);
    let item_type = effective_item_type(record.card_type, &arabic_bare, lexicon);
    let slug = transliterate(&record.arabic);
    Derived {
        arabic_bare,
        item_type,
        slug,
    }
}

/// Canonicalize a complete deck.
///
/// The output has the same length and order as `records`. Fails if a
/// section label cannot be parsed or if any identifier ends up duplicated.
pub fn canonicalize(
    records: &[RawRecord],
    params: &CanonParams,
    show_progress: bool,
) -> Result<CanonResult, CanonError> {
    if show_progress {
        eprintln!("Numbering sections and parts...");
    }
    let plan = plan_segments(records)?;

    if show_progress {
        eprintln!(
            "  {} sections, {} cards",
            plan.parts.section_count(),
            records.len()
        );
    }

    // Bare form, classification and slug depend on nothing but the record
    let derived: Vec<Derived> = records
        .par_iter()
        .map(|record| derive(record, &params.grammar_terms))
        .collect();

    let progress = if show_progress {
        let pb = ProgressBar::new(records.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    // Pass 2: everything that depends on input order
    let mut ids = IdAllocator::new();
    let mut intro = IntroOrderCounter::new();
    let mut summary = CanonSummary {
        input_count: records.len(),
        section_count: plan.parts.section_count(),
        ..Default::default()
    };
    let mut output = Vec::with_capacity(records.len());

    for ((record, derived), placement) in records.iter().zip(derived).zip(&plan.placements) {
        let Derived {
            arabic_bare,
            item_type,
            slug,
        } = derived;

        match item_type {
            ItemType::Term => summary.term_count += 1,
            ItemType::Vocab => summary.vocab_count += 1,
        }
        if record.card_type == CardType::Vocab && item_type == ItemType::Term {
            debug!("promoted to term: {} ({})", record.english, arabic_bare);
            summary.promoted_count += 1;
        }
        if slug.is_empty() {
            debug!("no transliteration for {:?}, using fallback slug", record.arabic);
            summary.fallback_slug_count += 1;
        }

        let id = ids.allocate(&params.id_prefix(item_type), &slug);
        let segment_id = format_segment_id(&params.book, placement.number, placement.part);
        let intro_order = intro.next(&record.section, &record.part);

        output.push(CanonicalRecord {
            raw: record.clone(),
            id,
            book: params.book.clone(),
            item_type,
            segment_id,
            intro_order,
            arabic_diacritics: record.arabic.clone(),
            arabic_bare,
            clusters: Vec::new(),
            pos_primary: None,
            notes_short: None,
            answer_variants: Vec::new(),
            status: params.status.clone(),
        });

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    summary.output_count = output.len();
    let summary = verify_unique_ids(&output, summary)?;

    Ok(CanonResult {
        records: output,
        summary,
    })
}

/// Fill in the unique-ID count and fail if any identifier repeats.
///
/// The error carries the completed summary.
pub fn verify_unique_ids(
    records: &[CanonicalRecord],
    mut summary: CanonSummary,
) -> Result<CanonSummary, CanonError> {
    summary.unique_ids = records
        .iter()
        .map(|r| r.id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let duplicates = find_duplicate_ids(records);
    if duplicates.is_empty() {
        Ok(summary)
    } else {
        Err(CanonError::DuplicateIds {
            duplicates,
            summary,
        })
    }
}

/// Every identifier occurring more than once, in order of first appearance.
pub fn find_duplicate_ids(records: &[CanonicalRecord]) -> Vec<DuplicateId> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for record in records {
        let count = counts.entry(record.id.as_str()).or_insert(0);
        if *count == 0 {
            order.push(record.id.as_str());
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter_map(|id| {
            let count = counts[id];
            (count > 1).then(|| DuplicateId {
                id: id.to_string(),
                count,
            })
        })
        .collect()
}
