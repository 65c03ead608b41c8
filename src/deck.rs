//! Deck structure utilities.
//!
//! Groups, filters and summarizes cards the way the study screens browse
//! them: by section, then by part, always in the order the deck introduces
//! them.

use crate::models::{CardFilter, CardType, DeckStats, PartNode, RawRecord, SectionNode};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Group cards into sections and parts, keeping first-appearance order.
pub fn build_section_tree<'a, I>(records: I) -> Vec<SectionNode>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut tree: Vec<SectionNode> = Vec::new();
    let mut section_index: HashMap<&'a str, usize> = HashMap::new();
    // (section position, part label) -> part position
    let mut part_index: HashMap<(usize, &'a str), usize> = HashMap::new();

    for record in records {
        let s = *section_index.entry(record.section.as_str()).or_insert_with(|| {
            tree.push(SectionNode {
                name: record.section.clone(),
                parts: Vec::new(),
            });
            tree.len() - 1
        });

        let section = &mut tree[s];
        let p = *part_index
            .entry((s, record.part.as_str()))
            .or_insert_with(|| {
                section.parts.push(PartNode {
                    name: record.part.clone(),
                    cards: Vec::new(),
                    grammar_count: 0,
                    vocab_count: 0,
                });
                section.parts.len() - 1
            });

        let part = &mut section.parts[p];
        match record.card_type {
            CardType::Grammar => part.grammar_count += 1,
            CardType::Vocab => part.vocab_count += 1,
        }
        part.cards.push(record.clone());
    }

    tree
}

/// Whether a card satisfies every criterion set on the filter
pub fn card_matches(record: &RawRecord, filter: &CardFilter) -> bool {
    filter.section.as_deref().map_or(true, |s| record.section == s)
        && filter.part.as_deref().map_or(true, |p| record.part == p)
        && filter.card_type.map_or(true, |t| record.card_type == t)
}

/// Cards matching the filter, in deck order.
pub fn filter_cards<'a>(records: &'a [RawRecord], filter: &CardFilter) -> Vec<&'a RawRecord> {
    records.iter().filter(|r| card_matches(r, filter)).collect()
}

/// Sorted, distinct part labels, optionally limited to one section.
pub fn available_parts(records: &[RawRecord], section: Option<&str>) -> Vec<String> {
    records
        .iter()
        .filter(|r| section.map_or(true, |s| r.section == s))
        .map(|r| r.part.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Totals by type plus the number of sections and (section, part) groups.
pub fn deck_stats(records: &[RawRecord]) -> DeckStats {
    let mut sections = HashSet::new();
    let mut parts = HashSet::new();
    let mut stats = DeckStats {
        total_cards: records.len(),
        ..Default::default()
    };

    for record in records {
        match record.card_type {
            CardType::Grammar => stats.grammar_cards += 1,
            CardType::Vocab => stats.vocab_cards += 1,
        }
        sections.insert(record.section.as_str());
        parts.insert((record.section.as_str(), record.part.as_str()));
    }

    stats.sections = sections.len();
    stats.parts = parts.len();
    stats
}

/// A shuffled copy of the cards; the input is left as it is.
pub fn shuffle_cards(records: &[RawRecord]) -> Vec<RawRecord> {
    shuffle_cards_with(records, &mut rand::thread_rng())
}

/// Same as [`shuffle_cards`] with a caller-supplied generator.
pub fn shuffle_cards_with<R: Rng + ?Sized>(records: &[RawRecord], rng: &mut R) -> Vec<RawRecord> {
    let mut shuffled = records.to_vec();
    shuffled.shuffle(rng);
    shuffled
}
