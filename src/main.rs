//! FSTU flashcard canonicalization tool
//!
//! Reads the flashcard deck, derives stable identifiers, segment IDs and
//! bare Arabic forms, and writes the canonical deck back.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod canon;
mod classify;
mod db;
mod deck;
mod diacritics;
mod ids;
mod models;
mod output;
mod pipeline;
mod segment;
mod translit;

use canon::CanonError;
use db::{load_lexicon, load_records};
use deck::{available_parts, build_section_tree, deck_stats, filter_cards, shuffle_cards};
use diacritics::strip_diacritics;
use models::{CanonParams, CardFilter, CardType, RawRecord};
use output::{print_stats, print_tree, OutputFormat};
use pipeline::{run, RunOptions};
use translit::transliterate;

#[derive(Parser)]
#[command(name = "fstu-canon")]
#[command(about = "Canonicalize Arabic vocabulary flashcard decks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Canonicalize a deck and write it back
    ///
    /// By default the JSON input file is replaced in place. Nothing is
    /// written if any section label fails to parse or any ID is duplicated.
    Canonicalize {
        /// Path to the deck (.json, or .xlsx with a header row)
        #[arg(long)]
        input: PathBuf,

        /// Output path [default: the input for JSON, input with .csv/.db otherwise]
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Collection tag [default: FSTU1]
        #[arg(long)]
        book: Option<String>,

        /// Leading identifier component [default: fstu1]
        #[arg(long)]
        id_namespace: Option<String>,

        /// Initial status for every card [default: active]
        #[arg(long)]
        status: Option<String>,

        /// JSON array of bare grammar-term words replacing the built-in lexicon
        #[arg(long)]
        lexicon: Option<PathBuf>,

        /// Validate without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,

        /// Print first N canonical records to console
        #[arg(long)]
        show_records: Option<usize>,
    },

    /// Show the bare form and slug of Arabic text
    Translit {
        /// Arabic text, one slug per argument
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Show the section and part structure of a deck
    Tree {
        /// Path to the deck
        #[arg(long)]
        input: PathBuf,
    },

    /// List cards matching a filter, in deck order or shuffled
    Cards {
        /// Path to the deck
        #[arg(long)]
        input: PathBuf,

        /// Only cards from this section
        #[arg(long)]
        section: Option<String>,

        /// Only cards from this part
        #[arg(long)]
        part: Option<String>,

        /// Only cards of this type (grammar or vocab)
        #[arg(long = "type")]
        card_type: Option<CardType>,

        /// Shuffle the selected cards
        #[arg(long)]
        shuffle: bool,
    },

    /// Show deck statistics
    Stats {
        /// Path to the deck
        #[arg(long)]
        input: PathBuf,
    },

    /// Benchmark canonicalization on a synthetic deck
    Benchmark {
        /// Number of canonicalization runs
        #[arg(long, default_value = "100")]
        iterations: usize,

        /// Number of cards in the synthetic deck
        #[arg(long, default_value = "3000")]
        size: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Canonicalize {
            input,
            output,
            format,
            book,
            id_namespace,
            status,
            lexicon,
            dry_run,
            quiet,
            show_records,
        } => {
            let defaults = CanonParams::default();

            let grammar_terms = match lexicon {
                Some(path) => {
                    let lexicon = load_lexicon(&path)?;
                    if !quiet {
                        eprintln!("Loaded {} grammar terms from {}", lexicon.len(), path.display());
                    }
                    lexicon
                }
                None => defaults.grammar_terms,
            };

            let params = CanonParams {
                book: book.unwrap_or(defaults.book),
                id_namespace: id_namespace.unwrap_or(defaults.id_namespace),
                status: status.unwrap_or(defaults.status),
                grammar_terms,
            };

            let options = RunOptions {
                input,
                output,
                format,
                dry_run,
                show_progress: !quiet,
                show_records,
            };

            if let Some(path) = run(&options, &params)?.written {
                println!("Written to {}", path.display());
            }
        }

        Commands::Translit { text } => {
            for arabic in &text {
                let slug = transliterate(arabic);
                println!(
                    "{}\t{}\t{}",
                    arabic,
                    strip_diacritics(arabic),
                    if slug.is_empty() { "-" } else { slug.as_str() }
                );
            }
        }

        Commands::Tree { input } => {
            let records = load_records(&input)?;
            print_tree(&build_section_tree(&records));
        }

        Commands::Cards {
            input,
            section,
            part,
            card_type,
            shuffle,
        } => {
            let records = load_records(&input)?;
            let filter = CardFilter {
                section,
                part,
                card_type,
            };
            let selected: Vec<RawRecord> =
                filter_cards(&records, &filter).into_iter().cloned().collect();
            let selected = if shuffle { shuffle_cards(&selected) } else { selected };

            for card in &selected {
                println!("{}\t{}\t{}\t{}", card.part, card.card_type, card.english, card.arabic);
            }
            if selected.is_empty() {
                let parts = available_parts(&records, filter.section.as_deref());
                eprintln!("No matching cards. Available parts: {}", parts.join(", "));
            }
        }

        Commands::Stats { input } => {
            let records = load_records(&input)?;
            print_stats(&deck_stats(&records));
        }

        Commands::Benchmark { iterations, size } => {
            run_benchmark(iterations, size)?;
        }
    }

    Ok(())
}

/// Build a deck of `size` cards spread over units, sections and parts.
fn synthetic_deck(size: usize) -> Vec<RawRecord> {
    const WORDS: &[(&str, &str)] = &[
        ("book", "كِتَاب"),
        ("pen", "قَلَم"),
        ("house", "بَيْت"),
        ("instructor", "مُدَرِّس"),
        ("noun", "اِسْم"),
        ("verb", "فِعْل"),
        ("light", "نُور"),
        ("question", "سُؤَال"),
    ];

    (0..size)
        .map(|i| {
            let (english, arabic) = WORDS[i % WORDS.len()];
            RawRecord {
                section: format!("Unit {} Section {}", i / 200 + 1, (i / 50) % 4 + 1),
                part: format!("Part {}", (i / 10) % 5 + 1),
                card_type: if i % 7 == 0 { CardType::Grammar } else { CardType::Vocab },
                english: english.to_string(),
                arabic: arabic.to_string(),
            }
        })
        .collect()
}

/// Run canonicalization benchmark to measure performance.
fn run_benchmark(iterations: usize, size: usize) -> Result<(), CanonError> {
    use std::time::Instant;

    println!("=== Canonicalization Benchmark ===");
    println!("Iterations: {}", iterations);
    println!("Deck size: {}", size);

    let params = CanonParams::default();
    let deck = synthetic_deck(size);

    let start = Instant::now();
    for _ in 0..iterations {
        canon::canonicalize(&deck, &params, false)?;
    }
    let elapsed = start.elapsed();
    let per_run = elapsed.as_secs_f64() / iterations.max(1) as f64;
    println!("  Total time: {:.3}s", elapsed.as_secs_f64());
    println!("  Per run: {:.3}ms", per_run * 1000.0);
    println!("  Cards/sec: {:.0}", size as f64 / per_run.max(f64::EPSILON));

    Ok(())
}
