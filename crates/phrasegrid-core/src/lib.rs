//! phrasegrid-core: symmetric letter-grid generation.
//!
//! Given a phrase (a fixed letter multiset) and a word dictionary, this crate
//! enumerates geometrically valid symmetric layouts of intersecting across
//! and down slots, ranks them by crossing density, and fills them with words
//! that exactly exhaust the phrase's letters.
//!
//! Pipeline: phrase → normalized letters; dictionary → length buckets;
//! family → enumerated layouts → exact-letter-count filter → seeded ranking
//! → per layout: prefilter → backtracking search → unique solutions → report.

pub mod dictionary;
pub mod enumerate;
mod error;
pub mod layout;
pub mod phrase;
pub mod rank;
pub mod report;
pub mod solver;

pub use dictionary::{load_dictionary, Dictionary, LoadSummary};
pub use enumerate::{enumerate_layouts, EnumeratorConfig, LayoutEnumerator};
pub use error::Error;
pub use layout::{Cell, Crossing, Direction, GridMask, Layout, Slot, SlotId};
pub use phrase::{normalize_phrase, LetterBudget};
pub use rank::rank_layouts;
pub use report::{parse_puzzle_block, PuzzleBlock, ReportWriter, RunTotals};
pub use solver::{FillConfig, FillEvent, FillOutcome, Filler, Solution};
