//! Grid filling: backtracking assignment of dictionary words to layout slots
//! under the phrase's shared letter budget.
//!
//! The search is most-constrained-first with symmetry breaking inside slot
//! equivalence classes; the only bounds are a unique-solution cap and a
//! wall-clock deadline. No arc consistency or other global pruning.

mod candidates;
mod classes;
mod search;

pub use candidates::{order_slots, prefilter_candidates};
pub use classes::equivalence_classes;
pub use search::{FillConfig, FillEvent, FillOutcome, Solution};

use tracing::debug;

use crate::dictionary::Dictionary;
use crate::layout::Layout;
use crate::phrase::LetterBudget;

/// Facade over prefiltering and search. All state is per-call; nothing is
/// shared between layouts.
pub struct Filler {
    config: FillConfig,
}

impl Default for Filler {
    fn default() -> Self {
        Self::new(FillConfig::default())
    }
}

impl Filler {
    pub fn new(config: FillConfig) -> Self {
        Self { config }
    }

    /// Fill one layout, discarding progress events.
    pub fn fill(&self, layout: &Layout, dictionary: &Dictionary, letters: &str) -> FillOutcome {
        self.fill_with_events(layout, dictionary, letters, &mut |_| {})
    }

    /// Fill one layout, reporting heartbeats and found solutions through
    /// `on_event`. Events fire only between placement steps.
    pub fn fill_with_events(
        &self,
        layout: &Layout,
        dictionary: &Dictionary,
        letters: &str,
        on_event: &mut dyn FnMut(&FillEvent),
    ) -> FillOutcome {
        let budget = LetterBudget::from_letters(letters);
        let pools = prefilter_candidates(layout, dictionary, &budget);
        if pools.iter().any(Vec::is_empty) {
            debug!(grid = %layout.grid_id(), "slot with empty candidate pool, skipping layout");
            return FillOutcome::skipped();
        }
        search::run(layout, &pools, budget, &self.config, on_event)
    }
}
