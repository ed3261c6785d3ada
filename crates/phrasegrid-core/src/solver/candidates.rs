//! Candidate prefiltering and slot visit ordering.

use crate::dictionary::Dictionary;
use crate::layout::{Layout, SlotId};
use crate::phrase::LetterBudget;

/// Per-slot candidate pools: words of matching length whose own letter
/// counts each fit the phrase budget. Necessary, not sufficient — all slots
/// draw on one shared budget.
pub fn prefilter_candidates<'d>(
    layout: &Layout,
    dictionary: &'d Dictionary,
    budget: &LetterBudget,
) -> Vec<Vec<&'d str>> {
    layout
        .slots
        .iter()
        .map(|slot| {
            dictionary
                .words_of_len(slot.length)
                .iter()
                .filter(|word| budget.fits_word(word))
                .map(String::as_str)
                .collect()
        })
        .collect()
}

/// Visit order for the search: smallest candidate pool first, then highest
/// crossing degree, then shortest slot. Most-constrained-first shrinks the
/// tree; the crossing preference keeps consecutive slots connected.
pub fn order_slots(layout: &Layout, pools: &[Vec<&str>]) -> Vec<SlotId> {
    let mut order: Vec<SlotId> = (0..layout.slots.len()).collect();
    order.sort_by_key(|&id| {
        (
            pools[id].len(),
            std::cmp::Reverse(layout.crossing_degree(id)),
            layout.slots[id].length,
        )
    });
    order
}
