//! End-to-end scenarios: enumerate, rank, fill, and check the solution
//! contracts that hold for every emitted solution.

use std::collections::HashMap;
use std::time::Duration;

use phrasegrid_core::{
    enumerate_layouts, normalize_phrase, rank_layouts, Dictionary, EnumeratorConfig, FillConfig,
    Filler, Layout, Slot, Solution,
};

/// Rebuild the physical grid from a solution, asserting crossing agreement,
/// and return the letter each filled cell holds.
fn grid_letters(layout: &Layout, solution: &Solution) -> HashMap<(usize, usize), u8> {
    let mut letters = HashMap::new();
    for (id, slot) in layout.slots.iter().enumerate() {
        let word = solution.word(id).as_bytes();
        assert_eq!(word.len(), slot.length);
        for (pos, cell) in slot.cells().enumerate() {
            let previous = letters.insert((cell.row, cell.col), word[pos]);
            if let Some(previous) = previous {
                assert_eq!(
                    previous, word[pos],
                    "crossing letters disagree at ({},{})",
                    cell.row, cell.col
                );
            }
        }
    }
    letters
}

fn letter_counts(letters: impl Iterator<Item = u8>) -> [usize; 26] {
    let mut counts = [0usize; 26];
    for b in letters {
        counts[(b - b'A') as usize] += 1;
    }
    counts
}

#[test]
fn full_pipeline_solves_a_known_grid() {
    let phrase = "gameful rid oss ern ava";
    let letters = normalize_phrase(phrase);
    assert_eq!(letters.len(), 19);

    let dictionary = Dictionary::from_words(["GAMEFUL", "GRID", "MOSS", "FERN", "LAVA"]);
    let layouts: Vec<Layout> = enumerate_layouts(EnumeratorConfig::new(5))
        .into_iter()
        .filter(|l| l.filled_count() == letters.len())
        .collect();
    assert!(!layouts.is_empty());
    let ranked = rank_layouts(layouts, 0);

    let filler = Filler::new(FillConfig {
        max_solutions: 3,
        time_limit: Some(Duration::from_secs(2)),
        ..FillConfig::default()
    });

    let phrase_counts = letter_counts(letters.bytes());
    let mut total_solutions = 0;
    for layout in &ranked {
        let outcome = filler.fill(layout, &dictionary, &letters);
        for solution in &outcome.solutions {
            total_solutions += 1;
            let grid = grid_letters(layout, solution);
            // Every filled cell holds exactly one letter and the cell
            // multiset equals the phrase multiset, counted once per cell.
            assert_eq!(grid.len(), layout.filled_count());
            assert_eq!(letter_counts(grid.values().copied()), phrase_counts);
        }
    }
    assert!(total_solutions >= 1, "expected at least one solved grid");
}

#[test]
fn single_crossing_scenario_yields_exactly_one_solution() {
    // One across and one down slot crossing at the shared letter 'B'.
    let layout = Layout::from_slots(4, 4, vec![Slot::across(0, 0, 4), Slot::down(0, 1, 4)]);
    let dictionary = Dictionary::from_words(["ABLE", "BOLE"]);
    let letters = normalize_phrase("ole bale");

    let outcome = Filler::default().fill(&layout, &dictionary, &letters);
    assert_eq!(outcome.solutions.len(), 1);
    let solution = &outcome.solutions[0];
    // ABLE across and BOLE down is the only pairing whose crossing letters
    // agree; the grid consumes every phrase letter with no remainder.
    assert_eq!(solution.word(0), "ABLE");
    assert_eq!(solution.word(1), "BOLE");
    let grid = grid_letters(&layout, solution);
    assert_eq!(letter_counts(grid.values().copied()), letter_counts(letters.bytes()));
}

#[test]
fn infeasible_budget_terminates_with_zero_solutions() {
    // Both slots have a non-empty pool, but every candidate reuses the one
    // 'B' at mismatched crossing positions, so no combination closes the
    // budget. The search must end cleanly, not hang or error.
    let layout = Layout::from_slots(4, 4, vec![Slot::across(0, 0, 4), Slot::down(0, 1, 4)]);
    let dictionary = Dictionary::from_words(["ABLE"]);
    let outcome = Filler::default().fill(&layout, &dictionary, "ABLEABL");
    assert!(!outcome.skipped);
    assert!(outcome.solutions.is_empty());
    assert!(!outcome.deadline_hit);
}

#[test]
fn near_zero_deadline_returns_control_promptly() {
    let layout = Layout::from_slots(4, 4, vec![Slot::across(0, 0, 4), Slot::down(0, 1, 4)]);
    let dictionary = Dictionary::from_words(["ABLE", "BOLE"]);
    let config = FillConfig {
        time_limit: Some(Duration::from_nanos(1)),
        ..FillConfig::default()
    };
    let started = std::time::Instant::now();
    let outcome = Filler::new(config).fill(&layout, &dictionary, "BALEOLE");
    // Bounded overrun: at most in-flight work, far below a second here.
    assert!(started.elapsed() < Duration::from_secs(1));
    for solution in &outcome.solutions {
        let grid = grid_letters(&layout, solution);
        assert_eq!(grid.len(), layout.filled_count());
    }
}

#[test]
fn identical_seeds_reproduce_the_layout_order() {
    let layouts = enumerate_layouts(EnumeratorConfig::new(6));
    let order_a: Vec<String> = rank_layouts(layouts.clone(), 99)
        .iter()
        .map(Layout::grid_id)
        .collect();
    let order_b: Vec<String> = rank_layouts(layouts, 99)
        .iter()
        .map(Layout::grid_id)
        .collect();
    assert_eq!(order_a, order_b);
}
