//! The backtracking search itself: paired place/unplace over a shared letter
//! budget with per-cell reference counts, bounded by solution count and
//! wall-clock deadline.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::layout::{Cell, Layout, SlotId};
use crate::phrase::LetterBudget;

use super::candidates::order_slots;
use super::classes::equivalence_classes;

/// Search bounds for one layout.
#[derive(Debug, Clone)]
pub struct FillConfig {
    /// Stop after this many unique solutions.
    pub max_solutions: usize,
    /// Soft wall-clock cap; `None` means unbounded.
    pub time_limit: Option<Duration>,
    /// Interval between heartbeat events.
    pub heartbeat: Duration,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            max_solutions: 5,
            time_limit: Some(Duration::from_secs(5)),
            heartbeat: Duration::from_secs(1),
        }
    }
}

/// Progress signals emitted between placement steps.
#[derive(Debug, Clone)]
pub enum FillEvent {
    Heartbeat {
        found: usize,
        goal: usize,
        elapsed: Duration,
    },
    SolutionFound {
        index: usize,
        elapsed: Duration,
    },
}

/// A complete assignment: one word per slot, indexed by `SlotId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    words: Vec<String>,
}

impl Solution {
    pub fn word(&self, slot: SlotId) -> &str {
        &self.words[slot]
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

/// Result of filling one layout.
#[derive(Debug, Clone, Default)]
pub struct FillOutcome {
    pub solutions: Vec<Solution>,
    pub elapsed: Duration,
    /// The deadline cut the search short; solutions found remain valid.
    pub deadline_hit: bool,
    /// A slot had no candidates, so no search was attempted.
    pub skipped: bool,
}

impl FillOutcome {
    pub(super) fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

/// Run the search over prefiltered pools. Pools must be non-empty per slot.
pub(super) fn run(
    layout: &Layout,
    pools: &[Vec<&str>],
    budget: LetterBudget,
    config: &FillConfig,
    on_event: &mut dyn FnMut(&FillEvent),
) -> FillOutcome {
    let started = Instant::now();
    let (class_count, class_of) = equivalence_classes(layout);
    let crossings: Vec<Vec<(SlotId, usize, usize)>> = (0..layout.slots.len())
        .map(|id| layout.crossings_of(id))
        .collect();

    let mut search = Search {
        layout,
        pools,
        order: order_slots(layout, pools),
        class_of,
        class_count,
        crossings,
        budget,
        cell_letter: HashMap::new(),
        cell_usage: HashMap::new(),
        assigned: vec![None; layout.slots.len()],
        solutions: Vec::new(),
        seen_signatures: HashSet::new(),
        max_solutions: config.max_solutions,
        deadline: config.time_limit.map(|limit| started + limit),
        deadline_hit: false,
        started,
        heartbeat: config.heartbeat,
        last_heartbeat: started,
    };
    search.dfs(0, on_event);

    FillOutcome {
        solutions: search.solutions,
        elapsed: started.elapsed(),
        deadline_hit: search.deadline_hit,
        skipped: false,
    }
}

struct Search<'a, 'd> {
    layout: &'a Layout,
    pools: &'a [Vec<&'d str>],
    order: Vec<SlotId>,
    class_of: Vec<usize>,
    class_count: usize,
    /// Per slot: (other slot, position in self, position in other).
    crossings: Vec<Vec<(SlotId, usize, usize)>>,
    budget: LetterBudget,
    /// Letter currently claimed per cell.
    cell_letter: HashMap<Cell, u8>,
    /// How many placed slots touch each cell; the letter is released only
    /// when this returns to zero.
    cell_usage: HashMap<Cell, u32>,
    assigned: Vec<Option<&'d str>>,
    solutions: Vec<Solution>,
    seen_signatures: HashSet<Vec<Vec<&'d str>>>,
    max_solutions: usize,
    deadline: Option<Instant>,
    deadline_hit: bool,
    started: Instant,
    heartbeat: Duration,
    last_heartbeat: Instant,
}

impl<'a, 'd> Search<'a, 'd> {
    fn out_of_time(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline_hit = true;
                true
            }
            _ => false,
        }
    }

    fn bounded(&mut self) -> bool {
        self.solutions.len() >= self.max_solutions || self.out_of_time()
    }

    fn dfs(&mut self, idx: usize, on_event: &mut dyn FnMut(&FillEvent)) {
        if self.bounded() {
            return;
        }
        if idx == self.order.len() {
            self.accept_if_goal(on_event);
            return;
        }

        let slot = self.order[idx];
        for word_idx in 0..self.pools[slot].len() {
            let word = self.pools[slot][word_idx];
            if self.out_of_time() {
                return;
            }
            if !self.can_place(slot, word) {
                continue;
            }
            self.place(slot, word);
            self.dfs(idx + 1, on_event);
            self.unplace(slot, word);
            if self.bounded() {
                return;
            }
            self.maybe_heartbeat(on_event);
        }
    }

    /// Terminal check: every slot assigned, budget exhausted exactly,
    /// signature not seen before.
    fn accept_if_goal(&mut self, on_event: &mut dyn FnMut(&FillEvent)) {
        if !self.budget.is_exhausted() {
            return;
        }
        let signature = self.class_signature();
        if !self.seen_signatures.insert(signature) {
            return;
        }
        let words = self
            .assigned
            .iter()
            .map(|w| w.unwrap_or_default().to_owned())
            .collect();
        self.solutions.push(Solution { words });
        on_event(&FillEvent::SolutionFound {
            index: self.solutions.len(),
            elapsed: self.started.elapsed(),
        });
    }

    /// Canonical signature: per equivalence class, the sorted tuple of the
    /// words its members hold.
    fn class_signature(&self) -> Vec<Vec<&'d str>> {
        let mut signature = vec![Vec::new(); self.class_count];
        for (slot, word) in self.assigned.iter().enumerate() {
            if let Some(word) = word {
                signature[self.class_of[slot]].push(*word);
            }
        }
        for class in signature.iter_mut() {
            class.sort_unstable();
        }
        signature
    }

    fn can_place(&self, slot: SlotId, word: &str) -> bool {
        // Symmetry break: assigned class members visited before this slot
        // must hold words lexicographically <= the candidate.
        for &prev in &self.order {
            if prev == slot {
                break;
            }
            if self.class_of[prev] != self.class_of[slot] {
                continue;
            }
            if let Some(prev_word) = self.assigned[prev] {
                if word < prev_word {
                    return false;
                }
            }
        }

        // Crossing consistency with already-assigned neighbors.
        let bytes = word.as_bytes();
        for &(other, pos_self, pos_other) in &self.crossings[slot] {
            if let Some(other_word) = self.assigned[other] {
                if bytes[pos_self] != other_word.as_bytes()[pos_other] {
                    return false;
                }
            }
        }

        // Budget feasibility: claimed cells must match exactly and cost
        // nothing; newly claimed cells must fit the remaining budget.
        let mut need = [0u32; 26];
        for (pos, cell) in self.layout.slots[slot].cells().enumerate() {
            let letter = bytes[pos];
            match self.cell_letter.get(&cell) {
                Some(&claimed) => {
                    if claimed != letter {
                        return false;
                    }
                }
                None => {
                    let idx = (letter - b'A') as usize;
                    need[idx] += 1;
                    if need[idx] > self.budget.count(letter) {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn place(&mut self, slot: SlotId, word: &'d str) {
        let bytes = word.as_bytes();
        for (pos, cell) in self.layout.slots[slot].cells().enumerate() {
            let letter = bytes[pos];
            let usage = self.cell_usage.entry(cell).or_insert(0);
            if *usage == 0 {
                self.cell_letter.insert(cell, letter);
                self.budget.take(letter);
            }
            *usage += 1;
        }
        self.assigned[slot] = Some(word);
    }

    /// Exact inverse of `place`: a cell's letter returns to the budget only
    /// when its reference count drops to zero.
    fn unplace(&mut self, slot: SlotId, word: &str) {
        let bytes = word.as_bytes();
        for (pos, cell) in self.layout.slots[slot].cells().enumerate() {
            let letter = bytes[pos];
            let usage = self.cell_usage.entry(cell).or_insert(0);
            *usage -= 1;
            if *usage == 0 {
                self.cell_letter.remove(&cell);
                self.budget.give(letter);
            }
        }
        self.assigned[slot] = None;
    }

    fn maybe_heartbeat(&mut self, on_event: &mut dyn FnMut(&FillEvent)) {
        let now = Instant::now();
        if now.duration_since(self.last_heartbeat) >= self.heartbeat {
            self.last_heartbeat = now;
            on_event(&FillEvent::Heartbeat {
                found: self.solutions.len(),
                goal: self.max_solutions,
                elapsed: self.started.elapsed(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::layout::Slot;
    use crate::solver::Filler;

    fn cross_layout() -> Layout {
        // Across row 0 (cols 0..=3) and down col 1 (rows 0..=3), crossing at
        // (0,1): across position 1, down position 0. Seven distinct cells.
        Layout::from_slots(4, 4, vec![Slot::across(0, 0, 4), Slot::down(0, 1, 4)])
    }

    #[test]
    fn crossing_and_budget_select_the_unique_fill() {
        let layout = cross_layout();
        let dictionary = Dictionary::from_words(["ABLE", "BOLE"]);
        let outcome = Filler::default().fill(&layout, &dictionary, "BALEOLE");
        assert_eq!(outcome.solutions.len(), 1);
        let solution = &outcome.solutions[0];
        assert_eq!(solution.word(0), "ABLE");
        assert_eq!(solution.word(1), "BOLE");
        assert!(!outcome.skipped);
        assert!(!outcome.deadline_hit);
    }

    #[test]
    fn mismatched_crossings_yield_nothing() {
        let layout = cross_layout();
        // Both slots can only hold ABLE; across pos 1 is 'B', down pos 0 is
        // 'A', so every pairing disagrees at the shared cell.
        let dictionary = Dictionary::from_words(["ABLE"]);
        let outcome = Filler::default().fill(&layout, &dictionary, "ABLEABL");
        assert!(outcome.solutions.is_empty());
        assert!(!outcome.skipped);
    }

    #[test]
    fn leftover_budget_rejects_goal() {
        let layout = cross_layout();
        let dictionary = Dictionary::from_words(["ABLE", "BOLE"]);
        // One extra letter the grid can never consume.
        let outcome = Filler::default().fill(&layout, &dictionary, "BALEOLEZ");
        assert!(outcome.solutions.is_empty());
    }

    #[test]
    fn empty_pool_skips_layout() {
        let layout = cross_layout();
        let dictionary = Dictionary::from_words(["TENET"]);
        let outcome = Filler::default().fill(&layout, &dictionary, "BALEOLE");
        assert!(outcome.skipped);
        assert!(outcome.solutions.is_empty());
    }

    #[test]
    fn symmetric_slots_emit_one_solution_per_word_set() {
        // Two interchangeable down slots crossing one across slot at
        // mirrored columns, equal lengths: swapping their words relabels the
        // same structure and must not produce a second solution.
        let layout = Layout::from_slots(
            5,
            4,
            vec![
                Slot::across(0, 0, 5),
                Slot::down(0, 1, 4),
                Slot::down(0, 3, 4),
            ],
        );
        // SOLOS carries 'O' at both crossings, so OGRE and OVAL fit either
        // down slot: two labelings, one structure.
        let dictionary = Dictionary::from_words(["SOLOS", "OGRE", "OVAL"]);
        // Mask has 5 + 4 + 4 - 2 = 11 cells.
        let letters = "SOLOSGREVAL";
        let outcome = Filler::default().fill(&layout, &dictionary, letters);
        assert_eq!(outcome.solutions.len(), 1);
        let words: HashSet<&str> = outcome.solutions[0]
            .words()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(words, HashSet::from(["SOLOS", "OGRE", "OVAL"]));
    }

    #[test]
    fn zero_deadline_returns_promptly_and_validly() {
        let layout = cross_layout();
        let dictionary = Dictionary::from_words(["ABLE", "BOLE"]);
        let config = FillConfig {
            time_limit: Some(Duration::ZERO),
            ..FillConfig::default()
        };
        let outcome = Filler::new(config).fill(&layout, &dictionary, "BALEOLE");
        assert!(outcome.deadline_hit);
        // Whatever was found before the cutoff must still be fully valid.
        for solution in &outcome.solutions {
            assert_eq!(solution.word(0).as_bytes()[1], solution.word(1).as_bytes()[0]);
        }
    }

    #[test]
    fn solution_cap_bounds_output() {
        // Uncrossed single slot: any 4-letter word matching the budget wins.
        let layout = Layout::from_slots(4, 4, vec![Slot::across(0, 0, 4)]);
        let dictionary = Dictionary::from_words(["ABLE", "BALE", "ELBA"]);
        let config = FillConfig {
            max_solutions: 2,
            ..FillConfig::default()
        };
        let outcome = Filler::new(config).fill(&layout, &dictionary, "ABLE");
        assert_eq!(outcome.solutions.len(), 2);
    }
}
