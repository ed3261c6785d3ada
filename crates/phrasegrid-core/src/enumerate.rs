//! Symmetric layout enumeration.
//!
//! Layouts are built from non-adjacent across rows with centered spans and
//! non-adjacent down columns chosen as mirror units, then validated: purity,
//! 4-connectivity, no plain rectangle frame, minimum crossings, mask dedupe.
//!
//! The cheap combinatorial choices (rows, span lengths, column units) are
//! expanded up front into shape groups; the explosive dimension — assigning a
//! vertical segment to every unit — is scanned lazily with an odometer so the
//! enumerator stays an iterator rather than a materialized list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::{GridMask, Layout, Slot};

/// Width range for enumerated grids.
pub const WIDTH_RANGE: std::ops::RangeInclusive<usize> = 4..=7;
/// Height range for enumerated grids.
pub const HEIGHT_RANGE: std::ops::RangeInclusive<usize> = 4..=6;
/// Minimum down-slot length.
const MIN_DOWN_LEN: usize = 4;

/// Allowed (across, down) count pairs for a requested total word count.
pub fn families_for_total(total_words: usize) -> &'static [(usize, usize)] {
    match total_words {
        5 => &[(3, 2), (2, 3), (1, 4)],
        6 => &[(3, 3), (2, 4)],
        _ => &[],
    }
}

/// Enumeration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumeratorConfig {
    /// Requested total word count (5 or 6).
    pub total_words: usize,
    /// Reject layouts with fewer crossing cells than this.
    pub min_crossings: usize,
}

impl EnumeratorConfig {
    pub fn new(total_words: usize) -> Self {
        Self {
            total_words,
            min_crossings: 0,
        }
    }

    pub fn with_min_crossings(mut self, min_crossings: usize) -> Self {
        self.min_crossings = min_crossings;
        self
    }
}

/// Mirror-symmetric column units at a given width: mirrored pairs plus an
/// unpaired center column for odd widths.
fn symmetric_vertical_units(width: usize) -> Vec<Vec<usize>> {
    match width {
        4 => vec![vec![0, 3]],
        5 => vec![vec![0, 4], vec![1, 3], vec![2]],
        6 => vec![vec![0, 5], vec![1, 4]],
        7 => vec![vec![0, 6], vec![1, 5], vec![2, 4], vec![3]],
        _ => Vec::new(),
    }
}

/// All (start, length) choices for a down segment at a given height.
fn vertical_segment_options(height: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for length in MIN_DOWN_LEN..=height {
        for start in 0..=(height - length) {
            out.push((start, length));
        }
    }
    out
}

/// Across span lengths legal at a given width: centered spans must match the
/// width's parity to stay left-right symmetric.
fn across_lengths_for_width(width: usize) -> Vec<usize> {
    let min = if width % 2 == 0 { 4 } else { 5 };
    (min..=width).filter(|l| l % 2 == width % 2).collect()
}

/// Start and end columns of a centered across span.
fn across_span(width: usize, length: usize) -> (usize, usize) {
    let start = (width - length) / 2;
    (start, start + length - 1)
}

/// Pairwise non-adjacent (gap of at least one) after sorting.
fn nonadjacent(indices: &[usize]) -> bool {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).all(|w| w[1] - w[0] >= 2)
}

/// All k-element index subsets of 0..n in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        out.push(current.clone());
        // advance to the next combination
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if current[i] != i + n - k {
                break;
            }
            if i == 0 {
                return out;
            }
        }
        current[i] += 1;
        for j in i + 1..k {
            current[j] = current[j - 1] + 1;
        }
    }
}

/// One fully chosen shape except for the vertical segment assignment:
/// dimensions, across rows with their centered spans, and the column units
/// that still need a segment each.
struct ShapeGroup {
    width: usize,
    height: usize,
    /// (row, span start col, span end col)
    rows_with_span: Vec<(usize, usize, usize)>,
    /// Chosen units; every column in a unit shares one segment.
    units: Vec<Vec<usize>>,
}

/// Lazy scan over all segment assignments for one shape group.
struct SegmentScan {
    group: ShapeGroup,
    options: Vec<(usize, usize)>,
    odometer: Vec<usize>,
    exhausted: bool,
}

impl SegmentScan {
    fn new(group: ShapeGroup, options: Vec<(usize, usize)>) -> Self {
        let exhausted = !group.units.is_empty() && options.is_empty();
        let odometer = vec![0; group.units.len()];
        Self {
            group,
            options,
            odometer,
            exhausted,
        }
    }

    fn advance(&mut self) {
        for digit in self.odometer.iter_mut() {
            *digit += 1;
            if *digit < self.options.len() {
                return;
            }
            *digit = 0;
        }
        self.exhausted = true;
    }

    /// Next segment assignment that survives every structural check.
    fn next_layout(&mut self, min_crossings: usize) -> Option<Layout> {
        while !self.exhausted {
            let layout = self.try_current(min_crossings);
            self.advance();
            if layout.is_some() {
                return layout;
            }
        }
        None
    }

    fn try_current(&self, min_crossings: usize) -> Option<Layout> {
        let group = &self.group;

        // Expand units to per-column segments.
        let mut cols_with_seg: Vec<(usize, usize, usize)> = Vec::new();
        for (unit, &choice) in group.units.iter().zip(&self.odometer) {
            let (start, length) = self.options[choice];
            for &col in unit {
                cols_with_seg.push((col, start, start + length - 1));
            }
        }
        cols_with_seg.sort_unstable();

        if !purity_ok(&group.rows_with_span, &cols_with_seg) {
            return None;
        }
        if is_plain_rectangle(
            group.width,
            group.height,
            &group.rows_with_span,
            &cols_with_seg,
        ) {
            return None;
        }

        let mut slots = Vec::new();
        for &(row, cs, ce) in &group.rows_with_span {
            slots.push(Slot::across(row, cs, ce - cs + 1));
        }
        for &(col, s, e) in &cols_with_seg {
            slots.push(Slot::down(s, col, e - s + 1));
        }
        let layout = Layout::from_slots(group.width, group.height, slots);

        if !layout.mask.is_connected() {
            return None;
        }
        if layout.crossings.len() < min_crossings {
            return None;
        }
        Some(layout)
    }
}

/// Purity over the union of chosen spans: wherever a down column meets an
/// across row, the crossing must be covered by both spans; wherever it would
/// fall outside the across span, the down segment must not reach that row.
fn purity_ok(rows_with_span: &[(usize, usize, usize)], cols_with_seg: &[(usize, usize, usize)]) -> bool {
    if rows_with_span.is_empty() && cols_with_seg.is_empty() {
        return false;
    }
    for &(col, seg_start, seg_end) in cols_with_seg {
        for &(row, span_start, span_end) in rows_with_span {
            let col_in_span = (span_start..=span_end).contains(&col);
            let row_in_seg = (seg_start..=seg_end).contains(&row);
            if col_in_span != row_in_seg {
                return false;
            }
        }
    }
    true
}

/// The degenerate fully-bordered rectangle: full-width across spans on the
/// top and bottom rows plus full-height down segments on both border columns.
fn is_plain_rectangle(
    width: usize,
    height: usize,
    rows_with_span: &[(usize, usize, usize)],
    cols_with_seg: &[(usize, usize, usize)],
) -> bool {
    let full_row = |r: usize| {
        rows_with_span
            .iter()
            .any(|&(row, cs, ce)| row == r && cs == 0 && ce == width - 1)
    };
    let full_col = |c: usize| {
        cols_with_seg
            .iter()
            .any(|&(col, s, e)| col == c && s == 0 && e == height - 1)
    };
    full_row(0) && full_row(height - 1) && full_col(0) && full_col(width - 1)
}

/// Iterator over all valid layouts for one word-count family set.
///
/// Different construction paths can union to the same mask; those duplicates
/// are suppressed here. Empty output for a given configuration is normal.
pub struct LayoutEnumerator {
    min_crossings: usize,
    groups: std::vec::IntoIter<ShapeGroup>,
    scan: Option<SegmentScan>,
    seen_masks: HashSet<GridMask>,
}

impl LayoutEnumerator {
    pub fn new(config: EnumeratorConfig) -> Self {
        let groups = build_shape_groups(config.total_words);
        debug!(
            total_words = config.total_words,
            groups = groups.len(),
            "layout enumeration prepared"
        );
        Self {
            min_crossings: config.min_crossings,
            groups: groups.into_iter(),
            scan: None,
            seen_masks: HashSet::new(),
        }
    }
}

impl Iterator for LayoutEnumerator {
    type Item = Layout;

    fn next(&mut self) -> Option<Layout> {
        loop {
            if let Some(scan) = self.scan.as_mut() {
                while let Some(layout) = scan.next_layout(self.min_crossings) {
                    if self.seen_masks.insert(layout.mask.clone()) {
                        return Some(layout);
                    }
                }
                self.scan = None;
            }
            let group = self.groups.next()?;
            let options = vertical_segment_options(group.height);
            self.scan = Some(SegmentScan::new(group, options));
        }
    }
}

/// Eagerly collect every valid layout for the configuration.
pub fn enumerate_layouts(config: EnumeratorConfig) -> Vec<Layout> {
    LayoutEnumerator::new(config).collect()
}

/// Expand the cheap combinatorial choices into shape groups.
fn build_shape_groups(total_words: usize) -> Vec<ShapeGroup> {
    let mut groups = Vec::new();
    for width in WIDTH_RANGE {
        let units = symmetric_vertical_units(width);
        let lengths = across_lengths_for_width(width);
        for height in HEIGHT_RANGE {
            for &(across_count, down_count) in families_for_total(total_words) {
                if across_count > height {
                    continue;
                }

                let row_sets: Vec<Vec<usize>> = combinations(height, across_count)
                    .into_iter()
                    .filter(|rows| nonadjacent(rows))
                    .collect();
                if row_sets.is_empty() {
                    continue;
                }

                let unit_subsets = unit_subsets_for(&units, down_count);
                if unit_subsets.is_empty() {
                    continue;
                }

                let length_combos = product_repeat(&lengths, across_count);

                for rows in &row_sets {
                    for combo in &length_combos {
                        let rows_with_span: Vec<(usize, usize, usize)> = rows
                            .iter()
                            .zip(combo)
                            .map(|(&row, &len)| {
                                let (cs, ce) = across_span(width, len);
                                (row, cs, ce)
                            })
                            .collect();
                        for unit_choice in &unit_subsets {
                            groups.push(ShapeGroup {
                                width,
                                height,
                                rows_with_span: rows_with_span.clone(),
                                units: unit_choice.clone(),
                            });
                        }
                    }
                }
            }
        }
    }
    groups
}

/// Unit subsets whose expanded columns number exactly `down_count` and are
/// pairwise non-adjacent.
fn unit_subsets_for(units: &[Vec<usize>], down_count: usize) -> Vec<Vec<Vec<usize>>> {
    let mut out = Vec::new();
    for k in 1..=units.len() {
        for subset in combinations(units.len(), k) {
            let choice: Vec<Vec<usize>> = subset.iter().map(|&i| units[i].clone()).collect();
            let cols: Vec<usize> = choice.iter().flatten().copied().collect();
            if cols.len() != down_count || !nonadjacent(&cols) {
                continue;
            }
            out.push(choice);
        }
    }
    out
}

/// All `k`-tuples drawn with repetition from `items`.
fn product_repeat(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    let mut out = vec![Vec::new()];
    for _ in 0..k {
        let mut next = Vec::new();
        for prefix in &out {
            for &item in items {
                let mut tuple = prefix.clone();
                tuple.push(item);
                next.push(tuple);
            }
        }
        out = next;
    }
    out
}
