//! Layout ranking: denser interlock first, seeded shuffle between ties.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::layout::Layout;

/// Order layouts by distinct crossing-cell count, descending. Layouts with
/// equal counts are shuffled with a caller-seeded generator, so reruns with
/// the same seed reproduce the same ordering.
pub fn rank_layouts(layouts: Vec<Layout>, seed: u64) -> Vec<Layout> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut buckets: BTreeMap<usize, Vec<Layout>> = BTreeMap::new();
    for layout in layouts {
        buckets
            .entry(layout.distinct_crossing_cells())
            .or_default()
            .push(layout);
    }

    let mut ranked = Vec::new();
    for (_, mut bucket) in buckets.into_iter().rev() {
        bucket.shuffle(&mut rng);
        ranked.append(&mut bucket);
    }
    ranked
}
