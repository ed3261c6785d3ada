//! Slot equivalence classes for symmetric-duplicate suppression.
//!
//! Two slots are equivalent when their local shape signatures match:
//! orientation, length, and the sorted multiset of crossing-partner
//! descriptions. Deeper grid automorphisms are deliberately ignored.

use std::collections::BTreeMap;

use crate::layout::{Direction, Layout, SlotId};

type Signature = (Direction, usize, Vec<(Direction, usize, usize)>);

/// Class index per slot, plus the number of classes. Class indices follow
/// the signatures' natural order, so they are deterministic for a layout.
pub fn equivalence_classes(layout: &Layout) -> (usize, Vec<usize>) {
    let mut groups: BTreeMap<Signature, Vec<SlotId>> = BTreeMap::new();
    for (id, slot) in layout.slots.iter().enumerate() {
        let mut touches: Vec<(Direction, usize, usize)> = layout
            .crossings_of(id)
            .into_iter()
            .map(|(other, pos_self, _)| {
                let partner = &layout.slots[other];
                (partner.direction, partner.length, pos_self)
            })
            .collect();
        touches.sort_unstable();
        groups
            .entry((slot.direction, slot.length, touches))
            .or_default()
            .push(id);
    }

    let mut class_of = vec![0; layout.slots.len()];
    for (class, members) in groups.values().enumerate() {
        for &id in members {
            class_of[id] = class;
        }
    }
    (groups.len(), class_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Slot;

    #[test]
    fn mirrored_slots_share_a_class() {
        // Two down slots at mirrored columns, both crossing the across row
        // at the same position along themselves.
        let layout = Layout::from_slots(
            5,
            5,
            vec![
                Slot::across(2, 0, 5),
                Slot::down(0, 1, 5),
                Slot::down(0, 3, 5),
            ],
        );
        let (count, class_of) = equivalence_classes(&layout);
        assert_eq!(count, 2);
        assert_eq!(class_of[1], class_of[2]);
        assert_ne!(class_of[0], class_of[1]);
    }

    #[test]
    fn differing_cross_positions_split_classes() {
        // Down slots of equal length but crossed at different own positions.
        let layout = Layout::from_slots(
            7,
            6,
            vec![
                Slot::across(2, 0, 7),
                Slot::down(0, 1, 4),
                Slot::down(2, 3, 4),
            ],
        );
        let (count, class_of) = equivalence_classes(&layout);
        assert_eq!(count, 3);
        assert_ne!(class_of[1], class_of[2]);
    }

    #[test]
    fn uncrossed_slots_group_by_shape_only() {
        let layout = Layout::from_slots(
            7,
            6,
            vec![Slot::down(0, 0, 4), Slot::down(0, 6, 4), Slot::down(1, 3, 4)],
        );
        let (count, class_of) = equivalence_classes(&layout);
        assert_eq!(count, 1);
        assert_eq!(class_of, vec![0, 0, 0]);
    }
}
