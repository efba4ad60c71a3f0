//! Property tests for the section registry.

use flipbook_model::{Direction, SectionRegistry};
use proptest::prelude::*;

fn registry_with(count: usize) -> SectionRegistry {
    SectionRegistry::from_ids("cover", SectionRegistry::numbered_ids(count)).unwrap()
}

proptest! {
    #[test]
    fn index_and_id_round_trip(count in 1usize..40, pick in 0usize..64) {
        let registry = registry_with(count);
        let index = pick % registry.page_count();
        let id = registry.id_at(index).unwrap().clone();
        prop_assert_eq!(registry.index_of(id.as_str()), Some(index));
    }

    #[test]
    fn every_content_section_is_valid(count in 1usize..40) {
        let registry = registry_with(count);
        for section in registry.sections() {
            prop_assert!(registry.is_valid(section.as_str()));
            let (index, id) = registry.resolve_fragment(&section.fragment()).unwrap();
            prop_assert_eq!(id, section);
            prop_assert!(index >= registry.first_content_index());
        }
    }

    #[test]
    fn neighbors_stay_in_content_bounds(
        count in 1usize..40,
        pick in 1usize..40,
        radius in prop_oneof![0usize..5, Just(usize::MAX)],
    ) {
        let registry = registry_with(count);
        let index = 1 + (pick - 1) % count;
        let id = registry.id_at(index).unwrap().clone();
        let neighbors = registry.neighbors(id.as_str(), radius);

        prop_assert!(neighbors.len() <= radius.saturating_mul(2));
        if radius >= count {
            prop_assert_eq!(neighbors.len(), count - 1);
        }
        for neighbor in &neighbors {
            let position = registry.index_of(neighbor.as_str()).unwrap();
            prop_assert!(position >= 1);
            prop_assert!(position.abs_diff(index) <= radius);
            prop_assert_ne!(position, index);
        }
    }

    #[test]
    fn stepping_never_leaves_the_sequence(count in 1usize..40, pick in 0usize..64) {
        let registry = registry_with(count);
        let index = pick % registry.page_count();
        for direction in [Direction::Forward, Direction::Backward] {
            if let Some(next) = direction.step(index, registry.page_count()) {
                prop_assert!(next < registry.page_count());
                prop_assert_eq!(Direction::between(index, next), direction);
            }
        }
    }
}
