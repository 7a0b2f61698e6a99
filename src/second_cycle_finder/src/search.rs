use bnum::types::U512;
use log::debug;
use qter_core::{ConjugacyClass, Permutation};

use crate::{
    SearchError,
    bridge::BridgeGenerators,
    speffz::{SpeffzEncoding, encode},
    working,
};

/// The second cycles found for one first cycle
#[derive(Clone, Debug)]
pub struct SearchResult {
    candidate_group_order: U512,
    classes_of_order: usize,
    kept: Vec<ConjugacyClass>,
}

impl SearchResult {
    /// The order of the group generated by the stabilizer and the bridges
    #[must_use]
    pub fn candidate_group_order(&self) -> U512 {
        self.candidate_group_order
    }

    /// How many conjugacy classes had the target order before deduplication
    #[must_use]
    pub fn classes_of_order(&self) -> usize {
        self.classes_of_order
    }

    #[must_use]
    pub fn kept_classes(&self) -> &[ConjugacyClass] {
        &self.kept
    }

    /// Whether nothing of the target order was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    /// Every accepted second cycle, class by class
    pub fn candidates(&self) -> impl Iterator<Item = &Permutation> {
        self.kept.iter().flat_map(accepted_members)
    }

    /// The Speffz encodings of [`Self::candidates`], computed as they are pulled
    pub fn encodings(&self) -> impl Iterator<Item = SpeffzEncoding> {
        self.candidates().map(encode)
    }
}

/// Close the stabilizer under the bridges and collect the deduplicated conjugacy classes of order `target_order`
///
/// # Errors
///
/// Fails if the candidate group can't be built.
pub fn search_candidates(
    bridge: &BridgeGenerators,
    target_order: u64,
) -> Result<SearchResult, SearchError> {
    let candidate_group = bridge.candidate_group()?;

    debug!(
        working!("The candidate group has {} generators and order {}"),
        candidate_group.generators().len(),
        candidate_group.order()
    );

    let classes = candidate_group.conjugacy_classes_of_order(target_order);
    let classes_of_order = classes.len();
    let kept = deduplicate_classes(classes);

    debug!(
        working!("Kept {} of {} conjugacy classes of order {}"),
        kept.len(),
        classes_of_order,
        target_order
    );

    Ok(SearchResult {
        candidate_group_order: candidate_group.order(),
        classes_of_order,
        kept,
    })
}

/// Drop every class that contains the inverse of an earlier kept class's representative. The first class of each inverse pair wins.
#[must_use]
pub fn deduplicate_classes(classes: Vec<ConjugacyClass>) -> Vec<ConjugacyClass> {
    let mut kept: Vec<ConjugacyClass> = vec![];

    for class in classes {
        let inverse = class.representative().inverse();

        if kept.iter().any(|other| other.contains(&inverse)) {
            continue;
        }

        kept.push(class);
    }

    kept
}

/// The members of a kept class worth emitting. When a class holds both `x` and `x⁻¹` for `x ≠ x⁻¹`, only the smaller of the two is accepted.
pub fn accepted_members(class: &ConjugacyClass) -> impl Iterator<Item = &Permutation> {
    let halve = class.order() > 2 && class.is_inverse_closed();

    class
        .members()
        .iter()
        .filter(move |member| !halve || **member < member.inverse())
}

#[cfg(test)]
mod tests {
    use qter_core::{Permutation, PermutationGroup};

    use super::{accepted_members, deduplicate_classes};

    fn perm(degree: usize, cycles: &[&[usize]]) -> Permutation {
        Permutation::from_cycles(degree, cycles).unwrap()
    }

    #[test]
    fn inverse_classes_are_merged() {
        let group = PermutationGroup::new(5, vec![perm(5, &[&[0, 1, 2, 3, 4]])]).unwrap();
        let classes = group.conjugacy_classes_of_order(5);
        assert_eq!(classes.len(), 4);

        let kept = deduplicate_classes(classes);
        assert_eq!(kept.len(), 2);

        for (i, a) in kept.iter().enumerate() {
            for (j, b) in kept.iter().enumerate() {
                if i != j {
                    assert!(!b.contains(&a.representative().inverse()));
                }
            }
        }

        // Abelian, so no class holds an inverse pair
        for class in &kept {
            assert_eq!(accepted_members(class).count(), 1);
        }
    }

    #[test]
    fn self_inverse_classes_are_halved() {
        let group = PermutationGroup::new(
            4,
            vec![perm(4, &[&[0, 1]]), perm(4, &[&[0, 1, 2, 3]])],
        )
        .unwrap();

        let three_cycles = deduplicate_classes(group.conjugacy_classes_of_order(3));
        assert_eq!(three_cycles.len(), 1);
        assert_eq!(three_cycles[0].size(), 8);

        let accepted = accepted_members(&three_cycles[0]).collect::<Vec<_>>();
        assert_eq!(accepted.len(), 4);
        for member in &accepted {
            assert!(!accepted.contains(&&member.inverse()));
        }

        // Involutions are their own inverse and are never halved
        let involutions = deduplicate_classes(group.conjugacy_classes_of_order(2));
        assert_eq!(involutions.len(), 2);
        assert_eq!(
            involutions
                .iter()
                .map(|class| accepted_members(class).count())
                .sum::<usize>(),
            9
        );
    }
}
