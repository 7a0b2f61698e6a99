use std::{
    collections::{HashMap, HashSet},
    sync::OnceLock,
};

use bnum::types::U512;
use itertools::Itertools;
use log::trace;
use thiserror::Error;

use crate::{
    math::{
        schreier_sims::{Elements, StabilizerChain},
        union_find::{MinElement, UnionFind},
    },
    permutation::Permutation,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    #[error("A permutation group must act on at least one facelet")]
    EmptyDomain,
    #[error("Expected a permutation on {expected} facelets but got one on {actual}")]
    DegreeMismatch { expected: usize, actual: usize },
    #[error("Facelet {} is out of range for a group acting on {degree} facelets", .point + 1)]
    PointOutOfRange { point: usize, degree: usize },
    #[error("The facelets are not closed under the group action; facelet {} leaves the set", .point + 1)]
    NotInvariant { point: usize },
}

/// A permutation group given by its generators.
///
/// The stabilizer chain is computed the first time that it is needed and cached.
#[derive(Clone, Debug)]
pub struct PermutationGroup {
    degree: usize,
    generators: Vec<Permutation>,
    chain: OnceLock<StabilizerChain>,
}

impl PermutationGroup {
    /// Create the group generated by `generators` acting on the facelets `0..degree`. Identity generators are dropped.
    ///
    /// # Errors
    ///
    /// Fails if the degree is zero or if any generator acts on a different number of facelets.
    pub fn new(
        degree: usize,
        generators: Vec<Permutation>,
    ) -> Result<PermutationGroup, GroupError> {
        if degree == 0 {
            return Err(GroupError::EmptyDomain);
        }

        for generator in &generators {
            check_degree(degree, generator)?;
        }

        Ok(PermutationGroup {
            degree,
            generators: generators
                .into_iter()
                .filter(|generator| !generator.is_identity())
                .unique()
                .collect(),
            chain: OnceLock::new(),
        })
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    #[must_use]
    pub fn generators(&self) -> &[Permutation] {
        &self.generators
    }

    #[must_use]
    pub fn identity(&self) -> Permutation {
        Permutation::identity(self.degree)
    }

    /// The stabilizer chain of the group using the facelets in increasing order as the base
    pub fn stabilizer_chain(&self) -> &StabilizerChain {
        self.chain
            .get_or_init(|| StabilizerChain::new(self.degree, &self.generators))
    }

    /// The number of elements of the group
    #[must_use]
    pub fn order(&self) -> U512 {
        self.stabilizer_chain().cardinality()
    }

    /// Determine if a permutation is a member of the group
    #[must_use]
    pub fn is_member(&self, permutation: &Permutation) -> bool {
        self.stabilizer_chain().is_member(permutation)
    }

    /// Iterate over every element of the group. Only sensible for small groups.
    pub fn elements(&self) -> Elements<'_> {
        self.stabilizer_chain().elements()
    }

    /// The orbit of a facelet, in the order that it is discovered
    ///
    /// # Errors
    ///
    /// Fails if the facelet is out of range.
    pub fn orbit(&self, point: usize) -> Result<Vec<usize>, GroupError> {
        self.check_point(point)?;

        let mut seen = vec![false; self.degree];
        seen[point] = true;
        let mut orbit = vec![point];
        let mut i = 0;

        while i < orbit.len() {
            for generator in &self.generators {
                let image = generator.image(orbit[i]);

                if !seen[image] {
                    seen[image] = true;
                    orbit.push(image);
                }
            }

            i += 1;
        }

        Ok(orbit)
    }

    /// Partition `points` into orbits. Each orbit is sorted and the orbits are sorted by their smallest facelet.
    ///
    /// # Errors
    ///
    /// Fails if a facelet is out of range or if `points` is not closed under the group action.
    pub fn orbits(&self, points: &[usize]) -> Result<Vec<Vec<usize>>, GroupError> {
        let in_points = self.membership_mask(points)?;
        let mut covered = vec![false; self.degree];
        let mut orbits = vec![];

        for &point in points.iter().sorted() {
            if covered[point] {
                continue;
            }

            let mut orbit = self.orbit(point)?;

            if let Some(&escaped) = orbit.iter().find(|&&v| !in_points[v]) {
                return Err(GroupError::NotInvariant { point: escaped });
            }

            for &v in &orbit {
                covered[v] = true;
            }

            orbit.sort_unstable();
            orbits.push(orbit);
        }

        Ok(orbits)
    }

    /// The subgroup fixing every one of `points` individually
    ///
    /// # Errors
    ///
    /// Fails if a facelet is out of range.
    pub fn stabilizer(&self, points: &[usize]) -> Result<PermutationGroup, GroupError> {
        for &point in points {
            self.check_point(point)?;
        }

        let points = points.iter().copied().unique().collect_vec();
        let chain = StabilizerChain::with_base_prefix(self.degree, &self.generators, &points);
        let generators = chain.strong_generators_fixing(points.len());

        trace!(
            "Stabilizer of {} facelets has {} strong generators",
            points.len(),
            generators.len()
        );

        PermutationGroup::new(self.degree, generators)
    }

    /// The group generated by this group's generators together with `extra_generators`
    ///
    /// # Errors
    ///
    /// Fails if an extra generator acts on a different number of facelets.
    pub fn closure(
        &self,
        extra_generators: impl IntoIterator<Item = Permutation>,
    ) -> Result<PermutationGroup, GroupError> {
        let generators = self
            .generators
            .iter()
            .cloned()
            .chain(extra_generators)
            .collect_vec();

        PermutationGroup::new(self.degree, generators)
    }

    /// A minimal nontrivial block system for the action of the group on each orbit in `points`. An orbit on which the group acts primitively is a single block.
    ///
    /// Blocks are sorted, and listed by their smallest facelet.
    ///
    /// # Errors
    ///
    /// Fails if a facelet is out of range or if `points` is not closed under the group action.
    pub fn blocks(&self, points: &[usize]) -> Result<Vec<Vec<usize>>, GroupError> {
        let mut blocks = vec![];

        for orbit in self.orbits(points)? {
            let Some((&first, rest)) = orbit.split_first() else {
                continue;
            };

            // A block of minimal size among the nontrivial blocks containing `first` is a minimal block
            let smallest = rest
                .iter()
                .map(|&other| self.finest_blocks_containing(&orbit, &[first, other]))
                .filter(|system| system.len() > 1)
                .min_by_key(|system| system[0].len());

            match smallest {
                Some(system) => blocks.extend(system),
                None => blocks.push(orbit),
            }
        }

        blocks.sort_unstable();
        Ok(blocks)
    }

    /// The finest block system on `points` in which all of `seed` lies in one block
    ///
    /// # Errors
    ///
    /// Fails if a facelet is out of range, if `seed` isn't contained in `points`, or if `points` is not closed under the group action.
    pub fn blocks_with_seed(
        &self,
        points: &[usize],
        seed: &[usize],
    ) -> Result<Vec<Vec<usize>>, GroupError> {
        let in_points = self.membership_mask(points)?;

        for &point in points {
            for generator in &self.generators {
                if !in_points[generator.image(point)] {
                    return Err(GroupError::NotInvariant {
                        point: generator.image(point),
                    });
                }
            }
        }

        if let Some(&point) = seed.iter().find(|&&point| !in_points[point]) {
            return Err(GroupError::NotInvariant { point });
        }

        let points = points.iter().copied().sorted().unique().collect_vec();
        Ok(self.finest_blocks_containing(&points, seed))
    }

    /// Atkinson's algorithm: merge the seed into one class, then keep merging the images of merged pairs until the partition is invariant
    fn finest_blocks_containing(&self, points: &[usize], seed: &[usize]) -> Vec<Vec<usize>> {
        let mut union_find = UnionFind::with_min_elements(self.degree);
        let mut to_check = vec![];

        if let Some((&first, rest)) = seed.split_first() {
            for &other in rest {
                if union_find.union(first, other) {
                    to_check.push((first, other));
                }
            }
        }

        while let Some((a, b)) = to_check.pop() {
            for generator in &self.generators {
                let (image_a, image_b) = (generator.image(a), generator.image(b));

                if union_find.union(image_a, image_b) {
                    to_check.push((image_a, image_b));
                }
            }
        }

        let mut blocks = HashMap::<usize, Vec<usize>>::new();
        for &point in points {
            let MinElement(min) = *union_find.find(point).set_meta();
            blocks.entry(min).or_default().push(point);
        }

        blocks
            .into_iter()
            .sorted_by_key(|(min, _)| *min)
            .map(|(_, mut block)| {
                block.sort_unstable();
                block
            })
            .collect()
    }

    /// All conjugacy classes of the group, in the order that the element enumeration discovers them. Only sensible for small groups.
    #[must_use]
    pub fn conjugacy_classes(&self) -> Vec<ConjugacyClass> {
        self.collect_conjugacy_classes(|_| true)
    }

    /// The conjugacy classes whose elements have order `order`, in discovery order
    #[must_use]
    pub fn conjugacy_classes_of_order(&self, order: u64) -> Vec<ConjugacyClass> {
        self.collect_conjugacy_classes(|element| element.order() == order)
    }

    fn collect_conjugacy_classes(
        &self,
        mut wanted: impl FnMut(&Permutation) -> bool,
    ) -> Vec<ConjugacyClass> {
        let mut seen = HashSet::new();
        let mut classes = vec![];

        for element in self.elements() {
            // Conjugate elements share an order, so the filter is consistent within a class
            if seen.contains(&element) || !wanted(&element) {
                continue;
            }

            let class = self.conjugacy_class_of(element);
            seen.extend(class.members.iter().cloned());
            classes.push(class);
        }

        classes
    }

    /// The conjugacy class of `representative`, found as its orbit under conjugation by the generators
    #[must_use]
    pub fn conjugacy_class_of(&self, representative: Permutation) -> ConjugacyClass {
        let mut members = vec![representative.clone()];
        let mut member_set = HashSet::from([representative.clone()]);
        let inverses = self.generators.iter().map(Permutation::inverse).collect_vec();
        let mut i = 0;

        while i < members.len() {
            for (generator, inverse) in self.generators.iter().zip(&inverses) {
                // `g⁻¹ x g`
                let conjugate = inverse.compose(&members[i]).compose(generator);

                if member_set.insert(conjugate.clone()) {
                    members.push(conjugate);
                }
            }

            i += 1;
        }

        ConjugacyClass {
            order: representative.order(),
            representative,
            members,
            member_set,
        }
    }

    fn check_point(&self, point: usize) -> Result<(), GroupError> {
        if point >= self.degree {
            return Err(GroupError::PointOutOfRange {
                point,
                degree: self.degree,
            });
        }

        Ok(())
    }

    fn membership_mask(&self, points: &[usize]) -> Result<Vec<bool>, GroupError> {
        let mut mask = vec![false; self.degree];

        for &point in points {
            self.check_point(point)?;
            mask[point] = true;
        }

        Ok(mask)
    }
}

fn check_degree(degree: usize, permutation: &Permutation) -> Result<(), GroupError> {
    if permutation.degree() != degree {
        return Err(GroupError::DegreeMismatch {
            expected: degree,
            actual: permutation.degree(),
        });
    }

    Ok(())
}

/// A conjugacy class of a permutation group along with all of its members
#[derive(Clone, Debug)]
pub struct ConjugacyClass {
    representative: Permutation,
    order: u64,
    members: Vec<Permutation>,
    member_set: HashSet<Permutation>,
}

impl ConjugacyClass {
    /// The first member of the class that was discovered
    #[must_use]
    pub fn representative(&self) -> &Permutation {
        &self.representative
    }

    /// The order shared by every member of the class
    #[must_use]
    pub fn order(&self) -> u64 {
        self.order
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn contains(&self, permutation: &Permutation) -> bool {
        self.member_set.contains(permutation)
    }

    /// The members of the class, starting with the representative
    #[must_use]
    pub fn members(&self) -> &[Permutation] {
        &self.members
    }

    /// Whether the inverse of the representative lies in the same class
    #[must_use]
    pub fn is_inverse_closed(&self) -> bool {
        self.contains(&self.representative.inverse())
    }
}
