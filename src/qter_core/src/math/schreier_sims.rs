use std::collections::VecDeque;

use bnum::types::U512;
use itertools::Itertools;

use crate::permutation::Permutation;

/// A base and strong generating set for a permutation group, built with the incremental Schreier-Sims algorithm.
///
/// Every facelet is a base point. The caller may choose which facelets come first, which makes the pointwise stabilizer of those facelets available as a tail of the chain.
#[derive(Clone, Debug)]
pub struct StabilizerChain {
    degree: usize,
    stabilizers: Stabilizer,
}

impl StabilizerChain {
    /// Create a new stabilizer chain using the facelets in increasing order as the base.
    ///
    /// # Panics
    ///
    /// Panics if `degree` is zero or if a generator has a different degree.
    #[must_use]
    pub fn new(degree: usize, generators: &[Permutation]) -> StabilizerChain {
        StabilizerChain::with_base_prefix(degree, generators, &[])
    }

    /// Create a new stabilizer chain whose base starts with `prefix` and continues with the remaining facelets in increasing order.
    ///
    /// # Panics
    ///
    /// Panics if `degree` is zero, if a generator has a different degree, or if `prefix` contains a facelet twice or out of range.
    #[must_use]
    pub fn with_base_prefix(
        degree: usize,
        generators: &[Permutation],
        prefix: &[usize],
    ) -> StabilizerChain {
        assert!(degree > 0);

        let mut in_prefix = vec![false; degree];
        for &point in prefix {
            assert!(!in_prefix[point], "Facelet {point} appears twice in the base");
            in_prefix[point] = true;
        }

        let base = prefix
            .iter()
            .copied()
            .chain((0..degree).filter(|&point| !in_prefix[point]))
            .collect_vec();

        let mut stabilizers = Stabilizer::new(degree, &base);

        for generator in generators {
            assert_eq!(generator.degree(), degree);

            if !generator.is_identity() {
                stabilizers.extend(generator.to_owned());
            }
        }

        StabilizerChain {
            degree,
            stabilizers,
        }
    }

    /// The base points in the order that they are stabilized
    #[cfg(test)]
    fn base(&self) -> Vec<usize> {
        self.levels().map(|level| level.stabilizes).collect()
    }

    /// Determine if a permutation is a member of the group
    #[must_use]
    pub fn is_member(&self, permutation: &Permutation) -> bool {
        permutation.degree() == self.degree && self.stabilizers.is_member(permutation.clone())
    }

    /// Calculate the cardinality of the group
    #[must_use]
    pub fn cardinality(&self) -> U512 {
        self.levels().fold(U512::ONE, |acc, level| {
            acc * U512::from_digit(level.orbit_size() as u64)
        })
    }

    /// Strong generators that fix the first `depth` base points; they generate the pointwise stabilizer of those points.
    #[must_use]
    pub fn strong_generators_fixing(&self, depth: usize) -> Vec<Permutation> {
        self.levels()
            .skip(depth)
            .flat_map(|level| level.generating_set.iter().cloned())
            .unique()
            .collect()
    }

    /// Iterate over every element of the group exactly once, in a fixed order
    #[must_use]
    pub fn elements(&self) -> Elements<'_> {
        let transversals = self
            .levels()
            .map(|level| level.coset_reps.iter().flatten().collect_vec())
            .filter(|transversal| transversal.len() > 1)
            .collect_vec();

        Elements {
            degree: self.degree,
            indices: vec![0; transversals.len()],
            transversals,
            exhausted: false,
        }
    }

    fn levels(&self) -> impl Iterator<Item = &Stabilizer> {
        std::iter::successors(Some(&self.stabilizers), |level| level.next.as_deref())
    }
}

#[derive(Clone, Debug)]
struct Stabilizer {
    next: Option<Box<Stabilizer>>,
    stabilizes: usize,
    generating_set: Vec<Permutation>,
    // `coset_reps[i]` maps `stabilizes` to `i`
    coset_reps: Box<[Option<Permutation>]>,
    coset_rep_inverses: Box<[Option<Permutation>]>,
}

impl Stabilizer {
    fn new(degree: usize, chain: &[usize]) -> Stabilizer {
        let (head, tail) = chain
            .split_first()
            .expect("the base to contain at least one facelet");

        let mut coset_reps = Box::<[_]>::from(vec![None; degree]);
        coset_reps[*head] = Some(Permutation::identity(degree));

        Stabilizer {
            stabilizes: *head,
            next: (!tail.is_empty()).then(|| Box::new(Stabilizer::new(degree, tail))),
            coset_rep_inverses: coset_reps.clone(),
            coset_reps,
            generating_set: Vec::new(),
        }
    }

    fn orbit_size(&self) -> usize {
        self.coset_reps.iter().filter(|v| v.is_some()).count()
    }

    fn is_member(&self, mut permutation: Permutation) -> bool {
        let mut level = Some(self);

        while let Some(stabilizer) = level {
            let Some(inverse) =
                &stabilizer.coset_rep_inverses[permutation.image(stabilizer.stabilizes)]
            else {
                return false;
            };

            permutation.compose_into(inverse);
            level = stabilizer.next.as_deref();
        }

        permutation.is_identity()
    }

    fn extend(&mut self, generator: Permutation) {
        if self.is_member(generator.clone()) {
            return;
        }

        let mut newly_in_orbit = VecDeque::new();

        // The old orbit is closed under the old generators so only the new generator can find new points or Schreier generators from it
        let old_orbit = self.coset_reps.iter().flatten().cloned().collect_vec();
        for rep in old_orbit {
            self.consider(rep.compose(&generator), &mut newly_in_orbit);
        }

        self.generating_set.push(generator);

        while let Some(spot) = newly_in_orbit.pop_front() {
            let Some(rep) = self.coset_reps[spot].clone() else {
                continue;
            };

            for i in 0..self.generating_set.len() {
                let candidate = rep.compose(&self.generating_set[i]);
                self.consider(candidate, &mut newly_in_orbit);
            }
        }
    }

    /// `candidate` maps the base point somewhere. Either that spot is new to the orbit and `candidate` becomes its coset rep, or `candidate` gives a Schreier generator for the next stabilizer.
    fn consider(&mut self, candidate: Permutation, newly_in_orbit: &mut VecDeque<usize>) {
        let spot = candidate.image(self.stabilizes);

        match &self.coset_rep_inverses[spot] {
            Some(inverse) => {
                let schreier_generator = candidate.compose(inverse);

                if schreier_generator.is_identity() {
                    return;
                }

                // Every facelet is a base point so the last stabilizer is trivial and never sees a nontrivial Schreier generator
                if let Some(next) = &mut self.next {
                    next.extend(schreier_generator);
                }
            }
            None => {
                self.coset_rep_inverses[spot] = Some(candidate.inverse());
                self.coset_reps[spot] = Some(candidate);
                newly_in_orbit.push_back(spot);
            }
        }
    }
}

/// Iterator over the elements of a group, see [`StabilizerChain::elements`]
pub struct Elements<'a> {
    degree: usize,
    transversals: Vec<Vec<&'a Permutation>>,
    indices: Vec<usize>,
    exhausted: bool,
}

impl Iterator for Elements<'_> {
    type Item = Permutation;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        // Every element factors uniquely as `u_k * … * u_1 * u_0` with `u_i` from the transversal of level `i`
        let mut element = Permutation::identity(self.degree);
        for (transversal, &idx) in self.transversals.iter().zip(&self.indices).rev() {
            element.compose_into(transversal[idx]);
        }

        self.exhausted = true;
        for (transversal, idx) in self.transversals.iter().zip(&mut self.indices).rev() {
            *idx += 1;

            if *idx < transversal.len() {
                self.exhausted = false;
                break;
            }

            *idx = 0;
        }

        Some(element)
    }
}
