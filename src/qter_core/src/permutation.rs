use std::{
    cmp::Ordering,
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
    ops::Mul,
    sync::OnceLock,
};

use itertools::Itertools;
use thiserror::Error;

use crate::math::discrete_math::lcm_iter;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    #[error("Facelet {} is out of range for a permutation on {degree} facelets", .point + 1)]
    PointOutOfRange { point: usize, degree: usize },
    #[error("Facelet {} appears more than once", .0 + 1)]
    RepeatedPoint(usize),
}

/// A bijection on the facelets `0..degree`.
///
/// Composition follows the convention that `a * b` applies `a` first and then `b`, so the image of
/// `x` under `a * b` is `b(a(x))`. When printed, facelets are one based like in GAP.
#[derive(Clone)]
pub struct Permutation {
    mapping: Box<[usize]>,
    // Computed on demand from `mapping`
    cycles: OnceLock<Vec<Vec<usize>>>,
}

impl Permutation {
    /// The permutation that maps every facelet to itself
    #[must_use]
    pub fn identity(degree: usize) -> Permutation {
        Permutation {
            mapping: (0..degree).collect(),
            cycles: OnceLock::new(),
        }
    }

    /// Create a permutation from the list of images of each facelet
    ///
    /// # Errors
    ///
    /// Fails if the mapping is not a bijection on `0..mapping.len()`.
    pub fn from_mapping(mapping: Vec<usize>) -> Result<Permutation, PermutationError> {
        let degree = mapping.len();
        let mut seen = vec![false; degree];

        for &image in &mapping {
            if image >= degree {
                return Err(PermutationError::PointOutOfRange {
                    point: image,
                    degree,
                });
            }

            if seen[image] {
                return Err(PermutationError::RepeatedPoint(image));
            }

            seen[image] = true;
        }

        Ok(Permutation {
            mapping: mapping.into_boxed_slice(),
            cycles: OnceLock::new(),
        })
    }

    /// Create a permutation from a list of disjoint cycles. Cycles of length zero or one are ignored.
    ///
    /// # Errors
    ///
    /// Fails if a facelet is out of range or appears in more than one place.
    pub fn from_cycles<C: AsRef<[usize]>>(
        degree: usize,
        cycles: &[C],
    ) -> Result<Permutation, PermutationError> {
        // Start with the identity permutation
        let mut mapping = (0..degree).collect_vec();
        let mut seen = vec![false; degree];

        for cycle in cycles {
            let cycle = cycle.as_ref();

            for &point in cycle {
                if point >= degree {
                    return Err(PermutationError::PointOutOfRange { point, degree });
                }

                if seen[point] {
                    return Err(PermutationError::RepeatedPoint(point));
                }

                seen[point] = true;
            }

            for (start, end) in cycle.iter().circular_tuple_windows() {
                mapping[*start] = *end;
            }
        }

        Ok(Permutation {
            mapping: mapping.into_boxed_slice(),
            cycles: OnceLock::new(),
        })
    }

    /// The cycle `points[0] → points[1] → … → points[0]`
    ///
    /// # Errors
    ///
    /// Fails if a facelet is out of range or repeated.
    pub fn from_cycle(degree: usize, points: &[usize]) -> Result<Permutation, PermutationError> {
        Permutation::from_cycles(degree, &[points])
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.mapping.len()
    }

    /// Where the facelet goes
    #[must_use]
    pub fn image(&self, point: usize) -> usize {
        self.mapping[point]
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.mapping.iter().enumerate().all(|(i, &v)| i == v)
    }

    /// The disjoint nontrivial cycles of the permutation. Every cycle starts at its smallest facelet
    /// and the cycles are sorted by that facelet.
    pub fn cycles(&self) -> &[Vec<usize>] {
        self.cycles.get_or_init(|| {
            let mut covered = vec![false; self.degree()];
            let mut cycles = vec![];

            for i in 0..self.degree() {
                if covered[i] {
                    continue;
                }

                covered[i] = true;
                let mut cycle = vec![i];
                let mut next = self.mapping[i];

                while next != i {
                    covered[next] = true;
                    cycle.push(next);
                    next = self.mapping[next];
                }

                if cycle.len() > 1 {
                    cycles.push(cycle);
                }
            }

            cycles
        })
    }

    /// Every facelet that the permutation doesn't fix, in increasing order
    #[must_use]
    pub fn moved_points(&self) -> Vec<usize> {
        self.mapping
            .iter()
            .enumerate()
            .filter(|(i, v)| i != *v)
            .map(|(i, _)| i)
            .collect()
    }

    /// Compose `other` onto the end of this permutation, so that `self` becomes `self * other`
    ///
    /// # Panics
    ///
    /// Panics if the permutations have different degrees.
    pub fn compose_into(&mut self, other: &Permutation) {
        assert_eq!(self.degree(), other.degree());

        for value in &mut self.mapping {
            *value = other.mapping[*value];
        }

        // Invalidate `cycles`
        self.cycles = OnceLock::new();
    }

    #[must_use]
    pub fn compose(&self, other: &Permutation) -> Permutation {
        let mut out = self.clone();
        out.compose_into(other);
        out
    }

    #[must_use]
    pub fn inverse(&self) -> Permutation {
        let mut mapping = vec![0; self.degree()];

        for (i, &v) in self.mapping.iter().enumerate() {
            mapping[v] = i;
        }

        Permutation {
            mapping: mapping.into_boxed_slice(),
            cycles: OnceLock::new(),
        }
    }

    /// Raise the permutation to a possibly negative power
    #[must_use]
    pub fn pow(&self, exponent: i64) -> Permutation {
        let base = if exponent < 0 {
            self.inverse()
        } else {
            self.clone()
        };

        let order = self.order();
        let mut remaining = exponent.unsigned_abs() % order;
        let mut square = base;
        let mut out = Permutation::identity(self.degree());

        while remaining > 0 {
            if remaining & 1 == 1 {
                out.compose_into(&square);
            }

            square = square.compose(&square);
            remaining >>= 1;
        }

        out
    }

    /// `g⁻¹ * self * g`
    #[must_use]
    pub fn conjugate(&self, g: &Permutation) -> Permutation {
        let mut out = g.inverse();
        out.compose_into(self);
        out.compose_into(g);
        out
    }

    /// The smallest positive `n` such that `selfⁿ` is the identity
    #[must_use]
    pub fn order(&self) -> u64 {
        lcm_iter(self.cycles().iter().map(|cycle| cycle.len() as u64))
    }
}

impl PartialEq for Permutation {
    fn eq(&self, other: &Self) -> bool {
        self.mapping == other.mapping
    }
}

impl Eq for Permutation {}

impl Hash for Permutation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mapping.hash(state);
    }
}

impl PartialOrd for Permutation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lexicographic on the list of images
impl Ord for Permutation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.mapping.cmp(&other.mapping)
    }
}

impl Mul for &Permutation {
    type Output = Permutation;

    fn mul(self, rhs: &Permutation) -> Permutation {
        self.compose(rhs)
    }
}

impl Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cycles().is_empty() {
            return write!(f, "()");
        }

        for cycle in self.cycles() {
            write!(f, "({})", cycle.iter().map(|v| v + 1).join(","))?;
        }

        Ok(())
    }
}

impl Debug for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}
