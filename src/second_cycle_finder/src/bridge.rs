use itertools::Itertools;
use log::{debug, trace};
use qter_core::{Permutation, PermutationGroup};

use crate::{
    FirstCycle, SearchError, SearchOptions, SharedComponent,
    cubie::{CORNER_FACELETS, EDGE_FACELETS, cubie_of},
    working,
};

/// The subgroup that leaves the first cycle alone, plus extra generators that cycle each block of untouched cubies together with a shared component of the first cycle
#[derive(Clone, Debug)]
pub struct BridgeGenerators {
    stabilizer: PermutationGroup,
    bridges: Vec<Permutation>,
}

impl BridgeGenerators {
    /// Fixes every facelet that the first cycle moves
    #[must_use]
    pub fn stabilizer(&self) -> &PermutationGroup {
        &self.stabilizer
    }

    #[must_use]
    pub fn bridges(&self) -> &[Permutation] {
        &self.bridges
    }

    /// The generators of the stabilizer followed by the bridges
    pub fn all_generators(&self) -> impl Iterator<Item = &Permutation> {
        self.stabilizer.generators().iter().chain(&self.bridges)
    }

    /// The group that second cycles are drawn from
    ///
    /// # Errors
    ///
    /// Only fails if a bridge acts on the wrong number of facelets.
    pub fn candidate_group(&self) -> Result<PermutationGroup, SearchError> {
        Ok(self.stabilizer.closure(self.bridges.iter().cloned())?)
    }
}

/// Build the bridge generators for a first cycle.
///
/// # Errors
///
/// Fails if a shared component was requested but the first cycle doesn't have exactly one, or if a corner bridge can't be made from moves of the cube.
pub fn build_bridge_generators(
    group: &PermutationGroup,
    first_cycle: &FirstCycle,
    options: &SearchOptions,
) -> Result<BridgeGenerators, SearchError> {
    let permutation = first_cycle.permutation();

    let shared_edge = options
        .share_edge
        .then(|| shared_component(permutation, SharedComponent::Edge))
        .transpose()?;
    let shared_corner = options
        .share_corner
        .then(|| shared_component(permutation, SharedComponent::Corner))
        .transpose()?;

    let moved = permutation.moved_points();
    let stabilizer = group.stabilizer(&moved)?;

    debug!(
        working!("The {} facelets moved by {} are fixed by a subgroup of order {}"),
        moved.len(),
        first_cycle,
        stabilizer.order()
    );

    let mut bridges = vec![];

    if let Some(shared_edge) = shared_edge {
        for block in cubie_aligned_blocks(&stabilizer, &untouched(&EDGE_FACELETS, &moved))? {
            if block.len() < 2 {
                continue;
            }

            bridges.push(Permutation::from_cycle(group.degree(), &block)?.compose(&shared_edge));
        }
    }

    if let Some(shared_corner) = shared_corner {
        for block in cubie_aligned_blocks(&stabilizer, &untouched(&CORNER_FACELETS, &moved))? {
            if block.len() < 2 {
                continue;
            }

            let cycle = Permutation::from_cycle(group.degree(), &block)?;
            bridges.push(valid_corner_flip(group, &cycle, &shared_corner)?);
        }
    }

    debug!(working!("Built {} bridge generators"), bridges.len());
    for bridge in &bridges {
        trace!("Bridge {bridge}");
    }

    Ok(BridgeGenerators {
        stabilizer,
        bridges,
    })
}

/// The only cycle of the permutation with the length of the component
///
/// # Errors
///
/// Fails if there is no such cycle or more than one.
pub fn shared_component(
    permutation: &Permutation,
    component: SharedComponent,
) -> Result<Permutation, SearchError> {
    let candidates = permutation
        .cycles()
        .iter()
        .filter(|cycle| cycle.len() == component.cycle_length())
        .collect_vec();

    match candidates.as_slice() {
        [] => Err(SearchError::MissingSharedComponent { component }),
        [cycle] => Ok(Permutation::from_cycle(permutation.degree(), cycle)?),
        _ => Err(SearchError::AmbiguousSharedComponent {
            component,
            count: candidates.len(),
        }),
    }
}

/// A corner twist can't happen on its own, only alongside an opposite twist. Given two twists, pick the direction of `y` that makes `x * y` a position of the cube.
///
/// # Errors
///
/// Fails if neither `x * y` nor `x * y⁻¹` is in the group.
pub fn valid_corner_flip(
    group: &PermutationGroup,
    x: &Permutation,
    y: &Permutation,
) -> Result<Permutation, SearchError> {
    let product = x * y;
    if group.is_member(&product) {
        return Ok(product);
    }

    let product = x * &y.inverse();
    if group.is_member(&product) {
        return Ok(product);
    }

    Err(SearchError::InvalidParityInput {
        x: x.clone(),
        y: y.clone(),
    })
}

fn untouched(facelets: &[usize], moved: &[usize]) -> Vec<usize> {
    facelets
        .iter()
        .copied()
        .filter(|facelet| !moved.contains(facelet))
        .collect()
}

/// Blocks of the stabilizer on `points`, one orbit at a time. An orbit holding two facelets of the same cubie is split into the blocks that keep cubies together; any other orbit gets a minimal block system.
fn cubie_aligned_blocks(
    stabilizer: &PermutationGroup,
    points: &[usize],
) -> Result<Vec<Vec<usize>>, SearchError> {
    let mut blocks = vec![];

    for orbit in stabilizer.orbits(points)? {
        let seed = orbit
            .iter()
            .map(|&facelet| {
                cubie_of(facelet)
                    .facelets()
                    .iter()
                    .copied()
                    .filter(|v| orbit.contains(v))
                    .collect_vec()
            })
            .find(|seed| seed.len() > 1);

        match seed {
            Some(seed) => blocks.extend(stabilizer.blocks_with_seed(&orbit, &seed)?),
            None => blocks.extend(stabilizer.blocks(&orbit)?),
        }
    }

    blocks.sort_unstable();
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use qter_core::Permutation;

    use crate::{
        SearchError, SearchOptions, SecondCycleFinder, SharedComponent,
        cubie::cubie_of,
    };

    use super::{build_bridge_generators, shared_component, valid_corner_flip};

    fn perm(cycles: &[&[usize]]) -> Permutation {
        Permutation::from_cycles(48, cycles).unwrap()
    }

    #[test]
    fn corner_flips_respect_twist_parity() {
        let finder = SecondCycleFinder::cube3().unwrap();
        let group = finder.puzzle().group();

        // UFL and UFR both twisted counterclockwise isn't a position of the cube
        let x = perm(&[&[5, 10, 16]]);
        let y = perm(&[&[7, 18, 24]]);

        let flip = valid_corner_flip(group, &x, &y).unwrap();
        assert_eq!(flip, perm(&[&[5, 10, 16], &[7, 24, 18]]));
        assert!(!group.is_member(&(&x * &y)));

        assert!(matches!(
            valid_corner_flip(group, &x, &Permutation::identity(48)),
            Err(SearchError::InvalidParityInput { .. })
        ));
    }

    #[test]
    fn shared_components() {
        let finder = SecondCycleFinder::cube3().unwrap();
        let u = finder.puzzle().apply_moves("U").unwrap();

        assert!(matches!(
            shared_component(&u, SharedComponent::Edge),
            Err(SearchError::MissingSharedComponent {
                component: SharedComponent::Edge
            })
        ));

        let two_swaps = perm(&[&[1, 33], &[3, 9], &[5, 10, 16]]);
        assert!(matches!(
            shared_component(&two_swaps, SharedComponent::Edge),
            Err(SearchError::AmbiguousSharedComponent { count: 2, .. })
        ));
        assert_eq!(
            shared_component(&two_swaps, SharedComponent::Corner).unwrap(),
            perm(&[&[5, 10, 16]])
        );
    }

    #[test]
    fn bridges_stay_off_the_first_cycle() {
        let finder = SecondCycleFinder::cube3().unwrap();
        let first_cycle = finder.first_cycle("U L F L' R2").unwrap();
        let options = SearchOptions {
            share_edge: true,
            share_corner: true,
            target_order: 24,
        };

        let bridge = build_bridge_generators(finder.puzzle().group(), &first_cycle, &options).unwrap();
        let moved = first_cycle.permutation().moved_points();
        let edge = shared_component(first_cycle.permutation(), SharedComponent::Edge).unwrap();
        let corner = shared_component(first_cycle.permutation(), SharedComponent::Corner).unwrap();

        assert!(!bridge.bridges().is_empty());
        assert_eq!(
            bridge.all_generators().count(),
            bridge.stabilizer().generators().len() + bridge.bridges().len()
        );

        for generator in bridge.stabilizer().generators() {
            assert!(moved.iter().all(|&facelet| generator.image(facelet) == facelet));
        }

        for generator in bridge.bridges() {
            // Corners go to corners and edges go to edges
            for facelet in 0..48 {
                assert_eq!(
                    cubie_of(generator.image(facelet)).kind(),
                    cubie_of(facelet).kind()
                );
            }

            // On the first cycle's facelets only the shared components move
            for &facelet in &moved {
                let image = generator.image(facelet);

                assert!(
                    image == facelet
                        || image == edge.image(facelet)
                        || image == corner.image(facelet)
                        || image == corner.inverse().image(facelet)
                );
            }
        }
    }
}
