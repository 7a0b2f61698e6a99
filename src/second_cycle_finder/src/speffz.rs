use std::{collections::HashSet, fmt::Display};

use qter_core::Permutation;

use crate::cubie::{
    CORNER_BUFFER, Cubie, CubieKind, EDGE_BUFFER, cubie_of, is_corner_facelet, is_ud_facelet,
    letter,
};

/// A permutation of the cube written as the letters a blindfolded solver would memorize, corners first and then edges.
///
/// Uppercase letters are twists or flips of a single cubie in place.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpeffzEncoding {
    pub corners: String,
    pub edges: String,
}

impl Display for SpeffzEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.corners, self.edges)
    }
}

/// Encode a permutation of the 48 facelets of the cube
///
/// # Panics
///
/// Panics if the permutation moves a facelet that is not on the cube.
#[must_use]
pub fn encode(permutation: &Permutation) -> SpeffzEncoding {
    let (corner_cycles, edge_cycles) = permutation
        .cycles()
        .iter()
        .partition::<Vec<_>, _>(|cycle| is_corner_facelet(cycle[0]));

    SpeffzEncoding {
        corners: encode_part(&corner_cycles, CORNER_BUFFER),
        edges: encode_part(&edge_cycles, EDGE_BUFFER),
    }
}

fn encode_part(cycles: &[&Vec<usize>], buffer: usize) -> String {
    let mut visited = HashSet::from([cubie_of(buffer)]);
    let mut letters = String::new();

    if let Some(cycle) = cycles.iter().find(|cycle| cycle.contains(&buffer)) {
        let start = cycle.iter().position(|&v| v == buffer).unwrap_or_default();

        for step in 1..cycle.len() {
            let facelet = cycle[(start + step) % cycle.len()];

            if visited.contains(&cubie_of(facelet)) {
                break;
            }

            letters.push(letter(facelet));
        }
    }

    for cycle in cycles {
        if cycle.iter().any(|&facelet| visited.contains(&cubie_of(facelet))) {
            continue;
        }

        let origin = cubie_of(cycle[0]);

        if cycle.len() == origin.facelets().len() && cycle.iter().all(|&v| origin.contains(v)) {
            letters.push(twist_letter(cycle, origin).to_ascii_uppercase());
        } else {
            letters.push(letter(cycle[0]));

            // Ends on the origin cubie, at the latest when the cycle wraps around
            for &facelet in cycle[1..].iter().chain(&cycle[..1]) {
                letters.push(letter(facelet));

                if origin.contains(facelet) {
                    break;
                }
            }
        }

        visited.insert(origin);
    }

    letters
}

/// The letter naming a cubie that is twisted or flipped in place
fn twist_letter(cycle: &[usize], cubie: Cubie) -> char {
    match cubie.kind() {
        CubieKind::Corner => {
            // The facelet that gets sent onto the U or D face
            let ud_idx = cycle
                .iter()
                .position(|&v| is_ud_facelet(v))
                .unwrap_or_default();

            letter(cycle[(ud_idx + cycle.len() - 1) % cycle.len()])
        }
        CubieKind::Edge => letter(cycle[0]),
    }
}

#[cfg(test)]
mod tests {
    use qter_core::Permutation;

    use crate::cube3::cube3;

    use super::encode;

    fn perm(cycles: &[&[usize]]) -> Permutation {
        Permutation::from_cycles(48, cycles).unwrap()
    }

    #[test]
    fn identity_is_empty() {
        let encoding = encode(&Permutation::identity(48));

        assert_eq!(encoding.corners, "");
        assert_eq!(encoding.edges, "");
        assert_eq!(encoding.to_string(), ".");
    }

    #[test]
    fn two_corner_twists() {
        // UFL clockwise and UFR counterclockwise
        let encoding = encode(&perm(&[&[5, 10, 16], &[7, 18, 24]]));

        assert_eq!(encoding.to_string(), "IM.");
        assert_eq!(encoding.corners.len(), 2);
        assert!(encoding.corners.chars().all(|c| c.is_ascii_uppercase()));
        assert!(encoding.edges.is_empty());
        assert!(cube3().unwrap().group().is_member(&perm(&[&[5, 10, 16], &[7, 24, 18]])));
    }

    #[test]
    fn bottom_corner_twists() {
        // DFL and DFR, whose D facelet never leads its cycle
        let encoding = encode(&perm(&[&[15, 21, 40], &[23, 42, 29]]));
        assert_eq!(encoding.to_string(), "LK.");

        // The same corners twisted the other way
        let encoding = encode(&perm(&[&[15, 40, 21], &[23, 29, 42]]));
        assert_eq!(encoding.to_string(), "GP.");
    }

    #[test]
    fn edge_flips() {
        // UL and UF flipped in place
        let encoding = encode(&perm(&[&[3, 9], &[6, 17]]));

        assert_eq!(encoding.to_string(), ".DC");
    }

    #[test]
    fn buffer_chains() {
        // DF → UB → UR → DF on the edges
        let edges = perm(&[&[41, 1, 4], &[22, 33, 25]]);
        assert_eq!(encode(&edges).to_string(), ".ab");

        // UBL → UBR → UFR → UBL on the corners
        let corners = perm(&[&[0, 2, 7], &[8, 26, 18], &[34, 32, 24]]);
        assert_eq!(encode(&corners).to_string(), "bc.");
    }

    #[test]
    fn cycles_away_from_the_buffer() {
        // UL → UF → UR → UL
        let edges = perm(&[&[3, 6, 4], &[9, 17, 25]]);
        assert_eq!(encode(&edges).to_string(), ".dcbd");

        // The same cycle, but UL comes back flipped
        let flipped = perm(&[&[3, 6, 4, 9, 17, 25]]);
        assert_eq!(encode(&flipped).to_string(), ".dcbe");
    }

    #[test]
    fn is_deterministic() {
        let puzzle = cube3().unwrap();
        let permutation = puzzle.apply_moves("U L F L' R2").unwrap();

        assert_eq!(encode(&permutation), encode(&permutation));
        assert_eq!(encode(&permutation), encode(&permutation.clone()));
    }
}
