//! The corners and edges of the 3x3x3 in GAP's facelet numbering, and the Speffz letter scheme on top of it.
//!
//! Each face owns eight facelets numbered row by row with the center left out:
//!
//! ```text
//! 1 2 3
//! 4 . 5
//! 6 7 8
//! ```
//!
//! The faces come in the order U L F R B D. Facelets are zero based here, so one less than the numbers GAP prints.

pub const FACELET_COUNT: usize = 48;

/// The facelets of each corner, starting from the facelet on the U or D face
pub const CORNERS: [[usize; 3]; 8] = [
    [0, 8, 34],
    [2, 26, 32],
    [5, 10, 16],
    [7, 18, 24],
    [40, 15, 21],
    [42, 23, 29],
    [45, 13, 39],
    [47, 31, 37],
];

/// The facelets of each edge
pub const EDGES: [[usize; 2]; 12] = [
    [1, 33],
    [3, 9],
    [4, 25],
    [6, 17],
    [12, 19],
    [20, 27],
    [28, 35],
    [11, 36],
    [22, 41],
    [14, 43],
    [30, 44],
    [38, 46],
];

/// UBL
pub const CORNER_BUFFER: usize = 0;
/// DF
pub const EDGE_BUFFER: usize = 41;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CubieKind {
    Corner,
    Edge,
}

/// A piece of the cube. Its facelets always move together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cubie {
    kind: CubieKind,
    index: usize,
}

impl Cubie {
    #[must_use]
    pub fn kind(self) -> CubieKind {
        self.kind
    }

    #[must_use]
    pub fn facelets(self) -> &'static [usize] {
        match self.kind {
            CubieKind::Corner => &CORNERS[self.index],
            CubieKind::Edge => &EDGES[self.index],
        }
    }

    #[must_use]
    pub fn contains(self, facelet: usize) -> bool {
        self.facelets().contains(&facelet)
    }
}

const CUBIE_OF: [Cubie; FACELET_COUNT] = {
    let unassigned = Cubie {
        kind: CubieKind::Corner,
        index: usize::MAX,
    };
    let mut table = [unassigned; FACELET_COUNT];

    let mut i = 0;
    while i < CORNERS.len() {
        let mut j = 0;
        while j < 3 {
            assert!(table[CORNERS[i][j]].index == usize::MAX);
            table[CORNERS[i][j]] = Cubie {
                kind: CubieKind::Corner,
                index: i,
            };
            j += 1;
        }
        i += 1;
    }

    let mut i = 0;
    while i < EDGES.len() {
        let mut j = 0;
        while j < 2 {
            assert!(table[EDGES[i][j]].index == usize::MAX);
            table[EDGES[i][j]] = Cubie {
                kind: CubieKind::Edge,
                index: i,
            };
            j += 1;
        }
        i += 1;
    }

    // Every facelet belongs to a cubie
    let mut i = 0;
    while i < FACELET_COUNT {
        assert!(table[i].index != usize::MAX);
        i += 1;
    }

    table
};

const fn facelets_of_kind(kind: CubieKind) -> [usize; 24] {
    let mut out = [0; 24];
    let mut len = 0;

    let mut facelet = 0;
    while facelet < FACELET_COUNT {
        if matches!(
            (CUBIE_OF[facelet].kind, kind),
            (CubieKind::Corner, CubieKind::Corner) | (CubieKind::Edge, CubieKind::Edge)
        ) {
            out[len] = facelet;
            len += 1;
        }
        facelet += 1;
    }

    assert!(len == 24);
    out
}

/// Every corner facelet in increasing order
pub const CORNER_FACELETS: [usize; 24] = facelets_of_kind(CubieKind::Corner);
/// Every edge facelet in increasing order
pub const EDGE_FACELETS: [usize; 24] = facelets_of_kind(CubieKind::Edge);

/// The cubie that the facelet belongs to
///
/// # Panics
///
/// Panics if the facelet is not on the cube.
#[must_use]
pub fn cubie_of(facelet: usize) -> Cubie {
    CUBIE_OF[facelet]
}

#[must_use]
pub fn is_corner_facelet(facelet: usize) -> bool {
    cubie_of(facelet).kind == CubieKind::Corner
}

/// Whether the facelet lies on the U or D face
#[must_use]
pub fn is_ud_facelet(facelet: usize) -> bool {
    facelet < 8 || facelet >= 40
}

// Clockwise from the top left, corners and edges each get `a b c d` on every face
const LETTER_OFFSETS: [u8; 8] = [0, 0, 1, 3, 1, 3, 2, 2];

/// The lowercase Speffz letter of a facelet
///
/// # Panics
///
/// Panics if the facelet is not on the cube.
#[must_use]
pub fn letter(facelet: usize) -> char {
    assert!(facelet < FACELET_COUNT);

    #[allow(clippy::cast_possible_truncation)]
    let face = (facelet / 8) as u8;

    char::from(b'a' + 4 * face + LETTER_OFFSETS[facelet % 8])
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use itertools::Itertools;

    use crate::cube3::cube3;

    use super::{
        CORNER_BUFFER, CORNER_FACELETS, CORNERS, CubieKind, EDGE_BUFFER, EDGE_FACELETS, EDGES,
        FACELET_COUNT, cubie_of, is_ud_facelet, letter,
    };

    #[test]
    fn partition() {
        let all = CORNERS
            .iter()
            .flatten()
            .chain(EDGES.iter().flatten())
            .copied()
            .collect_vec();

        assert_eq!(all.len(), FACELET_COUNT);
        assert_eq!(all.iter().unique().count(), FACELET_COUNT);
        assert!(all.iter().all(|&facelet| facelet < FACELET_COUNT));

        for facelet in 0..FACELET_COUNT {
            let cubie = cubie_of(facelet);
            assert!(cubie.contains(facelet));
            assert_eq!(
                cubie.facelets().len(),
                match cubie.kind() {
                    CubieKind::Corner => 3,
                    CubieKind::Edge => 2,
                }
            );
        }

        let corner_facelets = CORNER_FACELETS.iter().collect::<HashSet<_>>();
        assert!(EDGE_FACELETS.iter().all(|v| !corner_facelets.contains(v)));
        assert!(CORNER_FACELETS.is_sorted());
        assert!(EDGE_FACELETS.is_sorted());
    }

    #[test]
    fn generators_move_whole_cubies() {
        let puzzle = cube3().unwrap();

        for generator in puzzle.group().generators() {
            for cubie in (0..FACELET_COUNT).map(cubie_of).unique() {
                let image = cubie
                    .facelets()
                    .iter()
                    .map(|&facelet| generator.image(facelet))
                    .collect_vec();

                let target = cubie_of(image[0]);
                assert_eq!(
                    image.iter().sorted().collect_vec(),
                    target.facelets().iter().sorted().collect_vec(),
                    "{generator} splits {cubie:?}"
                );
            }
        }
    }

    #[test]
    fn corners_start_on_u_or_d() {
        for corner in CORNERS {
            assert!(is_ud_facelet(corner[0]));
            assert_eq!(corner.iter().filter(|&&v| is_ud_facelet(v)).count(), 1);
        }
    }

    #[test]
    fn letters() {
        assert_eq!(letter(CORNER_BUFFER), 'a');
        assert_eq!(letter(EDGE_BUFFER), 'u');
        assert_eq!(letter(1), 'a');
        assert_eq!(letter(2), 'b');
        assert_eq!(letter(7), 'c');
        assert_eq!(letter(47), 'w');

        // Each letter names one corner facelet and one edge facelet
        let corner_letters = CORNER_FACELETS.iter().map(|&v| letter(v)).unique().count();
        let edge_letters = EDGE_FACELETS.iter().map(|&v| letter(v)).unique().count();
        assert_eq!(corner_letters, 24);
        assert_eq!(edge_letters, 24);
    }
}
