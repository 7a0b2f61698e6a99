#![warn(clippy::pedantic)]
#![allow(clippy::missing_panics_doc)]

use std::{fmt::Display, time::Instant};

use log::{info, warn};
use qter_core::{GroupError, ParseError, Permutation, PermutationError, PuzzleDefinition};
use thiserror::Error;

pub mod bridge;
pub mod cube3;
pub mod cubie;
pub mod search;
pub mod speffz;

pub use search::SearchResult;
pub use speffz::{SpeffzEncoding, encode};

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}

/// A cycle of the first cycle that the second cycle is allowed to touch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SharedComponent {
    /// A 2-cycle
    Edge,
    /// A 3-cycle
    Corner,
}

impl SharedComponent {
    #[must_use]
    pub fn cycle_length(self) -> usize {
        match self {
            SharedComponent::Edge => 2,
            SharedComponent::Corner => 3,
        }
    }
}

impl Display for SharedComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SharedComponent::Edge => write!(f, "edge"),
            SharedComponent::Corner => write!(f, "corner"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("The first cycle has no {component} component ({}-cycle) to share", .component.cycle_length())]
    MissingSharedComponent { component: SharedComponent },
    #[error("The first cycle has {count} {component} components ({}-cycles) but exactly one can be shared", .component.cycle_length())]
    AmbiguousSharedComponent {
        component: SharedComponent,
        count: usize,
    },
    #[error("Neither {x} * {y} nor its flipped counterpart is a position of the cube")]
    InvalidParityInput { x: Permutation, y: Permutation },
    #[error("Expected a puzzle with {} facelets but it has {actual}", cubie::FACELET_COUNT)]
    FaceletCount { actual: usize },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Permutation(#[from] PermutationError),
    #[error(transparent)]
    Group(#[from] GroupError),
}

impl SearchError {
    /// Whether the error is a problem with the whole run rather than with one first cycle
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SearchError::MissingSharedComponent { .. }
                | SearchError::AmbiguousSharedComponent { .. }
        )
    }
}

/// What a second cycle may share with the first cycle and what order it must have
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    pub share_edge: bool,
    pub share_corner: bool,
    pub target_order: u64,
}

/// The first phase of an algorithm, as the moves that were written down and the permutation they make
#[derive(Clone, Debug)]
pub struct FirstCycle {
    moves: String,
    permutation: Permutation,
}

impl FirstCycle {
    #[must_use]
    pub fn new(moves: String, permutation: Permutation) -> FirstCycle {
        FirstCycle { moves, permutation }
    }

    #[must_use]
    pub fn moves(&self) -> &str {
        &self.moves
    }

    #[must_use]
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }
}

impl Display for FirstCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}`", self.moves)
    }
}

/// Finds second cycles on the 3x3x3 for any number of first cycles
#[derive(Clone, Debug)]
pub struct SecondCycleFinder {
    puzzle: PuzzleDefinition,
}

impl SecondCycleFinder {
    /// The puzzle must use the facelet numbering of the cubie tables in [`cubie`]
    ///
    /// # Errors
    ///
    /// Fails if the puzzle doesn't have exactly 48 facelets.
    pub fn new(puzzle: PuzzleDefinition) -> Result<SecondCycleFinder, SearchError> {
        if puzzle.facelet_count() != cubie::FACELET_COUNT {
            return Err(SearchError::FaceletCount {
                actual: puzzle.facelet_count(),
            });
        }

        Ok(SecondCycleFinder { puzzle })
    }

    /// A finder for the built in 3x3x3
    ///
    /// # Errors
    ///
    /// Only fails if the built in definition is broken.
    pub fn cube3() -> Result<SecondCycleFinder, SearchError> {
        SecondCycleFinder::new(cube3::cube3()?)
    }

    #[must_use]
    pub fn puzzle(&self) -> &PuzzleDefinition {
        &self.puzzle
    }

    /// Turn a move sequence into a first cycle
    ///
    /// # Errors
    ///
    /// Fails if the move sequence doesn't parse.
    pub fn first_cycle(&self, moves: &str) -> Result<FirstCycle, SearchError> {
        Ok(FirstCycle::new(
            moves.trim().to_owned(),
            self.puzzle.apply_moves(moves)?,
        ))
    }

    /// Search for the second cycles of one first cycle. Finding nothing of the target order gives an empty result rather than an error.
    ///
    /// # Errors
    ///
    /// Fails if a shared component was requested but the first cycle doesn't have exactly one, or if a corner bridge can't be made from moves of the cube.
    pub fn search(
        &self,
        first_cycle: &FirstCycle,
        options: &SearchOptions,
    ) -> Result<SearchResult, SearchError> {
        info!(
            start!("Searching for second cycles of order {} for {}..."),
            options.target_order, first_cycle
        );
        let now = Instant::now();

        let bridge = bridge::build_bridge_generators(self.puzzle.group(), first_cycle, options)?;
        let result = search::search_candidates(&bridge, options.target_order)?;

        info!(
            success!("Found {} classes of second cycles for {} in {:.3}s"),
            result.kept_classes().len(),
            first_cycle,
            now.elapsed().as_secs_f64()
        );

        Ok(result)
    }

    /// Search every first cycle in turn, keyed by its index in `first_cycles`. The searches happen as the iterator is pulled, and first cycles without the requested shared components are logged and passed through as errors.
    pub fn search_all<'a>(
        &'a self,
        first_cycles: &'a [FirstCycle],
        options: &'a SearchOptions,
    ) -> impl Iterator<Item = (usize, Result<SearchResult, SearchError>)> + 'a {
        first_cycles.iter().enumerate().map(move |(i, first_cycle)| {
            let result = self.search(first_cycle, options);

            if let Err(e) = &result
                && !e.is_fatal()
            {
                warn!("Skipping first cycle {i} ({first_cycle}): {e}");
            }

            (i, result)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{SearchError, SecondCycleFinder};

    #[test]
    fn rejects_other_puzzles() {
        let puzzle = qter_core::parse_puzzle("A = (1,2,3)").unwrap();

        let error = SecondCycleFinder::new(puzzle).unwrap_err();

        assert!(matches!(error, SearchError::FaceletCount { actual: 3 }));
        assert_eq!(
            error.to_string(),
            "Expected a puzzle with 48 facelets but it has 3"
        );
    }

    #[test]
    fn first_cycles() {
        let finder = SecondCycleFinder::cube3().unwrap();
        let first_cycle = finder.first_cycle(" R U ").unwrap();

        assert_eq!(first_cycle.moves(), "R U");
        assert_eq!(first_cycle.to_string(), "`R U`");
        assert_eq!(first_cycle.permutation().order(), 105);
        assert!(matches!(
            finder.first_cycle("R X"),
            Err(SearchError::Parse(_))
        ));
    }
}
