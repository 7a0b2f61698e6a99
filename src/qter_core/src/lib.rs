#![warn(clippy::pedantic)]
#![allow(clippy::missing_panics_doc)]

//! Permutations, permutation groups, and the notation used to write them down.
//!
//! Facelets are zero based everywhere in the API and one based whenever they are printed or parsed, like in GAP.

pub mod group;
pub mod math;
pub mod permutation;
pub mod puzzle_parser;

pub use group::{ConjugacyClass, GroupError, PermutationGroup};
pub use permutation::{Permutation, PermutationError};
pub use puzzle_parser::{ParseError, PuzzleDefinition, parse_puzzle};
