use std::collections::HashMap;

use itertools::Itertools;
use pest::{Parser, iterators::Pair};
use pest_derive::Parser;
use thiserror::Error;

use crate::{
    group::{GroupError, PermutationGroup},
    permutation::{Permutation, PermutationError},
};

#[derive(Parser)]
#[grammar = "./puzzle.pest"]
struct NotationParser;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
    #[error("Facelets are numbered starting from one")]
    FaceletZero,
    #[error("The number {0} is too large")]
    NumberTooLarge(String),
    #[error("The generator `{0}` is defined more than once")]
    DuplicateGenerator(String),
    #[error("The generator `{0}` doesn't exist")]
    UnknownGenerator(String),
    #[error(transparent)]
    Permutation(#[from] PermutationError),
    #[error(transparent)]
    Group(#[from] GroupError),
}

/// A puzzle described by named generators in GAP style cycle notation, for example
///
/// ```text
/// U = (1,3,8,6)(2,5,7,4)(9,33,25,17)(10,34,26,18)(11,35,27,19)
/// ```
///
/// Facelets are written one based and stored zero based.
#[derive(Clone, Debug)]
pub struct PuzzleDefinition {
    generators: HashMap<String, Permutation>,
    group: PermutationGroup,
}

impl PuzzleDefinition {
    /// The group generated by every move of the puzzle
    #[must_use]
    pub fn group(&self) -> &PermutationGroup {
        &self.group
    }

    #[must_use]
    pub fn facelet_count(&self) -> usize {
        self.group.degree()
    }

    #[must_use]
    pub fn get_generator(&self, name: &str) -> Option<&Permutation> {
        self.generators.get(name)
    }

    /// Compose a move sequence like `U L F L' R2` into a single permutation. A trailing number raises the move to that power and a `'` inverts it.
    ///
    /// # Errors
    ///
    /// Fails if the sequence doesn't parse or refers to a generator that doesn't exist.
    pub fn apply_moves(&self, sequence: &str) -> Result<Permutation, ParseError> {
        let pairs = NotationParser::parse(Rule::sequence, sequence).map_err(Box::new)?;
        let mut permutation = self.group.identity();

        for move_pair in pairs.flatten().filter(|pair| pair.as_rule() == Rule::move_) {
            let mut name = "";
            let mut power = 1_i64;
            let mut inverse = false;

            for part in move_pair.into_inner() {
                match part.as_rule() {
                    Rule::name => name = part.as_str(),
                    Rule::power => {
                        power = part
                            .as_str()
                            .parse()
                            .map_err(|_| ParseError::NumberTooLarge(part.as_str().to_owned()))?;
                    }
                    Rule::prime => inverse = true,
                    _ => unreachable!(),
                }
            }

            let generator = self
                .generators
                .get(name)
                .ok_or_else(|| ParseError::UnknownGenerator(name.to_owned()))?;

            permutation.compose_into(&generator.pow(if inverse { -power } else { power }));
        }

        Ok(permutation)
    }
}

/// Parse a puzzle description made of lines like `NAME = (1,2,3)(4,5)`. The number of facelets is the largest facelet mentioned.
///
/// # Errors
///
/// Fails on syntax errors, facelet `0`, repeated facelets within a generator, or generators defined twice.
pub fn parse_puzzle(spec: &str) -> Result<PuzzleDefinition, ParseError> {
    let pairs = NotationParser::parse(Rule::description, spec).map_err(Box::new)?;

    let mut definitions = vec![];

    for pair in pairs.flatten().filter(|pair| pair.as_rule() == Rule::generator) {
        let mut inner = pair.into_inner();
        let (Some(name), Some(permutation)) = (inner.next(), inner.next()) else {
            unreachable!("a generator is a name followed by a permutation");
        };

        definitions.push((name.as_str().to_owned(), parse_cycles(permutation)?));
    }

    let facelet_count = definitions
        .iter()
        .flat_map(|(_, cycles)| cycles.iter().flatten())
        .max()
        .map_or(1, |max| max + 1);

    let mut names = vec![];
    let mut generators = HashMap::new();

    for (name, cycles) in definitions {
        let permutation = Permutation::from_cycles(facelet_count, &cycles)?;

        if generators.insert(name.clone(), permutation).is_some() {
            return Err(ParseError::DuplicateGenerator(name));
        }

        names.push(name);
    }

    let group = PermutationGroup::new(
        facelet_count,
        names.iter().map(|name| generators[name].clone()).collect_vec(),
    )?;

    Ok(PuzzleDefinition { generators, group })
}

fn parse_cycles(permutation: Pair<'_, Rule>) -> Result<Vec<Vec<usize>>, ParseError> {
    let mut cycles = vec![];

    for cycle_pair in permutation.into_inner() {
        match cycle_pair.as_rule() {
            Rule::identity => {}
            Rule::cycle => {
                cycles.push(
                    cycle_pair
                        .into_inner()
                        .map(|facelet| parse_facelet(facelet.as_str()))
                        .collect::<Result<Vec<_>, _>>()?,
                );
            }
            _ => unreachable!(),
        }
    }

    Ok(cycles)
}

fn parse_facelet(text: &str) -> Result<usize, ParseError> {
    let facelet = text
        .parse::<usize>()
        .map_err(|_| ParseError::NumberTooLarge(text.to_owned()))?;

    // Make facelets zero based
    facelet.checked_sub(1).ok_or(ParseError::FaceletZero)
}
