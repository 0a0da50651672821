//! An [fst::Automaton] for fuzzy dictionary lookup under the optimal string alignment distance.
//!
//! The automaton walks one row of the edit-distance matrix per byte of the dictionary key. A key is
//! pruned as soon as no cell near the diagonal can still end within the allowed distance.
//!
//! The first `prefix` bytes of a key tolerate a single edit only. Misspellings in article text rarely
//! touch the first letters twice, and restricting the prefix cuts off most of the FST before the
//! expensive part of the search. [SpellOptions::prefix_length](super::SpellOptions) sets it.

use fst::Automaton;
use std::cmp::min;

/// Matrix state after consuming a prefix of a dictionary key.
#[derive(Clone, Debug)]
pub struct LevenshteinState {
    depth: usize,
    row: Vec<usize>,
    // row and byte one step back, needed for transpositions
    last: Option<(Vec<usize>, u8)>,
}

impl LevenshteinState {
    /// Distance between the query and the key consumed so far.
    pub fn dist(&self) -> usize {
        self.row[self.row.len() - 1]
    }
}

/// Matches all keys within `distance` edits of the query, allowing one edit inside the first `prefix` bytes.
#[derive(Debug, Clone)]
pub struct Levenshtein<'a> {
    query: &'a [u8],
    distance: usize,
    prefix: usize,
}

impl<'a> Levenshtein<'a> {
    pub fn new(query: &'a str, distance: usize, prefix: usize) -> Self {
        Levenshtein {
            query: query.as_bytes(),
            distance,
            prefix,
        }
    }

    /// The number of edits tolerated at a key position.
    fn allowed(&self, depth: usize) -> usize {
        if depth < self.prefix {
            min(1, self.distance)
        } else {
            self.distance
        }
    }

    fn step(&self, state: &LevenshteinState, byte: u8) -> Vec<usize> {
        let row = &state.row;
        let mut next = Vec::with_capacity(row.len());
        next.push(state.depth + 1);

        for i in 1..row.len() {
            let mut cost = if self.query[i - 1] == byte {
                row[i - 1]
            } else {
                1 + min(row[i - 1], min(row[i], next[i - 1]))
            };

            if let Some((last_row, last_byte)) = &state.last {
                if i > 1 && self.query[i - 2] == byte && self.query[i - 1] == *last_byte {
                    cost = min(cost, last_row[i - 2] + 1);
                }
            }

            next.push(cost);
        }

        next
    }

    /// Smallest cell within `allowed` of the diagonal. No key extending the current one can beat it.
    fn band_min(&self, row: &[usize], depth: usize, allowed: usize) -> usize {
        let start = depth.saturating_sub(allowed);
        let end = min(depth + allowed, self.query.len());

        row.get(start..=end)
            .and_then(|band| band.iter().min().copied())
            .unwrap_or(0)
    }
}

impl<'a> Automaton for Levenshtein<'a> {
    type State = Option<LevenshteinState>;

    fn start(&self) -> Self::State {
        Some(LevenshteinState {
            depth: 0,
            row: (0..=self.query.len()).collect(),
            last: None,
        })
    }

    fn is_match(&self, state: &Self::State) -> bool {
        matches!(state, Some(state) if state.dist() <= self.distance)
    }

    fn can_match(&self, state: &Self::State) -> bool {
        state.is_some()
    }

    fn accept(&self, state: &Self::State, byte: u8) -> Self::State {
        let state = state.as_ref()?;
        let row = self.step(state, byte);

        let allowed = self.allowed(state.depth);
        if self.band_min(&row, state.depth, allowed) > allowed {
            return None;
        }

        Some(LevenshteinState {
            depth: state.depth + 1,
            last: Some((state.row.clone(), byte)),
            row,
        })
    }
}
