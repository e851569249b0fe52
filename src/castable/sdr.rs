//! Direct search for a system of distinct representatives.
//!
//! Each cost position contributes the set of sources that can pay it. A
//! partial assignment is extended one position at a time with any source not
//! already committed in that same prefix; the first prefix that covers every
//! position is accepted.

use crate::castable::assignment::Assignment;
use crate::castable::matrix::CompatibilityMatrix;
use crate::log::targets::SDR as LOG_SDR;

struct Search<'a> {
    columns: &'a [Vec<usize>],
    used: Vec<bool>,
    prefix: Vec<usize>,
    nodes: u64,
}

impl Search<'_> {
    fn extend(&mut self) -> bool {
        let columns = self.columns;
        let Some(column) = columns.get(self.prefix.len()) else {
            return true;
        };

        for &source in column {
            if self.used[source] {
                continue;
            }

            self.nodes += 1;
            self.used[source] = true;
            self.prefix.push(source);

            if self.extend() {
                return true;
            }

            self.prefix.pop();
            self.used[source] = false;
        }

        false
    }
}

/// Find an SDR, trying candidate sources in ascending index order.
///
/// Returns the first full assignment met, not a canonical one. Worst case is
/// exponential in the cost length.
pub fn search(matrix: &CompatibilityMatrix) -> Option<Assignment> {
    let columns = matrix.column_sets();

    if let Some(position) = columns.iter().position(Vec::is_empty) {
        log::trace!(target: LOG_SDR, "Position {position} has no candidates");
        return None;
    }

    let mut search = Search {
        columns: &columns,
        used: vec![false; matrix.sources()],
        prefix: Vec::with_capacity(columns.len()),
        nodes: 0,
    };

    let found = search.extend();
    log::trace!(
        target: LOG_SDR,
        "Explored {} nodes over {} positions: {}",
        search.nodes,
        columns.len(),
        if found { "found" } else { "exhausted" }
    );

    found.then(|| Assignment::from_sources(search.prefix))
}

pub fn is_feasible(matrix: &CompatibilityMatrix) -> bool {
    search(matrix).is_some()
}
