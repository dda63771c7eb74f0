//! Iterators for truth tables.

use crate::{TruthTable, TruthTableImpl};

/// Iterator over the successive outputs of a truth table.
///
/// Example:
/// ```rust
/// use lfsr_combiner::TruthTable;
///
/// let truth_table = TruthTable::from_hex_string_truth_table("1e").unwrap();
/// let mut iterator = truth_table.iter();
/// assert_eq!(iterator.next(), Some(0));
/// assert_eq!(iterator.next(), Some(1));
/// assert_eq!(iterator.next(), Some(1));
/// assert_eq!(iterator.next(), Some(1));
/// assert_eq!(iterator.next(), Some(1));
/// assert_eq!(iterator.next(), Some(0));
/// assert_eq!(iterator.next(), Some(0));
/// assert_eq!(iterator.next(), Some(0));
/// assert_eq!(iterator.next(), None);
/// ```
#[derive(Debug, Clone)]
pub struct TruthTableIterator {
    current_input: u64,
    max_input: u64,
    inner_truth_table: TruthTable,
}

impl TruthTableIterator {
    pub(crate) fn new(truth_table: TruthTable) -> Self {
        TruthTableIterator {
            current_input: 0,
            max_input: truth_table.get_max_input_value(),
            inner_truth_table: truth_table,
        }
    }
}

impl Iterator for TruthTableIterator {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_input > self.max_input {
            return None;
        }
        let output = self
            .inner_truth_table
            .at_index_unchecked(self.current_input);
        self.current_input += 1;
        Some(output)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.max_input + 1).saturating_sub(self.current_input) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TruthTableIterator {}
