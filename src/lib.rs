//! # LFSR and Boolean combining function primitives

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code, unused_must_use)]
#![deny(missing_docs, unused_import_braces, unused_extern_crates)]

mod bit_vector;
mod boolean_function;
mod expression;
mod iterator;
mod lfsr;
mod lfsr_combiner_error;
pub mod term_table;
pub mod truth_table;
mod utils;

pub use crate::bit_vector::BitVector;
pub use crate::boolean_function::BooleanFunction;
pub use crate::iterator::TruthTableIterator;
pub use crate::lfsr::Lfsr;
pub use crate::lfsr_combiner_error::LfsrCombinerError;
pub use crate::term_table::TermTable;
pub use crate::truth_table::{BigTruthTable, SmallTruthTable, TruthTable, TruthTableImpl};
