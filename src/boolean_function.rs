//! Boolean combining functions, viewed both as a term table and as a truth table.

use crate::lfsr_combiner_error::LfsrCombinerError;
use crate::{BitVector, TermTable, TruthTable, TruthTableImpl};
use log::debug;
use std::fmt::Display;
use std::sync::OnceLock;

/// A Boolean function of a fixed number of variables.
///
/// The function is available both as a [TermTable] (its algebraic normal form) and as a [TruthTable]. It is built from
/// one of them and derives the other on first use; both views always agree on every input.
///
/// Arguments are bit vectors of length [arity](BooleanFunction::arity), bit 0 being the first variable. For example
/// `0b01101` means $x_0 = 1$, $x_1 = 0$, $x_2 = 1$, $x_3 = 1$ and $x_4 = 0$.
///
/// The function is immutable and can be shared between threads.
///
/// # Example
/// ```rust
/// use lfsr_combiner::{BitVector, BooleanFunction};
///
/// let function = BooleanFunction::from_string(3, "1 + x1 x2 + (x1 + 1) x3").unwrap();
/// assert_eq!(function.arity(), 3);
/// assert_eq!(function.at(0b011), 0);
/// assert_eq!(function.evaluate(&BitVector::from_bits(&[1, 0, 1]).unwrap()).unwrap(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BooleanFunction {
    arity: usize,
    representation: Representation,
}

/// The representation a function was built from, and the lazily derived other one.
#[derive(Debug, Clone)]
enum Representation {
    Terms {
        term_table: TermTable,
        truth_table: OnceLock<TruthTable>,
    },
    Truth {
        truth_table: TruthTable,
        term_table: OnceLock<TermTable>,
    },
}

impl BooleanFunction {
    /// Creates a Boolean function from an expression, with variables indexed from 1.
    ///
    /// See [BooleanFunction::from_string_indexed] for the expression syntax.
    pub fn from_string(arity: usize, expression: &str) -> Result<Self, LfsrCombinerError> {
        Self::from_string_indexed(arity, expression, false)
    }

    /// Creates a Boolean function from an expression.
    ///
    /// Consider the example string `"1 + x1 x2 + (x1 + 1) x3"`. Allowable symbols are the constants `0` and `1`,
    /// variables of the form `xN` where `N` is the index of the variable, parentheses for grouping terms, and `+` for
    /// adding terms over GF(2). Adjacent variables, constants and groups are multiplied together. Whitespace is ignored.
    ///
    /// # Parameters
    /// - `arity`: The number of variables, at most [MAX_ARITY](crate::term_table::MAX_ARITY).
    /// - `expression`: The expression to parse.
    /// - `index_from_zero`: If `true`, variables are indexed from 0, otherwise from 1.
    ///
    /// # Returns
    /// The Boolean function, or an error if the arity is out of range or the expression is malformed.
    pub fn from_string_indexed(
        arity: usize,
        expression: &str,
        index_from_zero: bool,
    ) -> Result<Self, LfsrCombinerError> {
        Ok(Self::from_term_table(TermTable::parse(
            arity,
            expression,
            index_from_zero,
        )?))
    }

    /// Wraps a term table; the truth table is derived on first use.
    pub fn from_term_table(term_table: TermTable) -> Self {
        BooleanFunction {
            arity: term_table.arity(),
            representation: Representation::Terms {
                term_table,
                truth_table: OnceLock::new(),
            },
        }
    }

    /// Wraps a truth table; the term table is derived on first use.
    pub fn from_truth_table(truth_table: TruthTable) -> Self {
        BooleanFunction {
            arity: truth_table.arity(),
            representation: Representation::Truth {
                truth_table,
                term_table: OnceLock::new(),
            },
        }
    }

    /// Number of arguments of the function.
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Value of the function for an argument vector of length [arity](BooleanFunction::arity).
    ///
    /// # Returns
    /// The output bit, or [LfsrCombinerError::LengthMismatch] if the vector length differs from the arity.
    pub fn evaluate(&self, args: &BitVector) -> Result<u8, LfsrCombinerError> {
        if args.len() != self.arity {
            return Err(LfsrCombinerError::LengthMismatch {
                expected: self.arity,
                actual: args.len(),
            });
        }
        Ok(self.evaluate_packed(args.to_u64()))
    }

    /// Value of the function for the low-order [arity](BooleanFunction::arity) bits of `args`.
    ///
    /// Higher bits are discarded. This is equivalent to calling [BooleanFunction::evaluate] on
    /// `BitVector::from_value(self.arity(), args)`; narrower integers can be passed with `.into()`.
    pub fn at(&self, args: u64) -> u8 {
        self.evaluate_packed(BitVector::from_value(self.arity, args).to_u64())
    }

    /// `args` is lower than $2^n$.
    fn evaluate_packed(&self, args: u64) -> u8 {
        match &self.representation {
            Representation::Truth { truth_table, .. } => truth_table.at_index_unchecked(args),
            Representation::Terms {
                term_table,
                truth_table,
            } => match truth_table.get() {
                Some(truth_table) => truth_table.at_index_unchecked(args),
                None => term_table.evaluate(args),
            },
        }
    }

    /// Algebraic normal form of the function.
    pub fn term_table(&self) -> &TermTable {
        match &self.representation {
            Representation::Terms { term_table, .. } => term_table,
            Representation::Truth {
                truth_table,
                term_table,
            } => term_table.get_or_init(|| truth_table.algebraic_normal_form()),
        }
    }

    /// Truth table of the function, built from the term table on first use.
    ///
    /// # Returns
    /// The truth table, or [LfsrCombinerError::TooBigVariableCount] if the arity is too big for a dense table.
    pub fn truth_table(&self) -> Result<&TruthTable, LfsrCombinerError> {
        match &self.representation {
            Representation::Truth { truth_table, .. } => Ok(truth_table),
            Representation::Terms {
                term_table,
                truth_table,
            } => {
                if let Some(truth_table) = truth_table.get() {
                    return Ok(truth_table);
                }
                debug!("materializing truth table of {}-variable function", self.arity);
                let built = term_table.build_truth_table()?;
                Ok(truth_table.get_or_init(|| built))
            }
        }
    }
}

impl From<TermTable> for BooleanFunction {
    fn from(term_table: TermTable) -> Self {
        Self::from_term_table(term_table)
    }
}

impl From<TruthTable> for BooleanFunction {
    fn from(truth_table: TruthTable) -> Self {
        Self::from_truth_table(truth_table)
    }
}

/// Functions are equal when their algebraic normal forms are, which is a canonical representation.
impl PartialEq for BooleanFunction {
    fn eq(&self, other: &Self) -> bool {
        self.arity == other.arity && self.term_table() == other.term_table()
    }
}

impl Eq for BooleanFunction {}

/// Algebraic normal form, variables indexed from 0.
impl Display for BooleanFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.term_table())
    }
}
