//! Sparse algebraic normal form of Boolean functions.

use crate::lfsr_combiner_error::{
    LfsrCombinerError, AND_DIFFERENT_VAR_COUNT_PANIC_MSG, XOR_DIFFERENT_VAR_COUNT_PANIC_MSG,
};
use crate::utils::low_mask;
use crate::{expression, TruthTable, TruthTableImpl};
use itertools::Itertools;
use log::debug;
use num_bigint::BigUint;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::ops::{Add, AddAssign, BitAnd, BitAndAssign, BitXor, BitXorAssign, Mul, MulAssign};

/// Largest arity of a term table: monomials are packed in an `u64` bitmask, keeping the top bit clear.
pub const MAX_ARITY: usize = 63;

/// Algebraic normal form of a Boolean function, as a set of monomials over GF(2).
///
/// A monomial is an `u64` bitmask, bit $i$ set meaning that variable $x_i$ is part of the product.
/// The empty monomial `0` is the constant term 1. The function is the XOR of all its monomials:
///
/// $$f(x) = \bigoplus_{m} \prod_{i \in m} x_i$$
///
/// Adding a monomial already present removes it, so the set is always reduced.
///
/// # Example
/// ```rust
/// use lfsr_combiner::TermTable;
///
/// let term_table = TermTable::parse(3, "1 + x1 x2 + (x1 + 1) x3", false).unwrap();
/// assert_eq!(term_table.to_string(), "x0 x1 + x0 x2 + x2 + 1");
/// assert_eq!(term_table.evaluate(0b101), 1);
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TermTable {
    arity: usize,
    monomials: BTreeSet<u64>,
}

impl TermTable {
    /// The zero function of `arity` variables.
    ///
    /// # Returns
    /// The empty term table, or an error if `arity` is 0 or greater than [MAX_ARITY].
    pub fn new(arity: usize) -> Result<Self, LfsrCombinerError> {
        check_arity(arity)?;
        Ok(TermTable {
            arity,
            monomials: BTreeSet::new(),
        })
    }

    /// The constant one function of `arity` variables.
    pub fn one(arity: usize) -> Result<Self, LfsrCombinerError> {
        Self::from_monomials(arity, [0])
    }

    /// The single variable $x_{index}$, indexed from 0.
    pub fn variable(arity: usize, index: usize) -> Result<Self, LfsrCombinerError> {
        check_arity(arity)?;
        if index >= arity {
            return Err(LfsrCombinerError::IndexOutOfRange {
                index,
                length: arity,
            });
        }
        Self::from_monomials(arity, [1u64 << index])
    }

    /// Builds a term table from a list of monomials, as a sum over GF(2).
    ///
    /// Monomials present an even number of times cancel out.
    ///
    /// # Returns
    /// The term table, or an error if the arity is out of range or a monomial uses a variable at or above the arity.
    pub fn from_monomials(
        arity: usize,
        monomials: impl IntoIterator<Item = u64>,
    ) -> Result<Self, LfsrCombinerError> {
        let mut term_table = Self::new(arity)?;
        let mask = low_mask(arity);
        for monomial in monomials {
            if monomial & !mask != 0 {
                return Err(LfsrCombinerError::MonomialOutOfRange { monomial, arity });
            }
            term_table.toggle(monomial);
        }
        Ok(term_table)
    }

    /// Parses an expression such as `"1 + x1 x2 + (x1 + 1) x3"`.
    ///
    /// Allowed symbols are the constants `0` and `1`, variables `xN`, `+` for the sum over GF(2) (XOR) and parentheses
    /// for grouping. Adjacent constants, variables and groups are multiplied together. Whitespace is ignored.
    ///
    /// # Parameters
    /// - `arity`: The number of variables of the function.
    /// - `expression`: The expression to parse.
    /// - `index_from_zero`: If `true`, variables are numbered `x0` to `x{arity - 1}`, otherwise `x1` to `x{arity}`.
    ///
    /// # Returns
    /// The reduced term table, or an error if the arity is out of range (checked before parsing) or the expression is malformed.
    pub fn parse(
        arity: usize,
        expression: &str,
        index_from_zero: bool,
    ) -> Result<Self, LfsrCombinerError> {
        check_arity(arity)?;
        let term_table = expression::parse(arity, expression, index_from_zero)?;
        debug!(
            "parsed {:?} into {} monomials over {} variables",
            expression,
            term_table.len(),
            arity
        );
        Ok(term_table)
    }

    /// Derives the term table of a truth table.
    pub fn from_truth_table(truth_table: &TruthTable) -> Self {
        truth_table.algebraic_normal_form()
    }

    /// Term table whose monomials are the set bits of a packed ANF, as produced by the Möbius transform.
    pub(crate) fn from_packed_anf(arity: usize, anf: &BigUint) -> Self {
        let monomials = (0..anf.bits()).filter(|monomial| anf.bit(*monomial)).collect();
        debug!("derived term table of {} variables from truth table", arity);
        TermTable { arity, monomials }
    }

    #[inline]
    fn toggle(&mut self, monomial: u64) {
        if !self.monomials.remove(&monomial) {
            self.monomials.insert(monomial);
        }
    }

    /// Number of variables.
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of monomials.
    pub fn len(&self) -> usize {
        self.monomials.len()
    }

    /// Returns `true` for the zero function.
    pub fn is_empty(&self) -> bool {
        self.monomials.is_empty()
    }

    /// Returns `true` if `monomial` is part of the sum.
    pub fn contains(&self, monomial: u64) -> bool {
        self.monomials.contains(&monomial)
    }

    /// Monomials in increasing bitmask order.
    pub fn monomials(&self) -> impl Iterator<Item = u64> + '_ {
        self.monomials.iter().copied()
    }

    /// Algebraic degree, the largest number of variables in a monomial (0 for the zero function).
    pub fn degree(&self) -> usize {
        self.monomials
            .iter()
            .map(|monomial| monomial.count_ones() as usize)
            .max()
            .unwrap_or(0)
    }

    /// Value of the function for the input whose bit $i$ is $x_i$.
    ///
    /// A monomial evaluates to 1 when all its variables are set in `input`; the output is the parity of those monomials.
    pub fn evaluate(&self, input: u64) -> u8 {
        self.monomials
            .iter()
            .filter(|monomial| input & **monomial == **monomial)
            .fold(0, |acc, _| acc ^ 1)
    }

    /// Tabulates the function over all $2^n$ inputs.
    ///
    /// This costs $O(2^n \cdot m)$ for $m$ monomials.
    ///
    /// # Returns
    /// The truth table, or [LfsrCombinerError::TooBigVariableCount] if the arity exceeds
    /// [MAX_TRUTH_TABLE_ARITY](crate::truth_table::MAX_TRUTH_TABLE_ARITY).
    pub fn build_truth_table(&self) -> Result<TruthTable, LfsrCombinerError> {
        debug!(
            "building truth table of {} variables from {} monomials",
            self.arity,
            self.len()
        );
        TruthTable::from_fn(self.arity, |input| self.evaluate(input))
    }

    /// Expression in the parser syntax, variables numbered from 0 or from 1.
    ///
    /// Monomials are listed by decreasing degree. The zero function is written `0`.
    pub fn to_expression_string(&self, index_from_zero: bool) -> String {
        if self.monomials.is_empty() {
            return String::from("0");
        }
        let offset = if index_from_zero { 0 } else { 1 };
        self.monomials
            .iter()
            .sorted_by(|a, b| b.count_ones().cmp(&a.count_ones()).then(a.cmp(b)))
            .map(|monomial| {
                if *monomial == 0 {
                    return String::from("1");
                }
                (0..self.arity)
                    .filter(|i| monomial & (1u64 << i) != 0)
                    .map(|i| format!("x{}", i + offset))
                    .join(" ")
            })
            .join(" + ")
    }

    fn check_same_arity(&self, rhs: &TermTable, message: &str) {
        if self.arity != rhs.arity {
            panic!("{}", message);
        }
    }
}

fn check_arity(arity: usize) -> Result<(), LfsrCombinerError> {
    if arity == 0 {
        return Err(LfsrCombinerError::ZeroVariableCount);
    }
    if arity > MAX_ARITY {
        return Err(LfsrCombinerError::TooBigVariableCount(MAX_ARITY));
    }
    Ok(())
}

/// Variables numbered from 0, monomials by decreasing degree.
impl Display for TermTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_expression_string(true))
    }
}

/// In-place sum over GF(2) of term tables.
///
/// # Panics
/// If the term tables have different arities.
impl BitXorAssign<&TermTable> for TermTable {
    fn bitxor_assign(&mut self, rhs: &TermTable) {
        self.check_same_arity(rhs, XOR_DIFFERENT_VAR_COUNT_PANIC_MSG);
        for monomial in rhs.monomials.iter() {
            self.toggle(*monomial);
        }
    }
}

/// Sum over GF(2) of term tables.
///
/// # Panics
/// If the term tables have different arities.
impl BitXor for TermTable {
    type Output = Self;

    fn bitxor(mut self, rhs: Self) -> Self::Output {
        self ^= &rhs;
        self
    }
}

/// It is equivalent to [TermTable::bitxor].
impl Add for TermTable {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self ^ rhs
    }
}

/// It is equivalent to [TermTable::bitxor_assign].
impl AddAssign<&TermTable> for TermTable {
    fn add_assign(&mut self, rhs: &TermTable) {
        *self ^= rhs;
    }
}

/// In-place product of term tables, distributing every monomial of `self` over every monomial of `rhs`.
///
/// The product of two monomials is the union of their variables, since $x_i x_i = x_i$.
///
/// # Panics
/// If the term tables have different arities.
impl BitAndAssign<&TermTable> for TermTable {
    fn bitand_assign(&mut self, rhs: &TermTable) {
        self.check_same_arity(rhs, AND_DIFFERENT_VAR_COUNT_PANIC_MSG);
        let mut product = BTreeSet::new();
        for left in self.monomials.iter() {
            for right in rhs.monomials.iter() {
                let monomial = left | right;
                if !product.remove(&monomial) {
                    product.insert(monomial);
                }
            }
        }
        self.monomials = product;
    }
}

/// Product of term tables.
///
/// # Panics
/// If the term tables have different arities.
impl BitAnd for TermTable {
    type Output = Self;

    fn bitand(mut self, rhs: Self) -> Self::Output {
        self &= &rhs;
        self
    }
}

/// It is equivalent to [TermTable::bitand].
impl Mul for TermTable {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self & rhs
    }
}

/// It is equivalent to [TermTable::bitand_assign].
impl MulAssign<&TermTable> for TermTable {
    fn mul_assign(&mut self, rhs: &TermTable) {
        *self &= rhs;
    }
}
