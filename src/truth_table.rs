//! Dense truth tables of Boolean functions.

use crate::iterator::TruthTableIterator;
use crate::lfsr_combiner_error::LfsrCombinerError;
use crate::utils::{fast_anf_transform_biguint, low_mask};
use crate::{BitVector, TermTable};
use enum_dispatch::enum_dispatch;
use fast_boolean_anf_transform::fast_bool_anf_transform_unsigned;
use num_bigint::BigUint;
use num_traits::{Num, One, ToPrimitive, Zero};
use std::fmt::Debug;

/// Largest arity whose truth table fits in an `u64`.
pub const MAX_SMALL_ARITY: usize = 6;

/// Largest arity accepted for a dense truth table.
pub const MAX_TRUTH_TABLE_ARITY: usize = 31;

/// Common behaviour of [SmallTruthTable] and [BigTruthTable].
///
/// You could use this trait via the [TruthTable] type, which encapsulates both implementations.
#[enum_dispatch]
pub trait TruthTableImpl: Debug {
    /// Number of input variables.
    fn arity(&self) -> usize;

    /// Maximum input value, $2^n - 1$.
    fn get_max_input_value(&self) -> u64 {
        (1 << self.arity()) - 1
    }

    /// Output for the input whose bit $i$ is the value of variable $x_i$.
    ///
    /// # Returns
    /// The output bit, or [LfsrCombinerError::InputOutOfRange] if `input` is greater than $2^n - 1$.
    fn at_index(&self, input: u64) -> Result<u8, LfsrCombinerError> {
        let max = self.get_max_input_value();
        if input > max {
            return Err(LfsrCombinerError::InputOutOfRange { input, max });
        }
        Ok(self.at_index_unchecked(input))
    }

    /// Output for `input`, which must be lower than $2^n$.
    fn at_index_unchecked(&self, input: u64) -> u8;

    /// Output for an argument vector of length $n$, bit 0 being $x_0$.
    ///
    /// # Returns
    /// The output bit, or [LfsrCombinerError::LengthMismatch] if the vector length differs from the arity.
    fn at(&self, input: &BitVector) -> Result<u8, LfsrCombinerError> {
        if input.len() != self.arity() {
            return Err(LfsrCombinerError::LengthMismatch {
                expected: self.arity(),
                actual: input.len(),
            });
        }
        Ok(self.at_index_unchecked(input.to_u64()))
    }

    /// Number of inputs mapped to 1.
    fn weight(&self) -> u64;

    /// Packed truth table, bit $x$ holding the output for input $x$.
    fn biguint_truth_table(&self) -> BigUint;

    /// Packed truth table as an `u64`, if the arity is 6 or less.
    fn try_u64_truth_table(&self) -> Option<u64> {
        self.biguint_truth_table().to_u64()
    }

    /// Truth table as a hexadecimal string, most significant output first.
    ///
    /// # Example
    /// ```rust
    /// use lfsr_combiner::{TruthTable, TruthTableImpl};
    ///
    /// let truth_table = TruthTable::from_u64_truth_table(0x27, 3).unwrap();
    /// assert_eq!(truth_table.printable_hex_truth_table(), "27");
    /// ```
    fn printable_hex_truth_table(&self) -> String;

    /// Algebraic normal form, computed with a fast Möbius transform.
    fn algebraic_normal_form(&self) -> TermTable;
}

/// Truth table of at most 6 variables, packed in an `u64`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SmallTruthTable {
    arity: usize,
    truth_table: u64,
}

impl SmallTruthTable {
    /// Wraps a packed truth table, the lowest bit being the output for input 0.
    ///
    /// Returns an error if the arity is 0 or greater than 6, or if the table has bits at or above position $2^n$
    /// (unless the `unsafe_disable_safety_checks` feature is enabled).
    pub fn from_truth_table(truth_table: u64, arity: usize) -> Result<Self, LfsrCombinerError> {
        if arity == 0 {
            return Err(LfsrCombinerError::ZeroVariableCount);
        }
        if arity > MAX_SMALL_ARITY {
            return Err(LfsrCombinerError::TooBigVariableCount(MAX_SMALL_ARITY));
        }
        #[cfg(not(feature = "unsafe_disable_safety_checks"))]
        if arity < MAX_SMALL_ARITY && truth_table >> (1 << arity) != 0 {
            return Err(LfsrCombinerError::TooBigTruthTableForVarCount);
        }
        Ok(SmallTruthTable { arity, truth_table })
    }

    /// Packed truth table.
    pub fn get_truth_table_u64(&self) -> u64 {
        self.truth_table
    }
}

impl TruthTableImpl for SmallTruthTable {
    #[inline]
    fn arity(&self) -> usize {
        self.arity
    }

    #[inline]
    fn at_index_unchecked(&self, input: u64) -> u8 {
        ((self.truth_table >> input) & 1) as u8
    }

    fn weight(&self) -> u64 {
        self.truth_table.count_ones() as u64
    }

    fn biguint_truth_table(&self) -> BigUint {
        BigUint::from(self.truth_table)
    }

    fn printable_hex_truth_table(&self) -> String {
        format!("{:01$x}", self.truth_table, hex_digits(self.arity))
    }

    fn algebraic_normal_form(&self) -> TermTable {
        let anf =
            fast_bool_anf_transform_unsigned(self.truth_table, self.arity) & low_mask(1 << self.arity);
        TermTable::from_packed_anf(self.arity, &BigUint::from(anf))
    }
}

/// Truth table of 7 to 31 variables, packed in a [BigUint].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct BigTruthTable {
    arity: usize,
    truth_table: BigUint,
}

impl BigTruthTable {
    /// Wraps a packed truth table, the lowest bit being the output for input 0.
    ///
    /// Returns an error if the arity is 0 or greater than 31, or if the table has bits at or above position $2^n$
    /// (unless the `unsafe_disable_safety_checks` feature is enabled).
    pub fn from_truth_table(truth_table: BigUint, arity: usize) -> Result<Self, LfsrCombinerError> {
        if arity == 0 {
            return Err(LfsrCombinerError::ZeroVariableCount);
        }
        if arity > MAX_TRUTH_TABLE_ARITY {
            return Err(LfsrCombinerError::TooBigVariableCount(MAX_TRUTH_TABLE_ARITY));
        }
        #[cfg(not(feature = "unsafe_disable_safety_checks"))]
        if truth_table.bits() > (1 << arity) {
            return Err(LfsrCombinerError::TooBigTruthTableForVarCount);
        }
        Ok(BigTruthTable { arity, truth_table })
    }
}

impl TruthTableImpl for BigTruthTable {
    #[inline]
    fn arity(&self) -> usize {
        self.arity
    }

    #[inline]
    fn at_index_unchecked(&self, input: u64) -> u8 {
        self.truth_table.bit(input) as u8
    }

    fn weight(&self) -> u64 {
        self.truth_table.count_ones()
    }

    fn biguint_truth_table(&self) -> BigUint {
        self.truth_table.clone()
    }

    fn printable_hex_truth_table(&self) -> String {
        format!("{:01$x}", self.truth_table, hex_digits(self.arity))
    }

    fn algebraic_normal_form(&self) -> TermTable {
        let anf = fast_anf_transform_biguint(&self.truth_table, self.arity);
        TermTable::from_packed_anf(self.arity, &anf)
    }
}

fn hex_digits(arity: usize) -> usize {
    ((1usize << arity) + 3) >> 2
}

/// Dense truth table of a Boolean function of 1 to 31 variables.
///
/// Input $x$ is read as an unsigned integer whose bit $i$ is the value of variable $x_i$.
/// Tables of 6 variables or fewer are stored as a [SmallTruthTable], bigger ones as a [BigTruthTable].
///
/// Please refer to the [TruthTableImpl] trait for the evaluation methods.
#[enum_dispatch(TruthTableImpl)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TruthTable {
    /// Truth table packed in an `u64`.
    Small(SmallTruthTable),
    /// Truth table packed in a [BigUint].
    Big(BigTruthTable),
}

impl TruthTable {
    /// Builds a truth table from the list of its $2^n$ outputs, the first one being the output for input 0.
    ///
    /// # Returns
    /// The truth table, or an error if the arity is out of range, if `outputs` does not hold exactly $2^n$ entries,
    /// or if an entry is neither 0 nor 1.
    ///
    /// # Example
    /// ```rust
    /// use lfsr_combiner::{TruthTable, TruthTableImpl};
    ///
    /// // x0 XOR x1
    /// let truth_table = TruthTable::from_bits(2, &[0, 1, 1, 0]).unwrap();
    /// assert_eq!(truth_table.at_index(2).unwrap(), 1);
    /// assert!(TruthTable::from_bits(2, &[0, 1, 1]).is_err());
    /// ```
    pub fn from_bits(arity: usize, outputs: &[u8]) -> Result<Self, LfsrCombinerError> {
        check_arity(arity)?;
        let expected = 1usize << arity;
        if outputs.len() != expected {
            return Err(LfsrCombinerError::WrongTruthTableLength {
                expected,
                actual: outputs.len(),
            });
        }
        let vector = BitVector::from_bits(outputs)?;
        Self::from_biguint_truth_table(&vector.to_biguint(), arity)
    }

    /// Builds a truth table of at most 6 variables from an `u64`, the lowest bit being the output for input 0.
    pub fn from_u64_truth_table(truth_table: u64, arity: usize) -> Result<Self, LfsrCombinerError> {
        Ok(SmallTruthTable::from_truth_table(truth_table, arity)?.into())
    }

    /// Builds a truth table from a [BigUint], the lowest bit being the output for input 0.
    ///
    /// The result is a [SmallTruthTable] when the arity is 6 or less.
    pub fn from_biguint_truth_table(
        truth_table: &BigUint,
        arity: usize,
    ) -> Result<Self, LfsrCombinerError> {
        check_arity(arity)?;
        #[cfg(not(feature = "unsafe_disable_safety_checks"))]
        if truth_table.bits() > (1 << arity) {
            return Err(LfsrCombinerError::TooBigTruthTableForVarCount);
        }
        if arity <= MAX_SMALL_ARITY {
            let low_word = truth_table.iter_u64_digits().next().unwrap_or(0);
            return Self::from_u64_truth_table(low_word, arity);
        }
        Ok(BigTruthTable::from_truth_table(truth_table.clone(), arity)?.into())
    }

    /// Builds a truth table from its hexadecimal representation.
    ///
    /// The string must have a length of $\frac{2^n}{4}$, meaning this only accepts functions of 2 or more variables.
    /// A single digit is read as a 2-variable table, so 1-variable tables must be built with
    /// [TruthTable::from_u64_truth_table].
    ///
    /// # Example
    /// ```rust
    /// use lfsr_combiner::{TruthTable, TruthTableImpl};
    ///
    /// let truth_table = TruthTable::from_hex_string_truth_table("e8").unwrap();
    /// assert_eq!(truth_table.arity(), 3);
    /// ```
    pub fn from_hex_string_truth_table(hex_truth_table: &str) -> Result<Self, LfsrCombinerError> {
        if hex_truth_table.len().count_ones() != 1 {
            return Err(LfsrCombinerError::WrongStringHexTruthTableLength);
        }
        let arity = (hex_truth_table.len() << 2).trailing_zeros() as usize;
        let truth_table = BigUint::from_str_radix(hex_truth_table, 16)
            .map_err(|_| LfsrCombinerError::StringHexParseError)?;
        Self::from_biguint_truth_table(&truth_table, arity)
    }

    /// Tabulates `evaluate` over every input from 0 to $2^n - 1$.
    pub(crate) fn from_fn(
        arity: usize,
        evaluate: impl Fn(u64) -> u8,
    ) -> Result<Self, LfsrCombinerError> {
        check_arity(arity)?;
        let max_input_value = (1u64 << arity) - 1;
        if arity <= MAX_SMALL_ARITY {
            let truth_table = (0..=max_input_value)
                .filter(|input| evaluate(*input) == 1)
                .fold(0u64, |acc, input| acc | (1 << input));
            return Self::from_u64_truth_table(truth_table, arity);
        }
        let mut truth_table = BigUint::zero();
        for input in (0..=max_input_value).filter(|input| evaluate(*input) == 1) {
            truth_table.set_bit(input, true);
        }
        Ok(BigTruthTable::from_truth_table(truth_table, arity)?.into())
    }

    /// Iterator over the outputs, from input 0 to $2^n - 1$.
    ///
    /// # Example
    /// ```rust
    /// use lfsr_combiner::TruthTable;
    ///
    /// let truth_table = TruthTable::from_u64_truth_table(0b0110, 2).unwrap();
    /// assert_eq!(truth_table.iter().collect::<Vec<u8>>(), vec![0, 1, 1, 0]);
    /// ```
    pub fn iter(&self) -> TruthTableIterator {
        TruthTableIterator::new(self.clone())
    }

    /// Constant function of `arity` variables.
    pub fn constant(arity: usize, value: bool) -> Result<Self, LfsrCombinerError> {
        check_arity(arity)?;
        if !value {
            return Self::from_biguint_truth_table(&BigUint::zero(), arity);
        }
        let all_ones = (BigUint::one() << (1usize << arity)) - BigUint::one();
        Self::from_biguint_truth_table(&all_ones, arity)
    }
}

/// Create a truth table from its hex string representation
impl TryFrom<&str> for TruthTable {
    type Error = LfsrCombinerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_hex_string_truth_table(value)
    }
}

fn check_arity(arity: usize) -> Result<(), LfsrCombinerError> {
    if arity == 0 {
        return Err(LfsrCombinerError::ZeroVariableCount);
    }
    if arity > MAX_TRUTH_TABLE_ARITY {
        return Err(LfsrCombinerError::TooBigVariableCount(MAX_TRUTH_TABLE_ARITY));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        BigTruthTable, BitVector, LfsrCombinerError, SmallTruthTable, TruthTable, TruthTableImpl,
    };
    use num_bigint::BigUint;
    use num_traits::Num;

    #[test]
    fn test_small_from_truth_table() {
        let truth_table = SmallTruthTable::from_truth_table(0xaa55aa55, 5).unwrap();
        assert_eq!(truth_table.get_truth_table_u64(), 0xaa55aa55);
        assert_eq!(truth_table.arity(), 5);

        assert_eq!(
            SmallTruthTable::from_truth_table(0xffffffffffffffff, 7),
            Err(LfsrCombinerError::TooBigVariableCount(6))
        );
        assert_eq!(
            SmallTruthTable::from_truth_table(1, 0),
            Err(LfsrCombinerError::ZeroVariableCount)
        );
        #[cfg(not(feature = "unsafe_disable_safety_checks"))]
        assert_eq!(
            SmallTruthTable::from_truth_table(0x100, 3),
            Err(LfsrCombinerError::TooBigTruthTableForVarCount)
        );
    }

    #[test]
    fn test_from_bits() {
        let truth_table = TruthTable::from_bits(3, &[1, 1, 1, 0, 0, 1, 0, 0]).unwrap();
        assert_eq!(truth_table.try_u64_truth_table(), Some(0x27));
        assert_eq!(truth_table.arity(), 3);

        assert_eq!(
            TruthTable::from_bits(3, &[1, 1, 1, 0]),
            Err(LfsrCombinerError::WrongTruthTableLength {
                expected: 8,
                actual: 4
            })
        );
        assert_eq!(
            TruthTable::from_bits(1, &[0, 5]),
            Err(LfsrCombinerError::InvalidBitValue(5))
        );
        assert_eq!(
            TruthTable::from_bits(32, &[]),
            Err(LfsrCombinerError::TooBigVariableCount(31))
        );

        let mut outputs = vec![0u8; 128];
        outputs[100] = 1;
        let truth_table = TruthTable::from_bits(7, &outputs).unwrap();
        assert!(matches!(truth_table, TruthTable::Big(_)));
        assert_eq!(truth_table.at_index(100), Ok(1));
        assert_eq!(truth_table.at_index(99), Ok(0));
        assert_eq!(truth_table.weight(), 1);
    }

    #[test]
    fn test_at_index() {
        let truth_table = TruthTable::from_hex_string_truth_table("abce1234").unwrap();
        assert_eq!(truth_table.at_index(0), Ok(0));
        assert_eq!(truth_table.at_index(1), Ok(0));
        assert_eq!(truth_table.at_index(4), Ok(1));
        assert_eq!(truth_table.at_index(8), Ok(0));
        assert_eq!(truth_table.at_index(23), Ok(1));
        assert_eq!(
            truth_table.at_index(32),
            Err(LfsrCombinerError::InputOutOfRange { input: 32, max: 31 })
        );

        let truth_table =
            TruthTable::from_hex_string_truth_table("7969817CC5893BA6AC326E47619F5AD0").unwrap();
        assert_eq!(truth_table.at_index(13), Ok(0));
        assert_eq!(truth_table.at_index(62), Ok(0));
        assert_eq!(truth_table.at_index(64), Ok(0));
        assert_eq!(truth_table.at_index(80), Ok(1));
        assert_eq!(truth_table.at_index(100), Ok(1));
    }

    #[test]
    fn test_at_bit_vector() {
        let truth_table = TruthTable::from_u64_truth_table(0x27, 3).unwrap();
        assert_eq!(truth_table.at(&BitVector::from_bits(&[1, 0, 1]).unwrap()), Ok(1));
        assert_eq!(truth_table.at(&BitVector::from_bits(&[0, 0, 1]).unwrap()), Ok(0));
        assert_eq!(
            truth_table.at(&BitVector::from_value(4, 5)),
            Err(LfsrCombinerError::LengthMismatch {
                expected: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn test_from_hex_string_truth_table() {
        assert!(TruthTable::from_hex_string_truth_table("7969817CC5893BA6AC326E47619F5AD").is_err());
        assert_eq!(
            TruthTable::from_hex_string_truth_table(""),
            Err(LfsrCombinerError::WrongStringHexTruthTableLength)
        );
        assert_eq!(
            TruthTable::from_hex_string_truth_table("fe1z"),
            Err(LfsrCombinerError::StringHexParseError)
        );

        let truth_table = TruthTable::from_hex_string_truth_table("2").unwrap();
        assert_eq!(truth_table.arity(), 2);
        assert_eq!(truth_table.iter().collect::<Vec<u8>>(), vec![0, 1, 0, 0]);

        let truth_table = TruthTable::try_from("fe12").unwrap();
        assert_eq!(truth_table.arity(), 4);
        assert!(matches!(truth_table, TruthTable::Small(_)));

        let truth_table =
            TruthTable::from_hex_string_truth_table("7969817CC5893BA6AC326E47619F5AD0").unwrap();
        assert_eq!(truth_table.arity(), 7);
        assert_eq!(truth_table.get_max_input_value(), 127);
        assert_eq!(truth_table.try_u64_truth_table(), None);
    }

    #[test]
    fn test_printable_hex_truth_table() {
        let truth_table = TruthTable::from_u64_truth_table(0xaa55, 5).unwrap();
        assert_eq!(truth_table.printable_hex_truth_table(), "0000aa55");

        let truth_table = TruthTable::from_u64_truth_table(0b10, 1).unwrap();
        assert_eq!(truth_table.printable_hex_truth_table(), "2");

        let truth_table = BigTruthTable::from_truth_table(
            BigUint::from_str_radix("7969817CC5893BA6AC326E47619F5AD0", 16).unwrap(),
            7,
        )
        .unwrap();
        assert_eq!(
            truth_table.printable_hex_truth_table(),
            "7969817cc5893ba6ac326e47619f5ad0"
        );
    }

    #[test]
    fn test_algebraic_normal_form() {
        // 1 + x0 x1 + x0 x2 + x2
        let truth_table = TruthTable::from_u64_truth_table(0x27, 3).unwrap();
        let anf = truth_table.algebraic_normal_form();
        assert_eq!(anf.monomials().collect::<Vec<u64>>(), vec![0b000, 0b011, 0b100, 0b101]);

        let truth_table = TruthTable::from_u64_truth_table(30, 3).unwrap();
        assert_eq!(truth_table.algebraic_normal_form().to_string(), "x0 x1 + x0 + x1 + x2");

        let truth_table =
            TruthTable::from_hex_string_truth_table("7969817CC5893BA6AC326E47619F5AD0").unwrap();
        let anf = truth_table.algebraic_normal_form();
        assert_eq!(anf.build_truth_table().unwrap(), truth_table);
    }

    #[test]
    fn test_constant() {
        let one = TruthTable::constant(3, true).unwrap();
        assert_eq!(one.try_u64_truth_table(), Some(0xff));
        let one = TruthTable::constant(6, true).unwrap();
        assert_eq!(one.try_u64_truth_table(), Some(u64::MAX));
        let zero = TruthTable::constant(8, false).unwrap();
        assert_eq!(zero.weight(), 0);
        assert_eq!(TruthTable::constant(8, true).unwrap().weight(), 256);
    }
}
