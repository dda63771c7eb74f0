use thiserror::Error;

/// Errors returned by bit vectors, shift registers and Boolean functions.
#[derive(Error, Debug, PartialEq)]
pub enum LfsrCombinerError {
    /// A bit position outside `0..length`.
    #[error("Index {index} out of range for length {length}")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Length of the vector or register.
        length: usize,
    },
    /// A truth table input greater than $2^n - 1$.
    #[error("Input {input} out of range, must be <= {max}")]
    InputOutOfRange {
        /// Requested input.
        input: u64,
        /// Maximum input value of the function.
        max: u64,
    },
    /// A bit value that is neither 0 nor 1.
    #[error("Bit value must be 0 or 1, got {0}")]
    InvalidBitValue(u8),
    /// A vector whose length differs from the expected one.
    #[error("Expected a vector of length {expected}, got {actual}")]
    LengthMismatch {
        /// Length required by the receiver.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },
    /// Shift registers must hold at least one bit.
    #[error("Register length must be positive")]
    ZeroRegisterLength,
    /// A value of `length` bits cannot be carried by an `u64`.
    #[error("Length {0} exceeds the 64 bits of an u64")]
    TooWideForU64(usize),
    /// Boolean functions take at least one variable.
    #[error("Variable count must be positive")]
    ZeroVariableCount,
    /// Variable count above the packing ceiling of the representation.
    #[error("Too big variable count, must be <= {0}")]
    TooBigVariableCount(usize),
    /// A monomial mentioning a variable at or above the arity.
    #[error("Monomial {monomial:#x} uses variables outside of arity {arity}")]
    MonomialOutOfRange {
        /// Monomial bitmask.
        monomial: u64,
        /// Arity of the term table.
        arity: usize,
    },
    /// Truth table given as a list of the wrong length.
    #[error("Truth table must have {expected} entries, got {actual}")]
    WrongTruthTableLength {
        /// $2^n$.
        expected: usize,
        /// Number of supplied entries.
        actual: usize,
    },
    /// Packed truth table with bits set at or above position $2^n$.
    #[error("Truth table is too big for variables count")]
    TooBigTruthTableForVarCount,
    /// Hex truth table length is not a power of 2.
    #[error("Hex truth table length must be a power of 2")]
    WrongStringHexTruthTableLength,
    /// Hex truth table with non hexadecimal characters.
    #[error("Error parsing string hex number")]
    StringHexParseError,
    /// Expression with no term at all.
    #[error("Empty expression")]
    EmptyExpression,
    /// Token that cannot appear at this position.
    #[error("Unexpected token '{token}' at position {position}")]
    UnexpectedToken {
        /// Offending token.
        token: String,
        /// Byte offset in the expression.
        position: usize,
    },
    /// Expression stopped where a factor was required.
    #[error("Unexpected end of expression at position {position}")]
    UnexpectedEndOfExpression {
        /// Byte offset in the expression.
        position: usize,
    },
    /// `(` without matching `)`.
    #[error("Unclosed parenthesis opened at position {position}")]
    UnclosedParenthesis {
        /// Byte offset of the opening parenthesis.
        position: usize,
    },
    /// Parenthesized groups nested deeper than the parser accepts.
    #[error("Parentheses nested deeper than {max} levels at position {position}")]
    NestingTooDeep {
        /// Byte offset of the opening parenthesis past the limit.
        position: usize,
        /// Deepest accepted nesting.
        max: usize,
    },
    /// `x` not followed by digits.
    #[error("Missing variable index after 'x' at position {position}")]
    MissingVariableIndex {
        /// Byte offset of the `x`.
        position: usize,
    },
    /// Variable index outside `min..=max`.
    #[error("Variable {variable} at position {position} out of range, must be in x{min}..=x{max}")]
    VariableOutOfRange {
        /// Variable as written in the expression.
        variable: String,
        /// Byte offset in the expression.
        position: usize,
        /// Smallest accepted index.
        min: usize,
        /// Largest accepted index.
        max: usize,
    },
}

pub(crate) const XOR_DIFFERENT_VAR_COUNT_PANIC_MSG: &str =
    "XOR operation requires the same number of variables in both term tables";
pub(crate) const AND_DIFFERENT_VAR_COUNT_PANIC_MSG: &str =
    "AND operation requires the same number of variables in both term tables";
