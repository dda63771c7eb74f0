//! Parser for Boolean expressions in algebraic normal form.
//!
//! ```text
//! expr    := term ('+' term)*
//! term    := factor+
//! factor  := '0' | '1' | 'x' digits | '(' expr ')'
//! ```
//!
//! Whitespace is ignored. Every production evaluates to a [TermTable], so that sums are XORs of term tables
//! and juxtaposition is their product.

use crate::lfsr_combiner_error::LfsrCombinerError;
use crate::TermTable;
use std::iter::Peekable;
use std::str::CharIndices;

/// Deepest nesting of parenthesized groups accepted by [parse].
pub(crate) const MAX_NESTING_DEPTH: usize = 128;

pub(crate) fn parse(
    arity: usize,
    expression: &str,
    index_from_zero: bool,
) -> Result<TermTable, LfsrCombinerError> {
    let mut parser = Parser {
        arity,
        min_index: if index_from_zero { 0 } else { 1 },
        length: expression.len(),
        depth: 0,
        chars: expression.char_indices().peekable(),
    };
    if parser.peek().is_none() {
        return Err(LfsrCombinerError::EmptyExpression);
    }
    let term_table = parser.expr()?;
    match parser.peek() {
        None => Ok(term_table),
        Some((position, character)) => Err(LfsrCombinerError::UnexpectedToken {
            token: character.to_string(),
            position,
        }),
    }
}

struct Parser<'a> {
    arity: usize,
    min_index: usize,
    length: usize,
    depth: usize,
    chars: Peekable<CharIndices<'a>>,
}

impl Parser<'_> {
    /// Next significant character, skipping whitespace.
    fn peek(&mut self) -> Option<(usize, char)> {
        while let Some((_, character)) = self.chars.peek() {
            if !character.is_whitespace() {
                break;
            }
            self.chars.next();
        }
        self.chars.peek().copied()
    }

    fn expr(&mut self) -> Result<TermTable, LfsrCombinerError> {
        let mut sum = self.term()?;
        while let Some((_, '+')) = self.peek() {
            self.chars.next();
            sum ^= &self.term()?;
        }
        Ok(sum)
    }

    fn term(&mut self) -> Result<TermTable, LfsrCombinerError> {
        let mut product = self.factor()?;
        while let Some((_, '0' | '1' | 'x' | '(')) = self.peek() {
            product &= &self.factor()?;
        }
        Ok(product)
    }

    fn factor(&mut self) -> Result<TermTable, LfsrCombinerError> {
        let (position, character) = self
            .peek()
            .ok_or(LfsrCombinerError::UnexpectedEndOfExpression {
                position: self.length,
            })?;
        match character {
            '0' => {
                self.chars.next();
                TermTable::new(self.arity)
            }
            '1' => {
                self.chars.next();
                TermTable::one(self.arity)
            }
            'x' => {
                self.chars.next();
                self.variable(position)
            }
            '(' => {
                if self.depth == MAX_NESTING_DEPTH {
                    return Err(LfsrCombinerError::NestingTooDeep {
                        position,
                        max: MAX_NESTING_DEPTH,
                    });
                }
                self.chars.next();
                self.depth += 1;
                let group = self.expr()?;
                self.depth -= 1;
                match self.peek() {
                    Some((_, ')')) => {
                        self.chars.next();
                        Ok(group)
                    }
                    None => Err(LfsrCombinerError::UnclosedParenthesis { position }),
                    Some((position, character)) => Err(LfsrCombinerError::UnexpectedToken {
                        token: character.to_string(),
                        position,
                    }),
                }
            }
            _ => Err(LfsrCombinerError::UnexpectedToken {
                token: character.to_string(),
                position,
            }),
        }
    }

    /// Digits following an `x` read at `position`; no whitespace is allowed between them.
    fn variable(&mut self, position: usize) -> Result<TermTable, LfsrCombinerError> {
        let mut digits = String::new();
        while let Some((_, digit)) = self.chars.peek().copied().filter(|(_, c)| c.is_ascii_digit()) {
            digits.push(digit);
            self.chars.next();
        }
        if digits.is_empty() {
            return Err(LfsrCombinerError::MissingVariableIndex { position });
        }
        let max_index = self.min_index + self.arity - 1;
        let index = digits
            .parse::<usize>()
            .ok()
            .filter(|index| (self.min_index..=max_index).contains(index))
            .ok_or_else(|| LfsrCombinerError::VariableOutOfRange {
                variable: format!("x{}", digits),
                position,
                min: self.min_index,
                max: max_index,
            })?;
        TermTable::variable(self.arity, index - self.min_index)
    }
}

#[cfg(test)]
mod tests {
    use crate::expression::{parse, MAX_NESTING_DEPTH};
    use crate::{LfsrCombinerError, TermTable, TruthTableImpl};

    fn outputs(expression: &str) -> Vec<u8> {
        let truth_table = parse(3, expression, false).unwrap().build_truth_table().unwrap();
        (0..8).map(|input| truth_table.at_index(input).unwrap()).collect()
    }

    #[test]
    fn test_constants() {
        assert_eq!(outputs("1"), vec![1; 8]);
        assert_eq!(outputs("0"), vec![0; 8]);
        assert_eq!(outputs("1 + 1"), vec![0; 8]);
        assert_eq!(outputs("10"), vec![0; 8]);
    }

    #[test]
    fn test_single_variable() {
        assert_eq!(outputs("x1"), vec![0, 1, 0, 1, 0, 1, 0, 1]);
        assert_eq!(outputs("x3"), vec![0, 0, 0, 0, 1, 1, 1, 1]);
    }

    #[test]
    fn test_and() {
        assert_eq!(outputs("x1 x2"), vec![0, 0, 0, 1, 0, 0, 0, 1]);
        assert_eq!(outputs("x1x2"), vec![0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_xor() {
        assert_eq!(outputs("x1 + x2"), vec![0, 1, 1, 0, 0, 1, 1, 0]);
        assert_eq!(outputs("x1+x2+x1"), outputs("x2"));
    }

    #[test]
    fn test_worked_example() {
        // x3 x2 x1: 000 001 010 011 100 101 110 111
        assert_eq!(
            outputs("1 + x1 x2 + (x1 + 1) x3"),
            vec![1, 1, 1, 0, 0, 1, 0, 0]
        );
        let term_table = parse(3, "1 + x1 x2 + (x1 + 1) x3", false).unwrap();
        assert_eq!(
            term_table,
            TermTable::from_monomials(3, [0, 0b011, 0b101, 0b100]).unwrap()
        );
    }

    #[test]
    fn test_idempotent_variables() {
        assert_eq!(parse(3, "x1 x1", false), parse(3, "x1", false));
        assert_eq!(parse(3, "x2 1 x2 1", false), parse(3, "x2", false));
    }

    #[test]
    fn test_zero_annihilates_term() {
        assert_eq!(parse(3, "x1 0 x2 + x3", false), parse(3, "x3", false));
    }

    #[test]
    fn test_nested_groups() {
        // (x1 + x2)(x1 + x3) = x1 + x1 x3 + x1 x2 + x2 x3
        let term_table = parse(3, "((x1 + x2)) (x1 + x3)", false).unwrap();
        assert_eq!(
            term_table,
            TermTable::from_monomials(3, [0b001, 0b101, 0b011, 0b110]).unwrap()
        );
    }

    #[test]
    fn test_index_from_zero() {
        assert_eq!(parse(3, "x0 + x2", true), parse(3, "x1 + x3", false));
        assert_eq!(
            parse(3, "x3", true),
            Err(LfsrCombinerError::VariableOutOfRange {
                variable: String::from("x3"),
                position: 0,
                min: 0,
                max: 2
            })
        );
        assert_eq!(
            parse(3, "x0", false),
            Err(LfsrCombinerError::VariableOutOfRange {
                variable: String::from("x0"),
                position: 0,
                min: 1,
                max: 3
            })
        );
    }

    #[test]
    fn test_variable_out_of_range() {
        assert_eq!(
            parse(3, "x1 + x5", false),
            Err(LfsrCombinerError::VariableOutOfRange {
                variable: String::from("x5"),
                position: 5,
                min: 1,
                max: 3
            })
        );
        assert!(matches!(
            parse(3, "x99999999999999999999999", false),
            Err(LfsrCombinerError::VariableOutOfRange { .. })
        ));
    }

    #[test]
    fn test_malformed_expressions() {
        assert_eq!(parse(3, "", false), Err(LfsrCombinerError::EmptyExpression));
        assert_eq!(parse(3, "   ", false), Err(LfsrCombinerError::EmptyExpression));
        assert_eq!(
            parse(3, "x1 +", false),
            Err(LfsrCombinerError::UnexpectedEndOfExpression { position: 4 })
        );
        assert_eq!(
            parse(3, "(x1", false),
            Err(LfsrCombinerError::UnclosedParenthesis { position: 0 })
        );
        assert_eq!(
            parse(3, "x1)", false),
            Err(LfsrCombinerError::UnexpectedToken {
                token: String::from(")"),
                position: 2
            })
        );
        assert_eq!(
            parse(3, "x1 * x2", false),
            Err(LfsrCombinerError::UnexpectedToken {
                token: String::from("*"),
                position: 3
            })
        );
        assert_eq!(
            parse(3, "x1 + + x2", false),
            Err(LfsrCombinerError::UnexpectedToken {
                token: String::from("+"),
                position: 5
            })
        );
        assert_eq!(
            parse(3, "x + x1", false),
            Err(LfsrCombinerError::MissingVariableIndex { position: 0 })
        );
        assert_eq!(
            parse(3, "()", false),
            Err(LfsrCombinerError::UnexpectedToken {
                token: String::from(")"),
                position: 1
            })
        );
    }

    #[test]
    fn test_nesting_depth() {
        let nested = |depth: usize| format!("{}x1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(
            parse(3, &nested(MAX_NESTING_DEPTH), false),
            parse(3, "x1", false)
        );
        assert_eq!(
            parse(3, &nested(MAX_NESTING_DEPTH + 1), false),
            Err(LfsrCombinerError::NestingTooDeep {
                position: MAX_NESTING_DEPTH,
                max: MAX_NESTING_DEPTH
            })
        );
        assert_eq!(
            parse(3, &nested(100_000), false),
            Err(LfsrCombinerError::NestingTooDeep {
                position: MAX_NESTING_DEPTH,
                max: MAX_NESTING_DEPTH
            })
        );
    }

    #[test]
    fn test_arity_checked_before_parsing() {
        assert_eq!(
            TermTable::parse(64, "(((", false),
            Err(LfsrCombinerError::TooBigVariableCount(63))
        );
        assert_eq!(
            TermTable::parse(0, "x1", false),
            Err(LfsrCombinerError::ZeroVariableCount)
        );
    }
}
