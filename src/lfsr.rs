//! Fibonacci linear feedback shift registers.

use crate::lfsr_combiner_error::LfsrCombinerError;
use crate::BitVector;
use log::trace;

/// A Fibonacci linear feedback shift register (LFSR).
///
/// The register holds a fill (its current state) and a tap configuration, both [BitVector]s of the register length.
/// Index 0 of both vectors is the position output by the next shift, higher indices are deeper in the register.
///
/// Each shift computes the feedback bit as the XOR of the fill bits whose tap is 1:
///
/// $$b = \bigoplus_{i \mid t_i = 1} f_i$$
///
/// then drops $f_0$, moves every bit $f_i$ to position $i - 1$ and stores $b$ at position $n - 1$. The feedback bit is the output.
///
/// An [Lfsr] also iterates over its output stream, each call to `next` being a [shift](Lfsr::shift).
/// It does not implement `Copy`, so that looping over a register always advances the same instance.
///
/// # Example
/// ```rust
/// use lfsr_combiner::Lfsr;
///
/// let mut lfsr = Lfsr::new(4).unwrap();
/// lfsr.set_taps_u64(0b0011).unwrap();
/// lfsr.set_fill_u64(0b0001).unwrap();
/// assert_eq!(lfsr.peek_n(4), vec![1, 0, 0, 1]);
/// assert_eq!(lfsr.shift_to(3), 1);
/// assert_eq!(lfsr.fill().to_u64(), 0b1001);
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Lfsr {
    length: usize,
    fill: BitVector,
    taps: BitVector,
}

impl Lfsr {
    /// Creates a register of `length` bits, with zero fill and no taps.
    ///
    /// # Returns
    /// The register, or [LfsrCombinerError::ZeroRegisterLength] if `length` is 0.
    pub fn new(length: usize) -> Result<Self, LfsrCombinerError> {
        if length == 0 {
            return Err(LfsrCombinerError::ZeroRegisterLength);
        }
        Ok(Lfsr {
            length,
            fill: BitVector::zeros(length),
            taps: BitVector::zeros(length),
        })
    }

    /// Creates a register from its tap configuration and fill, which must have the same non-zero length.
    pub fn from_vectors(taps: BitVector, fill: BitVector) -> Result<Self, LfsrCombinerError> {
        let mut lfsr = Self::new(taps.len())?;
        lfsr.set_taps(taps)?;
        lfsr.set_fill(fill)?;
        Ok(lfsr)
    }

    /// Length of the register.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Always `false`, registers hold at least one bit.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Copy of the current fill.
    pub fn fill(&self) -> BitVector {
        self.fill.clone()
    }

    /// Bit of the fill at `index`, index 0 being the next output position.
    pub fn fill_at(&self, index: usize) -> Result<u8, LfsrCombinerError> {
        self.fill.get(index)
    }

    /// Copy of the tap configuration.
    pub fn taps(&self) -> BitVector {
        self.taps.clone()
    }

    /// Returns 1 if position `index` is tapped, 0 otherwise.
    pub fn tap_at(&self, index: usize) -> Result<u8, LfsrCombinerError> {
        self.taps.get(index)
    }

    /// Replaces the fill.
    ///
    /// # Returns
    /// [LfsrCombinerError::LengthMismatch] if `fill` is not exactly as long as the register.
    pub fn set_fill(&mut self, fill: BitVector) -> Result<(), LfsrCombinerError> {
        self.check_length(&fill)?;
        self.fill = fill;
        Ok(())
    }

    /// Replaces the fill by the low-order bits of `fill`.
    ///
    /// Equivalent to `set_fill(BitVector::from_value(self.len(), fill))`, except that registers longer than 64 bits are
    /// rejected with [LfsrCombinerError::TooWideForU64] since an `u64` cannot describe their whole state.
    pub fn set_fill_u64(&mut self, fill: u64) -> Result<(), LfsrCombinerError> {
        self.check_u64_width()?;
        self.set_fill(BitVector::from_value(self.length, fill))
    }

    /// Sets a single bit of the fill.
    pub fn set_fill_at(&mut self, index: usize, value: u8) -> Result<(), LfsrCombinerError> {
        self.fill = self.fill.with_bit(index, value)?;
        Ok(())
    }

    /// Replaces the tap configuration.
    ///
    /// # Returns
    /// [LfsrCombinerError::LengthMismatch] if `taps` is not exactly as long as the register.
    pub fn set_taps(&mut self, taps: BitVector) -> Result<(), LfsrCombinerError> {
        self.check_length(&taps)?;
        self.taps = taps;
        Ok(())
    }

    /// Replaces the tap configuration by the low-order bits of `taps`.
    ///
    /// Registers longer than 64 bits are rejected with [LfsrCombinerError::TooWideForU64].
    pub fn set_taps_u64(&mut self, taps: u64) -> Result<(), LfsrCombinerError> {
        self.check_u64_width()?;
        self.set_taps(BitVector::from_value(self.length, taps))
    }

    /// Sets a single bit of the tap configuration, 1 meaning tapped.
    pub fn set_tap_at(&mut self, index: usize, value: u8) -> Result<(), LfsrCombinerError> {
        self.taps = self.taps.with_bit(index, value)?;
        Ok(())
    }

    /// Returns the next output bit without changing the fill.
    pub fn peek(&self) -> u8 {
        self.fill.masked_parity(&self.taps)
    }

    /// Returns the next `terms` output bits without changing the fill.
    pub fn peek_n(&self, terms: usize) -> Vec<u8> {
        let mut scratch = self.fill.clone();
        (0..terms)
            .map(|_| self.step(&mut scratch))
            .collect()
    }

    /// Returns the bit at position `term` of the output stream, counted from 0, without changing the fill.
    pub fn peek_at(&self, term: usize) -> u8 {
        let mut scratch = self.fill.clone();
        let mut output = 0;
        for _ in 0..=term {
            output = self.step(&mut scratch);
        }
        output
    }

    /// Shifts the register once and returns the output bit.
    pub fn shift(&mut self) -> u8 {
        let mut fill = self.fill.clone();
        let output = self.step(&mut fill);
        self.fill = fill;
        output
    }

    /// Shifts the register `terms` times and returns the output bits.
    pub fn shift_n(&mut self, terms: usize) -> Vec<u8> {
        trace!("shifting {}-bit register {} times", self.length, terms);
        (0..terms).map(|_| self.shift()).collect()
    }

    /// Shifts the register `term + 1` times and returns the last output bit.
    ///
    /// The register is left in the same state as after `shift_n(term + 1)`.
    pub fn shift_to(&mut self, term: usize) -> u8 {
        trace!("shifting {}-bit register to term {}", self.length, term);
        let mut output = 0;
        for _ in 0..=term {
            output = self.shift();
        }
        output
    }

    fn step(&self, fill: &mut BitVector) -> u8 {
        let output = fill.masked_parity(&self.taps);
        *fill = fill.shifted_in(output);
        output
    }

    fn check_length(&self, vector: &BitVector) -> Result<(), LfsrCombinerError> {
        if vector.len() != self.length {
            return Err(LfsrCombinerError::LengthMismatch {
                expected: self.length,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    fn check_u64_width(&self) -> Result<(), LfsrCombinerError> {
        if self.length > u64::BITS as usize {
            return Err(LfsrCombinerError::TooWideForU64(self.length));
        }
        Ok(())
    }
}

impl Iterator for Lfsr {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.shift())
    }
}
