//! Immutable fixed-length bit vectors.

use crate::lfsr_combiner_error::LfsrCombinerError;
use crate::utils::{low_mask, parity};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::fmt::Display;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
enum BitStorage {
    /// Vectors of 64 bits or fewer
    Small(u64),
    Big(BigUint),
}

/// An immutable, fixed-length vector of bits.
///
/// Bit 0 is the least significant bit: every conversion to and from integers reads the vector as an
/// unsigned number whose bit $i$ is the element at index $i$.
///
/// # Example
/// ```rust
/// use lfsr_combiner::BitVector;
///
/// let vector = BitVector::from_bits(&[1, 0, 1, 1]).unwrap();
/// assert_eq!(vector.len(), 4);
/// assert_eq!(vector.to_u8(), 0b1101);
/// assert_eq!(vector, BitVector::from_value(4, 0xfd));
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct BitVector {
    length: usize,
    bits: BitStorage,
}

impl BitVector {
    /// Vector of `length` zero bits.
    pub fn zeros(length: usize) -> Self {
        if length <= 64 {
            BitVector {
                length,
                bits: BitStorage::Small(0),
            }
        } else {
            BitVector {
                length,
                bits: BitStorage::Big(BigUint::zero()),
            }
        }
    }

    /// Builds a vector from its bits, the first element being bit 0.
    ///
    /// # Returns
    /// The bit vector, or [LfsrCombinerError::InvalidBitValue] if an element is neither 0 nor 1.
    pub fn from_bits(bits: &[u8]) -> Result<Self, LfsrCombinerError> {
        if let Some(invalid) = bits.iter().find(|bit| **bit > 1) {
            return Err(LfsrCombinerError::InvalidBitValue(*invalid));
        }
        let length = bits.len();
        if length <= 64 {
            let value = bits
                .iter()
                .enumerate()
                .fold(0u64, |acc, (i, bit)| acc | ((*bit as u64) << i));
            return Ok(BitVector {
                length,
                bits: BitStorage::Small(value),
            });
        }
        let mut value = BigUint::zero();
        for (i, _) in bits.iter().enumerate().filter(|(_, bit)| **bit == 1) {
            value.set_bit(i as u64, true);
        }
        Ok(BitVector {
            length,
            bits: BitStorage::Big(value),
        })
    }

    /// Builds a vector of `length` bits holding the low-order bits of `value`.
    ///
    /// Higher bits of `value` are discarded. When `length` exceeds 64, the vector is zero-extended.
    pub fn from_value(length: usize, value: u64) -> Self {
        if length <= 64 {
            BitVector {
                length,
                bits: BitStorage::Small(value & low_mask(length)),
            }
        } else {
            BitVector {
                length,
                bits: BitStorage::Big(BigUint::from(value)),
            }
        }
    }

    /// Builds a vector of `length` bits holding the low-order bits of `value`.
    pub fn from_biguint(length: usize, value: &BigUint) -> Self {
        if length <= 64 {
            let low_word = value.iter_u64_digits().next().unwrap_or(0);
            BitVector {
                length,
                bits: BitStorage::Small(low_word & low_mask(length)),
            }
        } else {
            let mask = (BigUint::one() << length) - BigUint::one();
            BitVector {
                length,
                bits: BitStorage::Big(value & mask),
            }
        }
    }

    /// Number of bits in the vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` for the zero-length vector.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the bit at `index`, or [LfsrCombinerError::IndexOutOfRange] outside `0..len()`.
    pub fn get(&self, index: usize) -> Result<u8, LfsrCombinerError> {
        if index >= self.length {
            return Err(LfsrCombinerError::IndexOutOfRange {
                index,
                length: self.length,
            });
        }
        Ok(self.bit_unchecked(index))
    }

    #[inline]
    fn bit_unchecked(&self, index: usize) -> u8 {
        match &self.bits {
            BitStorage::Small(value) => ((value >> index) & 1) as u8,
            BitStorage::Big(value) => value.bit(index as u64) as u8,
        }
    }

    /// Copy of this vector with the bit at `index` replaced by `value`.
    pub fn with_bit(&self, index: usize, value: u8) -> Result<Self, LfsrCombinerError> {
        if value > 1 {
            return Err(LfsrCombinerError::InvalidBitValue(value));
        }
        if index >= self.length {
            return Err(LfsrCombinerError::IndexOutOfRange {
                index,
                length: self.length,
            });
        }
        let bits = match &self.bits {
            BitStorage::Small(bits) => {
                BitStorage::Small((bits & !(1u64 << index)) | ((value as u64) << index))
            }
            BitStorage::Big(bits) => {
                let mut bits = bits.clone();
                bits.set_bit(index as u64, value == 1);
                BitStorage::Big(bits)
            }
        };
        Ok(BitVector {
            length: self.length,
            bits,
        })
    }

    /// Number of bits set to 1.
    pub fn count_ones(&self) -> u64 {
        match &self.bits {
            BitStorage::Small(value) => value.count_ones() as u64,
            BitStorage::Big(value) => value.count_ones(),
        }
    }

    /// Iterator over the bits, from index 0 upwards.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.length).map(|index| self.bit_unchecked(index))
    }

    /// The 8 low-order bits as an unsigned integer.
    pub fn to_u8(&self) -> u8 {
        self.to_u64() as u8
    }

    /// The 16 low-order bits as an unsigned integer.
    pub fn to_u16(&self) -> u16 {
        self.to_u64() as u16
    }

    /// The 32 low-order bits as an unsigned integer.
    pub fn to_u32(&self) -> u32 {
        self.to_u64() as u32
    }

    /// The 64 low-order bits as an unsigned integer.
    pub fn to_u64(&self) -> u64 {
        match &self.bits {
            BitStorage::Small(value) => *value,
            BitStorage::Big(value) => value.iter_u64_digits().next().unwrap_or(0),
        }
    }

    /// The whole vector as an unsigned big integer.
    pub fn to_biguint(&self) -> BigUint {
        match &self.bits {
            BitStorage::Small(value) => BigUint::from(*value),
            BitStorage::Big(value) => value.clone(),
        }
    }

    /// XOR of the bits of `self` selected by the 1 bits of `mask`.
    ///
    /// Both vectors have the same length.
    pub(crate) fn masked_parity(&self, mask: &BitVector) -> u8 {
        match (&self.bits, &mask.bits) {
            (BitStorage::Small(bits), BitStorage::Small(mask)) => parity(bits & mask),
            (BitStorage::Big(bits), BitStorage::Big(mask)) => ((bits & mask).count_ones() & 1) as u8,
            _ => {
                let selected = self.to_biguint() & mask.to_biguint();
                (selected.count_ones() & 1) as u8
            }
        }
    }

    /// Drops bit 0, moves every other bit one position down and writes `bit` at the highest index.
    ///
    /// The vector is not empty.
    pub(crate) fn shifted_in(&self, bit: u8) -> Self {
        let top = self.length - 1;
        let bits = match &self.bits {
            BitStorage::Small(value) => BitStorage::Small((value >> 1) | ((bit as u64) << top)),
            BitStorage::Big(value) => {
                let mut shifted = value >> 1usize;
                shifted.set_bit(top as u64, bit == 1);
                BitStorage::Big(shifted)
            }
        };
        BitVector {
            length: self.length,
            bits,
        }
    }
}

impl From<&BitVector> for BigUint {
    fn from(vector: &BitVector) -> Self {
        vector.to_biguint()
    }
}

impl TryFrom<&BitVector> for u64 {
    type Error = LfsrCombinerError;

    /// Lossless conversion, failing for vectors longer than 64 bits.
    fn try_from(vector: &BitVector) -> Result<Self, Self::Error> {
        if vector.length > 64 {
            return Err(LfsrCombinerError::TooWideForU64(vector.length));
        }
        Ok(vector.to_u64())
    }
}

/// Binary string, highest index first, so that it reads as the integer value of the vector.
impl Display for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for index in (0..self.length).rev() {
            write!(f, "{}", self.bit_unchecked(index))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{BitVector, LfsrCombinerError};
    use num_bigint::BigUint;
    use num_traits::One;

    #[test]
    fn test_from_bits() {
        let vector = BitVector::from_bits(&[1, 0, 1, 1, 0]).unwrap();
        assert_eq!(vector.len(), 5);
        assert_eq!(vector.get(0), Ok(1));
        assert_eq!(vector.get(1), Ok(0));
        assert_eq!(vector.get(2), Ok(1));
        assert_eq!(vector.get(3), Ok(1));
        assert_eq!(vector.get(4), Ok(0));
        assert_eq!(vector.to_u64(), 0b01101);

        let vector = BitVector::from_bits(&[1, 2, 0]);
        assert_eq!(vector, Err(LfsrCombinerError::InvalidBitValue(2)));

        let vector = BitVector::from_bits(&[]).unwrap();
        assert!(vector.is_empty());
    }

    #[test]
    fn test_from_bits_big() {
        let mut bits = vec![0u8; 100];
        bits[0] = 1;
        bits[70] = 1;
        bits[99] = 1;
        let vector = BitVector::from_bits(&bits).unwrap();
        assert_eq!(vector.len(), 100);
        for (i, bit) in bits.iter().enumerate() {
            assert_eq!(vector.get(i).unwrap(), *bit);
        }
        assert_eq!(vector.count_ones(), 3);
        assert_eq!(vector.to_u64(), 1);
        assert_eq!(
            vector.to_biguint(),
            BigUint::one() | (BigUint::one() << 70u32) | (BigUint::one() << 99u32)
        );
    }

    #[test]
    fn test_get_out_of_range() {
        let vector = BitVector::from_value(3, 0b101);
        assert_eq!(
            vector.get(3),
            Err(LfsrCombinerError::IndexOutOfRange {
                index: 3,
                length: 3
            })
        );
    }

    #[test]
    fn test_from_value_truncates() {
        for length in [0usize, 1, 5, 17, 32, 63] {
            let value = 0xdead_beef_cafe_f00d_u64;
            let expected = value & ((1u64 << length) - 1);
            assert_eq!(BitVector::from_value(length, value).to_u64(), expected);
        }
        assert_eq!(BitVector::from_value(64, u64::MAX).to_u64(), u64::MAX);

        let vector = BitVector::from_value(4, 0xfd);
        assert_eq!(vector.to_u8(), 0xd);
        assert_eq!(vector.to_string(), "1101");
    }

    #[test]
    fn test_from_value_zero_extends() {
        let vector = BitVector::from_value(80, u64::MAX);
        assert_eq!(vector.len(), 80);
        assert_eq!(vector.get(63), Ok(1));
        assert_eq!(vector.get(64), Ok(0));
        assert_eq!(vector.get(79), Ok(0));
        assert_eq!(vector.count_ones(), 64);
    }

    #[test]
    fn test_narrow_conversions_truncate() {
        let vector = BitVector::from_value(40, 0xab_cdef_1234);
        assert_eq!(vector.to_u8(), 0x34);
        assert_eq!(vector.to_u16(), 0x1234);
        assert_eq!(vector.to_u32(), 0xcdef_1234);
        assert_eq!(vector.to_u64(), 0xab_cdef_1234);
        assert_eq!(u64::try_from(&vector), Ok(0xab_cdef_1234));

        let vector = BitVector::from_value(65, 1);
        assert_eq!(
            u64::try_from(&vector),
            Err(LfsrCombinerError::TooWideForU64(65))
        );
    }

    #[test]
    fn test_from_biguint() {
        let value = (BigUint::one() << 90u32) | BigUint::from(0b1011u32);
        let vector = BitVector::from_biguint(8, &value);
        assert_eq!(vector.to_u64(), 0b1011);

        let vector = BitVector::from_biguint(91, &value);
        assert_eq!(vector.get(90), Ok(1));
        assert_eq!(vector.to_biguint(), value);

        let vector = BitVector::from_biguint(90, &value);
        assert_eq!(vector.get(89), Ok(0));
        assert_eq!(vector.count_ones(), 3);
    }

    #[test]
    fn test_with_bit() {
        let vector = BitVector::zeros(6);
        let updated = vector.with_bit(4, 1).unwrap();
        assert_eq!(vector.to_u64(), 0);
        assert_eq!(updated.to_u64(), 0b10000);
        assert_eq!(updated.with_bit(4, 0).unwrap(), vector);
        assert_eq!(vector.with_bit(2, 3), Err(LfsrCombinerError::InvalidBitValue(3)));
        assert_eq!(
            vector.with_bit(6, 1),
            Err(LfsrCombinerError::IndexOutOfRange {
                index: 6,
                length: 6
            })
        );

        let big = BitVector::zeros(70).with_bit(69, 1).unwrap();
        assert_eq!(big.get(69), Ok(1));
        assert_eq!(big.count_ones(), 1);
    }

    #[test]
    fn test_masked_parity_and_shifted_in() {
        let fill = BitVector::from_value(4, 0b0110);
        let taps = BitVector::from_value(4, 0b0011);
        assert_eq!(fill.masked_parity(&taps), 1);
        assert_eq!(fill.shifted_in(1), BitVector::from_value(4, 0b1011));

        let fill = BitVector::zeros(70).with_bit(0, 1).unwrap();
        let taps = BitVector::zeros(70).with_bit(0, 1).unwrap().with_bit(69, 1).unwrap();
        assert_eq!(fill.masked_parity(&taps), 1);
        let shifted = fill.shifted_in(1);
        assert_eq!(shifted.get(0), Ok(0));
        assert_eq!(shifted.get(69), Ok(1));
        assert_eq!(shifted.count_ones(), 1);
    }

    #[test]
    fn test_iter_and_display() {
        let vector = BitVector::from_bits(&[0, 1, 1]).unwrap();
        assert_eq!(vector.iter().collect::<Vec<u8>>(), vec![0, 1, 1]);
        assert_eq!(vector.to_string(), "110");
    }
}
