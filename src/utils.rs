use num_bigint::BigUint;
use num_traits::Zero;

/// Parity of the set bits of `value`, as 0 or 1.
#[inline]
pub(crate) fn parity(value: u64) -> u8 {
    (value.count_ones() & 1) as u8
}

/// Mask of the `length` low-order bits, saturating at 64 bits.
#[inline]
pub(crate) fn low_mask(length: usize) -> u64 {
    if length >= 64 {
        u64::MAX
    } else {
        (1u64 << length) - 1
    }
}

/// Binary Möbius transform of a packed truth table, truth table to ANF and back.
///
/// Bit `j` of the result is the XOR of bits `i` of the input over all `i` whose set bits are included in `j`.
pub(crate) fn fast_anf_transform_biguint(truth_table: &BigUint, num_variables: usize) -> BigUint {
    let size = 1usize << num_variables;
    let mut bits: Vec<bool> = (0..size as u64).map(|i| truth_table.bit(i)).collect();
    for i in 0..num_variables {
        let step = 1usize << i;
        for j in 0..size {
            if j & step != 0 {
                bits[j] ^= bits[j ^ step];
            }
        }
    }
    let mut transformed = BigUint::zero();
    for (position, _) in bits.iter().enumerate().filter(|(_, bit)| **bit) {
        transformed.set_bit(position as u64, true);
    }
    transformed
}
