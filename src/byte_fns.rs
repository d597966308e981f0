use crate::helpers::ensure;
use crate::types::Zq;
use crate::Q;

/// Algorithm 4 `ByteEncode<d>(F)` on page 19.
/// Encodes an array of d-bit integers into a byte array, for 1 ≤ d ≤ 12.
///
/// Input: integer array `F ∈ Z^256_m`, where `m = 2^d if d < 12` and `m = q if d = 12` <br>
/// Output: byte array B ∈ B^{32d}
pub(crate) fn byte_encode(
    d: u32, integers_f: &[Zq; 256], bytes_b: &mut [u8],
) -> Result<(), &'static str> {
    let mut temp = 0u64;
    let mut bit_index = 0;
    let mut byte_index = 0;
    let m = if d < 12 { 2u64.pow(d) } else { Q as u64 };
    for coeff in integers_f {
        let coeff = u64::from(coeff.get_u16());
        ensure!(coeff <= m, "Alg4: Coeff out of range");
        let coeff = coeff & (2u64.pow(d) - 1);
        temp |= coeff << bit_index;
        bit_index += d as usize;
        while bit_index > 7 {
            bytes_b[byte_index] = temp as u8;
            temp >>= 8;
            byte_index += 1;
            bit_index -= 8;
        }
    }
    Ok(())
}


/// Algorithm 5 `ByteDecode<d>(B)` on page 19.
/// Decodes a byte array into an array of d-bit integers, for 1 ≤ d ≤ 12.
///
/// Input: byte array B ∈ B^{32d} <br>
/// Output: integer array `F ∈ Z^256_m`, where `m = 2^d if d < 12` and `m = q if d = 12`
pub(crate) fn byte_decode(
    d: u32, bytes_b: &[u8], integers_f: &mut [Zq; 256],
) -> Result<(), &'static str> {
    let bitlen = d;
    let mut temp = 0u64;
    let mut int_index = 0;
    let mut bit_index = 0;
    for byte in bytes_b {
        temp |= u64::from(*byte) << bit_index;
        bit_index += 8;
        while bit_index >= bitlen {
            let tmask = temp & (2u64.pow(bitlen) - 1);
            integers_f[int_index] = Zq::from_raw(tmask as u16);
            bit_index -= bitlen;
            temp >>= bitlen;
            int_index += 1;
        }
    }
    let max = if d < 12 { 2u16.pow(d) } else { Q as u16 };
    ensure!(integers_f.iter().all(|e| e.get_u16() < max), "Alg5: integers out of range");
    Ok(())
}


#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::vec;
    use alloc::vec::Vec;

    use rand::{Rng, SeedableRng};

    use crate::byte_fns::{byte_decode, byte_encode};
    use crate::types::Zq;

    #[test]
    fn test_decode_and_encode() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let mut integer_array = [Zq::default(); 256];
        for _i in 0..100 {
            for d in [11u32, 10, 5, 4] {
                let num_bytes = 32 * d as usize;
                let bytes1: Vec<u8> = (0..num_bytes).map(|_| rng.gen()).collect();
                let mut bytes2 = vec![0u8; num_bytes];
                byte_decode(d, &bytes1, &mut integer_array).unwrap();
                byte_encode(d, &integer_array, &mut bytes2).unwrap();
                assert_eq!(bytes1, bytes2);
            }
        }
    }
}
