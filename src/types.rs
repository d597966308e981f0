use crate::Q;

// While Zq is nice, simple and correct, the performance is suboptimal.
// This will be addressed (particularly in matrix operations etc) 'soon',
// potentially as a 256-entry row.

/// An element of `Z_q`. Stored as u16, but arithmetic runs in u64 so the
/// Montgomery-style reduction below has room to work.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Zq(u16);


#[allow(clippy::inline_always)]
impl Zq {
    const M: u64 = 2u64.pow(32) / (Self::Q64);
    #[allow(clippy::cast_possible_truncation)]
    const Q16: u16 = Q as u16;
    const Q64: u64 = Q as u64;

    /// Builds a `Zq` from a raw value already known to be `< q` (const contexts,
    /// e.g. the compile-time zeta table, cannot call the debug-asserting `new`).
    pub(crate) const fn from_raw(value: u16) -> Self { Zq(value) }

    pub fn get_u16(self) -> u16 { self.0 }

    pub fn get_u32(self) -> u32 { u32::from(self.0) }

    pub fn set_u16(&mut self, a: u16) { self.0 = a }

    #[inline(always)]
    pub fn add(self, other: Self) -> Self {
        let sum = self.0.wrapping_add(other.0);
        let (trial, borrow) = sum.overflowing_sub(Self::Q16);
        let result = if borrow { sum } else { trial }; // TODO Not quite CT
        Self(result)
    }

    #[inline(always)]
    pub fn sub(self, other: Self) -> Self {
        let (diff, borrow) = self.0.overflowing_sub(other.0);
        let trial = diff.wrapping_add(Self::Q16);
        let result = if borrow { trial } else { diff }; // TODO Not quite CT
        Self(result)
    }

    #[inline(always)]
    pub fn mul(self, other: Self) -> Self {
        let prod = u64::from(self.0) * u64::from(other.0);
        let quot = prod * Self::M;
        let quot = quot >> (32);
        let rem = prod - quot * Self::Q64;
        let (diff, borrow) = rem.overflowing_sub(Self::Q64);
        let result = if borrow { rem } else { diff }; // TODO Not quite CT
        Self(u16::try_from(result).unwrap())
    }

    /// Maps a centered binomial sample `count_a - count_b` (each in `0..=eta`)
    /// into `Z_q`, folding the negative range into `q - x`.
    pub fn from_centered(count_a: u32, count_b: u32) -> Self {
        let diff = i32::try_from(count_a).unwrap() - i32::try_from(count_b).unwrap();
        let reduced = diff.rem_euclid(i32::try_from(Q).unwrap());
        Self(u16::try_from(reduced).unwrap())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_wraps_at_modulus() {
        assert_eq!(Zq(3328).add(Zq(5)).get_u16(), 4);
    }

    #[test]
    fn sub_wraps_below_zero() {
        assert_eq!(Zq(0).sub(Zq(1)).get_u16(), 3328);
    }

    #[test]
    fn mul_matches_naive_reduction() {
        let a = Zq(1234);
        let b = Zq(4321);
        let expected = (1234u32 * 4321u32) % u32::from(Q16_TEST);
        assert_eq!(u32::from(a.mul(b).get_u16()), expected);
    }

    const Q16_TEST: u16 = Q as u16;

    #[test]
    fn centered_binomial_range() {
        assert_eq!(Zq::from_centered(3, 0).get_u16(), 3);
        assert_eq!(Zq::from_centered(0, 3).get_u16(), (Q - 3) as u16);
    }
}
