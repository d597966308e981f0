use crate::ntt::multiply_ntts;
use crate::types::Zq;

/// A single ring element in NTT domain: 256 `Z_q` coefficients.
pub(crate) type Poly = [Zq; 256];

/// A length-`K` vector of NTT-domain ring elements (commentary 2.11-2.14, page 10).
#[derive(Clone)]
pub(crate) struct VectorNtt<const K: usize>(pub(crate) [Poly; K]);

impl<const K: usize> VectorNtt<K> {
    pub(crate) fn zero() -> Self { Self([[Zq::default(); 256]; K]) }

    #[must_use]
    pub(crate) fn add(&self, other: &Self) -> Self {
        let mut out = [[Zq::default(); 256]; K];
        for k in 0..K {
            for n in 0..256 {
                out[k][n] = self.0[k][n].add(other.0[k][n]);
            }
        }
        Self(out)
    }

    /// `u_hat^T · v_hat`: dot product of two NTT-domain vectors, itself a ring element.
    #[must_use]
    pub(crate) fn dot(&self, other: &Self) -> Poly {
        let mut result = [Zq::default(); 256];
        for k in 0..K {
            let term = multiply_ntts(&self.0[k], &other.0[k]);
            for n in 0..256 {
                result[n] = result[n].add(term[n]);
            }
        }
        result
    }
}

/// A `K×K` matrix of NTT-domain ring elements with an O(1) transposed view
/// (commentary 2.12-2.13, page 10): `transpose()` just flips a flag, so
/// `A^T · u` costs the same as `A · u`.
#[derive(Clone)]
pub(crate) struct MatrixNtt<const K: usize> {
    rows: [[Poly; K]; K],
    transposed: bool,
}

impl<const K: usize> MatrixNtt<K> {
    pub(crate) fn new(rows: [[Poly; K]; K]) -> Self { Self { rows, transposed: false } }

    pub(crate) fn transposed_view(&self) -> Self {
        Self { rows: self.rows, transposed: !self.transposed }
    }

    fn entry(&self, i: usize, j: usize) -> &Poly {
        if self.transposed { &self.rows[j][i] } else { &self.rows[i][j] }
    }

    /// `w_hat = A_hat · u_hat`.
    #[must_use]
    pub(crate) fn mul_vec(&self, u_hat: &VectorNtt<K>) -> VectorNtt<K> {
        let mut w_hat = [[Zq::default(); 256]; K];
        for i in 0..K {
            let mut acc = [Zq::default(); 256];
            for j in 0..K {
                let term = multiply_ntts(self.entry(i, j), &u_hat.0[j]);
                for n in 0..256 {
                    acc[n] = acc[n].add(term[n]);
                }
            }
            w_hat[i] = acc;
        }
        VectorNtt(w_hat)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transpose_flips_entry_lookup() {
        let mut rows = [[[Zq::default(); 256]; 2]; 2];
        rows[0][1][0] = Zq::from_raw(7);
        let m = MatrixNtt::<2>::new(rows);
        assert_eq!(m.entry(0, 1)[0].get_u16(), 7);
        let t = m.transposed_view();
        assert_eq!(t.entry(1, 0)[0].get_u16(), 7);
    }
}
