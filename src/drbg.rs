//! AES-256-CTR_DRBG, used to replay known-answer tests deterministically (NIST SP 800-90A
//! style, without derivation functions or prediction-resistance, matching the reference
//! construction this crate's test vectors were generated against).

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes256;
use rand_core::{CryptoRng, RngCore};

const SEED_LEN: usize = 48;
const KEY_LEN: usize = 32;
const V_LEN: usize = 16;
const RESEED_INTERVAL: u64 = 1 << 48;

/// Failure modes of the entropy façade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrbgError {
    /// `random`/`reseed` called before `instantiate`.
    NotInstantiated,
    /// The reseed counter reached `2^48`; the generator must be reseeded before further use.
    ReseedRequired,
}

enum State {
    Uninitialized,
    Ready { key: [u8; KEY_LEN], v: [u8; V_LEN], reseed_ctr: u64 },
    Exhausted,
}

/// A deterministic AES-256-CTR_DRBG, usable anywhere a `rand_core::CryptoRngCore` is expected
/// (e.g. [`crate::traits::KeyGen::try_keygen_with_rng`]) so that known-answer tests can drive
/// key generation/encapsulation with reproducible "randomness".
pub struct CtrDrbg {
    state: State,
}

impl Default for CtrDrbg {
    fn default() -> Self { Self::new() }
}

impl CtrDrbg {
    /// Constructs an uninstantiated generator; call [`Self::instantiate`] before use.
    #[must_use]
    pub fn new() -> Self { CtrDrbg { state: State::Uninitialized } }

    /// Seeds the generator from 48 bytes of entropy and an optional personalization string
    /// (truncated/zero-padded to 48 bytes, matching the reference construction).
    pub fn instantiate(&mut self, entropy: &[u8; SEED_LEN], personalization: &[u8]) {
        self.state = State::Ready { key: [0u8; KEY_LEN], v: [0u8; V_LEN], reseed_ctr: 1 };
        let seed_material = xor_padded(entropy, personalization);
        self.update(&seed_material);
    }

    /// Mixes fresh entropy and optional additional input into the state, resetting the reseed
    /// counter.
    ///
    /// # Errors
    /// Returns [`DrbgError::NotInstantiated`] if called before [`Self::instantiate`].
    pub fn reseed(
        &mut self, entropy: &[u8; SEED_LEN], additional_input: &[u8],
    ) -> Result<(), DrbgError> {
        if matches!(self.state, State::Uninitialized) {
            return Err(DrbgError::NotInstantiated);
        }
        // Reseeding (including recovery from `Exhausted`) rebuilds `(key, V)` from scratch
        // under the fresh entropy, mirroring `instantiate`.
        self.state = State::Ready { key: [0u8; KEY_LEN], v: [0u8; V_LEN], reseed_ctr: 1 };
        let seed_material = xor_padded(entropy, additional_input);
        self.update(&seed_material);
        Ok(())
    }

    /// Fills `out` with generator output, then mixes in `additional_input` (zero-padded to 48
    /// bytes; pass `&[]` for none).
    ///
    /// # Errors
    /// Returns [`DrbgError::NotInstantiated`] before `instantiate`, or
    /// [`DrbgError::ReseedRequired`] once the reseed interval (`2^48` calls) is exhausted.
    pub fn random(&mut self, out: &mut [u8], additional_input: &[u8]) -> Result<(), DrbgError> {
        match &self.state {
            State::Uninitialized => return Err(DrbgError::NotInstantiated),
            State::Exhausted => return Err(DrbgError::ReseedRequired),
            State::Ready { reseed_ctr, .. } if *reseed_ctr >= RESEED_INTERVAL => {
                self.state = State::Exhausted;
                return Err(DrbgError::ReseedRequired);
            }
            State::Ready { .. } => {}
        }

        let additional = xor_padded(&[0u8; SEED_LEN], additional_input);
        if !additional_input.is_empty() {
            self.update(&additional);
        }

        if let State::Ready { key, v, .. } = &mut self.state {
            let cipher = Aes256::new(GenericArray::from_slice(key));
            let mut produced = 0;
            while produced < out.len() {
                increment_v(v);
                let mut block = *GenericArray::from_slice(v);
                cipher.encrypt_block(&mut block);
                let take = (out.len() - produced).min(V_LEN);
                out[produced..produced + take].copy_from_slice(&block[..take]);
                produced += take;
            }
        }

        self.update(&additional);
        if let State::Ready { reseed_ctr, .. } = &mut self.state {
            *reseed_ctr += 1;
        }
        Ok(())
    }

    /// `CTR_DRBG_Update`: absorbs 48 bytes of provided data into `(key, V)` by generating a
    /// 48-byte AES-CTR keystream under the current key and XORing it in.
    fn update(&mut self, provided: &[u8; SEED_LEN]) {
        let State::Ready { key, v, .. } = &mut self.state else { return };
        let cipher = Aes256::new(GenericArray::from_slice(key));
        let mut temp = [0u8; SEED_LEN];
        let mut filled = 0;
        while filled < SEED_LEN {
            increment_v(v);
            let mut block = *GenericArray::from_slice(v);
            cipher.encrypt_block(&mut block);
            let take = (SEED_LEN - filled).min(V_LEN);
            temp[filled..filled + take].copy_from_slice(&block[..take]);
            filled += take;
        }
        for i in 0..SEED_LEN {
            temp[i] ^= provided[i];
        }
        key.copy_from_slice(&temp[0..KEY_LEN]);
        v.copy_from_slice(&temp[KEY_LEN..SEED_LEN]);
    }
}

fn xor_padded(entropy: &[u8; SEED_LEN], additional: &[u8]) -> [u8; SEED_LEN] {
    let mut padded = [0u8; SEED_LEN];
    let n = additional.len().min(SEED_LEN);
    padded[..n].copy_from_slice(&additional[..n]);
    let mut out = *entropy;
    for i in 0..SEED_LEN {
        out[i] ^= padded[i];
    }
    out
}

fn increment_v(v: &mut [u8; V_LEN]) {
    for byte in v.iter_mut().rev() {
        if *byte == 0xFF {
            *byte = 0;
        } else {
            *byte += 1;
            break;
        }
    }
}

impl RngCore for CtrDrbg {
    fn next_u32(&mut self) -> u32 { rand_core::impls::next_u32_via_fill(self) }

    fn next_u64(&mut self) -> u64 { rand_core::impls::next_u64_via_fill(self) }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.try_fill_bytes(dest).expect("CtrDrbg: reseed required or not instantiated")
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.random(dest, &[])
            .map_err(|_| rand_core::Error::from(core::num::NonZeroU32::new(1).unwrap()))
    }
}

impl CryptoRng for CtrDrbg {}


#[cfg(test)]
mod tests {
    use super::CtrDrbg;

    #[test]
    fn instantiate_then_random_is_deterministic() {
        let entropy = [7u8; 48];
        let mut a = CtrDrbg::new();
        a.instantiate(&entropy, b"test");
        let mut b = CtrDrbg::new();
        b.instantiate(&entropy, b"test");

        let mut out_a = [0u8; 64];
        let mut out_b = [0u8; 64];
        a.random(&mut out_a, &[]).unwrap();
        b.random(&mut out_b, &[]).unwrap();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn successive_draws_differ() {
        let mut drbg = CtrDrbg::new();
        drbg.instantiate(&[1u8; 48], &[]);
        let mut first = [0u8; 32];
        let mut second = [0u8; 32];
        drbg.random(&mut first, &[]).unwrap();
        drbg.random(&mut second, &[]).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn random_before_instantiate_errors() {
        let mut drbg = CtrDrbg::new();
        let mut out = [0u8; 16];
        assert!(drbg.random(&mut out, &[]).is_err());
    }

    #[test]
    fn additional_input_changes_output_deterministically() {
        let entropy = [3u8; 48];
        let mut a = CtrDrbg::new();
        a.instantiate(&entropy, &[]);
        let mut b = CtrDrbg::new();
        b.instantiate(&entropy, &[]);

        let mut out_a = [0u8; 32];
        let mut out_b = [0u8; 32];
        a.random(&mut out_a, b"additional").unwrap();
        b.random(&mut out_b, b"additional").unwrap();
        assert_eq!(out_a, out_b, "same additional input must reproduce the same output");

        let mut c = CtrDrbg::new();
        c.instantiate(&entropy, &[]);
        let mut out_c = [0u8; 32];
        c.random(&mut out_c, &[]).unwrap();
        assert_ne!(out_a, out_c, "supplying additional input must perturb the output");
    }
}
